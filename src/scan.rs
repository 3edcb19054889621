//! Lists the contents of a site directory. [`scan`] produces the ordered
//! [`PostEntry`] list for one collection and [`root_links`] picks the
//! well-known entries out of the site root.
//!
//! Collections live in `{base_directory}/_{collection}/`, one file per post.
//! Post file names conventionally begin with a `YYYY-MM-DD-` date, so listing
//! them by name in descending order puts the newest post first.

use crate::post::PostEntry;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Returns the directory for a collection: `{base_directory}/_{collection}`.
pub fn collection_directory(base_directory: &Path, collection: &str) -> PathBuf {
    base_directory.join(format!("_{}", collection))
}

/// Lists the posts in a collection, newest first. Any failure to read the
/// collection directory (including it not existing) yields an empty list;
/// use [`try_scan`] to observe the failure.
pub fn scan(base_directory: &Path, collection: &str) -> Vec<PostEntry> {
    match try_scan(base_directory, collection) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(collection, error = %err, "treating collection as empty");
            Vec::new()
        }
    }
}

/// Like [`scan`] but reports why a collection couldn't be listed.
///
/// Entries are the non-directory children of the collection directory,
/// ordered by reverse lexicographic file name.
pub fn try_scan(base_directory: &Path, collection: &str) -> Result<Vec<PostEntry>> {
    let dir = collection_directory(base_directory, collection);
    tracing::debug!(path = ?dir, "scanning collection");

    let mut entries = Vec::new();
    for result in WalkDir::new(&dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()))
    {
        let entry = result.map_err(|err| Error::from_walkdir(&dir, err))?;
        if entry.file_type().is_dir() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy();
        entries.push(PostEntry::new(&file_name, entry.path().to_owned()));
    }
    entries.reverse();

    tracing::debug!(collection, count = entries.len(), "scanned collection");
    Ok(entries)
}

/// The kind of a well-known entry in the site root.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RootLinkKind {
    /// The `_config.yml` file.
    SiteSettings,

    /// The `assets` directory.
    SiteAssets,

    /// The `_site` build output directory.
    SiteFiles,
}

impl RootLinkKind {
    fn from_file_name(name: &str) -> Option<RootLinkKind> {
        match name {
            crate::config::CONFIG_FILE_NAME => Some(RootLinkKind::SiteSettings),
            "assets" => Some(RootLinkKind::SiteAssets),
            "_site" => Some(RootLinkKind::SiteFiles),
            _ => None,
        }
    }

    /// The label shown for the link.
    pub fn label(self) -> &'static str {
        match self {
            RootLinkKind::SiteSettings => "Site Settings",
            RootLinkKind::SiteAssets => "Site Assets",
            RootLinkKind::SiteFiles => "Site Files",
        }
    }
}

/// A well-known entry in the site root, shown next to the collections.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RootLink {
    pub kind: RootLinkKind,
    pub path: PathBuf,
}

/// Lists the site root by name and keeps only the entries a [`RootLinkKind`]
/// recognizes. Read failures yield an empty list, as with [`scan`].
pub fn root_links(base_directory: &Path) -> Vec<RootLink> {
    let mut links = Vec::new();
    for result in WalkDir::new(base_directory)
        .min_depth(1)
        .max_depth(1)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()))
    {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(
                    error = %Error::from_walkdir(base_directory, err),
                    "listing site root"
                );
                return Vec::new();
            }
        };
        if let Some(kind) =
            RootLinkKind::from_file_name(&entry.file_name().to_string_lossy())
        {
            links.push(RootLink {
                kind,
                path: entry.path().to_owned(),
            });
        }
    }
    links
}

/// Represents the result of a directory listing.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a failure to list a directory.
#[derive(Debug)]
pub enum Error {
    /// Returned when the directory does not exist.
    NotFound { path: PathBuf },

    /// Returned for any other problem reading the directory.
    Io { path: PathBuf, err: std::io::Error },

    /// Returned for failures walkdir reports without an underlying I/O error
    /// (e.g., symlink loops).
    WalkDir(walkdir::Error),
}

impl Error {
    fn from_walkdir(dir: &Path, err: walkdir::Error) -> Error {
        let path = err.path().unwrap_or(dir).to_owned();
        let kind = err.io_error().map(|e| e.kind());
        match kind {
            Some(std::io::ErrorKind::NotFound) => Error::NotFound { path },
            Some(_) => match err.into_io_error() {
                Some(err) => Error::Io { path, err },
                None => Error::NotFound { path },
            },
            None => Error::WalkDir(err),
        }
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::NotFound { path } => {
                write!(f, "directory '{}' not found", path.display())
            }
            Error::Io { path, err } => {
                write!(f, "reading directory '{}': {}", path.display(), err)
            }
            Error::WalkDir(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::NotFound { .. } => None,
            Error::Io { path: _, err } => Some(err),
            Error::WalkDir(err) => Some(err),
        }
    }
}
