//! Remembers the selected site directory across runs.
//!
//! The selection is a single string stored under [`DIRECTORY_KEY`] in a small
//! key/value store. [`JsonStore`] keeps the store in a JSON file; writes go to
//! a temporary sibling file which is then renamed over the target, so a crash
//! never leaves a half-written file behind. [`MemoryStore`] keeps it in memory.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// The key under which the selected directory is stored.
pub const DIRECTORY_KEY: &str = "directory";

/// Loads and saves the remembered site directory.
pub trait SelectionStore {
    /// Returns the remembered directory, or `None` if nothing is remembered.
    fn load(&self) -> Result<Option<PathBuf>>;

    /// Remembers `directory`, replacing any previous selection.
    fn save(&mut self, directory: &Path) -> Result<()>;
}

/// A [`SelectionStore`] backed by a JSON object of string keys and values.
/// Keys other than [`DIRECTORY_KEY`] are preserved on save.
pub struct JsonStore {
    file_path: PathBuf,
}

impl JsonStore {
    pub fn new(file_path: PathBuf) -> JsonStore {
        JsonStore { file_path }
    }

    /// A store at `<config dir>/sitenav/state.json`, where the config
    /// directory is the platform's (e.g. `~/.config` on Linux). Returns `None`
    /// if the platform has no config directory.
    pub fn at_default_location() -> Option<JsonStore> {
        dirs::config_dir().map(|dir| JsonStore::new(dir.join("sitenav").join("state.json")))
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn read(&self) -> Result<BTreeMap<String, String>> {
        match std::fs::read_to_string(&self.file_path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Ok(BTreeMap::new())
            }
            Err(err) => Err(err.into()),
        }
    }

    fn write(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, serde_json::to_string_pretty(values)?)?;
        std::fs::rename(&tmp_path, &self.file_path)?;
        Ok(())
    }
}

impl SelectionStore for JsonStore {
    fn load(&self) -> Result<Option<PathBuf>> {
        let directory = self
            .read()?
            .remove(DIRECTORY_KEY)
            .filter(|d| !d.is_empty())
            .map(PathBuf::from);
        tracing::debug!(path = ?self.file_path, directory = ?directory, "loaded selection");
        Ok(directory)
    }

    fn save(&mut self, directory: &Path) -> Result<()> {
        let mut values = match self.read() {
            Ok(values) => values,
            Err(Error::Json(err)) => {
                tracing::warn!(path = ?self.file_path, error = %err, "replacing unreadable selection store");
                BTreeMap::new()
            }
            Err(err) => return Err(err),
        };
        values.insert(
            DIRECTORY_KEY.to_owned(),
            directory.to_string_lossy().into_owned(),
        );
        self.write(&values)?;
        tracing::debug!(path = ?self.file_path, directory = ?directory, "saved selection");
        Ok(())
    }
}

/// A [`SelectionStore`] that forgets everything when dropped.
#[derive(Default)]
pub struct MemoryStore {
    directory: Option<PathBuf>,
}

impl MemoryStore {
    pub fn new(directory: Option<PathBuf>) -> MemoryStore {
        MemoryStore { directory }
    }
}

impl SelectionStore for MemoryStore {
    fn load(&self) -> Result<Option<PathBuf>> {
        Ok(self.directory.clone())
    }

    fn save(&mut self, directory: &Path) -> Result<()> {
        self.directory = Some(directory.to_owned());
        Ok(())
    }
}

/// Represents the result of a [`SelectionStore`] operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a failure to load or save the selection.
#[derive(Debug)]
pub enum Error {
    /// Returned for I/O errors reading or writing the store file.
    Io(std::io::Error),

    /// Returned when the store file isn't a JSON object of strings.
    Json(serde_json::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "selection store: {}", err),
            Error::Json(err) => write!(f, "selection store: {}", err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Json(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    /// Converts a [`serde_json::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for [`serde_json`] functions.
    fn from(err: serde_json::Error) -> Error {
        Error::Json(err)
    }
}
