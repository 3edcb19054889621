//! Converts post files to HTML for the content pane.

use pulldown_cmark::{html, Parser};
use std::fmt;
use std::path::{Path, PathBuf};

/// Reads the post at `path` and converts its contents from markdown to HTML.
/// Nothing is cached; every call reads the file again.
pub fn render(path: &Path) -> Result<String> {
    tracing::debug!(path = ?path, "rendering post");
    let markdown = std::fs::read_to_string(path).map_err(|err| Error::Read {
        path: path.to_owned(),
        err,
    })?;
    Ok(to_html(&markdown))
}

/// Converts markdown to HTML using the standard CommonMark rules with no
/// extensions enabled.
pub fn to_html(markdown: &str) -> String {
    let mut output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut output, Parser::new(markdown));
    output
}

/// Represents the result of rendering a post.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error rendering a post.
#[derive(Debug)]
pub enum Error {
    /// Returned when the post file can't be read (missing, unreadable, or
    /// not UTF-8).
    Read { path: PathBuf, err: std::io::Error },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Read { path, err } => {
                write!(f, "reading post '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Read { path: _, err } => Some(err),
        }
    }
}
