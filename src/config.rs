//! Loads the site configuration from `{base_directory}/_config.yml`. Only the
//! `title` and `collections` keys are recognized; everything else in the file
//! is ignored.

use serde_yaml::Value;
use std::fmt;
use std::path::{Path, PathBuf};

/// The name of the site configuration file inside a site root.
pub const CONFIG_FILE_NAME: &str = "_config.yml";

/// Returns the path of the configuration file for a site root.
pub fn config_path(base_directory: &Path) -> PathBuf {
    base_directory.join(CONFIG_FILE_NAME)
}

/// The parts of `_config.yml` this crate cares about. Missing keys are
/// represented as `None` or an empty list rather than as errors.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SiteConfig {
    /// The site title, if the file declares one.
    pub title: Option<String>,

    /// The declared collections in declaration order.
    pub collections: Vec<Collection>,
}

/// A collection declared under the `collections` key.
#[derive(Clone, Debug, PartialEq)]
pub struct Collection {
    /// The collection's name, i.e. the key in the `collections` mapping.
    pub name: String,

    /// The collection's settings. Their contents are not interpreted.
    pub settings: Value,
}

impl SiteConfig {
    /// Reads and parses `{base_directory}/_config.yml`.
    pub fn load(base_directory: &Path) -> Result<SiteConfig> {
        let path = config_path(base_directory);
        tracing::debug!(path = ?path, "loading site config");
        let contents = std::fs::read_to_string(&path).map_err(|err| Error::Read {
            path: path.clone(),
            err,
        })?;
        SiteConfig::parse(&path, &contents)
    }

    /// Parses the contents of a configuration file. `path` is only used to
    /// annotate errors.
    pub fn parse(path: &Path, input: &str) -> Result<SiteConfig> {
        if is_blank(input) {
            return Ok(SiteConfig::default());
        }

        let mapping = match serde_yaml::from_str::<Value>(input).map_err(|err| {
            Error::Parse {
                path: path.to_owned(),
                err,
            }
        })? {
            Value::Null => return Ok(SiteConfig::default()),
            Value::Mapping(mapping) => mapping,
            _ => {
                return Err(Error::NotAMapping {
                    path: path.to_owned(),
                })
            }
        };

        // Keys are looked up rather than deserialized so that keys of any
        // type elsewhere in the document are ignored.
        let field = |name: &str| Value::String(name.to_owned());
        Ok(SiteConfig {
            title: mapping.get(&field("title")).and_then(scalar_to_string),
            collections: match mapping.get(&field("collections")) {
                Some(Value::Mapping(collections)) => collections
                    .iter()
                    .filter_map(|(key, settings)| match scalar_to_string(key) {
                        Some(name) => Some(Collection {
                            name,
                            settings: settings.clone(),
                        }),
                        None => {
                            tracing::warn!(key = ?key, "skipping non-scalar collection name");
                            None
                        }
                    })
                    .collect(),
                None | Some(Value::Null) => Vec::new(),
                Some(other) => {
                    tracing::warn!(value = ?other, "ignoring `collections`; not a mapping");
                    Vec::new()
                }
            },
        })
    }

    /// The declared collection names in declaration order.
    pub fn collection_names(&self) -> impl Iterator<Item = &str> {
        self.collections.iter().map(|c| c.name.as_str())
    }
}

// Scalars are rendered the way they were written; sequences, mappings, and
// null have no string form.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// A document with nothing but whitespace, comments, and document markers.
fn is_blank(input: &str) -> bool {
    input.lines().map(str::trim).all(|line| {
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}

/// Represents the result of loading a [`SiteConfig`].
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a failure to load a [`SiteConfig`].
#[derive(Debug)]
pub enum Error {
    /// Returned when the configuration file is missing or unreadable.
    Read { path: PathBuf, err: std::io::Error },

    /// Returned when the configuration file isn't valid YAML.
    Parse { path: PathBuf, err: serde_yaml::Error },

    /// Returned when the configuration file is valid YAML but its top-level
    /// value is not a mapping.
    NotAMapping { path: PathBuf },
}

impl Error {
    /// The configuration file the error concerns.
    pub fn path(&self) -> &Path {
        match self {
            Error::Read { path, .. } => path,
            Error::Parse { path, .. } => path,
            Error::NotAMapping { path } => path,
        }
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Read { path, err } => {
                write!(f, "reading site config '{}': {}", path.display(), err)
            }
            Error::Parse { path, err } => {
                write!(f, "parsing site config '{}': {}", path.display(), err)
            }
            Error::NotAMapping { path } => write!(
                f,
                "parsing site config '{}': top-level value must be a mapping",
                path.display()
            ),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Read { path: _, err } => Some(err),
            Error::Parse { path: _, err } => Some(err),
            Error::NotAMapping { .. } => None,
        }
    }
}
