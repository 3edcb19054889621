//! Defines the [`PostEntry`] type, which is a single post as it appears in a
//! collection listing, and [`prettify`], which turns a post's file name into
//! a human-readable title.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::path::PathBuf;

const MARKDOWN_EXTENSION: &str = ".md";

/// Matches a `year-month-day-` prefix. It is not anchored: the first match
/// anywhere in the name is the one that gets stripped.
static DATE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+-[0-9]+-[0-9]+-").unwrap());

/// Matches an ISO date at the very start of a file name.
static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{4}-[0-9]{2}-[0-9]{2})-").unwrap());

/// Represents a single post file inside a collection directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PostEntry {
    /// The file name as it appears on disk (e.g., `2014-02-04-hello.md`).
    pub raw_filename: String,

    /// The title shown in the UI. Always `prettify(raw_filename)`.
    pub display_name: String,

    /// The full path to the post file, i.e.
    /// `{base_directory}/_{collection}/{raw_filename}`.
    pub full_path: PathBuf,

    /// The date encoded in a leading `YYYY-MM-DD-` prefix, if any.
    pub date: Option<NaiveDate>,
}

impl PostEntry {
    /// Builds an entry from a raw file name and the path at which it lives.
    /// The display name and date are derived from the file name.
    pub fn new(raw_filename: &str, full_path: PathBuf) -> PostEntry {
        PostEntry {
            raw_filename: raw_filename.to_owned(),
            display_name: prettify(raw_filename),
            full_path,
            date: date_prefix(raw_filename),
        }
    }
}

/// Converts a post file name into a display name:
///
/// 1. the first `digits-digits-digits-` run is removed,
/// 2. every remaining `-` becomes a space,
/// 3. the first `.md` is removed, wherever it occurs.
///
/// For example `2014-02-04-my-first-post.md` becomes `my first post`.
///
/// Step 3 is a plain substring removal rather than an extension check, so
/// `notes.md-draft.txt` becomes `notes draft.txt`.
pub fn prettify(filename: &str) -> String {
    DATE_PREFIX
        .replace(filename, "")
        .replace('-', " ")
        .replacen(MARKDOWN_EXTENSION, "", 1)
}

/// Parses the `YYYY-MM-DD-` prefix of a file name into a date. Returns `None`
/// when there is no such prefix or it isn't a real calendar date.
pub fn date_prefix(filename: &str) -> Option<NaiveDate> {
    let captures = ISO_DATE.captures(filename)?;
    NaiveDate::parse_from_str(&captures[1], "%Y-%m-%d").ok()
}
