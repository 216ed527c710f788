//! Defines the [`Post`] type, the in-memory form of a post's source file.
//! Posts are produced by [`crate::parser::Parser`].

use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// The format of post dates, both in frontmatter and in rendered output.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Represents a blog post loaded from an `index.md` entry file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Post {
    /// The path to the entry file the post was loaded from.
    pub source_path: PathBuf,

    /// The title of the post, taken verbatim from the frontmatter.
    pub title: String,

    /// The date of the post. Any time component in the frontmatter is
    /// discarded.
    pub date: NaiveDate,

    /// The raw markdown body (everything after the frontmatter).
    pub body: String,
}

impl Post {
    /// The directory holding the post's entry file. Its base name becomes the
    /// post's output file name.
    pub fn directory(&self) -> Option<&Path> {
        self.source_path.parent()
    }
}
