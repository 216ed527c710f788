use crate::index::INDEX_FILE;
use crate::page::RenderedPage;
use std::collections::HashSet;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Responsible for writing rendered pages to disk.
pub struct Writer<'a> {
    /// The directory in which every page is written. Page files are located
    /// at `{output_directory}/{file_name}` and the index at
    /// `{output_directory}/index.gmi`.
    pub output_directory: &'a Path,
}

impl Writer<'_> {
    /// Creates the output directory and writes every page followed by the
    /// index. Existing files are overwritten; files from earlier runs which
    /// no longer have a post are left alone.
    pub fn write_capsule(&self, pages: &[RenderedPage], index: &str) -> Result<()> {
        std::fs::create_dir_all(self.output_directory).map_err(|err| Error::CreateDir {
            path: self.output_directory.to_owned(),
            err,
        })?;
        self.write_pages(pages)?;
        self.write_file(INDEX_FILE, index)
    }

    /// Writes each page to `{output_directory}/{file_name}`. Two posts in
    /// different directories with the same base name collide; the later one
    /// wins and a warning is logged.
    pub fn write_pages(&self, pages: &[RenderedPage]) -> Result<()> {
        let mut seen: HashSet<&str> = HashSet::new();
        for page in pages {
            if !seen.insert(&page.file_name) {
                warn!(file = %page.file_name, "multiple posts render to the same file; overwriting");
            }
            self.write_file(&page.file_name, &page.content)?;
        }
        Ok(())
    }

    fn write_file(&self, file_name: &str, contents: &str) -> Result<()> {
        let path = self.output_directory.join(file_name);
        debug!(path = %path.display(), "writing");
        std::fs::write(&path, contents).map_err(|err| Error::Write { path, err })
    }
}

/// The result of a fallible page-writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug)]
pub enum Error {
    /// Returned when the output directory can't be created.
    CreateDir { path: PathBuf, err: io::Error },

    /// Returned when an output file can't be written.
    Write { path: PathBuf, err: io::Error },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::CreateDir { path, err } => {
                write!(f, "Creating directory '{}': {}", path.display(), err)
            }
            Error::Write { path, err } => {
                write!(f, "Writing file '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::CreateDir { path: _, err } => Some(err),
            Error::Write { path: _, err } => Some(err),
        }
    }
}
