//! Defines the [`Parser`] and [`Error`] types and the logic for loading
//! [`Post`]s from the content tree into memory.

use std::{
    fmt,
    fs::File,
    path::Path,
};

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::post::{Post, DATE_FORMAT};

/// The name of the file which marks a directory as a post.
pub const ENTRY_FILE: &str = "index.md";

/// Parses [`Post`] objects from a content tree.
pub struct Parser<'a> {
    /// The root of the content tree. Every directory below it (itself
    /// included) which contains an [`ENTRY_FILE`] is a post.
    content_directory: &'a Path,
}

impl<'a> Parser<'a> {
    /// Constructs a new parser. See fields on [`Parser`] for argument
    /// descriptions.
    pub fn new(content_directory: &'a Path) -> Parser<'a> {
        Parser { content_directory }
    }

    /// Walks the content directory and returns the posts in discovery order:
    /// depth-first, parents before children, siblings sorted by name. The
    /// order matters since it breaks ties between posts with the same date
    /// on the index page.
    ///
    /// Each entry file must be structured as follows:
    ///
    /// 1. Initial frontmatter fence (`---`)
    /// 2. YAML frontmatter with fields `title` and `date`
    /// 3. Terminal frontmatter fence (`---`)
    /// 4. Post body
    ///
    /// For example:
    ///
    /// ```md
    /// ---
    /// title: Hello, world!
    /// date: 2021-04-16T08:30:00-05:00
    /// ---
    /// # Hello
    ///
    /// World
    /// ```
    pub fn parse_posts(&self) -> Result<Vec<Post>> {
        let mut posts = Vec::new();
        for result in WalkDir::new(self.content_directory)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()))
        {
            let entry = result?;
            if Self::is_bundle(&entry) {
                posts.push(self.parse_post(&entry.path().join(ENTRY_FILE))?);
            }
        }
        Ok(posts)
    }

    fn is_bundle(entry: &DirEntry) -> bool {
        entry.file_type().is_dir() && entry.path().join(ENTRY_FILE).is_file()
    }

    /// Parses a single [`Post`] from the entry file at `path`. Errors are
    /// annotated with the path.
    pub fn parse_post(&self, path: &Path) -> Result<Post> {
        match Self::_parse_post(path) {
            Ok(post) => {
                debug!(path = %path.display(), date = %post.date, "parsed post");
                Ok(post)
            }
            Err(e) => Err(Error::Annotated(
                format!("parsing post `{}`", path.display()),
                Box::new(e),
            )),
        }
    }

    fn _parse_post(path: &Path) -> Result<Post> {
        use std::io::Read;
        let mut contents = String::new();
        File::open(path)?.read_to_string(&mut contents)?;
        let input = contents.trim_start_matches('\u{feff}');

        let (yaml_start, yaml_stop, body_start) = frontmatter_indices(input)?;
        let frontmatter: Frontmatter =
            serde_yaml::from_str(&input[yaml_start..yaml_stop])?;

        Ok(Post {
            source_path: path.to_owned(),
            title: frontmatter.title,
            date: parse_date(&frontmatter.date)?,
            body: input[body_start..]
                .trim_matches(|c: char| c == '\n' || c == '\r')
                .to_owned(),
        })
    }
}

/// Locates the frontmatter in `input`. Returns the start and end of the YAML
/// block and the start of the body. Both fences must be lines consisting of
/// `---` alone.
fn frontmatter_indices(input: &str) -> Result<(usize, usize, usize)> {
    const FENCE: &str = "---";
    let mut lines = input.split_inclusive('\n');
    let yaml_start = match lines.next() {
        Some(line) if line.trim_end() == FENCE => line.len(),
        _ => return Err(Error::FrontmatterMissingStartFence),
    };

    let mut offset = yaml_start;
    for line in lines {
        if line.trim_end() == FENCE {
            return Ok((
                yaml_start,          // yaml_start
                offset,              // yaml_stop
                offset + line.len(), // body_start
            ));
        }
        offset += line.len();
    }
    Err(Error::FrontmatterMissingEndFence)
}

/// Parses a frontmatter date. The value must begin with `YYYY-MM-DD`; a time
/// component separated by `T` or a space is dropped.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    let date = match value.find(|c: char| c == 'T' || c == ' ') {
        Some(i) => &value[..i],
        None => value,
    };
    NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|err| Error::InvalidDate {
        value: value.to_owned(),
        err,
    })
}

#[derive(Deserialize, Clone)]
struct Frontmatter {
    /// The title of the post.
    pub title: String,

    /// The date of the post, as an ISO date optionally followed by a time.
    pub date: String,
}

/// Represents the result of a [`Post`]-parse operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error parsing a [`Post`] object.
#[derive(Debug)]
pub enum Error {
    /// Returned when a post source file is missing its starting frontmatter
    /// fence (`---`).
    FrontmatterMissingStartFence,

    /// Returned when a post source file is missing its terminal frontmatter
    /// fence (`---` i.e., the starting fence was found but the ending one was
    /// missing).
    FrontmatterMissingEndFence,

    /// Returned when there was an error parsing the frontmatter as YAML,
    /// including when `title` or `date` is missing.
    DeserializeYaml(serde_yaml::Error),

    /// Returned when the frontmatter date doesn't start with `YYYY-MM-DD`.
    InvalidDate {
        value: String,
        err: chrono::ParseError,
    },

    /// Returned for other I/O errors.
    Io(std::io::Error),

    /// Returned for WalkDir I/O errors.
    WalkDir(walkdir::Error),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::FrontmatterMissingStartFence => {
                write!(f, "Post must begin with `---`")
            }
            Error::FrontmatterMissingEndFence => {
                write!(f, "Missing closing `---`")
            }
            Error::DeserializeYaml(err) => err.fmt(f),
            Error::InvalidDate { value, err } => {
                write!(f, "invalid date `{}`: {}", value, err)
            }
            Error::Io(err) => err.fmt(f),
            Error::WalkDir(err) => err.fmt(f),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FrontmatterMissingStartFence => None,
            Error::FrontmatterMissingEndFence => None,
            Error::DeserializeYaml(err) => Some(err),
            Error::InvalidDate { value: _, err } => Some(err),
            Error::Io(err) => Some(err),
            Error::WalkDir(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

impl From<walkdir::Error> for Error {
    /// Converts a [`walkdir::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator while walking the content tree.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_post(root: &Path, dir: &str, contents: &str) -> std::io::Result<()> {
        let dir = root.join(dir);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(ENTRY_FILE), contents)
    }

    #[test]
    fn test_parse_posts() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let tmp = TempDir::new()?;
        write_post(
            tmp.path(),
            "posts/simple",
            "---\ntitle: Simple\ndate: 2021-04-16\n---\n\nToday is the first day.\n",
        )?;

        let posts = Parser::new(tmp.path()).parse_posts()?;

        let wanted = vec![Post {
            source_path: tmp.path().join("posts/simple").join(ENTRY_FILE),
            title: String::from("Simple"),
            date: NaiveDate::from_ymd_opt(2021, 4, 16).unwrap(),
            body: String::from("Today is the first day."),
        }];
        assert_eq!(wanted, posts);
        Ok(())
    }

    #[test]
    fn test_parse_posts_discovery_order() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let tmp = TempDir::new()?;
        let post = |title: &str| format!("---\ntitle: {}\ndate: 2024-01-01\n---\nbody\n", title);
        write_post(tmp.path(), "b", &post("b"))?;
        write_post(tmp.path(), "a", &post("a"))?;
        write_post(tmp.path(), "a/nested", &post("a/nested"))?;
        write_post(tmp.path(), "c", &post("c"))?;
        fs::create_dir_all(tmp.path().join("no-entry"))?;
        fs::write(tmp.path().join("no-entry/README.md"), "not a post")?;

        let titles: Vec<String> = Parser::new(tmp.path())
            .parse_posts()?
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(vec!["a", "a/nested", "b", "c"], titles);
        Ok(())
    }

    #[test]
    fn test_parse_posts_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("missing");
        match Parser::new(&missing).parse_posts() {
            Err(Error::WalkDir(_)) => {}
            other => panic!("expected walk error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_post_missing_title() -> std::io::Result<()> {
        let tmp = TempDir::new()?;
        write_post(tmp.path(), "p", "---\ndate: 2024-01-01\n---\nbody\n")?;
        let err = Parser::new(tmp.path())
            .parse_posts()
            .expect_err("missing title should fail");
        match err {
            Error::Annotated(annotation, inner) => {
                assert!(annotation.contains(ENTRY_FILE));
                assert!(matches!(*inner, Error::DeserializeYaml(_)));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_parse_post_bad_date() -> std::io::Result<()> {
        let tmp = TempDir::new()?;
        write_post(tmp.path(), "p", "---\ntitle: t\ndate: June 1st\n---\nbody\n")?;
        match Parser::new(tmp.path()).parse_posts() {
            Err(Error::Annotated(_, inner)) => {
                assert!(matches!(*inner, Error::InvalidDate { .. }))
            }
            other => panic!("unexpected result: {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_parse_date() -> Result<()> {
        let wanted = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        assert_eq!(wanted, parse_date("2023-06-01")?);
        assert_eq!(wanted, parse_date("2023-06-01T10:15:00-05:00")?);
        assert_eq!(wanted, parse_date("2023-06-01 10:15:00")?);
        assert_eq!(wanted, parse_date(" 2023-06-01 ")?);
        assert!(parse_date("06/01/2023").is_err());
        assert!(parse_date("2023-13-01").is_err());
        assert!(parse_date("").is_err());
        Ok(())
    }

    #[test]
    fn test_frontmatter_indices() -> Result<()> {
        let input = "---\ntitle: x\n---\nbody --- here\n";
        let (yaml_start, yaml_stop, body_start) = frontmatter_indices(input)?;
        assert_eq!("title: x\n", &input[yaml_start..yaml_stop]);
        assert_eq!("body --- here\n", &input[body_start..]);
        Ok(())
    }

    #[test]
    fn test_frontmatter_indices_crlf() -> Result<()> {
        let input = "---\r\ntitle: x\r\n---\r\nbody";
        let (yaml_start, yaml_stop, body_start) = frontmatter_indices(input)?;
        assert_eq!("title: x\r\n", &input[yaml_start..yaml_stop]);
        assert_eq!("body", &input[body_start..]);
        Ok(())
    }

    #[test]
    fn test_frontmatter_missing_fences() {
        assert!(matches!(
            frontmatter_indices("title: x\n"),
            Err(Error::FrontmatterMissingStartFence)
        ));
        assert!(matches!(
            frontmatter_indices("---\ntitle: x\n"),
            Err(Error::FrontmatterMissingEndFence)
        ));
    }
}
