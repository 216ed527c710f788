//! Exports the [`build_capsule`] function which stitches together the
//! high-level steps of building the capsule: parsing the posts
//! ([`crate::parser`]), rendering post pages ([`crate::page`]) and the index
//! ([`crate::index`]), and writing everything to disk ([`crate::write`]).

use crate::config::Config;
use crate::index::render_index;
use crate::page::{Error as PageError, RenderedPage, Renderer};
use crate::parser::{Error as ParseError, Parser as PostParser};
use crate::template::{
    parse_template, Error as TemplateError, DEFAULT_INDEX_TEMPLATE, DEFAULT_POST_TEMPLATE,
};
use crate::write::{Error as WriteError, Writer};
use std::fmt;
use tracing::info;

/// What a build produced.
#[derive(Debug, PartialEq, Eq)]
pub struct Summary {
    /// The number of post pages written, not counting the index.
    pub pages: usize,
}

/// Builds the capsule from a [`Config`] object. Every page and the index are
/// rendered in memory before anything is written, so a bad post leaves the
/// output directory untouched.
pub fn build_capsule(config: &Config) -> Result<Summary> {
    let posts = PostParser::new(&config.content_directory).parse_posts()?;

    // Parse the template files.
    let post_template = parse_template(config.post_template.as_deref(), DEFAULT_POST_TEMPLATE)?;
    let index_template =
        parse_template(config.index_template.as_deref(), DEFAULT_INDEX_TEMPLATE)?;

    let renderer = Renderer::new(&config.site, &post_template);
    let mut pages: Vec<RenderedPage> = Vec::with_capacity(posts.len());
    let mut entries = Vec::with_capacity(posts.len());
    for post in &posts {
        let page = renderer.render(post).map_err(|e| {
            Error::Annotated(
                format!("rendering post `{}`", post.source_path.display()),
                Box::new(Error::Page(e)),
            )
        })?;
        info!(file = %page.file_name, title = %page.title, "rendered post");
        entries.push(page.index_entry());
        pages.push(page);
    }
    let index = render_index(&config.site, &index_template, entries)?;

    Writer {
        output_directory: &config.output_directory,
    }
    .write_capsule(&pages, &index)?;

    info!(
        pages = pages.len(),
        output = %config.output_directory.display(),
        "built capsule"
    );
    Ok(Summary { pages: pages.len() })
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building a capsule. Errors can be during parsing,
/// templating, rendering or writing.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors during parsing.
    Parse(ParseError),

    /// Returned for errors loading or executing templates.
    Template(TemplateError),

    /// Returned for errors rendering [`crate::post::Post`]s into pages.
    Page(PageError),

    /// Returned for errors writing pages to disk.
    Write(WriteError),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Parse(err) => err.fmt(f),
            Error::Template(err) => err.fmt(f),
            Error::Page(err) => err.fmt(f),
            Error::Write(err) => err.fmt(f),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(err) => Some(err),
            Error::Template(err) => Some(err),
            Error::Page(err) => Some(err),
            Error::Write(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<ParseError> for Error {
    /// Converts [`ParseError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: ParseError) -> Error {
        Error::Parse(err)
    }
}

impl From<TemplateError> for Error {
    /// Converts [`TemplateError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: TemplateError) -> Error {
        Error::Template(err)
    }
}

impl From<PageError> for Error {
    /// Converts [`PageError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: PageError) -> Error {
        Error::Page(err)
    }
}

impl From<WriteError> for Error {
    /// Converts [`WriteError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: WriteError) -> Error {
        Error::Write(err)
    }
}
