//! Renders [`Post`]s into capsule pages.

use crate::config::Site;
use crate::gemtext::transform_links;
use crate::index::IndexEntry;
use crate::post::Post;
use crate::template::{self, render};
use crate::url::Converter as LinkConverter;
use crate::value::{date, site_fields};
use chrono::NaiveDate;
use gtmpl::{Template, Value};
use std::fmt;
use std::path::PathBuf;

const GEMTEXT_EXTENSION: &str = "gmi";

/// A fully rendered post page, ready to be written to disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedPage {
    /// The page's file name within the output directory.
    pub file_name: String,
    pub title: String,
    pub date: NaiveDate,

    /// The page's Gemtext.
    pub content: String,
}

impl RenderedPage {
    /// Projects the page onto its line in the index.
    pub fn index_entry(&self) -> IndexEntry {
        IndexEntry {
            file_name: self.file_name.clone(),
            date: self.date,
            title: self.title.clone(),
        }
    }
}

/// Responsible for turning [`Post`]s into [`RenderedPage`]s.
pub struct Renderer<'a> {
    /// The site values made available to the template.
    pub site: &'a Site,

    /// The template for post pages.
    pub template: &'a Template,

    /// Rewrites link targets found in post bodies.
    pub link_converter: LinkConverter<'a>,
}

impl<'a> Renderer<'a> {
    pub fn new(site: &'a Site, template: &'a Template) -> Renderer<'a> {
        Renderer {
            site,
            template,
            link_converter: LinkConverter::new(&site.capsule_url, &site.web_url),
        }
    }

    /// Converts the post's links and renders it with the post template.
    pub fn render(&self, post: &Post) -> Result<RenderedPage> {
        let file_name = output_file_name(post)?;
        let body = transform_links(&post.body, &self.link_converter);

        let mut m = site_fields(self.site);
        m.insert("title".to_owned(), Value::String(post.title.clone()));
        m.insert("date".to_owned(), date(post.date));
        m.insert("body".to_owned(), Value::String(body));

        Ok(RenderedPage {
            file_name,
            title: post.title.clone(),
            date: post.date,
            content: render(self.template, Value::Object(m))?,
        })
    }
}

/// The output file name for a post: the base name of the post's directory
/// with a `.gmi` extension. Posts in `content/posts/hello/index.md` render to
/// `hello.gmi`.
pub fn output_file_name(post: &Post) -> Result<String> {
    let invalid = || InvalidFileNameError(post.source_path.clone());
    let dir_name = post
        .directory()
        .and_then(|dir| dir.file_name())
        .ok_or_else(invalid)?
        .to_str()
        .ok_or_else(invalid)?;
    Ok(format!("{}.{}", dir_name, GEMTEXT_EXTENSION))
}

#[derive(Debug)]
pub struct InvalidFileNameError(PathBuf);

impl fmt::Display for InvalidFileNameError {
    /// Displays an [`InvalidFileNameError`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "can't derive a page name from {:?}", &self.0)
    }
}

impl std::error::Error for InvalidFileNameError {
    /// Implements the [`std::error::Error`] trait for [`InvalidFileNameError`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

/// The result of a fallible page-rendering operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error rendering a page.
#[derive(Debug)]
pub enum Error {
    /// Returned when the post's directory name can't be used as a file name.
    InvalidFileName(InvalidFileNameError),

    /// Returned for errors executing the post template.
    Template(template::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidFileName(err) => err.fmt(f),
            Error::Template(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidFileName(err) => Some(err),
            Error::Template(err) => Some(err),
        }
    }
}

impl From<InvalidFileNameError> for Error {
    fn from(err: InvalidFileNameError) -> Error {
        Error::InvalidFileName(err)
    }
}

impl From<template::Error> for Error {
    /// Converts a [`template::Error`] into an [`Error`]. This allows us to use
    /// the `?` operator for fallible template operations.
    fn from(err: template::Error) -> Error {
        Error::Template(err)
    }
}
