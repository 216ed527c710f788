//! Loads and executes the `gtmpl` templates used for post pages and the
//! index page. Both templates have built-in defaults; a project can point
//! at its own files instead.

use gtmpl::{Context, Template, Value};
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

/// The default post page. Available fields: `capsule_url`, `web_url`,
/// `email`, `feed_url`, `site_name`, `title`, `date` and `body`.
pub const DEFAULT_POST_TEMPLATE: &str = "\
=> {{.capsule_url}} 🏡 Home

# {{.title}}
## Posted on {{.date}}

{{.body}}

=> mailto:{{.email}} Reply via email
=> {{.capsule_url}} Back to home
";

/// The default index page. Available fields: the site fields listed on
/// [`DEFAULT_POST_TEMPLATE`] plus `entries`, each with `file_name`, `date` and
/// `title`.
pub const DEFAULT_INDEX_TEMPLATE: &str = "\
=> {{.capsule_url}} 🏡 Home

# {{.site_name}}

=> {{.feed_url}} 📲 Subscribe via RSS

{{range .entries}}=> {{.file_name}} {{.date}} - {{.title}}
{{end}}
=> {{.capsule_url}} 🏡 Home
";

/// Parses the template at `path`, or `default` if there is no path.
pub fn parse_template(path: Option<&Path>, default: &str) -> Result<Template> {
    let contents = match path {
        None => default.to_owned(),
        Some(path) => {
            use std::io::Read;
            let mut contents = String::new();
            File::open(path)
                .and_then(|mut file| file.read_to_string(&mut contents))
                .map_err(|err| Error::OpenTemplateFile {
                    path: path.to_owned(),
                    err,
                })?;
            contents
        }
    };

    let mut template = Template::default();
    template.parse(&contents).map_err(Error::Parse)?;
    Ok(template)
}

/// Executes `template` against `value` and returns the output text.
pub fn render(template: &Template, value: Value) -> Result<String> {
    let context = Context::from(value).map_err(Error::Execute)?;
    let mut output: Vec<u8> = Vec::new();
    template
        .execute(&mut output, &context)
        .map_err(Error::Execute)?;
    Ok(String::from_utf8(output)?)
}

/// The result of a fallible template operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading or executing a template.
#[derive(Debug)]
pub enum Error {
    /// Returned for I/O problems while opening template files.
    OpenTemplateFile { path: PathBuf, err: std::io::Error },

    /// Returned for errors parsing template files.
    Parse(String),

    /// Returned for errors executing a template.
    Execute(String),

    /// Returned when a template produces invalid UTF-8.
    Utf8(std::string::FromUtf8Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::OpenTemplateFile { path, err } => {
                write!(f, "Opening template file '{}': {}", path.display(), err)
            }
            Error::Parse(err) => write!(f, "Parsing template: {}", err),
            Error::Execute(err) => write!(f, "Executing template: {}", err),
            Error::Utf8(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::OpenTemplateFile { path: _, err } => Some(err),
            Error::Parse(_) => None,
            Error::Execute(_) => None,
            Error::Utf8(err) => Some(err),
        }
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(err: std::string::FromUtf8Error) -> Error {
        Error::Utf8(err)
    }
}
