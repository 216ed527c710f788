use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use url::Url;

/// The name of the project file searched for by [`Config::from_directory`].
pub const PROJECT_FILE: &str = "capsule.yaml";

#[derive(Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct Project {
    capsule_url: Option<String>,
    web_url: Option<String>,
    email: Option<String>,
    feed_url: Option<String>,
    site_name: Option<String>,
    content_directory: Option<PathBuf>,
    output_directory: Option<PathBuf>,
    post_template: Option<PathBuf>,
    index_template: Option<PathBuf>,
}

/// The site-wide values which appear in links and page templates. URLs are
/// stored without a trailing slash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Site {
    pub capsule_url: String,
    pub web_url: String,
    pub email: String,
    pub feed_url: String,
    pub site_name: String,
}

impl Default for Site {
    fn default() -> Self {
        Site {
            capsule_url: String::from("gemini://gmi.runtimeterror.dev"),
            web_url: String::from("https://runtimeterror.dev"),
            email: String::from("blog@runtimeterror.dev"),
            feed_url: String::from("https://runtimeterror.dev/feed.xml"),
            site_name: String::from("[runtimeterror]"),
        }
    }
}

#[derive(Debug)]
pub struct Config {
    pub site: Site,
    pub content_directory: PathBuf,
    pub output_directory: PathBuf,
    pub post_template: Option<PathBuf>,
    pub index_template: Option<PathBuf>,
}

impl Config {
    /// Looks for a [`PROJECT_FILE`] in `dir` and then in each of its parents.
    /// If none is found, the defaults apply relative to `dir`.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let mut current = Some(dir);
        while let Some(candidate) = current {
            let path = candidate.join(PROJECT_FILE);
            if path.exists() {
                return Config::from_project_file(&path)
                    .with_context(|| format!("Loading configuration `{}`", path.display()));
            }
            current = candidate.parent();
        }
        Config::from_project(Project::default(), dir)
    }

    pub fn from_project_file(path: &Path) -> Result<Config> {
        let file = File::open(path)
            .with_context(|| format!("Opening project file `{}`", path.display()))?;
        let project: Project = serde_yaml::from_reader(file)?;
        match path.parent() {
            None => Err(anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )),
            Some(project_root) => Config::from_project(project, project_root),
        }
    }

    fn from_project(project: Project, project_root: &Path) -> Result<Config> {
        let defaults = Site::default();
        Ok(Config {
            site: Site {
                capsule_url: origin(project.capsule_url, defaults.capsule_url, "capsule_url")?,
                web_url: origin(project.web_url, defaults.web_url, "web_url")?,
                email: project.email.unwrap_or(defaults.email),
                feed_url: checked_url(project.feed_url, defaults.feed_url, "feed_url")?,
                site_name: project.site_name.unwrap_or(defaults.site_name),
            },
            content_directory: project_root
                .join(project.content_directory.unwrap_or_else(|| PathBuf::from("content"))),
            output_directory: project_root
                .join(project.output_directory.unwrap_or_else(|| PathBuf::from("capsule"))),
            post_template: project.post_template.map(|p| project_root.join(p)),
            index_template: project.index_template.map(|p| project_root.join(p)),
        })
    }
}

/// Validates a configured URL, falling back to `default` when unset.
fn checked_url(value: Option<String>, default: String, field: &str) -> Result<String> {
    let value = value.unwrap_or(default);
    Url::parse(&value).with_context(|| format!("Invalid `{}`: `{}`", field, value))?;
    Ok(value)
}

/// Like [`checked_url`], but also strips any trailing slash since origins get
/// paths appended to them and are matched as prefixes.
fn origin(value: Option<String>, default: String, field: &str) -> Result<String> {
    Ok(checked_url(value, default, field)?.trim_end_matches('/').to_owned())
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_project_file() -> Result<()> {
        let tmp = TempDir::new()?;
        let config = Config::from_directory(tmp.path())?;
        assert_eq!(Site::default(), config.site);
        assert_eq!(tmp.path().join("content"), config.content_directory);
        assert_eq!(tmp.path().join("capsule"), config.output_directory);
        assert_eq!(None, config.post_template);
        Ok(())
    }

    #[test]
    fn test_project_file_in_parent() -> Result<()> {
        let tmp = TempDir::new()?;
        fs::write(
            tmp.path().join(PROJECT_FILE),
            "capsule_url: gemini://example.org/\n\
             web_url: https://example.org/\n\
             site_name: Example\n\
             output_directory: public/gemini\n\
             index_template: theme/index.tmpl\n",
        )?;
        let nested = tmp.path().join("a/b");
        fs::create_dir_all(&nested)?;

        let config = Config::from_directory(&nested)?;
        assert_eq!("gemini://example.org", config.site.capsule_url);
        assert_eq!("https://example.org", config.site.web_url);
        assert_eq!("Example", config.site.site_name);
        assert_eq!(Site::default().email, config.site.email);
        assert_eq!(tmp.path().join("content"), config.content_directory);
        assert_eq!(tmp.path().join("public/gemini"), config.output_directory);
        assert_eq!(
            Some(tmp.path().join("theme/index.tmpl")),
            config.index_template
        );
        Ok(())
    }

    #[test]
    fn test_invalid_url() -> Result<()> {
        let tmp = TempDir::new()?;
        fs::write(tmp.path().join(PROJECT_FILE), "web_url: not a url\n")?;
        assert!(Config::from_directory(tmp.path()).is_err());
        Ok(())
    }

    #[test]
    fn test_unknown_field() -> Result<()> {
        let tmp = TempDir::new()?;
        fs::write(tmp.path().join(PROJECT_FILE), "posts_per_page: 10\n")?;
        assert!(Config::from_directory(tmp.path()).is_err());
        Ok(())
    }
}
