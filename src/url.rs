//! Converts link targets found in post bodies into capsule link targets.
//! Links which point back into the website (either relative paths or
//! absolute URLs under the web origin) are rewritten into `.gmi` paths under
//! the capsule origin; everything else passes through untouched.

const WEB_SCHEME_PREFIX: &str = "http";
const GEMTEXT_EXTENSION: &str = ".gmi";

/// Where a link target points.
#[derive(Debug, PartialEq, Eq)]
pub enum Target<'a> {
    /// A path on the website. The web origin has already been removed.
    Internal(String),

    /// An absolute URL on some other site.
    External(&'a str),
}

pub struct Converter<'a> {
    capsule_url: &'a str,
    web_url: &'a str,
}

impl<'a> Converter<'a> {
    /// Constructs a new `Converter`
    ///
    /// # Arguments
    ///
    /// * `capsule_url` - the capsule origin, without a trailing slash.
    /// * `web_url` - the website origin, without a trailing slash.
    pub fn new(capsule_url: &'a str, web_url: &'a str) -> Converter<'a> {
        Converter {
            capsule_url,
            web_url,
        }
    }

    /// Decides whether `url` is internal or external. A URL is internal if
    /// it isn't a web URL at all or if it begins with the web origin. Note
    /// that every occurrence of the web origin is removed from internal
    /// URLs, not just the leading one.
    pub fn classify<'u>(&self, url: &'u str) -> Target<'u> {
        if !url.starts_with(WEB_SCHEME_PREFIX) || url.starts_with(self.web_url) {
            Target::Internal(url.replace(self.web_url, ""))
        } else {
            Target::External(url)
        }
    }

    /// Builds the capsule URL for an internal path.
    pub fn capsule_path(&self, path: &str) -> String {
        format!("{}/{}{}", self.capsule_url, slug(path), GEMTEXT_EXTENSION)
    }

    pub fn convert(&self, url: &str) -> String {
        match self.classify(url) {
            Target::Internal(path) => self.capsule_path(&path),
            Target::External(url) => url.to_owned(),
        }
    }
}

/// Flattens a site path into a single file stem: slashes become spaces, the
/// result is trimmed, and the remaining spaces become hyphens. So
/// `/posts/hello/` becomes `posts-hello`.
pub fn slug(path: &str) -> String {
    path.replace('/', " ").trim().replace(' ', "-")
}

#[cfg(test)]
mod test {
    use super::*;

    const CAPSULE_URL: &str = "gemini://gmi.runtimeterror.dev";
    const WEB_URL: &str = "https://runtimeterror.dev";

    #[test]
    fn test_convert_absolute_internal() {
        fixture(
            "gemini://gmi.runtimeterror.dev/about.gmi",
            "https://runtimeterror.dev/about",
        )
    }

    #[test]
    fn test_convert_absolute_internal_nested() {
        fixture(
            "gemini://gmi.runtimeterror.dev/posts-hello-world.gmi",
            "https://runtimeterror.dev/posts/hello-world/",
        )
    }

    #[test]
    fn test_convert_relative() {
        fixture(
            "gemini://gmi.runtimeterror.dev/posts-hello.gmi",
            "/posts/hello",
        )
    }

    #[test]
    fn test_convert_relative_without_leading_slash() {
        fixture("gemini://gmi.runtimeterror.dev/hello.gmi", "hello")
    }

    #[test]
    fn test_convert_relative_with_spaces() {
        fixture(
            "gemini://gmi.runtimeterror.dev/a-b-c.gmi",
            "/a b/c",
        )
    }

    #[test]
    fn test_convert_external() {
        fixture("https://example.com/y", "https://example.com/y")
    }

    #[test]
    fn test_convert_external_plain_http() {
        fixture("http://example.com/", "http://example.com/")
    }

    #[test]
    fn test_convert_external_echoing_web_origin() {
        // Not a prefix, so the URL is external and left alone.
        fixture(
            "https://example.com/?ref=https://runtimeterror.dev",
            "https://example.com/?ref=https://runtimeterror.dev",
        )
    }

    #[test]
    fn test_classify_removes_every_web_origin() {
        let converter = Converter::new(CAPSULE_URL, WEB_URL);
        assert_eq!(
            Target::Internal(String::from("/a?next=/b")),
            converter.classify(
                "https://runtimeterror.dev/a?next=https://runtimeterror.dev/b"
            ),
        );
    }

    #[test]
    fn test_classify_external() {
        let converter = Converter::new(CAPSULE_URL, WEB_URL);
        assert_eq!(
            Target::External("https://example.com"),
            converter.classify("https://example.com"),
        );
    }

    #[test]
    fn test_slug() {
        assert_eq!("about", slug("/about"));
        assert_eq!("posts-foo", slug("/posts/foo/"));
        assert_eq!("", slug("/"));
    }

    fn fixture(wanted: &str, target: &str) {
        assert_eq!(wanted, Converter::new(CAPSULE_URL, WEB_URL).convert(target));
    }
}
