//! Rewrites the inline links in a markdown body into Gemtext. Gemtext has no
//! inline links, only whole-line `=>` links, so each `[text](url)` becomes
//! `text [N]` and a `=> url N` line is emitted right after the line the link
//! appeared on.

use crate::url::Converter as LinkConverter;
use regex::Regex;
use std::sync::LazyLock;

const IMAGE_MARKER: &str = "![";
const LINK_MARKER: &str = "=>";

static INLINE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]\[]+)\]\(([^()]+)\)").unwrap());

/// A numbered reference to a link target, emitted as a Gemtext link line.
#[derive(Debug, PartialEq, Eq)]
pub struct LinkRef {
    pub number: usize,
    pub target: String,
}

impl LinkRef {
    pub fn to_line(&self) -> String {
        format!("{} {} {}", LINK_MARKER, self.target, self.number)
    }
}

/// Converts every inline link in `markdown` as described in the module docs.
/// Reference numbers start at 1 and keep counting across lines. Lines
/// starting with an image embed or an existing Gemtext link are left alone.
pub fn transform_links(markdown: &str, converter: &LinkConverter) -> String {
    let mut next_ref = 1;
    let mut lines: Vec<String> = Vec::new();
    for line in markdown.lines() {
        if line.starts_with(IMAGE_MARKER) || line.starts_with(LINK_MARKER) {
            lines.push(line.to_owned());
            continue;
        }

        let (line, refs) = transform_line(line, &mut next_ref, converter);
        lines.push(line);
        lines.extend(refs.iter().map(LinkRef::to_line));
    }
    lines.join("\n")
}

/// Rewrites the links on a single line, returning the rewritten line and the
/// references it produced. Matches are taken from the line as it was read;
/// the replacements are plain substring replacements, so a link repeated
/// verbatim on the same line is rewritten once with the first number.
fn transform_line(
    line: &str,
    next_ref: &mut usize,
    converter: &LinkConverter,
) -> (String, Vec<LinkRef>) {
    let mut out = line.to_owned();
    let mut refs = Vec::new();
    for caps in INLINE_LINK.captures_iter(line) {
        let (description, url) = (&caps[1], &caps[2]);
        out = out
            .replace(&format!("({})", url), &format!(" [{}]", next_ref))
            .replace(&format!("[{}]", description), description);
        refs.push(LinkRef {
            number: *next_ref,
            target: converter.convert(url),
        });
        *next_ref += 1;
    }
    (out, refs)
}
