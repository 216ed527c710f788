//! Builds the capsule's index page: every post, newest first.

use crate::config::Site;
use crate::template::{render, Result};
use crate::value::site_fields;
use chrono::NaiveDate;
use gtmpl::{Template, Value};

/// The file name of the index page within the output directory.
pub const INDEX_FILE: &str = "index.gmi";

/// One line of the index page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexEntry {
    pub file_name: String,
    pub date: NaiveDate,
    pub title: String,
}

/// Sorts `entries` newest first. The sort is stable, so entries with the same
/// date keep the order in which their posts were discovered.
pub fn sort_entries(entries: &mut [IndexEntry]) {
    entries.sort_by(|a, b| b.date.cmp(&a.date));
}

/// Sorts `entries` and renders the index page with `template`.
pub fn render_index(
    site: &Site,
    template: &Template,
    mut entries: Vec<IndexEntry>,
) -> Result<String> {
    sort_entries(&mut entries);
    let mut m = site_fields(site);
    m.insert(
        "entries".to_owned(),
        Value::Array(entries.iter().map(Value::from).collect()),
    );
    render(template, Value::Object(m))
}
