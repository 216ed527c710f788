use crate::config::Site;
use crate::index::IndexEntry;
use crate::post::DATE_FORMAT;
use chrono::NaiveDate;
use gtmpl::Value;
use std::collections::HashMap;

/// Template fields shared by every page.
pub fn site_fields(site: &Site) -> HashMap<String, Value> {
    let mut m: HashMap<String, Value> = HashMap::new();
    m.insert("capsule_url".to_owned(), Value::String(site.capsule_url.clone()));
    m.insert("web_url".to_owned(), Value::String(site.web_url.clone()));
    m.insert("email".to_owned(), Value::String(site.email.clone()));
    m.insert("feed_url".to_owned(), Value::String(site.feed_url.clone()));
    m.insert("site_name".to_owned(), Value::String(site.site_name.clone()));
    m
}

pub fn date(date: NaiveDate) -> Value {
    Value::String(date.format(DATE_FORMAT).to_string())
}

impl From<&IndexEntry> for Value {
    fn from(entry: &IndexEntry) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("file_name".to_owned(), Value::String(entry.file_name.clone()));
        m.insert("date".to_owned(), date(entry.date));
        m.insert("title".to_owned(), Value::String(entry.title.clone()));
        Value::Object(m)
    }
}
