//! Data model for scraped news articles.
//!
//! An [`Article`] is read from one JSON object of the crawler's batch file.
//! The crawler writes either English keys or the Korean column names of the
//! source spreadsheet, so every field is looked up under both. The original
//! object is kept verbatim and written back on serialization: deduplication
//! only ever drops records, it never rewrites them.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::normalize::text_value;

const KEYWORD_KEYS: &[&str] = &["keyword", "키워드"];
const TITLE_KEYS: &[&str] = &["title", "제목"];
const LINK_KEYS: &[&str] = &["link", "링크"];
const PUBLISHED_AT_KEYS: &[&str] = &["publishedAt", "발행일"];
const OUTLET_KEYS: &[&str] = &["outlet", "신문사"];
const BODY_KEYS: &[&str] = &["body", "본문", "내용"];

/// A single scraped news article.
///
/// # Fields
///
/// * `keyword` - The search query the article was retrieved for
/// * `outlet` - Outlet name, or an outlet code resolved by the classifier
/// * `body` - Full text; may be empty or a scraper placeholder
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    /// The search query this article was retrieved for.
    pub keyword: String,
    /// The article headline.
    pub title: String,
    /// The article URL. Not enforced unique.
    pub link: String,
    /// Publication timestamp as written by the crawler.
    pub published_at: String,
    /// The publishing outlet.
    pub outlet: String,
    /// The scraped article text.
    pub body: String,
    record: Map<String, Value>,
}

impl Article {
    /// Build an article from a raw JSON object.
    ///
    /// Missing or non-string fields read as empty strings. Numbers are
    /// stringified for the text fields because outlets sometimes arrive as
    /// numeric codes; `body` only accepts strings.
    pub fn from_record(record: Map<String, Value>) -> Self {
        Self {
            keyword: lookup_text(&record, KEYWORD_KEYS),
            title: lookup_text(&record, TITLE_KEYS),
            link: lookup_text(&record, LINK_KEYS),
            published_at: lookup_text(&record, PUBLISHED_AT_KEYS),
            outlet: lookup_text(&record, OUTLET_KEYS),
            body: lookup_body(&record),
            record,
        }
    }

    /// Build an article from its fields, using English keys for the record.
    pub fn new(
        keyword: impl Into<String>,
        title: impl Into<String>,
        link: impl Into<String>,
        published_at: impl Into<String>,
        outlet: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        let mut record = Map::new();
        record.insert("keyword".into(), Value::String(keyword.into()));
        record.insert("title".into(), Value::String(title.into()));
        record.insert("link".into(), Value::String(link.into()));
        record.insert("publishedAt".into(), Value::String(published_at.into()));
        record.insert("outlet".into(), Value::String(outlet.into()));
        record.insert("body".into(), Value::String(body.into()));
        Self::from_record(record)
    }

    /// The JSON object this article was read from.
    pub fn record(&self) -> &Map<String, Value> {
        &self.record
    }
}

fn lookup_text(record: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|k| match record.get(*k) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_default()
}

/// First body column present; non-string bodies count as empty text.
fn lookup_body(record: &Map<String, Value>) -> String {
    text_value(BODY_KEYS.iter().find_map(|k| record.get(*k))).to_string()
}

impl Serialize for Article {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.record.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Article {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Map::deserialize(deserializer).map(Article::from_record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_keys() {
        let json = r#"{
            "keyword": "환율",
            "title": "원달러 환율 급등",
            "link": "https://example.com/1",
            "publishedAt": "2025-05-06 09:00",
            "outlet": "조선일보",
            "body": "환율이 급등했다"
        }"#;

        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.keyword, "환율");
        assert_eq!(article.outlet, "조선일보");
        assert_eq!(article.body, "환율이 급등했다");
        assert_eq!(article.published_at, "2025-05-06 09:00");
    }

    #[test]
    fn test_spreadsheet_column_names() {
        let json = r#"{
            "키워드": "금리",
            "제목": "기준금리 동결",
            "링크": "https://example.com/2",
            "발행일": "2025-05-06",
            "신문사": "한겨레신문",
            "내용": "한국은행이 기준금리를 동결했다"
        }"#;

        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.keyword, "금리");
        assert_eq!(article.title, "기준금리 동결");
        assert_eq!(article.link, "https://example.com/2");
        assert_eq!(article.outlet, "한겨레신문");
        assert_eq!(article.body, "한국은행이 기준금리를 동결했다");
    }

    #[test]
    fn test_malformed_fields_default_to_empty() {
        let json = r#"{"keyword": "환율", "outlet": 3, "body": null, "title": ["x"]}"#;

        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.outlet, "3");
        assert_eq!(article.body, "");
        assert_eq!(article.title, "");
        assert_eq!(article.link, "");
    }

    #[test]
    fn test_numeric_body_is_not_text() {
        let json = r#"{"keyword": "환율", "body": 42}"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.body, "");
    }

    #[test]
    fn test_serialization_preserves_record() {
        let json = r#"{"키워드":"금리","신문사":"매일경제","내용":"본문","extra":1}"#;
        let article: Article = serde_json::from_str(json).unwrap();

        let out = serde_json::to_value(&article).unwrap();
        let original: Value = serde_json::from_str(json).unwrap();
        assert_eq!(out, original);
    }

    #[test]
    fn test_new_uses_english_keys() {
        let article = Article::new("환율", "t", "l", "2025-01-01", "조선일보", "b");
        assert_eq!(article.record().get("outlet"), Some(&Value::from("조선일보")));
        assert_eq!(article.body, "b");
    }
}
