//! Reading crawler batch files.
//!
//! The crawler writes one JSON array of article records per run. Records
//! that are not JSON objects are skipped with a warning rather than failing
//! the batch; a file whose root is not an array is an error.

use crate::models::Article;
use serde_json::Value;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument, warn};

/// Parse a batch document into articles, in input order.
pub fn parse_articles(json: &str) -> Result<Vec<Article>, Box<dyn Error>> {
    let root: Value = serde_json::from_str(json)?;
    let Value::Array(records) = root else {
        return Err("expected a JSON array of article records".into());
    };

    let total = records.len();
    let articles: Vec<Article> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match record {
            Value::Object(map) => Some(Article::from_record(map)),
            other => {
                warn!(index, kind = json_kind(&other), "Skipping non-object record");
                None
            }
        })
        .collect();

    if articles.len() < total {
        warn!(skipped = total - articles.len(), "Some records were not objects");
    }
    Ok(articles)
}

/// Read and parse the batch file at `path`.
///
/// # Arguments
///
/// * `path` - Crawler batch file holding a JSON array of article records
///
/// # Returns
///
/// The articles in file order. Records that are not JSON objects are skipped.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid JSON, or its
/// root is not an array.
#[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
pub async fn read_articles(path: impl AsRef<Path>) -> Result<Vec<Article>, Box<dyn Error>> {
    let json = fs::read_to_string(path.as_ref()).await?;
    let articles = parse_articles(&json)?;
    info!(count = articles.len(), bytes = json.len(), "Loaded articles");
    Ok(articles)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_articles_skips_non_objects() {
        let json = r#"[
            {"keyword": "환율", "outlet": "조선일보", "body": "환율 급등"},
            "garbage",
            null,
            {"키워드": "금리", "신문사": "경향신문", "내용": "금리 동결"}
        ]"#;
        let articles = parse_articles(json).unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].keyword, "환율");
        assert_eq!(articles[1].outlet, "경향신문");
    }

    #[test]
    fn test_parse_articles_rejects_non_array_root() {
        assert!(parse_articles(r#"{"keyword": "환율"}"#).is_err());
        assert!(parse_articles("not json").is_err());
    }

    #[test]
    fn test_parse_empty_batch() {
        assert!(parse_articles("[]").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_read_articles_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch.json");
        tokio::fs::write(&path, r#"[{"keyword": "환율", "body": "본문 없음"}]"#)
            .await
            .unwrap();

        let articles = read_articles(&path).await.unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].body, "본문 없음");

        assert!(read_articles(dir.path().join("missing.json")).await.is_err());
    }
}
