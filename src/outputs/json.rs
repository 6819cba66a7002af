//! JSON output for deduplicated batches.
//!
//! Articles are written back as the exact records they were read from, in
//! pipeline order, pretty-printed with Hangul kept as UTF-8. The run report
//! is an optional side file for whoever schedules the crawler.

use crate::dedup::DedupReport;
use crate::models::Article;
use crate::utils::ensure_writable_dir;
use serde::Serialize;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Write the reduced article list to `path`.
///
/// # Arguments
///
/// * `articles` - Articles to write, in pipeline order
/// * `path` - Destination file; its parent directory is created when needed
///
/// # Returns
///
/// The number of bytes written.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or written to,
/// or if the file write fails.
#[instrument(level = "info", skip_all, fields(path = %path.as_ref().display(), articles = articles.len()))]
pub async fn write_articles(
    articles: &[Article],
    path: impl AsRef<Path>,
) -> Result<usize, Box<dyn Error>> {
    write_pretty(articles, path.as_ref()).await
}

/// Write the per-keyword report of a run to `path`.
#[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
pub async fn write_report(
    report: &DedupReport,
    path: impl AsRef<Path>,
) -> Result<usize, Box<dyn Error>> {
    write_pretty(report, path.as_ref()).await
}

async fn write_pretty<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<usize, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(value)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_writable_dir(parent).await?;
    }

    fs::write(path, &json).await?;
    info!(path = %path.display(), bytes = json.len(), "Wrote JSON file");
    Ok(json.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedup::{GroupOutcome, GroupReport};

    #[tokio::test]
    async fn test_write_articles_round_trips_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.json");
        let input = r#"[{"키워드":"환율","신문사":"조선일보","내용":"환율 급등"}]"#;
        let articles: Vec<Article> = serde_json::from_str(input).unwrap();

        let bytes = write_articles(&articles, &path).await.unwrap();
        let written = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(bytes, written.len());
        assert!(written.contains("환율 급등"), "Hangul must not be escaped");

        let reread: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(reread, serde_json::from_str::<serde_json::Value>(input).unwrap());
    }

    #[tokio::test]
    async fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let report = DedupReport {
            groups: vec![GroupReport {
                keyword: "환율".into(),
                input: 5,
                output: 3,
                clusters: 2,
                outcome: GroupOutcome::Clustered,
            }],
        };

        write_report(&report, &path).await.unwrap();
        let written: serde_json::Value =
            serde_json::from_str(&tokio::fs::read_to_string(&path).await.unwrap()).unwrap();
        assert_eq!(written["groups"][0]["outcome"], "clustered");
        assert_eq!(written["groups"][0]["output"], 3);
    }
}
