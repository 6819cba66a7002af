//! Utility functions for logging and file system checks.

use std::error::Error;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

const WRITE_CHECK_FILE: &str = ".news_dedup_write_check";

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and byte count
/// appended. Counts characters, not bytes, so Hangul is never split.
///
/// # Examples
///
/// ```
/// use news_dedup::utils::truncate_for_log;
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log("환율급등", 2), "환율…(+6 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then writes and deletes a
/// scratch file in it.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or is not writable.
#[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
pub async fn ensure_writable_dir(path: impl AsRef<Path>) -> Result<(), Box<dyn Error>> {
    let path = path.as_ref();
    fs::create_dir_all(path).await?;
    let scratch = path.join(WRITE_CHECK_FILE);
    stdfs::File::create(&scratch)?;
    let _ = stdfs::remove_file(&scratch);
    info!("Output directory is writable");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log_counts_hangul_characters() {
        // Exactly `max` characters: untouched, even though it is 6 bytes.
        assert_eq!(truncate_for_log("환율", 2), "환율");
        // The remainder " 기사" is 7 bytes.
        assert_eq!(truncate_for_log("조선일보 기사", 4), "조선일보…(+7 bytes)");

        let title = "외환당국 구두개입".repeat(20);
        let result = truncate_for_log(&title, 40);
        let kept: String = title.chars().take(40).collect();
        assert!(result.starts_with(&kept));
        assert!(result.ends_with(&format!("…(+{} bytes)", title.len() - kept.len())));
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates_nested() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/c");
        ensure_writable_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
        assert!(!nested.join(WRITE_CHECK_FILE).exists());
    }
}
