//! Engine configuration loaded from a YAML file.
//!
//! Every field has a default, so an empty file (or no file at all) gives the
//! production behaviour: threshold 0.5, three representatives per cluster,
//! a 20% length-dominance ratio and the 보수/진보/경제 outlet table.
//!
//! ```yaml
//! similarity_threshold: 0.5
//! minimum_representatives: 3
//! length_dominance_ratio: 0.2
//! sort_by_recency: true
//! fill_policy: distinct_group
//! vectorizer:
//!   min_df: 2
//!   max_df: 0.95
//!   max_features: 10000
//! placeholder_markers: ["본문 없음", "[크롤링 에러]"]
//! outlet_groups:
//!   - name: 보수
//!     members: { 조선일보: 1, 중앙일보: 2, 동아일보: 3 }
//! outlet_codes:
//!   "1": 조선일보
//! ```

use crate::outlets::{OutletDirectory, OutletGroup};
use crate::similarity::VectorizerParams;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{info, instrument};

/// Which leftover articles may top a cluster's selection up to the minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FillPolicy {
    /// Skip outlets already selected and outlet-groups already represented.
    #[default]
    DistinctGroup,
    /// Skip only outlets already selected.
    DistinctOutlet,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Tunables of the deduplication engine.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DedupConfig {
    /// Cosine similarity above which two bodies cover the same story.
    pub similarity_threshold: f64,
    /// Articles kept per cluster when the cluster is large enough.
    pub minimum_representatives: usize,
    /// Fraction of the longest body by which it must beat the runner-up to
    /// win regardless of outlet priority.
    pub length_dominance_ratio: f64,
    /// Keyword groups smaller than this pass through untouched.
    pub min_group_size: usize,
    /// Sort each keyword group newest-first before clustering.
    pub sort_by_recency: bool,
    pub fill_policy: FillPolicy,
    pub vectorizer: VectorizerParams,
    /// Prefixes a scraper writes in place of a body it failed to extract.
    pub placeholder_markers: Vec<String>,
    /// Outlet-groups in selection order.
    pub outlet_groups: Vec<OutletGroup>,
    /// Outlet code to outlet name.
    pub outlet_codes: BTreeMap<String, String>,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.5,
            minimum_representatives: 3,
            length_dominance_ratio: 0.2,
            min_group_size: 3,
            sort_by_recency: false,
            fill_policy: FillPolicy::default(),
            vectorizer: VectorizerParams::default(),
            placeholder_markers: vec!["본문 없음".to_string(), "[크롤링 에러]".to_string()],
            outlet_groups: OutletDirectory::default().groups().to_vec(),
            outlet_codes: BTreeMap::new(),
        }
    }
}

impl DedupConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML config file.
    ///
    /// Keys missing from the file keep their built-in defaults; an empty file
    /// yields [`DedupConfig::default`].
    ///
    /// # Errors
    ///
    /// * [`ConfigError::Read`] if the file cannot be read
    /// * [`ConfigError::Yaml`] if it is not a valid config document
    /// * [`ConfigError::Invalid`] if a tunable is out of range
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let config = Self::from_yaml_str(&yaml)?;
        info!(
            groups = config.outlet_groups.len(),
            codes = config.outlet_codes.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Check every tunable is within its meaningful range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return invalid(format!(
                "similarity_threshold must be within [0, 1], got {}",
                self.similarity_threshold
            ));
        }
        if !(0.0..1.0).contains(&self.length_dominance_ratio) {
            return invalid(format!(
                "length_dominance_ratio must be within [0, 1), got {}",
                self.length_dominance_ratio
            ));
        }
        if self.minimum_representatives == 0 {
            return invalid("minimum_representatives must be at least 1".into());
        }
        if self.min_group_size == 0 {
            return invalid("min_group_size must be at least 1".into());
        }
        let v = &self.vectorizer;
        if v.min_df == 0 || v.max_features == 0 || !(v.max_df > 0.0 && v.max_df <= 1.0) {
            return invalid(format!(
                "vectorizer needs min_df >= 1, max_features >= 1 and max_df within (0, 1], got {v:?}"
            ));
        }

        let mut names = BTreeSet::new();
        for group in &self.outlet_groups {
            if group.name.trim().is_empty() {
                return invalid("outlet group names must not be empty".into());
            }
            if !names.insert(group.name.as_str()) {
                return invalid(format!("duplicate outlet group {:?}", group.name));
            }
        }
        Ok(())
    }

    /// Build the immutable outlet table this config describes.
    pub fn outlet_directory(&self) -> OutletDirectory {
        OutletDirectory::new(self.outlet_groups.clone(), self.outlet_codes.clone())
    }

    /// Whether `body` is a scraper placeholder rather than article text.
    pub fn is_placeholder(&self, body: &str) -> bool {
        let body = body.trim();
        self.placeholder_markers
            .iter()
            .any(|marker| !marker.is_empty() && body.starts_with(marker.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outlets::Priority;

    #[test]
    fn test_defaults() {
        let config = DedupConfig::default();
        assert_eq!(config.similarity_threshold, 0.5);
        assert_eq!(config.minimum_representatives, 3);
        assert_eq!(config.length_dominance_ratio, 0.2);
        assert_eq!(config.min_group_size, 3);
        assert_eq!(config.fill_policy, FillPolicy::DistinctGroup);
        assert_eq!(config.outlet_groups.len(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(DedupConfig::from_yaml_str("").unwrap(), DedupConfig::default());
        assert_eq!(DedupConfig::from_yaml_str("{}").unwrap(), DedupConfig::default());
    }

    #[test]
    fn test_partial_yaml_overrides() {
        let yaml = r#"
similarity_threshold: 0.3
sort_by_recency: true
fill_policy: distinct_outlet
vectorizer:
  min_df: 1
outlet_groups:
  - name: 방송
    members:
      KBS: 1
      MBC: 2
outlet_codes:
  "11": KBS
"#;
        let config = DedupConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.similarity_threshold, 0.3);
        assert!(config.sort_by_recency);
        assert_eq!(config.fill_policy, FillPolicy::DistinctOutlet);
        assert_eq!(config.vectorizer.min_df, 1);
        assert_eq!(config.vectorizer.max_df, 0.95);
        assert_eq!(config.minimum_representatives, 3);

        let dir = config.outlet_directory();
        let c = dir.classify("11");
        assert_eq!(c.group, Some("방송"));
        assert_eq!(c.priority, Priority::Rank(1));
        assert_eq!(dir.classify("조선일보").group, None);
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        for yaml in [
            "similarity_threshold: 1.5",
            "length_dominance_ratio: 1.0",
            "minimum_representatives: 0",
            "min_group_size: 0",
            "vectorizer: { max_df: 0.0 }",
            "vectorizer: { min_df: 0 }",
            "outlet_groups: [{ name: a, members: {} }, { name: a, members: {} }]",
        ] {
            let err = DedupConfig::from_yaml_str(yaml).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{yaml}: {err}");
        }
    }

    #[test]
    fn test_rejects_malformed_yaml() {
        let err = DedupConfig::from_yaml_str("similarity_threshold: [").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_placeholder_detection() {
        let config = DedupConfig::default();
        assert!(config.is_placeholder("본문 없음"));
        assert!(config.is_placeholder("  [크롤링 에러] 요청 실패: timeout"));
        assert!(!config.is_placeholder("원달러 환율이 급등했다"));
        assert!(!config.is_placeholder(""));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        tokio::fs::write(&path, "minimum_representatives: 2\n").await.unwrap();

        let config = DedupConfig::load(&path).await.unwrap();
        assert_eq!(config.minimum_representatives, 2);

        let missing = DedupConfig::load(dir.path().join("nope.yaml")).await;
        assert!(matches!(missing, Err(ConfigError::Read { .. })));
    }
}
