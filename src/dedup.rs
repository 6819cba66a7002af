//! Per-keyword deduplication pipeline.
//!
//! Articles are partitioned by keyword in first-seen order. Each group is
//! clustered on body similarity and every cluster is reduced to its
//! representatives; groups too small to cluster pass through untouched.
//! Nothing is carried from one group to the next.
//!
//! The engine never fails: a group whose similarity cannot be computed falls
//! back to singleton clusters, which keeps every one of its articles.

use crate::cluster::{cluster, singletons, Cluster};
use crate::config::DedupConfig;
use crate::models::Article;
use crate::outlets::OutletDirectory;
use crate::select::select_positions;
use crate::similarity::build_similarity_matrix;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};

/// How a keyword group was processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupOutcome {
    /// Below `min_group_size`; passed through.
    Bypassed,
    /// Clustered and reduced to representatives.
    Clustered,
    /// Similarity undefined; every article kept as its own cluster.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupReport {
    pub keyword: String,
    pub input: usize,
    pub output: usize,
    pub clusters: usize,
    pub outcome: GroupOutcome,
}

/// Per-group statistics of one run, in keyword discovery order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DedupReport {
    pub groups: Vec<GroupReport>,
}

impl DedupReport {
    pub fn input_total(&self) -> usize {
        self.groups.iter().map(|g| g.input).sum()
    }

    pub fn output_total(&self) -> usize {
        self.groups.iter().map(|g| g.output).sum()
    }

    pub fn count(&self, outcome: GroupOutcome) -> usize {
        self.groups.iter().filter(|g| g.outcome == outcome).count()
    }
}

/// The deduplication engine: a validated config plus its outlet table.
#[derive(Debug, Clone)]
pub struct Deduplicator {
    config: DedupConfig,
    directory: OutletDirectory,
}

impl Deduplicator {
    pub fn new(config: DedupConfig) -> Self {
        let directory = config.outlet_directory();
        Self { config, directory }
    }

    pub fn config(&self) -> &DedupConfig {
        &self.config
    }

    /// Reduce `articles` to their representatives.
    pub fn deduplicate(&self, articles: Vec<Article>) -> Vec<Article> {
        self.deduplicate_with_report(articles).0
    }

    /// Reduce `articles` and describe what happened to each keyword group.
    ///
    /// # Arguments
    ///
    /// * `articles` - The whole batch, in crawler order
    ///
    /// # Returns
    ///
    /// The reduced batch, keyword groups in discovery order, together with a
    /// [`DedupReport`] holding one entry per keyword group. Similarity
    /// failures never surface here: the affected group is kept whole and
    /// reported as [`GroupOutcome::Fallback`].
    #[instrument(level = "info", skip_all, fields(articles = articles.len()))]
    pub fn deduplicate_with_report(&self, articles: Vec<Article>) -> (Vec<Article>, DedupReport) {
        let mut output = Vec::with_capacity(articles.len());
        let mut report = DedupReport::default();

        for (keyword, mut group) in group_by_keyword(articles) {
            if self.config.sort_by_recency {
                sort_newest_first(&mut group);
            }
            let input = group.len();
            let (kept, clusters, outcome) = self.process_group(&keyword, group);
            info!(
                %keyword,
                input,
                output = kept.len(),
                clusters,
                ?outcome,
                "Processed keyword group"
            );
            report.groups.push(GroupReport {
                keyword,
                input,
                output: kept.len(),
                clusters,
                outcome,
            });
            output.extend(kept);
        }

        info!(
            input = report.input_total(),
            output = report.output_total(),
            groups = report.groups.len(),
            "Deduplication complete"
        );
        (output, report)
    }

    fn process_group(
        &self,
        keyword: &str,
        group: Vec<Article>,
    ) -> (Vec<Article>, usize, GroupOutcome) {
        if group.len() < self.config.min_group_size {
            debug!(%keyword, size = group.len(), "Group below clustering floor; passing through");
            return (group, 0, GroupOutcome::Bypassed);
        }

        let bodies: Vec<&str> = group.iter().map(|a| a.body.as_str()).collect();
        let (clusters, outcome) = match build_similarity_matrix(&bodies, &self.config.vectorizer) {
            Ok(matrix) => (
                cluster(&matrix, self.config.similarity_threshold),
                GroupOutcome::Clustered,
            ),
            Err(e) => {
                warn!(%keyword, error = %e, "Similarity undefined; keeping every article");
                (singletons(group.len()), GroupOutcome::Fallback)
            }
        };

        let picks = self.select_all(&group, &clusters);
        let cluster_count = clusters.len();
        let mut slots: Vec<Option<Article>> = group.into_iter().map(Some).collect();
        let kept = picks.into_iter().filter_map(|p| slots[p].take()).collect();
        (kept, cluster_count, outcome)
    }

    /// Group positions of every cluster's representatives, in cluster order.
    fn select_all(&self, group: &[Article], clusters: &[Cluster]) -> Vec<usize> {
        clusters
            .iter()
            .enumerate()
            .flat_map(|(index, members)| {
                let articles: Vec<&Article> = members.iter().map(|&p| &group[p]).collect();
                let chosen = select_positions(&articles, &self.directory, &self.config);
                debug!(cluster = index, size = members.len(), chosen = chosen.len(), "Selected representatives");
                chosen.into_iter().map(|i| members[i]).collect::<Vec<_>>()
            })
            .collect()
    }
}

/// Reduce `articles` with `config`; see [`Deduplicator`].
pub fn deduplicate(articles: Vec<Article>, config: &DedupConfig) -> Vec<Article> {
    Deduplicator::new(config.clone()).deduplicate(articles)
}

/// Partition by keyword, keeping first-seen group order and input order within groups.
fn group_by_keyword(articles: Vec<Article>) -> Vec<(String, Vec<Article>)> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<Article>)> = Vec::new();
    for article in articles {
        match index.get(&article.keyword) {
            Some(&i) => groups[i].1.push(article),
            None => {
                index.insert(article.keyword.clone(), groups.len());
                groups.push((article.keyword.clone(), vec![article]));
            }
        }
    }
    groups
}

/// Stable newest-first sort; articles with unparseable dates go last.
///
/// Running this before clustering makes the first-seed-wins rule favour the
/// most recent article of a similar set.
fn sort_newest_first(group: &mut [Article]) {
    group.sort_by_cached_key(|a| std::cmp::Reverse(parse_published_at(&a.published_at)));
}

/// Offset of the crawler's local timestamps (KST).
const CRAWLER_OFFSET_SECS: i32 = 9 * 3600;

/// Parse the timestamp formats the crawler has been seen to write.
///
/// Timestamps without an offset are taken as KST. RFC 3339 timestamps are
/// converted to KST so both kinds compare on one clock.
pub fn parse_published_at(raw: &str) -> Option<NaiveDateTime> {
    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y.%m.%d %H:%M:%S",
        "%Y.%m.%d %H:%M",
        "%Y.%m.%d. %H:%M",
    ];
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y.%m.%d", "%Y.%m.%d."];

    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return FixedOffset::east_opt(CRAWLER_OFFSET_SECS).map(|kst| dt.with_timezone(&kst).naive_local());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(raw, f).ok())
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}
