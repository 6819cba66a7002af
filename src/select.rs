//! Representative selection within one cluster.
//!
//! Two business rules live here, both driven by [`DedupConfig`]:
//!
//! 1. **Viewpoint diversity.** Each outlet-group contributes at most one
//!    article, chosen for length. A body only beats a better-ranked outlet
//!    on length when it is longer by more than `length_dominance_ratio` of
//!    itself; within that margin the outlet's in-group priority decides.
//! 2. **Fill to minimum.** When fewer than `minimum_representatives` were
//!    picked, leftovers top the selection up, longest first.
//!
//! Length is the character count of the body as scraped, and scraper
//! placeholders count as zero, so a failed scrape never outranks real text.

use crate::config::{DedupConfig, FillPolicy};
use crate::models::Article;
use crate::outlets::{Classification, OutletDirectory, Priority};
use crate::utils::truncate_for_log;
use itertools::Itertools;
use std::cmp::Reverse;
use std::collections::BTreeSet;
use tracing::{debug, instrument};

#[derive(Debug)]
struct Candidate<'a> {
    position: usize,
    length: usize,
    outlet: &'a str,
    classification: Classification<'a>,
}

impl Candidate<'_> {
    fn group(&self) -> Option<&str> {
        self.classification.group
    }

    /// Longest first, then best priority, then cluster order.
    fn rank_key(&self) -> (Reverse<usize>, Priority, usize) {
        (Reverse(self.length), self.classification.priority, self.position)
    }
}

/// Length used to compare bodies: raw characters, zero for placeholders.
pub fn body_length(body: &str, config: &DedupConfig) -> usize {
    if config.is_placeholder(body) {
        0
    } else {
        body.chars().count()
    }
}

/// Pick the representatives of one cluster.
///
/// # Arguments
///
/// * `articles` - Members of one cluster, in cluster order
/// * `directory` - Outlet-group table used to classify each outlet
/// * `config` - Minimum count, dominance ratio, fill policy and placeholder markers
///
/// # Returns
///
/// The chosen articles in selection order: outlet-group picks in declared
/// group order first, then fill picks. No article appears twice and the
/// result never exceeds `minimum_representatives`.
pub fn select_from_cluster<'a>(
    articles: &[&'a Article],
    directory: &OutletDirectory,
    config: &DedupConfig,
) -> Vec<&'a Article> {
    select_positions(articles, directory, config)
        .into_iter()
        .map(|p| articles[p])
        .collect()
}

/// Like [`select_from_cluster`], returning positions into `articles`.
///
/// # Returns
///
/// Indices into `articles` in selection order. An empty cluster yields an
/// empty vector.
#[instrument(level = "debug", skip_all, fields(cluster_size = articles.len()))]
pub fn select_positions(
    articles: &[&Article],
    directory: &OutletDirectory,
    config: &DedupConfig,
) -> Vec<usize> {
    let minimum = config.minimum_representatives;
    let candidates: Vec<Candidate<'_>> = articles
        .iter()
        .enumerate()
        .map(|(position, article)| {
            Candidate {
                position,
                length: body_length(&article.body, config),
                outlet: directory.resolve(&article.outlet),
                classification: directory.classify(&article.outlet),
            }
        })
        .collect();

    let mut selected: Vec<&Candidate<'_>> = Vec::new();
    let mut used_groups: BTreeSet<&str> = BTreeSet::new();

    for group in directory.groups() {
        if selected.len() >= minimum {
            break;
        }
        let members: Vec<&Candidate<'_>> = candidates
            .iter()
            .filter(|c| c.group() == Some(group.name.as_str()))
            .sorted_by_key(|c| c.rank_key())
            .collect();
        if let Some(pick) = pick_from_group(&members, config.length_dominance_ratio) {
            debug!(
                group = %group.name,
                outlet = pick.outlet,
                title = %truncate_for_log(&articles[pick.position].title, 40),
                length = pick.length,
                candidates = members.len(),
                "Selected outlet-group representative"
            );
            used_groups.insert(group.name.as_str());
            selected.push(pick);
        }
    }

    if selected.len() < minimum {
        let taken: BTreeSet<usize> = selected.iter().map(|c| c.position).collect();
        let taken_outlets: BTreeSet<&str> = selected.iter().map(|c| c.outlet).collect();
        let fill: Vec<&Candidate<'_>> = candidates
            .iter()
            .filter(|c| !taken.contains(&c.position) && !taken_outlets.contains(c.outlet))
            .filter(|c| match (config.fill_policy, c.group()) {
                (FillPolicy::DistinctGroup, Some(g)) => !used_groups.contains(g),
                _ => true,
            })
            .sorted_by_key(|c| c.rank_key())
            .take(minimum - selected.len())
            .collect();
        for c in &fill {
            debug!(
                group = c.classification.group_name(),
                outlet = c.outlet,
                title = %truncate_for_log(&articles[c.position].title, 40),
                length = c.length,
                "Filled representative"
            );
        }
        selected.extend(fill);
    }

    selected.into_iter().map(|c| c.position).collect()
}

/// Choose one article from an outlet-group's members, sorted by `rank_key`.
fn pick_from_group<'c, 'a>(
    members: &[&'c Candidate<'a>],
    dominance_ratio: f64,
) -> Option<&'c Candidate<'a>> {
    let (&longest, rest) = members.split_first()?;
    let Some(runner_up) = rest.first() else {
        return Some(longest);
    };

    let margin = (longest.length - runner_up.length) as f64;
    if margin > dominance_ratio * longest.length as f64 {
        return Some(longest);
    }

    // Close call: best priority among the bodies within the dominance margin.
    let floor = (1.0 - dominance_ratio) * longest.length as f64;
    members
        .iter()
        .copied()
        .filter(|c| c.length as f64 >= floor)
        .min_by_key(|c| (c.classification.priority, Reverse(c.length), c.position))
}
