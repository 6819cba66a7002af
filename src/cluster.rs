//! Greedy single-seed clustering over a [`SimilarityMatrix`].
//!
//! # Order dependence
//!
//! Positions are visited in input order. Each unclaimed position seeds a
//! cluster made of every still-unclaimed position whose similarity *to the
//! seed* exceeds the threshold. Claimed positions are never re-examined, so
//! the first seed wins: re-ordering the input can change which articles end
//! up together even when the pairwise similarities are unchanged. This is a
//! known asymmetry kept for output compatibility; it is not a transitive
//! closure and must not be "fixed" into one.

use crate::similarity::SimilarityMatrix;
use tracing::{debug, instrument};

/// A cluster of article positions within one keyword group, in position order.
pub type Cluster = Vec<usize>;

/// Partition every position of `matrix` into clusters.
///
/// # Arguments
///
/// * `matrix` - Pairwise similarities of one keyword group
/// * `threshold` - Similarity a position must exceed to join a seed
///
/// # Returns
///
/// Seeded clusters in seed order, then leftover singletons in position
/// order. Each cluster lists its positions in ascending order.
///
/// Membership is `matrix[seed][j] > threshold`, strictly. The seed joins its
/// own cluster through the unit diagonal whenever `threshold < 1`. Positions
/// left unclaimed after the pass become singletons, in position order.
#[instrument(level = "debug", skip_all, fields(size = matrix.len(), threshold = threshold))]
pub fn cluster(matrix: &SimilarityMatrix, threshold: f64) -> Vec<Cluster> {
    let size = matrix.len();
    let mut claimed = vec![false; size];
    let mut clusters = Vec::new();

    for seed in 0..size {
        if claimed[seed] {
            continue;
        }
        let members: Cluster = matrix
            .row(seed)
            .iter()
            .enumerate()
            .filter(|&(j, &score)| !claimed[j] && score > threshold)
            .map(|(j, _)| j)
            .collect();
        if members.is_empty() {
            continue;
        }
        for &j in &members {
            claimed[j] = true;
        }
        debug!(seed, members = ?members, "Seeded cluster");
        clusters.push(members);
    }

    clusters.extend((0..size).filter(|&i| !claimed[i]).map(|i| vec![i]));
    clusters
}

/// One singleton cluster per position; used when similarity is undefined.
pub fn singletons(size: usize) -> Vec<Cluster> {
    (0..size).map(|i| vec![i]).collect()
}
