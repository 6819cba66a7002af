//! TF-IDF vector space and cosine similarity over one keyword group.
//!
//! The vocabulary is shared by all bodies of the group and pruned by document
//! frequency: terms seen in only one body are noise, terms seen in nearly
//! every body are boilerplate (wire-service credit lines, bylines). Weights
//! use smoothed IDF, `ln((1 + n) / (1 + df)) + 1`, on raw term counts, and
//! every row is L2-normalised so the dot product is the cosine.

use crate::normalize::normalize;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, instrument};

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w\w+").expect("static regex is valid"));

/// Document-frequency pruning bounds for the vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct VectorizerParams {
    /// Minimum number of bodies a term must appear in.
    pub min_df: usize,
    /// Maximum fraction of bodies a term may appear in.
    pub max_df: f64,
    /// Upper bound on vocabulary size; the most frequent terms are kept.
    pub max_features: usize,
}

impl Default for VectorizerParams {
    fn default() -> Self {
        Self {
            min_df: 2,
            max_df: 0.95,
            max_features: 10_000,
        }
    }
}

impl VectorizerParams {
    /// Bounds that keep every term; used for two-document comparison.
    pub fn unpruned() -> Self {
        Self {
            min_df: 1,
            max_df: 1.0,
            max_features: 10_000,
        }
    }
}

/// Why a similarity matrix could not be built for a set of bodies.
#[derive(Debug, Error, PartialEq)]
pub enum SimilarityError {
    #[error("need at least 2 non-empty bodies, got {0}")]
    TooFewDocuments(usize),
    #[error("empty vocabulary; bodies contain no usable terms")]
    EmptyVocabulary,
    #[error("no terms remain after pruning (min_df={min_df}, max_df={max_df}, documents={documents})")]
    NoTermsAfterPruning {
        min_df: usize,
        max_df: f64,
        documents: usize,
    },
}

/// Square, symmetric cosine-similarity matrix with unit diagonal.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    size: usize,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    fn identity(size: usize) -> Self {
        let mut values = vec![0.0; size * size];
        for i in 0..size {
            values[i * size + i] = 1.0;
        }
        Self { size, values }
    }

    /// Number of rows (and columns).
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Similarity between positions `i` and `j`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.size + j]
    }

    /// All similarities of position `i`.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.size..(i + 1) * self.size]
    }

    fn set_symmetric(&mut self, i: usize, j: usize, value: f64) {
        self.values[i * self.size + j] = value;
        self.values[j * self.size + i] = value;
    }
}

/// Split normalized text into terms of two or more word characters.
pub fn tokenize(text: &str) -> Vec<&str> {
    TOKEN.find_iter(text).map(|m| m.as_str()).collect()
}

/// Build the pairwise similarity matrix for `bodies`, in input order.
///
/// # Errors
///
/// Returns a [`SimilarityError`] when fewer than two bodies carry any terms,
/// or when document-frequency pruning leaves an empty vocabulary. Callers
/// treat this as "similarity undefined" for the group.
#[instrument(level = "debug", skip_all, fields(documents = bodies.len()))]
pub fn build_similarity_matrix<S: AsRef<str>>(
    bodies: &[S],
    params: &VectorizerParams,
) -> Result<SimilarityMatrix, SimilarityError> {
    let normalized: Vec<String> = bodies.iter().map(|b| normalize(b.as_ref())).collect();
    let term_counts: Vec<BTreeMap<&str, usize>> = normalized
        .iter()
        .map(|text| {
            let mut counts = BTreeMap::new();
            for token in tokenize(text) {
                *counts.entry(token).or_insert(0) += 1;
            }
            counts
        })
        .collect();

    let non_empty = term_counts.iter().filter(|c| !c.is_empty()).count();
    if non_empty < 2 {
        return Err(SimilarityError::TooFewDocuments(non_empty));
    }

    let vocabulary = build_vocabulary(&term_counts, params)?;
    let documents = bodies.len() as f64;
    let vectors: Vec<Vec<f64>> = term_counts
        .iter()
        .map(|counts| {
            let mut row = vec![0.0; vocabulary.len()];
            for (term, &count) in counts {
                if let Some(&(column, df)) = vocabulary.get(term) {
                    let idf = ((1.0 + documents) / (1.0 + df as f64)).ln() + 1.0;
                    row[column] = count as f64 * idf;
                }
            }
            l2_normalize(&mut row);
            row
        })
        .collect();

    let mut matrix = SimilarityMatrix::identity(bodies.len());
    for i in 0..vectors.len() {
        for j in (i + 1)..vectors.len() {
            let dot: f64 = vectors[i]
                .iter()
                .zip(&vectors[j])
                .map(|(a, b)| a * b)
                .sum();
            matrix.set_symmetric(i, j, dot.clamp(0.0, 1.0));
        }
    }

    debug!(terms = vocabulary.len(), "Built similarity matrix");
    Ok(matrix)
}

/// Cosine similarity of two bodies, in `[0, 1]`.
///
/// Uses the same normalization as [`build_similarity_matrix`] but no
/// document-frequency pruning: with only two documents the group bounds
/// would discard every term. Returns `0.0` when either body is empty or has
/// no usable terms.
pub fn pairwise_similarity(a: &str, b: &str) -> f64 {
    if normalize(a).is_empty() || normalize(b).is_empty() {
        return 0.0;
    }
    match build_similarity_matrix(&[a, b], &VectorizerParams::unpruned()) {
        Ok(matrix) => matrix.get(0, 1),
        Err(e) => {
            debug!(error = %e, "Pairwise similarity undefined");
            0.0
        }
    }
}

/// Map each kept term to its column and document frequency.
fn build_vocabulary<'a>(
    term_counts: &[BTreeMap<&'a str, usize>],
    params: &VectorizerParams,
) -> Result<BTreeMap<&'a str, (usize, usize)>, SimilarityError> {
    let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
    let mut corpus_frequency: BTreeMap<&str, usize> = BTreeMap::new();
    for counts in term_counts {
        for (&term, &count) in counts {
            *document_frequency.entry(term).or_insert(0) += 1;
            *corpus_frequency.entry(term).or_insert(0) += count;
        }
    }
    if document_frequency.is_empty() {
        return Err(SimilarityError::EmptyVocabulary);
    }

    let max_doc_count = params.max_df * term_counts.len() as f64;
    let mut kept: Vec<(&str, usize)> = document_frequency
        .into_iter()
        .filter(|&(_, df)| df >= params.min_df && df as f64 <= max_doc_count)
        .collect();

    if kept.len() > params.max_features {
        // Most frequent across the corpus first; the sort is stable so ties keep term order.
        kept.sort_by(|a, b| corpus_frequency[b.0].cmp(&corpus_frequency[a.0]));
        kept.truncate(params.max_features);
        kept.sort_by(|a, b| a.0.cmp(b.0));
    }

    if kept.is_empty() {
        return Err(SimilarityError::NoTermsAfterPruning {
            min_df: params.min_df,
            max_df: params.max_df,
            documents: term_counts.len(),
        });
    }

    Ok(kept
        .into_iter()
        .enumerate()
        .map(|(column, (term, df))| (term, (column, df)))
        .collect())
}

fn l2_normalize(row: &mut [f64]) {
    let norm = row.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > 0.0 {
        row.iter_mut().for_each(|x| *x /= norm);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "원달러 환율이 장중 1400원을 돌파했다 외환당국은 시장 상황을 예의주시하고 있다";

    #[test]
    fn test_tokenize_drops_single_characters() {
        assert_eq!(tokenize("환율 급등 및 1 24"), vec!["환율", "급등", "24"]);
    }

    #[test]
    fn test_matrix_is_symmetric_with_unit_diagonal() {
        let bodies = [
            BASE,
            "원달러 환율이 장중 1400원을 돌파했다 외환당국은 시장 상황을 주시한다",
            "기준금리 동결 결정에 시장 반응 엇갈려 채권 금리 하락",
            "기준금리 동결 이후 채권 금리 하락 전망",
        ];
        let m = build_similarity_matrix(&bodies, &VectorizerParams::default()).unwrap();

        assert_eq!(m.len(), 4);
        for i in 0..4 {
            assert_eq!(m.get(i, i), 1.0);
            for j in 0..4 {
                assert_eq!(m.get(i, j), m.get(j, i));
                assert!((0.0..=1.0).contains(&m.get(i, j)));
            }
        }
        assert!(m.get(0, 1) > 0.9);
        assert!(m.get(0, 2) < 0.1);
        assert!(m.get(2, 3) > 0.5);
        assert_eq!(m.row(1).len(), 4);
    }

    #[test]
    fn test_terms_in_every_body_are_pruned() {
        // "환율" appears in all three bodies and carries no weight.
        let bodies = ["환율 상승 수출", "환율 상승 수입", "환율 금리"];
        let m = build_similarity_matrix(&bodies, &VectorizerParams::default()).unwrap();
        assert!((m.get(0, 1) - 1.0).abs() < 1e-9);
        assert_eq!(m.get(0, 2), 0.0);
    }

    #[test]
    fn test_too_few_non_empty_bodies() {
        let bodies = ["환율 급등", "", "Reuters only"];
        assert_eq!(
            build_similarity_matrix(&bodies, &VectorizerParams::default()),
            Err(SimilarityError::TooFewDocuments(1))
        );
    }

    #[test]
    fn test_no_shared_terms_is_undefined() {
        let bodies = ["환율 급등", "금리 동결", "주가 하락"];
        let err = build_similarity_matrix(&bodies, &VectorizerParams::default()).unwrap_err();
        assert!(matches!(err, SimilarityError::NoTermsAfterPruning { documents: 3, .. }));
    }

    #[test]
    fn test_max_features_keeps_most_frequent_terms() {
        let params = VectorizerParams {
            max_features: 1,
            ..VectorizerParams::default()
        };
        // "환율" (count 4) beats "금리" and "주가" (count 2 each) for the single slot.
        let bodies = ["환율 환율 금리", "환율 환율 금리 주가", "주가 지수"];
        let m = build_similarity_matrix(&bodies, &params).unwrap();
        assert!((m.get(0, 1) - 1.0).abs() < 1e-9);
        assert_eq!(m.get(0, 2), 0.0);
    }

    #[test]
    fn test_pairwise_similarity() {
        assert!((pairwise_similarity(BASE, BASE) - 1.0).abs() < 1e-9);
        assert!(pairwise_similarity(BASE, "기준금리 동결 결정") < 0.01);
        assert_eq!(pairwise_similarity("", BASE), 0.0);
        assert_eq!(pairwise_similarity(BASE, "English only"), 0.0);
    }

    #[test]
    fn test_pairwise_similarity_is_symmetric_and_bounded() {
        let other = "원달러 환율이 1400원을 넘어섰다 당국 개입 경계";
        let ab = pairwise_similarity(BASE, other);
        let ba = pairwise_similarity(other, BASE);
        assert!((ab - ba).abs() < 1e-12);
        assert!(ab > 0.0 && ab < 1.0);
    }
}
