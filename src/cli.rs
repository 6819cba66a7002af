//! Command-line interface definitions for News Dedup.
//!
//! All arguments can be provided via command-line flags or environment
//! variables. Tuning flags override the matching keys of the YAML config.

use crate::config::DedupConfig;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the News Dedup application.
///
/// # Examples
///
/// ```sh
/// # Basic usage with the built-in outlet table
/// news_dedup -i temp_news_data.json -o news_data.json
///
/// # With a config file and a stricter threshold
/// news_dedup -i in.json -o out.json -c dedup.yaml --threshold 0.7
///
/// # Newest-first seeding and a per-keyword report
/// news_dedup -i in.json -o out.json --sort-by-recency --report report.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// JSON array of scraped article records
    #[arg(short, long, env = "NEWS_DEDUP_INPUT")]
    pub input: PathBuf,

    /// Where to write the deduplicated JSON array
    #[arg(short, long, env = "NEWS_DEDUP_OUTPUT")]
    pub output: PathBuf,

    /// Optional path to a YAML config file
    #[arg(short, long, env = "NEWS_DEDUP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Optional path for a per-keyword JSON report
    #[arg(long, env = "NEWS_DEDUP_REPORT")]
    pub report: Option<PathBuf>,

    /// Cosine similarity above which two bodies are duplicates
    #[arg(long, env = "NEWS_DEDUP_THRESHOLD")]
    pub threshold: Option<f64>,

    /// Articles kept per cluster
    #[arg(long)]
    pub min_representatives: Option<usize>,

    /// Length margin a longer body needs to beat a better-ranked outlet
    #[arg(long)]
    pub dominance_ratio: Option<f64>,

    /// Seed clusters from the newest article first
    #[arg(long)]
    pub sort_by_recency: bool,
}

impl Cli {
    /// Apply tuning flags on top of a loaded config.
    pub fn apply_overrides(&self, config: &mut DedupConfig) {
        if let Some(threshold) = self.threshold {
            config.similarity_threshold = threshold;
        }
        if let Some(minimum) = self.min_representatives {
            config.minimum_representatives = minimum;
        }
        if let Some(ratio) = self.dominance_ratio {
            config.length_dominance_ratio = ratio;
        }
        if self.sort_by_recency {
            config.sort_by_recency = true;
        }
    }
}
