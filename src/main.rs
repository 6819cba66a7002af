//! # News Dedup
//!
//! Reads a crawler batch, collapses near-duplicate coverage per keyword and
//! writes the reduced batch in the same record format.
//!
//! ## Usage
//!
//! ```sh
//! news_dedup -i temp_news_data.json -o news_data.json
//! ```
//!
//! ## Pipeline
//!
//! 1. **Config**: built-in defaults, optional YAML file, CLI overrides
//! 2. **Input**: load the JSON array of article records
//! 3. **Dedup**: similarity clustering and representative selection per keyword
//! 4. **Output**: write the reduced array, and optionally the run report

use clap::Parser;
use news_dedup::cli::Cli;
use news_dedup::config::DedupConfig;
use news_dedup::dedup::{Deduplicator, GroupOutcome};
use news_dedup::inputs::read_articles;
use news_dedup::outputs::json;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_dedup starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.input, ?args.output, ?args.config, "Parsed CLI arguments");

    // ---- Load config ----
    let mut config = match &args.config {
        Some(path) => DedupConfig::load(path).await?,
        None => {
            info!("No config file given; using built-in outlet table");
            DedupConfig::default()
        }
    };
    args.apply_overrides(&mut config);
    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration after CLI overrides");
        return Err(e.into());
    }
    info!(
        threshold = config.similarity_threshold,
        minimum = config.minimum_representatives,
        dominance_ratio = config.length_dominance_ratio,
        sort_by_recency = config.sort_by_recency,
        "Configuration ready"
    );

    // ---- Read, dedup, write ----
    let articles = read_articles(&args.input).await?;
    let deduplicator = Deduplicator::new(config);
    let (reduced, report) = deduplicator.deduplicate_with_report(articles);

    let bytes = json::write_articles(&reduced, &args.output).await?;
    info!(path = %args.output.display(), bytes, "Wrote deduplicated batch");

    if let Some(report_path) = &args.report {
        if let Err(e) = json::write_report(&report, report_path).await {
            error!(path = %report_path.display(), error = %e, "Failed to write report");
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        input = report.input_total(),
        output = report.output_total(),
        clustered = report.count(GroupOutcome::Clustered),
        bypassed = report.count(GroupOutcome::Bypassed),
        fallback = report.count(GroupOutcome::Fallback),
        "Execution complete"
    );

    Ok(())
}
