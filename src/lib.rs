//! # News Dedup
//!
//! Reduces a crawler batch of Korean news articles to a small representative
//! set per search keyword. Near-duplicate coverage of the same event is
//! collapsed, while one article per editorial outlet-group (conservative,
//! progressive, financial press) is kept so the result stays balanced.
//!
//! ## Architecture
//!
//! Leaves first:
//! 1. [`normalize`]: canonical Hangul/digit text for vectorizing
//! 2. [`similarity`]: TF-IDF vectors and the cosine similarity matrix
//! 3. [`cluster`]: greedy first-seed-wins clustering
//! 4. [`outlets`]: outlet-group table and classifier
//! 5. [`select`]: per-cluster representative selection
//! 6. [`dedup`]: per-keyword orchestration
//!
//! [`config`], [`inputs`] and [`outputs`] handle configuration and batch files.
//!
//! ```
//! use news_dedup::{config::DedupConfig, dedup::deduplicate, models::Article};
//!
//! let articles = vec![
//!     Article::new("환율", "제목", "https://a", "", "조선일보", "원달러 환율 급등"),
//!     Article::new("환율", "제목", "https://b", "", "경향신문", "원달러 환율 급등"),
//! ];
//! // Fewer than three articles: nothing to deduplicate.
//! assert_eq!(deduplicate(articles.clone(), &DedupConfig::default()), articles);
//! ```

pub mod cli;
pub mod cluster;
pub mod config;
pub mod dedup;
pub mod inputs;
pub mod models;
pub mod normalize;
pub mod outlets;
pub mod outputs;
pub mod select;
pub mod similarity;
pub mod utils;
