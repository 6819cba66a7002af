//! Output generation for deduplicated batches.
//!
//! # Submodules
//!
//! - [`json`]: Writes the reduced article list and the run report as JSON
//!
//! # Output Structure
//!
//! ```text
//! output.json          # Reduced article records, same schema as the input
//! report.json          # Optional per-keyword statistics
//! ```

pub mod json;
