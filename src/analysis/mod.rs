//! Corpus aggregation and re-analysis of saved results.
//!
//! This module provides:
//! - CSV reading for previously written results
//! - Corpus metric aggregation (mean CER, accuracy, edit-operation totals)
//! - Console summary and JSON export

pub mod csv_reader;
pub mod export;
pub mod metrics;

pub use metrics::CorpusMetrics;

use std::path::Path;

use anyhow::{anyhow, Result};

use crate::config::EvalConfig;

/// Re-runs the aggregation over an existing results CSV: reads the file,
/// recomputes corpus metrics, prints the summary, and rewrites the metrics
/// JSON. No network access involved.
pub fn analyze_results(config: &EvalConfig) -> Result<()> {
    let csv_path = Path::new(&config.output_file);
    let results = csv_reader::read_results_csv(csv_path)?;
    if results.is_empty() {
        return Err(anyhow!("No results found in {}", csv_path.display()));
    }

    crate::log(&format!(
        "Loaded {} results from {}",
        results.len(),
        csv_path.display()
    ));

    let corpus = CorpusMetrics::from_results(&results);
    metrics::print_summary(&corpus);

    export::export_to_json(&corpus, Path::new(&config.metrics_file))?;
    crate::log(&format!("Metrics JSON saved: {}", config.metrics_file));

    Ok(())
}
