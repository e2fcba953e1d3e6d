//! CSV writer for evaluation results.
//!
//! One row per processed image: file name, ground truth, best prediction,
//! and the CER score formatted to 4 decimal places.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::OcrResult;

/// CSV header row.
pub const CSV_HEADER: &str = "image,ground_truth,prediction,CER_score";

/// Writes all results to a CSV file, header included, UTF-8 encoded.
pub fn write_results_csv(path: &Path, results: &[OcrResult]) -> Result<()> {
    let mut file = File::create(path)
        .context(format!("Failed to create results CSV: {}", path.display()))?;

    writeln!(file, "{}", CSV_HEADER).context("Failed to write CSV header")?;
    for result in results {
        writeln!(
            file,
            "{},{},{},{:.4}",
            result.image, result.ground_truth, result.prediction, result.cer_score
        )
        .context("Failed to write CSV row")?;
    }

    Ok(())
}
