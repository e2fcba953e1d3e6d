//! JSON export for corpus metrics.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::metrics::CorpusMetrics;

/// Export metrics to a JSON file.
///
/// The output is pretty-printed for human readability.
pub fn export_to_json(metrics: &CorpusMetrics, output_path: &Path) -> Result<()> {
    let json =
        serde_json::to_string_pretty(metrics).context("Failed to serialize metrics to JSON")?;

    let mut file = File::create(output_path)
        .context(format!("Failed to create JSON file: {}", output_path.display()))?;

    file.write_all(json.as_bytes())
        .context("Failed to write JSON data")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_export_to_json() {
        let metrics = CorpusMetrics {
            total_images: 3,
            images_with_ground_truth: 2,
            average_cer: 0.4,
            accuracy: 0.5,
            correct_predictions: 1,
            total_substitutions: 1,
            total_deletions: 0,
            total_insertions: 0,
            total_ground_truth_length: 12,
        };

        let dir = tempdir().unwrap();
        let path = dir.path().join("metrics.json");

        export_to_json(&metrics, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"total_images\": 3"));
        assert!(content.contains("\"accuracy\": 0.5"));
        assert!(content.contains("\"total_substitutions\": 1"));
    }
}
