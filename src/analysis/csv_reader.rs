//! CSV reader for evaluation results.
//!
//! Parses the file produced by `eval::csv_writer` back into results, so a
//! finished run can be re-summarized without touching the network.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{anyhow, Context, Result};

use crate::eval::OcrResult;

/// Loads results from a CSV file.
///
/// Skips the header row and empty lines; malformed rows are skipped with a
/// warning log.
pub fn read_results_csv(path: &Path) -> Result<Vec<OcrResult>> {
    let file = File::open(path)
        .context(format!("Failed to open results CSV: {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut results = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result.context("Failed to read line from results CSV")?;

        if line_num == 0 {
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }

        match parse_line(&line) {
            Ok(result) => results.push(result),
            Err(e) => {
                crate::log(&format!(
                    "Warning: Skipping malformed results row {}: {}",
                    line_num + 1,
                    e
                ));
            }
        }
    }

    Ok(results)
}

fn parse_line(line: &str) -> Result<OcrResult> {
    let parts: Vec<&str> = line.split(',').collect();
    if parts.len() != 4 {
        return Err(anyhow!("Expected 4 columns, got {}", parts.len()));
    }

    let cer_score = parts[3].parse::<f64>().context("Invalid CER score")?;
    Ok(OcrResult {
        image: parts[0].to_string(),
        ground_truth: parts[1].to_string(),
        prediction: parts[2].to_string(),
        cer_score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::csv_writer::write_results_csv;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    fn create_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_parse_valid_csv() {
        let file = create_csv(
            "image,ground_truth,prediction,CER_score\n\
             car1.jpg,AB123CD,AB123CD,0.0000\n\
             car2.jpg,XY999,XY998,0.2000\n",
        );
        let results = read_results_csv(file.path()).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].image, "car1.jpg");
        assert_eq!(results[0].cer_score, 0.0);
        assert_eq!(results[1].prediction, "XY998");
        assert!((results[1].cer_score - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_skips_malformed_rows() {
        let file = create_csv(
            "image,ground_truth,prediction,CER_score\n\
             only,three,columns\n\
             car.jpg,AB1,AB1,not-a-number\n\
             car.jpg,AB1,AB1,0.0000\n",
        );
        let results = read_results_csv(file.path()).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_round_trip_preserves_rows() {
        let dir = tempdir().unwrap();
        let csv_path = dir.path().join("results.csv");

        let original = vec![
            OcrResult {
                image: "car1.jpg".to_string(),
                ground_truth: "AB123CD".to_string(),
                prediction: "AB123CD".to_string(),
                cer_score: 0.0,
            },
            OcrResult {
                image: "car2.jpg".to_string(),
                ground_truth: "".to_string(),
                prediction: "Z".to_string(),
                cer_score: 1.0,
            },
            OcrResult {
                image: "car3.jpg".to_string(),
                ground_truth: "AB123CD".to_string(),
                prediction: "AB123C".to_string(),
                cer_score: 1.0 / 7.0,
            },
        ];

        write_results_csv(&csv_path, &original).unwrap();
        let read_back = read_results_csv(&csv_path).unwrap();

        assert_eq!(read_back.len(), original.len());
        for (a, b) in original.iter().zip(read_back.iter()) {
            assert_eq!(a.image, b.image);
            assert_eq!(a.ground_truth, b.ground_truth);
            assert_eq!(a.prediction, b.prediction);
            // CER survives to 4 decimal places
            assert_eq!(format!("{:.4}", a.cer_score), format!("{:.4}", b.cer_score));
        }
    }
}
