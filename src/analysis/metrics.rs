//! Corpus-level metric aggregation.
//!
//! Folds all per-image results into dataset-level numbers: mean CER,
//! exact-match accuracy, and summed edit-operation counts. Metrics are
//! recomputed from the full result list each time; nothing is accumulated
//! incrementally.

use serde::Serialize;

use crate::eval::OcrResult;
use crate::scoring::detailed_cer;

/// Aggregate metrics over one evaluation run.
#[derive(Debug, Clone, Serialize)]
pub struct CorpusMetrics {
    /// Number of images that produced a result
    pub total_images: usize,
    /// Results with a non-empty ground truth
    pub images_with_ground_truth: usize,
    /// Mean CER over all results
    pub average_cer: f64,
    /// Exact matches divided by labeled images (0.0 when nothing is labeled)
    pub accuracy: f64,
    /// Exact string matches with a non-empty ground truth
    pub correct_predictions: usize,
    pub total_substitutions: usize,
    pub total_deletions: usize,
    pub total_insertions: usize,
    pub total_ground_truth_length: usize,
}

impl CorpusMetrics {
    /// Aggregates the full result list. Edit-operation totals are recomputed
    /// from each (ground truth, prediction) pair, counting only labeled
    /// images.
    pub fn from_results(results: &[OcrResult]) -> Self {
        if results.is_empty() {
            return Self {
                total_images: 0,
                images_with_ground_truth: 0,
                average_cer: 0.0,
                accuracy: 0.0,
                correct_predictions: 0,
                total_substitutions: 0,
                total_deletions: 0,
                total_insertions: 0,
                total_ground_truth_length: 0,
            };
        }

        let total_images = results.len();
        let average_cer =
            results.iter().map(|r| r.cer_score).sum::<f64>() / total_images as f64;

        let images_with_ground_truth = results
            .iter()
            .filter(|r| !r.ground_truth.is_empty())
            .count();
        let correct_predictions = results
            .iter()
            .filter(|r| !r.ground_truth.is_empty() && r.ground_truth == r.prediction)
            .count();
        let accuracy = if images_with_ground_truth > 0 {
            correct_predictions as f64 / images_with_ground_truth as f64
        } else {
            0.0
        };

        let mut total_substitutions = 0;
        let mut total_deletions = 0;
        let mut total_insertions = 0;
        let mut total_ground_truth_length = 0;
        for result in results.iter().filter(|r| !r.ground_truth.is_empty()) {
            let detail = detailed_cer(&result.ground_truth, &result.prediction);
            total_substitutions += detail.substitutions;
            total_deletions += detail.deletions;
            total_insertions += detail.insertions;
            total_ground_truth_length += detail.ground_truth_length;
        }

        Self {
            total_images,
            images_with_ground_truth,
            average_cer,
            accuracy,
            correct_predictions,
            total_substitutions,
            total_deletions,
            total_insertions,
            total_ground_truth_length,
        }
    }
}

/// Logs the run summary block.
pub fn print_summary(metrics: &CorpusMetrics) {
    crate::log("============================================================");
    crate::log("SUMMARY RESULTS");
    crate::log("============================================================");
    crate::log(&format!("Total Images Processed: {}", metrics.total_images));
    crate::log(&format!(
        "Images with Ground Truth: {}",
        metrics.images_with_ground_truth
    ));
    crate::log(&format!("Average CER: {:.4}", metrics.average_cer));
    crate::log(&format!(
        "Accuracy (Exact Match): {:.4} ({:.2}%)",
        metrics.accuracy,
        metrics.accuracy * 100.0
    ));
    crate::log(&format!(
        "Correct Predictions: {}/{}",
        metrics.correct_predictions, metrics.images_with_ground_truth
    ));
    crate::log(&format!("Total Substitutions: {}", metrics.total_substitutions));
    crate::log(&format!("Total Deletions: {}", metrics.total_deletions));
    crate::log(&format!("Total Insertions: {}", metrics.total_insertions));
    crate::log("============================================================");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(image: &str, ground_truth: &str, prediction: &str, cer_score: f64) -> OcrResult {
        OcrResult {
            image: image.to_string(),
            ground_truth: ground_truth.to_string(),
            prediction: prediction.to_string(),
            cer_score,
        }
    }

    #[test]
    fn test_empty_results() {
        let metrics = CorpusMetrics::from_results(&[]);
        assert_eq!(metrics.total_images, 0);
        assert_eq!(metrics.average_cer, 0.0);
        assert_eq!(metrics.accuracy, 0.0);
    }

    #[test]
    fn test_mixed_corpus() {
        let results = vec![
            result("a.jpg", "AB123CD", "AB123CD", 0.0),
            result("b.jpg", "", "Z", 1.0),
            result("c.jpg", "XY999", "XY998", 0.2),
        ];
        let metrics = CorpusMetrics::from_results(&results);

        assert_eq!(metrics.total_images, 3);
        assert_eq!(metrics.images_with_ground_truth, 2);
        assert_eq!(metrics.correct_predictions, 1);
        assert!((metrics.accuracy - 0.5).abs() < 1e-9);
        assert!((metrics.average_cer - 0.4).abs() < 1e-9);

        // Breakdown counts only labeled images: one substitution from c.jpg
        assert_eq!(metrics.total_substitutions, 1);
        assert_eq!(metrics.total_deletions, 0);
        assert_eq!(metrics.total_insertions, 0);
        assert_eq!(metrics.total_ground_truth_length, 12);
    }

    #[test]
    fn test_empty_matching_empty_is_not_correct() {
        let results = vec![result("a.jpg", "", "", 0.0)];
        let metrics = CorpusMetrics::from_results(&results);
        assert_eq!(metrics.correct_predictions, 0);
        assert_eq!(metrics.images_with_ground_truth, 0);
        assert_eq!(metrics.accuracy, 0.0);
    }

    #[test]
    fn test_all_unlabeled_accuracy_zero() {
        let results = vec![
            result("a.jpg", "", "AB1", 1.0),
            result("b.jpg", "", "", 0.0),
        ];
        let metrics = CorpusMetrics::from_results(&results);
        assert_eq!(metrics.accuracy, 0.0);
        assert!((metrics.average_cer - 0.5).abs() < 1e-9);
    }
}
