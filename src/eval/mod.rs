//! Per-image evaluation and the sequential dataset loop.
//!
//! Each image is rendered as its preprocessed variants; every variant goes to
//! the predictor, the response is normalized and scored against ground truth,
//! and the best-scoring variant is kept. The dataset loop owns all recovery:
//! a failed image is skipped, never fatal to the run.

pub mod csv_writer;
pub mod ground_truth;

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::config::EvalConfig;
use crate::ocr::{generate_variants, normalize_prediction, PlatePredictor};
use crate::scoring::calculate_cer;

/// Outcome of one image's evaluation: the best variant's prediction and its
/// score against the ground truth stored alongside. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrResult {
    /// Image file name, including extension
    pub image: String,
    /// Reference plate string; empty when the image has no label
    pub ground_truth: String,
    /// Normalized prediction of the best variant
    pub prediction: String,
    /// CER of `prediction` against `ground_truth`
    pub cer_score: f64,
}

/// File extensions treated as dataset images.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff"];

/// Evaluates one image: predicts every variant in order and keeps the result
/// with the lowest CER.
///
/// Tie-break rule: the comparison is strict less-than, so among equal scores
/// the earliest variant wins.
pub fn evaluate_image(
    predictor: &dyn PlatePredictor,
    path: &Path,
    ground_truth: &str,
) -> Result<OcrResult> {
    let image = image::open(path)
        .context(format!("Failed to open image: {}", path.display()))?;
    let image_name = image_file_name(path);

    let variants = generate_variants(&image);
    let mut best: Option<OcrResult> = None;

    for (idx, variant) in variants.iter().enumerate() {
        crate::log(&format!(" - Variant {}/{}", idx + 1, variants.len()));

        let prediction = normalize_prediction(&predictor.predict(variant));
        let cer = calculate_cer(ground_truth, &prediction);

        if best.as_ref().is_none_or(|b| cer < b.cer_score) {
            best = Some(OcrResult {
                image: image_name.clone(),
                ground_truth: ground_truth.to_string(),
                prediction,
                cer_score: cer,
            });
        }
    }

    best.ok_or_else(|| anyhow!("No usable variants for {}", image_name))
}

/// Runs the evaluation over every image in the dataset directory,
/// sequentially and in file-name order.
///
/// Per-image failures (unreadable files, unexpected errors) are logged and
/// skipped. Returns the results of all images that completed; the caller owns
/// the list.
pub fn run_dataset(predictor: &dyn PlatePredictor, config: &EvalConfig) -> Result<Vec<OcrResult>> {
    let dataset_dir = Path::new(&config.dataset_dir);
    if !dataset_dir.is_dir() {
        return Err(anyhow!(
            "Dataset path '{}' does not exist",
            dataset_dir.display()
        ));
    }

    let image_files = list_image_files(dataset_dir)?;
    if image_files.is_empty() {
        return Err(anyhow!(
            "No image files found in '{}'",
            dataset_dir.display()
        ));
    }

    let ground_truth_map = ground_truth::load_ground_truth(&config.ground_truth_path());
    let pause = Duration::from_millis(config.pause_between_images_ms);
    let mut results = Vec::with_capacity(image_files.len());

    for path in &image_files {
        let name = image_file_name(path);
        let ground_truth = ground_truth_map.get(&name).cloned().unwrap_or_default();

        crate::log(&format!("Processing: {}", path.display()));
        match evaluate_image(predictor, path, &ground_truth) {
            Ok(result) => {
                crate::log(&format!(
                    "Best prediction: {} (CER {:.4})",
                    result.prediction, result.cer_score
                ));
                results.push(result);
                thread::sleep(pause);
            }
            Err(e) => {
                crate::log(&format!("Error processing {}: {}", path.display(), e));
            }
        }
    }

    Ok(results)
}

fn image_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Image files directly inside `dir`, sorted by name so runs and output
/// order are deterministic.
fn list_image_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries =
        fs::read_dir(dir).context(format!("Failed to read dataset dir: {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.context("Failed to read dataset entry")?.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
