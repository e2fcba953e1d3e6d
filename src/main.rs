//! License Plate OCR Evaluation
//!
//! Evaluates how well a vision-language model reads license plates: each
//! dataset image is sent to the inference endpoint as several preprocessed
//! variants, predictions are scored against ground truth with a character
//! error rate, and the best variant per image is aggregated into corpus
//! metrics.

mod analysis;
mod config;
mod eval;
mod ocr;
mod scoring;

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use chrono::Local;

use crate::config::EvalConfig;
use crate::ocr::VlmClient;

const LOG_FILE: &str = "plate_ocr_eval.log";

/// Logs a message to both console and log file with timestamp.
pub fn log(msg: &str) {
    let timestamp = Local::now().format("%H:%M:%S%.3f");
    let line = format!("[{}] {}\n", timestamp, msg);
    print!("{}", line);
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(LOG_FILE) {
        let _ = file.write_all(line.as_bytes());
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    // Usage: plate-ocr-eval [analyze] [config.json]
    let (analyze_mode, config_arg) = match args.first().map(String::as_str) {
        Some("analyze") => (true, args.get(1).cloned()),
        Some(path) => (false, Some(path.to_string())),
        None => (false, None),
    };
    let config_path = config_arg.unwrap_or_else(|| "config.json".to_string());
    let config = config::load_config(Path::new(&config_path));

    if analyze_mode {
        if let Err(e) = analysis::analyze_results(&config) {
            log(&format!("Analysis failed: {}", e));
        }
        return Ok(());
    }

    run_evaluation(&config);
    Ok(())
}

/// Drives a full evaluation run. Failures along the way are reported and the
/// run degrades gracefully; nothing here aborts the process.
fn run_evaluation(config: &EvalConfig) {
    log("Starting License Plate OCR evaluation");
    log(&format!("Image Directory: {}", config.dataset_dir));
    log(&format!(
        "Ground Truth File: {}",
        config.ground_truth_path().display()
    ));
    log(&format!("Model: {}", config.model));
    log(&format!("Endpoint: {}", config.endpoint_url));
    log("------------------------------------------------------------");

    let client = match VlmClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            log(&format!("Failed to create inference client: {}", e));
            return;
        }
    };

    let results = match eval::run_dataset(&client, config) {
        Ok(results) => results,
        Err(e) => {
            log(&format!("Error: {}", e));
            log("Please make sure:");
            log("1. The inference server is running on the configured URL");
            log("2. The model is loaded");
            log("3. The dataset path exists and contains images");
            return;
        }
    };

    if results.is_empty() {
        log("No images were processed successfully!");
        return;
    }

    match eval::csv_writer::write_results_csv(Path::new(&config.output_file), &results) {
        Ok(()) => log(&format!("Results saved to {}", config.output_file)),
        Err(e) => log(&format!("Error saving results: {}", e)),
    }

    let metrics = analysis::CorpusMetrics::from_results(&results);
    analysis::metrics::print_summary(&metrics);

    match analysis::export::export_to_json(&metrics, Path::new(&config.metrics_file)) {
        Ok(()) => log(&format!("Metrics JSON saved: {}", config.metrics_file)),
        Err(e) => log(&format!("Error saving metrics JSON: {}", e)),
    }
}
