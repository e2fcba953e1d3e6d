//! Evaluation run configuration.
//!
//! Loads settings from config.json at startup. Provides the inference
//! endpoint, dataset locations, output paths, and timing parameters. Every
//! field has a default so a missing or partial file still yields a runnable
//! configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Complete evaluation configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Chat-completions endpoint of the inference server
    #[serde(default = "default_endpoint_url")]
    pub endpoint_url: String,
    /// Model identifier sent with each request
    #[serde(default = "default_model")]
    pub model: String,
    /// Directory containing the dataset images
    #[serde(default = "default_dataset_dir")]
    pub dataset_dir: String,
    /// Ground truth CSV; defaults to ground_truth.csv inside the dataset directory
    #[serde(default)]
    pub ground_truth_file: Option<String>,
    /// Per-image results CSV written after the run
    #[serde(default = "default_output_file")]
    pub output_file: String,
    /// Corpus metrics JSON written next to the results
    #[serde(default = "default_metrics_file")]
    pub metrics_file: String,
    /// Upper bound on each inference request (seconds)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Retries per variant after a failed request
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Wait between retries (milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
    /// Pause after each completed image to throttle the endpoint (milliseconds)
    #[serde(default = "default_pause_between_images_ms")]
    pub pause_between_images_ms: u64,
    /// Cap on generated tokens per answer
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature for the model's answer
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_endpoint_url() -> String {
    "http://localhost:1234/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "llava".to_string()
}

fn default_dataset_dir() -> String {
    "dataset".to_string()
}

fn default_output_file() -> String {
    "ocr_results.csv".to_string()
}

fn default_metrics_file() -> String {
    "ocr_metrics.json".to_string()
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    2000
}

fn default_pause_between_images_ms() -> u64 {
    500
}

fn default_max_tokens() -> u32 {
    100
}

fn default_temperature() -> f32 {
    0.1
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            endpoint_url: default_endpoint_url(),
            model: default_model(),
            dataset_dir: default_dataset_dir(),
            ground_truth_file: None,
            output_file: default_output_file(),
            metrics_file: default_metrics_file(),
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            pause_between_images_ms: default_pause_between_images_ms(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

impl EvalConfig {
    /// Resolved path of the ground truth CSV.
    pub fn ground_truth_path(&self) -> PathBuf {
        match &self.ground_truth_file {
            Some(path) => PathBuf::from(path),
            None => Path::new(&self.dataset_dir).join("ground_truth.csv"),
        }
    }
}

/// Loads configuration from the given file or returns defaults.
pub fn load_config(path: &Path) -> EvalConfig {
    if path.exists() {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    crate::log(&format!("Config loaded from {}", path.display()));
                    return config;
                }
                Err(e) => {
                    crate::log(&format!(
                        "Failed to parse {}: {}. Using defaults.",
                        path.display(),
                        e
                    ));
                }
            },
            Err(e) => {
                crate::log(&format!(
                    "Failed to read {}: {}. Using defaults.",
                    path.display(),
                    e
                ));
            }
        }
    } else {
        crate::log(&format!("{} not found. Using default config.", path.display()));
    }

    EvalConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EvalConfig::default();
        assert_eq!(config.model, "llava");
        assert_eq!(config.request_timeout_secs, 120);
        assert_eq!(config.pause_between_images_ms, 500);
        assert_eq!(config.max_tokens, 100);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: EvalConfig =
            serde_json::from_str(r#"{ "model": "bakllava", "dataset_dir": "test_images" }"#)
                .unwrap();
        assert_eq!(config.model, "bakllava");
        assert_eq!(config.dataset_dir, "test_images");
        assert_eq!(config.output_file, "ocr_results.csv");
        assert_eq!(config.max_retries, 2);
    }

    #[test]
    fn test_ground_truth_path_defaults_into_dataset_dir() {
        let config = EvalConfig {
            dataset_dir: "imgs".to_string(),
            ..EvalConfig::default()
        };
        assert_eq!(config.ground_truth_path(), Path::new("imgs").join("ground_truth.csv"));

        let config = EvalConfig {
            ground_truth_file: Some("labels/gt.csv".to_string()),
            ..EvalConfig::default()
        };
        assert_eq!(config.ground_truth_path(), PathBuf::from("labels/gt.csv"));
    }
}
