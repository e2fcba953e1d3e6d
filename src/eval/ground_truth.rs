//! Ground truth CSV loader.
//!
//! Parses the `image,ground_truth` file into a lookup keyed by image file
//! name. Every failure degrades to "no reference" rather than aborting the
//! run: a missing file yields an empty map, malformed rows are skipped with
//! a warning.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Loads the ground truth mapping, one row per image file name.
pub fn load_ground_truth(path: &Path) -> HashMap<String, String> {
    let mut map = HashMap::new();

    if !path.exists() {
        crate::log(&format!(
            "Ground truth file not found: {} (all images scored without reference)",
            path.display()
        ));
        return map;
    }

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            crate::log(&format!("Error reading ground truth file: {}", e));
            return map;
        }
    };

    for (line_num, line_result) in BufReader::new(file).lines().enumerate() {
        let line = match line_result {
            Ok(line) => line,
            Err(e) => {
                crate::log(&format!("Warning: unreadable ground truth row: {}", e));
                continue;
            }
        };

        // Header row
        if line_num == 0 {
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }

        match line.split_once(',') {
            Some((image, ground_truth)) => {
                map.insert(image.trim().to_string(), ground_truth.trim().to_string());
            }
            None => {
                crate::log(&format!(
                    "Warning: skipping malformed ground truth row {}",
                    line_num + 1
                ));
            }
        }
    }

    crate::log(&format!("Loaded {} ground truth entries", map.len()));
    map
}
