//! Normalization of raw model responses into canonical plate strings.

use std::sync::OnceLock;

use regex::Regex;

/// Plate-shaped token: 1-2 letters, 1-4 digits, 1-3 letters, with optional
/// single spaces between the groups.
const PLATE_PATTERN: &str = r"[A-Z]{1,2}\s?\d{1,4}\s?[A-Z]{1,3}";

fn plate_regex() -> &'static Regex {
    static PLATE_RE: OnceLock<Regex> = OnceLock::new();
    PLATE_RE.get_or_init(|| Regex::new(PLATE_PATTERN).expect("plate pattern is valid"))
}

/// Maps a raw model response to a canonical plate string.
///
/// Quote characters are dropped, surrounding whitespace trimmed, and the rest
/// uppercased. If a plate-shaped substring is present, it is returned with
/// internal spaces removed; otherwise everything but alphanumeric characters
/// is discarded. Never fails; garbage input yields an empty string, and the
/// mapping is idempotent.
pub fn normalize_prediction(raw: &str) -> String {
    let cleaned: String = raw.chars().filter(|c| *c != '"' && *c != '\'').collect();
    let cleaned = cleaned.trim().to_uppercase();

    if let Some(found) = plate_regex().find(&cleaned) {
        return found.as_str().replace(' ', "");
    }

    cleaned.chars().filter(|c| c.is_alphanumeric()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_plate_unchanged() {
        assert_eq!(normalize_prediction("AB123CD"), "AB123CD");
    }

    #[test]
    fn test_strips_quotes_and_whitespace() {
        assert_eq!(normalize_prediction("  \"AB123CD\"  "), "AB123CD");
        assert_eq!(normalize_prediction("'ab123cd'"), "AB123CD");
    }

    #[test]
    fn test_extracts_plate_from_sentence() {
        assert_eq!(
            normalize_prediction("The license plate number is AB 123 CD."),
            "AB123CD"
        );
    }

    #[test]
    fn test_uppercases_input() {
        assert_eq!(normalize_prediction("b727kt"), "B727KT");
    }

    #[test]
    fn test_fallback_keeps_alphanumerics() {
        // No trailing letter group, so the plate pattern misses
        assert_eq!(normalize_prediction("AB-1234!"), "AB1234");
        assert_eq!(normalize_prediction("12 34"), "1234");
    }

    #[test]
    fn test_garbage_yields_empty() {
        assert_eq!(normalize_prediction("???"), "");
        assert_eq!(normalize_prediction(""), "");
        assert_eq!(normalize_prediction("   "), "");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "The plate is AB 123 CD",
            "\"xy999\"",
            "AB-1234!",
            "plate: b1c",
            "???",
            "",
        ];
        for input in inputs {
            let once = normalize_prediction(input);
            assert_eq!(normalize_prediction(&once), once, "input: {:?}", input);
        }
    }
}
