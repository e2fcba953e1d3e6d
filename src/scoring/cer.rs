//! Character error rate between a ground-truth plate and a prediction.

use serde::Serialize;

use super::align::{opcodes, OpTag};

/// Per-operation error counts for one (reference, hypothesis) pair.
///
/// Recomputed on demand; not stored alongside results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CerBreakdown {
    pub cer: f64,
    pub substitutions: usize,
    pub deletions: usize,
    pub insertions: usize,
    pub total_errors: usize,
    pub ground_truth_length: usize,
}

/// Character error rate of `hypothesis` against `reference`.
///
/// Errors are counted over the matching-block decomposition, a Replace span
/// costing the longer of its two sides. This can overcount compared to true
/// minimum edit distance, but keeps scores comparable with previously
/// reported numbers. The result is unbounded above (a much longer hypothesis
/// can exceed 1.0).
///
/// An empty reference scores 1.0 against any non-empty hypothesis and 0.0
/// against an empty one.
pub fn calculate_cer(reference: &str, hypothesis: &str) -> f64 {
    detailed_cer(reference, hypothesis).cer
}

/// Like [`calculate_cer`], but returns the full breakdown.
pub fn detailed_cer(reference: &str, hypothesis: &str) -> CerBreakdown {
    let ref_chars: Vec<char> = reference.chars().collect();
    let hyp_chars: Vec<char> = hypothesis.chars().collect();

    if ref_chars.is_empty() {
        let insertions = hyp_chars.len();
        return CerBreakdown {
            cer: if insertions > 0 { 1.0 } else { 0.0 },
            substitutions: 0,
            deletions: 0,
            insertions,
            total_errors: insertions,
            ground_truth_length: 0,
        };
    }

    let mut substitutions = 0;
    let mut deletions = 0;
    let mut insertions = 0;

    for op in opcodes(&ref_chars, &hyp_chars) {
        let a_len = op.a_end - op.a_start;
        let b_len = op.b_end - op.b_start;
        match op.tag {
            OpTag::Replace => substitutions += a_len.max(b_len),
            OpTag::Delete => deletions += a_len,
            OpTag::Insert => insertions += b_len,
            OpTag::Equal => {}
        }
    }

    let total_errors = substitutions + deletions + insertions;
    CerBreakdown {
        cer: total_errors as f64 / ref_chars.len() as f64,
        substitutions,
        deletions,
        insertions,
        total_errors,
        ground_truth_length: ref_chars.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_strings_score_zero() {
        assert_eq!(calculate_cer("AB123CD", "AB123CD"), 0.0);
        assert_eq!(calculate_cer("X", "X"), 0.0);
    }

    #[test]
    fn test_empty_reference_rule() {
        assert_eq!(calculate_cer("", ""), 0.0);
        assert_eq!(calculate_cer("", "X"), 1.0);
        assert_eq!(calculate_cer("", "XYZ"), 1.0);

        let detail = detailed_cer("", "XYZ");
        assert_eq!(detail.substitutions, 0);
        assert_eq!(detail.deletions, 0);
        assert_eq!(detail.insertions, 3);
        assert_eq!(detail.total_errors, 3);
        assert_eq!(detail.ground_truth_length, 0);
    }

    #[test]
    fn test_single_substitution() {
        let detail = detailed_cer("ABC", "ABD");
        assert_eq!(detail.substitutions, 1);
        assert_eq!(detail.total_errors, 1);
        assert!((detail.cer - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_deletion_and_insertion() {
        // Reference longer: trailing char deleted
        let detail = detailed_cer("AB12", "AB1");
        assert_eq!(detail.deletions, 1);
        assert_eq!(detail.insertions, 0);
        assert!((detail.cer - 0.25).abs() < 1e-9);

        // Hypothesis longer: trailing char inserted
        let detail = detailed_cer("AB1", "AB12");
        assert_eq!(detail.insertions, 1);
        assert!((detail.cer - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_kitten_sitting() {
        // k→s, e→i, +g: 3 errors over 6 reference characters
        let detail = detailed_cer("kitten", "sitting");
        assert_eq!(detail.substitutions, 2);
        assert_eq!(detail.insertions, 1);
        assert_eq!(detail.deletions, 0);
        assert!((detail.cer - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_cer_can_exceed_one() {
        let cer = calculate_cer("A", "XYZW");
        assert!(cer > 1.0);
    }

    #[test]
    fn test_scalar_consistent_with_breakdown() {
        let pairs = [
            ("AB123CD", "AB123CD"),
            ("AB123CD", ""),
            ("XY999", "XY998"),
            ("B727KT", "8727KT"),
            ("SHORT", "MUCHLONGERTEXT"),
        ];
        for (reference, hypothesis) in pairs {
            let detail = detailed_cer(reference, hypothesis);
            let expected = (detail.substitutions + detail.deletions + detail.insertions) as f64
                / reference.chars().count() as f64;
            assert!((calculate_cer(reference, hypothesis) - expected).abs() < 1e-9);
            assert!(detail.cer >= 0.0);
        }
    }
}
