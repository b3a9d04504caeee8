//! Property tests for the confidence interval estimator
//!
//! - Mean lies inside its own interval
//! - Constant samples collapse to a point
//! - Higher confidence widens, more data narrows
//! - Invalid inputs are rejected

#![allow(clippy::float_cmp)]

use eval_interval::{estimate, IntervalError};
use proptest::collection::vec;
use proptest::prelude::*;

// =============================================================================
// Strategy Helpers
// =============================================================================

/// Metric-like scores in [0, 1]
fn scores(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<f64>> {
    vec(0.0..=1.0_f64, len)
}

/// Scores with at least two distinct values
fn varied_scores(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<f64>> {
    scores(len).prop_filter("needs non-zero variance", |s| {
        s.iter().any(|x| (x - s[0]).abs() > 1e-6)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2_000))]

    #[test]
    fn prop_mean_inside_interval(s in scores(2..50), level in 0.5..0.999_f64) {
        let r = estimate(&s, level).unwrap();
        prop_assert!(r.lower_bound <= r.mean, "{} > {}", r.lower_bound, r.mean);
        prop_assert!(r.mean <= r.upper_bound, "{} > {}", r.mean, r.upper_bound);
        prop_assert!((r.confidence_level - level).abs() < f64::EPSILON);
    }

    #[test]
    fn prop_interval_symmetric(s in scores(2..50)) {
        let r = estimate(&s, 0.95).unwrap();
        let below = r.mean - r.lower_bound;
        let above = r.upper_bound - r.mean;
        prop_assert!((below - above).abs() < 1e-9);
    }

    #[test]
    fn prop_constant_sample_is_a_point(c in 0.0..=1.0_f64, n in 2_usize..40) {
        let s = vec![c; n];
        let r = estimate(&s, 0.95).unwrap();
        prop_assert_eq!(r.mean, c);
        prop_assert_eq!(r.lower_bound, c);
        prop_assert_eq!(r.upper_bound, c);
    }

    #[test]
    fn prop_higher_confidence_is_wider(s in varied_scores(2..30)) {
        let w90 = estimate(&s, 0.90).unwrap().width();
        let w95 = estimate(&s, 0.95).unwrap().width();
        let w99 = estimate(&s, 0.99).unwrap().width();
        prop_assert!(w90 < w95, "{} >= {}", w90, w95);
        prop_assert!(w95 < w99, "{} >= {}", w95, w99);
    }

    #[test]
    fn prop_repeating_sample_narrows(s in varied_scores(2..20)) {
        let doubled: Vec<f64> = s.iter().chain(s.iter()).copied().collect();
        let w_single = estimate(&s, 0.95).unwrap().width();
        let w_double = estimate(&doubled, 0.95).unwrap().width();
        prop_assert!(w_double < w_single, "{} >= {}", w_double, w_single);
    }

    #[test]
    fn prop_order_irrelevant(s in scores(2..30)) {
        let mut reversed = s.clone();
        reversed.reverse();
        let a = estimate(&s, 0.95).unwrap();
        let b = estimate(&reversed, 0.95).unwrap();
        prop_assert!((a.mean - b.mean).abs() < 1e-12);
        prop_assert!((a.width() - b.width()).abs() < 1e-9);
    }

    #[test]
    fn prop_short_sample_rejected(s in scores(0..2), level in 0.01..0.99_f64) {
        prop_assert_eq!(
            estimate(&s, level),
            Err(IntervalError::InsufficientSample { len: s.len() })
        );
    }

    #[test]
    fn prop_level_outside_unit_interval_rejected(
        s in scores(2..10),
        level in prop_oneof![-10.0..=0.0_f64, 1.0..=10.0_f64]
    ) {
        let rejected = matches!(
            estimate(&s, level),
            Err(IntervalError::InvalidConfidenceLevel(_))
        );
        prop_assert!(rejected);
    }
}

#[test]
fn test_insufficient_sample_example() {
    assert_eq!(
        estimate(&[1.0], 0.95),
        Err(IntervalError::InsufficientSample { len: 1 })
    );
}

#[test]
fn test_invalid_level_examples() {
    for level in [0.0, 1.0] {
        assert!(matches!(
            estimate(&[1.0, 2.0, 3.0], level),
            Err(IntervalError::InvalidConfidenceLevel(_))
        ));
    }
}
