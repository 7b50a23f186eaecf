//! Mirror inference
//!
//! Fills a missing directed pair (A vs B) from the reverse observation
//! (B vs A) by complementing the win rate. The interval complements too, so
//! its bounds swap. Sample size is shared by both directions.

use super::round4;
use crate::models::{Matrix, Observation, Slug};
use tracing::debug;

/// Complement of a reverse-direction observation, or `None` when the reverse
/// win rate is not a usable number.
pub fn invert(reverse: &Observation) -> Option<Observation> {
    if !reverse.win_rate.is_finite() {
        return None;
    }

    let mut inferred = Observation::new(
        round4(1.0 - reverse.win_rate).clamp(0.0, 1.0),
        reverse.matches,
    );
    if let Some((low, high)) = reverse.interval() {
        inferred = inferred.with_interval(round4(1.0 - high), round4(1.0 - low));
    }
    Some(inferred)
}

/// Fill every gap `matrix[a][b]` (a != b, both in `slugs`) whose reverse
/// entry exists. Existing observations are never touched.
///
/// Returns the number of inferred entries.
pub fn infer_missing_reverse(matrix: &mut Matrix, slugs: &[Slug]) -> usize {
    let mut filled = Vec::new();

    for from_slug in slugs {
        let row = matrix.get(from_slug);
        for to_slug in slugs {
            if from_slug == to_slug {
                continue;
            }
            if row.is_some_and(|r| r.contains_key(to_slug)) {
                continue;
            }
            let Some(reverse) = matrix.get(to_slug).and_then(|r| r.get(from_slug)) else {
                continue;
            };
            if let Some(inferred) = invert(reverse) {
                filled.push((from_slug.clone(), to_slug.clone(), inferred));
            }
        }
    }

    let count = filled.len();
    for (from_slug, to_slug, inferred) in filled {
        debug!(from = %from_slug, to = %to_slug, wr = inferred.win_rate, "inferred mirror cell");
        matrix.entry(from_slug).or_default().insert(to_slug, inferred);
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Row;

    fn slugs(names: &[&str]) -> Vec<Slug> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_invert_swaps_interval() {
        let reverse = Observation::new(0.65, 40).with_interval(0.5, 0.8);
        let inferred = invert(&reverse).unwrap();
        assert_eq!(inferred, Observation::new(0.35, 40).with_interval(0.2, 0.5));
    }

    #[test]
    fn test_invert_without_interval() {
        let inferred = invert(&Observation::new(0.9, 7)).unwrap();
        assert_eq!(inferred.win_rate, 0.1);
        assert_eq!(inferred.interval(), None);
    }

    #[test]
    fn test_invert_half_interval_is_dropped() {
        let mut reverse = Observation::new(0.6, 3);
        reverse.ci_low = Some(0.4);
        let inferred = invert(&reverse).unwrap();
        assert_eq!(inferred.ci_low, None);
        assert_eq!(inferred.ci_high, None);
    }

    #[test]
    fn test_invert_clamps_out_of_range_rates() {
        assert_eq!(invert(&Observation::new(1.2, 1)).unwrap().win_rate, 0.0);
        assert_eq!(invert(&Observation::new(-0.5, 1)).unwrap().win_rate, 1.0);
    }

    #[test]
    fn test_invert_rejects_non_finite() {
        assert!(invert(&Observation::new(f64::NAN, 10)).is_none());
        assert!(invert(&Observation::new(f64::INFINITY, 10)).is_none());
    }

    #[test]
    fn test_infer_fills_missing_row() {
        let mut matrix = Matrix::new();
        matrix.insert(
            "b".into(),
            Row::from([(
                "a".to_string(),
                Observation::new(0.65, 40).with_interval(0.5, 0.8),
            )]),
        );

        let filled = infer_missing_reverse(&mut matrix, &slugs(&["a", "b", "c"]));

        assert_eq!(filled, 1);
        assert_eq!(
            matrix["a"]["b"],
            Observation::new(0.35, 40).with_interval(0.2, 0.5)
        );
        assert!(!matrix.contains_key("c"));
    }

    #[test]
    fn test_infer_never_overwrites() {
        let direct = Observation::new(0.52, 100).with_interval(0.41, 0.63);
        let mut matrix = Matrix::new();
        matrix.insert("a".into(), Row::from([("b".to_string(), direct)]));
        matrix.insert(
            "b".into(),
            Row::from([("a".to_string(), Observation::new(0.7, 3))]),
        );

        let filled = infer_missing_reverse(&mut matrix, &slugs(&["a", "b"]));

        assert_eq!(filled, 0);
        assert_eq!(matrix["a"]["b"], direct);
        assert_eq!(matrix["b"]["a"], Observation::new(0.7, 3));
    }

    #[test]
    fn test_infer_ignores_unknown_slugs() {
        let mut matrix = Matrix::new();
        matrix.insert(
            "x".into(),
            Row::from([("a".to_string(), Observation::new(0.4, 5))]),
        );

        let filled = infer_missing_reverse(&mut matrix, &slugs(&["a", "b"]));

        assert_eq!(filled, 0);
        assert!(!matrix.contains_key("a"));
    }
}
