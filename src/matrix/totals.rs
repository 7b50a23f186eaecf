//! Per-deck aggregation
//!
//! Wins are rounded to whole games per opponent, then summed. This is not the
//! same as rounding the fractional sum once.

use super::round4;
use crate::models::{Matrix, Slug, Totals, TotalsRecord};

/// Aggregate one slug's row. Self-entries and unsampled entries are ignored.
pub fn totals_for(matrix: &Matrix, slug: &str) -> TotalsRecord {
    let Some(row) = matrix.get(slug) else {
        return TotalsRecord::default();
    };

    let mut wins = 0u64;
    let mut matches = 0u64;
    for (opp_slug, obs) in row {
        if opp_slug == slug || !obs.is_sampled() {
            continue;
        }
        let played = obs.matches as f64;
        wins += (played * obs.win_rate).round_ties_even().max(0.0) as u64;
        matches += obs.matches;
    }

    let win_rate = if matches > 0 {
        round4(wins as f64 / matches as f64)
    } else {
        0.0
    };

    TotalsRecord {
        wins,
        matches,
        win_rate,
    }
}

/// Totals for every known slug, including slugs with no row.
pub fn compute_totals(matrix: &Matrix, slugs: &[Slug]) -> Totals {
    slugs
        .iter()
        .map(|slug| (slug.clone(), totals_for(matrix, slug)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Observation, Row};

    fn matrix_with(slug: &str, row: Row) -> Matrix {
        Matrix::from([(slug.to_string(), row)])
    }

    #[test]
    fn test_totals_weighted_by_matches() {
        let matrix = matrix_with(
            "a",
            Row::from([
                ("x".to_string(), Observation::new(0.5, 10)),
                ("y".to_string(), Observation::new(1.0, 5)),
            ]),
        );

        let totals = totals_for(&matrix, "a");
        assert_eq!(
            totals,
            TotalsRecord {
                wins: 10,
                matches: 15,
                win_rate: 0.6667,
            }
        );
    }

    #[test]
    fn test_zero_match_entries_are_ignored() {
        let matrix = matrix_with(
            "a",
            Row::from([
                ("x".to_string(), Observation::new(0.9, 0)),
                ("y".to_string(), Observation::new(0.25, 4)),
            ]),
        );

        let totals = totals_for(&matrix, "a");
        assert_eq!(totals.wins, 1);
        assert_eq!(totals.matches, 4);
        assert_eq!(totals.win_rate, 0.25);
    }

    #[test]
    fn test_wins_rounded_per_opponent() {
        // 0.4 * 4 = 1.6 rounds to 2 for each opponent, so 4 wins;
        // rounding the 3.2 fractional sum once would give 3.
        let matrix = matrix_with(
            "a",
            Row::from([
                ("x".to_string(), Observation::new(0.4, 4)),
                ("y".to_string(), Observation::new(0.4, 4)),
            ]),
        );

        let totals = totals_for(&matrix, "a");
        assert_eq!(totals.wins, 4);
        assert_eq!(totals.matches, 8);
        assert_eq!(totals.win_rate, 0.5);
    }

    #[test]
    fn test_small_win_rate_rounds_from_stored_value() {
        let matrix = matrix_with(
            "a",
            Row::from([("b".to_string(), Observation::new(1.0 / 160.0, 160))]),
        );

        let totals = totals_for(&matrix, "a");
        assert_eq!(totals.wins, 1);
        assert_eq!(totals.matches, 160);
        assert_eq!(totals.win_rate, 0.0063);
    }

    #[test]
    fn test_half_wins_round_to_even() {
        let matrix = matrix_with(
            "a",
            Row::from([
                ("x".to_string(), Observation::new(0.5, 5)),
                ("y".to_string(), Observation::new(0.5, 7)),
            ]),
        );
        // 2.5 -> 2, 3.5 -> 4
        assert_eq!(totals_for(&matrix, "a").wins, 6);
    }

    #[test]
    fn test_self_entries_do_not_count() {
        let matrix = matrix_with(
            "a",
            Row::from([
                ("a".to_string(), Observation::new(0.5, 100)),
                ("b".to_string(), Observation::new(0.6, 10)),
            ]),
        );
        assert_eq!(totals_for(&matrix, "a").matches, 10);
    }

    #[test]
    fn test_compute_totals_covers_rowless_slugs() {
        let matrix = matrix_with("b", Row::from([("a".to_string(), Observation::new(0.25, 200))]));
        let slugs = vec!["a".to_string(), "b".to_string(), "c".to_string()];

        let totals = compute_totals(&matrix, &slugs);

        assert_eq!(totals.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(totals["a"], TotalsRecord::default());
        assert_eq!(totals["b"].wins, 50);
        assert_eq!(totals["c"].win_rate, 0.0);
    }
}
