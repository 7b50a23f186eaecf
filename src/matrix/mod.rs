//! Matchup matrix reconciliation
//!
//! # Pipeline
//!
//! Every stage takes the matrix by value or reference and hands it back, so
//! each one can be exercised on its own:
//!
//! 1. [`identifiers`]: the display-name -> slug map is checked for
//!    injectivity before anything else runs
//! 2. [`assemble`]: table rows become a sparse directed matrix keyed by slug
//! 3. [`inference`]: gaps are filled from the reverse-direction observation
//! 4. [`prune`]: self-pairs and empty rows are removed
//! 5. [`totals`]: per-deck wins / matches / win rate
//!
//! All fractions are kept at 4 decimal places, see [`round4`].

pub mod assemble;
pub mod cell;
pub mod identifiers;
pub mod inference;
pub mod prune;
pub mod totals;


pub use assemble::{assemble, AssemblyStats};
pub use cell::parse_cell;
pub use identifiers::{DuplicateIdentifierError, IdentifierMap};
pub use inference::{infer_missing_reverse, invert};
pub use prune::prune_mirror_matchups;
pub use totals::{compute_totals, totals_for};

use crate::models::{cell_count, Matrix, Observation, RawMatrix, TableRows, Totals};
use tracing::{debug, info};

/// Decimal places kept for every stored fraction.
pub const FRACTION_DECIMALS: i32 = 4;

/// Round a fraction to [`FRACTION_DECIMALS`] places.
///
/// Rounds the exact binary value through decimal formatting. Scaling by
/// `10^4` first would round the product instead, which is off by one unit
/// for values like `0.12345` and `1 / 160`.
pub fn round4(value: f64) -> f64 {
    format!("{:.*}", FRACTION_DECIMALS as usize, value)
        .parse()
        .unwrap_or(value)
}

/// Output of a full Assemble -> Infer -> Prune -> Aggregate pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub matchups: Matrix,
    pub totals: Totals,
    pub assembly: AssemblyStats,
    pub inferred: usize,
}

/// Run every stage over already-fetched table rows.
pub fn reconcile(rows: &TableRows, ids: &IdentifierMap) -> Reconciled {
    let slugs = ids.slugs();

    let (mut matrix, assembly) = assemble(rows, ids);
    debug!(?assembly, "assembled matrix");
    info!(
        rows = matrix.len(),
        cells = cell_count(&matrix),
        "assembled direct observations"
    );

    let inferred = infer_missing_reverse(&mut matrix, &slugs);
    info!(inferred, "filled missing reverse matchups");

    let matchups = prune_mirror_matchups(matrix);
    let totals = compute_totals(&matchups, &slugs);

    Reconciled {
        matchups,
        totals,
        assembly,
        inferred,
    }
}

/// Prune-only reprocessing of a previously persisted matrix.
///
/// Only self-pairs are removed. Cells are parsed for aggregation alone;
/// cells that do not read as observations are kept as written and simply
/// do not count toward totals.
pub fn reaggregate(matrix: RawMatrix, ids: &IdentifierMap) -> (RawMatrix, Totals) {
    let matchups = prune_mirror_matchups(matrix);

    let observed: Matrix = matchups
        .iter()
        .map(|(from_slug, row)| {
            let parsed = row
                .iter()
                .filter_map(|(to_slug, cell)| {
                    Observation::from_persisted(cell).map(|obs| (to_slug.clone(), obs))
                })
                .collect();
            (from_slug.clone(), parsed)
        })
        .collect();
    let unreadable = cell_count(&matchups) - cell_count(&observed);
    if unreadable > 0 {
        debug!(unreadable, "persisted cells left out of totals");
    }

    let totals = compute_totals(&observed, &ids.slugs());
    (matchups, totals)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round4() {
        assert_eq!(round4(0.77777), 0.7778);
        assert_eq!(round4(1.0 - 0.65), 0.35);
        assert_eq!(round4(1.0 - 0.8), 0.2);
        assert_eq!(round4(2.0 / 3.0), 0.6667);
        assert_eq!(round4(0.0), 0.0);
    }

    #[test]
    fn test_round4_uses_the_stored_value() {
        // 0.12345 is stored slightly above the midpoint, 1/160 likewise.
        assert_eq!(round4(12.345 / 100.0), 0.1235);
        assert_eq!(round4(1.0 / 160.0), 0.0063);
        assert_eq!(round4(1.0), 1.0);
    }
}
