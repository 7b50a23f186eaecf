//! Matrix assembly from raw table rows

use super::cell::{clean_text, parse_cell};
use super::identifiers::IdentifierMap;
use crate::models::{Matrix, Row};
use tracing::debug;

/// Header slots before the first opponent column: row label, overall.
pub const LEADING_COLUMNS: usize = 2;

/// Diagnostic counters collected while assembling.
///
/// Skipped data is never an error; these only make it visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblyStats {
    pub rows_seen: usize,
    pub rows_unmapped: usize,
    pub rows_empty: usize,
    pub columns_unmapped: usize,
    pub self_columns: usize,
    pub cells_without_observation: usize,
    pub cells_stored: usize,
}

/// Build the directed matrix from table rows (row 0 = headers).
///
/// Self-columns are skipped here, so a freshly assembled matrix never holds a
/// mirror pair.
pub fn assemble(rows: &[Vec<String>], ids: &IdentifierMap) -> (Matrix, AssemblyStats) {
    let mut matrix = Matrix::new();
    let mut stats = AssemblyStats::default();

    let Some((header_row, data_rows)) = rows.split_first() else {
        return (matrix, stats);
    };

    let headers: Vec<Option<&str>> = header_row
        .iter()
        .map(|h| ids.resolve(&clean_text(h)))
        .collect();

    for cells in data_rows {
        let Some(label) = cells.first() else {
            continue;
        };
        stats.rows_seen += 1;

        let label = clean_text(label);
        let Some(from_slug) = ids.resolve(&label) else {
            debug!(row = %label, "skipping unmapped row");
            stats.rows_unmapped += 1;
            continue;
        };

        let mut row = Row::new();
        let limit = cells.len().min(headers.len());
        for idx in LEADING_COLUMNS..limit {
            let Some(to_slug) = headers[idx] else {
                stats.columns_unmapped += 1;
                continue;
            };
            if to_slug == from_slug {
                stats.self_columns += 1;
                continue;
            }
            match parse_cell(&cells[idx]) {
                Some(obs) => {
                    row.insert(to_slug.to_string(), obs);
                    stats.cells_stored += 1;
                }
                None => stats.cells_without_observation += 1,
            }
        }

        if row.is_empty() {
            stats.rows_empty += 1;
        } else {
            matrix.insert(from_slug.to_string(), row);
        }
    }

    (matrix, stats)
}
