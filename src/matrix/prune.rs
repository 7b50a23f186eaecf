//! Mirror pair removal
//!
//! Works on any cell type, so freshly assembled matrices and raw persisted
//! ones go through the same code.

use crate::models::Slug;
use std::collections::BTreeMap;

/// Drop self-pairs (`A -> A`) from every row, then drop empty rows.
///
/// Safe to run on matrices loaded from disk that may predate mirror
/// exclusion at assembly time. Other cells are left untouched. Idempotent.
pub fn prune_mirror_matchups<V>(
    matrix: BTreeMap<Slug, BTreeMap<Slug, V>>,
) -> BTreeMap<Slug, BTreeMap<Slug, V>> {
    matrix
        .into_iter()
        .filter_map(|(from_slug, mut row)| {
            row.remove(&from_slug);
            (!row.is_empty()).then_some((from_slug, row))
        })
        .collect()
}
