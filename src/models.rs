use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Canonical archetype identifier ("slug").
pub type Slug = String;

/// Opponent slug -> directed observation.
pub type Row = BTreeMap<Slug, Observation>;

/// Sparse directed matchup matrix: slug -> opponent slug -> observation.
pub type Matrix = BTreeMap<Slug, Row>;

/// Row of a persisted document, cells kept as they were written.
pub type RawRow = BTreeMap<Slug, Value>;

/// Matrix read back from disk. Cells stay raw JSON so that reprocessing
/// never rewrites or loses what it cannot parse.
pub type RawMatrix = BTreeMap<Slug, RawRow>;

/// Per-slug aggregate performance, ordered by slug.
pub type Totals = BTreeMap<Slug, TotalsRecord>;

/// Raw table as handed over by a row source. Row 0 holds the headers.
pub type TableRows = Vec<Vec<String>>;

/// Statistical record for one directed pair (row deck vs column deck).
///
/// Fractions are stored rounded to 4 decimals. Serialized with the short
/// `wr` key used by the persisted matrix documents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    #[serde(rename = "wr")]
    pub win_rate: f64,
    pub matches: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ci_low: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ci_high: Option<f64>,
}

impl Observation {
    pub fn new(win_rate: f64, matches: u64) -> Self {
        Self {
            win_rate,
            matches,
            ci_low: None,
            ci_high: None,
        }
    }

    pub fn with_interval(mut self, ci_low: f64, ci_high: f64) -> Self {
        self.ci_low = Some(ci_low);
        self.ci_high = Some(ci_high);
        self
    }

    /// Both confidence bounds, when present.
    pub fn interval(&self) -> Option<(f64, f64)> {
        match (self.ci_low, self.ci_high) {
            (Some(low), Some(high)) => Some((low, high)),
            _ => None,
        }
    }

    /// Read a persisted cell leniently: `wr` must be a number and `matches`
    /// a non-negative integer, anything else (extra keys included) is
    /// ignored. Interval bounds are kept only when both are numbers.
    pub fn from_persisted(cell: &Value) -> Option<Self> {
        let win_rate = cell.get("wr")?.as_f64()?;
        let matches = cell.get("matches")?.as_u64()?;
        let obs = Self::new(win_rate, matches);
        let low = cell.get("ci_low").and_then(Value::as_f64);
        let high = cell.get("ci_high").and_then(Value::as_f64);
        Some(match (low, high) {
            (Some(low), Some(high)) => obs.with_interval(low, high),
            _ => obs,
        })
    }

    /// True when the record counts as a real sample for aggregation.
    pub fn is_sampled(&self) -> bool {
        self.matches > 0 && self.win_rate.is_finite()
    }
}

/// Aggregate wins/matches/win rate for one slug across all opponents.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TotalsRecord {
    pub wins: u64,
    pub matches: u64,
    #[serde(rename = "wr")]
    pub win_rate: f64,
}

/// Persisted output of one format run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixDocument {
    pub format: String,
    pub source: String,
    pub fetched_at: String,
    pub matchups: Matrix,
    pub totals: Totals,
}

impl MatrixDocument {
    /// Number of surviving rows.
    pub fn row_count(&self) -> usize {
        self.matchups.len()
    }

    /// Number of surviving directed cells.
    pub fn cell_count(&self) -> usize {
        cell_count(&self.matchups)
    }
}

pub fn cell_count<V>(matrix: &BTreeMap<Slug, BTreeMap<Slug, V>>) -> usize {
    matrix.values().map(|row| row.len()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_persisted_reads_well_formed_cells() {
        let obs = Observation::from_persisted(
            &json!({"wr": 0.35, "matches": 40, "ci_low": 0.2, "ci_high": 0.5, "note": "x"}),
        )
        .unwrap();
        assert_eq!(obs, Observation::new(0.35, 40).with_interval(0.2, 0.5));

        let whole = Observation::from_persisted(&json!({"wr": 1, "matches": 3})).unwrap();
        assert_eq!(whole.win_rate, 1.0);
    }

    #[test]
    fn test_from_persisted_skips_non_conforming_cells() {
        for cell in [
            json!({"wr": 0.6, "matches": 10.0}),
            json!({"wr": "0.6", "matches": 10}),
            json!({"wr": 0.6, "matches": -4}),
            json!({"wr": true, "matches": 10}),
            json!({"matches": 10}),
            json!("n/a"),
        ] {
            assert_eq!(Observation::from_persisted(&cell), None, "{}", cell);
        }
    }

    #[test]
    fn test_from_persisted_ignores_half_interval() {
        let obs = Observation::from_persisted(&json!({"wr": 0.5, "matches": 2, "ci_low": 0.1}))
            .unwrap();
        assert_eq!(obs.interval(), None);
    }
}
