//! Table cell parsing
//!
//! A populated cell reads like `70.1% - 85.3% 77.8 % 1,024 matches`:
//! confidence interval, win rate, sample size. Anything else is treated as an
//! empty cell.

use super::round4;
use crate::models::Observation;
use regex::Regex;

lazy_static::lazy_static! {
    static ref CELL_PATTERN: Regex = Regex::new(
        r"(?i)(?P<ci_low>\d+(?:\.\d+)?)%\s*-\s*(?P<ci_high>\d+(?:\.\d+)?)%\s*(?P<wr>\d+(?:\.\d+)?)\s*%\s*(?P<matches>[\d,]+)\s*matches"
    )
    .unwrap();
}

/// Replace non-breaking spaces and trim.
pub fn clean_text(value: &str) -> String {
    value.replace('\u{a0}', " ").trim().to_string()
}

/// Clean and collapse every whitespace run to a single space.
pub fn normalize_cell(value: &str) -> String {
    clean_text(value)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse one cell into an observation.
///
/// Returns `None` for empty, placeholder (`-`) or otherwise unrecognised text.
pub fn parse_cell(text: &str) -> Option<Observation> {
    let normalized = normalize_cell(text);
    let caps = CELL_PATTERN.captures(&normalized)?;

    let percent = |name: &str| -> Option<f64> {
        let raw: f64 = caps.name(name)?.as_str().parse().ok()?;
        Some(round4(raw / 100.0))
    };

    let matches: u64 = caps
        .name("matches")?
        .as_str()
        .replace(',', "")
        .parse()
        .ok()?;

    Some(Observation {
        win_rate: percent("wr")?,
        matches,
        ci_low: Some(percent("ci_low")?),
        ci_high: Some(percent("ci_high")?),
    })
}
