//! Per-format run orchestration
//!
//! Each run either completes and (unless dry-run) writes its document, or
//! fails before anything touches disk.

use crate::config::{AliasDocument, FormatConfig};
use crate::error::MatrixError;
use crate::matrix::{self, IdentifierMap};
use crate::models::{cell_count, MatrixDocument};
use crate::sources::RowSource;
use crate::store::{self, PersistedMatrix};
use chrono::{SecondsFormat, Utc};
use std::path::PathBuf;
use tracing::{info, warn};

/// Current UTC time at second precision, e.g. `2026-10-19T08:30:00Z`.
pub fn fetched_at_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// What a run left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub format: String,
    pub rows: usize,
    pub cells: usize,
    pub output_path: PathBuf,
    pub written: bool,
}

impl RunReport {
    pub fn summary(&self, pruned: bool) -> String {
        let label = if pruned { "pruned mirrors " } else { "" };
        format!(
            "{}: {}rows={} cells={} output={}",
            self.format,
            label,
            self.rows,
            self.cells,
            self.output_path.display()
        )
    }
}

fn load_identifiers(config: &FormatConfig) -> Result<(String, IdentifierMap), MatrixError> {
    AliasDocument::read(&config.alias_path)?.into_identifiers(&config.name)
}

/// Fetch, reconcile and aggregate one format's table.
pub fn build_matrix(
    config: &FormatConfig,
    rows_source: &dyn RowSource,
    fetched_at: &str,
) -> Result<MatrixDocument, MatrixError> {
    let (source, ids) = load_identifiers(config)?;
    info!(
        format = %config.name,
        names = ids.len(),
        rows_source = rows_source.name(),
        "identifier map validated"
    );

    let rows = rows_source.fetch_rows(&source)?;
    if rows.len() < 2 {
        return Err(MatrixError::TableTooShort {
            source,
            rows: rows.len(),
        });
    }

    let reconciled = matrix::reconcile(&rows, &ids);
    let skipped = reconciled.assembly.rows_unmapped;
    if skipped > 0 {
        warn!(format = %config.name, skipped, "table rows without a slug mapping");
    }

    Ok(MatrixDocument {
        format: config.name.clone(),
        source,
        fetched_at: fetched_at.to_string(),
        matchups: reconciled.matchups,
        totals: reconciled.totals,
    })
}

/// Build and, unless `dry_run`, persist one format.
pub fn run_build(
    config: &FormatConfig,
    rows_source: &dyn RowSource,
    fetched_at: &str,
    dry_run: bool,
) -> Result<RunReport, MatrixError> {
    let doc = build_matrix(config, rows_source, fetched_at)?;

    if !dry_run {
        store::write_document(&config.output_path, &doc)?;
    }

    Ok(RunReport {
        format: config.name.clone(),
        rows: doc.row_count(),
        cells: doc.cell_count(),
        output_path: config.output_path.clone(),
        written: !dry_run,
    })
}

/// Re-prune and re-aggregate an existing document without fetching.
pub fn prune_existing(config: &FormatConfig, dry_run: bool) -> Result<RunReport, MatrixError> {
    let (_, ids) = load_identifiers(config)?;
    let mut persisted = PersistedMatrix::read(&config.output_path)?;
    if persisted.dropped_entries > 0 {
        warn!(
            format = %config.name,
            dropped = persisted.dropped_entries,
            "ignored non-object entries in persisted matrix"
        );
    }

    let (matchups, totals) = matrix::reaggregate(std::mem::take(&mut persisted.matchups), &ids);
    let rows = matchups.len();
    let cells = cell_count(&matchups);

    if !dry_run {
        persisted.write(&config.output_path, &matchups, &totals)?;
    }

    Ok(RunReport {
        format: config.name.clone(),
        rows,
        cells,
        output_path: config.output_path.clone(),
        written: !dry_run,
    })
}
