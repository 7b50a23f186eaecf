//! Table Row Sources
//!
//! Trait definition for collaborators that turn a source locator into the
//! textual rows of a matchup table. Network retrieval and HTML traversal live
//! behind this trait; the reconciler only ever sees rows of cell text.

use crate::error::MatrixError;
use crate::models::TableRows;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Trait for anything that can supply matchup table rows.
pub trait RowSource {
    /// Rows for the table at `source`. Row 0 holds the headers.
    fn fetch_rows(&self, source: &str) -> Result<TableRows, MatrixError>;

    /// Source identifier for logging/diagnostics.
    fn name(&self) -> &str {
        "unknown"
    }
}

/// Rows held in memory.
pub struct StaticRows {
    rows: TableRows,
    name: String,
}

impl StaticRows {
    pub fn new(name: impl Into<String>, rows: TableRows) -> Self {
        Self {
            rows,
            name: name.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl RowSource for StaticRows {
    fn fetch_rows(&self, _source: &str) -> Result<TableRows, MatrixError> {
        Ok(self.rows.clone())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Rows exported to a JSON file as an array of arrays of cell text.
///
/// Numbers and booleans are rendered as text, `null` as an empty cell.
/// Anything that is not an array of arrays is rejected.
pub struct JsonRowsFile {
    path: PathBuf,
    name: String,
}

impl JsonRowsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RowSource for JsonRowsFile {
    fn fetch_rows(&self, source: &str) -> Result<TableRows, MatrixError> {
        debug!(source, path = %self.path.display(), "reading exported table rows");

        if !self.path.exists() {
            return Err(MatrixError::MissingFile {
                what: "table rows",
                path: self.path.clone(),
            });
        }

        let text =
            std::fs::read_to_string(&self.path).map_err(|e| MatrixError::io(&self.path, e))?;
        let doc: Value =
            serde_json::from_str(&text).map_err(|e| MatrixError::json(&self.path, e))?;

        let invalid = |field: String| MatrixError::InvalidField {
            document: self.path.clone(),
            field,
        };

        let Value::Array(rows) = doc else {
            return Err(invalid("rows".to_string()));
        };

        rows.into_iter()
            .enumerate()
            .map(|(i, row)| match row {
                Value::Array(cells) => Ok(cells.into_iter().map(cell_text).collect()),
                _ => Err(invalid(format!("rows[{}]", i))),
            })
            .collect()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
