//! Matrix Document Storage
//!
//! Matrix documents are written as pretty JSON (2-space indent, keys sorted,
//! trailing newline) so that regenerated files diff cleanly.
//!
//! Prune-only reprocessing keeps every top-level field it does not own
//! (`format`, `source`, `fetched_at`, anything added by hand) and replaces
//! only `matchups` and `totals`. Cells are carried as raw JSON, so a cell
//! that does not parse as an observation is written back exactly as read.

use crate::error::MatrixError;
use crate::models::{MatrixDocument, RawMatrix, RawRow, Totals};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, info};

/// Render any serializable value the way matrix documents are stored.
///
/// Going through `Value` sorts object keys.
pub fn render<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let value = serde_json::to_value(value)?;
    let mut text = serde_json::to_string_pretty(&value)?;
    text.push('\n');
    Ok(text)
}

fn write_rendered<T: Serialize>(path: &Path, value: &T) -> Result<(), MatrixError> {
    let text = render(value).map_err(|e| MatrixError::json(path, e))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| MatrixError::io(parent, e))?;
    }
    std::fs::write(path, text).map_err(|e| MatrixError::io(path, e))?;
    info!(path = %path.display(), "wrote matrix document");
    Ok(())
}

/// Persist a freshly built document.
pub fn write_document(path: &Path, doc: &MatrixDocument) -> Result<(), MatrixError> {
    write_rendered(path, doc)
}

/// A previously written matrix document opened for reprocessing.
#[derive(Debug, Clone)]
pub struct PersistedMatrix {
    payload: Map<String, Value>,
    pub matchups: RawMatrix,
    /// Rows or cells that were not JSON objects
    pub dropped_entries: usize,
}

impl PersistedMatrix {
    /// Open `path`. The document must be an object whose `matchups` (if
    /// present) is an object; rows and cells that are not objects are
    /// dropped. Object cells are kept whatever their contents.
    pub fn read(path: &Path) -> Result<Self, MatrixError> {
        if !path.exists() {
            return Err(MatrixError::MissingFile {
                what: "output matrix",
                path: path.to_path_buf(),
            });
        }

        let text = std::fs::read_to_string(path).map_err(|e| MatrixError::io(path, e))?;
        let doc: Value = serde_json::from_str(&text).map_err(|e| MatrixError::json(path, e))?;
        let Value::Object(payload) = doc else {
            return Err(MatrixError::InvalidField {
                document: path.to_path_buf(),
                field: "<root>".to_string(),
            });
        };

        let raw = match payload.get("matchups") {
            None => Map::new(),
            Some(Value::Object(rows)) => rows.clone(),
            Some(_) => {
                return Err(MatrixError::InvalidField {
                    document: path.to_path_buf(),
                    field: "matchups".to_string(),
                })
            }
        };

        let mut matchups = RawMatrix::new();
        let mut dropped_entries = 0;
        for (from_slug, row) in raw {
            let Value::Object(cells) = row else {
                debug!(from = %from_slug, "dropping non-object row");
                dropped_entries += 1;
                continue;
            };
            let mut kept = RawRow::new();
            for (to_slug, cell) in cells {
                if cell.is_object() {
                    kept.insert(to_slug, cell);
                } else {
                    debug!(from = %from_slug, to = %to_slug, "dropping non-object cell");
                    dropped_entries += 1;
                }
            }
            matchups.insert(from_slug, kept);
        }

        Ok(Self {
            payload,
            matchups,
            dropped_entries,
        })
    }

    /// Top-level field of the original document, if present.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }

    /// Swap in reprocessed `matchups` and `totals` and write the document
    /// back to `path`.
    pub fn write(
        mut self,
        path: &Path,
        matchups: &RawMatrix,
        totals: &Totals,
    ) -> Result<(), MatrixError> {
        let to_value = |v: Result<Value, serde_json::Error>| v.map_err(|e| MatrixError::json(path, e));
        self.payload
            .insert("matchups".to_string(), to_value(serde_json::to_value(matchups))?);
        self.payload
            .insert("totals".to_string(), to_value(serde_json::to_value(totals))?);
        write_rendered(path, &self.payload)
    }
}
