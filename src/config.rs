//! Per-format file layout and identifier map loading
//!
//! A repository root holds one directory per format:
//!
//! ```text
//! data/<format>/mtgdecks-name-to-slug.json     identifier map (input)
//! data/<format>/mtgdecks-table-rows.json       table rows (input)
//! data/<format>/mtgdecks-winrate-matrix.json   matrix document (output)
//! ```

use crate::error::MatrixError;
use crate::matrix::IdentifierMap;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const ALIAS_FILE: &str = "mtgdecks-name-to-slug.json";
pub const ROWS_FILE: &str = "mtgdecks-table-rows.json";
pub const OUTPUT_FILE: &str = "mtgdecks-winrate-matrix.json";

/// Formats processed when none are named and none can be discovered.
pub const DEFAULT_FORMATS: &[&str] = &["pauper", "premodern"];

/// Placeholder substituted with the format name in a rows path override.
pub const FORMAT_PLACEHOLDER: &str = "{format}";

/// Resolved paths for one format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatConfig {
    pub name: String,
    pub alias_path: PathBuf,
    pub output_path: PathBuf,
    pub rows_path: PathBuf,
}

impl FormatConfig {
    /// Resolve paths for `format` under `repo_root`. The alias map must exist.
    pub fn load(repo_root: &Path, format: &str) -> Result<Self, MatrixError> {
        let dir = repo_root.join("data").join(format);
        let alias_path = dir.join(ALIAS_FILE);
        if !alias_path.exists() {
            return Err(MatrixError::MissingFile {
                what: "alias map",
                path: alias_path,
            });
        }

        Ok(Self {
            name: format.to_string(),
            alias_path,
            output_path: dir.join(OUTPUT_FILE),
            rows_path: dir.join(ROWS_FILE),
        })
    }

    /// Override the rows path. `{format}` in the template is replaced with
    /// the format name.
    pub fn with_rows_template(mut self, template: &str) -> Self {
        self.rows_path = PathBuf::from(template.replace(FORMAT_PLACEHOLDER, &self.name));
        self
    }
}

/// Walk up from `start` until a directory containing the pauper alias map
/// is found.
pub fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let marker = Path::new("data").join("pauper").join(ALIAS_FILE);
    start
        .ancestors()
        .find(|candidate| candidate.join(&marker).exists())
        .map(Path::to_path_buf)
}

/// Every `data/<format>` directory under `repo_root` that has an alias map,
/// sorted. Falls back to [`DEFAULT_FORMATS`] when nothing is found.
pub fn discover_formats(repo_root: &Path) -> Vec<String> {
    let mut found: Vec<String> = std::fs::read_dir(repo_root.join("data"))
        .into_iter()
        .flatten()
        .flatten()
        .filter(|entry| entry.path().join(ALIAS_FILE).is_file())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .collect();
    found.sort();

    if found.is_empty() {
        DEFAULT_FORMATS.iter().map(|f| f.to_string()).collect()
    } else {
        found
    }
}

/// Parsed identifier-map document.
#[derive(Debug, Clone)]
pub struct AliasDocument {
    pub source: String,
    pub name_to_slug: BTreeMap<String, String>,
}

impl AliasDocument {
    /// Read and shape-check an identifier-map document. Both `source` and
    /// `name_to_slug` are required; every slug must be a string.
    pub fn read(path: &Path) -> Result<Self, MatrixError> {
        let text = std::fs::read_to_string(path).map_err(|e| MatrixError::io(path, e))?;
        let doc: Value = serde_json::from_str(&text).map_err(|e| MatrixError::json(path, e))?;

        let source = match doc.get("source") {
            None => {
                return Err(MatrixError::MissingField {
                    document: path.to_path_buf(),
                    field: "source",
                })
            }
            Some(Value::String(s)) => s.clone(),
            Some(_) => {
                return Err(MatrixError::InvalidField {
                    document: path.to_path_buf(),
                    field: "source".to_string(),
                })
            }
        };

        let raw = match doc.get("name_to_slug") {
            None => {
                return Err(MatrixError::MissingField {
                    document: path.to_path_buf(),
                    field: "name_to_slug",
                })
            }
            Some(Value::Object(map)) => map,
            Some(_) => {
                return Err(MatrixError::InvalidField {
                    document: path.to_path_buf(),
                    field: "name_to_slug".to_string(),
                })
            }
        };

        let mut name_to_slug = BTreeMap::new();
        for (name, slug) in raw {
            let Value::String(slug) = slug else {
                return Err(MatrixError::InvalidField {
                    document: path.to_path_buf(),
                    field: format!("name_to_slug.{}", name),
                });
            };
            name_to_slug.insert(name.clone(), slug.clone());
        }

        Ok(Self {
            source,
            name_to_slug,
        })
    }

    /// Validate injectivity, consuming the document's map.
    pub fn into_identifiers(self, format: &str) -> Result<(String, IdentifierMap), MatrixError> {
        let ids = IdentifierMap::validate_for(format, self.name_to_slug)?;
        Ok((self.source, ids))
    }
}
