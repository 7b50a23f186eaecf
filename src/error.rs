//! Fatal run errors.
//!
//! Anything in here aborts the run for a format before output is written.
//! Recoverable anomalies (unparseable cells, unmapped names, pairs with no
//! mirror) never surface as errors; they are simply absent data.

use crate::matrix::identifiers::DuplicateIdentifierError;
use std::path::PathBuf;

#[derive(Debug)]
pub enum MatrixError {
    /// Two display names collapse onto one slug
    DuplicateIdentifier(DuplicateIdentifierError),
    /// Source table has no data rows
    TableTooShort { source: String, rows: usize },
    /// Required field absent from a document
    MissingField { document: PathBuf, field: &'static str },
    /// Required field present but of the wrong shape
    InvalidField { document: PathBuf, field: String },
    /// Expected input file does not exist
    MissingFile { what: &'static str, path: PathBuf },
    Io { path: PathBuf, source: std::io::Error },
    Json { path: PathBuf, source: serde_json::Error },
}

impl MatrixError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}

impl std::fmt::Display for MatrixError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateIdentifier(e) => write!(f, "{}", e),
            Self::TableTooShort { source, rows } => {
                write!(f, "matchup table too short at {}: {} row(s)", source, rows)
            }
            Self::MissingField { document, field } => {
                write!(f, "missing field {:?} in {}", field, document.display())
            }
            Self::InvalidField { document, field } => {
                write!(f, "invalid field {:?} in {}", field, document.display())
            }
            Self::MissingFile { what, path } => {
                write!(f, "{} missing: {}", what, path.display())
            }
            Self::Io { path, source } => write!(f, "{}: {}", path.display(), source),
            Self::Json { path, source } => {
                write!(f, "invalid JSON in {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for MatrixError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DuplicateIdentifier(e) => Some(e),
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<DuplicateIdentifierError> for MatrixError {
    fn from(e: DuplicateIdentifierError) -> Self {
        Self::DuplicateIdentifier(e)
    }
}
