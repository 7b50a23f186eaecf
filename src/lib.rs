//! Matchup Matrix Library
//!
//! Reconciles a scraped archetype-vs-archetype win rate table into a
//! slug-keyed matrix with inferred mirror cells and per-deck totals.
//! The binary in main.rs wires these modules to the filesystem.

pub mod config;
pub mod error;
pub mod matrix;
pub mod models;
pub mod runner;
pub mod sources;
pub mod store;

pub use error::MatrixError;
pub use matrix::{reconcile, IdentifierMap, Reconciled};
pub use models::{Matrix, MatrixDocument, Observation, TotalsRecord};
