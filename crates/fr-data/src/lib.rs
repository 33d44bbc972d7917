//! Telemetry table types for the flight replay engine
//!
//! The engine never parses files itself. Callers build a [`Table`] from
//! whatever they loaded (text rows, typed columns or an arrow batch) and hand
//! it over as an `Arc<Table>`.

pub mod config;
pub mod index;
pub mod schema;
pub mod table;

mod arrow_ingest;

use arrow::error::ArrowError;
use thiserror::Error;

// Re-exports
pub use config::NullConfig;
pub use index::TimeIndex;
pub use schema::{ColumnStats, SchemaDetector};
pub use table::{Column, ColumnData, Table};

/// Errors that can occur while building or reading a table
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Column '{column}' has {found} rows, expected {expected}")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("Row {row} has {found} fields, expected {expected}")]
    RowWidthMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Arrow error: {0}")]
    Arrow(ArrowError),
}

impl From<ArrowError> for DataError {
    fn from(error: ArrowError) -> Self {
        DataError::Arrow(error)
    }
}
