//! Error types for the faktur-core library.

use thiserror::Error;

/// Main error type for the faktur library.
#[derive(Error, Debug)]
pub enum FakturError {
    /// The input table does not have the expected shape.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// A normalization stage hit a value it refuses to recover from.
    #[error("normalization error: {0}")]
    Normalize(#[from] NormalizeError),

    /// CSV reading or writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to the column layout of a table.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SchemaError {
    /// One or more contract columns are not present in the header.
    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumn(Vec<String>),

    /// The same column name appears more than once in the header.
    #[error("duplicate column: {0}")]
    DuplicateColumn(String),

    /// A row does not have one cell per column.
    #[error("row {row} has {found} cells, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Errors raised by the normalization stages.
#[derive(Error, Debug, PartialEq)]
pub enum NormalizeError {
    /// A percentage cell could not be parsed as a number.
    #[error("row {row}: cannot parse {column} value {value:?} as a percentage")]
    Percent {
        row: usize,
        column: String,
        value: String,
    },
}

/// Result type for the faktur library.
pub type Result<T> = std::result::Result<T, FakturError>;
