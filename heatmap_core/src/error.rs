use thiserror::Error;

/// Why an input line could not become a measurement.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("expected at least 3 comma-separated fields, got {0}")]
    TooFewFields(usize),
    #[error("field {field} is not a number: {value:?}")]
    NotANumber { field: &'static str, value: String },
    #[error("negative {axis} coordinate: {value}")]
    NegativeCoordinate { axis: &'static str, value: f64 },
}

/// Why a parsed measurement was not applied to the grid.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IngestError {
    #[error("malformed line {line:?}: {source}")]
    Parse {
        line: String,
        #[source]
        source: ParseError,
    },
    #[error("coordinate ({x}, {y}) outside grid limit {max_dim}")]
    OutOfRange { x: usize, y: usize, max_dim: usize },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GridError {
    #[error("grid has no cells")]
    Empty,
    #[error("row {row} has {found} columns, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("value {value} at row {row}, column {col} is outside [0, 1]")]
    OutOfRange { row: usize, col: usize, value: f64 },
}

#[derive(Debug, Error, Clone)]
pub enum HeatmapError {
    #[error("source error: {0}")]
    Source(String),
    #[error("timeout waiting for source")]
    SourceTimeout,
    #[error("configuration error: {0}")]
    Config(String),
    #[error("image encoding failed: {0}")]
    Encode(String),
    #[error("image decoding failed: {0}")]
    Decode(String),
    #[error("io error: {0}")]
    Io(String),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;

/// Why a delimited-text grid could not be loaded. Lines and columns are 1-based.
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("csv line {line}: {source}")]
    Read {
        line: u64,
        #[source]
        source: csv::Error,
    },
    #[error("csv line {line}, column {column}: not a number: {value:?}")]
    NotANumber {
        line: u64,
        column: usize,
        value: String,
    },
    #[error("csv line {line}, column {column}: value {value} is outside [0, 1]")]
    OutOfRange { line: u64, column: usize, value: f64 },
    #[error("csv line {line}: expected {expected} columns, found {found}")]
    Ragged {
        line: u64,
        expected: usize,
        found: usize,
    },
    #[error("csv contains no rows")]
    Empty,
}
