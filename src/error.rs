//! Error types for loading, cleaning and charting a dataset.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the EDA pipeline.
#[derive(Error, Debug)]
pub enum EdaError {
    /// The file was found but could not be turned into a dataset.
    #[error("{}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: Box<EdaError>,
    },

    /// The input has no header row to take column names from.
    #[error("No columns to parse from file")]
    EmptyFile,

    /// A data row has a different number of fields than the header.
    #[error("Expected {expected} fields in line {line}, saw {found}")]
    RaggedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    /// Two header fields share the same name.
    #[error("Duplicate column name '{0}'")]
    DuplicateColumn(String),

    /// The prompt was answered with missing paths too many times.
    #[error("No existing file supplied after {0} attempts")]
    AttemptsExhausted(usize),

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Render options could not be parsed.
    #[error("Invalid render options: {0}")]
    Options(#[from] serde_json::Error),

    /// CSV reader error wrapper.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for EDA operations.
pub type Result<T> = std::result::Result<T, EdaError>;

impl EdaError {
    /// Wrap a parse failure with the path it came from.
    pub fn load(path: impl Into<PathBuf>, source: EdaError) -> Self {
        EdaError::Load {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// Whether this error came from reading or parsing the input file.
    pub fn is_load_failure(&self) -> bool {
        matches!(self, EdaError::Load { .. })
    }
}
