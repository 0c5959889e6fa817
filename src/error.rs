//! Error types for the colony engine.

use thiserror::Error;

/// Result type alias for engine operations
pub type AcoResult<T> = std::result::Result<T, AcoError>;

/// Engine error types
#[derive(Error, Debug)]
pub enum AcoError {
    /// Malformed or incomplete node coordinate input
    #[error("Malformed node data{}: {cause}", at_line(.line))]
    DataFormat {
        /// 1-based line number, when the input is line oriented
        line: Option<usize>,
        /// What was wrong with the record
        cause: String,
    },

    /// Out-of-domain parameter passed to an operation
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Requested node count does not match the distance matrix
    #[error("Dimension mismatch: expected {expected} nodes, distance matrix has {actual}")]
    DimensionMismatch {
        /// Number of nodes requested
        expected: usize,
        /// Dimension of the distance matrix
        actual: usize,
    },

    /// IO error while reading an instance
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON configuration or reference data
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

impl AcoError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub(crate) fn data_format(line: Option<usize>, cause: impl Into<String>) -> Self {
        Self::DataFormat {
            line,
            cause: cause.into(),
        }
    }
}

fn at_line(line: &Option<usize>) -> String {
    match line {
        Some(l) => format!(" at line {l}"),
        None => String::new(),
    }
}
