use std::io;

use finex_domain::ParseEnumError;
use thiserror::Error;

/// Failures reported by the aggregation, encoding and repository layers.
///
/// Aggregation only ever yields `InvalidInput` or `InvalidArgument`; the
/// remaining variants come from CSV encoding and snapshot persistence.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<ParseEnumError> for CoreError {
    fn from(err: ParseEnumError) -> Self {
        CoreError::InvalidArgument(err.to_string())
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
