use finex_config::ConfigError;
use finex_core::CoreError;
use thiserror::Error;

/// Error type surfaced by the dashboard facade and the CLI.
#[derive(Debug, Error)]
pub enum FinexError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type FinexResult<T> = Result<T, FinexError>;
