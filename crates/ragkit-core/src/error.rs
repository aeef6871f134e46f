use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A chunking or retrieval parameter is out of range. Raised before any I/O.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The embedding (or generation) provider failed, timed out or answered with
    /// an incomplete response.
    #[error("Provider error: {0}")]
    Provider(String),

    /// Vector dimensionality or other configuration does not line up.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The persistence layer failed during clear, insert or search.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    pub fn provider(msg: impl std::fmt::Display) -> Self {
        Self::Provider(msg.to_string())
    }

    pub fn storage(msg: impl std::fmt::Display) -> Self {
        Self::Storage(msg.to_string())
    }

    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::Configuration(format!(
            "vector dimensionality mismatch: expected {expected}, got {actual}"
        ))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
