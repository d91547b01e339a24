use thiserror::Error;

/// All the ways things can go wrong in pkgmark
#[derive(Error, Debug)]
pub enum Error {
    #[error("Storage operation failed: {0}")]
    Storage(#[from] pkgmark_storage::StorageError),

    #[error("Search request failed: {0}")]
    ApiError(#[from] pkgmark_api::NpmsError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
