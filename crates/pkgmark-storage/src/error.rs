use thiserror::Error;

pub type Result<T> = std::result::Result<T, StorageError>;

/// Everything that can go wrong talking to the backing store
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A thread panicked while holding the store lock
    #[error("Storage lock poisoned")]
    Poisoned,
}
