// Local key-value storage - the only place favorites ever get persisted
// String keys in, string values out. Callers own the encoding.

pub mod error;
pub mod memory;
pub mod sqlite;
pub mod store;

pub use error::{Result, StorageError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use store::KeyValueStore;
