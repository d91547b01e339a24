// Core business logic - favorites persistence and the search seam
pub mod config;
pub mod error;
pub mod favorites;
pub mod models;
pub mod providers;
pub mod search;

pub use config::Config;
pub use error::Error;
pub use favorites::{reason_key, FavoritesStore, FAVORITES_KEY, REASON_KEY_PREFIX};
pub use models::{Favorite, Package, PackageLinks, SearchHit};
pub use search::{annotate, SearchProvider};

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
