// Favorites persistence on top of a key-value store
//
// Layout:
//   favorites                -> JSON array of package names, insertion order
//   favoriteReason_<name>    -> JSON string, one record per package
//
// The list and the reasons are separate records. Removing a name from the
// list leaves its reason alone; callers that want both gone use `forget`.

use crate::{models::Favorite, Result};
use pkgmark_storage::KeyValueStore;
use tracing::{debug, warn};

/// Key holding the whole favorites list
pub const FAVORITES_KEY: &str = "favorites";

/// Prefix of every per-package reason key
pub const REASON_KEY_PREFIX: &str = "favoriteReason_";

/// Storage key for the reason attached to `name`
pub fn reason_key(name: &str) -> String {
    format!("{}{}", REASON_KEY_PREFIX, name)
}

/// The favorites list plus per-package reasons
///
/// Every call goes straight to the store - nothing is cached, so two
/// `FavoritesStore`s over the same backend always agree.
pub struct FavoritesStore<S> {
    store: S,
}

impl<S: KeyValueStore> FavoritesStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Current favorites in the order they were first added
    ///
    /// A missing record is an empty list. So is a record that doesn't decode -
    /// we log it and move on rather than wedge the whole app on one bad value.
    pub fn get_favorites(&self) -> Result<Vec<String>> {
        let Some(raw) = self.store.get(FAVORITES_KEY)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(favorites) => Ok(favorites),
            Err(e) => {
                warn!("Ignoring malformed {} record: {}", FAVORITES_KEY, e);
                Ok(Vec::new())
            }
        }
    }

    pub fn is_favorite(&self, name: &str) -> Result<bool> {
        Ok(self.get_favorites()?.iter().any(|fav| fav == name))
    }

    /// Append `name` and store `reason` for it
    ///
    /// Returns `false` without touching anything if `name` is already a
    /// favorite - the new reason is dropped, use [`add_favorite_reason`]
    /// to change it. The list write happens before the reason write and
    /// nothing is rolled back if the second one fails.
    ///
    /// [`add_favorite_reason`]: Self::add_favorite_reason
    pub fn add_to_favorites(&self, name: &str, reason: &str) -> Result<bool> {
        let mut favorites = self.get_favorites()?;
        if favorites.iter().any(|fav| fav == name) {
            debug!("{} is already a favorite, skipping", name);
            return Ok(false);
        }

        favorites.push(name.to_string());
        self.write_favorites(&favorites)?;
        self.add_favorite_reason(name, reason)?;

        debug!("Added {} to favorites ({} total)", name, favorites.len());
        Ok(true)
    }

    /// Drop `name` from the list. The reason record stays.
    pub fn remove_from_favorites(&self, name: &str) -> Result<()> {
        let mut favorites = self.get_favorites()?;
        favorites.retain(|fav| fav != name);
        self.write_favorites(&favorites)?;

        debug!("Removed {} from favorites ({} left)", name, favorites.len());
        Ok(())
    }

    /// Reason stored for `name`, `None` if there isn't one
    pub fn get_favorite_reason(&self, name: &str) -> Result<Option<String>> {
        let key = reason_key(name);
        let Some(raw) = self.store.get(&key)? else {
            return Ok(None);
        };

        match serde_json::from_str::<String>(&raw) {
            Ok(reason) => Ok(Some(reason)),
            Err(e) => {
                warn!("Ignoring malformed {} record: {}", key, e);
                Ok(None)
            }
        }
    }

    /// Overwrite the reason for `name`, favorite or not
    pub fn add_favorite_reason(&self, name: &str, reason: &str) -> Result<()> {
        let encoded = serde_json::to_string(reason)?;
        self.store.set(&reason_key(name), &encoded)?;
        Ok(())
    }

    pub fn remove_favorite_reason(&self, name: &str) -> Result<()> {
        self.store.remove(&reason_key(name))?;
        Ok(())
    }

    /// Remove `name` from the list, then remove its reason
    pub fn forget(&self, name: &str) -> Result<()> {
        self.remove_from_favorites(name)?;
        self.remove_favorite_reason(name)
    }

    /// Favorites joined with their reasons, in list order
    pub fn favorites_with_reasons(&self) -> Result<Vec<Favorite>> {
        self.get_favorites()?
            .into_iter()
            .map(|name| -> Result<Favorite> {
                let reason = self.get_favorite_reason(&name)?;
                Ok(Favorite { name, reason })
            })
            .collect()
    }

    fn write_favorites(&self, favorites: &[String]) -> Result<()> {
        let encoded = serde_json::to_string(favorites)?;
        self.store.set(FAVORITES_KEY, &encoded)?;
        Ok(())
    }
}
