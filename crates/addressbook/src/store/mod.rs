//! Key-value persistence for the address book.
//!
//! Every collection is stored as a single JSON string under a well-known key,
//! the same layout a browser page keeps in local storage. The store itself is
//! deliberately dumb: repositories own their keys and do all encoding.

pub mod schema;
mod sqlite;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::Result;

pub use sqlite::SqliteStore;

/// Key holding the general contact collection.
pub const CONTACTS_KEY: &str = "contacts";

/// Key holding the emergency-only partition.
pub const EMERGENCY_CONTACTS_KEY: &str = "emergencyContacts";

/// Key holding the theme preference.
pub const THEME_KEY: &str = "theme";

/// A synchronous string-keyed, string-valued store.
///
/// Methods take `&self`; implementations use interior mutability. The address
/// book is single-threaded, so stores are shared through [`SharedStore`].
pub trait KeyValueStore: std::fmt::Debug {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// A store handle shared by the repositories of one session.
pub type SharedStore = Rc<dyn KeyValueStore>;

/// A store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store already wrapped for sharing.
    #[must_use]
    pub fn shared() -> SharedStore {
        Rc::new(Self::new())
    }

    /// Number of keys currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Check if nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_get_missing() {
        let store = MemoryStore::new();
        assert!(store.get(CONTACTS_KEY).unwrap().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_memory_store_set_and_replace() {
        let store = MemoryStore::new();
        store.set(THEME_KEY, "dark").unwrap();
        store.set(THEME_KEY, "light").unwrap();

        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("light"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_keys_are_distinct() {
        assert_ne!(CONTACTS_KEY, EMERGENCY_CONTACTS_KEY);
        assert_ne!(CONTACTS_KEY, THEME_KEY);
        assert_ne!(EMERGENCY_CONTACTS_KEY, THEME_KEY);
    }

    #[test]
    fn test_shared_store_is_shared() {
        let store = MemoryStore::shared();
        let other = Rc::clone(&store);
        store.set(CONTACTS_KEY, "[]").unwrap();
        assert_eq!(other.get(CONTACTS_KEY).unwrap().as_deref(), Some("[]"));
    }
}
