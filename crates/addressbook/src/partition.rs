//! A JSON-encoded collection mirrored under one store key.
//!
//! Both contact repositories are thin wrappers over [`Partition`]: it loads
//! the collection once, keeps it in memory, and writes the whole collection
//! back after each mutation.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::contact::{Contact, ContactId, EmergencyContact};
use crate::error::Result;
use crate::store::SharedStore;

/// A stored record with an identifier.
pub trait Record: Clone + Serialize + DeserializeOwned {
    /// The record's identifier.
    fn id(&self) -> &ContactId;
}

impl Record for Contact {
    fn id(&self) -> &ContactId {
        &self.id
    }
}

impl Record for EmergencyContact {
    fn id(&self) -> &ContactId {
        &self.id
    }
}

/// In-memory collection plus the key it is persisted under.
#[derive(Debug)]
pub(crate) struct Partition<T> {
    key: &'static str,
    store: SharedStore,
    records: Vec<T>,
}

impl<T: Record> Partition<T> {
    /// Load the collection stored under `key`.
    ///
    /// A missing key, a failed read, or unparsable JSON all yield an empty
    /// collection.
    pub(crate) fn load(store: SharedStore, key: &'static str) -> Self {
        let records = match store.get(key) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(key, error = %e, "Stored collection is corrupt, starting empty");
                Vec::new()
            }),
            Ok(None) => {
                debug!(key, "No stored collection, starting empty");
                Vec::new()
            }
            Err(e) => {
                warn!(key, error = %e, "Failed to read stored collection, starting empty");
                Vec::new()
            }
        };
        debug!(key, count = records.len(), "Loaded collection");
        Self {
            key,
            store,
            records,
        }
    }

    pub(crate) fn records(&self) -> &[T] {
        &self.records
    }

    pub(crate) fn get(&self, id: &ContactId) -> Option<&T> {
        self.records.iter().find(|record| record.id() == id)
    }

    /// Append a record and persist. On a failed write the record is dropped again.
    pub(crate) fn push(&mut self, record: T) -> Result<()> {
        self.records.push(record);
        if let Err(e) = self.persist() {
            self.records.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Remove the record with `id` and persist. Returns `false` without
    /// writing when nothing matched.
    pub(crate) fn remove(&mut self, id: &ContactId) -> Result<bool> {
        let Some(index) = self.records.iter().position(|record| record.id() == id) else {
            debug!(key = self.key, %id, "Delete of unknown id ignored");
            return Ok(false);
        };
        let removed = self.records.remove(index);
        if let Err(e) = self.persist() {
            self.records.insert(index, removed);
            return Err(e);
        }
        Ok(true)
    }

    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string(&self.records)?;
        self.store.set(self.key, &json)
    }
}
