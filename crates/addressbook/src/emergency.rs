//! The emergency-only contact partition.
//!
//! Records here are independent of the general book: flagging a general
//! contact as emergency does not create an entry here, and entries here never
//! appear in the general list.

use std::rc::Rc;

use tracing::info;

use crate::contact::{ContactId, EmergencyContact, PhonePattern};
use crate::error::Result;
use crate::partition::Partition;
use crate::store::{SharedStore, EMERGENCY_CONTACTS_KEY};

/// Owner of the emergency-only collection stored under [`EMERGENCY_CONTACTS_KEY`].
#[derive(Debug)]
pub struct EmergencyBook {
    entries: Partition<EmergencyContact>,
    phone_pattern: PhonePattern,
}

impl EmergencyBook {
    /// Load the partition with the default phone rule.
    #[must_use]
    pub fn load(store: &SharedStore) -> Self {
        Self::with_phone_pattern(store, PhonePattern::default())
    }

    /// Load the partition with a custom phone rule.
    #[must_use]
    pub fn with_phone_pattern(store: &SharedStore, phone_pattern: PhonePattern) -> Self {
        Self {
            entries: Partition::load(Rc::clone(store), EMERGENCY_CONTACTS_KEY),
            phone_pattern,
        }
    }

    /// Validate and append a new entry, then persist.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `name` or `phone_number` is blank or the
    /// number does not match the phone rule, or a storage error if the write
    /// fails. Nothing is written on error.
    pub fn add(&mut self, name: &str, phone_number: &str) -> Result<EmergencyContact> {
        let entry = EmergencyContact::new(name, phone_number, &self.phone_pattern)?;
        self.entries.push(entry.clone())?;
        info!(id = %entry.id, "Added emergency contact");
        Ok(entry)
    }

    /// Remove the entry with `id` and persist. Returns `false` if none matched.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the collection could not be written.
    pub fn delete(&mut self, id: &ContactId) -> Result<bool> {
        let removed = self.entries.remove(id)?;
        if removed {
            info!(%id, "Deleted emergency contact");
        }
        Ok(removed)
    }

    /// All entries in insertion order.
    #[must_use]
    pub fn list(&self) -> &[EmergencyContact] {
        self.entries.records()
    }

    /// Look up an entry by id.
    #[must_use]
    pub fn get(&self, id: &ContactId) -> Option<&EmergencyContact> {
        self.entries.get(id)
    }

    /// Entries whose name or number contain `query`, ignoring case.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<EmergencyContact> {
        let needle = query.trim().to_lowercase();
        self.list()
            .iter()
            .filter(|entry| needle.is_empty() || entry.matches(&needle))
            .cloned()
            .collect()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.list().len()
    }

    /// Check if the partition is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list().is_empty()
    }

    /// The phone rule applied to new entries.
    #[must_use]
    pub fn phone_pattern(&self) -> &PhonePattern {
        &self.phone_pattern
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::AddressBook;
    use crate::store::{KeyValueStore, MemoryStore, CONTACTS_KEY};

    #[test]
    fn test_add_emergency_only_contact() {
        let store = MemoryStore::shared();
        let mut emergency = EmergencyBook::load(&store);

        let bob = emergency.add("Bob", "+1 555 000 0000").unwrap();

        assert_eq!(emergency.len(), 1);
        assert_eq!(emergency.get(&bob.id), Some(&bob));
        assert!(AddressBook::load(&store).is_empty());
        assert!(store.get(CONTACTS_KEY).unwrap().is_none());
    }

    #[test]
    fn test_add_rejects_bad_input_without_writing() {
        let store = MemoryStore::shared();
        let mut emergency = EmergencyBook::load(&store);

        for (name, phone) in [
            ("", "+1 555 000 0000"),
            ("Bob", ""),
            ("Bob", "555-0000"),
            ("Bob", "(555) 000-0000"),
        ] {
            let err = emergency.add(name, phone).unwrap_err();
            assert!(err.is_validation(), "{name}/{phone}");
        }
        assert!(emergency.is_empty());
        assert!(store.get(EMERGENCY_CONTACTS_KEY).unwrap().is_none());
    }

    #[test]
    fn test_delete() {
        let store = MemoryStore::shared();
        let mut emergency = EmergencyBook::load(&store);
        let bob = emergency.add("Bob", "+1 555 000 0000").unwrap();
        let sue = emergency.add("Sue", "555 111 2222").unwrap();

        assert!(!emergency.delete(&ContactId::from("nope")).unwrap());
        assert!(emergency.delete(&bob.id).unwrap());
        assert_eq!(emergency.list(), &[sue]);
    }

    #[test]
    fn test_reload_round_trip() {
        let store = MemoryStore::shared();
        let mut emergency = EmergencyBook::load(&store);
        emergency.add("Bob", "+1 555 000 0000").unwrap();
        emergency.add("Sue", "555 111 2222").unwrap();

        let reloaded = EmergencyBook::load(&store);
        assert_eq!(reloaded.list(), emergency.list());
    }

    #[test]
    fn test_reads_legacy_numeric_ids() {
        let store = MemoryStore::shared();
        store
            .set(
                EMERGENCY_CONTACTS_KEY,
                r#"[{"id":1717171717171,"name":"Bob","phoneNumber":"+1 555 000 0000","createdAt":"2024-05-31T16:15:17.171Z"}]"#,
            )
            .unwrap();

        let mut emergency = EmergencyBook::load(&store);
        assert_eq!(emergency.len(), 1);
        assert!(emergency
            .delete(&ContactId::from("1717171717171"))
            .unwrap());
        assert!(emergency.is_empty());
    }

    #[test]
    fn test_search() {
        let store = MemoryStore::shared();
        let mut emergency = EmergencyBook::load(&store);
        emergency.add("Bob Stone", "+1 555 000 0000").unwrap();
        emergency.add("Sue", "555 111 2222").unwrap();

        assert_eq!(emergency.search("STONE").len(), 1);
        assert_eq!(emergency.search("555").len(), 2);
        assert_eq!(emergency.search("").len(), 2);
        assert!(emergency.search("nobody").is_empty());
    }
}
