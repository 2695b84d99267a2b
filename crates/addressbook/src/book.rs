//! The general contact repository.

use std::rc::Rc;

use tracing::info;

use crate::contact::{Contact, ContactDraft, ContactId, PhonePattern};
use crate::error::Result;
use crate::partition::Partition;
use crate::store::{SharedStore, CONTACTS_KEY};

/// Owner of the general contact collection.
///
/// The collection is read from the store once, at construction, and every
/// mutation writes the whole collection back under [`CONTACTS_KEY`].
#[derive(Debug)]
pub struct AddressBook {
    contacts: Partition<Contact>,
    phone_pattern: PhonePattern,
}

impl AddressBook {
    /// Load the address book from `store` with the default phone rule.
    ///
    /// Never fails: missing or unreadable data yields an empty book.
    #[must_use]
    pub fn load(store: &SharedStore) -> Self {
        Self::with_phone_pattern(store, PhonePattern::default())
    }

    /// Load the address book with a custom phone rule.
    #[must_use]
    pub fn with_phone_pattern(store: &SharedStore, phone_pattern: PhonePattern) -> Self {
        Self {
            contacts: Partition::load(Rc::clone(store), CONTACTS_KEY),
            phone_pattern,
        }
    }

    /// Validate `draft`, append it as a new contact, and persist.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad input, or a storage error if the
    /// collection could not be written. Either way the book is unchanged.
    pub fn add(&mut self, draft: ContactDraft) -> Result<Contact> {
        let contact = draft.into_contact(&self.phone_pattern)?;
        self.contacts.push(contact.clone())?;
        info!(id = %contact.id, emergency = contact.is_emergency, "Added contact");
        Ok(contact)
    }

    /// Remove the contact with `id` and persist.
    ///
    /// Returns `false` if no contact had that id.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the collection could not be written, in
    /// which case the contact is kept.
    pub fn delete(&mut self, id: &ContactId) -> Result<bool> {
        let removed = self.contacts.remove(id)?;
        if removed {
            info!(%id, "Deleted contact");
        }
        Ok(removed)
    }

    /// All contacts in insertion order.
    #[must_use]
    pub fn list(&self) -> &[Contact] {
        self.contacts.records()
    }

    /// Look up a contact by id.
    #[must_use]
    pub fn get(&self, id: &ContactId) -> Option<&Contact> {
        self.contacts.get(id)
    }

    /// Contacts whose name, email, phone or address contain `query`,
    /// ignoring case. A blank query returns every contact.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<Contact> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.list().to_vec();
        }
        self.list()
            .iter()
            .filter(|contact| contact.matches(&needle))
            .cloned()
            .collect()
    }

    /// Contacts flagged for the emergency page, in insertion order.
    #[must_use]
    pub fn emergency(&self) -> Vec<Contact> {
        self.list()
            .iter()
            .filter(|contact| contact.is_emergency)
            .cloned()
            .collect()
    }

    /// Number of contacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.list().len()
    }

    /// Check if the book has no contacts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list().is_empty()
    }

    /// The phone rule applied to new contacts.
    #[must_use]
    pub fn phone_pattern(&self) -> &PhonePattern {
        &self.phone_pattern
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::store::{KeyValueStore, MemoryStore, SqliteStore};

    /// A store whose writes always fail.
    #[derive(Debug)]
    struct ReadOnlyStore(MemoryStore);

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.0.get(key)
        }

        fn set(&self, key: &str, _value: &str) -> Result<()> {
            Err(Error::store_write(key, "read-only"))
        }
    }

    fn draft(first: &str, last: &str) -> ContactDraft {
        ContactDraft::new(first, last, "555-123-4567")
    }

    fn book_with(names: &[(&str, &str)]) -> (SharedStore, AddressBook) {
        let store = MemoryStore::shared();
        let mut book = AddressBook::load(&store);
        for (first, last) in names {
            book.add(draft(first, last)).unwrap();
        }
        (store, book)
    }

    #[test]
    fn test_load_empty_store() {
        let store = MemoryStore::shared();
        let book = AddressBook::load(&store);
        assert!(book.is_empty());
    }

    #[test]
    fn test_load_corrupt_data_is_empty() {
        let store = MemoryStore::shared();
        store.set(CONTACTS_KEY, "{not json").unwrap();
        assert!(AddressBook::load(&store).is_empty());

        store.set(CONTACTS_KEY, r#"{"id": "1"}"#).unwrap();
        assert!(AddressBook::load(&store).is_empty());
    }

    #[test]
    fn test_add_appends_one_with_fresh_id() {
        let (_, mut book) = book_with(&[("Ann", "Lee")]);
        let added = book.add(draft("Bob", "Ray")).unwrap();

        assert_eq!(book.len(), 2);
        let matching: Vec<_> = book.list().iter().filter(|c| c.id == added.id).collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].first_name, "Bob");
        assert_eq!(matching[0].last_name, "Ray");
        assert_eq!(matching[0].phone, "555-123-4567");
        assert_ne!(book.list()[0].id, added.id);
    }

    #[test]
    fn test_add_allows_duplicates() {
        let (_, book) = book_with(&[("Ann", "Lee"), ("Ann", "Lee")]);
        assert_eq!(book.len(), 2);
        assert_ne!(book.list()[0].id, book.list()[1].id);
    }

    #[test]
    fn test_add_rejects_missing_fields() {
        let (store, mut book) = book_with(&[("Ann", "Lee")]);
        let before = store.get(CONTACTS_KEY).unwrap();

        for bad in [
            ContactDraft::new("", "Lee", "555-123-4567"),
            ContactDraft::new("Ann", "", "555-123-4567"),
            ContactDraft::new("Ann", "Lee", ""),
            ContactDraft::new("Ann", "Lee", "123"),
        ] {
            let err = book.add(bad).unwrap_err();
            assert!(err.is_validation());
            assert_eq!(book.len(), 1);
        }
        assert_eq!(store.get(CONTACTS_KEY).unwrap(), before);
    }

    #[test]
    fn test_add_persists_full_collection() {
        let (store, _) = book_with(&[("Ann", "Lee"), ("Bob", "Ray")]);
        let raw = store.get(CONTACTS_KEY).unwrap().unwrap();
        let stored: Vec<Contact> = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[1].first_name, "Bob");
    }

    #[test]
    fn test_delete_removes_only_target() {
        let (_, mut book) = book_with(&[("Ann", "Lee"), ("Bob", "Ray"), ("Cat", "Fox")]);
        let target = book.list()[1].id.clone();

        assert!(book.delete(&target).unwrap());

        let names: Vec<_> = book.list().iter().map(Contact::full_name).collect();
        assert_eq!(names, vec!["Ann Lee", "Cat Fox"]);
        assert!(book.get(&target).is_none());
    }

    #[test]
    fn test_delete_unknown_is_noop() {
        let (store, mut book) = book_with(&[("Ann", "Lee")]);
        let before = store.get(CONTACTS_KEY).unwrap();

        assert!(!book.delete(&ContactId::from("missing")).unwrap());
        assert_eq!(book.len(), 1);
        assert_eq!(store.get(CONTACTS_KEY).unwrap(), before);
    }

    #[test]
    fn test_search_case_insensitive_and_idempotent() {
        let (_, book) = book_with(&[("Jane", "Smith"), ("Bob", "Ray"), ("John", "Smithers")]);

        let upper = book.search("SMITH");
        let lower = book.search("smith");
        assert_eq!(upper, lower);
        assert_eq!(upper.len(), 2);
        assert_eq!(book.search("smith"), lower);
    }

    #[test]
    fn test_search_empty_returns_all() {
        let (_, book) = book_with(&[("Jane", "Smith"), ("Bob", "Ray")]);
        assert_eq!(book.search(""), book.list().to_vec());
        assert_eq!(book.search("   ").len(), 2);
    }

    #[test]
    fn test_search_optional_fields() {
        let store = MemoryStore::shared();
        let mut book = AddressBook::load(&store);
        book.add(draft("Ann", "Lee").email("ann@example.com")).unwrap();
        book.add(draft("Bob", "Ray").address("12 Elm Street")).unwrap();
        book.add(draft("Cat", "Fox").notes("elm tree fan")).unwrap();

        assert_eq!(book.search("EXAMPLE").len(), 1);
        let elm = book.search("elm");
        assert_eq!(elm.len(), 1);
        assert_eq!(elm[0].first_name, "Bob");
        assert!(book.search("zzz").is_empty());
        assert_eq!(book.len(), 3);
    }

    #[test]
    fn test_emergency_subset() {
        let store = MemoryStore::shared();
        let mut book = AddressBook::load(&store);
        book.add(draft("Ann", "Lee").emergency(true)).unwrap();
        book.add(draft("Bob", "Ray")).unwrap();

        let emergency = book.emergency();
        assert_eq!(emergency.len(), 1);
        assert_eq!(emergency[0].first_name, "Ann");
    }

    #[test]
    fn test_reload_round_trip() {
        let store: SharedStore = Rc::new(SqliteStore::open_in_memory().unwrap());
        let mut book = AddressBook::load(&store);
        book.add(draft("Ann", "Lee").email("ann@example.com").emergency(true))
            .unwrap();
        book.add(draft("Bob", "Ray").address("1 Main St").notes("cousin"))
            .unwrap();
        book.add(draft("Cat", "Fox")).unwrap();

        let reloaded = AddressBook::load(&store);
        assert_eq!(reloaded.list(), book.list());
    }

    #[test]
    fn test_failed_write_leaves_book_unchanged() {
        let seed = MemoryStore::new();
        let existing = draft("Ann", "Lee")
            .into_contact(&PhonePattern::default())
            .unwrap();
        seed.set(CONTACTS_KEY, &serde_json::to_string(&[&existing]).unwrap())
            .unwrap();
        let store: SharedStore = Rc::new(ReadOnlyStore(seed));
        let mut book = AddressBook::load(&store);

        assert!(book.add(draft("Bob", "Ray")).is_err());
        assert_eq!(book.len(), 1);

        assert!(book.delete(&existing.id).is_err());
        assert_eq!(book.list(), &[existing]);
    }

    #[test]
    fn test_custom_phone_pattern() {
        let store = MemoryStore::shared();
        let mut book =
            AddressBook::with_phone_pattern(&store, PhonePattern::new(r"^\d{3}$").unwrap());

        assert!(book.add(ContactDraft::new("Ann", "Lee", "911")).is_ok());
        assert!(book.add(ContactDraft::new("Bob", "Ray", "555-123-4567")).is_err());
        assert_eq!(book.phone_pattern().as_str(), r"^\d{3}$");
    }
}
