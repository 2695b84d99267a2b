//! `addressbook` - A local address book for personal and emergency contacts
//!
//! This library provides the contact repositories, their persistent store,
//! the view renderer and the interaction controller that ties them together.
//! The `addrbook` binary hosts the controller on the command line.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod book;
pub mod cli;
pub mod config;
pub mod contact;
pub mod controller;
pub mod emergency;
pub mod error;
pub mod host;
pub mod logging;
pub mod page;
mod partition;
pub mod render;
pub mod store;
pub mod theme;

pub use book::AddressBook;
pub use config::Config;
pub use contact::{Contact, ContactDraft, ContactId, EmergencyContact, PhonePattern};
pub use controller::{Controller, Effect, Event, Settings, Surface};
pub use emergency::EmergencyBook;
pub use error::{Error, Result};
pub use host::{Host, Outcome, Presenter};
pub use logging::init_logging;
pub use page::{Element, Page};
pub use store::{KeyValueStore, MemoryStore, SharedStore, SqliteStore};
pub use theme::{Theme, ThemePreference};
