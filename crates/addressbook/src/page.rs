//! The pages of the address book and the elements they carry.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::render::ViewMode;

/// A navigable page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Page {
    /// `view.html`: every contact.
    ViewContacts,
    /// `emergency-contacts.html`: emergency contacts.
    EmergencyContacts,
    /// `add.html`: the general contact form.
    AddContact,
    /// `add-emergency.html`: the emergency-only form.
    AddEmergency,
}

impl Page {
    /// All pages.
    pub const ALL: [Page; 4] = [
        Self::ViewContacts,
        Self::EmergencyContacts,
        Self::AddContact,
        Self::AddEmergency,
    ];

    /// The page's file name, used as navigation target.
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Self::ViewContacts => "view.html",
            Self::EmergencyContacts => "emergency-contacts.html",
            Self::AddContact => "add.html",
            Self::AddEmergency => "add-emergency.html",
        }
    }

    /// Resolve a path or URL to a page. Unknown paths are the contact list.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let file = path.rsplit('/').next().unwrap_or_default();
        Self::ALL
            .into_iter()
            .find(|page| page.file_name() == file)
            .unwrap_or(Self::ViewContacts)
    }

    /// Which subset and layout the page renders.
    #[must_use]
    pub fn view_mode(self) -> ViewMode {
        match self {
            Self::EmergencyContacts | Self::AddEmergency => ViewMode::Emergency,
            Self::ViewContacts | Self::AddContact => ViewMode::General,
        }
    }

    /// The elements the page is built with.
    #[must_use]
    pub fn elements(self) -> BTreeSet<Element> {
        let ids: &[Element] = match self {
            Self::ViewContacts | Self::EmergencyContacts => &[
                Element::ContactsList,
                Element::SearchInput,
                Element::ContactModal,
            ],
            Self::AddContact => &[Element::ContactForm],
            Self::AddEmergency => &[Element::EmergencyForm],
        };
        ids.iter().copied().collect()
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_name())
    }
}

/// An element the controller binds to, by its document id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Element {
    /// `contactsList`: the list container.
    ContactsList,
    /// `searchInput`: the search box.
    SearchInput,
    /// `contactForm`: the general contact form.
    ContactForm,
    /// `emergencyForm`: the emergency-only form.
    EmergencyForm,
    /// `contactModal`: the detail modal container.
    ContactModal,
}

impl Element {
    /// The element's document id.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::ContactsList => "contactsList",
            Self::SearchInput => "searchInput",
            Self::ContactForm => "contactForm",
            Self::EmergencyForm => "emergencyForm",
            Self::ContactModal => "contactModal",
        }
    }
}
