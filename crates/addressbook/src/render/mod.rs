//! View construction.
//!
//! The functions here are pure: they take contacts and a [`ViewMode`] and
//! return a structured description of what to show. Turning a description
//! into markup is the job of [`html`]; the controller and the CLI decide
//! where the result goes.

pub mod html;

use serde::Serialize;

use crate::contact::{Contact, ContactId, EmergencyContact};
use crate::page::Page;

/// Which subset and card layout a page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// Every contact, full cards.
    #[default]
    General,
    /// Emergency contacts only, reduced cards.
    Emergency,
}

impl ViewMode {
    /// Derive the mode from a page path or URL.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        Page::from_path(path).view_mode()
    }

    /// The page that creates contacts for this mode.
    #[must_use]
    pub fn add_page(self) -> Page {
        match self {
            Self::General => Page::AddContact,
            Self::Emergency => Page::AddEmergency,
        }
    }

    fn noun(self) -> &'static str {
        match self {
            Self::General => "contacts",
            Self::Emergency => "emergency contacts",
        }
    }
}

/// Why a list came out empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReason {
    /// Nothing has been stored yet.
    NoContacts,
    /// A search filtered everything out.
    NoMatches,
}

/// A navigation link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    /// Visible text.
    pub label: &'static str,
    /// Destination page.
    pub href: &'static str,
}

/// Placeholder shown instead of an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmptyState {
    /// Decorative icon.
    pub icon: &'static str,
    /// Explanation.
    pub text: String,
    /// Call to action.
    pub action: Link,
}

/// The kind of contact detail a [`Field`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Email address.
    Email,
    /// Phone number.
    Phone,
    /// Postal address.
    Address,
    /// Free-form notes.
    Notes,
}

impl FieldKind {
    /// Heading used in the detail view.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Address => "Address",
            Self::Notes => "Notes",
        }
    }

    /// Icon class used on cards.
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::Email => "fa-envelope",
            Self::Phone => "fa-phone",
            Self::Address => "fa-map-marker-alt",
            Self::Notes => "fa-sticky-note",
        }
    }
}

/// One displayed contact detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    /// What the value is.
    pub kind: FieldKind,
    /// Displayed text (may be a placeholder such as `N/A`).
    pub value: String,
    /// Link target, if the value is clickable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl Field {
    fn email(email: Option<&str>, placeholder: &str) -> Self {
        Self {
            kind: FieldKind::Email,
            value: email.unwrap_or(placeholder).to_string(),
            href: Some(format!("mailto:{}", email.unwrap_or_default())),
        }
    }

    fn phone(phone: &str) -> Self {
        Self {
            kind: FieldKind::Phone,
            value: phone.to_string(),
            href: Some(tel(phone)),
        }
    }

    fn plain(kind: FieldKind, value: Option<&str>, placeholder: &str) -> Self {
        Self {
            kind,
            value: value.unwrap_or(placeholder).to_string(),
            href: None,
        }
    }
}

/// Something the user can do from a card or the detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "target", rename_all = "snake_case")]
pub enum Action {
    /// Open the detail view.
    View(ContactId),
    /// Delete after confirmation.
    Delete(ContactId),
    /// Dial the number (`tel:` URI).
    Call(String),
    /// Close the detail view.
    Close,
}

/// A contact in a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    /// Identifier of the rendered record.
    pub id: ContactId,
    /// Display name.
    pub name: String,
    /// Whether the "Emergency" badge is shown.
    pub emergency_badge: bool,
    /// Displayed details.
    pub fields: Vec<Field>,
    /// Buttons.
    pub actions: Vec<Action>,
}

/// A rendered list: cards, or the empty state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum ListView {
    /// Nothing to show.
    Empty(EmptyState),
    /// At least one card.
    Cards(Vec<Card>),
}

impl ListView {
    /// The cards, empty for the empty state.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        match self {
            Self::Empty(_) => &[],
            Self::Cards(cards) => cards,
        }
    }

    /// Check whether this is the empty state.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty(_))
    }
}

/// The contents of the detail modal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailView {
    /// Identifier of the rendered record.
    pub id: ContactId,
    /// Display name.
    pub name: String,
    /// Whether the "Emergency" badge is shown.
    pub emergency_badge: bool,
    /// Displayed details with headings.
    pub fields: Vec<Field>,
    /// Buttons.
    pub actions: Vec<Action>,
}

fn tel(phone: &str) -> String {
    format!("tel:{phone}")
}

/// The empty state for `mode`.
#[must_use]
pub fn empty_state(mode: ViewMode, reason: EmptyReason) -> EmptyState {
    let (icon, text, label) = match reason {
        EmptyReason::NoContacts => (
            match mode {
                ViewMode::General => "📋",
                ViewMode::Emergency => "🚨",
            },
            format!("No {} available yet", mode.noun()),
            "Add Your First Contact",
        ),
        EmptyReason::NoMatches => (
            "🔍",
            format!("No {} found", mode.noun()),
            "Add New Contact",
        ),
    };
    EmptyState {
        icon,
        text,
        action: Link {
            label,
            href: mode.add_page().file_name(),
        },
    }
}

fn full_card(contact: &Contact) -> Card {
    Card {
        id: contact.id.clone(),
        name: contact.full_name(),
        emergency_badge: contact.is_emergency,
        fields: vec![
            Field::email(contact.email.as_deref(), "N/A"),
            Field::phone(&contact.phone),
            Field::plain(FieldKind::Address, contact.address.as_deref(), "N/A"),
        ],
        actions: vec![
            Action::View(contact.id.clone()),
            Action::Delete(contact.id.clone()),
        ],
    }
}

fn reduced_card(id: &ContactId, name: String, phone: &str) -> Card {
    Card {
        id: id.clone(),
        name,
        emergency_badge: true,
        fields: vec![Field::phone(phone)],
        actions: vec![Action::Call(tel(phone)), Action::Delete(id.clone())],
    }
}

fn cards_or_empty(cards: Vec<Card>, mode: ViewMode, reason: EmptyReason) -> ListView {
    if cards.is_empty() {
        ListView::Empty(empty_state(mode, reason))
    } else {
        ListView::Cards(cards)
    }
}

/// Render general contacts for `mode`.
///
/// In emergency mode only flagged contacts are shown, as reduced cards.
/// `reason` picks the empty state if nothing is left to show.
#[must_use]
pub fn contact_list(contacts: &[Contact], mode: ViewMode, reason: EmptyReason) -> ListView {
    let cards = match mode {
        ViewMode::General => contacts.iter().map(full_card).collect(),
        ViewMode::Emergency => contacts
            .iter()
            .filter(|contact| contact.is_emergency)
            .map(|contact| reduced_card(&contact.id, contact.full_name(), &contact.phone))
            .collect(),
    };
    cards_or_empty(cards, mode, reason)
}

/// Render records of the emergency-only partition.
#[must_use]
pub fn emergency_entries(entries: &[EmergencyContact], reason: EmptyReason) -> ListView {
    let cards = entries
        .iter()
        .map(|entry| reduced_card(&entry.id, entry.name.clone(), &entry.phone_number))
        .collect();
    cards_or_empty(cards, ViewMode::Emergency, reason)
}

/// Render the emergency page: flagged general contacts followed by the
/// emergency-only partition.
#[must_use]
pub fn emergency_page(
    contacts: &[Contact],
    entries: &[EmergencyContact],
    reason: EmptyReason,
) -> ListView {
    let mut cards = contact_list(contacts, ViewMode::Emergency, reason)
        .cards()
        .to_vec();
    cards.extend(emergency_entries(entries, reason).cards().iter().cloned());
    cards_or_empty(cards, ViewMode::Emergency, reason)
}

/// Render the detail modal for a general contact.
///
/// A flagged contact opened from the emergency page gets the reduced view.
#[must_use]
pub fn contact_detail(contact: &Contact, mode: ViewMode) -> DetailView {
    if contact.is_emergency && mode == ViewMode::Emergency {
        return reduced_detail(&contact.id, contact.full_name(), &contact.phone);
    }

    let mut fields = vec![
        Field {
            href: None,
            ..Field::email(contact.email.as_deref(), "Not provided")
        },
        Field {
            href: None,
            ..Field::phone(&contact.phone)
        },
        Field::plain(
            FieldKind::Address,
            contact.address.as_deref(),
            "Not provided",
        ),
    ];
    if let Some(notes) = &contact.notes {
        fields.push(Field::plain(FieldKind::Notes, Some(notes.as_str()), ""));
    }

    DetailView {
        id: contact.id.clone(),
        name: contact.full_name(),
        emergency_badge: contact.is_emergency,
        fields,
        actions: vec![Action::Close, Action::Delete(contact.id.clone())],
    }
}

/// Render the detail modal for an emergency-only record.
#[must_use]
pub fn entry_detail(entry: &EmergencyContact) -> DetailView {
    reduced_detail(&entry.id, entry.name.clone(), &entry.phone_number)
}

fn reduced_detail(id: &ContactId, name: String, phone: &str) -> DetailView {
    DetailView {
        id: id.clone(),
        name,
        emergency_badge: true,
        fields: vec![Field::plain(FieldKind::Phone, Some(phone), "")],
        actions: vec![Action::Close, Action::Call(tel(phone))],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::{ContactDraft, PhonePattern};

    fn contact(first: &str, emergency: bool) -> Contact {
        ContactDraft::new(first, "Lee", "555-123-4567")
            .emergency(emergency)
            .into_contact(&PhonePattern::default())
            .unwrap()
    }

    #[test]
    fn test_mode_from_path() {
        assert_eq!(
            ViewMode::from_path("/app/emergency-contacts.html"),
            ViewMode::Emergency
        );
        assert_eq!(ViewMode::from_path("/app/view.html"), ViewMode::General);
        assert_eq!(ViewMode::from_path("/"), ViewMode::General);
    }

    #[test]
    fn test_empty_states_differ_per_mode() {
        let general = empty_state(ViewMode::General, EmptyReason::NoContacts);
        let emergency = empty_state(ViewMode::Emergency, EmptyReason::NoContacts);

        assert_eq!(general.icon, "📋");
        assert_eq!(general.text, "No contacts available yet");
        assert_eq!(general.action.href, "add.html");
        assert_eq!(emergency.icon, "🚨");
        assert_eq!(emergency.text, "No emergency contacts available yet");
        assert_eq!(emergency.action.href, "add-emergency.html");
        assert_eq!(emergency.action.label, "Add Your First Contact");
    }

    #[test]
    fn test_empty_state_for_search() {
        let state = empty_state(ViewMode::Emergency, EmptyReason::NoMatches);
        assert_eq!(state.icon, "🔍");
        assert_eq!(state.text, "No emergency contacts found");
        assert_eq!(state.action.label, "Add New Contact");
    }

    #[test]
    fn test_general_list_full_cards_with_badge() {
        let contacts = vec![contact("Ann", true), contact("Bob", false)];
        let view = contact_list(&contacts, ViewMode::General, EmptyReason::NoContacts);
        let cards = view.cards();

        assert_eq!(cards.len(), 2);
        assert!(cards[0].emergency_badge);
        assert!(!cards[1].emergency_badge);
        assert_eq!(cards[1].fields.len(), 3);
        assert_eq!(cards[1].fields[0].value, "N/A");
        assert_eq!(cards[1].fields[2].value, "N/A");
        assert_eq!(
            cards[1].actions,
            vec![
                Action::View(contacts[1].id.clone()),
                Action::Delete(contacts[1].id.clone())
            ]
        );
    }

    #[test]
    fn test_emergency_list_reduced_cards() {
        let contacts = vec![contact("Ann", true), contact("Bob", false)];
        let view = contact_list(&contacts, ViewMode::Emergency, EmptyReason::NoContacts);
        let cards = view.cards();

        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].name, "Ann Lee");
        assert_eq!(cards[0].fields.len(), 1);
        assert_eq!(cards[0].fields[0].kind, FieldKind::Phone);
        assert!(cards[0]
            .actions
            .contains(&Action::Call("tel:555-123-4567".to_string())));
    }

    #[test]
    fn test_emergency_list_without_flagged_is_empty() {
        let contacts = vec![contact("Bob", false)];
        let view = contact_list(&contacts, ViewMode::Emergency, EmptyReason::NoContacts);
        assert_eq!(
            view,
            ListView::Empty(empty_state(ViewMode::Emergency, EmptyReason::NoContacts))
        );
    }

    #[test]
    fn test_emergency_page_merges_partitions() {
        let contacts = vec![contact("Ann", true)];
        let entry =
            EmergencyContact::new("Bob", "+1 555 000 0000", &PhonePattern::default()).unwrap();
        let view = emergency_page(&contacts, &[entry.clone()], EmptyReason::NoContacts);

        let names: Vec<_> = view.cards().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Ann Lee", "Bob"]);
        assert_eq!(view.cards()[1].id, entry.id);
        assert!(emergency_page(&[], &[], EmptyReason::NoContacts).is_empty());
    }

    #[test]
    fn test_full_detail() {
        let mut ann = contact("Ann", false);
        ann.notes = Some("likes tea".to_string());
        let detail = contact_detail(&ann, ViewMode::General);

        assert!(!detail.emergency_badge);
        let values: Vec<_> = detail.fields.iter().map(|f| f.value.as_str()).collect();
        assert_eq!(
            values,
            vec!["Not provided", "555-123-4567", "Not provided", "likes tea"]
        );
        assert_eq!(
            detail.actions,
            vec![Action::Close, Action::Delete(ann.id.clone())]
        );
    }

    #[test]
    fn test_detail_omits_absent_notes() {
        let detail = contact_detail(&contact("Ann", false), ViewMode::General);
        assert!(detail.fields.iter().all(|f| f.kind != FieldKind::Notes));
    }

    #[test]
    fn test_reduced_detail_only_on_emergency_page() {
        let ann = contact("Ann", true);

        let reduced = contact_detail(&ann, ViewMode::Emergency);
        assert_eq!(reduced.fields.len(), 1);
        assert!(reduced
            .actions
            .contains(&Action::Call("tel:555-123-4567".to_string())));

        let full = contact_detail(&ann, ViewMode::General);
        assert!(full.emergency_badge);
        assert_eq!(full.fields.len(), 3);
    }

    #[test]
    fn test_view_serializes() {
        let view = contact_list(&[], ViewMode::General, EmptyReason::NoContacts);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["kind"], "empty");
        assert_eq!(json["content"]["action"]["href"], "add.html");
    }
}
