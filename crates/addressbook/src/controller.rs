//! The interaction controller.
//!
//! [`Controller`] is a state machine over UI state. It receives [`Event`]s
//! (form submissions, keystrokes, clicks, fired timers), drives the
//! repositories, and answers with [`Effect`]s for its host to carry out. It
//! never waits: every delay is handed to the host as [`Effect::Schedule`] and
//! comes back later as [`Event::Timer`].

use std::collections::BTreeSet;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use crate::book::AddressBook;
use crate::config::Config;
use crate::contact::{ContactDraft, ContactId, EmergencyContact, PhonePattern};
use crate::emergency::EmergencyBook;
use crate::error::{Error, Result};
use crate::page::{Element, Page};
use crate::render::{self, DetailView, EmptyReason, ListView, ViewMode};
use crate::store::SharedStore;
use crate::theme::{Theme, ThemePreference};

const DELETE_PROMPT: &str = "Are you sure you want to delete this contact?";

/// Tone of a notification banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Something worked.
    Success,
    /// Something was rejected or failed.
    Error,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A transient message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Sequence number, used to match the expiry timer.
    pub seq: u64,
    /// Text shown to the user.
    pub message: String,
    /// Tone.
    pub kind: NotificationKind,
}

/// A delayed callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timer {
    /// The loading overlay has been shown long enough.
    LoadingFinished,
    /// The saving indicator has run; store the pending submission.
    SaveFinished,
    /// Leave for the given page.
    Redirect(Page),
    /// Hide the notification with this sequence number.
    NotificationExpired(u64),
}

/// Something the user, or the clock, did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The general contact form was submitted.
    SubmitContact(ContactDraft),
    /// The emergency-only form was submitted.
    SubmitEmergency {
        /// Name field.
        name: String,
        /// Phone field.
        phone: String,
    },
    /// The search box changed.
    Search(String),
    /// A View button was clicked.
    View(ContactId),
    /// The modal was dismissed.
    CloseModal,
    /// A Delete button was clicked.
    RequestDelete {
        /// Record to delete.
        id: ContactId,
        /// Whether the button was inside the modal.
        from_modal: bool,
    },
    /// The user accepted the delete confirmation.
    ConfirmDelete,
    /// The user declined the delete confirmation.
    CancelDelete,
    /// The theme switcher was clicked.
    ToggleTheme,
    /// The notification's close button was clicked.
    DismissNotification,
    /// A scheduled timer fired.
    Timer(Timer),
}

/// An instruction for the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Show the loading overlay.
    ShowLoading,
    /// Remove the loading overlay.
    HideLoading,
    /// Replace the contents of the list container.
    RenderList(ListView),
    /// Open the modal with this content.
    ShowModal(DetailView),
    /// Close the modal.
    HideModal,
    /// Show a notification.
    Notify(Notification),
    /// Hide the notification with this sequence number.
    HideNotification(u64),
    /// Disable the submit button and show the spinner.
    ShowSaving,
    /// Restore the submit button.
    HideSaving,
    /// Ask the user to confirm; answer with `ConfirmDelete` or `CancelDelete`.
    Confirm {
        /// Record awaiting confirmation.
        id: ContactId,
        /// Question to ask.
        prompt: &'static str,
    },
    /// Create the theme switcher control.
    InstallThemeSwitcher(Theme),
    /// Set the document theme attribute and update the switcher.
    SetTheme(Theme),
    /// Leave for another page.
    Navigate(Page),
    /// Deliver `timer` back after `after`.
    Schedule {
        /// Delay.
        after: Duration,
        /// Event to deliver.
        timer: Timer,
    },
}

/// Loading overlay state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Waiting for the loading timer; events are not bound yet.
    Loading,
    /// Interactive.
    Ready,
}

/// Detail modal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalState {
    /// Hidden.
    Closed,
    /// Showing the given record.
    Open(ContactId),
}

/// The parts of the host document the controller can see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    elements: BTreeSet<Element>,
    theme_attribute: Option<Theme>,
    theme_switcher: bool,
}

impl Surface {
    /// The document as built for `page`.
    #[must_use]
    pub fn for_page(page: Page) -> Self {
        Self {
            elements: page.elements(),
            theme_attribute: None,
            theme_switcher: false,
        }
    }

    /// Drop an element, as if the page did not have it.
    #[must_use]
    pub fn without(mut self, element: Element) -> Self {
        self.elements.remove(&element);
        self
    }

    /// Mark the theme switcher as already created by another script.
    #[must_use]
    pub fn with_theme_switcher(mut self) -> Self {
        self.theme_switcher = true;
        self
    }

    /// Check whether the document has `element`.
    #[must_use]
    pub fn has(&self, element: Element) -> bool {
        self.elements.contains(&element)
    }

    /// The current `data-theme` attribute.
    #[must_use]
    pub fn theme_attribute(&self) -> Option<Theme> {
        self.theme_attribute
    }

    /// Whether a theme switcher exists.
    #[must_use]
    pub fn has_theme_switcher(&self) -> bool {
        self.theme_switcher
    }
}

/// Delays and defaults the controller runs with.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Loading overlay duration.
    pub loading_delay: Duration,
    /// Saving indicator duration before the write.
    pub save_delay: Duration,
    /// Pause between a save and the redirect.
    pub redirect_delay: Duration,
    /// Notification lifetime.
    pub notification_duration: Duration,
    /// Theme used when none is stored.
    pub default_theme: Theme,
    /// Phone rule for both partitions.
    pub phone_pattern: PhonePattern,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            loading_delay: Duration::ZERO,
            save_delay: Duration::ZERO,
            redirect_delay: Duration::ZERO,
            notification_duration: Duration::from_secs(3),
            default_theme: Theme::Dark,
            phone_pattern: PhonePattern::default(),
        }
    }
}

impl Settings {
    /// Settings taken from the loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured phone pattern does not compile.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            loading_delay: config.loading_delay(),
            save_delay: config.save_delay(),
            redirect_delay: config.redirect_delay(),
            notification_duration: config.notification_duration(),
            default_theme: config.ui.default_theme,
            phone_pattern: config.phone_pattern()?,
        })
    }
}

/// A validated submission waiting for the save timer.
#[derive(Debug, Clone)]
enum PendingSave {
    Contact(ContactDraft),
    Emergency { name: String, phone: String },
}

#[derive(Debug, Clone)]
struct PendingDelete {
    id: ContactId,
    from_modal: bool,
}

/// State machine for one page.
#[derive(Debug)]
pub struct Controller {
    page: Page,
    surface: Surface,
    settings: Settings,
    book: AddressBook,
    emergency: EmergencyBook,
    theme: ThemePreference,
    load: LoadState,
    modal: ModalState,
    notification: Option<Notification>,
    next_seq: u64,
    pending_save: Option<PendingSave>,
    pending_delete: Option<PendingDelete>,
    query: String,
}

impl Controller {
    /// Load the repositories from `store` for `page`.
    #[must_use]
    pub fn new(store: &SharedStore, page: Page, surface: Surface, settings: Settings) -> Self {
        let book = AddressBook::with_phone_pattern(store, settings.phone_pattern.clone());
        let emergency = EmergencyBook::with_phone_pattern(store, settings.phone_pattern.clone());
        let theme = ThemePreference::load(store, settings.default_theme);
        Self {
            page,
            surface,
            settings,
            book,
            emergency,
            theme,
            load: LoadState::Loading,
            modal: ModalState::Closed,
            notification: None,
            next_seq: 0,
            pending_save: None,
            pending_delete: None,
            query: String::new(),
        }
    }

    /// Start with `query` already in the search box.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// The page this controller drives.
    #[must_use]
    pub fn page(&self) -> Page {
        self.page
    }

    /// The page's view mode.
    #[must_use]
    pub fn view_mode(&self) -> ViewMode {
        self.page.view_mode()
    }

    /// The visible document state.
    #[must_use]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Loading state.
    #[must_use]
    pub fn load_state(&self) -> LoadState {
        self.load
    }

    /// Modal state.
    #[must_use]
    pub fn modal(&self) -> &ModalState {
        &self.modal
    }

    /// The visible notification, if any.
    #[must_use]
    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    /// Whether a submission is waiting for the save timer.
    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.pending_save.is_some()
    }

    /// The record awaiting delete confirmation.
    #[must_use]
    pub fn pending_delete(&self) -> Option<&ContactId> {
        self.pending_delete.as_ref().map(|pending| &pending.id)
    }

    /// The active theme.
    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme.current()
    }

    /// The general contact repository.
    #[must_use]
    pub fn book(&self) -> &AddressBook {
        &self.book
    }

    /// The emergency-only repository.
    #[must_use]
    pub fn emergency_book(&self) -> &EmergencyBook {
        &self.emergency
    }

    /// Show the loading overlay, apply the stored theme, and schedule the
    /// transition to ready.
    pub fn start(&mut self) -> Vec<Effect> {
        let theme = self.theme.current();
        self.surface.theme_attribute = Some(theme);
        vec![
            Effect::SetTheme(theme),
            Effect::ShowLoading,
            Effect::Schedule {
                after: self.settings.loading_delay,
                timer: Timer::LoadingFinished,
            },
        ]
    }

    /// Handle one event.
    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        debug!(page = %self.page, ?event, "Handling event");
        if self.load == LoadState::Loading && event != Event::Timer(Timer::LoadingFinished) {
            debug!("Ignoring event while loading");
            return Vec::new();
        }

        match event {
            Event::SubmitContact(draft) => self.submit(Element::ContactForm, |pattern| {
                draft.validate(pattern)?;
                Ok(PendingSave::Contact(draft))
            }),
            Event::SubmitEmergency { name, phone } => {
                self.submit(Element::EmergencyForm, |pattern| {
                    EmergencyContact::validate(&name, &phone, pattern)?;
                    Ok(PendingSave::Emergency { name, phone })
                })
            }
            Event::Search(query) => self.search(query),
            Event::View(id) => self.view(&id),
            Event::CloseModal => self.close_modal(),
            Event::RequestDelete { id, from_modal } => self.request_delete(id, from_modal),
            Event::ConfirmDelete => self.confirm_delete(),
            Event::CancelDelete => {
                self.pending_delete = None;
                Vec::new()
            }
            Event::ToggleTheme => self.toggle_theme(),
            Event::DismissNotification => self.hide_notification(),
            Event::Timer(timer) => self.fire(timer),
        }
    }

    fn fire(&mut self, timer: Timer) -> Vec<Effect> {
        match timer {
            Timer::LoadingFinished => self.ready(),
            Timer::SaveFinished => self.finish_save(),
            Timer::Redirect(page) => vec![Effect::Navigate(page)],
            Timer::NotificationExpired(seq) => {
                if self.notification.as_ref().is_some_and(|n| n.seq == seq) {
                    self.hide_notification()
                } else {
                    Vec::new()
                }
            }
        }
    }

    fn ready(&mut self) -> Vec<Effect> {
        if self.load == LoadState::Ready {
            return Vec::new();
        }
        self.load = LoadState::Ready;

        let mut effects = vec![Effect::HideLoading];
        if self.surface.theme_switcher {
            debug!("Theme switcher already present");
        } else {
            self.surface.theme_switcher = true;
            effects.push(Effect::InstallThemeSwitcher(self.theme.current()));
        }
        effects.extend(self.render_list());
        effects
    }

    fn current_list(&self) -> ListView {
        let reason = if self.query.trim().is_empty() {
            EmptyReason::NoContacts
        } else {
            EmptyReason::NoMatches
        };
        let contacts = self.book.search(&self.query);
        match self.view_mode() {
            ViewMode::General => render::contact_list(&contacts, ViewMode::General, reason),
            ViewMode::Emergency => {
                render::emergency_page(&contacts, &self.emergency.search(&self.query), reason)
            }
        }
    }

    fn render_list(&self) -> Option<Effect> {
        if !self.surface.has(Element::ContactsList) {
            return None;
        }
        Some(Effect::RenderList(self.current_list()))
    }

    fn notify(&mut self, message: impl Into<String>, kind: NotificationKind) -> Vec<Effect> {
        self.next_seq += 1;
        let notification = Notification {
            seq: self.next_seq,
            message: message.into(),
            kind,
        };
        self.notification = Some(notification.clone());
        vec![
            Effect::Notify(notification),
            Effect::Schedule {
                after: self.settings.notification_duration,
                timer: Timer::NotificationExpired(self.next_seq),
            },
        ]
    }

    fn fail(&mut self, err: &Error) -> Vec<Effect> {
        if !err.is_validation() {
            warn!(error = %err, "Action failed");
        }
        self.notify(err.user_message(), NotificationKind::Error)
    }

    fn hide_notification(&mut self) -> Vec<Effect> {
        match self.notification.take() {
            Some(notification) => vec![Effect::HideNotification(notification.seq)],
            None => Vec::new(),
        }
    }

    fn submit(
        &mut self,
        form: Element,
        validate: impl FnOnce(&PhonePattern) -> Result<PendingSave>,
    ) -> Vec<Effect> {
        if !self.surface.has(form) {
            debug!(form = form.id(), "Form not on this page");
            return Vec::new();
        }
        if self.pending_save.is_some() {
            debug!("Save already in progress");
            return Vec::new();
        }

        match validate(&self.settings.phone_pattern) {
            Ok(pending) => {
                self.pending_save = Some(pending);
                vec![
                    Effect::ShowSaving,
                    Effect::Schedule {
                        after: self.settings.save_delay,
                        timer: Timer::SaveFinished,
                    },
                ]
            }
            Err(e) => self.fail(&e),
        }
    }

    fn finish_save(&mut self) -> Vec<Effect> {
        let Some(pending) = self.pending_save.take() else {
            return Vec::new();
        };

        let saved = match pending {
            PendingSave::Contact(draft) => self.book.add(draft).map(|contact| {
                if contact.is_emergency {
                    Page::EmergencyContacts
                } else {
                    Page::ViewContacts
                }
            }),
            PendingSave::Emergency { name, phone } => self
                .emergency
                .add(&name, &phone)
                .map(|_| Page::EmergencyContacts),
        };

        let mut effects = vec![Effect::HideSaving];
        match saved {
            Ok(destination) => {
                effects.extend(self.notify("Contact added successfully!", NotificationKind::Success));
                effects.push(Effect::Schedule {
                    after: self.settings.redirect_delay,
                    timer: Timer::Redirect(destination),
                });
            }
            Err(e) => effects.extend(self.fail(&e)),
        }
        effects
    }

    fn search(&mut self, query: String) -> Vec<Effect> {
        if !self.surface.has(Element::SearchInput) {
            return Vec::new();
        }
        self.query = query;
        self.render_list().into_iter().collect()
    }

    fn detail(&self, id: &ContactId) -> Option<DetailView> {
        if let Some(contact) = self.book.get(id) {
            return Some(render::contact_detail(contact, self.view_mode()));
        }
        self.emergency.get(id).map(render::entry_detail)
    }

    fn view(&mut self, id: &ContactId) -> Vec<Effect> {
        if !self.surface.has(Element::ContactModal) {
            return Vec::new();
        }
        let Some(detail) = self.detail(id) else {
            debug!(%id, "View of unknown contact ignored");
            return Vec::new();
        };
        self.modal = ModalState::Open(id.clone());
        vec![Effect::ShowModal(detail)]
    }

    fn close_modal(&mut self) -> Vec<Effect> {
        match std::mem::replace(&mut self.modal, ModalState::Closed) {
            ModalState::Open(_) => vec![Effect::HideModal],
            ModalState::Closed => Vec::new(),
        }
    }

    fn request_delete(&mut self, id: ContactId, from_modal: bool) -> Vec<Effect> {
        if self.book.get(&id).is_none() && self.emergency.get(&id).is_none() {
            debug!(%id, "Delete of unknown contact ignored");
            return Vec::new();
        }
        self.pending_delete = Some(PendingDelete {
            id: id.clone(),
            from_modal,
        });
        vec![Effect::Confirm {
            id,
            prompt: DELETE_PROMPT,
        }]
    }

    fn confirm_delete(&mut self) -> Vec<Effect> {
        let Some(PendingDelete { id, from_modal }) = self.pending_delete.take() else {
            return Vec::new();
        };

        let deleted = match self.book.delete(&id) {
            Ok(false) => self.emergency.delete(&id),
            other => other,
        };
        match deleted {
            Ok(false) => Vec::new(),
            Ok(true) => {
                let mut effects = Vec::new();
                if from_modal || self.modal == ModalState::Open(id) {
                    effects.extend(self.close_modal());
                }
                effects.extend(self.notify("Contact deleted successfully", NotificationKind::Success));
                effects.extend(self.render_list());
                effects
            }
            Err(e) => self.fail(&e),
        }
    }

    fn toggle_theme(&mut self) -> Vec<Effect> {
        if !self.surface.theme_switcher {
            return Vec::new();
        }
        match self.theme.toggle() {
            Ok(theme) => {
                self.surface.theme_attribute = Some(theme);
                vec![Effect::SetTheme(theme)]
            }
            Err(e) => self.fail(&e),
        }
    }
}
