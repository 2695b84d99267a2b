//! Runs a [`Controller`] outside a browser.
//!
//! The host feeds scripted events to the controller, hands the resulting
//! effects to a [`Presenter`], and keeps the scheduled timers, firing them
//! in deadline order on the tokio clock. A run ends when the controller
//! navigates away or nothing is left to do.

use std::collections::VecDeque;

use tokio::time::Instant;
use tracing::{debug, trace};

use crate::controller::{Controller, Effect, Event, LoadState, Notification, Timer};
use crate::error::Result;
use crate::page::Page;

/// Carries out effects for a host.
pub trait Presenter {
    /// Show an effect. `Schedule` and `Confirm` are handled by the host.
    ///
    /// # Errors
    ///
    /// Returns an error if the output could not be written.
    fn present(&mut self, effect: &Effect) -> Result<()>;

    /// Ask the user to confirm `prompt`.
    ///
    /// # Errors
    ///
    /// Returns an error if the answer could not be read.
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// How a run ended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    /// The page the controller navigated to, if it did.
    pub navigated: Option<Page>,
    /// The last notification shown during the run.
    pub last_notification: Option<Notification>,
}

#[derive(Debug)]
struct Pending {
    deadline: Instant,
    seq: u64,
    timer: Timer,
}

/// Event loop around one controller.
#[derive(Debug)]
pub struct Host<P> {
    controller: Controller,
    presenter: P,
    events: VecDeque<Event>,
    timers: Vec<Pending>,
    timer_seq: u64,
    wait_for_notifications: bool,
}

impl<P: Presenter> Host<P> {
    /// Create a host. Notification expiry timers are dropped unless
    /// [`Host::wait_for_notifications`] is set.
    #[must_use]
    pub fn new(controller: Controller, presenter: P) -> Self {
        Self {
            controller,
            presenter,
            events: VecDeque::new(),
            timers: Vec::new(),
            timer_seq: 0,
            wait_for_notifications: false,
        }
    }

    /// Keep notification expiry timers instead of dropping them.
    #[must_use]
    pub fn wait_for_notifications(mut self, wait: bool) -> Self {
        self.wait_for_notifications = wait;
        self
    }

    /// The controller being driven.
    #[must_use]
    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// The presenter.
    #[must_use]
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Consume the host, returning the presenter.
    #[must_use]
    pub fn into_presenter(self) -> P {
        self.presenter
    }

    /// Start the controller and deliver `events` once it is ready.
    ///
    /// # Errors
    ///
    /// Returns an error if the presenter fails.
    pub async fn run(&mut self, events: impl IntoIterator<Item = Event>) -> Result<Outcome> {
        self.events.extend(events);
        let mut outcome = Outcome::default();

        let effects = self.controller.start();
        if self.apply(effects, &mut outcome)? {
            return Ok(outcome);
        }

        loop {
            let event = if self.controller.load_state() == LoadState::Ready {
                self.events.pop_front()
            } else {
                None
            };
            let event = match event {
                Some(event) => event,
                None => match self.next_timer() {
                    Some(pending) => {
                        tokio::time::sleep_until(pending.deadline).await;
                        trace!(timer = ?pending.timer, "Timer fired");
                        Event::Timer(pending.timer)
                    }
                    None => break,
                },
            };

            let effects = self.controller.handle(event);
            if self.apply(effects, &mut outcome)? {
                break;
            }
        }

        Ok(outcome)
    }

    fn next_timer(&mut self) -> Option<Pending> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .min_by_key(|(_, pending)| (pending.deadline, pending.seq))
            .map(|(index, _)| index)?;
        Some(self.timers.remove(index))
    }

    /// Returns `true` once the controller has navigated away.
    fn apply(&mut self, effects: Vec<Effect>, outcome: &mut Outcome) -> Result<bool> {
        for effect in effects {
            match effect {
                Effect::Schedule { after, timer } => {
                    if matches!(timer, Timer::NotificationExpired(_))
                        && !self.wait_for_notifications
                    {
                        trace!(?timer, "Dropping notification timer");
                        continue;
                    }
                    self.timer_seq += 1;
                    self.timers.push(Pending {
                        deadline: Instant::now() + after,
                        seq: self.timer_seq,
                        timer,
                    });
                }
                Effect::Confirm { prompt, .. } => {
                    let answer = if self.presenter.confirm(prompt)? {
                        Event::ConfirmDelete
                    } else {
                        Event::CancelDelete
                    };
                    self.events.push_front(answer);
                }
                Effect::Navigate(page) => {
                    self.presenter.present(&effect)?;
                    debug!(%page, "Navigated");
                    outcome.navigated = Some(page);
                    return Ok(true);
                }
                Effect::Notify(ref notification) => {
                    self.presenter.present(&effect)?;
                    outcome.last_notification = Some(notification.clone());
                }
                _ => self.presenter.present(&effect)?,
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::AddressBook;
    use crate::contact::ContactDraft;
    use crate::controller::{NotificationKind, Settings, Surface};
    use crate::store::MemoryStore;

    #[derive(Debug, Default)]
    struct Recorder {
        effects: Vec<Effect>,
        answer: bool,
        prompts: Vec<String>,
    }

    impl Presenter for Recorder {
        fn present(&mut self, effect: &Effect) -> Result<()> {
            self.effects.push(effect.clone());
            Ok(())
        }

        fn confirm(&mut self, prompt: &str) -> Result<bool> {
            self.prompts.push(prompt.to_string());
            Ok(self.answer)
        }
    }

    fn host(store: &crate::store::SharedStore, page: Page, answer: bool) -> Host<Recorder> {
        let controller =
            Controller::new(store, page, Surface::for_page(page), Settings::default());
        Host::new(
            controller,
            Recorder {
                answer,
                ..Recorder::default()
            },
        )
    }

    #[tokio::test]
    async fn test_list_run_renders_once() {
        let store = MemoryStore::shared();
        let mut host = host(&store, Page::ViewContacts, false);

        let outcome = host.run([]).await.unwrap();

        assert_eq!(outcome, Outcome::default());
        let renders = host
            .presenter()
            .effects
            .iter()
            .filter(|e| matches!(e, Effect::RenderList(_)))
            .count();
        assert_eq!(renders, 1);
        assert_eq!(host.presenter().effects[0], Effect::SetTheme(crate::theme::Theme::Dark));
    }

    #[tokio::test]
    async fn test_add_run_saves_and_redirects() {
        let store = MemoryStore::shared();
        let mut host = host(&store, Page::AddContact, false);

        let draft = ContactDraft::new("Ann", "Lee", "555-123-4567").emergency(true);
        let outcome = host.run([Event::SubmitContact(draft)]).await.unwrap();

        assert_eq!(outcome.navigated, Some(Page::EmergencyContacts));
        let notification = outcome.last_notification.unwrap();
        assert_eq!(notification.kind, NotificationKind::Success);
        assert_eq!(AddressBook::load(&store).len(), 1);
        assert_eq!(
            host.presenter().effects.last(),
            Some(&Effect::Navigate(Page::EmergencyContacts))
        );
    }

    #[tokio::test]
    async fn test_invalid_add_reports_error() {
        let store = MemoryStore::shared();
        let mut host = host(&store, Page::AddContact, false);

        let draft = ContactDraft::new("Ann", "Lee", "123");
        let outcome = host.run([Event::SubmitContact(draft)]).await.unwrap();

        assert!(outcome.navigated.is_none());
        assert_eq!(
            outcome.last_notification.unwrap().kind,
            NotificationKind::Error
        );
        assert!(AddressBook::load(&store).is_empty());
    }

    #[tokio::test]
    async fn test_delete_confirmed() {
        let store = MemoryStore::shared();
        let id = AddressBook::load(&store)
            .add(ContactDraft::new("Ann", "Lee", "555-123-4567"))
            .unwrap()
            .id;
        let mut host = host(&store, Page::ViewContacts, true);

        host.run([Event::RequestDelete {
            id,
            from_modal: false,
        }])
        .await
        .unwrap();

        assert_eq!(host.presenter().prompts.len(), 1);
        assert!(AddressBook::load(&store).is_empty());
    }

    #[tokio::test]
    async fn test_delete_declined() {
        let store = MemoryStore::shared();
        let id = AddressBook::load(&store)
            .add(ContactDraft::new("Ann", "Lee", "555-123-4567"))
            .unwrap()
            .id;
        let mut host = host(&store, Page::ViewContacts, false);

        let outcome = host
            .run([Event::RequestDelete {
                id,
                from_modal: false,
            }])
            .await
            .unwrap();

        assert!(outcome.last_notification.is_none());
        assert_eq!(AddressBook::load(&store).len(), 1);
    }

    #[tokio::test]
    async fn test_notification_timer_kept_when_waiting() {
        let store = MemoryStore::shared();
        let page = Page::AddContact;
        let settings = Settings {
            notification_duration: std::time::Duration::from_millis(1),
            ..Settings::default()
        };
        let controller = Controller::new(&store, page, Surface::for_page(page), settings);
        let mut host = Host::new(controller, Recorder::default()).wait_for_notifications(true);

        host.run([Event::SubmitContact(ContactDraft::default())])
            .await
            .unwrap();

        assert!(host
            .presenter()
            .effects
            .iter()
            .any(|e| matches!(e, Effect::HideNotification(_))));
        assert!(host.controller().notification().is_none());
    }
}
