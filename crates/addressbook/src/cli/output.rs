//! Terminal presentation of controller effects.

use std::io::{BufRead, Write};

use tracing::trace;

use super::commands::OutputFormat;
use crate::controller::{Effect, Notification, NotificationKind};
use crate::error::Result;
use crate::host::Presenter;
use crate::render::{html, DetailView, EmptyState, Field, ListView};

/// Where delete confirmations come from.
#[derive(Debug)]
pub enum Confirmation<R> {
    /// Answer yes without asking.
    AssumeYes,
    /// Prompt and read a line from `R`.
    Ask(R),
}

/// Writes rendered views and notifications to a terminal.
#[derive(Debug)]
pub struct ConsolePresenter<W, R> {
    format: OutputFormat,
    out: W,
    confirmation: Confirmation<R>,
}

impl<W: Write, R: BufRead> ConsolePresenter<W, R> {
    /// Create a presenter writing `format` to `out`.
    pub fn new(format: OutputFormat, out: W, confirmation: Confirmation<R>) -> Self {
        Self {
            format,
            out,
            confirmation,
        }
    }

    /// Consume the presenter, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn json(&mut self, value: &impl serde::Serialize) -> Result<()> {
        writeln!(self.out, "{}", serde_json::to_string_pretty(value)?)?;
        Ok(())
    }

    fn plain_field(&mut self, field: &Field) -> Result<()> {
        writeln!(self.out, "  {:<8} {}", format!("{}:", field.kind.label()), field.value)?;
        Ok(())
    }

    fn plain_empty(&mut self, state: &EmptyState) -> Result<()> {
        writeln!(
            self.out,
            "{} {} ({}: {})",
            state.icon, state.text, state.action.label, state.action.href
        )?;
        Ok(())
    }

    fn list(&mut self, view: &ListView) -> Result<()> {
        match self.format {
            OutputFormat::Json => self.json(view),
            OutputFormat::Html => {
                writeln!(self.out, "{}", html::list(view))?;
                Ok(())
            }
            OutputFormat::Plain => match view {
                ListView::Empty(state) => self.plain_empty(state),
                ListView::Cards(cards) => {
                    for (i, card) in cards.iter().enumerate() {
                        if i > 0 {
                            writeln!(self.out)?;
                        }
                        let badge = if card.emergency_badge { " [Emergency]" } else { "" };
                        writeln!(self.out, "{}{badge}", card.name)?;
                        writeln!(self.out, "  {:<8} {}", "Id:", card.id)?;
                        for field in &card.fields {
                            self.plain_field(field)?;
                        }
                    }
                    Ok(())
                }
            },
        }
    }

    fn detail(&mut self, view: &DetailView) -> Result<()> {
        match self.format {
            OutputFormat::Json => self.json(view),
            OutputFormat::Html => {
                writeln!(self.out, "{}", html::detail(view))?;
                Ok(())
            }
            OutputFormat::Plain => {
                let badge = if view.emergency_badge { " [Emergency]" } else { "" };
                writeln!(self.out, "{}{badge}", view.name)?;
                writeln!(self.out, "  {:<8} {}", "Id:", view.id)?;
                for field in &view.fields {
                    self.plain_field(field)?;
                }
                Ok(())
            }
        }
    }

    fn notification(&mut self, notification: &Notification) -> Result<()> {
        match self.format {
            OutputFormat::Json => self.json(notification),
            OutputFormat::Html => {
                writeln!(
                    self.out,
                    "{}",
                    html::notification(&notification.message, notification.kind)
                )?;
                Ok(())
            }
            OutputFormat::Plain => {
                let mark = match notification.kind {
                    NotificationKind::Success => "✓",
                    NotificationKind::Error => "✗",
                };
                writeln!(self.out, "{mark} {}", notification.message)?;
                Ok(())
            }
        }
    }
}

impl<W: Write, R: BufRead> Presenter for ConsolePresenter<W, R> {
    fn present(&mut self, effect: &Effect) -> Result<()> {
        match effect {
            Effect::RenderList(view) => self.list(view),
            Effect::ShowModal(view) => self.detail(view),
            Effect::Notify(notification) => self.notification(notification),
            Effect::ShowLoading if self.format == OutputFormat::Html => {
                writeln!(self.out, "{}", html::loading())?;
                Ok(())
            }
            Effect::InstallThemeSwitcher(theme) if self.format == OutputFormat::Html => {
                writeln!(self.out, "{}", html::theme_switcher(*theme))?;
                Ok(())
            }
            other => {
                trace!(effect = ?other, "Nothing to print");
                Ok(())
            }
        }
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        let Confirmation::Ask(input) = &mut self.confirmation else {
            return Ok(true);
        };
        write!(self.out, "{prompt} [y/N] ")?;
        self.out.flush()?;

        let mut answer = String::new();
        input.read_line(&mut answer)?;
        Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Empty};

    use super::*;
    use crate::contact::{ContactDraft, PhonePattern};
    use crate::render::{contact_detail, contact_list, EmptyReason, ViewMode};

    fn presenter(format: OutputFormat) -> ConsolePresenter<Vec<u8>, Empty> {
        ConsolePresenter::new(format, Vec::new(), Confirmation::AssumeYes)
    }

    fn output<R: BufRead>(presenter: ConsolePresenter<Vec<u8>, R>) -> String {
        String::from_utf8(presenter.into_inner()).unwrap()
    }

    fn ann() -> crate::contact::Contact {
        ContactDraft::new("Ann", "Lee", "555-123-4567")
            .email("ann@example.com")
            .emergency(true)
            .into_contact(&PhonePattern::default())
            .unwrap()
    }

    #[test]
    fn test_plain_list() {
        let mut p = presenter(OutputFormat::Plain);
        let view = contact_list(&[ann()], ViewMode::General, EmptyReason::NoContacts);
        p.present(&Effect::RenderList(view)).unwrap();

        let out = output(p);
        assert!(out.starts_with("Ann Lee [Emergency]\n"));
        assert!(out.contains("  Email:   ann@example.com"));
        assert!(out.contains("  Address: N/A"));
    }

    #[test]
    fn test_plain_empty_list() {
        let mut p = presenter(OutputFormat::Plain);
        let view = contact_list(&[], ViewMode::General, EmptyReason::NoMatches);
        p.present(&Effect::RenderList(view)).unwrap();

        assert_eq!(
            output(p),
            "🔍 No contacts found (Add New Contact: add.html)\n"
        );
    }

    #[test]
    fn test_json_detail() {
        let mut p = presenter(OutputFormat::Json);
        p.present(&Effect::ShowModal(contact_detail(&ann(), ViewMode::General)))
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&output(p)).unwrap();
        assert_eq!(value["name"], "Ann Lee");
        assert_eq!(value["emergency_badge"], true);
    }

    #[test]
    fn test_html_list() {
        let mut p = presenter(OutputFormat::Html);
        let view = contact_list(&[ann()], ViewMode::Emergency, EmptyReason::NoContacts);
        p.present(&Effect::RenderList(view)).unwrap();

        assert!(output(p).contains("Call Now"));
    }

    #[test]
    fn test_html_page_chrome() {
        let mut p = presenter(OutputFormat::Html);
        p.present(&Effect::ShowLoading).unwrap();
        p.present(&Effect::InstallThemeSwitcher(crate::theme::Theme::Dark))
            .unwrap();
        p.present(&Effect::HideLoading).unwrap();

        let out = output(p);
        assert!(out.contains("loading-container"));
        assert!(out.contains("theme-switcher"));
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn test_plain_notification() {
        let mut p = presenter(OutputFormat::Plain);
        p.present(&Effect::Notify(Notification {
            seq: 1,
            message: "Please enter a valid phone number".to_string(),
            kind: NotificationKind::Error,
        }))
        .unwrap();

        assert_eq!(output(p), "✗ Please enter a valid phone number\n");
    }

    #[test]
    fn test_silent_effects() {
        let mut p = presenter(OutputFormat::Plain);
        p.present(&Effect::ShowLoading).unwrap();
        p.present(&Effect::HideModal).unwrap();
        p.present(&Effect::InstallThemeSwitcher(crate::theme::Theme::Dark))
            .unwrap();
        assert!(output(p).is_empty());
    }

    #[test]
    fn test_confirm_assume_yes() {
        let mut p = presenter(OutputFormat::Plain);
        assert!(p.confirm("Delete?").unwrap());
        assert!(output(p).is_empty());
    }

    #[test]
    fn test_confirm_reads_answer() {
        for (input, expected) in [("y\n", true), ("YES\n", true), ("n\n", false), ("", false)] {
            let mut p = ConsolePresenter::new(
                OutputFormat::Plain,
                Vec::new(),
                Confirmation::Ask(Cursor::new(input)),
            );
            assert_eq!(p.confirm("Delete?").unwrap(), expected, "{input:?}");
            assert_eq!(output(p), "Delete? [y/N] ");
        }
    }
}
