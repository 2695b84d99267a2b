//! Markup for view descriptions.
//!
//! Every interpolated value goes through [`escape`]; action targets are
//! emitted as `data-*` attributes for the page script to bind to.

use std::fmt::Write as _;

use super::{Action, Card, DetailView, EmptyState, Field, ListView};
use crate::controller::NotificationKind;
use crate::theme::Theme;

/// Escape text for use in element content and quoted attributes.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const BADGE: &str = r#"<span class="emergency-badge">Emergency</span>"#;

fn action_button(action: &Action) -> String {
    match action {
        Action::View(id) => format!(
            r#"<button class="view-button" data-action="view" data-id="{}">View</button>"#,
            escape(id.as_str())
        ),
        Action::Delete(id) => format!(
            r#"<button class="delete-button" data-action="delete" data-id="{}">Delete</button>"#,
            escape(id.as_str())
        ),
        Action::Call(href) => format!(
            r#"<button class="call-button" data-action="call" data-href="{}"><i class="fas fa-phone"></i> Call Now</button>"#,
            escape(href)
        ),
        Action::Close => {
            r#"<button class="secondary-button" data-action="close">Close</button>"#.to_string()
        }
    }
}

fn card_field(field: &Field) -> String {
    let value = match &field.href {
        Some(href) => format!(r#"<a href="{}">{}</a>"#, escape(href), escape(&field.value)),
        None => escape(&field.value),
    };
    format!(
        r#"<p><i class="fas {} icon"></i> {value}</p>"#,
        field.kind.icon()
    )
}

fn empty_state(state: &EmptyState) -> String {
    format!(
        r#"<div class="empty-state"><div class="empty-state-icon">{}</div><p class="empty-state-text">{}</p><a href="{}" class="primary-button">{}</a></div>"#,
        state.icon,
        escape(&state.text),
        state.action.href,
        state.action.label
    )
}

fn card(card: &Card) -> String {
    let class = if card.emergency_badge {
        "contact-card emergency-contact"
    } else {
        "contact-card"
    };
    let mut out = format!(r#"<div class="{class}" data-id="{}">"#, escape(card.id.as_str()));
    if card.emergency_badge {
        out.push_str(BADGE);
    }
    let _ = write!(
        out,
        r#"<div class="contact-info"><h3>{}</h3>"#,
        escape(&card.name)
    );
    for field in &card.fields {
        out.push_str(&card_field(field));
    }
    out.push_str(r#"</div><div class="contact-actions">"#);
    for action in &card.actions {
        out.push_str(&action_button(action));
    }
    out.push_str("</div></div>");
    out
}

/// Markup for the contents of the list container.
#[must_use]
pub fn list(view: &ListView) -> String {
    match view {
        ListView::Empty(state) => empty_state(state),
        ListView::Cards(cards) => cards.iter().map(card).collect(),
    }
}

/// Markup for the contents of the detail modal.
#[must_use]
pub fn detail(view: &DetailView) -> String {
    let mut out = String::from(r#"<div class="modal-content"><span class="close-button">&times;</span>"#);
    let _ = write!(
        out,
        r#"<div class="modal-header"><h2>{}</h2>{}</div><div class="contact-details">"#,
        escape(&view.name),
        if view.emergency_badge { BADGE } else { "" }
    );
    for field in &view.fields {
        let _ = write!(
            out,
            r#"<div class="detail-group"><span class="detail-label">{}</span><span class="detail-value">{}</span></div>"#,
            field.kind.label(),
            escape(&field.value)
        );
    }
    out.push_str(r#"</div><div class="modal-actions">"#);
    for action in &view.actions {
        out.push_str(&action_button(action));
    }
    out.push_str("</div></div>");
    out
}

/// Markup for a notification banner.
#[must_use]
pub fn notification(message: &str, kind: NotificationKind) -> String {
    format!(
        r#"<div class="notification {kind}"><div class="notification-content"><span class="notification-message">{}</span><button class="notification-close">&times;</button></div></div>"#,
        escape(message)
    )
}

/// Markup for the loading overlay.
#[must_use]
pub fn loading() -> &'static str {
    r#"<div class="loading-container"><div class="loading-content"><div class="loading-spinner"></div><div class="loading-text">Loading your contacts...</div></div></div>"#
}

/// Markup for the theme switcher while `theme` is active.
#[must_use]
pub fn theme_switcher(theme: Theme) -> String {
    format!(
        r#"<button class="theme-switcher" id="theme-switcher" aria-label="{}">{}</button>"#,
        theme.switcher_label(),
        theme.switcher_icon()
    )
}
