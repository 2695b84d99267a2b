//! The persisted light/dark preference.

use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::store::{SharedStore, THEME_KEY};

/// Color scheme of the pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Dark scheme (the default).
    #[default]
    Dark,
    /// Light scheme.
    Light,
}

impl Theme {
    /// The other theme.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// The stored and attribute value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// Icon shown on the switcher while this theme is active.
    #[must_use]
    pub fn switcher_icon(self) -> &'static str {
        match self {
            Self::Dark => "☀️",
            Self::Light => "🌙",
        }
    }

    /// Accessible label of the switcher while this theme is active.
    #[must_use]
    pub fn switcher_label(self) -> String {
        format!("Switch to {} mode", self.toggled())
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            other => Err(format!("unknown theme '{other}'")),
        }
    }
}

/// Owner of the `theme` key.
#[derive(Debug)]
pub struct ThemePreference {
    store: SharedStore,
    current: Theme,
}

impl ThemePreference {
    /// Read the stored theme, falling back to `default` when it is absent,
    /// unreadable or unrecognised.
    #[must_use]
    pub fn load(store: &SharedStore, default: Theme) -> Self {
        let current = match store.get(THEME_KEY) {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|e| {
                warn!(error = %e, "Ignoring stored theme");
                default
            }),
            Ok(None) => default,
            Err(e) => {
                warn!(error = %e, "Failed to read theme");
                default
            }
        };
        debug!(theme = %current, "Loaded theme preference");
        Self {
            store: Rc::clone(store),
            current,
        }
    }

    /// The active theme.
    #[must_use]
    pub fn current(&self) -> Theme {
        self.current
    }

    /// Persist and activate `theme`.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the preference could not be written; the
    /// active theme is left unchanged.
    pub fn set(&mut self, theme: Theme) -> Result<()> {
        self.store.set(THEME_KEY, theme.as_str())?;
        self.current = theme;
        Ok(())
    }

    /// Switch to the other theme and persist it.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the preference could not be written.
    pub fn toggle(&mut self) -> Result<Theme> {
        let next = self.current.toggled();
        self.set(next)?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{KeyValueStore, MemoryStore};

    #[test]
    fn test_theme_strings() {
        assert_eq!(Theme::Dark.to_string(), "dark");
        assert_eq!("light".parse::<Theme>().unwrap(), Theme::Light);
        assert!("blue".parse::<Theme>().is_err());
    }

    #[test]
    fn test_switcher_presentation() {
        assert_eq!(Theme::Dark.switcher_icon(), "☀️");
        assert_eq!(Theme::Light.switcher_icon(), "🌙");
        assert_eq!(Theme::Dark.switcher_label(), "Switch to light mode");
        assert_eq!(Theme::Light.switcher_label(), "Switch to dark mode");
    }

    #[test]
    fn test_defaults_to_dark_when_absent() {
        let store = MemoryStore::shared();
        let pref = ThemePreference::load(&store, Theme::default());
        assert_eq!(pref.current(), Theme::Dark);
        assert!(store.get(THEME_KEY).unwrap().is_none());
    }

    #[test]
    fn test_toggle_persists() {
        let store = MemoryStore::shared();
        let mut pref = ThemePreference::load(&store, Theme::Dark);

        assert_eq!(pref.toggle().unwrap(), Theme::Light);
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("light"));
        assert_eq!(ThemePreference::load(&store, Theme::Dark).current(), Theme::Light);

        assert_eq!(pref.toggle().unwrap(), Theme::Dark);
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_unrecognised_value_falls_back() {
        let store = MemoryStore::shared();
        store.set(THEME_KEY, "sepia").unwrap();
        assert_eq!(ThemePreference::load(&store, Theme::Light).current(), Theme::Light);
    }
}
