//! Configuration management for the address book.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::contact::{PhonePattern, DEFAULT_PHONE_PATTERN};
use crate::error::{Error, Result};
use crate::theme::Theme;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "addressbook";

/// Upper bound for any configured delay: one hour.
const MAX_DELAY_MS: u64 = 60 * 60 * 1000;

/// Default database file name.
const DATABASE_FILE_NAME: &str = "addressbook.db";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `ADDRESSBOOK_`)
/// 2. TOML config file at `~/.config/addressbook/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Presentation timing and defaults.
    pub ui: UiConfig,
    /// Input validation rules.
    pub validation: ValidationConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/addressbook/addressbook.db`
    pub database_path: Option<PathBuf>,
}

/// Presentation-related configuration.
///
/// The delays are cosmetic; zero disables them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// How long the loading overlay stays up, in milliseconds.
    pub loading_delay_ms: u64,
    /// How long the saving indicator runs before a contact is stored.
    pub save_delay_ms: u64,
    /// Pause between a successful save and the redirect to the list.
    pub redirect_delay_ms: u64,
    /// How long a notification stays visible.
    pub notification_ms: u64,
    /// Theme used when none has been stored.
    pub default_theme: Theme,
}

/// Validation-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Regex every phone number must match.
    pub phone_pattern: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            loading_delay_ms: 0,
            save_delay_ms: 0,
            redirect_delay_ms: 0,
            notification_ms: 3000,
            default_theme: Theme::Dark,
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            phone_pattern: DEFAULT_PHONE_PATTERN.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("ADDRESSBOOK_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.ui.notification_ms == 0 {
            return Err(Error::ConfigValidation {
                message: "notification_ms must be greater than 0".to_string(),
            });
        }

        for (name, value) in [
            ("loading_delay_ms", self.ui.loading_delay_ms),
            ("save_delay_ms", self.ui.save_delay_ms),
            ("redirect_delay_ms", self.ui.redirect_delay_ms),
            ("notification_ms", self.ui.notification_ms),
        ] {
            if value > MAX_DELAY_MS {
                return Err(Error::ConfigValidation {
                    message: format!("{name} must be at most {MAX_DELAY_MS}"),
                });
            }
        }

        self.phone_pattern()?;
        Ok(())
    }

    /// Compile the configured phone pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is not a valid regex.
    pub fn phone_pattern(&self) -> Result<PhonePattern> {
        PhonePattern::new(&self.validation.phone_pattern)
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the loading delay as a Duration.
    #[must_use]
    pub fn loading_delay(&self) -> Duration {
        Duration::from_millis(self.ui.loading_delay_ms)
    }

    /// Get the save delay as a Duration.
    #[must_use]
    pub fn save_delay(&self) -> Duration {
        Duration::from_millis(self.ui.save_delay_ms)
    }

    /// Get the redirect delay as a Duration.
    #[must_use]
    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.ui.redirect_delay_ms)
    }

    /// Get the notification lifetime as a Duration.
    #[must_use]
    pub fn notification_duration(&self) -> Duration {
        Duration::from_millis(self.ui.notification_ms)
    }
}
