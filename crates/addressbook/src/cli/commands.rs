//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::contact::{ContactDraft, ContactId};
use crate::page::Page;

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// First name
    #[arg(long = "first", value_name = "NAME")]
    pub first_name: String,

    /// Last name
    #[arg(long = "last", value_name = "NAME")]
    pub last_name: String,

    /// Phone number
    #[arg(long)]
    pub phone: String,

    /// Email address
    #[arg(long)]
    pub email: Option<String>,

    /// Postal address
    #[arg(long)]
    pub address: Option<String>,

    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,

    /// Mark as an emergency contact
    #[arg(short, long)]
    pub emergency: bool,
}

impl AddCommand {
    /// The form contents this command submits.
    #[must_use]
    pub fn draft(&self) -> ContactDraft {
        ContactDraft {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone().unwrap_or_default(),
            phone: self.phone.clone(),
            address: self.address.clone().unwrap_or_default(),
            notes: self.notes.clone().unwrap_or_default(),
            is_emergency: self.emergency,
        }
    }
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Show the emergency contacts page
    #[arg(short, long)]
    pub emergency: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Search command arguments.
#[derive(Debug, Args)]
pub struct SearchCommand {
    /// Text to look for in names, emails and phone numbers
    pub query: String,

    /// Search the emergency contacts page
    #[arg(short, long)]
    pub emergency: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Contact identifier
    pub id: String,

    /// Open from the emergency contacts page
    #[arg(short, long)]
    pub emergency: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Contact identifier
    pub id: String,

    /// Delete from the emergency contacts page
    #[arg(short, long)]
    pub emergency: bool,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Emergency-only contact commands.
#[derive(Debug, Subcommand)]
pub enum EmergencyCommand {
    /// Add an emergency-only contact
    Add {
        /// Name
        #[arg(long)]
        name: String,

        /// Phone number
        #[arg(long)]
        phone: String,
    },

    /// List emergency contacts
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value = "plain")]
        format: OutputFormat,
    },

    /// Delete an emergency contact
    Delete {
        /// Contact identifier
        id: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Theme commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum ThemeCommand {
    /// Show the active theme
    Show,

    /// Switch between dark and light
    Toggle,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// JSON view descriptions
    Json,
    /// HTML fragments
    Html,
}

/// The list page for the `--emergency` flag.
#[must_use]
pub fn list_page(emergency: bool) -> Page {
    if emergency {
        Page::EmergencyContacts
    } else {
        Page::ViewContacts
    }
}

/// Parse a contact identifier argument.
#[must_use]
pub fn contact_id(arg: &str) -> ContactId {
    ContactId::from(arg.trim())
}
