//! Command-line interface for the address book.
//!
//! This module provides the CLI structure and the terminal presenter for the
//! `addrbook` binary.

mod commands;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    contact_id, list_page, AddCommand, ConfigCommand, DeleteCommand, EmergencyCommand,
    ListCommand, OutputFormat, SearchCommand, ShowCommand, ThemeCommand,
};
pub use output::{Confirmation, ConsolePresenter};

/// addrbook - Keep personal and emergency contacts close at hand
///
/// Stores contacts in a local database, with a separate list of emergency
/// contacts that can be called at a glance.
#[derive(Debug, Parser)]
#[command(name = "addrbook")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a contact
    Add(AddCommand),

    /// List contacts
    List(ListCommand),

    /// Search contacts
    Search(SearchCommand),

    /// Show one contact in detail
    Show(ShowCommand),

    /// Delete a contact
    Delete(DeleteCommand),

    /// Manage emergency-only contacts
    #[command(subcommand)]
    Emergency(EmergencyCommand),

    /// Show or switch the color theme
    #[command(subcommand)]
    Theme(ThemeCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                2 => crate::logging::Verbosity::Debug,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
