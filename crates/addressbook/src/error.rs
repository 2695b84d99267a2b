//! Error types for the address book.
//!
//! Validation failures are kept in their own enum so the controller can
//! surface them to the user verbatim, while storage and configuration
//! problems carry their underlying source for debugging.

use std::path::PathBuf;
use thiserror::Error;

/// A rejected form submission.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was empty or whitespace.
    #[error("{field} is required")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },

    /// The phone number does not match the accepted pattern.
    #[error("invalid phone number: {phone}")]
    InvalidPhone {
        /// The rejected input.
        phone: String,
    },
}

impl ValidationError {
    /// The message shown to the user for this failure.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingField { .. } => "Please fill in all required fields",
            Self::InvalidPhone { .. } => "Please enter a valid phone number",
        }
    }
}

/// The main error type for address book operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Validation Errors ===
    /// Input was rejected before anything was written.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// A write to the key-value store failed.
    #[error("failed to write '{key}': {message}")]
    StoreWrite {
        /// Key being written.
        key: String,
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for address book operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a missing-field validation error.
    #[must_use]
    pub fn missing_field(field: &'static str) -> Self {
        Self::Validation(ValidationError::MissingField { field })
    }

    /// Create an invalid-phone validation error.
    #[must_use]
    pub fn invalid_phone(phone: impl Into<String>) -> Self {
        Self::Validation(ValidationError::InvalidPhone {
            phone: phone.into(),
        })
    }

    /// Create a store write error.
    #[must_use]
    pub fn store_write(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StoreWrite {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Check if this error is a rejected input rather than a failure.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// The message to show the user when this error aborts an action.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(err) => err.user_message().to_string(),
            other => format!("Something went wrong: {other}"),
        }
    }
}
