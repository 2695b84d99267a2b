//! Core contact types.
//!
//! This module defines the records held by the two partitions of the address
//! book, the form input they are built from, and the phone number rule both
//! partitions validate against.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// The phone pattern accepted when none is configured.
///
/// An optional leading `+`, then at least ten digits, spaces or hyphens.
pub const DEFAULT_PHONE_PATTERN: &str = r"^\+?[0-9\s-]{10,}$";

/// Identifier of a stored contact.
///
/// New identifiers are random UUIDs. Stored identifiers written as numbers
/// (millisecond timestamps) are read back as their decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ContactId(String);

impl ContactId {
    /// Generate a fresh identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContactId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ContactId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl<'de> Deserialize<'de> for ContactId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Number(number) => Self(number.to_string()),
        })
    }
}

/// Reads blank strings and `null` as an absent optional field.
fn blank_as_none<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// A compiled phone number rule.
#[derive(Debug, Clone)]
pub struct PhonePattern {
    regex: Regex,
}

impl PhonePattern {
    /// Compile a phone pattern.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the pattern is not a valid regex.
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| Error::ConfigValidation {
            message: format!("invalid phone pattern '{pattern}': {e}"),
        })?;
        Ok(Self { regex })
    }

    /// Check a phone number against the pattern.
    #[must_use]
    pub fn matches(&self, phone: &str) -> bool {
        self.regex.is_match(phone)
    }

    /// The source text of the pattern.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl Default for PhonePattern {
    fn default() -> Self {
        Self {
            regex: Regex::new(DEFAULT_PHONE_PATTERN).expect("default phone pattern is valid"),
        }
    }
}

/// Trim a required field, rejecting blank input.
fn required(value: &str, field: &'static str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::missing_field(field));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional field, dropping blank input.
fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Trim and validate a phone number.
fn phone(value: &str, pattern: &PhonePattern) -> Result<String> {
    let phone = required(value, "phone")?;
    if !pattern.matches(&phone) {
        return Err(Error::invalid_phone(phone));
    }
    Ok(phone)
}

/// Case-insensitive substring test, `needle` already lowercased.
fn contains_lower(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// A general address book record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// Unique identifier.
    pub id: ContactId,

    /// Given name.
    pub first_name: String,

    /// Family name.
    pub last_name: String,

    /// Email address, if given.
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub email: Option<String>,

    /// Phone number.
    pub phone: String,

    /// Postal address, if given.
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub address: Option<String>,

    /// Free-form notes, if given.
    #[serde(
        default,
        alias = "about",
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<String>,

    /// Whether the contact shows up on the emergency page.
    #[serde(default)]
    pub is_emergency: bool,
}

impl Contact {
    /// First and last name joined by a space.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Check whether any searchable field contains `needle`.
    ///
    /// `needle` must already be lowercased.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        contains_lower(&self.first_name, needle)
            || contains_lower(&self.last_name, needle)
            || self
                .email
                .as_deref()
                .is_some_and(|email| contains_lower(email, needle))
            || contains_lower(&self.phone, needle)
            || self
                .address
                .as_deref()
                .is_some_and(|address| contains_lower(address, needle))
    }
}

/// Raw input from the contact form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDraft {
    /// Given name (required).
    pub first_name: String,
    /// Family name (required).
    pub last_name: String,
    /// Email address.
    pub email: String,
    /// Phone number (required).
    pub phone: String,
    /// Postal address.
    pub address: String,
    /// Free-form notes.
    pub notes: String,
    /// Emergency flag checkbox.
    pub is_emergency: bool,
}

impl ContactDraft {
    /// Start a draft from the three required fields.
    #[must_use]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone: phone.into(),
            ..Self::default()
        }
    }

    /// Set the email address.
    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Set the postal address.
    #[must_use]
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Set the notes.
    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Set the emergency flag.
    #[must_use]
    pub fn emergency(mut self, is_emergency: bool) -> Self {
        self.is_emergency = is_emergency;
        self
    }

    /// Check the required fields without building a contact.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first problem found.
    pub fn validate(&self, pattern: &PhonePattern) -> Result<()> {
        required(&self.first_name, "first name")?;
        required(&self.last_name, "last name")?;
        phone(&self.phone, pattern)?;
        Ok(())
    }

    /// Validate the draft and build a contact with a fresh identifier.
    ///
    /// # Errors
    ///
    /// Returns a validation error if a required field is blank or the phone
    /// number does not match `pattern`.
    pub fn into_contact(self, pattern: &PhonePattern) -> Result<Contact> {
        Ok(Contact {
            id: ContactId::generate(),
            first_name: required(&self.first_name, "first name")?,
            last_name: required(&self.last_name, "last name")?,
            email: optional(&self.email),
            phone: phone(&self.phone, pattern)?,
            address: optional(&self.address),
            notes: optional(&self.notes),
            is_emergency: self.is_emergency,
        })
    }
}

/// A record in the emergency-only partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyContact {
    /// Unique identifier.
    pub id: ContactId,
    /// Display name.
    pub name: String,
    /// Phone number.
    pub phone_number: String,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl EmergencyContact {
    /// Validate the input and build a record stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns a validation error if either field is blank or the phone
    /// number does not match `pattern`.
    pub fn new(name: &str, phone_number: &str, pattern: &PhonePattern) -> Result<Self> {
        let name = required(name, "name")?;
        let phone_number = phone(phone_number, pattern)?;
        Ok(Self {
            id: ContactId::generate(),
            name,
            phone_number,
            created_at: Utc::now(),
        })
    }

    /// Check form input without building a record.
    ///
    /// # Errors
    ///
    /// Returns the validation error [`EmergencyContact::new`] would return.
    pub fn validate(name: &str, phone_number: &str, pattern: &PhonePattern) -> Result<()> {
        required(name, "name")?;
        phone(phone_number, pattern)?;
        Ok(())
    }

    /// Check whether the name or phone number contains `needle`.
    ///
    /// `needle` must already be lowercased.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        contains_lower(&self.name, needle) || contains_lower(&self.phone_number, needle)
    }
}
