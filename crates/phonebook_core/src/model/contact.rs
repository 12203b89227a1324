//! Contact domain model.
//!
//! # Responsibility
//! - Define the persisted contact record and the typed add candidate.
//! - Provide name normalization shared by duplicate checks and filtering.
//!
//! # Invariants
//! - `id` is assigned once at creation and never changes.
//! - Two contacts in one list never share a normalized name.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque contact identifier.
///
/// Kept as plain text so snapshots written by earlier clients, whose ids are
/// not UUIDs, still load.
pub type ContactId = String;

/// One phonebook entry.
///
/// Field names match the persisted JSON snapshot shape exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub number: String,
}

impl Contact {
    /// Builds a contact from a validated candidate with a fresh id.
    pub fn from_candidate(candidate: NewContact) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: candidate.name,
            number: candidate.number,
        }
    }

    /// Returns the name used for equality and substring comparisons.
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }
}

/// Typed add request produced by the contact form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewContact {
    pub name: String,
    pub number: String,
}

impl NewContact {
    pub fn new(name: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            number: number.into(),
        }
    }

    /// Checks field presence before any domain logic runs.
    ///
    /// Only presence is enforced. Partially masked numbers are accepted.
    pub fn validate(&self) -> Result<(), ContactValidationError> {
        if self.name.trim().is_empty() {
            return Err(ContactValidationError::EmptyName);
        }
        if self.number.trim().is_empty() {
            return Err(ContactValidationError::EmptyNumber);
        }
        Ok(())
    }
}

/// Candidate shape violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactValidationError {
    EmptyName,
    EmptyNumber,
}

impl Display for ContactValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "contact name is required"),
            Self::EmptyNumber => write!(f, "contact number is required"),
        }
    }
}

impl Error for ContactValidationError {}

/// Trims surrounding whitespace and lowercases letters.
pub fn normalize_name(value: &str) -> String {
    value.trim().to_lowercase()
}
