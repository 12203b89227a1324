//! Filtered contact list derivation.
//!
//! # Invariants
//! - Filtering never reorders contacts.
//! - A blank filter returns every contact.

use crate::model::contact::{normalize_name, Contact};

/// Text shown when the filtered view has nothing to display.
pub const EMPTY_LIST_MESSAGE: &str = "The contact list is empty";

/// Returns contacts whose normalized name contains the normalized filter.
pub fn filter_contacts<'a>(contacts: &'a [Contact], filter_text: &str) -> Vec<&'a Contact> {
    let needle = normalize_name(filter_text);
    if needle.is_empty() {
        return contacts.iter().collect();
    }

    contacts
        .iter()
        .filter(|contact| contact.normalized_name().contains(needle.as_str()))
        .collect()
}

/// Render-ready projection of the contact list under one filter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactListView {
    pub filter: String,
    pub items: Vec<Contact>,
}

impl ContactListView {
    pub fn derive(contacts: &[Contact], filter_text: &str) -> Self {
        Self {
            filter: filter_text.to_string(),
            items: filter_contacts(contacts, filter_text)
                .into_iter()
                .cloned()
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Placeholder text for an empty view, `None` when there are items.
    pub fn empty_message(&self) -> Option<&'static str> {
        self.is_empty().then_some(EMPTY_LIST_MESSAGE)
    }
}
