//! Contact form draft state.
//!
//! # Responsibility
//! - Hold unsaved `name` / `number` input between UI events.
//! - Apply the `NNN-NN-NN` entry mask to number input.
//! - Hand a typed candidate to the owner on submit and reset afterwards.
//!
//! # Invariants
//! - The number draft only ever holds mask-shaped text.
//! - With `FormClearPolicy::Always`, every submit attempt ends in `Empty`.

use crate::model::contact::NewContact;
use once_cell::sync::Lazy;
use regex::Regex;

static NON_DIGIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^0-9]+").expect("valid digit regex"));
static COMPLETE_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{3}-[0-9]{2}-[0-9]{2}$").expect("valid number mask regex"));

/// Digit group sizes of the `NNN-NN-NN` mask.
const NUMBER_MASK_GROUPS: [usize; 3] = [3, 2, 2];

/// Editable form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Number,
}

impl FormField {
    /// Parses the input `name` attribute used by the UI layer.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "name" => Some(Self::Name),
            "number" => Some(Self::Number),
            _ => None,
        }
    }
}

/// Draft lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Empty,
    Editing,
}

/// Whether a submit attempt clears drafts that were rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormClearPolicy {
    /// Clear after every submit attempt.
    #[default]
    Always,
    /// Keep the drafts when the add fails so the user can fix them.
    OnSuccess,
}

impl FormClearPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "always" => Some(Self::Always),
            "on_success" | "on-success" => Some(Self::OnSuccess),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::OnSuccess => "on_success",
        }
    }
}

/// Draft entry state for one new contact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    name: String,
    number: String,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn state(&self) -> FormState {
        if self.name.is_empty() && self.number.is_empty() {
            FormState::Empty
        } else {
            FormState::Editing
        }
    }

    /// Replaces one draft field. Number input goes through the entry mask.
    pub fn set_field(&mut self, field: FormField, value: &str) {
        match field {
            FormField::Name => self.name = value.to_string(),
            FormField::Number => self.number = format_phone_number(value),
        }
    }

    /// Whether the number draft fills the whole mask.
    pub fn is_number_complete(&self) -> bool {
        is_complete_number(&self.number)
    }

    /// Builds a candidate from the current drafts without clearing them.
    pub fn candidate(&self) -> NewContact {
        NewContact::new(self.name.clone(), self.number.clone())
    }

    /// Hands the candidate to `add` and resets according to `policy`.
    ///
    /// `add` is the owner's store call; its result is returned unchanged.
    pub fn submit<T, E>(
        &mut self,
        policy: FormClearPolicy,
        add: impl FnOnce(NewContact) -> Result<T, E>,
    ) -> Result<T, E> {
        let result = add(self.candidate());
        if result.is_ok() || policy == FormClearPolicy::Always {
            self.reset();
        }
        result
    }

    pub fn reset(&mut self) {
        self.name.clear();
        self.number.clear();
    }
}

/// Applies the `NNN-NN-NN` entry mask to raw input.
///
/// Non-digits are dropped, extra digits are cut, and a dash is inserted only
/// once a digit of the next group arrives.
pub fn format_phone_number(raw: &str) -> String {
    let digits = NON_DIGIT_RE.replace_all(raw, "");
    let max_digits: usize = NUMBER_MASK_GROUPS.iter().sum();
    let mut remaining = &digits[..digits.len().min(max_digits)];

    let mut formatted = String::with_capacity(max_digits + NUMBER_MASK_GROUPS.len() - 1);
    for group in NUMBER_MASK_GROUPS {
        if remaining.is_empty() {
            break;
        }
        if !formatted.is_empty() {
            formatted.push('-');
        }
        let take = group.min(remaining.len());
        formatted.push_str(&remaining[..take]);
        remaining = &remaining[take..];
    }
    formatted
}

/// Whether `number` matches the full `NNN-NN-NN` mask.
pub fn is_complete_number(number: &str) -> bool {
    COMPLETE_NUMBER_RE.is_match(number)
}
