//! Top-level phonebook UI state.
//!
//! # Responsibility
//! - Compose contact store, form drafts and filter into one owned state.
//! - Translate UI events into store calls and failure notifications.
//!
//! # Invariants
//! - A duplicate-name submit notifies once and never reaches storage.
//! - The filter value is session-only and never persisted.

use crate::model::contact::{Contact, ContactId, ContactValidationError};
use crate::repo::contact_repo::ContactRepository;
use crate::repo::RepoError;
use crate::service::contact_form::{ContactForm, FormClearPolicy, FormField};
use crate::service::contact_store::{AddContactError, ContactStore, DuplicateNameError};
use crate::service::filter::ContactListView;
use log::warn;
use std::cell::RefCell;

/// Fixed notification text for duplicate-name submits.
pub const DUPLICATE_NAME_MESSAGE: &str = "Contact with this name already exist";

/// Fire-and-forget user notification channel.
pub trait Notifier {
    fn failure(&self, message: &str);
}

/// Notifier that only writes to the core log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn failure(&self, message: &str) {
        warn!("event=notify module=app status=failure message={message}");
    }
}

/// Notifier that keeps messages until the host drains them.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: RefCell<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns and clears pending messages.
    pub fn drain(&self) -> Vec<String> {
        self.messages.borrow_mut().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.messages.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.borrow().is_empty()
    }
}

impl Notifier for RecordingNotifier {
    fn failure(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn failure(&self, message: &str) {
        (**self).failure(message);
    }
}

/// UI events raised by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhonebookEvent {
    ChangeField(FormField, String),
    SubmitContact,
    ChangeFilter(String),
    DeleteContact(ContactId),
}

/// Why a submit did not add a contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitRejection {
    Validation(ContactValidationError),
    DuplicateName(DuplicateNameError),
}

/// Result of one dispatched event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    FieldChanged,
    ContactAdded(Contact),
    SubmitRejected(SubmitRejection),
    FilterChanged,
    ContactDeleted(ContactId),
    DeleteIgnored(ContactId),
}

/// Owned phonebook state for one UI session.
pub struct PhonebookApp<R: ContactRepository, N: Notifier> {
    store: ContactStore<R>,
    form: ContactForm,
    filter: String,
    notifier: N,
    clear_policy: FormClearPolicy,
}

impl<R: ContactRepository, N: Notifier> PhonebookApp<R, N> {
    /// Loads persisted contacts and starts with empty drafts and filter.
    pub fn new(repo: R, notifier: N, clear_policy: FormClearPolicy) -> Self {
        Self {
            store: ContactStore::load(repo),
            form: ContactForm::new(),
            filter: String::new(),
            notifier,
            clear_policy,
        }
    }

    pub fn store(&self) -> &ContactStore<R> {
        &self.store
    }

    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn clear_policy(&self) -> FormClearPolicy {
        self.clear_policy
    }

    /// Filtered projection of the current list.
    pub fn view(&self) -> ContactListView {
        ContactListView::derive(self.store.contacts(), &self.filter)
    }

    /// Applies one UI event.
    ///
    /// # Errors
    /// Returns storage failures from add/remove. Domain rejections are
    /// reported through `EventOutcome::SubmitRejected` instead.
    pub fn dispatch(&mut self, event: PhonebookEvent) -> Result<EventOutcome, RepoError> {
        match event {
            PhonebookEvent::ChangeField(field, value) => {
                self.form.set_field(field, &value);
                Ok(EventOutcome::FieldChanged)
            }
            PhonebookEvent::SubmitContact => self.submit(),
            PhonebookEvent::ChangeFilter(value) => {
                self.filter = value;
                Ok(EventOutcome::FilterChanged)
            }
            PhonebookEvent::DeleteContact(id) => {
                if self.store.remove(&id)? {
                    Ok(EventOutcome::ContactDeleted(id))
                } else {
                    Ok(EventOutcome::DeleteIgnored(id))
                }
            }
        }
    }

    fn submit(&mut self) -> Result<EventOutcome, RepoError> {
        let store = &mut self.store;
        let result = self
            .form
            .submit(self.clear_policy, |candidate| store.add(candidate));

        match result {
            Ok(contact) => Ok(EventOutcome::ContactAdded(contact)),
            Err(AddContactError::DuplicateName(err)) => {
                self.notifier.failure(DUPLICATE_NAME_MESSAGE);
                Ok(EventOutcome::SubmitRejected(SubmitRejection::DuplicateName(
                    err,
                )))
            }
            Err(AddContactError::Validation(err)) => {
                Ok(EventOutcome::SubmitRejected(SubmitRejection::Validation(err)))
            }
            Err(AddContactError::Repo(err)) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EventOutcome, LogNotifier, PhonebookApp, PhonebookEvent, SubmitRejection};
    use crate::db::open_db_in_memory;
    use crate::repo::contact_repo::LocalStorageContactRepository;
    use crate::repo::storage_repo::SqliteLocalStorage;
    use crate::service::contact_form::{FormClearPolicy, FormField};

    #[test]
    fn log_notifier_app_rejects_duplicate_names() {
        let conn = open_db_in_memory().unwrap();
        let repo = LocalStorageContactRepository::new(SqliteLocalStorage::new(&conn));
        let mut app = PhonebookApp::new(repo, LogNotifier, FormClearPolicy::default());

        for name in ["Ann", " ANN "] {
            app.dispatch(PhonebookEvent::ChangeField(FormField::Name, name.to_string()))
                .unwrap();
            app.dispatch(PhonebookEvent::ChangeField(
                FormField::Number,
                "1234567".to_string(),
            ))
            .unwrap();
            app.dispatch(PhonebookEvent::SubmitContact).unwrap();
        }

        assert_eq!(app.store().len(), 1);
        app.dispatch(PhonebookEvent::ChangeField(FormField::Name, "ann".to_string()))
            .unwrap();
        app.dispatch(PhonebookEvent::ChangeField(FormField::Number, "1".to_string()))
            .unwrap();
        let outcome = app.dispatch(PhonebookEvent::SubmitContact).unwrap();
        assert!(matches!(
            outcome,
            EventOutcome::SubmitRejected(SubmitRejection::DuplicateName(_))
        ));
        assert_eq!(app.store().len(), 1);
        assert_eq!(app.clear_policy(), FormClearPolicy::Always);
        assert_eq!(app.form().name(), "");
    }
}
