//! Core domain logic for the phonebook.
//! This crate is the single source of truth for contact invariants.

pub mod app;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use app::{
    EventOutcome, LogNotifier, Notifier, PhonebookApp, PhonebookEvent, RecordingNotifier,
    SubmitRejection, DUPLICATE_NAME_MESSAGE,
};
pub use config::PhonebookConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::contact::{normalize_name, Contact, ContactId, ContactValidationError, NewContact};
pub use repo::contact_repo::{
    ContactRepository, LocalStorageContactRepository, SnapshotRead, CONTACT_LIST_KEY,
};
pub use repo::storage_repo::{LocalStorage, SqliteLocalStorage};
pub use repo::{RepoError, RepoResult};
pub use service::contact_form::{
    format_phone_number, is_complete_number, ContactForm, FormClearPolicy, FormField, FormState,
};
pub use service::contact_store::{AddContactError, ContactStore, DuplicateNameError};
pub use service::filter::{filter_contacts, ContactListView, EMPTY_LIST_MESSAGE};

/// SQLite-backed contact repository used by hosts.
pub type SqliteContactRepository<'conn> = LocalStorageContactRepository<SqliteLocalStorage<'conn>>;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
