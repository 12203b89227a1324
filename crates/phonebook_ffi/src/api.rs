//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the phonebook UI events (submit, filter, delete) to Dart via FRB.
//! - Keep error semantics simple: every call returns an envelope.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Each call opens its own connection; no handle is cached across calls.

use log::{info, warn};
use phonebook_core::db::open_db;
use phonebook_core::{
    core_version as core_version_inner, format_phone_number as format_phone_number_inner,
    init_logging as init_logging_inner, ping as ping_inner, AddContactError, Contact,
    ContactListView, ContactStore, NewContact, PhonebookConfig, SqliteContactRepository,
    SqliteLocalStorage, DUPLICATE_NAME_MESSAGE, EMPTY_LIST_MESSAGE,
};
use std::sync::{Mutex, OnceLock};

static CONFIG: OnceLock<PhonebookConfig> = OnceLock::new();
// Serializes load-modify-write cycles on the shared snapshot.
static STORE_LOCK: Mutex<()> = Mutex::new(());

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Contact row handed to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactItem {
    pub id: String,
    pub name: String,
    pub number: String,
}

impl From<Contact> for ContactItem {
    fn from(value: Contact) -> Self {
        Self {
            id: value.id,
            name: value.name,
            number: value.number,
        }
    }
}

/// Filtered list envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactListResponse {
    /// Contacts matching the filter, newest first.
    pub items: Vec<ContactItem>,
    /// Total stored contacts before filtering.
    pub total: u32,
    /// Placeholder text when `items` is empty.
    pub empty_message: Option<String>,
}

/// Mutation envelope for add/delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactActionResponse {
    pub ok: bool,
    /// Affected contact id when the call changed the list.
    pub contact_id: Option<String>,
    /// User-facing notification text, or diagnostics on storage failure.
    pub message: String,
}

impl ContactActionResponse {
    fn success(message: impl Into<String>, contact_id: String) -> Self {
        Self {
            ok: true,
            contact_id: Some(contact_id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            contact_id: None,
            message: message.into(),
        }
    }
}

/// Applies the `NNN-NN-NN` mask to raw number input.
#[flutter_rust_bridge::frb(sync)]
pub fn format_phone_number(raw: String) -> String {
    format_phone_number_inner(raw.as_str())
}

/// Lists stored contacts under a filter value.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Storage failures return an empty list with the empty-list message.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_list(filter: String) -> ContactListResponse {
    let result = with_contact_store(|store| {
        let view = ContactListView::derive(store.contacts(), filter.as_str());
        let empty_message = view.empty_message().map(str::to_string);
        Ok::<_, String>(ContactListResponse {
            total: u32::try_from(store.len()).unwrap_or(u32::MAX),
            items: view.items.into_iter().map(ContactItem::from).collect(),
            empty_message,
        })
    });

    match result {
        Ok(response) => response,
        Err(err) => {
            warn!("event=contacts_list module=ffi status=error error={err}");
            ContactListResponse {
                items: Vec::new(),
                total: 0,
                empty_message: Some(EMPTY_LIST_MESSAGE.to_string()),
            }
        }
    }
}

/// Adds one contact from submitted form fields.
///
/// # FFI contract
/// - Number input is masked before storing.
/// - Duplicate names return `ok=false` with the fixed notification text.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_add(name: String, number: String) -> ContactActionResponse {
    let candidate = NewContact::new(name, format_phone_number_inner(number.as_str()));
    let result = with_contact_store(|store| store.add(candidate));

    match result {
        Ok(contact) => {
            info!("event=contacts_add module=ffi status=ok");
            ContactActionResponse::success("Contact added.", contact.id)
        }
        Err(FfiError::Call(AddContactError::DuplicateName(_))) => {
            info!("event=contacts_add module=ffi status=rejected reason=duplicate_name");
            ContactActionResponse::failure(DUPLICATE_NAME_MESSAGE)
        }
        Err(FfiError::Call(AddContactError::Validation(err))) => {
            ContactActionResponse::failure(err.to_string())
        }
        Err(err) => ContactActionResponse::failure(format!("contacts_add failed: {err}")),
    }
}

/// Deletes one contact by id.
///
/// # FFI contract
/// - Unknown ids succeed with `contact_id=None` and leave storage untouched.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_delete(id: String) -> ContactActionResponse {
    match with_contact_store(|store| store.remove(id.as_str())) {
        Ok(true) => ContactActionResponse::success("Contact deleted.", id),
        Ok(false) => ContactActionResponse {
            ok: true,
            contact_id: None,
            message: "Contact not found.".to_string(),
        },
        Err(err) => ContactActionResponse::failure(format!("contacts_delete failed: {err}")),
    }
}

enum FfiError<E> {
    Open(String),
    Call(E),
}

impl<E: std::fmt::Display> std::fmt::Display for FfiError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open(message) => write!(f, "storage open failed: {message}"),
            Self::Call(err) => write!(f, "{err}"),
        }
    }
}

fn config() -> &'static PhonebookConfig {
    CONFIG.get_or_init(PhonebookConfig::from_env)
}

fn with_contact_store<T, E>(
    f: impl FnOnce(&mut ContactStore<SqliteContactRepository<'_>>) -> Result<T, E>,
) -> Result<T, FfiError<E>> {
    let _guard = STORE_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let conn = open_db(&config().db_path).map_err(|err| FfiError::Open(err.to_string()))?;
    let repo = SqliteContactRepository::new(SqliteLocalStorage::new(&conn));
    let mut store = ContactStore::load(repo);
    f(&mut store).map_err(FfiError::Call)
}

#[cfg(test)]
mod tests {
    use super::{
        contacts_add, contacts_delete, contacts_list, core_version, format_phone_number,
        init_logging, ping,
    };
    use phonebook_core::{DUPLICATE_NAME_MESSAGE, EMPTY_LIST_MESSAGE};
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "/tmp/logs".to_string());
        assert!(error.contains("unsupported log level"));
    }

    #[test]
    fn format_phone_number_applies_mask() {
        assert_eq!(format_phone_number("12345".to_string()), "123-45");
    }

    #[test]
    fn contacts_add_list_and_delete_roundtrip() {
        let token = unique_token("ffi-roundtrip");
        let created = contacts_add(token.clone(), "1234567".to_string());
        assert!(created.ok, "{}", created.message);
        let created_id = created.contact_id.expect("add should return contact_id");

        let listed = contacts_list(token.to_uppercase());
        assert_eq!(listed.items.len(), 1);
        assert_eq!(listed.items[0].id, created_id);
        assert_eq!(listed.items[0].number, "123-45-67");
        assert!(listed.empty_message.is_none());

        let deleted = contacts_delete(created_id.clone());
        assert!(deleted.ok, "{}", deleted.message);
        assert_eq!(deleted.contact_id.as_deref(), Some(created_id.as_str()));

        let listed = contacts_list(token);
        assert!(listed.items.is_empty());
        assert_eq!(listed.empty_message.as_deref(), Some(EMPTY_LIST_MESSAGE));
    }

    #[test]
    fn contacts_add_rejects_duplicate_name() {
        let token = unique_token("ffi-duplicate");
        let first = contacts_add(token.clone(), "1112233".to_string());
        assert!(first.ok, "{}", first.message);

        let second = contacts_add(format!("  {}  ", token.to_uppercase()), "4445566".to_string());
        assert!(!second.ok);
        assert_eq!(second.message, DUPLICATE_NAME_MESSAGE);
        assert_eq!(contacts_list(token).items.len(), 1);
    }

    #[test]
    fn contacts_delete_unknown_id_is_noop() {
        let response = contacts_delete(unique_token("missing-id"));
        assert!(response.ok);
        assert!(response.contact_id.is_none());
    }

    #[test]
    fn contacts_add_rejects_blank_number() {
        let response = contacts_add(unique_token("ffi-blank"), "abc".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("number"));
        assert!(response.contact_id.is_none());
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
