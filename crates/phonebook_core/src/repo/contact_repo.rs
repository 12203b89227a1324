//! Contact snapshot repository.
//!
//! # Responsibility
//! - Serialize the full contact list to one local storage key.
//! - Classify what is stored under that key on read.
//!
//! # Invariants
//! - Writes always replace the whole snapshot.
//! - A stored JSON `null` reads the same as a missing key.

use super::storage_repo::LocalStorage;
use super::{RepoError, RepoResult};
use crate::model::contact::Contact;

/// Local storage key holding the serialized contact list.
pub const CONTACT_LIST_KEY: &str = "contact-list";

/// Result of reading the persisted snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotRead {
    /// Nothing stored yet.
    Missing,
    /// Snapshot parsed into contacts, newest first.
    Loaded(Vec<Contact>),
    /// Stored value could not be parsed; carries the parser message.
    Malformed(String),
}

/// Repository interface for the persisted contact list.
pub trait ContactRepository {
    fn read_snapshot(&self) -> RepoResult<SnapshotRead>;
    fn write_snapshot(&self, contacts: &[Contact]) -> RepoResult<()>;
}

/// Contact repository storing a JSON array under [`CONTACT_LIST_KEY`].
pub struct LocalStorageContactRepository<S: LocalStorage> {
    storage: S,
}

impl<S: LocalStorage> LocalStorageContactRepository<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Returns the underlying storage handle.
    pub fn storage(&self) -> &S {
        &self.storage
    }
}

impl<S: LocalStorage> ContactRepository for LocalStorageContactRepository<S> {
    fn read_snapshot(&self) -> RepoResult<SnapshotRead> {
        let Some(raw) = self.storage.get_item(CONTACT_LIST_KEY)? else {
            return Ok(SnapshotRead::Missing);
        };
        Ok(parse_snapshot(&raw))
    }

    fn write_snapshot(&self, contacts: &[Contact]) -> RepoResult<()> {
        let raw =
            serde_json::to_string(contacts).map_err(|err| RepoError::Serialize(err.to_string()))?;
        self.storage.set_item(CONTACT_LIST_KEY, &raw)
    }
}

/// Parses a raw snapshot value without touching storage.
pub fn parse_snapshot(raw: &str) -> SnapshotRead {
    match serde_json::from_str::<Option<Vec<Contact>>>(raw) {
        Ok(Some(contacts)) => SnapshotRead::Loaded(contacts),
        Ok(None) => SnapshotRead::Missing,
        Err(err) => SnapshotRead::Malformed(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_snapshot, SnapshotRead};

    #[test]
    fn parse_snapshot_accepts_non_uuid_ids() {
        let read =
            parse_snapshot(r#"[{"id":"V1StGXR8_Z5jdHi6B","name":"Ann","number":"123-45-67"}]"#);
        match read {
            SnapshotRead::Loaded(contacts) => {
                assert_eq!(contacts.len(), 1);
                assert_eq!(contacts[0].id, "V1StGXR8_Z5jdHi6B");
            }
            other => panic!("unexpected read: {other:?}"),
        }
    }

    #[test]
    fn parse_snapshot_treats_null_as_missing() {
        assert_eq!(parse_snapshot("null"), SnapshotRead::Missing);
    }

    #[test]
    fn parse_snapshot_flags_wrong_shapes() {
        assert!(matches!(parse_snapshot("{not json"), SnapshotRead::Malformed(_)));
        assert!(matches!(
            parse_snapshot(r#"{"id":"x","name":"Ann","number":"1"}"#),
            SnapshotRead::Malformed(_)
        ));
        assert!(matches!(
            parse_snapshot(r#"[{"id":"x","name":"Ann"}]"#),
            SnapshotRead::Malformed(_)
        ));
    }
}
