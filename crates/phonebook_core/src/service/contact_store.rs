//! Contact store use-case service.
//!
//! # Responsibility
//! - Own the canonical contact list for one running session.
//! - Enforce unique normalized names on add.
//! - Persist the full list right after every list change.
//!
//! # Invariants
//! - New contacts are prepended (newest first).
//! - Failed adds and no-op removes never write to storage.
//! - A failed storage write leaves the in-memory list unchanged.
//!
//! # See also
//! - DESIGN.md (open question decisions on degraded loads)

use crate::model::contact::{normalize_name, Contact, ContactValidationError, NewContact};
use crate::repo::contact_repo::{ContactRepository, SnapshotRead};
use crate::repo::{RepoError, RepoResult};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// An existing contact already has the candidate's normalized name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateNameError {
    /// Candidate name as submitted.
    pub name: String,
}

impl Display for DuplicateNameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "contact with name `{}` already exists", self.name.trim())
    }
}

impl Error for DuplicateNameError {}

/// Failure modes of [`ContactStore::add`].
#[derive(Debug)]
pub enum AddContactError {
    Validation(ContactValidationError),
    DuplicateName(DuplicateNameError),
    Repo(RepoError),
}

impl Display for AddContactError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateName(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AddContactError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::DuplicateName(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<ContactValidationError> for AddContactError {
    fn from(value: ContactValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DuplicateNameError> for AddContactError {
    fn from(value: DuplicateNameError) -> Self {
        Self::DuplicateName(value)
    }
}

impl From<RepoError> for AddContactError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Canonical contact list plus its persistence lifecycle.
pub struct ContactStore<R: ContactRepository> {
    repo: R,
    contacts: Vec<Contact>,
}

impl<R: ContactRepository> ContactStore<R> {
    /// Loads the persisted snapshot into a new store.
    ///
    /// Missing, malformed, or unreadable snapshots start an empty list. The
    /// condition is logged and never returned to the caller.
    pub fn load(repo: R) -> Self {
        let contacts = match repo.read_snapshot() {
            Ok(SnapshotRead::Loaded(contacts)) => {
                info!(
                    "event=contacts_load module=store status=ok count={}",
                    contacts.len()
                );
                contacts
            }
            Ok(SnapshotRead::Missing) => {
                info!("event=contacts_load module=store status=empty");
                Vec::new()
            }
            Ok(SnapshotRead::Malformed(reason)) => {
                warn!(
                    "event=contacts_load module=store status=degraded error_code=snapshot_malformed error={}",
                    reason
                );
                Vec::new()
            }
            Err(err) => {
                warn!(
                    "event=contacts_load module=store status=degraded error_code=storage_unavailable error={}",
                    err
                );
                Vec::new()
            }
        };

        Self { repo, contacts }
    }

    /// Current list, newest first.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Returns the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Adds one contact when its normalized name is free.
    ///
    /// # Errors
    /// - `Validation` when name or number is blank.
    /// - `DuplicateName` when the normalized name is taken; nothing changes.
    /// - `Repo` when the snapshot write fails; nothing changes.
    pub fn add(&mut self, candidate: NewContact) -> Result<Contact, AddContactError> {
        candidate.validate()?;
        let (next, contact) = insert_contact(&self.contacts, candidate)?;
        self.commit(next)?;
        info!(
            "event=contact_add module=store status=ok count={}",
            self.contacts.len()
        );
        Ok(contact)
    }

    /// Removes the contact with `id`.
    ///
    /// Returns `Ok(false)` without touching storage when no contact matches.
    pub fn remove(&mut self, id: &str) -> RepoResult<bool> {
        let Some(next) = remove_contact(&self.contacts, id) else {
            info!("event=contact_remove module=store status=noop");
            return Ok(false);
        };
        self.commit(next)?;
        info!(
            "event=contact_remove module=store status=ok count={}",
            self.contacts.len()
        );
        Ok(true)
    }

    /// Writes the full current list to storage.
    pub fn persist(&self) -> RepoResult<()> {
        self.repo.write_snapshot(&self.contacts)
    }

    /// Swaps in `next` and persists it, restoring the previous list when the
    /// write fails.
    fn commit(&mut self, next: Vec<Contact>) -> RepoResult<()> {
        let previous = std::mem::replace(&mut self.contacts, next);
        if let Err(err) = self.persist() {
            error!(
                "event=contacts_persist module=store status=error error_code=snapshot_write_failed error={}",
                err
            );
            self.contacts = previous;
            return Err(err);
        }
        Ok(())
    }
}

/// Returns the index of a contact whose normalized name equals `name`'s.
pub fn find_duplicate(contacts: &[Contact], name: &str) -> Option<usize> {
    let normalized = normalize_name(name);
    contacts
        .iter()
        .position(|contact| contact.normalized_name() == normalized)
}

/// Builds the next list with a fresh contact prepended.
///
/// Pure transition: `contacts` is left untouched either way.
pub fn insert_contact(
    contacts: &[Contact],
    candidate: NewContact,
) -> Result<(Vec<Contact>, Contact), DuplicateNameError> {
    if find_duplicate(contacts, &candidate.name).is_some() {
        return Err(DuplicateNameError {
            name: candidate.name,
        });
    }

    let contact = Contact::from_candidate(candidate);
    let mut next = Vec::with_capacity(contacts.len() + 1);
    next.push(contact.clone());
    next.extend_from_slice(contacts);
    Ok((next, contact))
}

/// Builds the next list without `id`, or `None` when `id` is absent.
pub fn remove_contact(contacts: &[Contact], id: &str) -> Option<Vec<Contact>> {
    if !contacts.iter().any(|contact| contact.id == id) {
        return None;
    }
    Some(
        contacts
            .iter()
            .filter(|contact| contact.id != id)
            .cloned()
            .collect(),
    )
}
