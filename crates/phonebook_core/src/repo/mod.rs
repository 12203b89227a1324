//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define key/value local storage and contact snapshot contracts.
//! - Isolate SQLite and JSON details from service orchestration.
//!
//! # Invariants
//! - The contact list is stored as one JSON snapshot under one key.
//! - Snapshot reads report malformed data instead of masking it; the
//!   decision to degrade belongs to the service layer.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod contact_repo;
pub mod storage_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for storage reads and writes.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Serialize(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialize(message) => write!(f, "failed to serialize snapshot: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialize(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
