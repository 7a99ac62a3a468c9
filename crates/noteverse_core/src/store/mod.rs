//! Note store and its persistence boundary.
//!
//! # Responsibility
//! - Keep the ordered note collection and persist it as one snapshot.
//! - Isolate the key/value backend (SQLite or memory) from store semantics.
//!
//! # Invariants
//! - Every mutation rewrites the whole snapshot (last-write-wins).
//! - In-memory state stays authoritative when a snapshot write fails.

pub mod backend;
pub mod note_store;
pub mod snapshot;

use crate::db::DbError;
use crate::model::note::{NoteId, NoteValidationError};
use self::snapshot::SnapshotError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Error for note store operations and snapshot backends.
#[derive(Debug)]
pub enum StoreError {
    Validation(NoteValidationError),
    DuplicateId(NoteId),
    NotFound(NoteId),
    /// No id above the current maximum is left to assign.
    IdsExhausted,
    Snapshot(SnapshotError),
    Db(DbError),
    /// Backend-specific write/read failure without a richer source.
    Backend(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateId(id) => write!(f, "note id {id} already exists"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::IdsExhausted => write!(f, "note id space exhausted at {}", NoteId::MAX),
            Self::Snapshot(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Backend(message) => write!(f, "snapshot backend failure: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Snapshot(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::DuplicateId(_)
            | Self::NotFound(_)
            | Self::IdsExhausted
            | Self::Backend(_) => None,
        }
    }
}

impl From<NoteValidationError> for StoreError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<SnapshotError> for StoreError {
    fn from(value: SnapshotError) -> Self {
        Self::Snapshot(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
