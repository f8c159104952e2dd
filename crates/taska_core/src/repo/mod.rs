//! Persistence layer: named storage slots and the task collection adapter.
//!
//! # Responsibility
//! - Define the durable key-value slot contract and its implementations.
//! - Map the task collection to and from a single slot value.
//!
//! # Invariants
//! - A slot write replaces the previous value for that key completely.
//! - Loading a collection never fails; unreadable data yields an empty list.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod slot_repo;
pub mod task_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence failure for slot reads/writes and collection encoding.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Serialize(serde_json::Error),
    /// Backend-specific failure without a richer error type.
    Unavailable(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "failed to encode task collection: {err}"),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::Unavailable(_) => None,
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

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}
