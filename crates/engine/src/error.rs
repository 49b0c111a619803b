//! The module contains the errors the store can return.
//!
//! Contract violations of the CRUD path:
//!
//! - [`UnknownBudget`] the budget is not in the authoritative budget list.
//! - [`AlreadyExists`] a create collided with an existing spending id.
//! - [`NotFound`] an update/delete referenced a spending with no chain.
//! - [`Immutable`] the chain head is a tombstone.
//! - [`VersionConflict`] / [`InvalidParent`] the supplied parent version is
//!   not the chain head (update / delete respectively).
//!
//! Persisted data that fails to parse is reported as [`Corrupted`] and is
//! never reset behind the caller's back.
//!
//!  [`UnknownBudget`]: StoreError::UnknownBudget
//!  [`AlreadyExists`]: StoreError::AlreadyExists
//!  [`NotFound`]: StoreError::NotFound
//!  [`Immutable`]: StoreError::Immutable
//!  [`VersionConflict`]: StoreError::VersionConflict
//!  [`InvalidParent`]: StoreError::InvalidParent
//!  [`Corrupted`]: StoreError::Corrupted
use thiserror::Error;

/// Store custom errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("not existing budget: {0}")]
    UnknownBudget(i64),
    #[error("spending already exists: \"{0}\"")]
    AlreadyExists(String),
    #[error("spending not found: \"{0}\"")]
    NotFound(String),
    #[error("spending cannot be changed: \"{0}\"")]
    Immutable(String),
    #[error("invalid parent version: {0}")]
    VersionConflict(String),
    #[error("parent version is invalid: {0}")]
    InvalidParent(String),
    #[error("Currency mismatch: {0}")]
    CurrencyMismatch(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("corrupted value at \"{key}\": {source}")]
    Corrupted {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("storage backend: {0}")]
    Backend(String),
}

impl PartialEq for StoreError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::UnknownBudget(a), Self::UnknownBudget(b)) => a == b,
            (Self::AlreadyExists(a), Self::AlreadyExists(b)) => a == b,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Immutable(a), Self::Immutable(b)) => a == b,
            (Self::VersionConflict(a), Self::VersionConflict(b)) => a == b,
            (Self::InvalidParent(a), Self::InvalidParent(b)) => a == b,
            (Self::CurrencyMismatch(a), Self::CurrencyMismatch(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::Corrupted { key: a, .. }, Self::Corrupted { key: b, .. }) => a == b,
            (Self::Io(a), Self::Io(b)) => a.kind() == b.kind(),
            (Self::Backend(a), Self::Backend(b)) => a == b,
            _ => false,
        }
    }
}
