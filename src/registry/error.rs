//! Registry error definitions.

use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

use crate::registry::record::IntegrityViolation;

/// Errors raised while writing the backing file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing medium could not be written.
    #[error("registry I/O failure at {}: {}", .path.display(), .source)]
    IoFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The registry could not be encoded as JSON.
    #[error("failed to encode registry: {0}")]
    Encode(#[from] serde_json::Error),

    /// The registry would not load back, so it was not written.
    #[error("refusing to write registry: {0}")]
    Integrity(#[from] IntegrityViolation),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoFailure {
            path: path.into(),
            source,
        }
    }
}

/// Errors returned by registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Username or face data missing or empty.
    #[error("username and face data are required")]
    InvalidInput,

    /// A user with this username is already registered.
    #[error("username `{0}` already exists")]
    AlreadyExists(String),

    /// No user with this username is registered.
    #[error("user `{0}` not found")]
    NotFound(String),

    /// The record carries an id that is already assigned to another user.
    #[error("user id {0} is already assigned")]
    DuplicateId(Uuid),

    /// The registration could not be persisted.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Convenience alias for registry results.
pub type RegistryResult<T> = Result<T, RegistryError>;
