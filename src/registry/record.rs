//! User records and the registry aggregate.
//!
//! The registry serializes to the on-disk layout directly:
//!
//! ```json
//! {"users": {"alice": {"id": "…", "face_data": "…", "created_at": "…"}}}
//! ```

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::registry::error::{RegistryError, RegistryResult};

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Unique identifier, assigned once at creation.
    pub id: Uuid,
    /// Unique, case-sensitive username.
    pub username: String,
    /// Opaque face token supplied at registration.
    pub face_data: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Create a record with a fresh random id and the current time.
    pub fn new(username: impl Into<String>, face_data: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            face_data: face_data.into(),
            created_at: Utc::now(),
        }
    }

    fn from_entry(username: &str, entry: &UserEntry) -> Self {
        Self {
            id: entry.id,
            username: username.to_string(),
            face_data: entry.face_data.clone(),
            created_at: entry.created_at,
        }
    }
}

/// Persisted form of a user; the username is the map key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct UserEntry {
    id: Uuid,
    face_data: String,
    created_at: DateTime<Utc>,
}

/// Mapping from username to user record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    #[serde(default)]
    users: BTreeMap<String, UserEntry>,
}

/// A loaded registry that breaks one of the uniqueness rules.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntegrityViolation {
    #[error("registry contains an empty username")]
    EmptyUsername,

    #[error("id {id} is shared by `{first}` and `{second}`")]
    DuplicateId {
        id: Uuid,
        first: String,
        second: String,
    },
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn contains(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }

    pub fn contains_id(&self, id: Uuid) -> bool {
        self.users.values().any(|entry| entry.id == id)
    }

    /// Look up a user by username.
    pub fn get(&self, username: &str) -> Option<UserRecord> {
        self.users
            .get(username)
            .map(|entry| UserRecord::from_entry(username, entry))
    }

    /// Iterate over all records in username order.
    pub fn records(&self) -> impl Iterator<Item = UserRecord> + '_ {
        self.users
            .iter()
            .map(|(username, entry)| UserRecord::from_entry(username, entry))
    }

    /// Insert a new record.
    ///
    /// Rejects an empty username, and a username or id already present.
    pub fn insert(&mut self, record: UserRecord) -> RegistryResult<()> {
        if record.username.is_empty() {
            return Err(RegistryError::InvalidInput);
        }
        if self.contains(&record.username) {
            return Err(RegistryError::AlreadyExists(record.username));
        }
        if self.contains_id(record.id) {
            return Err(RegistryError::DuplicateId(record.id));
        }

        self.users.insert(
            record.username,
            UserEntry {
                id: record.id,
                face_data: record.face_data,
                created_at: record.created_at,
            },
        );
        Ok(())
    }

    /// Undo an insert whose persistence failed.
    pub(crate) fn remove(&mut self, username: &str) {
        self.users.remove(username);
    }

    /// Check the invariants serde cannot express.
    pub fn verify(&self) -> Result<(), IntegrityViolation> {
        let mut owners: HashMap<Uuid, &str> = HashMap::with_capacity(self.users.len());
        for (username, entry) in &self.users {
            if username.is_empty() {
                return Err(IntegrityViolation::EmptyUsername);
            }
            if let Some(first) = owners.insert(entry.id, username) {
                return Err(IntegrityViolation::DuplicateId {
                    id: entry.id,
                    first: first.to_string(),
                    second: username.clone(),
                });
            }
        }
        Ok(())
    }
}
