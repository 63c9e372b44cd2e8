//! The registry store: durable, uniqueness-enforcing user storage.

use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;

use crate::config::StorageConfig;
use crate::observability::metrics;
use crate::registry::error::{RegistryError, RegistryResult, StoreError};
use crate::registry::lock::{DataDirLock, LockError};
use crate::registry::persistence::{self, LoadAnomaly};
use crate::registry::record::{Registry, UserRecord};

/// Errors raised while opening a store at startup.
#[derive(Debug, Error)]
pub enum OpenError {
    #[error(transparent)]
    Lock(#[from] LockError),

    #[error("failed to initialize registry file: {0}")]
    Initialize(#[from] StoreError),
}

/// Owner of the in-memory registry and its backing file.
///
/// Registrations hold the write lock across check, insert and persist, so
/// two callers racing on one username cannot both succeed. Logins take the
/// lock in shared mode and only ever see fully applied registrations.
#[derive(Debug)]
pub struct RegistryStore {
    path: PathBuf,
    registry: RwLock<Registry>,
    _dir_lock: Option<DataDirLock>,
}

impl RegistryStore {
    /// Open the store described by `config`.
    ///
    /// Creates the data directory, locks it against other processes, loads
    /// the registry and writes an empty registry file if none exists yet.
    pub fn open(config: &StorageConfig) -> Result<Self, OpenError> {
        let dir_lock = DataDirLock::acquire(&config.data_dir)?;
        let store = Self::with_lock(config.registry_path(), Some(dir_lock));

        if !store.path.exists() {
            store.save(&Registry::new())?;
            tracing::info!(path = %store.path.display(), "Initialized empty registry file");
        }

        Ok(store)
    }

    /// Back a store by `path` without taking a directory lock.
    ///
    /// The parent directory is not created.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self::with_lock(path.into(), None)
    }

    fn with_lock(path: PathBuf, dir_lock: Option<DataDirLock>) -> Self {
        let registry = load_from(&path);
        tracing::info!(
            path = %path.display(),
            users = registry.len(),
            "Registry loaded"
        );
        metrics::record_registry_size(registry.len());

        Self {
            path,
            registry: RwLock::new(registry),
            _dir_lock: dir_lock,
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the backing file.
    ///
    /// Never fails: a missing, unreadable or corrupt file yields an empty
    /// registry. Anomalies are logged and counted.
    pub fn load(&self) -> Registry {
        let _guard = self.read_guard();
        load_from(&self.path)
    }

    /// Persist `registry` in full and make it the current state.
    pub fn save(&self, registry: &Registry) -> Result<(), StoreError> {
        let mut current = self.write_guard();
        if let Err(e) = persistence::write_registry(&self.path, registry) {
            tracing::error!(path = %self.path.display(), error = %e, "Failed to save registry");
            metrics::record_persist_failure();
            return Err(e);
        }
        *current = registry.clone();
        metrics::record_registry_size(current.len());
        Ok(())
    }

    /// Copy of the current in-memory registry.
    pub fn snapshot(&self) -> Registry {
        self.read_guard().clone()
    }

    /// Number of registered users.
    pub fn len(&self) -> usize {
        self.read_guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Register a new user and persist the registry before returning.
    pub fn register(&self, username: &str, face_data: &str) -> RegistryResult<UserRecord> {
        require_credentials(username, face_data)?;

        let mut registry = self.write_guard();
        if registry.contains(username) {
            tracing::debug!(username = %username, "Registration rejected, username taken");
            return Err(RegistryError::AlreadyExists(username.to_string()));
        }

        let record = loop {
            let candidate = UserRecord::new(username, face_data);
            if !registry.contains_id(candidate.id) {
                break candidate;
            }
        };
        registry.insert(record.clone())?;

        if let Err(e) = persistence::write_registry(&self.path, &registry) {
            registry.remove(username);
            tracing::error!(
                username = %username,
                path = %self.path.display(),
                error = %e,
                "Registration rolled back, registry not persisted"
            );
            metrics::record_persist_failure();
            return Err(e.into());
        }

        tracing::info!(user_id = %record.id, username = %username, "User registered");
        metrics::record_registry_size(registry.len());
        Ok(record)
    }

    /// Authenticate a user.
    ///
    /// Face data is only checked for presence; any registered username with
    /// a non-empty token is accepted.
    pub fn login(&self, username: &str, face_data: &str) -> RegistryResult<UserRecord> {
        require_credentials(username, face_data)?;

        let record = self
            .read_guard()
            .get(username)
            .ok_or_else(|| RegistryError::NotFound(username.to_string()))?;

        tracing::info!(user_id = %record.id, username = %username, "User authenticated");
        Ok(record)
    }

    // A poisoned lock still guards a consistent registry: the only writes
    // are a single insert, rolled back on persistence failure.
    fn read_guard(&self) -> RwLockReadGuard<'_, Registry> {
        self.registry.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, Registry> {
        self.registry.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn require_credentials(username: &str, face_data: &str) -> RegistryResult<()> {
    if username.is_empty() || face_data.is_empty() {
        return Err(RegistryError::InvalidInput);
    }
    Ok(())
}

fn load_from(path: &Path) -> Registry {
    match persistence::read_registry(path) {
        Ok(Some(registry)) => registry,
        Ok(None) => {
            tracing::debug!(path = %path.display(), "No registry file, starting empty");
            Registry::new()
        }
        Err(anomaly) => {
            report_anomaly(path, &anomaly);
            Registry::new()
        }
    }
}

fn report_anomaly(path: &Path, anomaly: &LoadAnomaly) {
    tracing::warn!(
        path = %path.display(),
        kind = anomaly.kind(),
        error = %anomaly,
        "Registry file unusable, starting with an empty registry"
    );
    metrics::record_load_anomaly(anomaly.kind());
}
