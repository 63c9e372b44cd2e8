//! Data directory locking.
//!
//! The registry file has exactly one writer. Within a process that is the
//! `RegistryStore`; across processes it is whichever process holds the
//! exclusive OS-level lock on `<data_dir>/.lock`.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;

const LOCK_FILE_NAME: &str = ".lock";

/// Errors raised while locking the data directory.
#[derive(Debug, Error)]
pub enum LockError {
    /// Another process already holds the lock.
    #[error("data directory is already locked by another process: {}", .0.display())]
    AlreadyLocked(PathBuf),

    /// The lock file could not be created or locked.
    #[error("failed to create lock file {}: {}", .0.display(), .1)]
    CreateFailed(PathBuf, #[source] io::Error),

    /// The data directory could not be created.
    #[error("failed to create data directory {}: {}", .0.display(), .1)]
    DirectoryCreateFailed(PathBuf, #[source] io::Error),
}

/// An exclusive lock on a data directory, released on drop.
#[derive(Debug)]
pub struct DataDirLock {
    // Held open to keep the lock.
    _file: File,
    path: PathBuf,
}

impl DataDirLock {
    /// Create the data directory if needed and lock it without blocking.
    pub fn acquire(data_dir: impl AsRef<Path>) -> Result<Self, LockError> {
        let data_dir = data_dir.as_ref();
        if !data_dir.exists() {
            fs::create_dir_all(data_dir)
                .map_err(|e| LockError::DirectoryCreateFailed(data_dir.to_path_buf(), e))?;
            tracing::debug!(path = %data_dir.display(), "Created data directory");
        }

        let lock_path = data_dir.join(LOCK_FILE_NAME);
        let file =
            File::create(&lock_path).map_err(|e| LockError::CreateFailed(lock_path.clone(), e))?;

        match FileExt::try_lock_exclusive(&file) {
            Ok(()) => {
                tracing::info!(path = %lock_path.display(), "Acquired data directory lock");
                Ok(Self {
                    _file: file,
                    path: lock_path,
                })
            }
            Err(e) if is_contended(&e) => {
                tracing::error!(
                    path = %data_dir.display(),
                    "Data directory is already locked by another process"
                );
                Err(LockError::AlreadyLocked(data_dir.to_path_buf()))
            }
            Err(e) => Err(LockError::CreateFailed(lock_path, e)),
        }
    }

    /// Path of the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn is_contended(err: &io::Error) -> bool {
    // EWOULDBLOCK is 11 on Linux and 35 on macOS.
    err.kind() == io::ErrorKind::WouldBlock || matches!(err.raw_os_error(), Some(11) | Some(35))
}
