//! Reading and atomically writing the registry file.
//!
//! Writes go to a temporary file in the target's directory, are synced,
//! then renamed over the target. A crash mid-write leaves either the
//! old file or the new one, never a truncated mix.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::registry::error::StoreError;
use crate::registry::record::{IntegrityViolation, Registry};

/// Reasons a present registry file could not be used.
#[derive(Debug, Error)]
pub enum LoadAnomaly {
    #[error("registry file unreadable: {0}")]
    Unreadable(#[source] io::Error),

    #[error("registry file is not valid JSON: {0}")]
    Corrupt(#[source] serde_json::Error),

    #[error("registry file violates uniqueness: {0}")]
    Integrity(#[source] IntegrityViolation),
}

impl LoadAnomaly {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            LoadAnomaly::Unreadable(_) => "unreadable",
            LoadAnomaly::Corrupt(_) => "corrupt",
            LoadAnomaly::Integrity(_) => "integrity",
        }
    }
}

/// Read the registry at `path`.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn read_registry(path: &Path) -> Result<Option<Registry>, LoadAnomaly> {
    let contents = match fs::read(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(LoadAnomaly::Unreadable(e)),
    };

    let registry: Registry = serde_json::from_slice(&contents).map_err(LoadAnomaly::Corrupt)?;
    registry.verify().map_err(LoadAnomaly::Integrity)?;
    Ok(Some(registry))
}

/// Write the registry to `path` atomically.
///
/// A registry that fails [`Registry::verify`] is refused, since it could not
/// be read back.
pub fn write_registry(path: &Path, registry: &Registry) -> Result<(), StoreError> {
    registry.verify()?;
    let contents = serde_json::to_vec(registry)?;
    write_atomic(path, &contents)
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(parent).map_err(|e| StoreError::io(parent, e))?;
    temp.write_all(contents)
        .map_err(|e| StoreError::io(temp.path(), e))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| StoreError::io(temp.path(), e))?;
    temp.persist(path).map_err(|e| StoreError::io(path, e.error))?;

    sync_directory(parent);
    Ok(())
}

// Best effort; not every platform allows opening a directory.
fn sync_directory(dir: &Path) {
    if let Ok(dir) = File::open(dir) {
        let _ = dir.sync_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::record::UserRecord;

    fn sample_registry() -> Registry {
        let mut registry = Registry::new();
        registry.insert(UserRecord::new("alice", "abc")).unwrap();
        registry.insert(UserRecord::new("bob", "xyz")).unwrap();
        registry
    }

    #[test]
    fn missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_registry(&dir.path().join("users.json")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn write_then_read_reproduces_registry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        let registry = sample_registry();

        write_registry(&path, &registry).unwrap();
        let loaded = read_registry(&path).unwrap().unwrap();
        assert_eq!(loaded, registry);
    }

    #[test]
    fn write_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");

        write_registry(&path, &sample_registry()).unwrap();
        write_registry(&path, &Registry::new()).unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["users.json".to_string()]);
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        fs::write(&path, b"{\"users\": {\"alice\": ").unwrap();

        let err = read_registry(&path).unwrap_err();
        assert!(matches!(err, LoadAnomaly::Corrupt(_)));
        assert_eq!(err.kind(), "corrupt");
    }

    #[test]
    fn directory_in_place_of_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        fs::create_dir(&path).unwrap();

        let err = read_registry(&path).unwrap_err();
        assert!(matches!(err, LoadAnomaly::Unreadable(_)));
    }

    #[test]
    fn registry_with_empty_username_is_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        write_registry(&path, &sample_registry()).unwrap();

        let bad: Registry =
            serde_json::from_str(r#"{"users":{"":{"id":"6f1c1d0e-3b9a-4c52-9d1e-2a7b8c9d0e1f","face_data":"x","created_at":"2024-01-01T00:00:00Z"}}}"#)
                .unwrap();
        let err = write_registry(&path, &bad).unwrap_err();

        assert!(matches!(err, StoreError::Integrity(IntegrityViolation::EmptyUsername)));
        let on_disk = read_registry(&path).unwrap().unwrap();
        assert_eq!(on_disk.len(), 2);
        assert!(on_disk.contains("alice") && on_disk.contains("bob"));
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("users.json");

        let err = write_registry(&path, &sample_registry()).unwrap_err();
        assert!(matches!(err, StoreError::IoFailure { .. }));
        assert!(!path.exists());
    }
}
