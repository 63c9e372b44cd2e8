//! User registry subsystem.
//!
//! # Data Flow
//! ```text
//! register(username, face_data)
//!     → store.rs (validate, exclusive lock)
//!     → record.rs (uniqueness check, insert)
//!     → persistence.rs (temp file → fsync → rename)
//!     → UserRecord returned to caller
//!
//! login(username, face_data)
//!     → store.rs (validate, shared lock)
//!     → record.rs (lookup)
//!     → UserRecord returned to caller
//! ```
//!
//! # Design Decisions
//! - The store is the only writer of the backing file
//! - Every successful registration is persisted before it is acknowledged
//! - A failed write rolls the in-memory insert back
//! - An unreadable or corrupt file loads as an empty registry (reported, not fatal)
//! - One process per data directory, enforced by an OS-level lock

pub mod error;
pub mod lock;
pub mod persistence;
pub mod record;
pub mod store;

pub use error::{RegistryError, StoreError};
pub use lock::{DataDirLock, LockError};
pub use record::{Registry, UserRecord};
pub use store::RegistryStore;
