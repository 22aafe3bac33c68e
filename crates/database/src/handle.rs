//! Process-wide handle registry.
//!
//! The surrounding application initializes the database once at startup
//! and every other component obtains the handle through [`get`]. The
//! registry refuses a second [`install`] instead of silently replacing
//! the handle; a process that wants a different database restarts.

use std::sync::OnceLock;

use crate::connection::Database;
use crate::error::DbError;

static HANDLE: OnceLock<Database> = OnceLock::new();

/// Stores the initialized handle for the rest of the process lifetime.
///
/// Fails with [`DbError::AlreadyInitialized`] if a handle was installed
/// before. Callers are expected to install exactly once, before spawning
/// any worker that queries the database.
pub fn install(db: Database) -> Result<(), DbError> {
    HANDLE.set(db).map_err(|_| DbError::AlreadyInitialized)
}

/// Returns the installed handle, or [`DbError::NotInitialized`] when
/// called before [`install`]. This is the only shared access path, which
/// guarantees no query runs against an absent or unmigrated database.
pub fn get() -> Result<Database, DbError> {
    HANDLE.get().cloned().ok_or(DbError::NotInitialized)
}
