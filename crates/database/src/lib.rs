//! # Stratstore Database Crate
//!
//! This crate acts as a high-level, application-specific interface to the
//! SQLite store. It is the system's "permanent archive" for strategies,
//! their executions, and derived performance metrics.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** This crate encapsulates all database-specific logic. It
//!   provides a clean, abstract API to the rest of the application, hiding
//!   the underlying SQL and storage details.
//! - **Migrated before use:** [`Database::initialize`] applies all pending
//!   migrations before it hands out a usable handle, so no query can ever
//!   run against an unmigrated database.
//! - **Asynchronous & Pooled:** All operations are asynchronous and run
//!   against a shared connection pool.
//!
//! ## Public API
//!
//! - `Database`: the handle; `initialize` opens the storage location and
//!   brings the schema up to date.
//! - `handle`: the process-wide registry (`install` once at startup,
//!   `get` everywhere else).
//! - `DbRepository`: the data access methods for the three tables.
//! - `DbError`: the specific error types that can be returned from this
//!   crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod handle;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{
    Database, DatabaseConfig, applied_migration_count, connect, connect_with_config,
    run_migrations,
};
pub use error::DbError;
pub use repository::DbRepository;
