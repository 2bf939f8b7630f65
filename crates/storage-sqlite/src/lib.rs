//! SQLite storage implementation for propsync.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `propsync-core`:
//! - the agency credential store ([`agencies::AgencyRepository`])
//! - the listing mirror store ([`listings::ListingRepository`])
//!
//! Reads go through the r2d2 pool. Writes are serialized through a single
//! writer actor that owns one connection and runs each job in an immediate
//! transaction.
//!
//! ```text
//! core (engine)        connect (marketplace)
//!       │
//!       ▼
//! storage-sqlite (this crate)
//!       │
//!       ▼
//!   SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;

pub mod agencies;
pub mod listings;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from propsync-core for convenience
pub use propsync_core::errors::{DatabaseError, Error, Result};
