//! Core error types for propsync.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer,
//! and HTTP failures are converted by the connect layer.

use serde_json::Value;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the listing mirror.
///
/// The first block of variants are the typed outcomes the request surface
/// renders to callers. Storage and validation failures are wrapped in string
/// form to keep this type independent of any backend.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Agency '{0}' not found")]
    AgencyNotFound(String),

    #[error("Agency '{0}' is not linked to the marketplace")]
    AgencyNotLinked(String),

    #[error("Listing '{0}' not found")]
    ListingNotFound(String),

    #[error("Failed to obtain access token: {0}")]
    AuthExchangeFailed(String),

    #[error("Marketplace is not available right now: {0}")]
    RemoteUnavailable(String),

    /// The marketplace answered a create/update/delete with a non-success
    /// status. `body` is the remote payload, untouched.
    #[error("Marketplace rejected the operation (HTTP {status})")]
    RemoteOperationFailed { status: u16, body: Value },

    /// A bulk import stopped early. `imported` listings were mirrored before
    /// the failure and stay in place.
    #[error("Synchronization failed after {imported} listings: {reason}")]
    SyncFailed { imported: usize, reason: String },

    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// Builds a `RemoteOperationFailed` from a raw status and body.
    pub fn remote_operation(status: u16, body: Value) -> Self {
        Error::RemoteOperationFailed { status, body }
    }
}

/// Database-agnostic error type for storage operations.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert storage-specific errors (Diesel, SQLite, etc.) into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A unique constraint was violated (e.g., duplicate key).
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Unexpected(err.to_string())
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
