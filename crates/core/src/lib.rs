//! propsync core - domain entities, services, and traits.
//!
//! This crate contains the listing mirror and its reconciliation engine.
//! It is database-agnostic and transport-agnostic: the credential store and
//! the listing mirror are implemented by the `storage-sqlite` crate, and the
//! marketplace client by the `connect` crate.

pub mod agencies;
pub mod errors;
pub mod listings;
pub mod marketplace;
pub mod reconciliation;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
