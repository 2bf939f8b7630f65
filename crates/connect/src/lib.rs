//! propsync connect - HTTP access to the listing marketplace.
//!
//! This crate implements the marketplace contracts of `propsync-core`:
//! - [`MarketplaceApiClient`] for listing reads and writes
//! - [`MarketplaceAuthClient`] for the authorization-code flow

pub mod auth;
pub mod client;
pub mod config;

pub use auth::MarketplaceAuthClient;
pub use client::MarketplaceApiClient;
pub use config::{MarketplaceConfig, DEFAULT_API_URL, DEFAULT_AUTH_URL, DEFAULT_TIMEOUT};
