//! Marketplace module - contracts for talking to the remote listing platform.

mod marketplace_model;
mod marketplace_traits;

pub use marketplace_model::{CreatedListing, RemoteResponse};
pub use marketplace_traits::{MarketplaceAuthTrait, MarketplaceClientTrait};
