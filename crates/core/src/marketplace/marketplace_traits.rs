//! Traits defining the contract with the remote marketplace.

use async_trait::async_trait;

use super::marketplace_model::{CreatedListing, RemoteResponse};
use crate::agencies::AccessGrant;
use crate::errors::Result;
use crate::listings::ListingFields;

/// Stateless client for the marketplace listing API.
///
/// Every call takes the bearer token of the agency it acts for. Calls are
/// single attempts: no implicit retry, a failure is reported straight back.
#[async_trait]
pub trait MarketplaceClientTrait: Send + Sync {
    /// Cheap authenticated call. `true` only on a success status; every kind
    /// of failure collapses to `false`.
    async fn health_probe(&self, token: &str) -> bool;

    /// Ids of every listing the token's account owns.
    ///
    /// Fails with `RemoteUnavailable` when the call does not succeed.
    async fn list_listing_ids(&self, token: &str) -> Result<Vec<String>>;

    /// Full remote record of one listing.
    ///
    /// Fails with `RemoteUnavailable` when the call does not succeed.
    async fn fetch_listing(&self, token: &str, listing_id: &str) -> Result<ListingFields>;

    /// Creates a listing; the marketplace assigns its id.
    ///
    /// Fails with `RemoteOperationFailed` on a non-success status or a
    /// response without an id.
    async fn create_listing(&self, token: &str, payload: &ListingFields)
        -> Result<CreatedListing>;

    /// Replaces a listing. The response status decides success.
    async fn update_listing(
        &self,
        token: &str,
        listing_id: &str,
        payload: &ListingFields,
    ) -> Result<RemoteResponse>;

    /// Deletes a listing. The response status decides success.
    async fn delete_listing(&self, token: &str, listing_id: &str) -> Result<RemoteResponse>;
}

/// Authorization-code flow with the marketplace.
#[async_trait]
pub trait MarketplaceAuthTrait: Send + Sync {
    /// URL of the marketplace authorization page. The agency id travels in `state`.
    fn authorization_url(&self, agency_id: &str) -> String;

    /// Exchanges an authorization code for an access token.
    ///
    /// Fails with `AuthExchangeFailed`.
    async fn exchange_code(&self, code: &str) -> Result<AccessGrant>;
}
