//! Reconciliation service trait.

use async_trait::async_trait;
use serde_json::Value;

use super::reconciliation_model::{ImportSummary, LinkOutcome};
use crate::errors::Result;
use crate::listings::{Listing, ListingFields};

/// Operations of the reconciliation engine.
///
/// Every remote write follows propagate-then-mirror: the marketplace is
/// called first and the mirror is written only after it reports success.
/// A failed remote call leaves the mirror exactly as it was.
#[async_trait]
pub trait ReconciliationServiceTrait: Send + Sync {
    /// Authorization page URL for starting the link flow of an agency.
    fn authorization_url(&self, agency_id: &str) -> String;

    /// Mirrors every remote listing of the agency, unclaimed.
    ///
    /// Best effort and not atomic across ids: a failing fetch stops the loop
    /// and leaves earlier listings mirrored. Safe to re-run.
    async fn bulk_import(&self, agency_id: &str, token: &str) -> Result<ImportSummary>;

    /// Exchanges the code, stores the credential, then bulk imports.
    ///
    /// Linkage and sync are independent: a failed import keeps the credential.
    async fn link_agency(&self, agency_id: &str, authorization_code: &str)
        -> Result<LinkOutcome>;

    /// Drops the agency credential. Mirrored listings stay.
    async fn unlink_agency(&self, agency_id: &str) -> Result<()>;

    /// Whether the agency holds a credential. No remote call.
    fn check_linkage(&self, agency_id: &str) -> Result<bool>;

    /// Creates a listing on the marketplace and mirrors it under the user.
    async fn create_listing(
        &self,
        agency_id: &str,
        user_id: &str,
        payload: ListingFields,
    ) -> Result<Listing>;

    /// Updates a listing on the marketplace, then replaces the mirrored field
    /// bag with `payload`. Returns the marketplace response body.
    async fn update_listing(&self, listing_id: &str, payload: ListingFields) -> Result<Value>;

    /// Deletes a listing on the marketplace, then from the mirror.
    async fn delete_listing(&self, listing_id: &str) -> Result<()>;

    /// Assigns the owning user of a mirrored listing. Local only.
    async fn associate_user(&self, listing_id: &str, user_id: &str) -> Result<()>;

    fn list_by_agency(&self, agency_id: &str) -> Result<Vec<Listing>>;

    fn list_by_user(&self, user_id: &str) -> Result<Vec<Listing>>;
}
