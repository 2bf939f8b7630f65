//! Listing mirror store trait.
//!
//! The mirror store is a keyed collection of [`Listing`] records keyed by the
//! marketplace listing id. Each operation is atomic for its key; there are no
//! cross-key transactions.

use async_trait::async_trait;

use super::listings_model::{Listing, ListingFields};
use crate::errors::Result;

#[async_trait]
pub trait ListingRepositoryTrait: Send + Sync {
    /// Retrieves a mirrored listing by its marketplace ID.
    fn get_by_id(&self, listing_id: &str) -> Result<Option<Listing>>;

    /// Inserts or fully replaces the record stored under `listing.id`.
    ///
    /// This is not a field merge: callers assemble the complete record.
    async fn upsert(&self, listing: Listing) -> Result<Listing>;

    /// Sets the owning user of a listing without touching any other field.
    ///
    /// Returns the number of updated records (0 when the listing is absent).
    async fn set_user_id(&self, listing_id: &str, user_id: &str) -> Result<usize>;

    /// Replaces the field bag of a listing, keeping its owners.
    ///
    /// Returns the number of updated records (0 when the listing is absent).
    async fn update_fields(&self, listing_id: &str, fields: ListingFields) -> Result<usize>;

    /// Deletes a listing by its ID.
    ///
    /// Returns the number of deleted records.
    async fn delete(&self, listing_id: &str) -> Result<usize>;

    /// Lists the listings owned by an agency.
    fn list_by_agency(&self, agency_id: &str) -> Result<Vec<Listing>>;

    /// Lists the listings associated with a user, across agencies.
    fn list_by_user(&self, user_id: &str) -> Result<Vec<Listing>>;
}
