//! Credential store trait.

use async_trait::async_trait;

use super::agencies_model::{AccessGrant, Agency};
use crate::errors::Result;

/// Trait defining the contract for the agency credential store.
///
/// Every operation touches a single agency record and must be atomic for
/// that record. Implementations never call out to the marketplace.
#[async_trait]
pub trait AgencyRepositoryTrait: Send + Sync {
    /// Retrieves an agency by its ID. No side effects.
    fn get_by_id(&self, agency_id: &str) -> Result<Option<Agency>>;

    /// Stores the credential for an agency, creating the record if absent.
    ///
    /// Idempotent: storing the same grant twice leaves the same state.
    async fn set_token(&self, agency_id: &str, grant: AccessGrant) -> Result<Agency>;

    /// Removes the credential from an agency, keeping the record.
    ///
    /// Returns whether the agency record existed.
    async fn clear_token(&self, agency_id: &str) -> Result<bool>;
}
