use async_trait::async_trait;
use log::{debug, error, info, warn};
use serde_json::Value;
use std::sync::Arc;

use super::reconciliation_model::{ImportSummary, LinkOutcome};
use super::reconciliation_traits::ReconciliationServiceTrait;
use crate::agencies::AgencyRepositoryTrait;
use crate::errors::{Error, Result};
use crate::listings::{Listing, ListingFields, ListingRepositoryTrait};
use crate::marketplace::{MarketplaceAuthTrait, MarketplaceClientTrait};

/// Reconciliation engine over the credential store, the listing mirror and
/// the marketplace.
pub struct ReconciliationService {
    agency_repository: Arc<dyn AgencyRepositoryTrait>,
    listing_repository: Arc<dyn ListingRepositoryTrait>,
    marketplace: Arc<dyn MarketplaceClientTrait>,
    auth: Arc<dyn MarketplaceAuthTrait>,
}

impl ReconciliationService {
    pub fn new(
        agency_repository: Arc<dyn AgencyRepositoryTrait>,
        listing_repository: Arc<dyn ListingRepositoryTrait>,
        marketplace: Arc<dyn MarketplaceClientTrait>,
        auth: Arc<dyn MarketplaceAuthTrait>,
    ) -> Self {
        Self {
            agency_repository,
            listing_repository,
            marketplace,
            auth,
        }
    }

    /// Token of a linked agency whose marketplace currently answers.
    ///
    /// The health probe is a cheap precondition, not a guarantee that the
    /// following write will go through.
    async fn writable_token(&self, agency_id: &str) -> Result<String> {
        let token = self
            .agency_repository
            .get_by_id(agency_id)?
            .and_then(|agency| agency.access_token)
            .ok_or_else(|| Error::AgencyNotLinked(agency_id.to_string()))?;

        if !self.marketplace.health_probe(&token).await {
            warn!("Marketplace health probe failed for agency {}", agency_id);
            return Err(Error::RemoteUnavailable(
                "health probe did not succeed".to_string(),
            ));
        }
        Ok(token)
    }

    fn require_listing(&self, listing_id: &str) -> Result<Listing> {
        self.listing_repository
            .get_by_id(listing_id)?
            .ok_or_else(|| Error::ListingNotFound(listing_id.to_string()))
    }

    async fn import_one(&self, agency_id: &str, token: &str, listing_id: &str) -> Result<()> {
        let fields = self.marketplace.fetch_listing(token, listing_id).await?;
        self.listing_repository
            .upsert(Listing::imported(listing_id, agency_id, fields))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ReconciliationServiceTrait for ReconciliationService {
    fn authorization_url(&self, agency_id: &str) -> String {
        self.auth.authorization_url(agency_id)
    }

    async fn bulk_import(&self, agency_id: &str, token: &str) -> Result<ImportSummary> {
        let listing_ids = self.marketplace.list_listing_ids(token).await?;
        info!(
            "Importing {} marketplace listings for agency {}",
            listing_ids.len(),
            agency_id
        );

        let mut imported = 0;
        for listing_id in &listing_ids {
            if let Err(e) = self.import_one(agency_id, token, listing_id).await {
                error!(
                    "Import for agency {} stopped at listing {} after {} listings: {}",
                    agency_id, listing_id, imported, e
                );
                return Err(Error::SyncFailed {
                    imported,
                    reason: e.to_string(),
                });
            }
            imported += 1;
        }

        info!("Imported {} listings for agency {}", imported, agency_id);
        Ok(ImportSummary {
            agency_id: agency_id.to_string(),
            imported,
        })
    }

    async fn link_agency(
        &self,
        agency_id: &str,
        authorization_code: &str,
    ) -> Result<LinkOutcome> {
        let grant = self
            .auth
            .exchange_code(authorization_code)
            .await
            .map_err(|e| match e {
                Error::AuthExchangeFailed(_) => e,
                other => Error::AuthExchangeFailed(other.to_string()),
            })?;
        let token = grant.access_token.clone();

        self.agency_repository.set_token(agency_id, grant).await?;
        info!("Agency {} linked to the marketplace", agency_id);

        match self.bulk_import(agency_id, &token).await {
            Ok(summary) => Ok(summary.into()),
            Err(e @ Error::SyncFailed { .. }) => Err(e),
            Err(e) => Err(Error::SyncFailed {
                imported: 0,
                reason: e.to_string(),
            }),
        }
    }

    async fn unlink_agency(&self, agency_id: &str) -> Result<()> {
        if !self.agency_repository.clear_token(agency_id).await? {
            return Err(Error::AgencyNotFound(agency_id.to_string()));
        }
        info!("Agency {} unlinked from the marketplace", agency_id);
        Ok(())
    }

    fn check_linkage(&self, agency_id: &str) -> Result<bool> {
        self.agency_repository
            .get_by_id(agency_id)?
            .map(|agency| agency.is_linked())
            .ok_or_else(|| Error::AgencyNotFound(agency_id.to_string()))
    }

    async fn create_listing(
        &self,
        agency_id: &str,
        user_id: &str,
        payload: ListingFields,
    ) -> Result<Listing> {
        let token = self.writable_token(agency_id).await?;
        let created = self.marketplace.create_listing(&token, &payload).await?;
        debug!(
            "Marketplace assigned id {} to new listing of agency {} ({} fields echoed)",
            created.id,
            agency_id,
            created.payload.len()
        );

        let listing = Listing::new(created.id, agency_id, Some(user_id.to_string()), payload);
        self.listing_repository.upsert(listing).await
    }

    async fn update_listing(&self, listing_id: &str, payload: ListingFields) -> Result<Value> {
        let listing = self.require_listing(listing_id)?;
        let token = self.writable_token(&listing.agency_id).await?;

        let response = self
            .marketplace
            .update_listing(&token, listing_id, &payload)
            .await?
            .into_result()?;

        // Only the field bag is rewritten; an owner assigned meanwhile stays.
        let updated = self
            .listing_repository
            .update_fields(listing_id, payload)
            .await?;
        if updated == 0 {
            warn!(
                "Listing {} vanished from the mirror during its update",
                listing_id
            );
        }
        Ok(response.body)
    }

    async fn delete_listing(&self, listing_id: &str) -> Result<()> {
        let listing = self.require_listing(listing_id)?;
        let token = self.writable_token(&listing.agency_id).await?;

        self.marketplace
            .delete_listing(&token, listing_id)
            .await?
            .into_result()?;

        self.listing_repository.delete(listing_id).await?;
        Ok(())
    }

    async fn associate_user(&self, listing_id: &str, user_id: &str) -> Result<()> {
        let updated = self
            .listing_repository
            .set_user_id(listing_id, user_id)
            .await?;
        if updated == 0 {
            return Err(Error::ListingNotFound(listing_id.to_string()));
        }
        Ok(())
    }

    fn list_by_agency(&self, agency_id: &str) -> Result<Vec<Listing>> {
        self.listing_repository.list_by_agency(agency_id)
    }

    fn list_by_user(&self, user_id: &str) -> Result<Vec<Listing>> {
        self.listing_repository.list_by_user(user_id)
    }
}
