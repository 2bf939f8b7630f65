use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::{ReconciliationService, ReconciliationServiceTrait};
use crate::agencies::{AccessGrant, Agency, AgencyRepositoryTrait};
use crate::errors::{Error, Result};
use crate::listings::{Listing, ListingFields, ListingRepositoryTrait};
use crate::marketplace::{
    CreatedListing, MarketplaceAuthTrait, MarketplaceClientTrait, RemoteResponse,
};

// --- Mock credential store ---
#[derive(Default)]
struct MockAgencyRepository {
    agencies: Mutex<HashMap<String, Agency>>,
}

impl MockAgencyRepository {
    fn with_linked(agency_id: &str, token: &str) -> Self {
        let repo = Self::default();
        repo.agencies.lock().unwrap().insert(
            agency_id.to_string(),
            Agency {
                id: agency_id.to_string(),
                access_token: Some(token.to_string()),
                remote_user_id: None,
            },
        );
        repo
    }

    fn with_unlinked(agency_id: &str) -> Self {
        let repo = Self::default();
        repo.agencies.lock().unwrap().insert(
            agency_id.to_string(),
            Agency {
                id: agency_id.to_string(),
                ..Default::default()
            },
        );
        repo
    }
}

#[async_trait]
impl AgencyRepositoryTrait for MockAgencyRepository {
    fn get_by_id(&self, agency_id: &str) -> Result<Option<Agency>> {
        Ok(self.agencies.lock().unwrap().get(agency_id).cloned())
    }

    async fn set_token(&self, agency_id: &str, grant: AccessGrant) -> Result<Agency> {
        let agency = Agency {
            id: agency_id.to_string(),
            access_token: Some(grant.access_token),
            remote_user_id: grant.remote_user_id,
        };
        self.agencies
            .lock()
            .unwrap()
            .insert(agency_id.to_string(), agency.clone());
        Ok(agency)
    }

    async fn clear_token(&self, agency_id: &str) -> Result<bool> {
        let mut agencies = self.agencies.lock().unwrap();
        match agencies.get_mut(agency_id) {
            Some(agency) => {
                agency.access_token = None;
                agency.remote_user_id = None;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// --- Mock listing mirror ---
#[derive(Default)]
struct MockListingRepository {
    listings: Mutex<BTreeMap<String, Listing>>,
    writes: AtomicUsize,
}

impl MockListingRepository {
    fn seed(&self, listing: Listing) {
        self.listings
            .lock()
            .unwrap()
            .insert(listing.id.clone(), listing);
    }

    fn snapshot(&self) -> BTreeMap<String, Listing> {
        self.listings.lock().unwrap().clone()
    }

    fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ListingRepositoryTrait for MockListingRepository {
    fn get_by_id(&self, listing_id: &str) -> Result<Option<Listing>> {
        Ok(self.listings.lock().unwrap().get(listing_id).cloned())
    }

    async fn upsert(&self, listing: Listing) -> Result<Listing> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.seed(listing.clone());
        Ok(listing)
    }

    async fn set_user_id(&self, listing_id: &str, user_id: &str) -> Result<usize> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut listings = self.listings.lock().unwrap();
        match listings.get_mut(listing_id) {
            Some(listing) => {
                listing.user_id = Some(user_id.to_string());
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn update_fields(&self, listing_id: &str, fields: ListingFields) -> Result<usize> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut listings = self.listings.lock().unwrap();
        match listings.get_mut(listing_id) {
            Some(listing) => {
                listing.fields = crate::listings::sanitize_fields(fields);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, listing_id: &str) -> Result<usize> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .listings
            .lock()
            .unwrap()
            .remove(listing_id)
            .map_or(0, |_| 1))
    }

    fn list_by_agency(&self, agency_id: &str) -> Result<Vec<Listing>> {
        Ok(self
            .listings
            .lock()
            .unwrap()
            .values()
            .filter(|l| l.agency_id == agency_id)
            .cloned()
            .collect())
    }

    fn list_by_user(&self, user_id: &str) -> Result<Vec<Listing>> {
        Ok(self
            .listings
            .lock()
            .unwrap()
            .values()
            .filter(|l| l.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect())
    }
}

// --- Mock marketplace ---
struct MarketplaceBehavior {
    healthy: bool,
    list_fails: bool,
    failing_fetch: Option<String>,
    write_status: u16,
    remote: BTreeMap<String, ListingFields>,
    next_id: u32,
    /// Runs while the remote update is in flight.
    during_update: Option<Box<dyn FnOnce() + Send>>,
}

impl Default for MarketplaceBehavior {
    fn default() -> Self {
        Self {
            healthy: true,
            list_fails: false,
            failing_fetch: None,
            write_status: 200,
            remote: BTreeMap::new(),
            next_id: 1000,
            during_update: None,
        }
    }
}

#[derive(Default)]
struct MockMarketplace {
    behavior: Mutex<MarketplaceBehavior>,
    calls: AtomicUsize,
    write_calls: AtomicUsize,
}

impl MockMarketplace {
    fn with_remote(listings: Vec<(&str, Value)>) -> Self {
        let mock = Self::default();
        {
            let mut behavior = mock.behavior.lock().unwrap();
            for (id, value) in listings {
                behavior.remote.insert(id.to_string(), fields(value));
            }
        }
        mock
    }

    fn configure(&self, f: impl FnOnce(&mut MarketplaceBehavior)) {
        f(&mut self.behavior.lock().unwrap());
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    fn record(&self, write: bool) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if write {
            self.write_calls.fetch_add(1, Ordering::SeqCst);
        }
    }
}

fn remote_error_body(status: u16) -> Value {
    json!({"message": "rejected by marketplace", "status": status})
}

#[async_trait]
impl MarketplaceClientTrait for MockMarketplace {
    async fn health_probe(&self, _token: &str) -> bool {
        self.record(false);
        self.behavior.lock().unwrap().healthy
    }

    async fn list_listing_ids(&self, _token: &str) -> Result<Vec<String>> {
        self.record(false);
        let behavior = self.behavior.lock().unwrap();
        if behavior.list_fails {
            return Err(Error::RemoteUnavailable("search returned 500".to_string()));
        }
        Ok(behavior.remote.keys().cloned().collect())
    }

    async fn fetch_listing(&self, _token: &str, listing_id: &str) -> Result<ListingFields> {
        self.record(false);
        let behavior = self.behavior.lock().unwrap();
        if behavior.failing_fetch.as_deref() == Some(listing_id) {
            return Err(Error::RemoteUnavailable(format!(
                "item {listing_id} returned 500"
            )));
        }
        behavior
            .remote
            .get(listing_id)
            .cloned()
            .ok_or_else(|| Error::RemoteUnavailable(format!("item {listing_id} returned 404")))
    }

    async fn create_listing(
        &self,
        _token: &str,
        payload: &ListingFields,
    ) -> Result<CreatedListing> {
        self.record(true);
        let mut behavior = self.behavior.lock().unwrap();
        let status = behavior.write_status;
        if !(200..300).contains(&status) {
            return Err(Error::remote_operation(status, remote_error_body(status)));
        }
        behavior.next_id += 1;
        let id = format!("ML{}", behavior.next_id);
        behavior.remote.insert(id.clone(), payload.clone());
        Ok(CreatedListing {
            id,
            payload: payload.clone(),
        })
    }

    async fn update_listing(
        &self,
        _token: &str,
        listing_id: &str,
        payload: &ListingFields,
    ) -> Result<RemoteResponse> {
        self.record(true);
        let during_update = self.behavior.lock().unwrap().during_update.take();
        if let Some(hook) = during_update {
            hook();
        }
        let mut behavior = self.behavior.lock().unwrap();
        let status = behavior.write_status;
        if !(200..300).contains(&status) {
            return Ok(RemoteResponse::new(status, remote_error_body(status)));
        }
        behavior
            .remote
            .insert(listing_id.to_string(), payload.clone());
        let mut body = payload.clone();
        body.insert("id".to_string(), json!(listing_id));
        Ok(RemoteResponse::new(status, Value::Object(body)))
    }

    async fn delete_listing(&self, _token: &str, listing_id: &str) -> Result<RemoteResponse> {
        self.record(true);
        let mut behavior = self.behavior.lock().unwrap();
        let status = behavior.write_status;
        if !(200..300).contains(&status) {
            return Ok(RemoteResponse::new(status, remote_error_body(status)));
        }
        behavior.remote.remove(listing_id);
        Ok(RemoteResponse::new(status, Value::Null))
    }
}

// --- Mock authorization flow ---
struct MockAuth {
    token: Option<String>,
}

#[async_trait]
impl MarketplaceAuthTrait for MockAuth {
    fn authorization_url(&self, agency_id: &str) -> String {
        format!("https://auth.example.test/authorization?state={agency_id}")
    }

    async fn exchange_code(&self, _code: &str) -> Result<AccessGrant> {
        match &self.token {
            Some(token) => Ok(AccessGrant {
                access_token: token.clone(),
                remote_user_id: Some("7001".to_string()),
            }),
            None => Err(Error::AuthExchangeFailed("invalid_grant".to_string())),
        }
    }
}

// --- Helpers ---
fn fields(value: Value) -> ListingFields {
    value.as_object().cloned().unwrap()
}

struct Harness {
    agencies: Arc<MockAgencyRepository>,
    listings: Arc<MockListingRepository>,
    marketplace: Arc<MockMarketplace>,
    service: ReconciliationService,
}

fn harness_with(
    agencies: MockAgencyRepository,
    marketplace: MockMarketplace,
    exchange_token: Option<&str>,
) -> Harness {
    let agencies = Arc::new(agencies);
    let listings = Arc::new(MockListingRepository::default());
    let marketplace = Arc::new(marketplace);
    let auth = Arc::new(MockAuth {
        token: exchange_token.map(str::to_string),
    });
    let service = ReconciliationService::new(
        agencies.clone(),
        listings.clone(),
        marketplace.clone(),
        auth,
    );
    Harness {
        agencies,
        listings,
        marketplace,
        service,
    }
}

fn linked_harness() -> Harness {
    harness_with(
        MockAgencyRepository::with_linked("A1", "T"),
        MockMarketplace::default(),
        Some("T"),
    )
}

fn seeded_listing() -> Listing {
    Listing::new(
        "99",
        "A1",
        Some("U1".to_string()),
        fields(json!({"title": "House", "price": 150000})),
    )
}

// --- Linkage ---

#[tokio::test]
async fn test_check_linkage_unknown_agency_is_not_found() {
    let h = harness_with(
        MockAgencyRepository::default(),
        MockMarketplace::default(),
        None,
    );

    let result = h.service.check_linkage("A1");
    assert!(matches!(result, Err(Error::AgencyNotFound(id)) if id == "A1"));
    assert_eq!(h.marketplace.calls(), 0);
}

#[tokio::test]
async fn test_check_linkage_reflects_token_presence() {
    let linked = linked_harness();
    assert!(linked.service.check_linkage("A1").unwrap());

    let unlinked = harness_with(
        MockAgencyRepository::with_unlinked("A1"),
        MockMarketplace::default(),
        None,
    );
    assert!(!unlinked.service.check_linkage("A1").unwrap());
    assert_eq!(unlinked.marketplace.calls(), 0);
}

#[tokio::test]
async fn test_link_agency_stores_token_and_imports() {
    let h = harness_with(
        MockAgencyRepository::default(),
        MockMarketplace::with_remote(vec![
            ("1", json!({"id": "1", "title": "Flat"})),
            ("2", json!({"id": "2", "title": "Lot"})),
        ]),
        Some("fresh-token"),
    );

    let outcome = h.service.link_agency("A1", "code-123").await.unwrap();

    assert_eq!(outcome.agency_id, "A1");
    assert_eq!(outcome.imported, 2);
    let agency = h.agencies.get_by_id("A1").unwrap().unwrap();
    assert_eq!(agency.token(), Some("fresh-token"));
    assert_eq!(agency.remote_user_id.as_deref(), Some("7001"));
    assert_eq!(h.listings.snapshot().len(), 2);
}

#[tokio::test]
async fn test_link_agency_exchange_failure_stores_nothing() {
    let h = harness_with(
        MockAgencyRepository::default(),
        MockMarketplace::with_remote(vec![("1", json!({"title": "Flat"}))]),
        None,
    );

    let result = h.service.link_agency("A1", "bad-code").await;

    assert!(matches!(result, Err(Error::AuthExchangeFailed(_))));
    assert!(h.agencies.get_by_id("A1").unwrap().is_none());
    assert_eq!(h.marketplace.calls(), 0);
    assert!(h.listings.snapshot().is_empty());
}

#[tokio::test]
async fn test_link_agency_sync_failure_keeps_linkage_and_partial_state() {
    let marketplace = MockMarketplace::with_remote(vec![
        ("1", json!({"title": "Flat"})),
        ("2", json!({"title": "Lot"})),
    ]);
    marketplace.configure(|b| b.failing_fetch = Some("2".to_string()));
    let h = harness_with(MockAgencyRepository::default(), marketplace, Some("T"));

    let result = h.service.link_agency("A1", "code").await;

    match result {
        Err(Error::SyncFailed { imported, .. }) => assert_eq!(imported, 1),
        other => panic!("expected SyncFailed, got {other:?}"),
    }
    assert!(h.service.check_linkage("A1").unwrap());
    assert!(h.listings.snapshot().contains_key("1"));
    assert!(!h.listings.snapshot().contains_key("2"));
}

#[tokio::test]
async fn test_link_agency_list_failure_reports_sync_failed() {
    let marketplace = MockMarketplace::default();
    marketplace.configure(|b| b.list_fails = true);
    let h = harness_with(MockAgencyRepository::default(), marketplace, Some("T"));

    let result = h.service.link_agency("A1", "code").await;

    assert!(matches!(result, Err(Error::SyncFailed { imported: 0, .. })));
    assert!(h.service.check_linkage("A1").unwrap());
}

#[tokio::test]
async fn test_unlink_unknown_agency_is_not_found() {
    let h = harness_with(
        MockAgencyRepository::default(),
        MockMarketplace::default(),
        None,
    );

    let result = h.service.unlink_agency("A1").await;
    assert!(matches!(result, Err(Error::AgencyNotFound(_))));
}

#[tokio::test]
async fn test_unlink_clears_token_and_keeps_listings() {
    let h = linked_harness();
    h.listings.seed(seeded_listing());

    h.service.unlink_agency("A1").await.unwrap();

    let agency = h.agencies.get_by_id("A1").unwrap().unwrap();
    assert!(!agency.is_linked());
    assert!(!h.service.check_linkage("A1").unwrap());
    assert_eq!(h.service.list_by_agency("A1").unwrap().len(), 1);
}

// --- Bulk import ---

#[tokio::test]
async fn test_bulk_import_mirrors_remote_listing_unclaimed() {
    let h = harness_with(
        MockAgencyRepository::with_linked("A1", "T"),
        MockMarketplace::with_remote(vec![("99", json!({"id": "99", "title": "House"}))]),
        Some("T"),
    );

    let summary = h.service.bulk_import("A1", "T").await.unwrap();

    assert_eq!(summary.imported, 1);
    let mirrored = h.listings.get_by_id("99").unwrap().unwrap();
    assert_eq!(
        serde_json::to_value(&mirrored).unwrap(),
        json!({"id": "99", "agencyId": "A1", "userId": null, "title": "House"})
    );
}

#[tokio::test]
async fn test_bulk_import_is_idempotent() {
    let h = harness_with(
        MockAgencyRepository::with_linked("A1", "T"),
        MockMarketplace::with_remote(vec![
            ("1", json!({"title": "Flat"})),
            ("2", json!({"title": "Lot", "price": 10})),
        ]),
        Some("T"),
    );

    h.service.bulk_import("A1", "T").await.unwrap();
    let once = h.listings.snapshot();
    h.service.bulk_import("A1", "T").await.unwrap();
    let twice = h.listings.snapshot();

    assert_eq!(once, twice);
}

#[tokio::test]
async fn test_bulk_import_overwrites_previous_mirror() {
    let h = harness_with(
        MockAgencyRepository::with_linked("A1", "T"),
        MockMarketplace::with_remote(vec![("99", json!({"title": "Remote title"}))]),
        Some("T"),
    );
    h.listings.seed(Listing::new(
        "99",
        "A1",
        Some("U1".to_string()),
        fields(json!({"title": "Local title", "stale": true})),
    ));

    h.service.bulk_import("A1", "T").await.unwrap();

    let mirrored = h.listings.get_by_id("99").unwrap().unwrap();
    assert_eq!(mirrored.user_id, None);
    assert_eq!(mirrored.fields, fields(json!({"title": "Remote title"})));
}

#[tokio::test]
async fn test_bulk_import_list_failure_imports_nothing() {
    let marketplace = MockMarketplace::with_remote(vec![("1", json!({"title": "Flat"}))]);
    marketplace.configure(|b| b.list_fails = true);
    let h = harness_with(
        MockAgencyRepository::with_linked("A1", "T"),
        marketplace,
        Some("T"),
    );

    let result = h.service.bulk_import("A1", "T").await;

    assert!(matches!(result, Err(Error::RemoteUnavailable(_))));
    assert_eq!(h.listings.writes(), 0);
}

#[tokio::test]
async fn test_bulk_import_stops_at_failing_fetch() {
    let marketplace = MockMarketplace::with_remote(vec![
        ("1", json!({"title": "Flat"})),
        ("2", json!({"title": "Lot"})),
        ("3", json!({"title": "Farm"})),
    ]);
    marketplace.configure(|b| b.failing_fetch = Some("2".to_string()));
    let h = harness_with(
        MockAgencyRepository::with_linked("A1", "T"),
        marketplace,
        Some("T"),
    );

    let result = h.service.bulk_import("A1", "T").await;

    assert!(matches!(result, Err(Error::SyncFailed { imported: 1, .. })));
    let mirror = h.listings.snapshot();
    assert!(mirror.contains_key("1"));
    assert!(!mirror.contains_key("2"));
    assert!(!mirror.contains_key("3"));

    // Retrying once the remote recovers converges on the full set.
    h.marketplace.configure(|b| b.failing_fetch = None);
    let summary = h.service.bulk_import("A1", "T").await.unwrap();
    assert_eq!(summary.imported, 3);
    assert_eq!(h.listings.snapshot().len(), 3);
}

// --- Create ---

#[tokio::test]
async fn test_create_listing_requires_linked_agency() {
    let h = harness_with(
        MockAgencyRepository::with_unlinked("A1"),
        MockMarketplace::default(),
        None,
    );

    let result = h
        .service
        .create_listing("A1", "U1", fields(json!({"title": "Flat"})))
        .await;

    assert!(matches!(result, Err(Error::AgencyNotLinked(_))));
    assert_eq!(h.marketplace.calls(), 0);
    assert_eq!(h.listings.writes(), 0);
}

#[tokio::test]
async fn test_create_listing_unknown_agency_is_not_linked() {
    let h = harness_with(
        MockAgencyRepository::default(),
        MockMarketplace::default(),
        None,
    );

    let result = h
        .service
        .create_listing("ghost", "U1", fields(json!({"title": "Flat"})))
        .await;

    assert!(matches!(result, Err(Error::AgencyNotLinked(_))));
}

#[tokio::test]
async fn test_create_listing_unhealthy_remote_skips_write() {
    let h = linked_harness();
    h.marketplace.configure(|b| b.healthy = false);

    let result = h
        .service
        .create_listing("A1", "U1", fields(json!({"title": "Flat"})))
        .await;

    assert!(matches!(result, Err(Error::RemoteUnavailable(_))));
    assert_eq!(h.marketplace.write_calls(), 0);
    assert_eq!(h.listings.writes(), 0);
}

#[tokio::test]
async fn test_create_listing_remote_failure_leaves_mirror_untouched() {
    let h = linked_harness();
    h.listings.seed(seeded_listing());
    let before = h.listings.snapshot();
    h.marketplace.configure(|b| b.write_status = 400);

    let result = h
        .service
        .create_listing("A1", "U1", fields(json!({"title": "Flat"})))
        .await;

    assert!(matches!(
        result,
        Err(Error::RemoteOperationFailed { status: 400, .. })
    ));
    assert_eq!(h.listings.writes(), 0);
    assert_eq!(h.listings.snapshot(), before);
}

#[tokio::test]
async fn test_create_listing_mirrors_remote_id_and_owners() {
    let h = linked_harness();

    let listing = h
        .service
        .create_listing("A1", "U1", fields(json!({"title": "Flat", "price": 90})))
        .await
        .unwrap();

    assert_eq!(listing.id, "ML1001");
    assert_eq!(listing.agency_id, "A1");
    assert_eq!(listing.user_id.as_deref(), Some("U1"));
    assert_eq!(
        h.listings.get_by_id("ML1001").unwrap(),
        Some(listing.clone())
    );
    assert_eq!(listing.fields, fields(json!({"title": "Flat", "price": 90})));
}

// --- Update ---

#[tokio::test]
async fn test_update_listing_unknown_id_is_not_found() {
    let h = linked_harness();

    let result = h
        .service
        .update_listing("404", fields(json!({"title": "New"})))
        .await;

    assert!(matches!(result, Err(Error::ListingNotFound(_))));
    assert_eq!(h.marketplace.calls(), 0);
}

#[tokio::test]
async fn test_update_listing_replaces_fields_and_keeps_owners() {
    let h = linked_harness();
    h.listings.seed(seeded_listing());

    let body = h
        .service
        .update_listing("99", fields(json!({"title": "New"})))
        .await
        .unwrap();

    assert_eq!(body["title"], json!("New"));
    let mirrored = h.listings.get_by_id("99").unwrap().unwrap();
    assert_eq!(mirrored.fields, fields(json!({"title": "New"})));
    assert!(!mirrored.fields.contains_key("price"));
    assert_eq!(mirrored.agency_id, "A1");
    assert_eq!(mirrored.user_id.as_deref(), Some("U1"));
}

#[tokio::test]
async fn test_update_listing_keeps_user_associated_meanwhile() {
    let h = linked_harness();
    h.listings
        .seed(Listing::imported("99", "A1", fields(json!({"title": "House"}))));
    let listings = h.listings.clone();
    h.marketplace.configure(move |b| {
        b.during_update = Some(Box::new(move || {
            let mut stored = listings.listings.lock().unwrap();
            if let Some(listing) = stored.get_mut("99") {
                listing.user_id = Some("U5".to_string());
            }
        }));
    });

    h.service
        .update_listing("99", fields(json!({"title": "New"})))
        .await
        .unwrap();

    let mirrored = h.listings.get_by_id("99").unwrap().unwrap();
    assert_eq!(mirrored.fields, fields(json!({"title": "New"})));
    assert_eq!(mirrored.user_id.as_deref(), Some("U5"));
}

#[tokio::test]
async fn test_update_listing_remote_failure_surfaces_remote_body() {
    let h = linked_harness();
    h.listings.seed(seeded_listing());
    let before = h.listings.snapshot();
    h.marketplace.configure(|b| b.write_status = 403);

    let result = h
        .service
        .update_listing("99", fields(json!({"title": "New"})))
        .await;

    match result {
        Err(Error::RemoteOperationFailed { status, body }) => {
            assert_eq!(status, 403);
            assert_eq!(body, remote_error_body(403));
        }
        other => panic!("expected RemoteOperationFailed, got {other:?}"),
    }
    assert_eq!(h.listings.snapshot(), before);
}

#[tokio::test]
async fn test_update_listing_of_unlinked_agency_is_rejected() {
    let h = harness_with(
        MockAgencyRepository::with_unlinked("A1"),
        MockMarketplace::default(),
        None,
    );
    h.listings.seed(seeded_listing());

    let result = h
        .service
        .update_listing("99", fields(json!({"title": "New"})))
        .await;

    assert!(matches!(result, Err(Error::AgencyNotLinked(_))));
    assert_eq!(h.marketplace.calls(), 0);
}

// --- Delete ---

#[tokio::test]
async fn test_delete_listing_remote_failure_keeps_mirror() {
    let h = linked_harness();
    h.listings.seed(seeded_listing());
    h.marketplace.configure(|b| b.write_status = 500);

    let result = h.service.delete_listing("99").await;

    assert!(matches!(
        result,
        Err(Error::RemoteOperationFailed { status: 500, .. })
    ));
    assert!(h.listings.get_by_id("99").unwrap().is_some());
}

#[tokio::test]
async fn test_delete_listing_remote_success_removes_mirror() {
    let h = linked_harness();
    h.listings.seed(seeded_listing());

    h.service.delete_listing("99").await.unwrap();

    assert!(h.listings.get_by_id("99").unwrap().is_none());
}

#[tokio::test]
async fn test_delete_listing_unhealthy_remote_keeps_mirror() {
    let h = linked_harness();
    h.listings.seed(seeded_listing());
    h.marketplace.configure(|b| b.healthy = false);

    let result = h.service.delete_listing("99").await;

    assert!(matches!(result, Err(Error::RemoteUnavailable(_))));
    assert_eq!(h.marketplace.write_calls(), 0);
    assert!(h.listings.get_by_id("99").unwrap().is_some());
}

#[tokio::test]
async fn test_delete_listing_unknown_id_is_not_found() {
    let h = linked_harness();

    let result = h.service.delete_listing("404").await;
    assert!(matches!(result, Err(Error::ListingNotFound(_))));
}

// --- Ownership ---

#[tokio::test]
async fn test_associate_user_is_local_only() {
    let h = linked_harness();
    h.listings
        .seed(Listing::imported("99", "A1", fields(json!({"title": "House"}))));

    h.service.associate_user("99", "U7").await.unwrap();

    assert_eq!(h.marketplace.calls(), 0);
    let mirrored = h.listings.get_by_id("99").unwrap().unwrap();
    assert_eq!(mirrored.user_id.as_deref(), Some("U7"));
    assert_eq!(mirrored.agency_id, "A1");
    assert_eq!(mirrored.fields, fields(json!({"title": "House"})));
}

#[tokio::test]
async fn test_associate_user_unknown_listing_is_not_found() {
    let h = linked_harness();

    let result = h.service.associate_user("404", "U7").await;

    assert!(matches!(result, Err(Error::ListingNotFound(_))));
    assert_eq!(h.marketplace.calls(), 0);
}

#[tokio::test]
async fn test_agency_id_is_stable_across_mutations() {
    let h = linked_harness();
    h.listings.seed(seeded_listing());
    h.listings
        .seed(Listing::imported("100", "A1", fields(json!({"title": "Lot"}))));

    h.service.associate_user("99", "U2").await.unwrap();
    h.service
        .update_listing("99", fields(json!({"title": "New", "agencyId": "B2"})))
        .await
        .unwrap();
    h.marketplace.configure(|b| b.write_status = 500);
    let _ = h.service.delete_listing("99").await;
    let _ = h
        .service
        .update_listing("100", fields(json!({"title": "Nope"})))
        .await;

    for listing in h.listings.snapshot().values() {
        assert_eq!(listing.agency_id, "A1");
    }
}

// --- Queries ---

#[tokio::test]
async fn test_list_by_agency_and_user_return_envelopes() {
    let h = linked_harness();
    h.listings.seed(seeded_listing());
    h.listings
        .seed(Listing::imported("100", "A1", fields(json!({"title": "Lot"}))));
    h.listings.seed(Listing::new(
        "200",
        "B2",
        Some("U1".to_string()),
        fields(json!({"title": "Farm"})),
    ));

    let by_agency = h.service.list_by_agency("A1").unwrap();
    let ids: Vec<&str> = by_agency.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec!["100", "99"]);

    let by_user = h.service.list_by_user("U1").unwrap();
    let envelopes: Vec<Value> = by_user
        .iter()
        .map(|l| serde_json::to_value(l).unwrap())
        .collect();
    assert_eq!(
        envelopes,
        vec![
            json!({"id": "200", "agencyId": "B2", "userId": "U1", "title": "Farm"}),
            json!({"id": "99", "agencyId": "A1", "userId": "U1", "title": "House", "price": 150000}),
        ]
    );

    assert!(h.service.list_by_user("nobody").unwrap().is_empty());
}

#[tokio::test]
async fn test_authorization_url_delegates_to_auth_flow() {
    let h = linked_harness();
    assert_eq!(
        h.service.authorization_url("A1"),
        "https://auth.example.test/authorization?state=A1"
    );
}
