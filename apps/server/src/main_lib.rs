use std::sync::Arc;

use crate::config::Config;
use propsync_connect::{MarketplaceApiClient, MarketplaceAuthClient};
use propsync_core::reconciliation::{ReconciliationService, ReconciliationServiceTrait};
use propsync_storage_sqlite::{
    agencies::AgencyRepository,
    db::{self, spawn_writer},
    listings::ListingRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub reconciliation_service: Arc<dyn ReconciliationServiceTrait>,
    pub dashboard_uri: String,
}

pub fn init_tracing() {
    let log_format = std::env::var("PROPSYNC_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = spawn_writer((*pool).clone());

    let agency_repository = Arc::new(AgencyRepository::new(pool.clone(), writer.clone()));
    let listing_repository = Arc::new(ListingRepository::new(pool.clone(), writer));

    let marketplace = Arc::new(MarketplaceApiClient::new(&config.marketplace)?);
    let auth = Arc::new(MarketplaceAuthClient::new(config.marketplace.clone())?);
    tracing::info!("Marketplace API at {}", config.marketplace.api_url);

    let reconciliation_service = Arc::new(ReconciliationService::new(
        agency_repository,
        listing_repository,
        marketplace,
        auth,
    ));

    Ok(Arc::new(AppState {
        reconciliation_service,
        dashboard_uri: config.dashboard_uri.clone(),
    }))
}
