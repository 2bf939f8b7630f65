use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use propsync_core::listings::Listing;
use serde_json::Value;

use crate::{
    error::ApiResult,
    main_lib::AppState,
    models::{listing_fields, LinkageResponse, MessageResponse},
};

async fn unlink_agency(
    Path(agency_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .reconciliation_service
        .unlink_agency(&agency_id)
        .await?;
    Ok(Json(MessageResponse::new(
        "Agency unlinked from the marketplace",
    )))
}

async fn check_linkage(
    Path(agency_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<LinkageResponse>> {
    let linked = state.reconciliation_service.check_linkage(&agency_id)?;
    let message = if linked {
        "Agency is linked to the marketplace"
    } else {
        "Agency is not linked to the marketplace"
    };
    Ok(Json(LinkageResponse {
        linked,
        message: message.to_string(),
    }))
}

async fn create_listing(
    Path((agency_id, user_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> ApiResult<(StatusCode, Json<Listing>)> {
    let fields = listing_fields(payload)?;
    let listing = state
        .reconciliation_service
        .create_listing(&agency_id, &user_id, fields)
        .await?;
    Ok((StatusCode::CREATED, Json(listing)))
}

async fn list_agency_listings(
    Path(agency_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Listing>>> {
    let listings = state.reconciliation_service.list_by_agency(&agency_id)?;
    Ok(Json(listings))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/agencies/{agency_id}/unlink", post(unlink_agency))
        .route("/agencies/{agency_id}/linkage", get(check_linkage))
        .route(
            "/agencies/{agency_id}/users/{user_id}/listings",
            post(create_listing),
        )
        .route("/agencies/{agency_id}/listings", get(list_agency_listings))
}
