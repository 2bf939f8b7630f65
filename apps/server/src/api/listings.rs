use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use propsync_core::listings::Listing;
use serde_json::Value;

use crate::{
    error::ApiResult,
    main_lib::AppState,
    models::{listing_fields, MessageResponse},
};

async fn update_listing(
    Path(listing_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> ApiResult<Json<Value>> {
    let fields = listing_fields(payload)?;
    let remote = state
        .reconciliation_service
        .update_listing(&listing_id, fields)
        .await?;
    Ok(Json(remote))
}

async fn delete_listing(
    Path(listing_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .reconciliation_service
        .delete_listing(&listing_id)
        .await?;
    Ok(Json(MessageResponse::new("Listing deleted")))
}

async fn associate_user(
    Path((listing_id, user_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .reconciliation_service
        .associate_user(&listing_id, &user_id)
        .await?;
    Ok(Json(MessageResponse::new(format!(
        "Listing associated with user {}",
        user_id
    ))))
}

async fn list_user_listings(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Listing>>> {
    let listings = state.reconciliation_service.list_by_user(&user_id)?;
    Ok(Json(listings))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/listings/{id}", put(update_listing).delete(delete_listing))
        .route("/listings/{id}/user/{user_id}", put(associate_user))
        .route("/users/{user_id}/listings", get(list_user_listings))
}
