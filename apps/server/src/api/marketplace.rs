//! Link flow: authorization link and the marketplace callback.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::Redirect,
    routing::get,
    Json, Router,
};
use propsync_core::errors::Error as CoreError;
use tracing::{info, warn};

use crate::{
    error::ApiResult,
    main_lib::AppState,
    models::{CallbackQuery, LinkResponse},
};

async fn begin_link(
    Path(agency_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<LinkResponse>> {
    let auth_url = state.reconciliation_service.authorization_url(&agency_id);
    Ok(Json(LinkResponse { auth_url }))
}

fn dashboard_redirect(dashboard_uri: &str, status: &str, message: &str) -> Redirect {
    let separator = if dashboard_uri.contains('?') { '&' } else { '?' };
    Redirect::to(&format!(
        "{}{}status={}&message={}",
        dashboard_uri,
        separator,
        status,
        urlencoding::encode(message)
    ))
}

/// The marketplace sends the user back here with `code` and `state`; the
/// agency id travels in `state`. Every outcome ends on the dashboard.
async fn complete_link(
    Query(query): Query<CallbackQuery>,
    State(state): State<Arc<AppState>>,
) -> Redirect {
    let (code, agency_id) = match (query.code, query.state) {
        (Some(code), Some(agency_id)) if !code.is_empty() && !agency_id.is_empty() => {
            (code, agency_id)
        }
        _ => return dashboard_redirect(&state.dashboard_uri, "error", "Missing code or state"),
    };

    match state
        .reconciliation_service
        .link_agency(&agency_id, &code)
        .await
    {
        Ok(outcome) => {
            info!(
                "Agency {} linked, {} listings imported",
                outcome.agency_id, outcome.imported
            );
            dashboard_redirect(
                &state.dashboard_uri,
                "success",
                "Authenticated and synchronized successfully",
            )
        }
        Err(CoreError::AuthExchangeFailed(reason)) => {
            warn!("Token exchange failed for agency {}: {}", agency_id, reason);
            dashboard_redirect(
                &state.dashboard_uri,
                "error",
                "Failed to obtain access token",
            )
        }
        Err(CoreError::SyncFailed { reason, .. }) => dashboard_redirect(
            &state.dashboard_uri,
            "error",
            &format!("Synchronization failed: {}", reason),
        ),
        Err(e) => {
            warn!("Linking agency {} failed: {}", agency_id, e);
            dashboard_redirect(&state.dashboard_uri, "error", &e.to_string())
        }
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/marketplace/{agency_id}/link", get(begin_link))
}

/// The callback route alone; it must stay outside the request timeout.
pub fn callback_router() -> Router<Arc<AppState>> {
    Router::new().route("/marketplace/callback", get(complete_link))
}
