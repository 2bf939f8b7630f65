use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use propsync_core::errors::Error as CoreError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    BadRequest(String),
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            ApiError::Core(e) => match e {
                // The marketplace's own answer goes back untouched, but a
                // failure is never reported with a success status.
                CoreError::RemoteOperationFailed { status, body } => {
                    let status = StatusCode::from_u16(status)
                        .ok()
                        .filter(|s| s.is_client_error() || s.is_server_error())
                        .unwrap_or(StatusCode::BAD_GATEWAY);
                    return (status, Json(body)).into_response();
                }
                CoreError::AgencyNotFound(_) | CoreError::ListingNotFound(_) => {
                    (StatusCode::NOT_FOUND, e.to_string())
                }
                CoreError::AgencyNotLinked(_) | CoreError::Validation(_) => {
                    (StatusCode::BAD_REQUEST, e.to_string())
                }
                CoreError::RemoteUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, e.to_string()),
                CoreError::AuthExchangeFailed(_) | CoreError::SyncFailed { .. } => {
                    (StatusCode::BAD_GATEWAY, e.to_string())
                }
                CoreError::Database(_) | CoreError::Unexpected(_) => {
                    tracing::error!("Request failed: {}", e);
                    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
                }
            },
            ApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason),
        };
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: msg,
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
