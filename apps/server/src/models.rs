//! Request and response bodies of the HTTP surface.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use propsync_core::listings::ListingFields;

use crate::error::ApiError;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    pub auth_url: String,
}

#[derive(Serialize)]
pub struct LinkageResponse {
    pub linked: bool,
    pub message: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Query string the marketplace appends when it sends the user back.
#[derive(Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
}

/// Listing payloads are free-form, but must be JSON objects.
pub fn listing_fields(payload: Value) -> Result<ListingFields, ApiError> {
    match payload {
        Value::Object(fields) => Ok(fields),
        _ => Err(ApiError::BadRequest(
            "Listing payload must be a JSON object".to_string(),
        )),
    }
}
