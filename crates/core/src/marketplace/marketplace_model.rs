//! Marketplace response models.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::Error;
use crate::listings::ListingFields;

/// Raw outcome of a remote write: the HTTP status and the decoded body.
///
/// Bodies that are not JSON are carried as a JSON string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RemoteResponse {
    pub status: u16,
    pub body: Value,
}

impl RemoteResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turns a non-success response into `RemoteOperationFailed`.
    pub fn into_result(self) -> Result<Self, Error> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::remote_operation(self.status, self.body))
        }
    }
}

/// A listing accepted by the marketplace, with the id it assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedListing {
    pub id: String,
    /// The record as the marketplace echoed it back.
    pub payload: ListingFields,
}
