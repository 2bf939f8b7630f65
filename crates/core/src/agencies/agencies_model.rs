//! Agency domain models.

use serde::{Deserialize, Serialize};

/// A tenant organization that owns listings and may hold a marketplace credential.
///
/// The record outlives its credential: unlinking clears `access_token` and
/// `remote_user_id` but keeps the agency itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Agency {
    pub id: String,
    #[serde(skip_serializing, default)]
    pub access_token: Option<String>,
    /// Account id of the agency on the marketplace side.
    pub remote_user_id: Option<String>,
}

impl Agency {
    /// An agency is linked while it holds an access token.
    pub fn is_linked(&self) -> bool {
        self.access_token.is_some()
    }

    /// Returns the access token of a linked agency.
    pub fn token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }
}

/// Credential issued by the marketplace for an authorization code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccessGrant {
    pub access_token: String,
    pub remote_user_id: Option<String>,
}

impl AccessGrant {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            remote_user_id: None,
        }
    }
}
