//! HTTP client for the marketplace listing API.
//!
//! Every request carries the bearer token of the agency it acts for. The
//! client holds no per-agency state, so one instance serves all agencies.

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Method, StatusCode};
use serde_json::Value;

use propsync_core::errors::{Error, Result};
use propsync_core::listings::ListingFields;
use propsync_core::marketplace::{CreatedListing, MarketplaceClientTrait, RemoteResponse};

use crate::config::MarketplaceConfig;

#[derive(Debug, serde::Deserialize)]
struct ApiSearchResponse {
    #[serde(default)]
    results: Vec<Value>,
}

/// Marketplace ids come back as strings, but older endpoints use numbers.
fn id_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// HTTP client for the marketplace listing API.
///
/// # Example
///
/// ```ignore
/// let client = MarketplaceApiClient::new(&config)?;
/// let ids = client.list_listing_ids(&token).await?;
/// ```
#[derive(Debug, Clone)]
pub struct MarketplaceApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl MarketplaceApiClient {
    /// Create a new client for the API at `config.api_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &MarketplaceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Unexpected(format!("Failed to initialize HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    fn item_path(listing_id: &str) -> String {
        format!("/items/{}", urlencoding::encode(listing_id))
    }

    /// Sends one request and decodes whatever came back.
    ///
    /// Transport failures become `RemoteUnavailable`; any HTTP status is a
    /// successful exchange and is left for the caller to judge.
    async fn send(
        &self,
        method: Method,
        path: &str,
        token: &str,
        payload: Option<&ListingFields>,
    ) -> Result<RemoteResponse> {
        let url = format!("{}{}", self.base_url, path);
        debug!("[Marketplace] {} {}", method, url);

        let auth_header = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| Error::Unexpected(format!("Invalid access token format: {}", e)))?;

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(AUTHORIZATION, auth_header);
        if let Some(payload) = payload {
            request = request.json(payload);
        }

        let response = request.send().await.map_err(|e| {
            warn!("[Marketplace] {} {} failed: {}", method, url, e);
            Error::RemoteUnavailable(format!("Request failed: {}", e))
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::RemoteUnavailable(format!("Failed to read response: {}", e)))?;

        Ok(RemoteResponse::new(status.as_u16(), decode_body(&text)))
    }
}

/// JSON bodies are decoded; anything else is kept as a JSON string.
fn decode_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

#[async_trait]
impl MarketplaceClientTrait for MarketplaceApiClient {
    async fn health_probe(&self, token: &str) -> bool {
        match self.send(Method::GET, "/sites", token, None).await {
            Ok(response) => response.status == StatusCode::OK.as_u16(),
            Err(e) => {
                debug!("[Marketplace] Health probe failed: {}", e);
                false
            }
        }
    }

    async fn list_listing_ids(&self, token: &str) -> Result<Vec<String>> {
        let response = self
            .send(Method::GET, "/users/me/items/search", token, None)
            .await?;
        if !response.is_success() {
            return Err(Error::RemoteUnavailable(format!(
                "Listing search answered HTTP {}",
                response.status
            )));
        }

        let search: ApiSearchResponse = serde_json::from_value(response.body).map_err(|e| {
            Error::RemoteUnavailable(format!("Failed to parse listing search: {}", e))
        })?;

        search
            .results
            .iter()
            .map(|value| {
                id_to_string(value).ok_or_else(|| {
                    Error::RemoteUnavailable(format!("Unexpected listing id in search: {}", value))
                })
            })
            .collect()
    }

    async fn fetch_listing(&self, token: &str, listing_id: &str) -> Result<ListingFields> {
        let response = self
            .send(Method::GET, &Self::item_path(listing_id), token, None)
            .await?;
        if !response.is_success() {
            return Err(Error::RemoteUnavailable(format!(
                "Fetching listing {} answered HTTP {}",
                listing_id, response.status
            )));
        }

        match response.body {
            Value::Object(fields) => Ok(fields),
            other => Err(Error::RemoteUnavailable(format!(
                "Listing {} is not a JSON object: {}",
                listing_id, other
            ))),
        }
    }

    async fn create_listing(&self, token: &str, payload: &ListingFields) -> Result<CreatedListing> {
        let response = self
            .send(Method::POST, "/items", token, Some(payload))
            .await?
            .into_result()?;

        let id = response.body.get("id").and_then(id_to_string);
        match (id, response.body) {
            (Some(id), Value::Object(fields)) => Ok(CreatedListing {
                id,
                payload: fields,
            }),
            (_, body) => Err(Error::remote_operation(response.status, body)),
        }
    }

    async fn update_listing(
        &self,
        token: &str,
        listing_id: &str,
        payload: &ListingFields,
    ) -> Result<RemoteResponse> {
        self.send(Method::PUT, &Self::item_path(listing_id), token, Some(payload))
            .await
    }

    async fn delete_listing(&self, token: &str, listing_id: &str) -> Result<RemoteResponse> {
        self.send(Method::DELETE, &Self::item_path(listing_id), token, None)
            .await
    }
}
