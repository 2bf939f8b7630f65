//! Authorization-code flow with the marketplace.

use async_trait::async_trait;
use log::{debug, warn};
use serde_json::Value;

use propsync_core::agencies::AccessGrant;
use propsync_core::errors::{Error, Result};
use propsync_core::marketplace::MarketplaceAuthTrait;

use crate::config::MarketplaceConfig;

#[derive(Debug, serde::Deserialize)]
struct ApiTokenResponse {
    access_token: String,
    #[serde(default)]
    user_id: Option<Value>,
}

/// Builds authorization links and trades authorization codes for tokens.
#[derive(Debug, Clone)]
pub struct MarketplaceAuthClient {
    client: reqwest::Client,
    config: MarketplaceConfig,
}

impl MarketplaceAuthClient {
    pub fn new(config: MarketplaceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Unexpected(format!("Failed to initialize HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl MarketplaceAuthTrait for MarketplaceAuthClient {
    fn authorization_url(&self, agency_id: &str) -> String {
        format!(
            "{}/authorization?response_type=code&client_id={}&redirect_uri={}&state={}",
            self.config.auth_url.trim_end_matches('/'),
            urlencoding::encode(&self.config.app_id),
            urlencoding::encode(&self.config.redirect_uri),
            urlencoding::encode(agency_id),
        )
    }

    async fn exchange_code(&self, code: &str) -> Result<AccessGrant> {
        let url = format!("{}/oauth/token", self.config.api_url.trim_end_matches('/'));
        debug!("[Marketplace] Exchanging authorization code at {}", url);

        let params = [
            ("grant_type", "authorization_code"),
            ("client_id", self.config.app_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];

        let response = self
            .client
            .post(&url)
            .form(&params)
            .send()
            .await
            .map_err(|e| Error::AuthExchangeFailed(format!("Token request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::AuthExchangeFailed(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            warn!("[Marketplace] Token exchange answered HTTP {}", status);
            return Err(Error::AuthExchangeFailed(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let token: ApiTokenResponse = serde_json::from_str(&body).map_err(|e| {
            Error::AuthExchangeFailed(format!("Failed to parse token response: {}", e))
        })?;

        let remote_user_id = match token.user_id {
            Some(Value::String(s)) => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };

        Ok(AccessGrant {
            access_token: token.access_token,
            remote_user_id,
        })
    }
}
