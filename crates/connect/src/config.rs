//! Marketplace connection settings.

use std::time::Duration;

/// Default base URL of the marketplace REST API.
pub const DEFAULT_API_URL: &str = "https://api.mercadolibre.com";

/// Default base URL of the marketplace authorization pages.
pub const DEFAULT_AUTH_URL: &str = "https://auth.mercadolibre.com";

/// Default timeout for API requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything the clients need to reach the marketplace on behalf of this
/// application. Built by the binary from its environment.
#[derive(Debug, Clone)]
pub struct MarketplaceConfig {
    pub api_url: String,
    pub auth_url: String,
    pub app_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub timeout: Duration,
}

impl MarketplaceConfig {
    /// Config against the public marketplace endpoints.
    pub fn new(
        app_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            app_id: app_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Points both API and authorization pages at `base_url`.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.api_url = base_url.to_string();
        self.auth_url = base_url.to_string();
        self
    }
}
