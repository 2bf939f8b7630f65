use std::{net::SocketAddr, time::Duration};

use anyhow::{anyhow, Context};
use propsync_connect::{MarketplaceConfig, DEFAULT_API_URL, DEFAULT_AUTH_URL, DEFAULT_TIMEOUT};

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub dashboard_uri: String,
    pub marketplace: MarketplaceConfig,
}

fn required(name: &str) -> anyhow::Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(anyhow!("Missing required environment variable {}", name)),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("PROPSYNC_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:5000".to_string())
            .parse()
            .context("Invalid PROPSYNC_LISTEN_ADDR")?;
        let db_path =
            std::env::var("PROPSYNC_DB_PATH").unwrap_or_else(|_| "./db/propsync.db".into());
        let cors_allow = std::env::var("PROPSYNC_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("PROPSYNC_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);

        let marketplace = MarketplaceConfig {
            api_url: std::env::var("MARKETPLACE_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.into()),
            auth_url: std::env::var("MARKETPLACE_AUTH_URL")
                .unwrap_or_else(|_| DEFAULT_AUTH_URL.into()),
            app_id: required("MARKETPLACE_APP_ID")?,
            client_secret: required("MARKETPLACE_CLIENT_SECRET")?,
            redirect_uri: required("MARKETPLACE_REDIRECT_URI")?,
            timeout: DEFAULT_TIMEOUT,
        };

        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            dashboard_uri: required("DASHBOARD_URI")?,
            marketplace,
        })
    }
}
