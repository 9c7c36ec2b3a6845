//! Client composition for the BigBoat dashboard.
//!
//! Turns a [`ClientConfig`] into a ready [`dashboard::Client`]: builds the
//! HTTP transport, selects the protocol driver for the configured API
//! generation, and checks the settings each generation needs.
//!
//! ```no_run
//! # async fn demo() -> Result<(), dashboard::DashboardError> {
//! let config = client::ClientConfig::from_env()?;
//! let dashboard = client::connect(&config)?;
//! for app in dashboard.apps().await? {
//!     println!("{} {}", app.name(), app.version());
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use api_v1::VersionOneDriver;
use api_v2::VersionTwoDriver;
use dashboard::{ApiKey, ApiVersion, BaseUrl, Client, DashboardError, DashboardResult, Driver, Transport};
use serde::Deserialize;
use tracing::debug;
use transport::ReqwestTransport;

pub const ENV_URL: &str = "BIGBOAT_URL";
pub const ENV_API_VERSION: &str = "BIGBOAT_API_VERSION";
pub const ENV_API_KEY: &str = "BIGBOAT_API_KEY";
pub const ENV_TIMEOUT_SECS: &str = "BIGBOAT_TIMEOUT_SECS";

/// Settings needed to reach one dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    /// Dashboard root URL; a trailing `/` is optional.
    pub url: String,

    /// API generation (default: v2).
    #[serde(default = "default_api_version")]
    pub api_version: ApiVersion,

    /// API key; required for v2, ignored by v1.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Per-request timeout in seconds (default: 30).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_version() -> ApiVersion {
    ApiVersion::V2
}

fn default_timeout_secs() -> u64 {
    transport::DEFAULT_TIMEOUT.as_secs()
}

impl ClientConfig {
    /// Configuration for `url` with the default generation and timeout.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_version: default_api_version(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Selects the API generation.
    pub fn with_api_version(mut self, api_version: ApiVersion) -> Self {
        self.api_version = api_version;
        self
    }

    /// Sets the API key sent by the v2 driver.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the per-request timeout in seconds.
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Reads the `BIGBOAT_*` environment variables.
    ///
    /// # Errors
    ///
    /// [`DashboardError::Configuration`] when `BIGBOAT_URL` is unset or a
    /// value cannot be parsed.
    pub fn from_env() -> DashboardResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> DashboardResult<Self> {
        let url = lookup(ENV_URL).ok_or_else(|| configuration(format!("{ENV_URL} is not set")))?;
        let mut config = Self::new(url);

        if let Some(raw) = lookup(ENV_API_VERSION) {
            config.api_version = raw
                .parse()
                .map_err(|e| configuration(format!("{ENV_API_VERSION}: {e}")))?;
        }
        config.api_key = lookup(ENV_API_KEY);
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            config.timeout_secs = raw
                .trim()
                .parse()
                .map_err(|e| configuration(format!("{ENV_TIMEOUT_SECS}: {e}")))?;
        }
        Ok(config)
    }

    /// Per-request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn configuration(message: impl Into<String>) -> DashboardError {
    DashboardError::Configuration {
        message: message.into(),
    }
}

/// Builds a client over HTTP for `config`.
///
/// # Errors
///
/// [`DashboardError::Configuration`] when the URL is blank, when v2 is
/// selected without an API key, or when the HTTP client cannot be built.
pub fn connect(config: &ClientConfig) -> DashboardResult<Client> {
    let transport = ReqwestTransport::new(config.timeout())?;
    connect_with(config, Arc::new(transport))
}

/// Builds a client for `config` over the given transport.
pub fn connect_with(config: &ClientConfig, transport: Arc<dyn Transport>) -> DashboardResult<Client> {
    let base_url = BaseUrl::new(config.url.as_str())
        .ok_or_else(|| configuration("dashboard URL must not be empty"))?;

    let driver: Arc<dyn Driver> = match config.api_version {
        ApiVersion::V1 => Arc::new(VersionOneDriver::new(base_url.clone(), transport)),
        ApiVersion::V2 => {
            let api_key = config
                .api_key
                .as_deref()
                .and_then(ApiKey::new)
                .ok_or_else(|| configuration("the v2 API requires an API key"))?;
            Arc::new(VersionTwoDriver::new(base_url.clone(), api_key, transport))
        }
    };

    debug!(url = %base_url, api = %config.api_version, "dashboard client ready");
    Ok(Client::new(base_url, driver))
}
