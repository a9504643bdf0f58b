//! Service configuration loaded via OrthoConfig.
//!
//! Values merge CLI flags, `COMMERCE_SYNC_*` environment variables and an
//! optional config file once at startup. Components receive what they need
//! from here at construction time and never read the environment again.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::WebhookSecret;
use crate::domain::bulk_import::DEFAULT_PER_PAGE;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Invalid or incomplete configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("bind address `{value}` is not a socket address")]
    InvalidBindAddr { value: String },
    #[error("commerce base URL `{value}` is invalid: {message}")]
    InvalidBaseUrl { value: String, message: String },
    #[error("commerce base URL, consumer key and consumer secret must be set together")]
    IncompleteCommerceCredentials,
}

/// Connection details for the commerce platform REST API.
pub struct CommerceConnection {
    pub base_url: Url,
    pub consumer_key: String,
    pub consumer_secret: String,
    pub timeout: Duration,
}

/// Runtime settings for the sync service and the import CLI.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "COMMERCE_SYNC")]
pub struct SyncSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; records stay in memory when absent.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Shared secret for webhook signatures; every webhook is rejected when unset.
    pub webhook_secret: Option<String>,
    /// Store root, for example `https://shop.example`.
    pub commerce_base_url: Option<String>,
    /// REST API consumer key.
    pub commerce_consumer_key: Option<String>,
    /// REST API consumer secret.
    pub commerce_consumer_secret: Option<String>,
    /// Outbound request timeout in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Page size used by imports that do not pick one.
    pub import_per_page: Option<u32>,
}

impl std::fmt::Debug for SyncSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redacted = |value: &Option<String>| value.as_ref().map(|_| "<redacted>");
        f.debug_struct("SyncSettings")
            .field("bind_addr", &self.bind_addr)
            .field("database_url", &redacted(&self.database_url))
            .field("pool_max_size", &self.pool_max_size)
            .field("webhook_secret", &redacted(&self.webhook_secret))
            .field("commerce_base_url", &self.commerce_base_url)
            .field("commerce_consumer_key", &self.commerce_consumer_key)
            .field(
                "commerce_consumer_secret",
                &redacted(&self.commerce_consumer_secret),
            )
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("import_per_page", &self.import_per_page)
            .finish()
    }
}

impl SyncSettings {
    /// Parsed bind address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|_| SettingsError::InvalidBindAddr {
            value: raw.to_owned(),
        })
    }

    /// Database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    /// Webhook secret, or `None` when unset or blank.
    pub fn webhook_secret(&self) -> Option<WebhookSecret> {
        self.webhook_secret.clone().and_then(WebhookSecret::new)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    pub fn import_per_page(&self) -> u32 {
        self.import_per_page.unwrap_or(DEFAULT_PER_PAGE)
    }

    /// Commerce platform connection, or `None` when nothing is configured.
    ///
    /// # Errors
    ///
    /// Fails when only some of the connection values are set or the base
    /// URL does not parse.
    pub fn commerce_connection(&self) -> Result<Option<CommerceConnection>, SettingsError> {
        let present = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_owned)
        };
        match (
            present(&self.commerce_base_url),
            present(&self.commerce_consumer_key),
            present(&self.commerce_consumer_secret),
        ) {
            (None, None, None) => Ok(None),
            (Some(base_url), Some(consumer_key), Some(consumer_secret)) => {
                let base_url =
                    Url::parse(&base_url).map_err(|err| SettingsError::InvalidBaseUrl {
                        value: base_url.clone(),
                        message: err.to_string(),
                    })?;
                Ok(Some(CommerceConnection {
                    base_url,
                    consumer_key,
                    consumer_secret,
                    timeout: self.request_timeout(),
                }))
            }
            _ => Err(SettingsError::IncompleteCommerceCredentials),
        }
    }
}
