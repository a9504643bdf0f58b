//! Reqwest-backed WooCommerce source adapter.
//!
//! Owns transport details only: URL construction, basic-auth credentials,
//! timeout and HTTP error mapping, and decoding list bodies into raw records.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::CommerceEntity;
use crate::domain::ports::{CommerceSource, CommerceSourceError};

const ORDERS_PATH: &str = "wp-json/wc/v3/orders";
const BOOKINGS_PATH: &str = "wp-json/wc-bookings/v1/bookings";
const USER_AGENT: &str = concat!("commerce-sync/", env!("CARGO_PKG_VERSION"));

/// REST API consumer credentials sent as HTTP basic auth.
pub struct CommerceCredentials {
    pub consumer_key: String,
    pub consumer_secret: Zeroizing<String>,
}

impl CommerceCredentials {
    pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: Zeroizing::new(consumer_secret.into()),
        }
    }
}

/// Commerce source performing GET requests against one store.
pub struct WooCommerceHttpSource {
    client: Client,
    base_url: Url,
    credentials: CommerceCredentials,
}

impl WooCommerceHttpSource {
    /// Build an adapter whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        credentials: CommerceCredentials,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: with_trailing_slash(base_url),
            credentials,
        })
    }

    fn collection_url(&self, entity: CommerceEntity) -> Result<Url, CommerceSourceError> {
        let path = match entity {
            CommerceEntity::Order => ORDERS_PATH,
            CommerceEntity::Booking => BOOKINGS_PATH,
        };
        self.base_url
            .join(path)
            .map_err(|err| CommerceSourceError::transport(format!("invalid store URL: {err}")))
    }

    fn page_url(
        &self,
        entity: CommerceEntity,
        page: u32,
        per_page: u32,
    ) -> Result<Url, CommerceSourceError> {
        let mut url = self.collection_url(entity)?;
        url.query_pairs_mut()
            .append_pair("per_page", &per_page.to_string())
            .append_pair("page", &page.to_string())
            .append_pair("orderby", "date")
            .append_pair("order", "desc");
        Ok(url)
    }

    fn record_url(
        &self,
        entity: CommerceEntity,
        external_id: i64,
    ) -> Result<Url, CommerceSourceError> {
        let mut url = self.collection_url(entity)?;
        url.path_segments_mut()
            .map_err(|()| CommerceSourceError::transport("store URL cannot be a base"))?
            .push(&external_id.to_string());
        Ok(url)
    }

    async fn get(&self, url: Url) -> Result<(StatusCode, Vec<u8>), CommerceSourceError> {
        debug!(%url, "commerce platform request");
        let response = self
            .client
            .get(url)
            .basic_auth(
                &self.credentials.consumer_key,
                Some(self.credentials.consumer_secret.as_str()),
            )
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        Ok((status, body.to_vec()))
    }
}

#[async_trait]
impl CommerceSource for WooCommerceHttpSource {
    async fn fetch_page(
        &self,
        entity: CommerceEntity,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Value>, CommerceSourceError> {
        let (status, body) = self.get(self.page_url(entity, page, per_page)?).await?;
        if !status.is_success() {
            return Err(map_status_error(status, &body));
        }
        parse_page(&body)
    }

    async fn fetch_record(
        &self,
        entity: CommerceEntity,
        external_id: i64,
    ) -> Result<Option<Value>, CommerceSourceError> {
        let (status, body) = self.get(self.record_url(entity, external_id)?).await?;
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(map_status_error(status, &body));
        }
        parse_record(&body).map(Some)
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn parse_page(body: &[u8]) -> Result<Vec<Value>, CommerceSourceError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Array(records)) => Ok(records),
        Ok(_) => Err(CommerceSourceError::decode(format!(
            "expected a JSON array of records, got: {}",
            body_preview(body)
        ))),
        Err(err) => Err(CommerceSourceError::decode(format!(
            "invalid JSON list payload: {err}"
        ))),
    }
}

fn parse_record(body: &[u8]) -> Result<Value, CommerceSourceError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(record @ Value::Object(_)) => Ok(record),
        Ok(_) => Err(CommerceSourceError::decode(format!(
            "expected a JSON object, got: {}",
            body_preview(body)
        ))),
        Err(err) => Err(CommerceSourceError::decode(format!(
            "invalid JSON record payload: {err}"
        ))),
    }
}

fn map_transport_error(error: reqwest::Error) -> CommerceSourceError {
    if error.is_timeout() {
        CommerceSourceError::timeout(error.to_string())
    } else {
        CommerceSourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> CommerceSourceError {
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            CommerceSourceError::timeout(format!("status {}", status.as_u16()))
        }
        _ => CommerceSourceError::status(status.as_u16(), body_preview(body)),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        let preview: String = compact.chars().take(PREVIEW_CHAR_LIMIT).collect();
        format!("{preview}...")
    } else {
        compact
    }
}
