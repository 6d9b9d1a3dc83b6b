use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use url::Url;

use crate::config::Config;
use crate::logging::{debug, info, obj, v_num, v_str, warn, Domain};
use crate::records::{CorrelationRecord, RatingRecord};
use crate::retry::{
    is_retryable_http_error, is_retryable_network_error, retry_async, RetryConfig,
};

pub const RATING_PATH: &str = "api/rating";
pub const CORRELATION_PATH: &str = "api/corel";
/// State boundaries served next to the API, keyed by two-letter `id`.
pub const GEOJSON_ROUTE: &str = "brazil_geo.json";

/// Reachability of the analytics API as shown in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiStatus {
    Connected,
    Issue,
    Offline,
}

impl ApiStatus {
    pub fn from_http(status: u16) -> Self {
        if (200..300).contains(&status) {
            ApiStatus::Connected
        } else {
            ApiStatus::Issue
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ApiStatus::Connected => "● API Connected",
            ApiStatus::Issue => "○ API Issue",
            ApiStatus::Offline => "○ API Offline",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            ApiStatus::Connected => "green",
            ApiStatus::Issue => "orange",
            ApiStatus::Offline => "red",
        }
    }
}

/// Non-2xx response from a data endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpStatusError {
    pub url: String,
    pub status: u16,
}

impl fmt::Display for HttpStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} returned HTTP {}", self.url, self.status)
    }
}

impl std::error::Error for HttpStatusError {}

/// Retry transport failures and transient HTTP statuses; give up on the rest.
pub fn is_retryable(err: &anyhow::Error) -> bool {
    if let Some(status) = err.downcast_ref::<HttpStatusError>() {
        return is_retryable_http_error(status.status);
    }
    if let Some(e) = err.downcast_ref::<reqwest::Error>() {
        return is_retryable_network_error(e);
    }
    false
}

/// Where dashboard data comes from.
#[async_trait]
pub trait DataSource {
    async fn fetch_rating(&self) -> Result<Vec<RatingRecord>>;
    async fn fetch_correlation(&self) -> Result<Vec<CorrelationRecord>>;
    async fn fetch_geojson(&self) -> Result<Value>;
    async fn status(&self) -> ApiStatus;
}

/// HTTP client for the analytics API.
pub struct ApiClient {
    client: Client,
    rating_url: Url,
    correlation_url: Url,
    geojson_url: Url,
    status_timeout: Duration,
    retry: RetryConfig,
}

impl ApiClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(cfg.fetch_timeout())
            .build()
            .map_err(|e| anyhow!("failed to build http client: {e}"))?;
        Ok(Self {
            client,
            rating_url: cfg.endpoint(RATING_PATH)?,
            correlation_url: cfg.endpoint(CORRELATION_PATH)?,
            geojson_url: cfg.endpoint(GEOJSON_ROUTE)?,
            status_timeout: cfg.status_timeout(),
            retry: RetryConfig::with_retries(cfg.fetch_retries),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T> {
        retry_async(&self.retry, url.path(), is_retryable, || async move {
            let resp = self.client.get(url.clone()).send().await?;
            let status = resp.status().as_u16();
            if !resp.status().is_success() {
                return Err(HttpStatusError { url: url.to_string(), status }.into());
            }
            let body = resp.json::<T>().await?;
            debug(
                Domain::Fetch,
                "fetched",
                obj(&[("url", v_str(url.as_str())), ("status", v_num(status as f64))]),
            );
            Ok::<T, anyhow::Error>(body)
        })
        .await
    }
}

#[async_trait]
impl DataSource for ApiClient {
    async fn fetch_rating(&self) -> Result<Vec<RatingRecord>> {
        self.get_json(&self.rating_url).await
    }

    async fn fetch_correlation(&self) -> Result<Vec<CorrelationRecord>> {
        self.get_json(&self.correlation_url).await
    }

    async fn fetch_geojson(&self) -> Result<Value> {
        self.get_json(&self.geojson_url).await
    }

    async fn status(&self) -> ApiStatus {
        let resp = self
            .client
            .get(self.rating_url.clone())
            .timeout(self.status_timeout)
            .send()
            .await;

        let status = match resp {
            Ok(resp) => ApiStatus::from_http(resp.status().as_u16()),
            Err(e) => {
                warn(
                    Domain::Fetch,
                    "status_check_failed",
                    obj(&[
                        ("url", v_str(self.rating_url.as_str())),
                        ("msg", v_str(&e.to_string())),
                    ]),
                );
                ApiStatus::Offline
            }
        };
        info(Domain::Fetch, "status", obj(&[("status", v_str(status.label()))]));
        status
    }
}

/// Fetch both endpoints concurrently.
pub async fn fetch_all<S: DataSource + Sync + ?Sized>(
    source: &S,
) -> (Result<Vec<RatingRecord>>, Result<Vec<CorrelationRecord>>) {
    tokio::join!(source.fetch_rating(), source.fetch_correlation())
}
