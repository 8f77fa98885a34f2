//! Astronomy-picture provider client.

use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::config::ProviderConfig;

/// The astronomy record for one calendar date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApodRecord {
    pub title: String,
    /// Absent on days where the entry is a video rather than an image.
    #[serde(default)]
    pub hdurl: String,
}

/// A trait for fetching the astronomy picture record for a date.
/// In practice this is an HTTP GET against the APOD endpoint, using the
/// `reqwest` library; see `ApodClient`. Tests substitute a stub.
#[async_trait]
pub trait FetchApod: Send + Sync {
    /// `date` is `YYYY-MM-DD`; the provider rejects dates before 1996-01-01,
    /// so callers clamp the year before formatting.
    async fn fetch(&self, date: &str) -> anyhow::Result<ApodRecord>;
}

/// The concrete implementation of `FetchApod`.
pub struct ApodClient {
    client: Client,
    base_url: Url,
    api_key: String,
    request_timeout: Duration,
}

impl ApodClient {
    pub fn from_config(config: &ProviderConfig) -> Self {
        let request_timeout = Duration::from_secs(config.request_timeout_secs);
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.apod_url.clone(),
            api_key: config.apod_api_key.clone(),
            request_timeout,
        }
    }
}

#[async_trait]
impl FetchApod for ApodClient {
    async fn fetch(&self, date: &str) -> anyhow::Result<ApodRecord> {
        debug!("Fetching astronomy picture for {} from {}", date, self.base_url);

        let response = self
            .client
            .get(self.base_url.clone())
            .query(&[("date", date), ("api_key", self.api_key.as_str())])
            .timeout(self.request_timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Astronomy provider rejected date {}: {} - {}", date, status, body);
            return Err(anyhow!("APOD API error: {} - {}", status, body));
        }

        // Get the response body as text first for logging
        let body_text = response.text().await?;
        debug!("Astronomy provider response body: {}", body_text);

        match serde_json::from_str::<ApodRecord>(&body_text) {
            Ok(parsed) => Ok(parsed),
            Err(e) => {
                tracing::error!("Failed to parse astronomy response as JSON. Error: {}", e);
                tracing::error!("Response body was: {}", body_text);
                Err(anyhow!("error decoding response body: {}", e))
            }
        }
    }
}
