//! Date-trivia provider client.

use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::config::ProviderConfig;
use crate::providers::ensure_slash;

/// One trivia fact for a month/day pair, and the year it refers to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateFact {
    pub text: String,
    pub year: i32,
}

/// A trait for fetching a date-trivia fact; see `NumbersClient` for the
/// concrete HTTP implementation.
#[async_trait]
pub trait FetchDateFact: Send + Sync {
    async fn fetch(&self, month: u32, day: u32) -> anyhow::Result<DateFact>;
}

/// The concrete implementation of `FetchDateFact`.
pub struct NumbersClient {
    client: Client,
    base_url: Url,
    request_timeout: Duration,
}

impl NumbersClient {
    pub fn from_config(config: &ProviderConfig) -> Self {
        let request_timeout = Duration::from_secs(config.request_timeout_secs);
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.date_facts_url.clone(),
            request_timeout,
        }
    }
}

#[async_trait]
impl FetchDateFact for NumbersClient {
    async fn fetch(&self, month: u32, day: u32) -> anyhow::Result<DateFact> {
        let mut url = ensure_slash(&self.base_url)
            .join(&format!("{month}/{day}/date"))
            .map_err(|e| anyhow!("Failed to construct date fact URL: {}", e))?;
        url.set_query(Some("json"));

        debug!("Fetching date fact from {}", url);

        let response = self.client.get(url.clone()).timeout(self.request_timeout).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Date fact provider error for {}/{}: {} - {}", month, day, status, body);
            return Err(anyhow!("date fact API error: {} - {}", status, body));
        }

        // Get the response body as text first for logging
        let body_text = response.text().await?;
        debug!("Date fact response body: {}", body_text);

        match serde_json::from_str::<DateFact>(&body_text) {
            Ok(parsed) => Ok(parsed),
            Err(e) => {
                tracing::error!("Failed to parse date fact response as JSON. Error: {}", e);
                tracing::error!("Response body was: {}", body_text);
                Err(anyhow!("error decoding response body: {}", e))
            }
        }
    }
}
