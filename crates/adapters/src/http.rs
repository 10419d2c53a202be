//! reqwest-based page fetcher

use async_trait::async_trait;
use pagewatch_domain::{FetchError, FetchedPage, PageFetcher};
use reqwest::Client;
use std::time::Duration;

const USER_AGENT: &str = concat!("pagewatch/", env!("CARGO_PKG_VERSION"));

/// HTTP page fetcher with a per-request timeout.
///
/// Non-2xx statuses are returned as data; only transport-level failures
/// become errors, so callers can decide how to degrade.
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to build HTTP client");

        Self { client }
    }
}

impl Default for ReqwestFetcher {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

#[async_trait]
impl PageFetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else if e.is_builder() {
                FetchError::InvalidUrl(e.to_string())
            } else {
                FetchError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        // Lossy decode keeps the cycle alive on broken encodings.
        let text = String::from_utf8_lossy(&bytes).into_owned();

        Ok(FetchedPage {
            status,
            bytes: bytes.to_vec(),
            text,
        })
    }
}
