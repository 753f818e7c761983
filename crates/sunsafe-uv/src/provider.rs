//! UV index client for the currentuvindex.com API.

use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::types::{UvDataset, UvError};

pub const DEFAULT_BASE_URL: &str = "https://currentuvindex.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
const UVI_PATH: &str = "api/v1/uvi";
const USER_AGENT: &str = "SunSafe/0.1.0";

#[derive(Debug, Clone)]
pub struct UvProvider {
    client: Arc<Client>,
    base_url: Url,
}

impl UvProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, UvError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| UvError::InvalidEndpoint(format!("{}: {}", base_url, e)))?;

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            base_url,
        })
    }

    pub fn with_defaults() -> Result<Self, UvError> {
        Self::new(DEFAULT_BASE_URL, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// `<base>/api/v1/uvi?latitude=..&longitude=..`
    pub fn endpoint(&self, latitude: &str, longitude: &str) -> Result<Url, UvError> {
        let mut url = self
            .base_url
            .join(UVI_PATH)
            .map_err(|e| UvError::InvalidEndpoint(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("latitude", latitude.trim())
            .append_pair("longitude", longitude.trim());
        Ok(url)
    }

    /// One GET round-trip. No retries.
    pub async fn fetch(&self, latitude: &str, longitude: &str) -> Result<UvDataset, UvError> {
        let url = self.endpoint(latitude, longitude)?;
        tracing::debug!("Fetching UV data from {}", url);

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("UV API returned status {}", status);
            return Err(UvError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let data: UvDataset =
            serde_json::from_str(&body).map_err(|e| UvError::Parse(e.to_string()))?;
        data.validate()?;

        tracing::info!(
            "Fetched UV data: now {} ({} history, {} forecast)",
            data.now.uvi,
            data.history.len(),
            data.forecast.len()
        );
        Ok(data)
    }

    /// [`fetch`](Self::fetch) that gives up as soon as `cancel` fires
    pub async fn fetch_cancellable(
        &self,
        latitude: &str,
        longitude: &str,
        cancel: &CancellationToken,
    ) -> Result<UvDataset, UvError> {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!("UV fetch cancelled");
                Err(UvError::Cancelled)
            }
            result = self.fetch(latitude, longitude) => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_includes_coordinates() {
        let provider = UvProvider::with_defaults().unwrap();
        let url = provider.endpoint("40.0", " -73.0 ").unwrap();
        assert_eq!(
            url.as_str(),
            "https://currentuvindex.com/api/v1/uvi?latitude=40.0&longitude=-73.0"
        );
    }

    #[test]
    fn test_endpoint_escapes_input() {
        let provider = UvProvider::with_defaults().unwrap();
        let url = provider.endpoint("40&x=1", "0").unwrap();
        assert!(url.as_str().contains("latitude=40%26x%3D1"));
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            UvProvider::new("not a url", Duration::from_secs(1)),
            Err(UvError::InvalidEndpoint(_))
        ));
    }
}
