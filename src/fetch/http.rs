//! HTTP fetcher
//!
//! Fetches documents with GET requests relative to a base URL.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::{normalize_path, FetchError, FetchResult, Fetcher};

/// Default request timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Fetches documents from `<base_url>/<path>`
pub struct HttpFetcher {
    client: Client,
    base_url: String,
}

impl HttpFetcher {
    /// Create a fetcher for the given base URL
    pub fn new(base_url: impl Into<String>, timeout_ms: u64) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| FetchError::Setup(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Full URL for a relative document path
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, normalize_path(path))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    fn describe(&self) -> String {
        self.base_url.clone()
    }

    async fn fetch_text(&self, path: &str) -> FetchResult<String> {
        let url = self.url_for(path);
        tracing::debug!(url = %url, "Fetching document");

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(url));
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for() {
        let fetcher = HttpFetcher::new("http://localhost:8000/site/", DEFAULT_TIMEOUT_MS).unwrap();
        assert_eq!(fetcher.describe(), "http://localhost:8000/site");
        assert_eq!(
            fetcher.url_for("config.json"),
            "http://localhost:8000/site/config.json"
        );
        assert_eq!(
            fetcher.url_for("/resources/data/images.json"),
            "http://localhost:8000/site/resources/data/images.json"
        );
    }
}
