//! # ridership-http
//!
//! A [`ByteSource`] that fetches workbooks over HTTP.
//!
//! Keys are resolved against a base URL, so the same source key used for a
//! local file (`Seasonal_Ridership_by_Station.xlsx`) can be served from a
//! static file host. Absolute `http://` / `https://` keys are fetched as-is.

use async_trait::async_trait;
use reqwest::Client;
use ridership_workbook::{ByteSource, SourceError};
use std::time::Duration;

/// Fetches workbook bytes with HTTP GET.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base_url: String,
}

impl HttpSource {
    /// Constructs a source rooted at `base_url` with a 30-second request timeout.
    ///
    /// # Errors
    ///
    /// Returns a `SourceError::Remote` if building the underlying HTTP client fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use ridership_http::HttpSource;
    /// let source = HttpSource::new("https://example.com/data").expect("failed to create HttpSource");
    /// assert_eq!(source.url_for("book.xlsx"), "https://example.com/data/book.xlsx");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Result<Self, SourceError> {
        Self::with_timeout(base_url, 30)
    }

    /// Constructs a source with a custom per-request timeout in seconds.
    /// `0` builds a client with no request timeout.
    ///
    /// # Errors
    ///
    /// Returns a `SourceError::Remote` if building the underlying HTTP client fails.
    pub fn with_timeout(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self, SourceError> {
        let base_url = base_url.into();
        let mut builder = Client::builder();
        if timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(timeout_secs));
        }
        let client = builder
            // Disable system proxy lookup to avoid macOS system-configuration issues
            .no_proxy()
            .build()
            .map_err(|e| SourceError::Remote {
                key: base_url.clone(),
                message: e.to_string(),
            })?;

        Ok(Self { client, base_url })
    }

    /// The URL a key resolves to.
    #[must_use]
    pub fn url_for(&self, key: &str) -> String {
        if key.starts_with("http://") || key.starts_with("https://") {
            return key.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            key.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl ByteSource for HttpSource {
    async fn read(&self, key: &str) -> Result<Vec<u8>, SourceError> {
        let url = self.url_for(key);
        tracing::debug!(url = %url, "fetching workbook");

        let response = self.client.get(&url).send().await.map_err(|e| SourceError::Remote {
            key: url.clone(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound { key: url });
        }
        if !status.is_success() {
            return Err(SourceError::Remote {
                key: url,
                message: format!(
                    "HTTP {} - {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                ),
            });
        }

        let bytes = response.bytes().await.map_err(|e| SourceError::Remote {
            key: url.clone(),
            message: format!("Failed to read body: {e}"),
        })?;

        Ok(bytes.to_vec())
    }
}
