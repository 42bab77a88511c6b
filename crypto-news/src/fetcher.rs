use crate::types::{AggregatorError, FetchConfig, Result};
use reqwest::{Client, RequestBuilder, StatusCode};
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

/// HTTP client owned by a single source adapter.
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(timeout)
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn get(&self, url: &Url) -> RequestBuilder {
        self.client.get(url.as_str())
    }

    /// Fetch `url` and return the body, failing on any non-2xx status.
    pub async fn fetch_text(&self, url: &Url) -> Result<String> {
        let (status, body) = self.send_raw(self.get(url)).await?;
        if !status.is_success() {
            return Err(status_error(status));
        }
        Ok(body)
    }

    /// Send `request` and return the status together with the body, whatever
    /// the status. Size limits are still enforced.
    pub async fn send_raw(&self, request: RequestBuilder) -> Result<(StatusCode, String)> {
        let start_time = Instant::now();
        let response = request.send().await?;
        let status = response.status();
        let max_bytes = self.config.max_feed_size_mb * 1024 * 1024;

        if let Some(content_length) = response.content_length() {
            if content_length as usize > max_bytes {
                return Err(AggregatorError::FeedTooLarge {
                    size_mb: content_length as usize / (1024 * 1024),
                });
            }
        }

        let body = response.text().await?;
        if body.len() > max_bytes {
            return Err(AggregatorError::FeedTooLarge {
                size_mb: body.len() / (1024 * 1024),
            });
        }

        debug!(
            "HTTP {} ({} bytes) in {}ms",
            status,
            body.len(),
            start_time.elapsed().as_millis()
        );
        Ok((status, body))
    }
}

pub(crate) fn status_error(status: StatusCode) -> AggregatorError {
    AggregatorError::HttpStatus {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
    }
}
