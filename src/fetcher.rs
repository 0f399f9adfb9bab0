use crate::FeedbackError;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, instrument};

#[derive(Clone)]
pub struct Fetcher {
    client: Client,
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher {
    pub fn new() -> Self {
        debug!("Fetcher initialized with default configuration");
        Self::new_with_config(FetcherConfig::default())
    }

    /// Builds a fetcher from a [`FetcherConfig`].
    ///
    /// Falls back to a bare `reqwest::Client` if the builder rejects the
    /// configuration, so construction never fails.
    pub fn new_with_config(config: FetcherConfig) -> Self {
        let client = Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|e| {
                error!(error = %e, "Failed to create configured HTTP client, using defaults");
                Client::new()
            });
        Self { client }
    }

    /// Issues one GET and returns the body text. Non-2xx statuses are errors.
    #[instrument(level = "debug", skip(self), err)]
    pub async fn fetch(&self, url: &str) -> Result<String, FeedbackError> {
        debug!(url = %url, "Starting fetch request");

        let response = self.client.get(url).send().await.map_err(|e| {
            error!(error = %e, url = %url, "Failed to send request");
            FeedbackError::FetchError(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedbackError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let content = response.text().await.map_err(|e| {
            error!(error = %e, url = %url, "Failed to read response body");
            FeedbackError::FetchError(e.to_string())
        })?;

        debug!(url = %url, content_length = content.len(), "Successfully fetched webpage");
        Ok(content)
    }
}

/// HTTP client settings for page fetches.
///
/// `reqwest` applies no timeout of its own, so the default bounds every
/// fetch at 10 s to keep one stalled link from holding up a submission.
///
/// ```ignore
/// let fetcher = Fetcher::new_with_config(FetcherConfig {
///     user_agent: "my-agent/1.0".to_string(),
///     timeout: Duration::from_secs(20),
/// });
/// ```
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: "stream_feedback/0.1.0".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}
