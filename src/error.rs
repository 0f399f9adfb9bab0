use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("Failed to parse URL: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("Failed to fetch content: {0}")]
    FetchError(String),

    #[error("HTTP error {status} for url ({url})")]
    HttpStatus { status: u16, url: String },

    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("Invalid API type specified.")]
    InvalidProvider(String),

    #[error("{provider} API error: {message}")]
    ProviderError { provider: String, message: String },

    #[error("{0} returned no completion choices")]
    EmptyCompletion(String),

    #[error("{0}")]
    MissingInput(String),

    #[error("Failed to render page: {0}")]
    Template(#[from] tera::Error),
}

impl FeedbackError {
    pub fn log(&self) {
        match self {
            FeedbackError::UrlParseError(e) => {
                warn!(error = %e, "URL parsing failed");
            }
            FeedbackError::FetchError(e) => {
                warn!(error = %e, "Page fetch failed");
            }
            FeedbackError::HttpStatus { status, url } => {
                warn!(status = *status, url = %url, "Page returned error status");
            }
            FeedbackError::InvalidSelector { selector, message } => {
                error!(selector = %selector, error = %message, "Extraction selector rejected");
            }
            FeedbackError::InvalidProvider(name) => {
                warn!(provider = %name, "Unknown provider selected");
            }
            FeedbackError::ProviderError { provider, message } => {
                error!(
                    provider = %provider,
                    error = %message,
                    "Chat completion failed"
                );
            }
            FeedbackError::EmptyCompletion(provider) => {
                warn!(provider = %provider, "Chat completion had no choices");
            }
            FeedbackError::MissingInput(message) => {
                warn!(reason = %message, "Submission rejected");
            }
            FeedbackError::Template(e) => {
                error!(error = %e, "Template rendering failed");
            }
        }
    }
}
