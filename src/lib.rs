//! Scrapes stream page metadata and asks a hosted LLM persona for feedback.
//!
//! A submission flows through [`FeedbackPipeline`]: each link is fetched and
//! reduced to an [`ExtractionResult`], the successes are folded into a
//! [`ChatRequest`], and a [`FeedbackGenerator`] turns that into text. The
//! [`web`] module serves the whole thing as a single-page form.

use serde::{Deserialize, Serialize};

mod chat;
mod error;
mod extractor;
mod feedback;
mod fetcher;
mod logging;
mod page_scraper;
mod pipeline;
pub mod provider;
mod utils;
pub mod web;

pub use chat::{ChatMessage, ChatRequest, ChatRole};
pub use error::FeedbackError;
pub use extractor::{
    MetadataExtractor, PageMetadata, SelectorSet, DESCRIPTION_NOT_FOUND, FOLLOWERS_NOT_FOUND,
    TITLE_NOT_FOUND, VIEWERS_NOT_FOUND,
};
pub use feedback::{FeedbackGenerator, FEEDBACK_ERROR_PREFIX};
pub use fetcher::{Fetcher, FetcherConfig};
pub use logging::{log_error_card, log_extraction_card, setup_logging, LogConfig, LogLevelGuard};
pub use page_scraper::PageScraper;
pub use pipeline::{FeedbackPipeline, FeedbackReport, FeedbackRequest, MISSING_INPUT_MESSAGE};
pub use provider::{ChatProvider, OpenAiCompatibleProvider, ProviderKind};

/// Outcome of scraping one link. Serializes as `{link, title, description,
/// followers, viewers}` or `{link, error}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtractionResult {
    Success {
        link: String,
        #[serde(flatten)]
        metadata: PageMetadata,
    },
    Failure {
        link: String,
        error: String,
    },
}

impl ExtractionResult {
    pub fn success(link: impl Into<String>, metadata: PageMetadata) -> Self {
        ExtractionResult::Success {
            link: link.into(),
            metadata,
        }
    }

    pub fn failure(link: impl Into<String>, error: impl Into<String>) -> Self {
        ExtractionResult::Failure {
            link: link.into(),
            error: error.into(),
        }
    }

    pub fn link(&self) -> &str {
        match self {
            ExtractionResult::Success { link, .. } | ExtractionResult::Failure { link, .. } => link,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExtractionResult::Success { .. })
    }

    pub fn metadata(&self) -> Option<&PageMetadata> {
        match self {
            ExtractionResult::Success { metadata, .. } => Some(metadata),
            ExtractionResult::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ExtractionResult::Success { .. } => None,
            ExtractionResult::Failure { error, .. } => Some(error),
        }
    }
}
