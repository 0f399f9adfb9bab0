use crate::chat::ChatRequest;
use crate::{ExtractionResult, FeedbackError, FeedbackGenerator, PageScraper};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

pub const MISSING_INPUT_MESSAGE: &str =
    "Please provide all inputs: links, parameter, persona, and API key.";

/// One form submission.
#[derive(Clone, Default, Deserialize)]
pub struct FeedbackRequest {
    /// Raw link list, one per line.
    #[serde(default)]
    pub links: String,
    #[serde(default)]
    pub parameter: String,
    #[serde(default)]
    pub persona: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub api_key: String,
}

// The API key must never reach the logs.
impl std::fmt::Debug for FeedbackRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedbackRequest")
            .field("links", &self.links)
            .field("parameter", &self.parameter)
            .field("persona", &self.persona)
            .field("provider", &self.provider)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl FeedbackRequest {
    pub fn validate(&self) -> Result<(), FeedbackError> {
        let fields = [&self.links, &self.parameter, &self.persona, &self.api_key];
        if fields.iter().any(|field| field.trim().is_empty()) {
            return Err(FeedbackError::MissingInput(MISSING_INPUT_MESSAGE.to_string()));
        }
        Ok(())
    }

    /// Trimmed, non-blank lines of the link list.
    pub fn links(&self) -> Vec<&str> {
        self.links
            .lines()
            .map(str::trim)
            .filter(|link| !link.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackReport {
    /// One outcome per submitted link, in submission order.
    pub outcomes: Vec<ExtractionResult>,
    pub feedback: String,
}

impl FeedbackReport {
    pub fn successes(&self) -> impl Iterator<Item = &ExtractionResult> {
        self.outcomes.iter().filter(|r| r.is_success())
    }

    pub fn failures(&self) -> impl Iterator<Item = &ExtractionResult> {
        self.outcomes.iter().filter(|r| !r.is_success())
    }
}

/// Scrape every link, then ask for feedback once.
#[derive(Clone, Default)]
pub struct FeedbackPipeline {
    scraper: PageScraper,
    generator: FeedbackGenerator,
}

impl FeedbackPipeline {
    pub fn new(scraper: PageScraper, generator: FeedbackGenerator) -> Self {
        Self { scraper, generator }
    }

    #[instrument(level = "info", skip(self, request), fields(provider = %request.provider))]
    pub async fn run(&self, request: &FeedbackRequest) -> Result<FeedbackReport, FeedbackError> {
        request.validate()?;

        let links = request.links();
        info!(links = links.len(), "Processing submission");

        let outcomes = self.scraper.scrape_all(links.as_slice()).await;
        for outcome in &outcomes {
            if let ExtractionResult::Failure { link, error } = outcome {
                warn!(link = %link, error = %error, "Failed to process link");
            }
        }

        // Feedback is requested even when every link failed.
        let chat = ChatRequest::for_feedback(&request.persona, &request.parameter, &outcomes);
        let feedback = self
            .generator
            .generate(&request.api_key, &request.provider, &chat)
            .await;

        Ok(FeedbackReport { outcomes, feedback })
    }
}
