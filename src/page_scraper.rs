use crate::logging::{log_error_card, log_extraction_card};
use crate::{ExtractionResult, FeedbackError, Fetcher, MetadataExtractor, PageMetadata};
use tracing::{debug, instrument};
use url::Url;

/// Fetches stream pages and turns each one into an [`ExtractionResult`].
#[derive(Clone, Default)]
pub struct PageScraper {
    pub fetcher: Fetcher,
    extractor: MetadataExtractor,
}

impl PageScraper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_with_fetcher(fetcher: Fetcher) -> Self {
        Self {
            fetcher,
            extractor: MetadataExtractor::new(),
        }
    }

    pub fn with_extractor(mut self, extractor: MetadataExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Scrapes one link. Failures come back as [`ExtractionResult::Failure`]
    /// carrying the link, never as an error.
    #[instrument(level = "debug", skip(self))]
    pub async fn scrape(&self, link: &str) -> ExtractionResult {
        match self.try_scrape(link).await {
            Ok(metadata) => {
                let result = ExtractionResult::success(link, metadata);
                log_extraction_card(&result);
                result
            }
            Err(e) => {
                log_error_card(link, &e);
                ExtractionResult::failure(link, e.to_string())
            }
        }
    }

    /// Scrapes links one after another; one outcome per link, in input order.
    pub async fn scrape_all<S: AsRef<str>>(&self, links: &[S]) -> Vec<ExtractionResult> {
        let mut outcomes = Vec::with_capacity(links.len());
        for link in links {
            outcomes.push(self.scrape(link.as_ref()).await);
        }
        debug!(count = outcomes.len(), "Finished scraping links");
        outcomes
    }

    async fn try_scrape(&self, link: &str) -> Result<PageMetadata, FeedbackError> {
        let _ = Url::parse(link)?;
        let html = self.fetcher.fetch(link).await?;
        Ok(self.extractor.extract(&html))
    }
}
