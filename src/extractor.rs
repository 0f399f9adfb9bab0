use crate::FeedbackError;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const TITLE_NOT_FOUND: &str = "Title not found";
pub const DESCRIPTION_NOT_FOUND: &str = "Description not found";
pub const FOLLOWERS_NOT_FOUND: &str = "Followers data not found";
pub const VIEWERS_NOT_FOUND: &str = "Live viewers data not found";

/// Fields pulled out of one page, each already resolved to its placeholder
/// when the page did not carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub followers: String,
    pub viewers: String,
}

/// CSS selectors used for extraction.
///
/// The follower and viewer selectors track the streaming site's generated
/// class names and break whenever its markup is rebuilt, so they are kept
/// here rather than at the call sites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorSet {
    pub title: String,
    pub description: String,
    pub followers: String,
    pub viewers: String,
}

impl Default for SelectorSet {
    fn default() -> Self {
        Self {
            title: "meta[property='og:title']".to_string(),
            description: "meta[property='og:description']".to_string(),
            followers: "p.CoreText-sc-cpl358-0".to_string(),
            viewers: "p.live-viewers-class".to_string(),
        }
    }
}

impl SelectorSet {
    /// Checks that every selector in the set parses.
    pub fn validate(&self) -> Result<(), FeedbackError> {
        for selector in [
            &self.title,
            &self.description,
            &self.followers,
            &self.viewers,
        ] {
            Selector::parse(selector).map_err(|e| FeedbackError::InvalidSelector {
                selector: selector.clone(),
                message: format!("{e:?}"),
            })?;
        }
        Ok(())
    }
}

/// Metadata extractor, responsible for pulling stream details out of page markup
#[derive(Debug, Clone, Default)]
pub struct MetadataExtractor {
    selectors: SelectorSet,
}

impl MetadataExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_selectors(selectors: SelectorSet) -> Result<Self, FeedbackError> {
        selectors.validate()?;
        Ok(Self { selectors })
    }

    /// Extracts every field independently. A missing tag yields its
    /// placeholder; this never fails.
    pub fn extract(&self, html: &str) -> PageMetadata {
        let document = Html::parse_document(html);

        let title = self
            .extract_attr(&document, &self.selectors.title, "content")
            .unwrap_or_else(|| TITLE_NOT_FOUND.to_string());
        let description = self
            .extract_attr(&document, &self.selectors.description, "content")
            .unwrap_or_else(|| DESCRIPTION_NOT_FOUND.to_string());
        let followers = self
            .extract_text(&document, &self.selectors.followers)
            .unwrap_or_else(|| FOLLOWERS_NOT_FOUND.to_string());
        let viewers = self
            .extract_text(&document, &self.selectors.viewers)
            .unwrap_or_else(|| VIEWERS_NOT_FOUND.to_string());

        debug!("Metadata extraction results:");
        debug!("Title: {:?}", title);
        debug!("Description: {:?}", description);
        debug!("Followers: {:?}, Viewers: {:?}", followers, viewers);

        PageMetadata {
            title,
            description,
            followers,
            viewers,
        }
    }

    // Attribute values are returned verbatim.
    fn extract_attr(&self, document: &Html, selector: &str, attr: &str) -> Option<String> {
        let selector = Selector::parse(selector).ok()?;

        document
            .select(&selector)
            .next()
            .and_then(|el| el.value().attr(attr))
            .map(|s| s.to_string())
    }

    fn extract_text(&self, document: &Html, selector: &str) -> Option<String> {
        let selector = Selector::parse(selector).ok()?;

        document
            .select(&selector)
            .next()
            .map(|el| el.text().collect::<String>())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}
