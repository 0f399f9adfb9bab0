use crate::chat::ChatRequest;
use crate::provider::{ChatProvider, OpenAiCompatibleProvider, ProviderKind};
use std::collections::HashMap;
use tracing::{info, instrument};

pub const FEEDBACK_ERROR_PREFIX: &str = "Error generating feedback:";

/// Turns a chat request into display text. Every failure is folded into the
/// returned string.
#[derive(Debug, Clone, Default)]
pub struct FeedbackGenerator {
    api_bases: HashMap<ProviderKind, String>,
}

impl FeedbackGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sends requests for `kind` to `api_base` instead of the provider's
    /// public endpoint.
    pub fn with_api_base(mut self, kind: ProviderKind, api_base: impl Into<String>) -> Self {
        self.api_bases.insert(kind, api_base.into());
        self
    }

    pub fn api_base(&self, kind: ProviderKind) -> &str {
        self.api_bases
            .get(&kind)
            .map(String::as_str)
            .unwrap_or_else(|| kind.api_base())
    }

    /// Resolves `provider` and asks it for feedback.
    ///
    /// An unknown selector returns `"Invalid API type specified."` without
    /// touching the network.
    #[instrument(level = "debug", skip(self, api_key, request))]
    pub async fn generate(&self, api_key: &str, provider: &str, request: &ChatRequest) -> String {
        let kind = match provider.parse::<ProviderKind>() {
            Ok(kind) => kind,
            Err(e) => {
                e.log();
                return e.to_string();
            }
        };

        let backend =
            OpenAiCompatibleProvider::with_api_base(kind, api_key, self.api_base(kind));
        self.generate_with(&backend, request).await
    }

    pub async fn generate_with(&self, provider: &dyn ChatProvider, request: &ChatRequest) -> String {
        match provider.complete(request).await {
            Ok(text) => {
                info!(provider = provider.name(), length = text.len(), "Generated feedback");
                text
            }
            Err(e) => {
                e.log();
                format!("{FEEDBACK_ERROR_PREFIX} {e}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FeedbackError;
    use async_trait::async_trait;

    struct FailingProvider;

    #[async_trait]
    impl ChatProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        async fn complete(&self, _request: &ChatRequest) -> Result<String, FeedbackError> {
            Err(FeedbackError::ProviderError {
                provider: "failing".to_string(),
                message: "quota exceeded".to_string(),
            })
        }
    }

    struct EchoProvider;

    #[async_trait]
    impl ChatProvider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        async fn complete(&self, request: &ChatRequest) -> Result<String, FeedbackError> {
            Ok(request.messages[0].content.clone())
        }
    }

    #[tokio::test]
    async fn test_unknown_provider_short_circuits() {
        let generator = FeedbackGenerator::new();
        let text = generator
            .generate("key", "claude", &ChatRequest::for_feedback("p", "x", &[]))
            .await;
        assert_eq!(text, "Invalid API type specified.");
    }

    #[tokio::test]
    async fn test_provider_failure_is_prefixed() {
        let generator = FeedbackGenerator::new();
        let text = generator
            .generate_with(&FailingProvider, &ChatRequest::default())
            .await;
        assert!(text.starts_with(FEEDBACK_ERROR_PREFIX));
        assert!(text.contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_provider_success_passes_text_through() {
        let generator = FeedbackGenerator::new();
        let request = ChatRequest::for_feedback("You are terse.", "x", &[]);
        assert_eq!(generator.generate_with(&EchoProvider, &request).await, "You are terse.");
    }

    #[test]
    fn test_api_base_override() {
        let generator =
            FeedbackGenerator::new().with_api_base(ProviderKind::OpenAi, "http://127.0.0.1:9");
        assert_eq!(generator.api_base(ProviderKind::OpenAi), "http://127.0.0.1:9");
        assert_eq!(
            generator.api_base(ProviderKind::Perplexity),
            "https://api.perplexity.ai"
        );
    }
}
