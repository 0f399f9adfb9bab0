//! Chat-completion providers
//!
//! Both supported providers speak the OpenAI chat-completion protocol, so a
//! single `async-openai` backed implementation serves them; [`ProviderKind`]
//! only decides the endpoint, model and token budget.

use crate::chat::{ChatRequest, ChatRole};
use crate::FeedbackError;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, instrument};

/// Sampling temperature used for every feedback request.
pub const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Perplexity,
    OpenAi,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 2] = [ProviderKind::Perplexity, ProviderKind::OpenAi];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Perplexity => "perplexity",
            ProviderKind::OpenAi => "openai",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::Perplexity => "Perplexity",
            ProviderKind::OpenAi => "OpenAI",
        }
    }

    pub fn api_base(&self) -> &'static str {
        match self {
            ProviderKind::Perplexity => "https://api.perplexity.ai",
            ProviderKind::OpenAi => "https://api.openai.com/v1",
        }
    }

    pub fn model(&self) -> &'static str {
        match self {
            ProviderKind::Perplexity => "sonar-pro",
            ProviderKind::OpenAi => "gpt-4o-mini",
        }
    }

    /// Ceiling on generated tokens for a single feedback response.
    pub fn max_tokens(&self) -> u32 {
        match self {
            ProviderKind::Perplexity => 150,
            ProviderKind::OpenAi => 500,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = FeedbackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "perplexity" => Ok(ProviderKind::Perplexity),
            "openai" => Ok(ProviderKind::OpenAi),
            _ => Err(FeedbackError::InvalidProvider(s.to_string())),
        }
    }
}

/// A hosted chat-completion backend.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Sends the messages and returns the first choice's text.
    async fn complete(&self, request: &ChatRequest) -> Result<String, FeedbackError>;
}

/// Provider for any OpenAI-compatible chat-completion endpoint.
pub struct OpenAiCompatibleProvider {
    client: Client<OpenAIConfig>,
    name: String,
    model: String,
    max_tokens: u32,
}

impl OpenAiCompatibleProvider {
    pub fn new(kind: ProviderKind, api_key: &str) -> Self {
        Self::with_api_base(kind, api_key, kind.api_base())
    }

    pub fn with_api_base(kind: ProviderKind, api_key: &str, api_base: &str) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base.trim_end_matches('/'));

        // async-openai retries rate-limited and 5xx responses on its own;
        // a zero elapsed budget turns every call into a single attempt.
        let no_retry = backoff::ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();

        Self {
            client: Client::with_config(config).with_backoff(no_retry),
            name: kind.display_name().to_string(),
            model: kind.model().to_string(),
            max_tokens: kind.max_tokens(),
        }
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn service_error(&self, message: impl fmt::Display) -> FeedbackError {
        FeedbackError::ProviderError {
            provider: self.name.clone(),
            message: message.to_string(),
        }
    }

    fn build_messages(
        &self,
        request: &ChatRequest,
    ) -> Result<Vec<ChatCompletionRequestMessage>, FeedbackError> {
        request
            .messages
            .iter()
            .map(|message| match message.role {
                ChatRole::System => ChatCompletionRequestSystemMessageArgs::default()
                    .content(message.content.clone())
                    .build()
                    .map(ChatCompletionRequestMessage::System)
                    .map_err(|e| self.service_error(e)),
                ChatRole::User => ChatCompletionRequestUserMessageArgs::default()
                    .content(message.content.clone())
                    .build()
                    .map(ChatCompletionRequestMessage::User)
                    .map_err(|e| self.service_error(e)),
            })
            .collect()
    }
}

#[async_trait]
impl ChatProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(level = "debug", skip(self, request), fields(provider = %self.name, model = %self.model))]
    async fn complete(&self, request: &ChatRequest) -> Result<String, FeedbackError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(self.build_messages(request)?)
            .max_tokens(self.max_tokens)
            .temperature(TEMPERATURE)
            .build()
            .map_err(|e| self.service_error(e))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| self.service_error(e))?;

        debug!(choices = response.choices.len(), "Received chat completion");

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| FeedbackError::EmptyCompletion(self.name.clone()))?;

        Ok(choice.message.content.unwrap_or_default())
    }
}
