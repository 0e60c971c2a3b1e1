//! OpenAI chat-completions adapter.
//!
//! Talks to `POST {base_url}/chat/completions`, so any OpenAI-compatible
//! server works. Transient failures (network, 429, 5xx) are retried with
//! exponential backoff up to `max_retries` times.

use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::domain::errors::GenerationError;
use crate::domain::models::AssistantConfig;
use crate::domain::ports::{GenerationRequest, TextGenerator};
use crate::infrastructure::logging::SecretScrubber;

const INITIAL_RETRY_INTERVAL: Duration = Duration::from_millis(500);
const MAX_RETRY_INTERVAL: Duration = Duration::from_secs(5);

/// Chat-completions client.
pub struct OpenAiChatGenerator {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
    max_retries: u32,
    retry_interval: Duration,
    scrubber: SecretScrubber,
}

impl OpenAiChatGenerator {
    pub fn new(config: &AssistantConfig, api_key: impl Into<String>) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GenerationError::NotConfigured(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            max_retries: config.max_retries,
            retry_interval: INITIAL_RETRY_INTERVAL,
            scrubber: SecretScrubber::new(),
        })
    }

    /// Overrides the first backoff delay.
    #[must_use]
    pub const fn with_retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = interval;
        self
    }

    fn build_body(&self, request: &GenerationRequest) -> ChatRequest {
        let mut messages = Vec::with_capacity(request.history.len() + 2);
        messages.push(ChatMessage {
            role: "system".to_string(),
            content: request.system.clone(),
        });
        messages.extend(request.history.iter().map(|turn| ChatMessage {
            role: turn.role.as_str().to_string(),
            content: turn.text.clone(),
        }));
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: request.message.clone(),
        });

        ChatRequest {
            model: self.model.clone(),
            messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    async fn call_once(&self, body: &ChatRequest) -> Result<String, GenerationError> {
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| GenerationError::Network(self.scrubber.scrub(&e.to_string()).into_owned()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read response body".to_string());
            return Err(GenerationError::Backend {
                status: status.as_u16(),
                body: self.scrubber.scrub(&body).into_owned(),
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(GenerationError::EmptyReply);
        }
        Ok(content)
    }
}

#[async_trait]
impl TextGenerator for OpenAiChatGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let body = self.build_body(&request);
        let policy = ExponentialBackoffBuilder::new()
            .with_initial_interval(self.retry_interval)
            .with_max_interval(MAX_RETRY_INTERVAL)
            .with_max_elapsed_time(None)
            .build();

        let body = &body;
        let max_retries = self.max_retries;
        let mut attempts = 0u32;
        backoff::future::retry_notify(
            policy,
            || {
                attempts += 1;
                let attempt = attempts;
                async move {
                    debug!(attempt, model = %body.model, "requesting chat completion");
                    self.call_once(body).await.map_err(|err| {
                        if err.is_transient() && attempt <= max_retries {
                            backoff::Error::transient(err)
                        } else {
                            backoff::Error::permanent(err)
                        }
                    })
                }
            },
            |err: GenerationError, wait: Duration| {
                warn!(error = %err, retry_in = ?wait, "chat completion failed, retrying");
            },
        )
        .await
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

// -- OpenAI API request/response types --

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}
