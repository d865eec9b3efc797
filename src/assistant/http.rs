//! Chat-completions client for OpenAI-compatible endpoints.

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use super::{AssistantError, ChatMessage, CorrelationAssistant};
use crate::config::AssistantConfig;

const HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct HttpAssistant {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl HttpAssistant {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self, AssistantError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
            .timeout(request_timeout)
            .user_agent(concat!("gencheck/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.into(),
        })
    }

    /// Build from configuration, reading the key from the configured variable.
    pub fn from_config(config: &AssistantConfig) -> Result<Self, AssistantError> {
        let api_key = env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                AssistantError::Unavailable(format!("{} is not set", config.api_key_env))
            })?;

        Self::new(
            &config.endpoint,
            &config.model,
            api_key,
            Duration::from_secs(config.request_timeout),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl std::fmt::Debug for HttpAssistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpAssistant")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl CorrelationAssistant for HttpAssistant {
    fn complete(&self, messages: &[ChatMessage]) -> Result<String, AssistantError> {
        tracing::debug!(endpoint = %self.endpoint, model = %self.model, "Requesting completion");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&CompletionRequest {
                model: &self.model,
                messages,
                temperature: 0.0,
            })
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AssistantError::Status {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        let completion: CompletionResponse = response.json()?;
        first_content(completion).ok_or(AssistantError::EmptyResponse)
    }
}

fn first_content(response: CompletionResponse) -> Option<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
}
