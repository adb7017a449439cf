// Chat provider adapter for OpenAI-compatible chat completion APIs
// Keeps reqwest and the wire format out of the domain layer

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::config::ChatConfig;
use crate::domain::{
    chat_service::{ChatError, ChatProvider, Result},
    models::Conversation,
};

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Forwards conversations to `{base_url}/chat/completions`
pub struct OpenAiChatProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiChatProvider {
    pub fn new(config: &ChatConfig, api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ChatError::Provider(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: api_key.into(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request_body<'a>(&'a self, conversation: &'a Conversation) -> CompletionRequest<'a> {
        CompletionRequest {
            model: &self.model,
            messages: conversation
                .messages()
                .iter()
                .map(|m| WireMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

/// First choice's content, trimmed
fn extract_reply(response: CompletionResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| ChatError::Provider("response contained no message content".to_string()))
}

#[async_trait]
impl ChatProvider for OpenAiChatProvider {
    async fn complete(&self, conversation: &Conversation) -> Result<String> {
        tracing::debug!(
            model = %self.model,
            messages = conversation.len(),
            "forwarding conversation"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(conversation))
            .send()
            .await
            .map_err(|e| ChatError::Provider(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "language model returned an error status");
            return Err(ChatError::Provider(format!("status {status}: {body}")));
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ChatError::Provider(format!("malformed response: {e}")))?;

        extract_reply(parsed)
    }

    fn name(&self) -> &str {
        "openai"
    }
}
