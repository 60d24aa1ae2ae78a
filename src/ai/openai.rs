//! Chat completion client for OpenAI-compatible APIs.
//!
//! The planner only needs one-shot completions, so the client exposes a single
//! [`ChatModel::complete`] call behind a trait that tests can fake.

use crate::config::OpenAISettings;
use crate::errors::{AIError, AppResult};
use reqwest::blocking::Client;
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Sampling temperature used for recaps.
pub const RECAP_TEMPERATURE: f32 = 0.6;
/// Upper bound on the tokens a recap may use.
pub const RECAP_MAX_TOKENS: u32 = 400;

/// A message in a chat conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message sender (system, user, assistant)
    pub role: String,
    /// The content of the message
    pub content: String,
}

impl Message {
    /// Creates a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Creates a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// A model that answers a conversation with one message.
pub trait ChatModel {
    /// Sends `messages` and returns the content of the first choice.
    fn complete(&self, messages: &[Message]) -> AppResult<String>;
}

/// Request body for chat completion.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    frequency_penalty: f32,
    presence_penalty: f32,
}

/// Response from chat completion.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

/// Client for an OpenAI-compatible chat completion API.
pub struct OpenAIClient {
    base_url: String,
    api_key: String,
    model: String,
    client: Client,
}

impl OpenAIClient {
    /// Creates a client from settings.
    ///
    /// # Errors
    ///
    /// Returns `AIError::MissingApiKey` when `OPENAI_API_KEY` is not set.
    pub fn new(settings: &OpenAISettings) -> AppResult<Self> {
        let api_key = settings.api_key.clone().ok_or(AIError::MissingApiKey)?;
        Ok(Self {
            base_url: settings.base_url.clone(),
            api_key,
            model: settings.model.clone(),
            client: Client::new(),
        })
    }
}

impl ChatModel for OpenAIClient {
    /// Sends a chat completion request.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The API is not reachable
    /// - Model is not found
    /// - API returns an error response or no choices
    fn complete(&self, messages: &[Message]) -> AppResult<String> {
        debug!("Sending chat request with model: {}", self.model);

        let url = format!("{}/v1/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature: RECAP_TEMPERATURE,
            max_tokens: RECAP_MAX_TOKENS,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        };

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .map_err(AIError::Unreachable)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();

            if status.as_u16() == 404 {
                return Err(AIError::ModelNotFound(self.model.clone()).into());
            }

            return Err(
                AIError::InvalidResponse(format!("HTTP {}: {}", status, error_text)).into(),
            );
        }

        let chat_response: ChatResponse = response.json().map_err(|e| {
            AIError::InvalidResponse(format!("Failed to parse chat response: {}", e))
        })?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AIError::InvalidResponse("Response has no choices".to_string()))?;

        debug!("Received chat response ({} chars)", content.chars().count());
        Ok(content)
    }
}
