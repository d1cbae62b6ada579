//! Model abstraction layer for the classroom pipeline.
//!
//! This crate defines the core traits and types for talking to language models:
//! the provider-facing [`Model`] trait, and the prompt-in/text-out
//! [`LanguageModel`] convention the agents are written against.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

/// Represents an error that can occur when interacting with an AI model.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelError {
    /// An error occurred during the API request (e.g., network issues, invalid request).
    #[error("Request Error: {0}")]
    RequestError(String),

    /// The model returned an error (e.g., invalid input, authentication failure).
    #[error("Model Response Error: {0}")]
    ModelResponseError(String),

    /// An error occurred during serialization or deserialization.
    #[error("Serialization Error: {0}")]
    SerializationError(String),

    /// Required startup configuration is missing or invalid (e.g., no API key).
    #[error("Configuration Error: {0}")]
    Configuration(String),

    /// The model provider is not supported.
    #[error("Unsupported Model Provider: {0}")]
    UnsupportedModelProvider(String),

    /// Provider quota exceeded or rate limit hit.
    #[error(
        "Provider '{provider}' quota exceeded{}",
        message.as_ref().map(|m| format!(": {}", m)).unwrap_or_default()
    )]
    QuotaExceeded {
        /// The provider name (e.g., "mistral").
        provider: String,
        /// Optional error message from the provider.
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    /// Other unexpected errors.
    #[error("Other Model Error: {0}")]
    Other(String),
}

/// Represents a message in a conversation with a chat model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The role of the message sender (e.g., "user", "assistant", "system").
    pub role: String,
    /// The content of the message.
    pub content: String,
}

impl ChatMessage {
    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Parameters for controlling the model's generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    /// What sampling temperature to use, between 0 and 2.
    pub temperature: Option<f32>,

    /// Nucleus sampling: the model considers the tokens within `top_p` probability mass.
    pub top_p: Option<f32>,

    /// The maximum number of tokens to generate in the chat completion.
    pub max_tokens: Option<u32>,

    /// Sequences where the API will stop generating further tokens.
    pub stop_sequences: Option<Vec<String>>,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            temperature: Some(1.0),
            top_p: Some(1.0),
            max_tokens: Some(1000),
            stop_sequences: None,
        }
    }
}

/// The response from a text generation or chat completion model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelResponse {
    /// The generated content.
    pub content: String,

    /// Optional: The ID of the model used to generate the response.
    pub model_id: Option<String>,

    /// Optional: Usage statistics for the request.
    pub usage: Option<ModelUsage>,
}

/// Usage statistics for a model request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelUsage {
    /// Number of tokens in the prompt.
    pub prompt_tokens: u32,

    /// Number of tokens in the completion.
    pub completion_tokens: u32,

    /// Total number of tokens used.
    pub total_tokens: u32,
}

/// A trait for interacting with different AI models.
///
/// All models must be `Send + Sync` to allow concurrent use across threads.
#[async_trait]
pub trait Model: Send + Sync {
    /// Generates a text completion based on the given prompt.
    ///
    /// # Errors
    /// Returns a `ModelError` if generation fails.
    async fn generate_text(
        &self,
        prompt: &str,
        parameters: Option<ModelParameters>,
    ) -> Result<ModelResponse, ModelError>;

    /// Generates a chat completion based on the given conversation history.
    ///
    /// # Errors
    /// Returns a `ModelError` if generation fails.
    async fn generate_chat_completion(
        &self,
        messages: &[ChatMessage],
        parameters: Option<ModelParameters>,
    ) -> Result<ModelResponse, ModelError>;

    /// Returns the ID of the model.
    fn model_id(&self) -> &str;

    /// Returns a short provider tag (e.g., "mistral", "mock").
    fn provider(&self) -> &str;
}

/// Outcome of a successful generation.
///
/// A call that reached the model and got an answer is either `Text` or `Empty`;
/// a call that did not is an `Err(ModelError)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum Generation {
    /// The model produced non-blank text.
    Text(String),
    /// The model answered, but with nothing.
    Empty,
}

impl Generation {
    /// Classifies raw model output.
    pub fn from_output(output: impl Into<String>) -> Self {
        let output = output.into();
        if output.trim().is_empty() { Self::Empty } else { Self::Text(output) }
    }

    /// Returns the generated text, `""` for `Empty`.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Empty => "",
        }
    }

    /// Consumes the generation, returning the text (`""` for `Empty`).
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Empty => String::new(),
        }
    }

    /// Returns `true` for `Empty`.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Prompt-in, text-out calling convention used by the agents.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generates post-processed text for a prompt.
    ///
    /// # Errors
    /// Returns a `ModelError` if the underlying model could not be reached or
    /// answered with an error.
    async fn generate(&self, prompt: &str) -> Result<Generation, ModelError>;

    /// Legacy convention: the generated text, or `""` when generation failed.
    ///
    /// The failure is logged. Prefer [`LanguageModel::generate`] whenever the
    /// caller needs to tell an empty answer from a failed call.
    async fn call(&self, prompt: &str) -> String {
        match self.generate(prompt).await {
            Ok(generation) => generation.into_text(),
            Err(e) => {
                error!(error = %e, llm_type = self.llm_type(), "Error during model interaction");
                String::new()
            }
        }
    }

    /// Identifier for the kind of model behind this adapter.
    fn llm_type(&self) -> &str;

    /// The model identifier used for requests.
    fn model_id(&self) -> &str;
}
