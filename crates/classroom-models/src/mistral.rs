//! Mistral model implementation.
//!
//! This module provides an implementation of the `Model` trait for Mistral models
//! served through a hosted, OpenAI-style chat completions endpoint.

use crate::settings::ProviderSettings;
use async_trait::async_trait;
use classroom_abstraction::{
    ChatMessage, Model, ModelError, ModelParameters, ModelResponse, ModelUsage,
};
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// Provider tag reported by [`MistralModel`].
pub const PROVIDER: &str = "mistral";

/// Mistral model implementation.
#[derive(Debug, Clone)]
pub struct MistralModel {
    /// The model ID (e.g., "Mistral-large-2407").
    model_id: String,
    /// The API key for authentication.
    api_key: String,
    /// The base URL of the hosted service.
    base_url: String,
    /// System message prepended to single-prompt requests.
    system_prompt: String,
    /// Parameters used when the caller does not pass any.
    default_parameters: ModelParameters,
    /// HTTP client for making requests.
    client: Client,
}

impl MistralModel {
    /// Creates a new `MistralModel` from validated provider settings.
    ///
    /// # Errors
    /// Returns a `ModelError` if the HTTP client cannot be built.
    pub fn from_settings(settings: &ProviderSettings) -> Result<Self, ModelError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder().default_headers(headers).build().map_err(|e| {
            ModelError::RequestError(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self {
            model_id: settings.model_id.clone(),
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            system_prompt: settings.system_prompt.clone(),
            default_parameters: settings.parameters.clone(),
            client,
        })
    }

    /// Creates a new `MistralModel` with a custom API key and the default endpoint.
    ///
    /// # Errors
    /// Returns a `ModelError` if the key is blank or the HTTP client cannot be built.
    pub fn with_api_key(model_id: String, api_key: String) -> Result<Self, ModelError> {
        let settings = ProviderSettings::new(api_key)?.with_model_id(model_id);
        Self::from_settings(&settings)
    }

    /// Returns the chat completions URL requests are sent to.
    pub fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    /// Extracts the provider's error message from an error body.
    ///
    /// Accepts both `{"message": ...}` and `{"error": {"message": ...}}` shapes.
    fn error_message(body: &str) -> String {
        serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                value
                    .get("message")
                    .or_else(|| value.get("error").and_then(|e| e.get("message")))
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "Unknown error".to_string())
    }
}

#[async_trait]
impl Model for MistralModel {
    async fn generate_text(
        &self,
        prompt: &str,
        parameters: Option<ModelParameters>,
    ) -> Result<ModelResponse, ModelError> {
        debug!(
            model_id = %self.model_id,
            prompt_len = prompt.len(),
            parameters = ?parameters,
            "MistralModel generating text"
        );

        let messages = vec![ChatMessage::system(&self.system_prompt), ChatMessage::user(prompt)];

        self.generate_chat_completion(&messages, parameters).await
    }

    async fn generate_chat_completion(
        &self,
        messages: &[ChatMessage],
        parameters: Option<ModelParameters>,
    ) -> Result<ModelResponse, ModelError> {
        debug!(
            model_id = %self.model_id,
            message_count = messages.len(),
            parameters = ?parameters,
            "MistralModel generating chat completion"
        );

        let url = self.endpoint();
        let params = parameters.unwrap_or_else(|| self.default_parameters.clone());

        let request_body = ChatRequest {
            model: self.model_id.clone(),
            messages: messages
                .iter()
                .map(|msg| WireMessage {
                    role: msg.role.clone(),
                    content: msg.content.clone(),
                })
                .collect(),
            temperature: params.temperature,
            top_p: params.top_p,
            max_tokens: params.max_tokens,
            stop: params.stop_sequences,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to send request to Mistral endpoint");
                ModelError::RequestError(format!("Network error: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = Self::error_message(&error_text);
            error!(status = %status, error = %message, "Mistral endpoint returned error status");

            if status.as_u16() == 402 || status.as_u16() == 429 {
                return Err(ModelError::QuotaExceeded {
                    provider: PROVIDER.to_string(),
                    message: Some(message),
                });
            }

            return Err(ModelError::ModelResponseError(format!(
                "API error ({}): {}",
                status, message
            )));
        }

        let body: ChatResponse = response.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse Mistral response");
            ModelError::SerializationError(format!("Failed to parse response: {}", e))
        })?;

        if let Some(err) = body.error {
            error!(error = %err.message, "Mistral response carried an error object");
            return Err(ModelError::ModelResponseError(err.message));
        }

        let content = body
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or_else(|| {
                error!("No choices in Mistral response");
                ModelError::ModelResponseError("No content in API response".to_string())
            })?;

        let usage = body.usage.map(|u| ModelUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(ModelResponse {
            content,
            model_id: Some(self.model_id.clone()),
            usage,
        })
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn provider(&self) -> &str {
        PROVIDER
    }
}

// Chat completions request/response structures

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
    error: Option<ChatError>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatError {
    message: String,
}

#[derive(Debug, Deserialize)]
#[allow(clippy::struct_field_names)] // Matches API naming
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}
