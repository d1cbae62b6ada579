//! Model implementations for the classroom pipeline.
//!
//! This crate provides concrete implementations of the `Model` trait and the
//! adapter that exposes them through the `LanguageModel` convention.
//!
//! # Supported Providers
//!
//! - **Mock**: Testing and development
//! - **Mistral**: Mistral models on the hosted inference service (`GITHUB_TOKEN` required)
//!
//! # Example
//!
//! ```rust,no_run
//! use classroom_abstraction::LanguageModel;
//! use classroom_models::ModelAdapter;
//!
//! # async fn example() -> Result<(), classroom_abstraction::ModelError> {
//! let llm = ModelAdapter::from_env()?;
//! let generation = llm.generate("What is the capital of France?").await?;
//! println!("{}", generation.as_str());
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod factory;
pub mod fence;
pub mod mistral;
pub mod settings;

use async_trait::async_trait;
use classroom_abstraction::{
    ChatMessage, Model, ModelError, ModelParameters, ModelResponse, ModelUsage,
};
use tracing::debug;

pub use adapter::ModelAdapter;
pub use factory::{ModelConfig, ModelFactory, ModelType};
pub use fence::strip_code_fences;
pub use mistral::MistralModel;
pub use settings::ProviderSettings;

/// Scripted behaviour of a [`MockModel`].
#[derive(Debug, Clone, Default)]
enum MockBehavior {
    /// Echo the prompt back with some metadata.
    #[default]
    Echo,
    /// Always answer with the given content.
    Reply(String),
    /// Always fail with a request error carrying the given message.
    Fail(String),
}

/// A mock implementation of the `Model` trait for testing and demonstration.
#[derive(Debug, Default)]
pub struct MockModel {
    id: String,
    behavior: MockBehavior,
}

impl MockModel {
    /// Creates a new `MockModel` with the given ID.
    #[must_use]
    pub fn new(id: String) -> Self {
        Self {
            id,
            behavior: MockBehavior::Echo,
        }
    }

    /// Creates a `MockModel` that always answers with `content`.
    #[must_use]
    pub fn with_response(id: String, content: impl Into<String>) -> Self {
        Self {
            id,
            behavior: MockBehavior::Reply(content.into()),
        }
    }

    /// Creates a `MockModel` whose every call fails with a request error.
    #[must_use]
    pub fn failing(id: String, message: impl Into<String>) -> Self {
        Self {
            id,
            behavior: MockBehavior::Fail(message.into()),
        }
    }

    fn respond(&self, echo: String, prompt_tokens: u32) -> Result<ModelResponse, ModelError> {
        let content = match &self.behavior {
            MockBehavior::Echo => echo,
            MockBehavior::Reply(content) => content.clone(),
            MockBehavior::Fail(message) => return Err(ModelError::RequestError(message.clone())),
        };

        let completion_tokens = count_tokens(&content);
        let total_tokens = prompt_tokens + completion_tokens;

        Ok(ModelResponse {
            content,
            model_id: Some(self.id.clone()),
            usage: Some(ModelUsage {
                prompt_tokens,
                completion_tokens,
                total_tokens,
            }),
        })
    }
}

#[async_trait]
impl Model for MockModel {
    async fn generate_text(
        &self,
        prompt: &str,
        parameters: Option<ModelParameters>,
    ) -> Result<ModelResponse, ModelError> {
        debug!(
            model_id = %self.id,
            prompt = %prompt,
            parameters = ?parameters,
            "MockModel generating text"
        );

        let echo = format!(
            "Mock response for: {prompt}\nModel ID: {}\nParameters: {parameters:?}",
            self.id
        );

        self.respond(echo, count_tokens(prompt))
    }

    async fn generate_chat_completion(
        &self,
        messages: &[ChatMessage],
        parameters: Option<ModelParameters>,
    ) -> Result<ModelResponse, ModelError> {
        use std::fmt::Write;

        debug!(
            model_id = %self.id,
            message_count = messages.len(),
            parameters = ?parameters,
            "MockModel generating chat completion"
        );

        let mut conversation_summary = String::from("Conversation Summary:\n");
        for message in messages {
            let _ = writeln!(conversation_summary, "  {}: {}", message.role, message.content);
        }

        let echo = format!(
            "Mock chat response from {}\n{conversation_summary}\nParameters: {parameters:?}",
            self.id
        );

        let prompt_tokens = messages.iter().map(|m| count_tokens(&m.content)).sum::<u32>();
        self.respond(echo, prompt_tokens)
    }

    fn model_id(&self) -> &str {
        &self.id
    }

    fn provider(&self) -> &str {
        "mock"
    }
}

/// Count tokens in a string (simplified: word count).
#[allow(clippy::cast_possible_truncation)]
fn count_tokens(text: &str) -> u32 {
    text.split_whitespace().count() as u32
}
