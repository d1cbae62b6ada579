//! Adapter from a provider [`Model`] to the [`LanguageModel`] convention.
//!
//! Each call issues exactly one request to the wrapped model and strips the
//! code fences the model wrapped its answer in.

use crate::fence::strip_code_fences;
use crate::mistral::MistralModel;
use crate::settings::ProviderSettings;
use async_trait::async_trait;
use classroom_abstraction::{Generation, LanguageModel, Model, ModelError};
use std::sync::Arc;
use tracing::debug;

/// Wraps a provider model behind the prompt-in, text-out convention.
#[derive(Clone)]
pub struct ModelAdapter {
    model: Arc<dyn Model + Send + Sync>,
}

impl std::fmt::Debug for ModelAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelAdapter")
            .field("provider", &self.model.provider())
            .field("model_id", &self.model.model_id())
            .finish()
    }
}

impl ModelAdapter {
    /// Creates an adapter around an existing model.
    pub fn new(model: Arc<dyn Model + Send + Sync>) -> Self {
        Self { model }
    }

    /// Builds a Mistral-backed adapter from the process environment.
    ///
    /// # Errors
    /// Returns `ModelError::Configuration` if the credential is missing; no
    /// request is attempted in that case.
    pub fn from_env() -> Result<Self, ModelError> {
        Self::from_settings(&ProviderSettings::from_env()?)
    }

    /// Builds a Mistral-backed adapter from an arbitrary variable lookup.
    ///
    /// # Errors
    /// Returns `ModelError::Configuration` if the credential is missing; no
    /// request is attempted in that case.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ModelError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_settings(&ProviderSettings::from_lookup(lookup)?)
    }

    /// Builds a Mistral-backed adapter from explicit settings.
    ///
    /// # Errors
    /// Returns a `ModelError` if the HTTP client cannot be built.
    pub fn from_settings(settings: &ProviderSettings) -> Result<Self, ModelError> {
        Ok(Self::new(Arc::new(MistralModel::from_settings(settings)?)))
    }

    /// Returns the wrapped model.
    pub fn inner(&self) -> &Arc<dyn Model + Send + Sync> {
        &self.model
    }
}

#[async_trait]
impl LanguageModel for ModelAdapter {
    async fn generate(&self, prompt: &str) -> Result<Generation, ModelError> {
        let response = self.model.generate_text(prompt, None).await?;
        let cleaned = strip_code_fences(&response.content);

        debug!(
            model_id = %self.model.model_id(),
            raw_len = response.content.len(),
            cleaned_len = cleaned.len(),
            "Model response post-processed"
        );

        Ok(Generation::from_output(cleaned))
    }

    fn llm_type(&self) -> &str {
        self.model.provider()
    }

    fn model_id(&self) -> &str {
        self.model.model_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockModel;

    #[tokio::test]
    async fn test_generate_strips_fences() {
        let mock = MockModel::with_response("m".to_string(), "```json\n{\"ok\": true}\n```");
        let adapter = ModelAdapter::new(Arc::new(mock));

        let generation = adapter.generate("give me json").await.unwrap();
        assert_eq!(generation, Generation::Text("{\"ok\": true}".to_string()));
    }

    #[tokio::test]
    async fn test_blank_answer_is_empty_generation() {
        let adapter = ModelAdapter::new(Arc::new(MockModel::with_response("m".to_string(), "")));
        assert_eq!(adapter.generate("anything").await.unwrap(), Generation::Empty);

        let adapter =
            ModelAdapter::new(Arc::new(MockModel::with_response("m".to_string(), "```\n```")));
        assert_eq!(adapter.generate("anything").await.unwrap(), Generation::Empty);
    }

    #[tokio::test]
    async fn test_failure_is_distinguishable_from_empty() {
        let adapter = ModelAdapter::new(Arc::new(MockModel::failing("m".to_string(), "boom")));

        let err = adapter.generate("anything").await.unwrap_err();
        assert_eq!(err, ModelError::RequestError("boom".to_string()));
        assert_eq!(adapter.call("anything").await, "");
    }

    #[test]
    fn test_identity_comes_from_wrapped_model() {
        let adapter = ModelAdapter::new(Arc::new(MockModel::new("mock-1".to_string())));
        assert_eq!(adapter.llm_type(), "mock");
        assert_eq!(LanguageModel::model_id(&adapter), "mock-1");
        assert!(format!("{adapter:?}").contains("mock-1"));
    }
}
