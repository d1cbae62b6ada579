//! Model factory for creating model instances from configuration.
//!
//! This module provides functionality to create model instances based on configuration,
//! handling API key loading from environment variables.

use crate::settings::ProviderSettings;
use crate::{MistralModel, MockModel};
use classroom_abstraction::{Model, ModelError};
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// Model type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelType {
    /// Mock model for testing.
    Mock,
    /// Mistral model on the hosted inference service.
    Mistral,
}

impl FromStr for ModelType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mock" => Ok(Self::Mock),
            "mistral" | "github" => Ok(Self::Mistral),
            other => Err(ModelError::UnsupportedModelProvider(other.to_string())),
        }
    }
}

/// Model configuration.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// The type of model to create.
    pub model_type: ModelType,
    /// The model ID (e.g., "Mistral-large-2407").
    pub model_id: String,
    /// Optional API key (if not provided, will be loaded from environment).
    pub api_key: Option<String>,
    /// Optional base URL override.
    pub base_url: Option<String>,
}

impl ModelConfig {
    /// Creates a new `ModelConfig` with the given type and model ID.
    #[must_use]
    pub fn new(model_type: ModelType, model_id: String) -> Self {
        Self {
            model_type,
            model_id,
            api_key: None,
            base_url: None,
        }
    }

    /// Sets the API key for this configuration.
    #[must_use]
    pub fn with_api_key(mut self, api_key: String) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// Sets the base URL for this configuration.
    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }
}

/// Factory for creating model instances.
pub struct ModelFactory;

impl ModelFactory {
    /// Creates a model instance from the given configuration.
    ///
    /// # Errors
    /// Returns a `ModelError` if model creation fails (e.g., missing API key).
    pub fn create(config: ModelConfig) -> Result<Arc<dyn Model + Send + Sync>, ModelError> {
        debug!(
            model_type = ?config.model_type,
            model_id = %config.model_id,
            "Creating model instance"
        );

        match config.model_type {
            ModelType::Mock => Ok(Arc::new(MockModel::new(config.model_id))),
            ModelType::Mistral => {
                let settings = match config.api_key {
                    Some(api_key) => ProviderSettings::new(api_key)?,
                    None => ProviderSettings::from_env()?,
                };
                let settings = settings.with_model_id(config.model_id);
                let settings = match config.base_url {
                    Some(base_url) => settings.with_base_url(base_url),
                    None => settings,
                };
                Self::from_settings(&settings)
            }
        }
    }

    /// Creates a model instance from a type string.
    ///
    /// # Errors
    /// Returns a `ModelError` if the type is unknown or model creation fails.
    pub fn create_from_str(
        model_type: &str,
        model_id: String,
    ) -> Result<Arc<dyn Model + Send + Sync>, ModelError> {
        let model_type = model_type.parse::<ModelType>()?;
        Self::create(ModelConfig::new(model_type, model_id))
    }

    /// Creates a Mistral model from validated settings.
    ///
    /// # Errors
    /// Returns a `ModelError` if the HTTP client cannot be built.
    pub fn from_settings(
        settings: &ProviderSettings,
    ) -> Result<Arc<dyn Model + Send + Sync>, ModelError> {
        Ok(Arc::new(MistralModel::from_settings(settings)?))
    }

    /// Creates a Mistral model from `GITHUB_TOKEN` and the default settings.
    ///
    /// # Errors
    /// Returns a `ModelError::Configuration` if the credential is not set.
    pub fn from_env() -> Result<Arc<dyn Model + Send + Sync>, ModelError> {
        Self::from_settings(&ProviderSettings::from_env()?)
    }

    /// Creates a Mistral model from an arbitrary variable lookup.
    ///
    /// # Errors
    /// Returns a `ModelError::Configuration` if the credential is missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Arc<dyn Model + Send + Sync>, ModelError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_settings(&ProviderSettings::from_lookup(lookup)?)
    }
}
