//! Startup configuration for the hosted model provider.
//!
//! The credential is read once, validated, and carried in an explicit struct
//! instead of being looked up ad hoc while building clients.
//!
//! Variables set in the process environment take precedence over the same
//! variables in a `.env` file.

use classroom_abstraction::{ModelError, ModelParameters};
use std::collections::HashMap;
use std::env;
use std::path::Path;
use tracing::debug;

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "GITHUB_TOKEN";

/// Optional environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "CLASSROOM_MODEL_BASE_URL";

/// Optional environment variable overriding the model identifier.
pub const MODEL_ID_ENV: &str = "CLASSROOM_MODEL_ID";

/// Base URL of the hosted inference service.
pub const DEFAULT_BASE_URL: &str = "https://models.inference.ai.azure.com";

/// Model used when none is configured.
pub const DEFAULT_MODEL_ID: &str = "Mistral-large-2407";

/// System message sent ahead of every single-prompt request.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Validated provider settings.
#[derive(Clone, PartialEq)]
pub struct ProviderSettings {
    /// The API key for authentication.
    pub api_key: String,
    /// Base URL of the hosted service.
    pub base_url: String,
    /// The model identifier.
    pub model_id: String,
    /// System message prepended to single-prompt requests.
    pub system_prompt: String,
    /// Default generation parameters.
    pub parameters: ModelParameters,
}

impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model_id", &self.model_id)
            .field("system_prompt", &self.system_prompt)
            .field("parameters", &self.parameters)
            .finish()
    }
}

impl ProviderSettings {
    /// Creates settings with the given API key and the fixed defaults.
    ///
    /// # Errors
    /// Returns `ModelError::Configuration` if the key is empty or blank.
    pub fn new(api_key: String) -> Result<Self, ModelError> {
        if api_key.trim().is_empty() {
            return Err(ModelError::Configuration(format!(
                "{API_KEY_ENV} environment variable not set"
            )));
        }

        Ok(Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            parameters: ModelParameters::default(),
        })
    }

    /// Loads settings from the process environment, falling back to a `.env`
    /// file in the current directory or one of its parents.
    ///
    /// # Errors
    /// Returns `ModelError::Configuration` if `GITHUB_TOKEN` is not set or the
    /// `.env` file cannot be parsed.
    pub fn from_env() -> Result<Self, ModelError> {
        let file_vars = match dotenvy::dotenv_iter() {
            Ok(iter) => collect_env_file(iter)?,
            Err(e) if e.not_found() => HashMap::new(),
            Err(e) => return Err(env_file_error(&e)),
        };
        Self::from_process_env_or(&file_vars)
    }

    /// Loads settings from the process environment, falling back to the
    /// `.env` file at `path`.
    ///
    /// # Errors
    /// Returns `ModelError::Configuration` if the file cannot be read or
    /// parsed, or `GITHUB_TOKEN` is set in neither place.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let iter = dotenvy::from_path_iter(path.as_ref()).map_err(|e| env_file_error(&e))?;
        Self::from_process_env_or(&collect_env_file(iter)?)
    }

    #[allow(clippy::disallowed_methods)] // env::var is needed for API key loading
    fn from_process_env_or(file_vars: &HashMap<String, String>) -> Result<Self, ModelError> {
        Self::from_lookup(|name| env::var(name).ok().or_else(|| file_vars.get(name).cloned()))
    }

    /// Loads settings using an arbitrary variable lookup.
    ///
    /// `GITHUB_TOKEN` is required. `CLASSROOM_MODEL_BASE_URL` and
    /// `CLASSROOM_MODEL_ID` override the defaults when set and non-blank.
    ///
    /// # Errors
    /// Returns `ModelError::Configuration` if the API key variable is missing or blank.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ModelError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let mut settings = Self::new(lookup(API_KEY_ENV).unwrap_or_default())?;
        if let Some(base_url) = non_blank(BASE_URL_ENV) {
            settings = settings.with_base_url(base_url);
        }
        if let Some(model_id) = non_blank(MODEL_ID_ENV) {
            settings = settings.with_model_id(model_id);
        }
        Ok(settings)
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the model identifier.
    #[must_use]
    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    /// Sets the system prompt.
    #[must_use]
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    /// Sets the default generation parameters.
    #[must_use]
    pub fn with_parameters(mut self, parameters: ModelParameters) -> Self {
        self.parameters = parameters;
        self
    }
}

fn collect_env_file<I>(iter: I) -> Result<HashMap<String, String>, ModelError>
where
    I: IntoIterator<Item = dotenvy::Result<(String, String)>>,
{
    let vars = iter
        .into_iter()
        .collect::<dotenvy::Result<HashMap<_, _>>>()
        .map_err(|e| env_file_error(&e))?;
    debug!(count = vars.len(), "Read variables from .env file");
    Ok(vars)
}

fn env_file_error(e: &dotenvy::Error) -> ModelError {
    ModelError::Configuration(format!("failed to load .env file: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_credential_is_configuration_error() {
        let result = ProviderSettings::from_lookup(|_| None);
        match result {
            Err(ModelError::Configuration(msg)) => assert!(msg.contains("GITHUB_TOKEN")),
            other => panic!("Expected Configuration error, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_credential_is_rejected() {
        let result = ProviderSettings::from_lookup(|_| Some("   ".to_string()));
        assert!(matches!(result, Err(ModelError::Configuration(_))));
    }

    #[test]
    fn test_defaults_from_lookup() {
        let settings = ProviderSettings::from_lookup(|name| {
            (name == "GITHUB_TOKEN").then(|| "ghp_test".to_string())
        })
        .unwrap();

        assert_eq!(settings.api_key, "ghp_test");
        assert_eq!(settings.base_url, "https://models.inference.ai.azure.com");
        assert_eq!(settings.model_id, "Mistral-large-2407");
        assert_eq!(settings.system_prompt, "You are a helpful assistant.");
        assert_eq!(settings.parameters, ModelParameters::default());
    }

    #[test]
    fn test_builders() {
        let settings = ProviderSettings::new("k".to_string())
            .unwrap()
            .with_base_url("http://localhost:1234")
            .with_model_id("mistral-small")
            .with_system_prompt("Be brief.");

        assert_eq!(settings.base_url, "http://localhost:1234");
        assert_eq!(settings.model_id, "mistral-small");
        assert_eq!(settings.system_prompt, "Be brief.");
    }

    #[test]
    fn test_overrides_from_lookup() {
        let settings = ProviderSettings::from_lookup(|name| match name {
            "GITHUB_TOKEN" => Some("ghp_test".to_string()),
            "CLASSROOM_MODEL_BASE_URL" => Some("http://127.0.0.1:9".to_string()),
            "CLASSROOM_MODEL_ID" => Some("  ".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(settings.base_url, "http://127.0.0.1:9");
        assert_eq!(settings.model_id, DEFAULT_MODEL_ID);
    }

    #[test]
    fn test_env_file_supplies_credential() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".env");
        fs::write(
            &path,
            "# provider\nGITHUB_TOKEN=ghp_from_file\nCLASSROOM_MODEL_ID=\"mistral-small\"\n",
        )
        .unwrap();

        let settings = ProviderSettings::from_env_file(&path).unwrap();

        // the process environment wins when it already holds the variable
        let expected_key = env::var(API_KEY_ENV).unwrap_or_else(|_| "ghp_from_file".to_string());
        let expected_model =
            env::var(MODEL_ID_ENV).unwrap_or_else(|_| "mistral-small".to_string());
        assert_eq!(settings.api_key, expected_key);
        assert_eq!(settings.model_id, expected_model);
    }

    #[test]
    fn test_missing_env_file_is_configuration_error() {
        let temp = TempDir::new().unwrap();
        let result = ProviderSettings::from_env_file(temp.path().join(".env"));
        assert!(matches!(result, Err(ModelError::Configuration(msg)) if msg.contains(".env")));
    }

    #[test]
    fn test_malformed_env_file_is_configuration_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".env");
        fs::write(&path, "GITHUB_TOKEN='unterminated\n").unwrap();

        let result = ProviderSettings::from_env_file(&path);
        assert!(matches!(result, Err(ModelError::Configuration(_))));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let settings = ProviderSettings::new("super-secret".to_string()).unwrap();
        let debug = format!("{settings:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
