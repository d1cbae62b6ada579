//! Pipeline configuration: per-agent prompt templates and communication modes.
//!
//! # Example JSON
//!
//! ```json
//! {
//!   "supervisor": {
//!     "prompt_template": "Design a short educational video about {{task}}.",
//!     "agent_communication": {
//!       "foreman": { "mode": "json" }
//!     }
//!   },
//!   "foreman": { "prompt": "Turn this structure into visual instructions: {{task}}" }
//! }
//! ```
//!
//! An agent's template is read from `prompt_template`, or from `prompt` when
//! `prompt_template` is absent. Other keys in an agent entry are ignored.

use crate::config::communication::{CommunicationMatrix, CommunicationMode};
use crate::config::{ConfigError, Result};
use crate::prompts::{PromptContext, PromptTemplate};
use crate::storage::{StorageResult, load_json, save_json};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// One agent entry. Keys other than these are ignored.
#[derive(Debug, Deserialize)]
struct RawAgentEntry {
    #[serde(default)]
    prompt: Option<String>,
    #[serde(default)]
    prompt_template: Option<String>,
    #[serde(default)]
    agent_communication: BTreeMap<String, RawLink>,
}

impl RawAgentEntry {
    /// `prompt_template` wins when both keys are present.
    fn into_template(self) -> Option<PromptTemplate> {
        self.prompt_template.or(self.prompt).map(PromptTemplate::from_string)
    }
}

#[derive(Debug, Deserialize)]
struct RawLink {
    mode: CommunicationMode,
}

/// Typed, validated pipeline configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineConfig {
    templates: BTreeMap<String, Option<PromptTemplate>>,
    matrix: CommunicationMatrix,
}

impl PipelineConfig {
    /// Loads and validates the configuration document at `path`.
    ///
    /// A missing or malformed file yields an empty configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the document parses but has an invalid structure.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = Self::from_value(&load_json(path))?;
        if config.is_empty() {
            warn!(path = %path.display(), "Pipeline configuration declares no agents");
        }
        Ok(config)
    }

    /// Builds the configuration from an already-parsed JSON document.
    ///
    /// # Errors
    ///
    /// Returns error if the document is not an object, an agent entry is
    /// malformed, or a communication target is not a declared agent.
    pub fn from_value(value: &Value) -> Result<Self> {
        let Value::Object(entries) = value else {
            return Err(ConfigError::InvalidDocument(format!(
                "expected an object of agents, found {}",
                json_kind(value)
            )));
        };

        let mut templates = BTreeMap::new();
        let mut links = Vec::new();

        for (agent, entry) in entries {
            let mut raw: RawAgentEntry =
                serde_json::from_value(entry.clone()).map_err(|e| ConfigError::InvalidAgent {
                    agent: agent.clone(),
                    reason: e.to_string(),
                })?;

            for (target, link) in std::mem::take(&mut raw.agent_communication) {
                links.push((agent.clone(), target, link.mode));
            }
            templates.insert(agent.clone(), raw.into_template());
        }

        let mut matrix = CommunicationMatrix::new();
        for (from, to, mode) in links {
            if !templates.contains_key(&to) {
                return Err(ConfigError::UnknownCommunicationTarget { from, to });
            }
            matrix.insert(from, to, mode);
        }

        debug!(agents = templates.len(), links = matrix.len(), "Pipeline configuration loaded");

        Ok(Self { templates, matrix })
    }

    /// Serializes the configuration back to its document shape.
    pub fn to_value(&self) -> Value {
        let mut document = Map::new();

        for (agent, template) in &self.templates {
            let mut entry = Map::new();
            if let Some(template) = template {
                entry.insert("prompt_template".to_string(), json!(template.content()));
            }

            let links: Map<String, Value> = self
                .matrix
                .iter()
                .filter(|(from, _, _)| from == agent)
                .map(|(_, to, mode)| (to.to_string(), json!({ "mode": mode })))
                .collect();
            if !links.is_empty() {
                entry.insert("agent_communication".to_string(), Value::Object(links));
            }

            document.insert(agent.clone(), Value::Object(entry));
        }

        Value::Object(document)
    }

    /// Saves the configuration as JSON.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> StorageResult<()> {
        save_json(&self.to_value(), path)
    }

    /// Declared agent names, sorted.
    pub fn agents(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// Returns `true` if `agent` is declared.
    pub fn contains_agent(&self, agent: &str) -> bool {
        self.templates.contains_key(agent)
    }

    /// Returns `true` if no agent is declared.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Returns the prompt template of `agent`, if it has one.
    pub fn template(&self, agent: &str) -> Option<&PromptTemplate> {
        self.templates.get(agent).and_then(Option::as_ref)
    }

    /// Renders `agent`'s template with `task` as the task description.
    ///
    /// # Errors
    ///
    /// Returns error if the agent is unknown, has no template, or the
    /// template cannot be rendered.
    pub fn render_prompt(&self, agent: &str, task: &str) -> Result<String> {
        let template = self
            .templates
            .get(agent)
            .ok_or_else(|| ConfigError::UnknownAgent(agent.to_string()))?
            .as_ref()
            .ok_or_else(|| ConfigError::MissingTemplate(agent.to_string()))?;

        Ok(template.render(&PromptContext::with_task(task))?)
    }

    /// Returns the declared mode for `from -> to`.
    pub fn communication_mode(&self, from: &str, to: &str) -> Option<CommunicationMode> {
        self.matrix.get(from, to)
    }

    /// Returns the communication matrix.
    pub fn matrix(&self) -> &CommunicationMatrix {
        &self.matrix
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
