//! Pipeline configuration.
//!
//! The configuration is a JSON document keyed by agent name. Each agent may
//! carry a prompt template and a table of communication modes towards other
//! agents. Structure is validated when the document is loaded.

mod communication;
mod pipeline;

pub use communication::{CommunicationMatrix, CommunicationMode};
pub use pipeline::PipelineConfig;

use crate::prompts::PromptError;
use thiserror::Error;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The document is not an object of agents.
    #[error("invalid configuration document: {0}")]
    InvalidDocument(String),

    /// An agent entry could not be parsed.
    #[error("invalid configuration for agent '{agent}': {reason}")]
    InvalidAgent {
        /// Agent name.
        agent: String,
        /// Parse failure.
        reason: String,
    },

    /// A communication mode names an agent that is not declared.
    #[error("agent '{from}' declares communication with unknown agent '{to}'")]
    UnknownCommunicationTarget {
        /// Declaring agent.
        from: String,
        /// Undeclared target.
        to: String,
    },

    /// Agent is not declared.
    #[error("unknown agent: {0}")]
    UnknownAgent(String),

    /// Agent has no prompt template.
    #[error("agent '{0}' has no prompt template")]
    MissingTemplate(String),

    /// Template rendering failed.
    #[error("prompt error: {0}")]
    Prompt(#[from] PromptError),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
