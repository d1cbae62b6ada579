//! Classroom pipeline core.
//!
//! Glue between a hosted chat-completion model and the JSON configuration
//! that drives the lesson-video agents:
//!
//! - [`storage`]: tolerant JSON load, strict JSON save
//! - [`config`]: per-agent prompt templates and communication modes
//! - [`prompts`]: `{{task}}` template rendering
//! - [`agents`]: roles, capability registry, stage order
//! - [`collaboration`]: in-process message bus
//! - [`dispatch`]: prompt an agent and relay its output
//! - [`logging`]: tracing subscriber setup

pub mod agents;
pub mod collaboration;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod prompts;
pub mod storage;

pub use agents::{AgentRegistry, AgentRole, Capability, RegistryError, Stage, Workflow};
pub use collaboration::{AgentMessage, CollaborationError, MessageBus};
pub use config::{CommunicationMatrix, CommunicationMode, ConfigError, PipelineConfig};
pub use dispatch::AgentDispatcher;
pub use error::{ClassroomError, Result};
pub use prompts::{PromptContext, PromptError, PromptTemplate, RenderOptions};
pub use storage::{StorageError, StorageResult, load_json, save_json};
