//! Prompt an agent and hand its output to the next one.

use crate::collaboration::MessageBus;
use crate::config::PipelineConfig;
use crate::error::Result;
use classroom_abstraction::{Generation, LanguageModel};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Connects pipeline configuration, a language model, and the message bus.
pub struct AgentDispatcher {
    config: PipelineConfig,
    model: Arc<dyn LanguageModel>,
    bus: MessageBus,
}

impl AgentDispatcher {
    /// Creates a dispatcher.
    pub fn new(config: PipelineConfig, model: Arc<dyn LanguageModel>, bus: MessageBus) -> Self {
        Self { config, model, bus }
    }

    /// The pipeline configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The message bus.
    pub fn bus(&self) -> &MessageBus {
        &self.bus
    }

    /// Renders `agent`'s prompt for `task` and generates a reply.
    ///
    /// # Errors
    ///
    /// Returns error if the prompt cannot be rendered or generation fails.
    pub async fn prompt(&self, agent: &str, task: &str) -> Result<Generation> {
        let prompt = self.config.render_prompt(agent, task)?;
        debug!(agent = %agent, llm_type = self.model.llm_type(), "Prompting agent");

        let generation = self.model.generate(&prompt).await?;
        if generation.is_empty() {
            warn!(agent = %agent, "Model returned no content");
        }
        Ok(generation)
    }

    /// Prompts `from` with `task` and sends a non-empty reply to `to`.
    ///
    /// Returns the id of the sent message, or `None` when there was nothing
    /// to send.
    ///
    /// # Errors
    ///
    /// Returns error if prompting fails, the reply does not fit the declared
    /// communication mode, or delivery fails.
    pub async fn relay(&self, from: &str, to: &str, task: &str) -> Result<Option<Uuid>> {
        let generation = self.prompt(from, task).await?;
        let Generation::Text(output) = generation else {
            return Ok(None);
        };

        let message_id = self.bus.send_output(from, to, &output, self.config.matrix()).await?;
        info!(from = %from, to = %to, message_id = %message_id, "Relayed agent output");
        Ok(Some(message_id))
    }
}
