//! Message bus for agent-to-agent communication.

use crate::collaboration::error::{CollaborationError, Result};
use crate::config::CommunicationMatrix;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

/// A message sent between agents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentMessage {
    /// Unique message identifier.
    pub id: Uuid,
    /// Name of the sending agent.
    pub sender: String,
    /// Name of the recipient agent.
    pub recipient: String,
    /// Message payload.
    pub content: Value,
    /// When the message was sent.
    pub timestamp: DateTime<Utc>,
}

impl AgentMessage {
    /// Creates a message stamped with a fresh id and the current time.
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>, content: Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender: sender.into(),
            recipient: recipient.into(),
            content,
            timestamp: Utc::now(),
        }
    }
}

type Channels = HashMap<String, mpsc::UnboundedSender<AgentMessage>>;

/// In-process message bus with one unbounded queue per agent.
#[derive(Debug, Clone, Default)]
pub struct MessageBus {
    /// Channels for each registered agent (name -> sender).
    channels: Arc<Mutex<Channels>>,
}

impl MessageBus {
    /// Creates a new message bus.
    pub fn new() -> Self {
        Self::default()
    }

    fn channels(&self) -> MutexGuard<'_, Channels> {
        // the map stays consistent even if a holder panicked
        self.channels.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers an agent and returns the receiver it listens on.
    ///
    /// Registering a name again replaces its channel; the previous receiver
    /// sees the bus as closed.
    pub async fn register_agent(
        &self,
        name: impl Into<String>,
    ) -> mpsc::UnboundedReceiver<AgentMessage> {
        let name = name.into();
        let (tx, rx) = mpsc::unbounded_channel();
        self.channels().insert(name.clone(), tx);
        debug!(agent = %name, "Registered agent with message bus");
        rx
    }

    /// Unregisters an agent. Returns `true` if it was registered.
    pub async fn unregister_agent(&self, name: &str) -> bool {
        let removed = self.channels().remove(name).is_some();
        debug!(agent = %name, removed, "Unregistered agent from message bus");
        removed
    }

    /// Returns `true` if `name` has a channel on the bus.
    pub async fn is_registered(&self, name: &str) -> bool {
        self.channels().contains_key(name)
    }

    /// Names of registered agents, sorted.
    pub async fn registered_agents(&self) -> Vec<String> {
        let mut names: Vec<_> = self.channels().keys().cloned().collect();
        names.sort();
        names
    }

    /// Sends `content` from `sender` to `recipient`.
    ///
    /// # Errors
    ///
    /// Returns error if the recipient is not registered or its receiver has
    /// been dropped.
    pub async fn send(&self, sender: &str, recipient: &str, content: Value) -> Result<Uuid> {
        let message = AgentMessage::new(sender, recipient, content);
        let message_id = message.id;

        let channels = self.channels();
        let channel = channels.get(recipient).ok_or_else(|| {
            CollaborationError::RecipientNotRegistered {
                recipient: recipient.to_string(),
            }
        })?;

        channel.send(message).map_err(|e| {
            warn!(recipient = %recipient, "Failed to send message (agent may have disconnected)");
            CollaborationError::DeliveryFailed {
                recipient: recipient.to_string(),
                reason: e.to_string(),
            }
        })?;

        debug!(
            sender = %sender,
            recipient = %recipient,
            message_id = %message_id,
            "Message delivered"
        );
        Ok(message_id)
    }

    /// Decodes raw model output with the `sender -> recipient` mode declared
    /// in `matrix` (text when undeclared) and sends it.
    ///
    /// # Errors
    ///
    /// Returns error if the output does not decode under a `json` mode, or
    /// if [`Self::send`] fails.
    pub async fn send_output(
        &self,
        sender: &str,
        recipient: &str,
        raw: &str,
        matrix: &CommunicationMatrix,
    ) -> Result<Uuid> {
        let mode = matrix.mode_or_default(sender, recipient);
        let content = mode.decode(raw).map_err(|source| CollaborationError::InvalidPayload {
            sender: sender.to_string(),
            recipient: recipient.to_string(),
            mode: mode.to_string(),
            source,
        })?;

        self.send(sender, recipient, content).await
    }

    /// Sends `content` to every registered agent except `sender`.
    ///
    /// Returns the number of agents reached. Closed receivers are skipped.
    pub async fn broadcast(&self, sender: &str, content: Value) -> usize {
        let channels = self.channels();
        let mut delivered = 0;

        for (name, channel) in channels.iter().filter(|(name, _)| name.as_str() != sender) {
            if channel.send(AgentMessage::new(sender, name.clone(), content.clone())).is_ok() {
                delivered += 1;
            }
        }

        debug!(sender = %sender, recipients = delivered, "Broadcast message sent");
        delivered
    }
}
