//! Agent collaboration over an in-process message bus.

pub mod error;
mod message_bus;

pub use error::{CollaborationError, Result};
pub use message_bus::{AgentMessage, MessageBus};
