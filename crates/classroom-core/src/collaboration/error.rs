//! Error types for agent collaboration.

/// Errors that can occur while agents exchange messages.
#[derive(Debug, thiserror::Error)]
pub enum CollaborationError {
    /// Recipient has no channel on the bus.
    #[error("recipient not registered: {recipient}")]
    RecipientNotRegistered {
        /// Name of the recipient agent.
        recipient: String,
    },

    /// The recipient's receiver was dropped.
    #[error("message delivery failed to recipient {recipient}: {reason}")]
    DeliveryFailed {
        /// Name of the recipient agent.
        recipient: String,
        /// Reason for delivery failure.
        reason: String,
    },

    /// Agent output does not match the declared communication mode.
    #[error("output from {sender} to {recipient} is not valid {mode}: {source}")]
    InvalidPayload {
        /// Name of the sending agent.
        sender: String,
        /// Name of the recipient agent.
        recipient: String,
        /// Declared mode.
        mode: String,
        /// Parse failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for collaboration operations.
pub type Result<T> = std::result::Result<T, CollaborationError>;
