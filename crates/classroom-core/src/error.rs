//! Error types for the classroom pipeline.

use crate::agents::RegistryError;
use crate::collaboration::CollaborationError;
use crate::config::ConfigError;
use crate::storage::StorageError;
use classroom_abstraction::ModelError;
use thiserror::Error;

/// Core error type for classroom operations.
#[derive(Error, Debug)]
pub enum ClassroomError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Agent registry errors
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Message bus errors
    #[error("Collaboration error: {0}")]
    Collaboration(#[from] CollaborationError),

    /// Model-related errors
    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}

/// Result type alias for classroom operations.
pub type Result<T> = std::result::Result<T, ClassroomError>;
