//! Document persistence.
//!
//! Reading is tolerant: a missing or malformed document degrades to an empty
//! object. Writing is strict: every failure is logged and returned.

pub mod error;
pub mod json;

pub use error::{StorageError, StorageResult};
pub use json::{load_json, save_json};
