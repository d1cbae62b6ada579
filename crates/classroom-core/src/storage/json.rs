//! JSON load/save helpers.

use crate::storage::error::{StorageError, StorageResult};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::{error, info, warn};

/// Loads a JSON document from `path`.
///
/// Returns an empty object when the file does not exist, cannot be read, or
/// does not contain valid JSON. Otherwise returns the parsed value verbatim;
/// no schema validation is performed.
pub fn load_json(path: impl AsRef<Path>) -> Value {
    let path = path.as_ref();

    if !path.exists() {
        warn!(path = %path.display(), "JSON file does not exist");
        return Value::Object(Map::new());
    }

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read JSON file");
            return Value::Object(Map::new());
        }
    };

    match serde_json::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "File contains invalid JSON");
            Value::Object(Map::new())
        }
    }
}

/// Saves `data` as pretty-printed JSON (2-space indentation) to `path`.
///
/// # Errors
///
/// Returns an error if `data` cannot be serialized or the file cannot be
/// written. The failure is logged before it is returned.
pub fn save_json<T>(data: &T, path: impl AsRef<Path>) -> StorageResult<()>
where
    T: Serialize + ?Sized,
{
    let path = path.as_ref();

    let result = serde_json::to_string_pretty(data)
        .map_err(StorageError::from)
        .and_then(|content| {
            fs::write(path, content)
                .map_err(|source| StorageError::Io {
                    path: path.to_path_buf(),
                    source,
                })
        });

    match &result {
        Ok(()) => info!(path = %path.display(), "Data successfully saved"),
        Err(e) => error!(path = %path.display(), error = %e, "Failed to save JSON"),
    }

    result
}
