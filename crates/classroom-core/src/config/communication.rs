//! Inter-agent communication modes.
//!
//! A mode declares how one agent's raw output is read by another: as plain
//! text, or as a JSON document.

use classroom_models::strip_code_fences;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// How an agent's output is interpreted by its recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommunicationMode {
    /// Free-form text.
    #[default]
    Text,
    /// A JSON document.
    Json,
}

impl CommunicationMode {
    /// Returns the mode's configuration tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
        }
    }

    /// Turns raw agent output into a message payload.
    ///
    /// `Text` wraps the output in a JSON string. `Json` parses it, after
    /// removing a surrounding code fence.
    ///
    /// # Errors
    ///
    /// Returns the parse error if the mode is `Json` and the output is not
    /// valid JSON.
    pub fn decode(&self, raw: &str) -> Result<Value, serde_json::Error> {
        match self {
            Self::Text => Ok(Value::String(raw.to_string())),
            Self::Json => serde_json::from_str(strip_code_fences(raw).trim()),
        }
    }
}

impl fmt::Display for CommunicationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommunicationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown communication mode: {other}")),
        }
    }
}

/// Lookup from an ordered `(from, to)` agent pair to a communication mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommunicationMatrix {
    modes: BTreeMap<(String, String), CommunicationMode>,
}

impl CommunicationMatrix {
    /// Creates an empty matrix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the mode for `from -> to`, replacing any previous declaration.
    pub fn insert(
        &mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        mode: CommunicationMode,
    ) -> Option<CommunicationMode> {
        self.modes.insert((from.into(), to.into()), mode)
    }

    /// Returns the declared mode for `from -> to`.
    pub fn get(&self, from: &str, to: &str) -> Option<CommunicationMode> {
        self.modes.get(&(from.to_string(), to.to_string())).copied()
    }

    /// Returns the declared mode for `from -> to`, or `Text` if undeclared.
    pub fn mode_or_default(&self, from: &str, to: &str) -> CommunicationMode {
        self.get(from, to).unwrap_or_default()
    }

    /// Iterates over `(from, to, mode)` in sorted pair order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, CommunicationMode)> {
        self.modes.iter().map(|((from, to), mode)| (from.as_str(), to.as_str(), *mode))
    }

    /// Returns the targets `from` has declared modes for.
    pub fn targets_of<'a>(&'a self, from: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.iter().filter(move |(f, _, _)| *f == from).map(|(_, to, _)| to)
    }

    /// Number of declared pairs.
    pub fn len(&self) -> usize {
        self.modes.len()
    }

    /// Returns `true` if no pair is declared.
    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mode_serde() {
        let mode: CommunicationMode = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(mode, CommunicationMode::Json);
        assert_eq!(serde_json::to_string(&CommunicationMode::Text).unwrap(), "\"text\"");
        assert!(serde_json::from_str::<CommunicationMode>("\"xml\"").is_err());
    }

    #[test]
    fn test_mode_from_str_and_display() {
        assert_eq!("JSON".parse::<CommunicationMode>().unwrap(), CommunicationMode::Json);
        assert_eq!(CommunicationMode::Text.to_string(), "text");
        assert!("yaml".parse::<CommunicationMode>().is_err());
    }

    #[test]
    fn test_decode_text() {
        let payload = CommunicationMode::Text.decode("Draw a circle").unwrap();
        assert_eq!(payload, json!("Draw a circle"));
    }

    #[test]
    fn test_decode_json_strips_fences() {
        let payload = CommunicationMode::Json
            .decode("```json\n{\"instructions\": [{\"timeframe\": \"0-5 seconds\"}]}\n```")
            .unwrap();
        assert_eq!(payload, json!({"instructions": [{"timeframe": "0-5 seconds"}]}));
    }

    #[test]
    fn test_decode_invalid_json() {
        assert!(CommunicationMode::Json.decode("Invalid JSON").is_err());
    }

    #[test]
    fn test_matrix_lookup_is_ordered() {
        let mut matrix = CommunicationMatrix::new();
        matrix.insert("supervisor", "foreman", CommunicationMode::Json);

        assert_eq!(matrix.get("supervisor", "foreman"), Some(CommunicationMode::Json));
        assert_eq!(matrix.get("foreman", "supervisor"), None);
        assert_eq!(matrix.mode_or_default("foreman", "supervisor"), CommunicationMode::Text);
        assert_eq!(matrix.len(), 1);
    }

    #[test]
    fn test_matrix_targets() {
        let mut matrix = CommunicationMatrix::new();
        matrix.insert("supervisor", "foreman", CommunicationMode::Json);
        matrix.insert("supervisor", "code_generator", CommunicationMode::Text);
        matrix.insert("foreman", "code_generator", CommunicationMode::Json);

        let targets: Vec<_> = matrix.targets_of("supervisor").collect();
        assert_eq!(targets, vec!["code_generator", "foreman"]);
        assert!(CommunicationMatrix::new().is_empty());
    }
}
