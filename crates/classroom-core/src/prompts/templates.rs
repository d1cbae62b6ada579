//! Prompt template loading and rendering.
//!
//! Templates use `{{KEY}}` placeholders. Whitespace inside the braces is
//! ignored, so `{{ task }}` and `{{task}}` are the same placeholder.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Prompt template errors.
#[derive(Debug, Error)]
pub enum PromptError {
    /// Template file not found.
    #[error("template not found: {0}")]
    NotFound(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing placeholder value.
    #[error("missing placeholder value: {0}")]
    MissingPlaceholder(String),

    /// Invalid template syntax.
    #[error("invalid template syntax: {0}")]
    InvalidSyntax(String),
}

/// Result type for prompt operations.
pub type Result<T> = std::result::Result<T, PromptError>;

/// Values substituted into a template.
#[derive(Debug, Clone, Default)]
pub struct PromptContext {
    values: HashMap<String, String>,
}

impl PromptContext {
    /// Create a new empty context.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Create a context holding only the `task` value.
    pub fn with_task(task: impl Into<String>) -> Self {
        let mut context = Self::new();
        context.set(TASK_PLACEHOLDER, task);
        context
    }

    /// Set a context value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Get a context value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Check if context contains a key.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Remove a context value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }
}

/// Placeholder the pipeline fills with the caller's task description.
pub const TASK_PLACEHOLDER: &str = "task";

/// Prompt template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    /// Template content.
    content: String,

    /// Template file path (if loaded from file).
    file_path: Option<PathBuf>,
}

impl PromptTemplate {
    /// Load a prompt template from a file.
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(PromptError::NotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path)?;
        Ok(Self {
            content,
            file_path: Some(path.to_path_buf()),
        })
    }

    /// Create a template from a string.
    pub fn from_string(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            file_path: None,
        }
    }

    /// Get the template content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Get the template file path.
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// List the distinct placeholders in order of first appearance.
    pub fn placeholders(&self) -> Vec<String> {
        let mut names = Vec::new();
        for segment in Segments::new(&self.content) {
            if let Segment::Placeholder(name) = segment {
                if !names.iter().any(|n| n == name) {
                    names.push(name.to_string());
                }
            }
        }
        names
    }

    /// Render the template strictly: every placeholder needs a value.
    ///
    /// # Errors
    ///
    /// Returns error if a placeholder is missing from the context or a `{{`
    /// is never closed.
    pub fn render(&self, context: &PromptContext) -> Result<String> {
        self.render_with_options(context, &RenderOptions::default())
    }

    /// Render the template with custom options.
    ///
    /// # Errors
    ///
    /// Returns error if a required placeholder is missing from the context or
    /// a `{{` is never closed.
    pub fn render_with_options(
        &self,
        context: &PromptContext,
        options: &RenderOptions,
    ) -> Result<String> {
        let mut rendered = String::with_capacity(self.content.len());

        for segment in Segments::new(&self.content) {
            match segment {
                Segment::Literal(text) => rendered.push_str(text),
                Segment::Placeholder(name) => match context.get(name) {
                    Some(value) => rendered.push_str(value),
                    None if options.strict => {
                        return Err(PromptError::MissingPlaceholder(name.to_string()));
                    }
                    None => rendered.push_str(options.default_value.as_deref().unwrap_or("")),
                },
                Segment::Unclosed(offset) => {
                    return Err(PromptError::InvalidSyntax(format!(
                        "unclosed placeholder at byte {offset}"
                    )));
                }
            }
        }

        Ok(rendered)
    }
}

/// Options for template rendering.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Strict mode: error if placeholder is missing.
    pub strict: bool,

    /// Value for missing placeholders (only used if not strict).
    pub default_value: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            strict: true,
            default_value: None,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
    Unclosed(usize),
}

/// Splits template content into literal text and `{{...}}` placeholders.
///
/// `{{}}` and `{{  }}` are kept as literal text.
struct Segments<'a> {
    content: &'a str,
    pos: usize,
}

impl<'a> Segments<'a> {
    fn new(content: &'a str) -> Self {
        Self { content, pos: 0 }
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.content[self.pos..];
        if rest.is_empty() {
            return None;
        }

        let Some(open) = rest.find("{{") else {
            self.pos = self.content.len();
            return Some(Segment::Literal(rest));
        };

        if open > 0 {
            self.pos += open;
            return Some(Segment::Literal(&rest[..open]));
        }

        let start = self.pos;
        let Some(close) = rest[2..].find("}}") else {
            self.pos = self.content.len();
            return Some(Segment::Unclosed(start));
        };

        let end = 2 + close + 2;
        self.pos += end;

        let name = rest[2..2 + close].trim();
        if name.is_empty() {
            Some(Segment::Literal(&rest[..end]))
        } else {
            Some(Segment::Placeholder(name))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_prompt_context() {
        let mut context = PromptContext::new();
        context.set("name", "World");
        context.set("greeting", "Hello");

        assert_eq!(context.get("name"), Some("World"));
        assert!(context.contains("greeting"));
        assert!(!context.contains("missing"));
        assert_eq!(context.remove("name"), Some("World".to_string()));
        assert!(!context.contains("name"));
    }

    #[test]
    fn test_context_with_task() {
        let context = PromptContext::with_task("explain sine waves");
        assert_eq!(context.get("task"), Some("explain sine waves"));
    }

    #[test]
    fn test_template_load() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"Explain {{task}}.").unwrap();
        file.flush().unwrap();

        let template = PromptTemplate::load(file.path()).unwrap();
        assert_eq!(template.content(), "Explain {{task}}.");
        assert!(template.file_path().is_some());
    }

    #[test]
    fn test_template_load_missing() {
        let result = PromptTemplate::load("/definitely/not/here.md");
        assert!(matches!(result, Err(PromptError::NotFound(_))));
    }

    #[test]
    fn test_template_render() {
        let template = PromptTemplate::from_string("Design a video about {{task}}.");
        let result = template.render(&PromptContext::with_task("pendulums")).unwrap();
        assert_eq!(result, "Design a video about pendulums.");
    }

    #[test]
    fn test_template_render_whitespace_in_braces() {
        let template = PromptTemplate::from_string("A {{ task }} and {{task}}");
        let result = template.render(&PromptContext::with_task("x")).unwrap();
        assert_eq!(result, "A x and x");
    }

    #[test]
    fn test_missing_placeholder_is_strict_by_default() {
        let template = PromptTemplate::from_string("Hello {{name}}!");
        let result = template.render(&PromptContext::new());
        assert!(matches!(result, Err(PromptError::MissingPlaceholder(name)) if name == "name"));
    }

    #[test]
    fn test_lenient_render_with_default_value() {
        let template = PromptTemplate::from_string("Hello {{name}}!");
        let context = PromptContext::new();

        let options = RenderOptions {
            strict: false,
            default_value: None,
        };
        assert_eq!(template.render_with_options(&context, &options).unwrap(), "Hello !");

        let options = RenderOptions {
            strict: false,
            default_value: Some("stranger".to_string()),
        };
        assert_eq!(template.render_with_options(&context, &options).unwrap(), "Hello stranger!");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let template = PromptTemplate::from_string("{{task}}");
        let result = template.render(&PromptContext::with_task("{{task}}")).unwrap();
        assert_eq!(result, "{{task}}");
    }

    #[test]
    fn test_single_braces_are_literal() {
        let template = PromptTemplate::from_string(r#"Respond with {"segments": []} for {{task}}"#);
        assert_eq!(template.placeholders(), vec!["task"]);
        let result = template.render(&PromptContext::with_task("waves")).unwrap();
        assert_eq!(result, r#"Respond with {"segments": []} for waves"#);
    }

    #[test]
    fn test_placeholders() {
        let template =
            PromptTemplate::from_string("{{greeting}} {{name}}! {{ greeting }} again. {{}}");
        assert_eq!(template.placeholders(), vec!["greeting", "name"]);
    }

    #[test]
    fn test_empty_placeholder_is_literal() {
        let template = PromptTemplate::from_string("a {{}} b");
        assert_eq!(template.render(&PromptContext::new()).unwrap(), "a {{}} b");
    }

    #[test]
    fn test_unclosed_placeholder() {
        let template = PromptTemplate::from_string("ok {{task");
        let result = template.render(&PromptContext::with_task("x"));
        assert!(matches!(result, Err(PromptError::InvalidSyntax(_))));
    }
}
