//! Prompt template system.
//!
//! Provides loading and rendering of the prompt templates agents are driven by.
//!
//! # Example
//!
//! ```rust
//! use classroom_core::prompts::{PromptContext, PromptTemplate};
//!
//! let template = PromptTemplate::from_string("Design a short video about {{task}}.");
//! let prompt = template.render(&PromptContext::with_task("pendulums")).unwrap();
//! assert_eq!(prompt, "Design a short video about pendulums.");
//! ```

pub mod templates;

pub use templates::{
    PromptContext, PromptError, PromptTemplate, RenderOptions, TASK_PLACEHOLDER,
};
