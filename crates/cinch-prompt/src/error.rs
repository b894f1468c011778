//! Error types for the fallible edges of prompt assembly.
//!
//! Assembling a prompt never fails. Errors only surface from the explicit
//! loading and rendering helpers: reading a context file, parsing it, or
//! rendering an override template.

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by context loading and template rendering.
#[derive(Error, Debug)]
pub enum PromptError {
    /// A file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A prompt context document was not valid JSON for [`PromptContext`](crate::PromptContext).
    #[error("invalid prompt context in {}: {source}", path.display())]
    InvalidContext {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The override template failed to parse or render.
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
}

/// Result alias for prompt operations.
pub type Result<T> = std::result::Result<T, PromptError>;
