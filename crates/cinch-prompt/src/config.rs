//! Loading prompt contexts and assembler options.

use std::path::Path;

use crate::context::PromptContext;
use crate::error::{PromptError, Result};
use crate::template::TEMPLATE_FILE;

/// Knobs for [`PromptAssembler`](crate::PromptAssembler).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblerOptions {
    /// File name looked up under `<workspace>/.cinch/`.
    pub template_file_name: String,
    /// When false, the override template is never consulted.
    pub use_override: bool,
}

impl Default for AssemblerOptions {
    fn default() -> Self {
        Self {
            template_file_name: TEMPLATE_FILE.to_string(),
            use_override: true,
        }
    }
}

impl AssemblerOptions {
    pub fn without_override() -> Self {
        Self {
            use_override: false,
            ..Self::default()
        }
    }

    pub fn with_template_file_name(mut self, name: impl Into<String>) -> Self {
        self.template_file_name = name.into();
        self
    }
}

/// Read a JSON prompt context (camelCase keys) from `path`.
pub fn load_context(path: impl AsRef<Path>) -> Result<PromptContext> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| PromptError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    PromptContext::from_json_str(&json).map_err(|source| PromptError::InvalidContext {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::PromptMode;

    #[test]
    fn loads_valid_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ctx.json");
        std::fs::write(&path, r#"{"workspaceDir": "/ws", "promptMode": "none"}"#).unwrap();
        let ctx = load_context(&path).unwrap();
        assert_eq!(ctx.workspace_dir, "/ws");
        assert_eq!(ctx.prompt_mode, PromptMode::None);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_context(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, PromptError::Io { .. }));
    }

    #[test]
    fn bad_json_is_invalid_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ctx.json");
        std::fs::write(&path, r#"{"promptMode": "loud"}"#).unwrap();
        let err = load_context(&path).unwrap_err();
        assert!(matches!(err, PromptError::InvalidContext { .. }));
    }

    #[test]
    fn options_default_to_standard_file() {
        let options = AssemblerOptions::default();
        assert_eq!(options.template_file_name, "SYSTEM_PROMPT.md");
        assert!(options.use_override);
        assert!(!AssemblerOptions::without_override().use_override);
    }
}
