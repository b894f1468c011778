//! Prompt assembly: override template first, then the default sections.

use tracing::{debug, warn};

use crate::builder::SystemPromptBuilder;
use crate::config::AssemblerOptions;
use crate::context::{PromptContext, PromptMode};
use crate::sections::{DEFAULT_SECTIONS, IDENTITY_LINE, SectionInput};
use crate::template::{find_override, render_template};

/// Assembles system prompts with configurable override lookup.
#[derive(Debug, Clone, Default)]
pub struct PromptAssembler {
    options: AssemblerOptions,
}

impl PromptAssembler {
    pub fn new(options: AssemblerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &AssemblerOptions {
        &self.options
    }

    /// Build the prompt for `ctx`. Never fails.
    ///
    /// A readable override template wins over everything, including
    /// [`PromptMode::None`]. A template that fails to render is logged and
    /// ignored.
    pub fn assemble(&self, ctx: &PromptContext) -> String {
        if let Some(rendered) = self.render_override(ctx) {
            return rendered;
        }
        if ctx.prompt_mode == PromptMode::None {
            return IDENTITY_LINE.to_string();
        }

        let input = SectionInput::new(ctx);
        let mut builder = SystemPromptBuilder::new(IDENTITY_LINE);
        for section in DEFAULT_SECTIONS {
            builder = builder.lines((section.build)(&input));
        }
        debug!(
            "Assembled default prompt ({} mode, {} blocks)",
            ctx.prompt_mode,
            builder.block_count()
        );
        builder.build()
    }

    fn render_override(&self, ctx: &PromptContext) -> Option<String> {
        if !self.options.use_override {
            return None;
        }
        let source = find_override(&ctx.workspace_dir, &self.options.template_file_name)?;
        match render_template(&source, ctx) {
            Ok(rendered) => Some(rendered),
            Err(e) => {
                warn!("Override template failed to render, using default prompt: {e}");
                None
            }
        }
    }
}

/// Build the system prompt with default options.
pub fn build_system_prompt(ctx: &PromptContext) -> String {
    PromptAssembler::default().assemble(ctx)
}

/// Names of the sections the default path would emit for `ctx`, in order.
///
/// Empty in [`PromptMode::None`]. Does not consult the override template.
pub fn active_sections(ctx: &PromptContext) -> Vec<&'static str> {
    if ctx.prompt_mode == PromptMode::None {
        return Vec::new();
    }
    let input = SectionInput::new(ctx);
    DEFAULT_SECTIONS
        .iter()
        .filter(|section| {
            (section.build)(&input)
                .iter()
                .any(|line| !line.trim().is_empty())
        })
        .map(|section| section.name)
        .collect()
}
