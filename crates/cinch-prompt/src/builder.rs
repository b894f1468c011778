//! Line-oriented system prompt builder.
//!
//! [`SystemPromptBuilder`] collects blocks of text (a preamble, then one block
//! per section) and joins them with blank lines. Empty blocks are dropped
//! without leaving gaps, so a section that has nothing to say simply vanishes.

/// Builder for multi-section system prompts.
///
/// # Example
///
/// ```
/// use cinch_prompt::SystemPromptBuilder;
///
/// let prompt = SystemPromptBuilder::new("You are a helpful agent.")
///     .lines(vec!["## Context".to_string(), "Today is Monday.".to_string()])
///     .lines(Vec::<String>::new())
///     .raw_opt(None::<String>)
///     .build();
///
/// assert_eq!(prompt, "You are a helpful agent.\n\n## Context\nToday is Monday.");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SystemPromptBuilder {
    blocks: Vec<String>,
}

impl SystemPromptBuilder {
    /// Create a new builder with an initial preamble block.
    pub fn new(preamble: impl Into<String>) -> Self {
        Self::default().raw(preamble)
    }

    /// Append a block given as individual lines.
    ///
    /// Leading and trailing blank lines are stripped; interior blank lines are
    /// kept. Skipped entirely if nothing but blank lines remain.
    pub fn lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        let Some(first) = lines.iter().position(|l| !l.trim().is_empty()) else {
            return self;
        };
        let last = lines
            .iter()
            .rposition(|l| !l.trim().is_empty())
            .unwrap_or(first);
        self.blocks.push(lines[first..=last].join("\n"));
        self
    }

    /// Append raw text as its own block.
    ///
    /// Skipped if `content` is empty.
    pub fn raw(mut self, content: impl Into<String>) -> Self {
        let content = content.into();
        if !content.is_empty() {
            self.blocks.push(content);
        }
        self
    }

    /// Append raw text only if the content is `Some`.
    pub fn raw_opt(self, content: Option<impl Into<String>>) -> Self {
        match content {
            Some(c) => self.raw(c),
            None => self,
        }
    }

    /// Number of non-empty blocks collected so far.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Build the final prompt by joining all blocks with blank lines.
    pub fn build(self) -> String {
        self.blocks.join("\n\n")
    }
}
