//! System prompt assembly for cinch agents.
//!
//! `cinch-prompt` turns a [`PromptContext`] (a snapshot of workspace, tools,
//! sandbox, and runtime facts) into the system prompt string for one turn.
//! There are two paths:
//!
//! - **Override template.** If `<workspace>/.cinch/SYSTEM_PROMPT.md` exists it
//!   is rendered with [minijinja](https://docs.rs/minijinja) against the
//!   context and returned as is. See [`template`] for the variables.
//! - **Default sections.** Otherwise the prompt is the identity sentence
//!   followed by the named sections in [`sections::DEFAULT_SECTIONS`], each
//!   included or dropped based on [`PromptMode`] and the presence of its
//!   inputs.
//!
//! # Getting started
//!
//! ```
//! use cinch_prompt::{PromptContext, PromptMode, build_system_prompt, active_sections};
//!
//! let ctx = PromptContext::new("/home/me/project")
//!     .with_tools(["exec", "read"])
//!     .with_timezone("Europe/Berlin");
//!
//! let prompt = build_system_prompt(&ctx);
//! assert!(prompt.starts_with("You are a personal assistant running inside Cinch."));
//! assert!(prompt.find("- read").unwrap() < prompt.find("- exec").unwrap());
//! assert!(active_sections(&ctx).contains(&"time"));
//!
//! let none = ctx.with_mode(PromptMode::None);
//! assert_eq!(build_system_prompt(&none), "You are a personal assistant running inside Cinch.");
//! ```
//!
//! # Where to find things
//!
//! - **Context fields and JSON shape:** [`context`]. Load from disk with
//!   [`config::load_context`].
//! - **Tool ordering and descriptions:** [`tools`].
//! - **Section texts and inclusion rules:** [`sections`].
//! - **Override lookup, projection, rendering:** [`template`].
//! - **Disabling the override or renaming its file:** [`AssemblerOptions`] with
//!   [`PromptAssembler`].

pub mod assembler;
pub mod builder;
pub mod config;
pub mod context;
pub mod error;
pub mod sections;
pub mod template;
pub mod tools;

pub use assembler::{PromptAssembler, active_sections, build_system_prompt};
pub use builder::SystemPromptBuilder;
pub use config::{AssemblerOptions, load_context};
pub use context::{
    CitationsMode, ContextFile, ElevatedInfo, PromptContext, PromptMode, ReactionGuidance,
    ReactionLevel, RuntimeInfo, SandboxInfo,
};
pub use error::{PromptError, Result};
pub use sections::{HEARTBEAT_TOKEN, IDENTITY_LINE, SILENT_REPLY_TOKEN};
pub use tools::{CANONICAL_TOOL_ORDER, ToolCatalog, core_tool_summaries};
