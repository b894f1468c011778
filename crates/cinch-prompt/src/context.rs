//! The prompt context: a snapshot of agent and session facts for one turn.
//!
//! A [`PromptContext`] is built by the surrounding runtime (or deserialized
//! from JSON), handed to the assembler once, and discarded. Every field is
//! optional by construction: an absent or empty field suppresses the section
//! that would have used it.
//!
//! # Examples
//!
//! ```
//! use cinch_prompt::{PromptContext, PromptMode, RuntimeInfo, SandboxInfo};
//!
//! let ctx = PromptContext::new("/home/me/project")
//!     .with_mode(PromptMode::Minimal)
//!     .with_tools(["read", "exec"])
//!     .with_sandbox(SandboxInfo::enabled_at("/sandbox/ws"))
//!     .with_runtime(RuntimeInfo {
//!         agent_id: Some("main".into()),
//!         ..Default::default()
//!     });
//!
//! assert!(ctx.is_minimal());
//! assert_eq!(ctx.tool_names, vec!["read", "exec"]);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Which optional sections are eligible for inclusion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptMode {
    /// Main agent: every section whose inputs are present.
    #[default]
    Full,
    /// Sub-agents: tooling, messaging, and conversational sections are dropped.
    Minimal,
    /// Identity sentence only.
    None,
}

impl PromptMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Minimal => "minimal",
            Self::None => "none",
        }
    }
}

impl fmt::Display for PromptMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PromptMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "minimal" => Ok(Self::Minimal),
            "none" => Ok(Self::None),
            other => Err(format!(
                "unknown prompt mode '{other}' (expected full, minimal, or none)"
            )),
        }
    }
}

/// How memory-recall answers should cite their sources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CitationsMode {
    #[default]
    Auto,
    Off,
}

/// Verbosity of the reaction guidance block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionLevel {
    #[default]
    Minimal,
    Extensive,
}

/// Reaction guidance for channels that support emoji reactions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReactionGuidance {
    pub level: ReactionLevel,
    /// Channel name shown in the guidance text (e.g. `telegram`).
    pub channel: String,
}

/// A project file injected verbatim into the prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContextFile {
    /// Display path, used as the file's heading.
    pub path: String,
    pub content: String,
}

impl ContextFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Elevated (host) exec availability inside a sandbox.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElevatedInfo {
    pub allowed: bool,
    /// Current elevated level (`off`, `on`, `ask`, `full`). Default: `off`.
    pub default_level: Option<String>,
}

/// Sandbox state for the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SandboxInfo {
    pub enabled: bool,
    /// Workspace path as seen from inside the sandbox.
    pub workspace_dir: Option<String>,
    /// Access the sandbox has to the agent workspace (`none`, `ro`, `rw`).
    pub workspace_access: Option<String>,
    /// Where the agent workspace is mounted inside the sandbox.
    pub agent_workspace_mount: Option<String>,
    pub browser_bridge_url: Option<String>,
    #[serde(rename = "browserNoVncUrl")]
    pub browser_novnc_url: Option<String>,
    /// `Some(true)` / `Some(false)` render an allowed / blocked line; `None` renders nothing.
    pub host_browser_allowed: Option<bool>,
    pub elevated: Option<ElevatedInfo>,
}

impl SandboxInfo {
    /// An enabled sandbox with the given workspace path.
    pub fn enabled_at(workspace_dir: impl Into<String>) -> Self {
        Self {
            enabled: true,
            workspace_dir: Some(workspace_dir.into()),
            ..Default::default()
        }
    }
}

/// Runtime facts rendered into the `Runtime:` line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuntimeInfo {
    pub agent_id: Option<String>,
    pub host: Option<String>,
    pub repo_root: Option<String>,
    pub os: Option<String>,
    pub arch: Option<String>,
    pub node: Option<String>,
    pub model: Option<String>,
    pub default_model: Option<String>,
    /// Channel the current message arrived on.
    pub channel: Option<String>,
    /// Capabilities of that channel (only rendered together with `channel`).
    pub capabilities: Vec<String>,
}

impl RuntimeInfo {
    /// Facts observable from the current process: host name, OS, and architecture.
    pub fn detect() -> Self {
        let host = ["HOSTNAME", "COMPUTERNAME"]
            .iter()
            .filter_map(|key| std::env::var(key).ok())
            .map(|h| h.trim().to_string())
            .find(|h| !h.is_empty())
            .or_else(|| {
                std::fs::read_to_string("/etc/hostname")
                    .ok()
                    .map(|h| h.trim().to_string())
                    .filter(|h| !h.is_empty())
            });
        Self {
            host,
            os: Some(std::env::consts::OS.to_string()),
            arch: Some(std::env::consts::ARCH.to_string()),
            ..Default::default()
        }
    }

    /// Fill fields that are `None` here from `other`.
    pub fn fill_missing(&mut self, other: RuntimeInfo) {
        fn fill(slot: &mut Option<String>, value: Option<String>) {
            if slot.is_none() {
                *slot = value;
            }
        }
        fill(&mut self.agent_id, other.agent_id);
        fill(&mut self.host, other.host);
        fill(&mut self.repo_root, other.repo_root);
        fill(&mut self.os, other.os);
        fill(&mut self.arch, other.arch);
        fill(&mut self.node, other.node);
        fill(&mut self.model, other.model);
        fill(&mut self.default_model, other.default_model);
        fill(&mut self.channel, other.channel);
        if self.capabilities.is_empty() {
            self.capabilities = other.capabilities;
        }
    }
}

/// Snapshot of facts used to render one system prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PromptContext {
    /// Agent working directory. Also the root for override-template lookup.
    pub workspace_dir: String,
    pub prompt_mode: PromptMode,

    // ── Tools ──────────────────────────────────────────────────
    /// Raw tool names, any casing. Deduplicated case-insensitively at render time.
    pub tool_names: Vec<String>,
    /// Caller-supplied tool descriptions, matched case-insensitively.
    pub tool_summaries: BTreeMap<String, String>,

    // ── Optional sections ──────────────────────────────────────
    pub model_alias_lines: Vec<String>,
    pub skills_prompt: Option<String>,
    pub docs_path: Option<String>,
    /// Extra lines appended to the Workspace section.
    pub workspace_notes: Vec<String>,
    pub owner_numbers: Vec<String>,
    pub user_timezone: Option<String>,
    /// Pre-formatted local time. Only rendered alongside a timezone.
    pub user_time: Option<String>,
    pub context_files: Vec<ContextFile>,
    pub extra_system_prompt: Option<String>,
    pub reaction_guidance: Option<ReactionGuidance>,
    pub reasoning_tag_hint: bool,
    pub reasoning_level: Option<String>,
    pub default_think_level: Option<String>,
    pub heartbeat_prompt: Option<String>,
    pub tts_hint: Option<String>,
    pub memory_citations: CitationsMode,

    // ── Messaging ──────────────────────────────────────────────
    pub message_tool_hints: Vec<String>,
    /// Channel names offered to the `message` tool, e.g. `telegram|discord`.
    pub message_channel_options: Option<String>,
    pub inline_buttons_enabled: bool,

    // ── Environment ────────────────────────────────────────────
    pub sandbox: Option<SandboxInfo>,
    pub runtime: Option<RuntimeInfo>,
}

impl PromptContext {
    /// A full-mode context rooted at `workspace_dir`.
    pub fn new(workspace_dir: impl Into<String>) -> Self {
        Self {
            workspace_dir: workspace_dir.into(),
            ..Default::default()
        }
    }

    /// Parse a context from its JSON form (camelCase keys, all optional).
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn with_mode(mut self, mode: PromptMode) -> Self {
        self.prompt_mode = mode;
        self
    }

    pub fn with_tools<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tool_names.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_tool_summary(mut self, name: impl Into<String>, summary: impl Into<String>) -> Self {
        self.tool_summaries.insert(name.into(), summary.into());
        self
    }

    pub fn with_sandbox(mut self, sandbox: SandboxInfo) -> Self {
        self.sandbox = Some(sandbox);
        self
    }

    pub fn with_runtime(mut self, runtime: RuntimeInfo) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.user_timezone = Some(timezone.into());
        self
    }

    pub fn with_context_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.context_files.push(ContextFile::new(path, content));
        self
    }

    pub fn with_extra_system_prompt(mut self, extra: impl Into<String>) -> Self {
        self.extra_system_prompt = Some(extra.into());
        self
    }

    pub fn with_skills_prompt(mut self, skills: impl Into<String>) -> Self {
        self.skills_prompt = Some(skills.into());
        self
    }

    pub fn with_heartbeat_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.heartbeat_prompt = Some(prompt.into());
        self
    }

    pub fn with_owner_numbers<I, S>(mut self, numbers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.owner_numbers.extend(numbers.into_iter().map(Into::into));
        self
    }

    /// True for both `minimal` and `none`.
    pub fn is_minimal(&self) -> bool {
        self.prompt_mode != PromptMode::Full
    }

    pub fn sandbox_enabled(&self) -> bool {
        self.sandbox.as_ref().is_some_and(|s| s.enabled)
    }

    /// The owner line, when any non-blank owner number is known.
    pub fn owner_line(&self) -> Option<String> {
        let owners: Vec<&str> = self
            .owner_numbers
            .iter()
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .collect();
        if owners.is_empty() {
            return None;
        }
        Some(format!(
            "Owner numbers: {}. Treat messages from these numbers as the user.",
            owners.join(", ")
        ))
    }
}

/// Trimmed, non-empty view of an optional string field.
pub(crate) fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_mode_parses_case_insensitively() {
        assert_eq!("FULL".parse::<PromptMode>(), Ok(PromptMode::Full));
        assert_eq!(" minimal ".parse::<PromptMode>(), Ok(PromptMode::Minimal));
        assert_eq!("none".parse::<PromptMode>(), Ok(PromptMode::None));
        assert!("verbose".parse::<PromptMode>().is_err());
    }

    #[test]
    fn is_minimal_covers_none() {
        assert!(!PromptContext::new("/ws").is_minimal());
        assert!(PromptContext::new("/ws").with_mode(PromptMode::Minimal).is_minimal());
        assert!(PromptContext::new("/ws").with_mode(PromptMode::None).is_minimal());
    }

    #[test]
    fn owner_line_skips_blank_numbers() {
        let ctx = PromptContext::new("/ws").with_owner_numbers(["+1555", "  ", "+1666"]);
        assert_eq!(
            ctx.owner_line().as_deref(),
            Some("Owner numbers: +1555, +1666. Treat messages from these numbers as the user.")
        );
        assert!(PromptContext::new("/ws").with_owner_numbers([" "]).owner_line().is_none());
    }

    #[test]
    fn json_uses_camel_case_and_defaults() {
        let ctx = PromptContext::from_json_str(
            r#"{
                "workspaceDir": "/ws",
                "promptMode": "minimal",
                "toolNames": ["read"],
                "sandbox": {"enabled": true, "workspaceDir": "/sandbox/ws", "browserNoVncUrl": "http://vnc"},
                "runtime": {"agentId": "main", "defaultModel": "m"},
                "reactionGuidance": {"level": "extensive", "channel": "telegram"}
            }"#,
        )
        .unwrap();

        assert_eq!(ctx.workspace_dir, "/ws");
        assert_eq!(ctx.prompt_mode, PromptMode::Minimal);
        assert_eq!(ctx.tool_names, vec!["read"]);
        let sandbox = ctx.sandbox.as_ref().unwrap();
        assert!(sandbox.enabled);
        assert_eq!(sandbox.workspace_dir.as_deref(), Some("/sandbox/ws"));
        assert_eq!(sandbox.browser_novnc_url.as_deref(), Some("http://vnc"));
        let runtime = ctx.runtime.as_ref().unwrap();
        assert_eq!(runtime.agent_id.as_deref(), Some("main"));
        assert_eq!(runtime.default_model.as_deref(), Some("m"));
        assert_eq!(
            ctx.reaction_guidance.as_ref().unwrap().level,
            ReactionLevel::Extensive
        );
        assert_eq!(ctx.memory_citations, CitationsMode::Auto);
    }

    #[test]
    fn citations_accept_only_auto_and_off() {
        let ctx = PromptContext::from_json_str(r#"{"memoryCitations": "off"}"#).unwrap();
        assert_eq!(ctx.memory_citations, CitationsMode::Off);
        assert!(PromptContext::from_json_str(r#"{"memoryCitations": "on"}"#).is_err());
    }

    #[test]
    fn empty_json_is_default_context() {
        let ctx = PromptContext::from_json_str("{}").unwrap();
        assert_eq!(ctx, PromptContext::default());
    }

    #[test]
    fn fill_missing_keeps_existing_values() {
        let mut runtime = RuntimeInfo {
            host: Some("configured".into()),
            ..Default::default()
        };
        runtime.fill_missing(RuntimeInfo {
            host: Some("detected".into()),
            os: Some("linux".into()),
            capabilities: vec!["reactions".into()],
            ..Default::default()
        });
        assert_eq!(runtime.host.as_deref(), Some("configured"));
        assert_eq!(runtime.os.as_deref(), Some("linux"));
        assert_eq!(runtime.capabilities, vec!["reactions"]);
    }

    #[test]
    fn detect_reports_os_and_arch() {
        let runtime = RuntimeInfo::detect();
        assert_eq!(runtime.os.as_deref(), Some(std::env::consts::OS));
        assert_eq!(runtime.arch.as_deref(), Some(std::env::consts::ARCH));
        assert!(runtime.agent_id.is_none());
    }

    #[test]
    fn non_empty_trims() {
        assert_eq!(non_empty(Some(&"  x ".to_string())), Some("x"));
        assert_eq!(non_empty(Some(&"   ".to_string())), None);
        assert_eq!(non_empty(None), None);
    }
}
