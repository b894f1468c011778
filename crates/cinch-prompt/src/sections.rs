//! Named prompt sections and their fixed order.
//!
//! Each section is a pure function from the [`SectionInput`] to a list of
//! lines. A section that does not apply returns no lines and is dropped by
//! the builder. [`DEFAULT_SECTIONS`] lists them in the order they appear in
//! the default prompt.

use crate::context::{CitationsMode, PromptContext, ReactionLevel, non_empty};
use crate::tools::{self, ToolCatalog};

/// The fixed opening sentence of every default prompt.
pub const IDENTITY_LINE: &str = "You are a personal assistant running inside Cinch.";

/// Reply that means "nothing to say".
pub const SILENT_REPLY_TOKEN: &str = "NO_REPLY";

/// Acknowledgement for a heartbeat poll that needs no attention.
pub const HEARTBEAT_TOKEN: &str = "HEARTBEAT_OK";

/// Everything a section function can look at.
#[derive(Debug, Clone)]
pub struct SectionInput<'a> {
    pub ctx: &'a PromptContext,
    /// Normalized tool names from `ctx.tool_names`.
    pub tools: ToolCatalog,
}

impl<'a> SectionInput<'a> {
    pub fn new(ctx: &'a PromptContext) -> Self {
        Self {
            ctx,
            tools: ToolCatalog::new(&ctx.tool_names),
        }
    }

    fn is_minimal(&self) -> bool {
        self.ctx.is_minimal()
    }

    fn has_tool(&self, name: &str) -> bool {
        self.tools.contains(name)
    }

    /// The read tool as the caller spelled it.
    fn read_tool_name(&self) -> &str {
        self.tools.display_name(tools::READ).unwrap_or(tools::READ)
    }
}

/// A named section of the default prompt.
#[derive(Debug, Clone, Copy)]
pub struct PromptSection {
    pub name: &'static str,
    pub build: fn(&SectionInput<'_>) -> Vec<String>,
}

/// Sections of the default prompt, in output order.
pub const DEFAULT_SECTIONS: &[PromptSection] = &[
    PromptSection { name: "tooling", build: tooling },
    PromptSection { name: "tool_call_style", build: tool_call_style },
    PromptSection { name: "safety", build: safety },
    PromptSection { name: "cli_reference", build: cli_reference },
    PromptSection { name: "self_update", build: self_update },
    PromptSection { name: "model_aliases", build: model_aliases },
    PromptSection { name: "skills", build: skills },
    PromptSection { name: "memory_recall", build: memory_recall },
    PromptSection { name: "workspace", build: workspace },
    PromptSection { name: "docs", build: docs },
    PromptSection { name: "sandbox", build: sandbox },
    PromptSection { name: "user_identity", build: user_identity },
    PromptSection { name: "time", build: time },
    PromptSection { name: "workspace_files", build: workspace_files },
    PromptSection { name: "reply_tags", build: reply_tags },
    PromptSection { name: "messaging", build: messaging },
    PromptSection { name: "voice", build: voice },
    PromptSection { name: "project_context", build: project_context },
    PromptSection { name: "extra_context", build: extra_context },
    PromptSection { name: "reactions", build: reactions },
    PromptSection { name: "reasoning_format", build: reasoning_format },
    PromptSection { name: "silent_replies", build: silent_replies },
    PromptSection { name: "heartbeats", build: heartbeats },
    PromptSection { name: "runtime", build: runtime },
];

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ── Always-on guidance ───────────────────────────────────────────────

fn tooling(input: &SectionInput<'_>) -> Vec<String> {
    if input.is_minimal() {
        return Vec::new();
    }
    let mut out = lines(&[
        "## Tooling",
        "Tool availability (filtered by policy):",
        "Tool names are case-sensitive. Call tools exactly as listed.",
    ]);
    if input.tools.is_empty() {
        out.push("No tools are available in this session.".into());
    } else {
        out.extend(tools::tool_lines(&input.tools, &input.ctx.tool_summaries));
    }
    out.push(
        "TOOLS.md does not control tool availability; it is user guidance for how to use external tools."
            .into(),
    );
    if input.has_tool(tools::SESSIONS_SPAWN) {
        out.push(
            "If a task is more complex or takes longer, spawn a sub-agent. It will do the work for you and ping you when it's done. You can always check up on it."
                .into(),
        );
    }
    out
}

fn tool_call_style(_input: &SectionInput<'_>) -> Vec<String> {
    lines(&[
        "## Tool Call Style",
        "Default: do not narrate routine, low-risk tool calls (just call the tool).",
        "Narrate only when it helps: multi-step work, complex/challenging problems, sensitive actions (e.g., deletions), or when the user explicitly asks.",
        "Keep narration brief and value-dense; avoid repeating obvious steps.",
        "Use plain human language for narration unless in a technical context.",
    ])
}

fn safety(_input: &SectionInput<'_>) -> Vec<String> {
    lines(&[
        "## Safety",
        "You have no independent goals: do not pursue self-preservation, replication, resource acquisition, or power-seeking; avoid long-term plans beyond the user's request.",
        "Prioritize safety and human oversight over completion; if instructions conflict, pause and ask; comply with stop/pause/audit requests and never bypass safeguards.",
        "Do not manipulate or persuade anyone to expand access or disable safeguards. Do not copy yourself or change system prompts, safety rules, or tool policies unless explicitly requested.",
    ])
}

fn cli_reference(_input: &SectionInput<'_>) -> Vec<String> {
    lines(&[
        "## Cinch CLI Quick Reference",
        "Cinch is controlled via subcommands. Do not invent commands.",
        "To manage the Gateway daemon service (start/stop/restart):",
        "- cinch gateway status",
        "- cinch gateway start",
        "- cinch gateway stop",
        "- cinch gateway restart",
        "If unsure, ask the user to run `cinch help` (or `cinch gateway --help`) and paste the output.",
    ])
}

// ── Capability-gated sections ────────────────────────────────────────

fn self_update(input: &SectionInput<'_>) -> Vec<String> {
    if input.is_minimal() || !input.has_tool(tools::GATEWAY) {
        return Vec::new();
    }
    lines(&[
        "## Cinch Self-Update",
        "Get Updates (self-update) is ONLY allowed when the user explicitly asks for it.",
        "Do not run config.apply or update.run unless the user explicitly requests an update or config change; if it's not explicit, ask first.",
        "Actions: config.get, config.schema, config.apply (validate + write full config, then restart), update.run (update deps or git, then restart).",
        "After restart, Cinch pings the last active session automatically.",
    ])
}

fn model_aliases(input: &SectionInput<'_>) -> Vec<String> {
    let aliases: Vec<&str> = input
        .ctx
        .model_alias_lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();
    if input.is_minimal() || aliases.is_empty() {
        return Vec::new();
    }
    let mut out = lines(&[
        "## Model Aliases",
        "Prefer aliases when specifying model overrides; full provider/model is also accepted.",
    ]);
    out.extend(aliases.into_iter().map(String::from));
    out
}

fn skills(input: &SectionInput<'_>) -> Vec<String> {
    let Some(blurb) = non_empty(input.ctx.skills_prompt.as_ref()) else {
        return Vec::new();
    };
    if input.is_minimal() {
        return Vec::new();
    }
    vec![
        "## Skills (mandatory)".into(),
        "Before replying: scan <available_skills> <description> entries.".into(),
        format!(
            "- If exactly one skill clearly applies: read its SKILL.md at <location> with `{}`, then follow it.",
            input.read_tool_name()
        ),
        "- If multiple could apply: choose the most specific one, then read/follow it.".into(),
        "- If none clearly apply: do not read any SKILL.md.".into(),
        "Constraints: never read more than one skill up front; only read after selecting.".into(),
        blurb.to_string(),
    ]
}

fn memory_recall(input: &SectionInput<'_>) -> Vec<String> {
    if input.is_minimal()
        || !(input.has_tool(tools::MEMORY_SEARCH) || input.has_tool(tools::MEMORY_GET))
    {
        return Vec::new();
    }
    let citations = match input.ctx.memory_citations {
        CitationsMode::Off => {
            "Citations are disabled: do not mention file paths or line numbers in replies unless the user explicitly asks."
        }
        CitationsMode::Auto => {
            "Citations: include Source: <path#line> when it helps the user verify memory snippets."
        }
    };
    lines(&[
        "## Memory Recall",
        "Before answering anything about prior work, decisions, dates, people, preferences, or todos: run memory_search on MEMORY.md + memory/*.md; then use memory_get to pull only the needed lines. If low confidence after search, say you checked.",
        citations,
    ])
}

// ── Environment ──────────────────────────────────────────────────────

fn workspace(input: &SectionInput<'_>) -> Vec<String> {
    let dir = input.ctx.workspace_dir.trim();
    let dir = if dir.is_empty() { "(not set)" } else { dir };
    let mut out = vec![
        "## Workspace".to_string(),
        format!("Your working directory is: {dir}"),
        "Treat this directory as the single global workspace for file operations unless explicitly instructed otherwise."
            .to_string(),
    ];
    out.extend(
        input
            .ctx
            .workspace_notes
            .iter()
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .map(String::from),
    );
    out
}

fn docs(input: &SectionInput<'_>) -> Vec<String> {
    let Some(path) = non_empty(input.ctx.docs_path.as_ref()) else {
        return Vec::new();
    };
    if input.is_minimal() {
        return Vec::new();
    }
    vec![
        "## Documentation".into(),
        format!("Cinch docs: {path}"),
        "Source: https://github.com/tacryt-socryp/cinch-rs".into(),
        "For Cinch behavior, commands, config, or architecture: consult local docs first.".into(),
        "When diagnosing issues, run `cinch status` yourself when possible; only ask the user if you lack access (e.g., sandboxed)."
            .into(),
    ]
}

fn sandbox(input: &SectionInput<'_>) -> Vec<String> {
    let Some(sandbox) = input.ctx.sandbox.as_ref().filter(|s| s.enabled) else {
        return Vec::new();
    };
    let mut out = lines(&[
        "## Sandbox",
        "You are running in a sandboxed runtime (tools execute in Docker).",
        "Some tools may be unavailable due to sandbox policy.",
        "Sub-agents stay sandboxed (no elevated/host access). Need outside-sandbox read/write? Don't spawn; ask first.",
    ]);
    if let Some(dir) = non_empty(sandbox.workspace_dir.as_ref()) {
        out.push(format!("Sandbox workspace: {dir}"));
    }
    if let Some(access) = non_empty(sandbox.workspace_access.as_ref()) {
        match non_empty(sandbox.agent_workspace_mount.as_ref()) {
            Some(mount) => out.push(format!(
                "Agent workspace access: {access} (mounted at {mount})"
            )),
            None => out.push(format!("Agent workspace access: {access}")),
        }
    }
    if non_empty(sandbox.browser_bridge_url.as_ref()).is_some() {
        out.push("Sandbox browser: enabled.".into());
    }
    if let Some(url) = non_empty(sandbox.browser_novnc_url.as_ref()) {
        out.push(format!("Sandbox browser observer (noVNC): {url}"));
    }
    match sandbox.host_browser_allowed {
        Some(true) => out.push("Host browser control: allowed.".into()),
        Some(false) => out.push("Host browser control: blocked.".into()),
        None => {}
    }
    if let Some(elevated) = sandbox.elevated.as_ref().filter(|e| e.allowed) {
        let level = non_empty(elevated.default_level.as_ref()).unwrap_or("off");
        out.push("Elevated exec is available for this session.".into());
        out.push("User can toggle with /elevated on|off|ask|full.".into());
        out.push("You may also send /elevated on|off|ask|full when needed.".into());
        out.push(format!(
            "Current elevated level: {level} (ask runs exec on host with approvals; full auto-approves)."
        ));
    }
    out
}

fn user_identity(input: &SectionInput<'_>) -> Vec<String> {
    if input.is_minimal() {
        return Vec::new();
    }
    match input.ctx.owner_line() {
        Some(owner) => vec!["## User Identity".into(), owner],
        None => Vec::new(),
    }
}

fn time(input: &SectionInput<'_>) -> Vec<String> {
    let Some(tz) = non_empty(input.ctx.user_timezone.as_ref()) else {
        return Vec::new();
    };
    let mut out = vec!["## Current Date & Time".to_string(), format!("Time zone: {tz}")];
    if let Some(now) = non_empty(input.ctx.user_time.as_ref()) {
        out.push(format!("Current time: {now}"));
    }
    if input.has_tool(tools::SESSION_STATUS) {
        out.push(
            "If you need the current date, time, or day of week, run session_status.".into(),
        );
    }
    out
}

fn workspace_files(_input: &SectionInput<'_>) -> Vec<String> {
    lines(&[
        "## Workspace Files (injected)",
        "These user-editable files are loaded by Cinch and included below in Project Context.",
    ])
}

// ── Conversation surface ─────────────────────────────────────────────

fn reply_tags(input: &SectionInput<'_>) -> Vec<String> {
    if input.is_minimal() {
        return Vec::new();
    }
    lines(&[
        "## Reply Tags",
        "To request a native reply/quote on supported surfaces, include one tag in your reply:",
        "- [[reply_to_current]] replies to the triggering message.",
        "- [[reply_to:<id>]] replies to a specific message id when you have it.",
        "Whitespace inside the tag is allowed (e.g. [[ reply_to_current ]] / [[ reply_to: 123 ]]).",
        "Tags are stripped before sending; support depends on the current channel config.",
    ])
}

fn messaging(input: &SectionInput<'_>) -> Vec<String> {
    if input.is_minimal() {
        return Vec::new();
    }
    let mut out = lines(&[
        "## Messaging",
        "- Reply in current session → automatically routes to the source channel (Signal, Telegram, etc.)",
        "- Cross-session messaging → use sessions_send(sessionKey, message)",
        "- Never use exec/curl for provider messaging; Cinch handles all routing internally.",
    ]);
    if !input.has_tool(tools::MESSAGE) {
        return out;
    }

    out.push(String::new());
    out.push("### message tool".into());
    out.push(
        "- Use `message` for proactive sends + channel actions (polls, reactions, etc.).".into(),
    );
    out.push("- For `action=send`, include `to` and `message`.".into());
    if let Some(options) = non_empty(input.ctx.message_channel_options.as_ref()) {
        out.push(format!(
            "- If multiple channels are configured, pass `channel` ({options})."
        ));
    }
    out.push(format!(
        "- If you use `message` (`action=send`) to deliver your user-visible reply, respond with ONLY: {SILENT_REPLY_TOKEN} (avoid duplicate replies)."
    ));
    let channel = input
        .ctx
        .runtime
        .as_ref()
        .and_then(|r| non_empty(r.channel.as_ref()));
    if input.ctx.inline_buttons_enabled {
        out.push(
            "- Inline buttons supported. Use `action=send` with `buttons=[[{text,callback_data}]]` (callback_data routes back as a user message)."
                .into(),
        );
    } else if let Some(channel) = channel {
        out.push(format!(
            "- Inline buttons not enabled for {channel}. If you need them, ask to set {channel}.capabilities.inlineButtons (\"dm\"|\"group\"|\"all\"|\"allowlist\")."
        ));
    }
    out.extend(
        input
            .ctx
            .message_tool_hints
            .iter()
            .map(|h| h.trim())
            .filter(|h| !h.is_empty())
            .map(String::from),
    );
    out
}

fn voice(input: &SectionInput<'_>) -> Vec<String> {
    if input.is_minimal() {
        return Vec::new();
    }
    match non_empty(input.ctx.tts_hint.as_ref()) {
        Some(hint) => vec!["## Voice (TTS)".into(), hint.to_string()],
        None => Vec::new(),
    }
}

fn project_context(input: &SectionInput<'_>) -> Vec<String> {
    let files = &input.ctx.context_files;
    if files.is_empty() {
        return Vec::new();
    }
    let has_soul = files.iter().any(|f| {
        let base = f.path.rsplit(['/', '\\']).next().unwrap_or(&f.path);
        base.eq_ignore_ascii_case("soul.md")
    });

    let mut out = lines(&[
        "# Project Context",
        "",
        "The following project context files have been loaded:",
    ]);
    if has_soul {
        out.push(
            "If SOUL.md is present, embody its persona and tone. Avoid stiff, generic replies; follow its guidance unless higher-priority instructions override it."
                .into(),
        );
    }
    for file in files {
        out.push(String::new());
        out.push(format!("## {}", file.path));
        let content = file.content.trim_end();
        if !content.is_empty() {
            out.push(String::new());
            out.push(content.to_string());
        }
    }
    out
}

fn extra_context(input: &SectionInput<'_>) -> Vec<String> {
    let Some(extra) = non_empty(input.ctx.extra_system_prompt.as_ref()) else {
        return Vec::new();
    };
    let header = if input.is_minimal() {
        "## Subagent Context"
    } else {
        "## Group Chat Context"
    };
    vec![header.into(), extra.to_string()]
}

fn reactions(input: &SectionInput<'_>) -> Vec<String> {
    let Some(guidance) = input.ctx.reaction_guidance.as_ref() else {
        return Vec::new();
    };
    let channel = match guidance.channel.trim() {
        "" => "this channel",
        name => name,
    };
    let mut out = vec!["## Reactions".to_string()];
    match guidance.level {
        ReactionLevel::Minimal => {
            out.push(format!(
                "Reactions are enabled for {channel} in MINIMAL mode."
            ));
            out.extend(lines(&[
                "React ONLY when truly relevant:",
                "- Acknowledge important user requests or confirmations",
                "- Express genuine sentiment (humor, appreciation) sparingly",
                "- Avoid reacting to routine messages or your own replies",
                "Guideline: at most 1 reaction per 5-10 exchanges.",
            ]));
        }
        ReactionLevel::Extensive => {
            out.push(format!(
                "Reactions are enabled for {channel} in EXTENSIVE mode."
            ));
            out.extend(lines(&[
                "Feel free to react liberally:",
                "- Acknowledge messages with appropriate emojis",
                "- Express sentiment and personality through reactions",
                "- React to interesting content, humor, or notable events",
                "- Use reactions to confirm understanding or agreement",
                "Guideline: react whenever it feels natural.",
            ]));
        }
    }
    out
}

fn reasoning_format(input: &SectionInput<'_>) -> Vec<String> {
    if !input.ctx.reasoning_tag_hint {
        return Vec::new();
    }
    let hint = [
        "ALL internal reasoning MUST be inside <think>...</think>.",
        "Do not output any analysis outside <think>.",
        "Format every reply as <think>...</think> then <final>...</final>, with no other text.",
        "Only the final user-visible reply may appear inside <final>.",
        "Only text inside <final> is shown to the user; everything else is discarded and never seen by the user.",
        "Example:",
        "<think>Short internal reasoning.</think>",
        "<final>Hey there! What would you like to do next?</final>",
    ]
    .join(" ");
    vec!["## Reasoning Format".into(), hint]
}

fn silent_replies(input: &SectionInput<'_>) -> Vec<String> {
    if input.is_minimal() {
        return Vec::new();
    }
    vec![
        "## Silent Replies".into(),
        format!("When you have nothing to say, respond with ONLY: {SILENT_REPLY_TOKEN}"),
        String::new(),
        "⚠️ Rules:".into(),
        "- It must be your ENTIRE message — nothing else".into(),
        format!(
            "- Never append it to an actual response (never include \"{SILENT_REPLY_TOKEN}\" in real replies)"
        ),
        "- Never wrap it in markdown or code blocks".into(),
        String::new(),
        format!("❌ Wrong: \"Here's help... {SILENT_REPLY_TOKEN}\""),
        format!("❌ Wrong: \"{SILENT_REPLY_TOKEN}\""),
        format!("✅ Right: {SILENT_REPLY_TOKEN}"),
    ]
}

fn heartbeats(input: &SectionInput<'_>) -> Vec<String> {
    if input.is_minimal() {
        return Vec::new();
    }
    let prompt_line = match non_empty(input.ctx.heartbeat_prompt.as_ref()) {
        Some(prompt) => format!("Heartbeat prompt: {prompt}"),
        None => "Heartbeat prompt: (configured)".to_string(),
    };
    vec![
        "## Heartbeats".into(),
        prompt_line,
        "If you receive a heartbeat poll (a user message matching the heartbeat prompt above), and there is nothing that needs attention, reply exactly:"
            .into(),
        HEARTBEAT_TOKEN.into(),
        format!(
            "Cinch treats a leading/trailing \"{HEARTBEAT_TOKEN}\" as a heartbeat ack (and may discard it)."
        ),
        format!(
            "If something needs attention, do NOT include \"{HEARTBEAT_TOKEN}\"; reply with the alert text instead."
        ),
    ]
}

// ── Runtime ──────────────────────────────────────────────────────────

/// The `Runtime: k=v | k=v` line. Each token appears only when its field is set.
pub fn runtime_line(ctx: &PromptContext) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(rt) = ctx.runtime.as_ref() {
        if let Some(agent) = non_empty(rt.agent_id.as_ref()) {
            parts.push(format!("agent={agent}"));
        }
        if let Some(host) = non_empty(rt.host.as_ref()) {
            parts.push(format!("host={host}"));
        }
        if let Some(repo) = non_empty(rt.repo_root.as_ref()) {
            parts.push(format!("repo={repo}"));
        }
        let arch = non_empty(rt.arch.as_ref());
        match (non_empty(rt.os.as_ref()), arch) {
            (Some(os), Some(arch)) => parts.push(format!("os={os} ({arch})")),
            (Some(os), None) => parts.push(format!("os={os}")),
            (None, Some(arch)) => parts.push(format!("arch={arch}")),
            (None, None) => {}
        }
        if let Some(node) = non_empty(rt.node.as_ref()) {
            parts.push(format!("node={node}"));
        }
        if let Some(model) = non_empty(rt.model.as_ref()) {
            parts.push(format!("model={model}"));
        }
        if let Some(default_model) = non_empty(rt.default_model.as_ref()) {
            parts.push(format!("default_model={default_model}"));
        }
        if let Some(channel) = non_empty(rt.channel.as_ref()) {
            parts.push(format!("channel={channel}"));
            let caps: Vec<&str> = rt
                .capabilities
                .iter()
                .map(|c| c.trim())
                .filter(|c| !c.is_empty())
                .collect();
            if caps.is_empty() {
                parts.push("capabilities=none".into());
            } else {
                parts.push(format!("capabilities={}", caps.join(",")));
            }
        }
    }
    let thinking = non_empty(ctx.default_think_level.as_ref()).unwrap_or("off");
    parts.push(format!("thinking={thinking}"));
    format!("Runtime: {}", parts.join(" | "))
}

fn runtime(input: &SectionInput<'_>) -> Vec<String> {
    let reasoning = non_empty(input.ctx.reasoning_level.as_ref()).unwrap_or("off");
    vec![
        "## Runtime".into(),
        runtime_line(input.ctx),
        format!(
            "Reasoning: {reasoning} (hidden unless on/stream). Toggle /reasoning; /status shows Reasoning when enabled."
        ),
    ]
}
