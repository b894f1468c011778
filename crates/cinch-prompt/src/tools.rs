//! Canonical tool names, their listing order, and the tooling list.
//!
//! All tool-name string literals should reference these constants to avoid
//! scattered magic strings. When a tool is renamed, only this file needs
//! to change.

use std::collections::{BTreeMap, HashMap};

pub const READ: &str = "read";
pub const WRITE: &str = "write";
pub const EDIT: &str = "edit";
pub const APPLY_PATCH: &str = "apply_patch";
pub const GREP: &str = "grep";
pub const FIND: &str = "find";
pub const LS: &str = "ls";
pub const EXEC: &str = "exec";
pub const PROCESS: &str = "process";
pub const WEB_SEARCH: &str = "web_search";
pub const WEB_FETCH: &str = "web_fetch";
pub const BROWSER: &str = "browser";
pub const CANVAS: &str = "canvas";
pub const NODES: &str = "nodes";
pub const CRON: &str = "cron";
pub const MESSAGE: &str = "message";
pub const GATEWAY: &str = "gateway";
pub const AGENTS_LIST: &str = "agents_list";
pub const SESSIONS_LIST: &str = "sessions_list";
pub const SESSIONS_HISTORY: &str = "sessions_history";
pub const SESSIONS_SEND: &str = "sessions_send";
pub const SESSIONS_SPAWN: &str = "sessions_spawn";
pub const SESSION_STATUS: &str = "session_status";
pub const IMAGE: &str = "image";
pub const MEMORY_SEARCH: &str = "memory_search";
pub const MEMORY_GET: &str = "memory_get";

/// Listing order for known tools. Unknown tools follow, sorted.
pub const CANONICAL_TOOL_ORDER: &[&str] = &[
    READ,
    WRITE,
    EDIT,
    APPLY_PATCH,
    GREP,
    FIND,
    LS,
    EXEC,
    PROCESS,
    WEB_SEARCH,
    WEB_FETCH,
    BROWSER,
    CANVAS,
    NODES,
    CRON,
    MESSAGE,
    GATEWAY,
    AGENTS_LIST,
    SESSIONS_LIST,
    SESSIONS_HISTORY,
    SESSIONS_SEND,
    SESSIONS_SPAWN,
    SESSION_STATUS,
    IMAGE,
];

/// Default one-line summaries for the core tools.
///
/// Never applied implicitly: callers merge them into
/// [`PromptContext::tool_summaries`](crate::PromptContext::tool_summaries)
/// through [`core_tool_summaries`] when they want them.
pub const CORE_TOOL_SUMMARIES: &[(&str, &str)] = &[
    (READ, "Read file contents"),
    (WRITE, "Create or overwrite files"),
    (EDIT, "Make precise edits to files"),
    (APPLY_PATCH, "Apply multi-file patches"),
    (GREP, "Search file contents for patterns"),
    (FIND, "Find files by glob pattern"),
    (LS, "List directory contents"),
    (EXEC, "Run shell commands (pty available for TTY-required CLIs)"),
    (PROCESS, "Manage background exec sessions"),
    (WEB_SEARCH, "Search the web"),
    (WEB_FETCH, "Fetch and extract readable content from a URL"),
    (BROWSER, "Control web browser"),
    (CANVAS, "Present/eval/snapshot the Canvas"),
    (NODES, "List/describe/notify/camera/screen on paired nodes"),
    (CRON, "Manage cron jobs and wake events (use for reminders)"),
    (MESSAGE, "Send messages and channel actions"),
    (GATEWAY, "Restart, apply config, or run updates on the running Cinch process"),
    (AGENTS_LIST, "List agent ids allowed for sessions_spawn"),
    (SESSIONS_LIST, "List other sessions (incl. sub-agents) with filters/last"),
    (SESSIONS_HISTORY, "Fetch history for another session/sub-agent"),
    (SESSIONS_SEND, "Send a message to another session/sub-agent"),
    (SESSIONS_SPAWN, "Spawn a sub-agent session"),
    (SESSION_STATUS, "Show a session status card (usage, time, model)"),
    (IMAGE, "Analyze an image with the configured image model"),
];

/// The core summaries as an owned map, ready to merge into a context.
pub fn core_tool_summaries() -> BTreeMap<String, String> {
    CORE_TOOL_SUMMARIES
        .iter()
        .map(|(name, summary)| (name.to_string(), summary.to_string()))
        .collect()
}

/// Tool names normalized for lookup and listing.
///
/// Names are trimmed and deduplicated by lowercase, keeping the casing of
/// the first occurrence for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolCatalog {
    /// `(lowercase key, display name)` in first-seen order.
    entries: Vec<(String, String)>,
}

impl ToolCatalog {
    pub fn new<S: AsRef<str>>(names: &[S]) -> Self {
        let mut entries: Vec<(String, String)> = Vec::with_capacity(names.len());
        for raw in names {
            let display = raw.as_ref().trim();
            if display.is_empty() {
                continue;
            }
            let key = display.to_lowercase();
            if entries.iter().any(|(k, _)| *k == key) {
                continue;
            }
            entries.push((key, display.to_string()));
        }
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, name: &str) -> bool {
        let key = name.trim().to_lowercase();
        self.entries.iter().any(|(k, _)| *k == key)
    }

    /// Caller casing for `name`, if present.
    pub fn display_name(&self, name: &str) -> Option<&str> {
        let key = name.trim().to_lowercase();
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, display)| display.as_str())
    }

    /// Display names: canonical tools first, then the rest sorted by lowercase name.
    pub fn ordered(&self) -> Vec<&str> {
        let mut out: Vec<&str> = CANONICAL_TOOL_ORDER
            .iter()
            .filter_map(|canonical| self.display_name(canonical))
            .collect();

        let mut extras: Vec<&(String, String)> = self
            .entries
            .iter()
            .filter(|(key, _)| !CANONICAL_TOOL_ORDER.contains(&key.as_str()))
            .collect();
        extras.sort_by(|a, b| a.0.cmp(&b.0));
        out.extend(extras.into_iter().map(|(_, display)| display.as_str()));
        out
    }
}

/// Render one `- name` / `- name: summary` line per tool, in listing order.
///
/// A summary keyed with the tool's exact casing wins; otherwise keys are
/// matched case-insensitively. Blank summaries count as absent.
pub fn tool_lines(catalog: &ToolCatalog, summaries: &BTreeMap<String, String>) -> Vec<String> {
    let mut by_key: HashMap<String, &str> = HashMap::with_capacity(summaries.len());
    for (name, summary) in summaries {
        let summary = summary.trim();
        if summary.is_empty() {
            continue;
        }
        by_key.entry(name.trim().to_lowercase()).or_insert(summary);
    }

    catalog
        .ordered()
        .into_iter()
        .map(|name| {
            let exact = summaries
                .get(name)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty());
            match exact.or_else(|| by_key.get(&name.to_lowercase()).copied()) {
                Some(summary) => format!("- {name}: {summary}"),
                None => format!("- {name}"),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_tools_come_first() {
        let catalog = ToolCatalog::new(&["exec", "read"]);
        assert_eq!(catalog.ordered(), vec!["read", "exec"]);
    }

    #[test]
    fn unknown_tools_follow_sorted() {
        let catalog = ToolCatalog::new(&["zeta_tool", "exec", "Alpha_Tool", "read"]);
        assert_eq!(
            catalog.ordered(),
            vec!["read", "exec", "Alpha_Tool", "zeta_tool"]
        );
    }

    #[test]
    fn dedupes_case_insensitively_keeping_first_casing() {
        let catalog = ToolCatalog::new(&["Read", "READ", "read", " exec "]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.ordered(), vec!["Read", "exec"]);
        assert!(catalog.contains("rEaD"));
        assert_eq!(catalog.display_name("read"), Some("Read"));
    }

    #[test]
    fn blank_names_are_ignored() {
        let catalog = ToolCatalog::new(&["", "   "]);
        assert!(catalog.is_empty());
    }

    #[test]
    fn lines_without_summaries_are_bare() {
        let catalog = ToolCatalog::new(&["exec", "read"]);
        let lines = tool_lines(&catalog, &BTreeMap::new());
        assert_eq!(lines, vec!["- read", "- exec"]);
    }

    #[test]
    fn summaries_match_case_insensitively() {
        let catalog = ToolCatalog::new(&["Exec", "custom"]);
        let mut summaries = BTreeMap::new();
        summaries.insert("EXEC".to_string(), "Run commands".to_string());
        summaries.insert("custom".to_string(), "   ".to_string());
        let lines = tool_lines(&catalog, &summaries);
        assert_eq!(lines, vec!["- Exec: Run commands", "- custom"]);
    }

    #[test]
    fn exact_case_summary_wins() {
        let mut summaries = BTreeMap::new();
        summaries.insert("EXEC".to_string(), "upper".to_string());
        summaries.insert("exec".to_string(), "lower".to_string());
        let lines = tool_lines(&ToolCatalog::new(&["exec"]), &summaries);
        assert_eq!(lines, vec!["- exec: lower"]);
        let lines = tool_lines(&ToolCatalog::new(&["EXEC"]), &summaries);
        assert_eq!(lines, vec!["- EXEC: upper"]);
    }

    #[test]
    fn core_summaries_cover_canonical_order() {
        let summaries = core_tool_summaries();
        for name in CANONICAL_TOOL_ORDER {
            assert!(summaries.contains_key(*name), "missing summary for {name}");
        }
        assert_eq!(summaries.len(), CANONICAL_TOOL_ORDER.len());
    }
}
