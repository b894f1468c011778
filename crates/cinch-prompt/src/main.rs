//! Print the system prompt for a cinch agent context.
//!
//! # Examples
//!
//! ```sh
//! # Default prompt for a workspace with two tools
//! cinch-prompt --workspace . --tool read --tool exec
//!
//! # Sub-agent prompt from a JSON context, listing active sections only
//! cinch-prompt --context ctx.json --mode minimal --sections
//! ```

use std::path::PathBuf;

use cinch_prompt::{
    AssemblerOptions, ContextFile, PromptAssembler, PromptContext, PromptError, PromptMode,
    RuntimeInfo, active_sections, load_context,
};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Assemble and print a cinch system prompt.
#[derive(Parser)]
#[command(name = "cinch-prompt")]
struct Cli {
    /// JSON prompt context (camelCase keys). Defaults to an empty context.
    #[arg(long)]
    context: Option<PathBuf>,

    /// Workspace directory (overrides `workspaceDir`).
    #[arg(long)]
    workspace: Option<String>,

    /// Prompt mode: full, minimal, or none.
    #[arg(long)]
    mode: Option<PromptMode>,

    /// Tool name to add. Repeatable.
    #[arg(long = "tool")]
    tools: Vec<String>,

    /// File to inject as project context. Repeatable.
    #[arg(long = "context-file")]
    context_files: Vec<PathBuf>,

    /// Fill missing host, OS, architecture, and current time from this process.
    #[arg(long)]
    detect_runtime: bool,

    /// Ignore `.cinch/SYSTEM_PROMPT.md` in the workspace.
    #[arg(long)]
    no_override: bool,

    /// Print the names of the active default sections instead of the prompt.
    #[arg(long)]
    sections: bool,
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env("CINCH_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let ctx = match build_context(&cli) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if cli.sections {
        for name in active_sections(&ctx) {
            println!("{name}");
        }
        return;
    }

    let options = if cli.no_override {
        AssemblerOptions::without_override()
    } else {
        AssemblerOptions::default()
    };
    println!("{}", PromptAssembler::new(options).assemble(&ctx));
}

fn build_context(cli: &Cli) -> Result<PromptContext, PromptError> {
    let mut ctx = match &cli.context {
        Some(path) => load_context(path)?,
        None => PromptContext::default(),
    };

    if let Some(workspace) = &cli.workspace {
        // Resolve to an absolute path when it exists.
        ctx.workspace_dir = std::fs::canonicalize(workspace)
            .unwrap_or_else(|_| PathBuf::from(workspace))
            .to_string_lossy()
            .to_string();
    }
    if let Some(mode) = cli.mode {
        ctx.prompt_mode = mode;
    }
    ctx.tool_names.extend(cli.tools.iter().cloned());

    for path in &cli.context_files {
        let content = std::fs::read_to_string(path).map_err(|source| PromptError::Io {
            path: path.clone(),
            source,
        })?;
        ctx.context_files
            .push(ContextFile::new(path.to_string_lossy(), content));
    }

    if cli.detect_runtime {
        let mut runtime = ctx.runtime.take().unwrap_or_default();
        runtime.fill_missing(RuntimeInfo::detect());
        debug!("Detected runtime: {runtime:?}");
        ctx.runtime = Some(runtime);
        if ctx.user_time.is_none() {
            ctx.user_time = Some(
                chrono::Local::now()
                    .format("%A, %B %-d, %Y %H:%M")
                    .to_string(),
            );
        }
    }

    Ok(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_for(args: &[&str]) -> Result<PromptContext, PromptError> {
        let argv = std::iter::once("cinch-prompt").chain(args.iter().copied());
        build_context(&Cli::try_parse_from(argv).unwrap())
    }

    fn write_json(dir: &std::path::Path, json: &str) -> String {
        let path = dir.join("ctx.json");
        std::fs::write(&path, json).unwrap();
        path.to_string_lossy().to_string()
    }

    #[test]
    fn no_flags_is_default_context() {
        assert_eq!(context_for(&[]).unwrap(), PromptContext::default());
    }

    #[test]
    fn workspace_is_canonicalized() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("ws");
        std::fs::create_dir_all(&nested).unwrap();
        let dotted = dir.path().join("ws").join("..").join("ws");

        let ctx = context_for(&["--workspace", &dotted.to_string_lossy()]).unwrap();
        let expected = std::fs::canonicalize(&nested).unwrap();
        assert_eq!(ctx.workspace_dir, expected.to_string_lossy());
    }

    #[test]
    fn missing_workspace_is_kept_verbatim() {
        let ctx = context_for(&["--workspace", "/no/such/cinch/ws"]).unwrap();
        assert_eq!(ctx.workspace_dir, "/no/such/cinch/ws");
    }

    #[test]
    fn flags_override_and_extend_json() {
        let dir = tempfile::tempdir().unwrap();
        let json = write_json(
            dir.path(),
            r#"{"workspaceDir": "/from/json", "promptMode": "full", "toolNames": ["read"]}"#,
        );
        let ctx = context_for(&[
            "--context", &json, "--mode", "minimal", "--tool", "exec", "--tool", "message",
        ])
        .unwrap();
        assert_eq!(ctx.workspace_dir, "/from/json");
        assert_eq!(ctx.prompt_mode, PromptMode::Minimal);
        assert_eq!(ctx.tool_names, vec!["read", "exec", "message"]);
    }

    #[test]
    fn context_files_are_injected() {
        let dir = tempfile::tempdir().unwrap();
        let agents = dir.path().join("AGENTS.md");
        std::fs::write(&agents, "Be brief.").unwrap();
        let agents = agents.to_string_lossy().to_string();

        let ctx = context_for(&["--context-file", &agents]).unwrap();
        assert_eq!(ctx.context_files, vec![ContextFile::new(agents.clone(), "Be brief.")]);
    }

    #[test]
    fn detect_runtime_fills_only_missing_values() {
        let dir = tempfile::tempdir().unwrap();
        let json = write_json(
            dir.path(),
            r#"{"runtime": {"host": "configured", "agentId": "main"}, "userTime": "Monday 09:00"}"#,
        );
        let ctx = context_for(&["--context", &json, "--detect-runtime"]).unwrap();
        let runtime = ctx.runtime.as_ref().unwrap();
        assert_eq!(runtime.host.as_deref(), Some("configured"));
        assert_eq!(runtime.agent_id.as_deref(), Some("main"));
        assert_eq!(runtime.os.as_deref(), Some(std::env::consts::OS));
        assert_eq!(runtime.arch.as_deref(), Some(std::env::consts::ARCH));
        assert_eq!(ctx.user_time.as_deref(), Some("Monday 09:00"));
    }

    #[test]
    fn detect_runtime_stamps_time_when_missing() {
        let ctx = context_for(&["--detect-runtime"]).unwrap();
        assert!(ctx.runtime.is_some());
        assert!(ctx.user_time.is_some_and(|t| !t.is_empty()));
    }

    #[test]
    fn without_detect_runtime_nothing_is_filled() {
        let ctx = context_for(&["--tool", "read"]).unwrap();
        assert!(ctx.runtime.is_none());
        assert!(ctx.user_time.is_none());
    }

    #[test]
    fn unreadable_context_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json");
        let err = context_for(&["--context", &missing.to_string_lossy()]).unwrap_err();
        assert!(matches!(err, PromptError::Io { ref path, .. } if *path == missing));
    }

    #[test]
    fn invalid_context_json_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let json = write_json(dir.path(), "{ not json");
        let err = context_for(&["--context", &json]).unwrap_err();
        assert!(matches!(err, PromptError::InvalidContext { .. }));
    }

    #[test]
    fn unreadable_context_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("MISSING.md");
        let err = context_for(&["--context-file", &missing.to_string_lossy()]).unwrap_err();
        assert!(matches!(err, PromptError::Io { ref path, .. } if *path == missing));
    }

    #[test]
    fn bad_mode_is_rejected_by_the_parser() {
        assert!(Cli::try_parse_from(["cinch-prompt", "--mode", "loud"]).is_err());
    }
}
