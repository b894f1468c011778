//! Override templates: discovery under `<workspace>/.cinch/` and rendering
//! through minijinja against a projection of the [`PromptContext`].
//!
//! The projection exposes every context field under its JSON (camelCase)
//! name plus a handful of derived values:
//!
//! | Variable | Value |
//! |---|---|
//! | `mode` | `"full"`, `"minimal"`, or `"none"` |
//! | `isMinimal` / `isFull` | mode flags |
//! | `ownerLine` | owner sentence, or none |
//! | `sandboxEnabled` | `sandbox.enabled`, false when absent |
//! | `runtimeLine` | the `Runtime: …` line of the default prompt |
//! | `silentReplyToken` / `heartbeatToken` | `NO_REPLY` / `HEARTBEAT_OK` |
//! | `identity` | the default identity sentence |
//! | `availableTools` | lowercase tool set with a `has(name)` method |
//!
//! ```
//! use cinch_prompt::PromptContext;
//! use cinch_prompt::template::render_template;
//!
//! let ctx = PromptContext::new("/ws").with_tools(["Read"]);
//! let out = render_template(
//!     "{% if availableTools.has('read') %}can read {{ workspaceDir }}{% endif %}",
//!     &ctx,
//! )
//! .unwrap();
//! assert_eq!(out, "can read /ws");
//! ```

use std::path::Path;
use std::sync::Arc;

use minijinja::value::{Enumerator, Object, ObjectRepr, ValueKind, from_args};
use minijinja::{Environment, Error, ErrorKind, Output, State, Value, context, escape_formatter};
use tracing::debug;

use crate::context::PromptContext;
use crate::error::Result;
use crate::sections::{HEARTBEAT_TOKEN, IDENTITY_LINE, SILENT_REPLY_TOKEN, runtime_line};
use crate::tools::ToolCatalog;

/// Directory (relative to the workspace) holding the override template.
pub const TEMPLATE_DIR: &str = ".cinch";

/// Default override template file name.
pub const TEMPLATE_FILE: &str = "SYSTEM_PROMPT.md";

/// Read `<workspace>/.cinch/<file_name>`.
///
/// Any failure (missing file, permissions, invalid UTF-8) means no override.
/// A blank workspace path never has an override.
pub fn find_override(workspace_dir: &str, file_name: &str) -> Option<String> {
    let workspace_dir = workspace_dir.trim();
    if workspace_dir.is_empty() {
        return None;
    }
    let path = Path::new(workspace_dir).join(TEMPLATE_DIR).join(file_name);
    match std::fs::read_to_string(&path) {
        Ok(source) => {
            debug!("Using override template {}", path.display());
            Some(source)
        }
        Err(e) => {
            debug!("No override template at {}: {e}", path.display());
            None
        }
    }
}

/// Tool names as a set-like template value.
///
/// Iterates lowercase names in listing order; `has(name)` is case-insensitive.
#[derive(Debug)]
struct ToolNameSet {
    names: Vec<String>,
}

impl ToolNameSet {
    fn new(catalog: &ToolCatalog) -> Self {
        Self {
            names: catalog.ordered().iter().map(|n| n.to_lowercase()).collect(),
        }
    }

    fn has(&self, name: &str) -> bool {
        let key = name.trim().to_lowercase();
        self.names.iter().any(|n| *n == key)
    }
}

impl Object for ToolNameSet {
    fn repr(self: &Arc<Self>) -> ObjectRepr {
        ObjectRepr::Seq
    }

    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        let index = key.as_usize()?;
        self.names.get(index).map(|n| Value::from(n.as_str()))
    }

    fn enumerate(self: &Arc<Self>) -> Enumerator {
        Enumerator::Seq(self.names.len())
    }

    fn call_method(
        self: &Arc<Self>,
        _state: &State<'_, '_>,
        method: &str,
        args: &[Value],
    ) -> std::result::Result<Value, Error> {
        match method {
            "has" => {
                let (name,): (String,) = from_args(args)?;
                Ok(Value::from(self.has(&name)))
            }
            _ => Err(Error::new(
                ErrorKind::UnknownMethod,
                format!("availableTools has no method named {method}"),
            )),
        }
    }
}

/// Template variables for `ctx`.
pub fn projection(ctx: &PromptContext) -> Value {
    let catalog = ToolCatalog::new(&ctx.tool_names);
    context! {
        mode => ctx.prompt_mode.as_str(),
        isMinimal => ctx.is_minimal(),
        isFull => !ctx.is_minimal(),
        ownerLine => ctx.owner_line(),
        sandboxEnabled => ctx.sandbox_enabled(),
        runtimeLine => runtime_line(ctx),
        silentReplyToken => SILENT_REPLY_TOKEN,
        heartbeatToken => HEARTBEAT_TOKEN,
        identity => IDENTITY_LINE,
        availableTools => Value::from_object(ToolNameSet::new(&catalog)),
        ..Value::from_serialize(ctx)
    }
}

/// Render an override template against the context projection.
///
/// Undefined variables render empty, booleans render as `true`/`false`, and
/// a trailing newline in `source` is kept.
pub fn render_template(source: &str, ctx: &PromptContext) -> Result<String> {
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    env.set_formatter(format_value);
    Ok(env.render_str(source, projection(ctx))?)
}

fn format_value(
    out: &mut Output<'_>,
    state: &State<'_, '_>,
    value: &Value,
) -> std::result::Result<(), Error> {
    if value.kind() == ValueKind::Bool {
        let text = if value.is_true() { "true" } else { "false" };
        return out
            .write_str(text)
            .map_err(|e| Error::new(ErrorKind::WriteFailure, "failed to write output").with_source(e));
    }
    escape_formatter(out, state, value)
}
