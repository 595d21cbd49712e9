use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use opsagent_mcp::{is_mcp_function, parse_tool_function_name, render_text};

pub mod catalogue;
pub use catalogue::{
    ToolIcon, ToolView, function_arg_key, function_label, tool_icon, tool_label, tool_view,
};

// ── Tool call description ────────────────────────────────────────────────────

/// A tool invocation as it arrives on the agent event stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Tool family, e.g. `shell`, `browser`, `mcp`.
    pub name: String,
    /// Concrete function, e.g. `shell_exec` or `mcp_bigmodel_search_query`.
    pub function: String,
    #[serde(default)]
    pub args: Map<String, Value>,
}

/// Knobs for how a call's primary argument is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayOptions {
    /// MCP string arguments shorter than this (in chars) are shown as-is.
    pub arg_preview_max_len: usize,
    /// Everything else is cut to this many chars of its JSON form.
    pub arg_truncate_len: usize,
    /// Stripped from the front of `file` arguments.
    pub workspace_home_prefix: String,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            arg_preview_max_len: 50,
            arg_truncate_len: 30,
            workspace_home_prefix: "/home/ubuntu/".to_string(),
        }
    }
}

/// Everything the UI needs to render the header of a tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInfo {
    pub icon: Option<ToolIcon>,
    /// Tool label; empty when the tool is not in the catalogue.
    pub name: String,
    /// Function label, or the raw function name when unknown.
    pub function: String,
    pub function_arg: String,
    pub view: Option<ToolView>,
}

/// Describe a tool call for display.
///
/// MCP calls (`mcp_*` functions) are labelled by their parsed server alias
/// and show their first argument; built-in calls use the static catalogue.
pub fn describe_tool(call: &ToolCall, opts: &DisplayOptions) -> ToolInfo {
    if is_mcp_function(&call.function) {
        describe_mcp(call, opts)
    } else {
        describe_builtin(call, opts)
    }
}

fn describe_mcp(call: &ToolCall, opts: &DisplayOptions) -> ToolInfo {
    let parsed = parse_tool_function_name(&call.function);
    let server_key = format!("mcp_{}", parsed.server_alias);

    let function_arg = call
        .args
        .values()
        .next()
        .map(|first| preview_arg(first, opts))
        .unwrap_or_default();

    ToolInfo {
        icon: tool_icon(&server_key).or_else(|| tool_icon("mcp")),
        name: tool_label(&server_key)
            .unwrap_or_else(|| parsed.server_alias.label())
            .to_string(),
        function: parsed.tool_name,
        function_arg,
        view: Some(ToolView::Mcp),
    }
}

fn describe_builtin(call: &ToolCall, opts: &DisplayOptions) -> ToolInfo {
    let arg_key = function_arg_key(&call.function);
    let mut function_arg = arg_key
        .and_then(|key| call.args.get(key))
        .map(render_text)
        .unwrap_or_default();
    if arg_key == Some("file") && !opts.workspace_home_prefix.is_empty() {
        if let Some(rest) = function_arg.strip_prefix(opts.workspace_home_prefix.as_str()) {
            function_arg = rest.to_string();
        }
    }

    let function = match function_label(&call.function) {
        Some(label) => label.to_string(),
        None => {
            debug!(function = %call.function, "function not in tool catalogue");
            call.function.clone()
        }
    };

    ToolInfo {
        icon: tool_icon(&call.name),
        name: tool_label(&call.name).unwrap_or_default().to_string(),
        function,
        function_arg,
        view: tool_view(&call.name),
    }
}

/// Short preview of an MCP argument value.
fn preview_arg(value: &Value, opts: &DisplayOptions) -> String {
    if let Value::String(s) = value {
        if s.chars().count() < opts.arg_preview_max_len {
            return s.clone();
        }
    }
    let json = value.to_string();
    let head: String = json.chars().take(opts.arg_truncate_len).collect();
    format!("{head}...")
}

// ── Tests ────────────────────────────────────────────────────────────────────
