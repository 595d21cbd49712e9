//! Static display catalogue for built-in agent tools.

use serde::{Deserialize, Serialize};

/// Icon shown next to a tool call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolIcon {
    Shell,
    Edit,
    Browser,
    Search,
}

/// Detail view used to render a tool call's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolView {
    Shell,
    File,
    Search,
    Browser,
    Mcp,
    Ssh,
}

/// One built-in function: `(function, label, primary argument)`.
///
/// | Group    | Functions                                        |
/// |----------|--------------------------------------------------|
/// | shell    | `shell_*` process control, `ssh_node_*` remote   |
/// | file     | `file_*` read / write / search                   |
/// | browser  | `browser_*` navigation and input                 |
/// | info     | `info_search_web`                                |
/// | message  | `message_*` user interaction                     |
const FUNCTIONS: &[(&str, &str, &str)] = &[
    ("shell_exec", "Executing command", "command"),
    ("shell_view", "Viewing command output", "shell"),
    ("shell_wait", "Waiting for command completion", "shell"),
    ("shell_write_to_process", "Writing data to process", "input"),
    ("shell_kill_process", "Terminating process", "shell"),
    ("ssh_node_list", "Listing server nodes", "node_id"),
    ("ssh_node_exec", "Running SSH command", "command"),
    ("ssh_node_monitor", "Reading server monitor", "node_id"),
    ("file_read", "Reading file", "file"),
    ("file_write", "Writing file", "file"),
    ("file_str_replace", "Replacing file content", "file"),
    ("file_find_in_content", "Searching file content", "file"),
    ("file_find_by_name", "Finding file", "path"),
    ("browser_view", "Viewing webpage", "page"),
    ("browser_navigate", "Navigating to webpage", "url"),
    ("browser_restart", "Restarting browser", "url"),
    ("browser_click", "Clicking element", "element"),
    ("browser_input", "Entering text", "text"),
    ("browser_move_mouse", "Moving mouse", "position"),
    ("browser_press_key", "Pressing key", "key"),
    ("browser_select_option", "Selecting option", "option"),
    ("browser_scroll_up", "Scrolling up", "page"),
    ("browser_scroll_down", "Scrolling down", "page"),
    ("browser_console_exec", "Executing JS code", "code"),
    ("browser_console_view", "Viewing console output", "console"),
    ("info_search_web", "Searching web", "query"),
    ("message_notify_user", "Sending notification", "message"),
    ("message_ask_user", "Asking question", "question"),
];

fn function_entry(function: &str) -> Option<&'static (&'static str, &'static str, &'static str)> {
    FUNCTIONS.iter().find(|(name, _, _)| *name == function)
}

/// Human label for a built-in function, e.g. `shell_exec` → `Executing command`.
pub fn function_label(function: &str) -> Option<&'static str> {
    function_entry(function).map(|(_, label, _)| *label)
}

/// Name of the argument shown as a call's primary argument.
pub fn function_arg_key(function: &str) -> Option<&'static str> {
    function_entry(function).map(|(_, _, arg)| *arg)
}

/// Display label for a tool (or `mcp_<alias>` server key).
pub fn tool_label(name: &str) -> Option<&'static str> {
    let label = match name {
        "shell" | "ssh" => "Terminal",
        "file" => "File",
        "browser" => "Browser",
        "info" => "Information",
        "message" => "Message",
        "mcp" => "MCP Tool",
        "mcp_vision" => "BigModel Vision MCP",
        "mcp_search" => "BigModel Search MCP",
        "mcp_reader" => "BigModel Reader MCP",
        "mcp_zread" => "BigModel ZRead MCP",
        _ => return None,
    };
    Some(label)
}

/// Icon for a tool.  `message` has none.
pub fn tool_icon(name: &str) -> Option<ToolIcon> {
    match name {
        "shell" | "ssh" => Some(ToolIcon::Shell),
        "file" | "mcp_zread" => Some(ToolIcon::Edit),
        "browser" | "mcp_vision" | "mcp_reader" => Some(ToolIcon::Browser),
        "search" | "mcp" | "mcp_search" => Some(ToolIcon::Search),
        _ => None,
    }
}

/// Output view for a tool.
pub fn tool_view(name: &str) -> Option<ToolView> {
    match name {
        "shell" => Some(ToolView::Shell),
        "file" => Some(ToolView::File),
        "search" => Some(ToolView::Search),
        "browser" => Some(ToolView::Browser),
        "mcp" => Some(ToolView::Mcp),
        "ssh" => Some(ToolView::Ssh),
        _ => None,
    }
}
