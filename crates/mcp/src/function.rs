//! Parsing of MCP tool function names.
//!
//! The agent names MCP tools `mcp_<server>_<tool>`.  Known BigModel servers
//! are spelled several ways depending on where the tool was registered, so
//! each alias carries a list of accepted prefixes.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Marker the agent puts in front of every MCP tool function.
pub const MCP_FUNCTION_PREFIX: &str = "mcp_";

/// Server family an MCP function belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerAlias {
    Vision,
    Search,
    Reader,
    Zread,
    Generic,
}

impl ServerAlias {
    /// Lowercase tag, also used to build `mcp_<alias>` catalogue keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vision => "vision",
            Self::Search => "search",
            Self::Reader => "reader",
            Self::Zread => "zread",
            Self::Generic => "generic",
        }
    }

    /// Display label for the server.
    pub fn label(self) -> &'static str {
        match self {
            Self::Vision => "BigModel Vision MCP",
            Self::Search => "BigModel Search MCP",
            Self::Reader => "BigModel Reader MCP",
            Self::Zread => "BigModel ZRead MCP",
            Self::Generic => "MCP Tool",
        }
    }
}

impl std::fmt::Display for ServerAlias {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Known server prefixes.  Order matters: the first entry that matches wins,
/// even if a later one would match a longer prefix.
const SERVER_ALIASES: &[(ServerAlias, &[&str])] = &[
    (ServerAlias::Vision, &["bigmodel_vision", "zai_vision", "vision"]),
    (ServerAlias::Search, &["bigmodel_search", "web_search_prime", "search"]),
    (ServerAlias::Reader, &["bigmodel_reader", "web_reader", "reader"]),
    (ServerAlias::Zread, &["bigmodel_zread", "zread"]),
];

/// A function name split into its server and tool parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedFunction {
    pub server_id: String,
    pub server_alias: ServerAlias,
    pub tool_name: String,
    /// The function name with the `mcp_` marker removed.
    pub raw_function: String,
}

/// Whether `name` carries the MCP function marker.
pub fn is_mcp_function(name: &str) -> bool {
    name.starts_with(MCP_FUNCTION_PREFIX)
}

/// Split an MCP function name into server id, alias, and tool name.
///
/// Never fails: names that match no known server fall back to splitting at
/// the first `_`, and names without any separator get `server_id = "unknown"`.
pub fn parse_tool_function_name(name: &str) -> ParsedFunction {
    let raw = name.strip_prefix(MCP_FUNCTION_PREFIX).unwrap_or(name);

    for (alias, prefixes) in SERVER_ALIASES {
        for prefix in *prefixes {
            if let Some(tool) = raw
                .strip_prefix(prefix)
                .and_then(|rest| rest.strip_prefix('_'))
            {
                return ParsedFunction {
                    server_id: (*prefix).to_string(),
                    server_alias: *alias,
                    tool_name: tool.to_string(),
                    raw_function: raw.to_string(),
                };
            }
            if raw == *prefix {
                return ParsedFunction {
                    server_id: (*prefix).to_string(),
                    server_alias: *alias,
                    tool_name: (*prefix).to_string(),
                    raw_function: raw.to_string(),
                };
            }
        }
    }

    debug!(function = raw, "no known MCP server prefix, using generic split");
    match raw.find('_') {
        Some(idx) if idx > 0 => ParsedFunction {
            server_id: raw[..idx].to_string(),
            server_alias: ServerAlias::Generic,
            tool_name: raw[idx + 1..].to_string(),
            raw_function: raw.to_string(),
        },
        _ => ParsedFunction {
            server_id: "unknown".to_string(),
            server_alias: ServerAlias::Generic,
            tool_name: raw.to_string(),
            raw_function: raw.to_string(),
        },
    }
}
