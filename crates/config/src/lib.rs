use std::env;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

// ── MCP result handling ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct McpConfig {
    /// Layers of JSON-encoded strings unwrapped when normalizing a tool
    /// result.  Overridden by `OPSAGENT_MAX_DECODE_DEPTH` when it parses.
    pub max_decode_depth: usize,
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            max_decode_depth: 4,
        }
    }
}

// ── Tool call display ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// MCP string arguments shorter than this many characters are shown
    /// verbatim in the call header.
    pub arg_preview_max_len: usize,
    /// Longer or structured arguments are cut to this many characters of
    /// their JSON form and suffixed with `...`.
    pub arg_truncate_len: usize,
    /// Prefix stripped from `file` arguments of built-in file tools.
    /// Empty disables stripping.
    pub workspace_home_prefix: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            arg_preview_max_len: 50,
            arg_truncate_len: 30,
            workspace_home_prefix: "/home/ubuntu/".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub mcp: McpConfig,
    pub display: DisplayConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = Self::default();
        if let Ok(raw) = fs::read_to_string(path) {
            config = toml::from_str(&raw)
                .with_context(|| format!("failed to parse config {}", path.display()))?;
        }

        if let Ok(level) = env::var("OPSAGENT_LOG_LEVEL") {
            if !level.trim().is_empty() {
                config.telemetry.log_level = level.trim().to_string();
            }
        }

        // Unparseable values are ignored rather than rejected.
        if let Some(depth) = env::var("OPSAGENT_MAX_DECODE_DEPTH")
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
        {
            config.mcp.max_decode_depth = depth;
        }

        Ok(config)
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }

        let rendered = toml::to_string_pretty(self)?;
        fs::write(path, rendered)?;
        Ok(())
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
