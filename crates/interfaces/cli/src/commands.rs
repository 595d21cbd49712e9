use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::Value;
use tracing::debug;

use opsagent_config::AppConfig;
use opsagent_mcp::{LinkItem, ResultNormalizer, parse_tool_function_name};
use opsagent_tools::{DisplayOptions, ToolCall, describe_tool};

/// Read a raw tool result from `path`, or stdin when `path` is `None` or `-`.
///
/// One trailing newline is dropped; it comes from the file or the shell, not
/// from the tool.
pub(crate) fn read_input(path: Option<&Path>) -> Result<String> {
    let mut raw = match path {
        Some(p) if p != Path::new("-") => fs::read_to_string(p)
            .with_context(|| format!("failed to read tool result from {}", p.display()))?,
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    if raw.ends_with('\n') {
        raw.pop();
        if raw.ends_with('\r') {
            raw.pop();
        }
    }
    Ok(raw)
}

pub(crate) fn run_normalize(config: &AppConfig, input: &str, links_only: bool) -> Result<String> {
    let normalizer = ResultNormalizer::new(config.mcp.max_decode_depth);
    // The raw text goes in as a string; the normalizer does the decoding.
    let result = normalizer.normalize(&Value::String(input.to_string()));
    debug!(links = result.links.len(), "normalized tool result");

    if links_only {
        return Ok(format_links(&result.links));
    }
    Ok(serde_json::to_string_pretty(&result)?)
}

pub(crate) fn format_links(links: &[LinkItem]) -> String {
    links
        .iter()
        .map(|link| format!("{}\t{}", link.title, link.url))
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn run_parse_function(name: &str) -> Result<String> {
    Ok(serde_json::to_string_pretty(&parse_tool_function_name(name))?)
}

pub(crate) fn display_options(config: &AppConfig) -> DisplayOptions {
    DisplayOptions {
        arg_preview_max_len: config.display.arg_preview_max_len,
        arg_truncate_len: config.display.arg_truncate_len,
        workspace_home_prefix: config.display.workspace_home_prefix.clone(),
    }
}

pub(crate) fn run_describe(
    config: &AppConfig,
    name: String,
    function: String,
    args: Option<&str>,
) -> Result<String> {
    let args = match args {
        None => Default::default(),
        Some(raw) => match serde_json::from_str::<Value>(raw)
            .context("--args must be valid JSON")?
        {
            Value::Object(map) => map,
            other => bail!("--args must be a JSON object, got: {other}"),
        },
    };
    let call = ToolCall {
        name,
        function,
        args,
    };
    let info = describe_tool(&call, &display_options(config));
    Ok(serde_json::to_string_pretty(&info)?)
}

pub(crate) fn run_config_init(path: &Path, force: bool) -> Result<String> {
    if path.exists() && !force {
        bail!(
            "{} already exists; pass --force to overwrite",
            path.display()
        );
    }
    AppConfig::default().save_to(path)?;
    Ok(format!("wrote default config to {}", path.display()))
}
