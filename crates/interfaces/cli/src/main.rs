mod commands;

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use opsagent_config::AppConfig;

#[derive(Debug, Parser)]
#[command(
    name = "opsagent",
    version,
    about = "Inspect agent tool calls: parse MCP function names, normalize tool results"
)]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, global = true, default_value = "config/default.toml")]
    config: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Normalize a raw tool result read from PATH (or stdin).
    Normalize {
        /// File holding the raw result; `-` or omitted reads stdin.
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,
        /// Print only the extracted links, one `title<TAB>url` per line.
        #[arg(long)]
        links: bool,
    },
    /// Split an MCP function name into server and tool parts.
    #[command(name = "parse-function")]
    ParseFunction {
        name: String,
    },
    /// Describe a tool call the way the UI header shows it.
    Describe {
        /// Tool family, e.g. `shell` or `mcp`.
        name: String,
        /// Function name, e.g. `shell_exec`.
        function: String,
        /// Call arguments as a JSON object.
        #[arg(long)]
        args: Option<String>,
    },
    /// Show or initialise configuration.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration (file + env overrides).
    Show,
    /// Write a default config file.
    Init {
        /// Destination; defaults to the global `--config` path.
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

/// `config init` has to work when the existing file does not parse, so it
/// never reads it.
fn loads_config(command: &Commands) -> bool {
    !matches!(
        command,
        Commands::Config {
            command: ConfigCommands::Init { .. }
        }
    )
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = if loads_config(&cli.command) {
        AppConfig::load_from(&cli.config)?
    } else {
        AppConfig::default()
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.telemetry.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let output = match cli.command {
        Commands::Normalize { path, links } => {
            let input = commands::read_input(path.as_deref())?;
            commands::run_normalize(&config, &input, links)?
        }
        Commands::ParseFunction { name } => commands::run_parse_function(&name)?,
        Commands::Describe {
            name,
            function,
            args,
        } => commands::run_describe(&config, name, function, args.as_deref())?,
        Commands::Config { command } => match command {
            ConfigCommands::Show => config.to_toml()?,
            ConfigCommands::Init { path, force } => {
                let path = path.unwrap_or(cli.config);
                commands::run_config_init(&path, force)?
            }
        },
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", output.trim_end())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn config_init_skips_loading_config() {
        let cli = parse(&["opsagent", "--config", "broken.toml", "config", "init", "--force"]);
        assert!(!loads_config(&cli.command));
    }

    #[test]
    fn other_commands_load_config() {
        for args in [
            &["opsagent", "config", "show"][..],
            &["opsagent", "parse-function", "mcp_search"][..],
            &["opsagent", "normalize", "-"][..],
            &["opsagent", "describe", "shell", "shell_exec"][..],
        ] {
            assert!(loads_config(&parse(args).command), "{args:?}");
        }
    }
}
