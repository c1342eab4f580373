//! Bags Launch CLI
//!
//! Command-line definition, startup (logging, config resolution) and
//! dispatch to the command handlers.

use crate::cli_config::{effective_defaults, load_config};
use crate::commands;
use crate::error::CliResult;
use crate::logic::config::{resolve_settings, validate_output_format, LaunchSettings, SettingsOverrides};
use crate::logic::launch::DEFAULT_CREATOR_PERCENT;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use serde_json::Value;

/// Bags token launch CLI
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(name = "launch-cli")]
pub struct LaunchCli {
    /// Configuration file path
    #[arg(short, long, env = "LAUNCH_CONFIG")]
    pub config: Option<String>,

    /// Named profile from CLI config
    #[arg(long, env = "LAUNCH_PROFILE")]
    pub profile: Option<String>,

    /// Enable verbose output
    #[arg(short, long, env = "LAUNCH_VERBOSE")]
    pub verbose: bool,

    /// Output format (json, table)
    #[arg(short, long, default_value = "table", env = "LAUNCH_FORMAT")]
    pub format: String,

    /// Launch API base URL
    #[arg(long, env = "BAGS_API_URL")]
    pub api_url: Option<String>,

    /// Launch API key
    #[arg(long, env = "BAGS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Solana RPC endpoint
    #[arg(long, env = "SOLANA_RPC_URL")]
    pub rpc_url: Option<String>,

    /// Helius API key, used when no RPC URL is set
    #[arg(long, env = "HELIUS_API_KEY", hide_env_values = true)]
    pub helius_api_key: Option<String>,

    /// Solana keypair file that pays for and signs the launch
    #[arg(short, long, env = "LAUNCH_KEYPAIR")]
    pub keypair: Option<String>,

    #[command(subcommand)]
    pub command: LaunchCommand,
}

impl LaunchCli {
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            api_url: self.api_url.clone(),
            api_key: self.api_key.clone(),
            rpc_url: self.rpc_url.clone(),
            helius_api_key: self.helius_api_key.clone(),
            keypair: self.keypair.clone(),
        }
    }
}

/// Launch CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum LaunchCommand {
    /// Create and launch a new token
    Launch(LaunchArgs),

    /// Look up the fee wallet registered for a social handle
    FeeWallet(FeeWalletArgs),

    /// Check that the launch API is reachable
    Ping,

    /// Configuration management
    Config(ConfigArgs),
}

/// Launch command
#[derive(Args, Debug, Clone)]
pub struct LaunchArgs {
    /// Token name
    #[arg(long)]
    pub name: String,

    /// Token symbol
    #[arg(long)]
    pub symbol: String,

    /// Token description
    #[arg(long, default_value = "")]
    pub description: String,

    /// Token image (png, jpg, gif or webp, at most 15MB)
    #[arg(long)]
    pub image: Option<String>,

    /// Social handle that shares the trading fees (@handle or profile URL)
    #[arg(long)]
    pub username: Option<String>,

    /// Platform of the handle (default from config, else twitter)
    #[arg(long)]
    pub platform: Option<String>,

    /// Percent of fees kept by the creator when sharing; the handle gets the rest
    #[arg(long, default_value_t = DEFAULT_CREATOR_PERCENT)]
    pub creator_percent: f64,

    /// SOL spent buying the new token at launch
    #[arg(long, default_value_t = 0.0)]
    pub initial_buy_sol: f64,

    /// Project website
    #[arg(long)]
    pub website: Option<String>,

    /// Project Twitter/X link
    #[arg(long)]
    pub twitter: Option<String>,

    /// Project Telegram link
    #[arg(long)]
    pub telegram: Option<String>,

    /// Sign without asking for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

/// Fee wallet lookup command
#[derive(Args, Debug, Clone)]
pub struct FeeWalletArgs {
    /// Social handle (@handle or profile URL)
    #[arg(long)]
    pub username: String,

    /// Platform of the handle (default from config, else twitter)
    #[arg(long)]
    pub platform: Option<String>,
}

/// Configuration command
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show the effective configuration (secrets masked)
    Show,
    /// Write a starter configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolve the settings commands run with: config file, profile, then flags
pub fn load_settings(cli: &LaunchCli) -> CliResult<LaunchSettings> {
    let config = load_config(cli.config.as_deref())?;
    let file_defaults = effective_defaults(&config, cli.profile.as_deref())?;
    let settings = resolve_settings(&file_defaults, &cli.overrides(), dirs::home_dir().as_deref())?;
    tracing::debug!("Using launch API at {}", settings.api_url);
    Ok(settings)
}

/// Main CLI runner
pub async fn run_cli() -> Result<()> {
    let cli = LaunchCli::parse();
    init_tracing(cli.verbose);
    validate_output_format(&cli.format)?;

    match &cli.command {
        LaunchCommand::Launch(args) => commands::launch::handle_launch_command(args.clone(), &cli).await.map_err(anyhow::Error::msg),
        LaunchCommand::FeeWallet(args) => commands::fee_wallet::handle_fee_wallet_command(args.clone(), &cli).await.map_err(anyhow::Error::msg),
        LaunchCommand::Ping => commands::ping::handle_ping_command(&cli).await.map_err(anyhow::Error::msg),
        LaunchCommand::Config(args) => commands::config::handle_config_command(args.clone(), &cli).await.map_err(anyhow::Error::msg),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

/// Format output based on CLI format preference
pub fn format_output(data: &Value, format: &str) -> CliResult<String> {
    match format.to_lowercase().as_str() {
        "json" => Ok(serde_json::to_string_pretty(data)?),
        _ => {
            if let Some(obj) = data.as_object() {
                let mut result = String::new();
                for (key, value) in obj {
                    match value.as_object() {
                        Some(nested) => {
                            for (inner_key, inner) in nested {
                                result.push_str(&format!(
                                    "{:<24} {}\n",
                                    format!("{}.{}", key, inner_key),
                                    display_value(inner)
                                ));
                            }
                        }
                        None => result.push_str(&format!("{:<24} {}\n", key, display_value(value))),
                    }
                }
                Ok(result)
            } else if let Some(array) = data.as_array() {
                let mut result = String::new();
                for (i, item) in array.iter().enumerate() {
                    result.push_str(&format!("[{}] {}\n", i, display_value(item)));
                }
                Ok(result)
            } else {
                Ok(display_value(data))
            }
        }
    }
}
