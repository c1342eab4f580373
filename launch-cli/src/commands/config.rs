//! Configuration management command
//!
//! Architecture: Functional Core, Imperative Shell (FCIS)
//!
//! - **Pure Logic**: settings summary with secrets masked (`logic::config`)
//! - **Imperative Shell**: config file loading and writing, printing
//! - **Testability**: Output trait injection for testing

use crate::argument_parsing::{format_output, load_settings, ConfigAction, ConfigArgs, LaunchCli};
use crate::cli_config::{config_path, config_template, write_config_text};
use crate::error::{CliError, CliResult};
use crate::logic::config::{settings_summary, LaunchSettings};
use crate::output::{ConsoleOutput, Output};
use std::path::Path;

/// Handle config command
pub async fn handle_config_command(args: ConfigArgs, cli: &LaunchCli) -> CliResult<()> {
    let output = ConsoleOutput;
    match args.action {
        ConfigAction::Show => {
            let settings = load_settings(cli)?;
            show_config(&settings, &config_path(cli.config.as_deref()), &cli.format, &output)
        }
        // Init runs before a config file exists, so settings are not loaded
        ConfigAction::Init { force } => init_config(cli.config.as_deref(), force, &output),
    }
}

/// Print the effective settings
pub fn show_config(
    settings: &LaunchSettings,
    path: &Path,
    format: &str,
    output: &dyn Output,
) -> CliResult<()> {
    output.header("Launch CLI configuration")?;
    if path.exists() {
        output.info(&format!("Config file: {}", path.display()))?;
    } else {
        output.info(&format!("Config file: {} (not present, using defaults)", path.display()))?;
    }
    output.print(&format_output(&settings_summary(settings), format)?)
}

/// Write the starter config file
pub fn init_config(path: Option<&str>, force: bool, output: &dyn Output) -> CliResult<()> {
    let target = config_path(path);
    if target.exists() && !force {
        return Err(CliError::ConfigError(format!(
            "{} already exists; pass --force to overwrite it",
            target.display()
        )));
    }

    write_config_text(path, &config_template())?;
    output.success(&format!("Wrote {}", target.display()))
}
