//! Fee wallet lookup command
//!
//! Shows which wallet a social handle would receive fees in, without
//! launching anything.

use crate::argument_parsing::{format_output, load_settings, FeeWalletArgs, LaunchCli};
use crate::commands::common::{build_api_client, resolve_platform};
use crate::error::{CliError, CliResult};
use crate::logic::launch::failure_hint;
use crate::output::{ConsoleOutput, Output};
use lib_launch::validation::normalize_username;
use lib_launch::{LaunchApi, SocialPlatform};
use serde_json::json;

/// Handle fee-wallet command
pub async fn handle_fee_wallet_command(args: FeeWalletArgs, cli: &LaunchCli) -> CliResult<()> {
    let settings = load_settings(cli)?;
    let api = build_api_client(&settings)?;
    let platform = resolve_platform(args.platform.as_deref(), settings.platform)?;
    lookup_fee_wallet(&api, platform, &args.username, &cli.format, &ConsoleOutput).await?;
    Ok(())
}

/// Resolve and print the wallet registered for a handle
pub async fn lookup_fee_wallet<A: LaunchApi>(
    api: &A,
    platform: SocialPlatform,
    raw_username: &str,
    format: &str,
    output: &dyn Output,
) -> CliResult<String> {
    let username = normalize_username(Some(raw_username))?
        .ok_or_else(|| CliError::InvalidArgument("Username is required".to_string()))?;

    match api.lookup_platform_wallet(platform, &username).await {
        Ok(wallet) => {
            let report = json!({
                "platform": platform,
                "username": username,
                "wallet": wallet,
            });
            output.print(&format_output(&report, format)?)?;
            Ok(wallet)
        }
        Err(e) => {
            output.error(&e.to_string())?;
            if let Some(hint) = failure_hint(&e) {
                output.info(&hint)?;
            }
            Err(e.into())
        }
    }
}
