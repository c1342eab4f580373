//! Token launch command
//!
//! Architecture: Functional Core, Imperative Shell (FCIS)
//!
//! - **Pure Logic**: request building from arguments (`logic::launch` conversions)
//! - **Imperative Shell**: image file read, keypair load, orchestrated launch, printing
//! - **Testability**: generic over `LaunchApi`/`Signer`, Output trait injection

use crate::argument_parsing::{format_output, load_settings, LaunchArgs, LaunchCli};
use crate::commands::common::{build_api_client, resolve_platform, PromptApproval};
use crate::error::{CliError, CliResult};
use crate::logic::config::LaunchSettings;
use crate::logic::launch::{
    failure_hint, failure_report, fee_split_from_creator_percent, mime_type_for_path,
    sol_to_lamports, success_report,
};
use crate::output::{ConsoleOutput, Output, PhaseReporter};
use lib_launch::{
    ImageUpload, KeypairSigner, LaunchApi, LaunchOrchestrator, LaunchOutcome, LaunchRequest,
    LaunchSuccess, RpcClient, Signer, SocialLinks, SocialPlatform,
};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

// ============================================================================
// PURE LOGIC - No side effects, fully testable
// ============================================================================

/// Assemble the launch request from command arguments
pub fn build_launch_request(
    args: &LaunchArgs,
    default_platform: SocialPlatform,
    launch_wallet: String,
    image: Option<ImageUpload>,
) -> CliResult<LaunchRequest> {
    Ok(LaunchRequest {
        name: args.name.clone(),
        symbol: args.symbol.clone(),
        description: args.description.clone(),
        image,
        social_username: args.username.clone(),
        platform: resolve_platform(args.platform.as_deref(), default_platform)?,
        fee_split: fee_split_from_creator_percent(args.creator_percent)?,
        launch_wallet,
        initial_buy_lamports: sol_to_lamports(args.initial_buy_sol)?,
        links: SocialLinks {
            website: args.website.clone(),
            twitter: args.twitter.clone(),
            telegram: args.telegram.clone(),
        },
    })
}

// ============================================================================
// IMPERATIVE SHELL - All side effects here
// ============================================================================

/// Read an image file for upload
pub fn read_image(path: &Path) -> CliResult<ImageUpload> {
    let bytes = fs::read(path).map_err(|e| CliError::FileReadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("image")
        .to_string();

    Ok(ImageUpload {
        file_name,
        mime_type: mime_type_for_path(path).to_string(),
        bytes,
    })
}

/// Handle launch command
pub async fn handle_launch_command(args: LaunchArgs, cli: &LaunchCli) -> CliResult<()> {
    let settings = load_settings(cli)?;
    let output: Arc<dyn Output> = Arc::new(ConsoleOutput);
    handle_launch_command_impl(args, &settings, &cli.format, output).await
}

async fn handle_launch_command_impl(
    args: LaunchArgs,
    settings: &LaunchSettings,
    format: &str,
    output: Arc<dyn Output>,
) -> CliResult<()> {
    let api = build_api_client(settings)?;

    // No keypair means no signer; the orchestrator reports it
    let signer = match &settings.keypair {
        Some(path) => Some(KeypairSigner::from_file(
            path,
            RpcClient::new(settings.rpc_url.clone())?,
            Arc::new(PromptApproval::new(args.yes)),
            settings.confirm,
        )?),
        None => None,
    };
    let launch_wallet = signer
        .as_ref()
        .map(KeypairSigner::wallet_address)
        .unwrap_or_default();
    if !launch_wallet.is_empty() {
        info!("Launching from wallet {}", launch_wallet);
    }

    let image = args
        .image
        .as_deref()
        .map(|p| read_image(Path::new(p)))
        .transpose()?;
    let request = build_launch_request(&args, settings.platform, launch_wallet, image)?;

    let orchestrator = LaunchOrchestrator::new(api, signer)
        .with_observer(Arc::new(PhaseReporter::new(output.clone())));
    run_launch(&orchestrator, request, format, output.as_ref()).await?;
    Ok(())
}

/// Run one launch and report its outcome
///
/// A failure is printed in full (partial success, hint) and then returned
/// so the process exits non-zero.
pub async fn run_launch<A: LaunchApi, S: Signer>(
    orchestrator: &LaunchOrchestrator<A, S>,
    request: LaunchRequest,
    format: &str,
    output: &dyn Output,
) -> CliResult<LaunchSuccess> {
    output.header(&format!("Launching {} ({})", request.name.trim(), request.symbol.trim()))?;

    match orchestrator.launch(request).await {
        LaunchOutcome::Success(success) => {
            output.success("Token launched")?;
            output.print(&format_output(&success_report(&success)?, format)?)?;
            Ok(success)
        }
        LaunchOutcome::Failure(failure) => {
            output.error(&format!(
                "Launch failed during {:?}: {}",
                failure.phase, failure.error
            ))?;
            if let Some(signature) = &failure.config_signature {
                output.warning(&format!(
                    "Configuration transaction {} is already confirmed on-chain; it does not need to be signed again",
                    signature
                ))?;
            }
            if let Some(hint) = failure_hint(&failure.error) {
                output.info(&hint)?;
            }
            if format.eq_ignore_ascii_case("json") {
                output.print_json(&failure_report(&failure))?;
            }
            Err(CliError::Launch(failure.error))
        }
    }
}
