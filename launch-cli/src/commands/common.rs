//! Shared command plumbing
//!
//! API client construction, platform selection and the interactive signing
//! approval used by the launch command.

use crate::error::{CliError, CliResult};
use crate::logic::config::LaunchSettings;
use async_trait::async_trait;
use lib_launch::api::{ApiConfig, DEFAULT_PING_URL};
use lib_launch::{ApprovalRequest, BagsApiClient, SigningApproval, SocialPlatform};
use std::io::{self, Write};
use tracing::warn;

/// Ping endpoint that belongs to an API base URL
///
/// The health check lives next to the versioned API root, so
/// `https://host/api/v1` pings `https://host/ping`.
pub fn ping_url_for(api_url: &str) -> String {
    let trimmed = api_url.trim_end_matches('/');
    match trimmed.rfind("/api/") {
        Some(index) => format!("{}/ping", &trimmed[..index]),
        None if trimmed.is_empty() => DEFAULT_PING_URL.to_string(),
        None => format!("{}/ping", trimmed),
    }
}

pub fn build_api_client(settings: &LaunchSettings) -> CliResult<BagsApiClient> {
    let config = ApiConfig {
        base_url: settings.api_url.clone(),
        ping_url: ping_url_for(&settings.api_url),
        api_key: settings.api_key.clone(),
        ..ApiConfig::default()
    };
    Ok(BagsApiClient::new(config)?)
}

/// Platform flag if given, else the configured default
pub fn resolve_platform(flag: Option<&str>, default: SocialPlatform) -> CliResult<SocialPlatform> {
    match flag {
        Some(name) => Ok(SocialPlatform::parse(name)?),
        None => Ok(default),
    }
}

/// Question shown before a transaction is signed
pub fn approval_question(request: &ApprovalRequest) -> String {
    format!(
        "Sign the {} transaction with {} ({} instruction{}, {} required signature{})?",
        request.kind,
        request.signer,
        request.instruction_count,
        if request.instruction_count == 1 { "" } else { "s" },
        request.required_signatures,
        if request.required_signatures == 1 { "" } else { "s" },
    )
}

pub fn prompt_yes_no(label: &str, default: bool) -> CliResult<bool> {
    let suffix = if default { "Y/n" } else { "y/N" };
    let prompt = format!("{} [{}]: ", label, suffix);

    print!("{}", prompt);
    io::stdout().flush().map_err(CliError::IoError)?;

    let mut input = String::new();
    io::stdin().read_line(&mut input).map_err(CliError::IoError)?;
    let trimmed = input.trim().to_lowercase();

    if trimmed.is_empty() {
        return Ok(default);
    }

    match trimmed.as_str() {
        "y" | "yes" => Ok(true),
        "n" | "no" => Ok(false),
        _ => Ok(default),
    }
}

/// Asks on the terminal before every signature, unless `--yes` was given
#[derive(Debug, Clone, Copy)]
pub struct PromptApproval {
    auto_approve: bool,
}

impl PromptApproval {
    pub fn new(auto_approve: bool) -> Self {
        Self { auto_approve }
    }
}

#[async_trait]
impl SigningApproval for PromptApproval {
    async fn approve(&self, request: &ApprovalRequest) -> bool {
        if self.auto_approve {
            return true;
        }

        let question = approval_question(request);
        match tokio::task::spawn_blocking(move || prompt_yes_no(&question, false)).await {
            Ok(Ok(answer)) => answer,
            Ok(Err(e)) => {
                warn!("Could not read confirmation: {}", e);
                false
            }
            Err(e) => {
                warn!("Confirmation prompt failed: {}", e);
                false
            }
        }
    }
}
