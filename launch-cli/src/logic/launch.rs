//! Pure launch logic
//!
//! Conversions from command-line units to launch request units, and the
//! presentation of launch outcomes.

use crate::error::{CliError, CliResult};
use lib_launch::{
    FeeSplit, LaunchError, LaunchFailure, LaunchSuccess, LAMPORTS_PER_SOL, TOTAL_BPS,
};
use serde_json::{json, Value};
use std::path::Path;

/// Creator share used when none is given
pub const DEFAULT_CREATOR_PERCENT: f64 = 10.0;

pub const TOKEN_PAGE_URL_PREFIX: &str = "https://bags.fm/";
pub const TRANSACTION_URL_PREFIX: &str = "https://solscan.io/tx/";

/// Creator percent → creator/claimer split
///
/// Percent is converted to basis points (×100, rounded); the claimer gets
/// the rest.
pub fn fee_split_from_creator_percent(creator_percent: f64) -> CliResult<FeeSplit> {
    if !creator_percent.is_finite() || !(0.0..=100.0).contains(&creator_percent) {
        return Err(CliError::InvalidArgument(format!(
            "Creator percent must be between 0 and 100, got {}",
            creator_percent
        )));
    }
    let creator_bps = (creator_percent * 100.0).round() as u16;
    Ok(FeeSplit::new(creator_bps, TOTAL_BPS - creator_bps)?)
}

/// SOL → lamports, rounding down
pub fn sol_to_lamports(sol: f64) -> CliResult<u64> {
    if !sol.is_finite() || sol < 0.0 {
        return Err(CliError::InvalidArgument(format!(
            "Initial buy must be a non-negative SOL amount, got {}",
            sol
        )));
    }
    let lamports = (sol * LAMPORTS_PER_SOL as f64).floor();
    if lamports > u64::MAX as f64 {
        return Err(CliError::InvalidArgument(format!(
            "Initial buy of {} SOL is too large",
            sol
        )));
    }
    Ok(lamports as u64)
}

/// MIME type from an image file extension
///
/// Unknown extensions map to `application/octet-stream`, which image
/// validation then rejects.
pub fn mime_type_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Human hint for an upstream HTTP status
pub fn upstream_hint(status: Option<u16>) -> Option<&'static str> {
    match status? {
        413 => Some("Image file must be under 15MB"),
        429 => Some("Too many requests. Please wait a moment and try again."),
        500..=599 => Some("Server error. Please try again later."),
        _ => None,
    }
}

/// Follow-up advice for a failed launch, if there is any
pub fn failure_hint(error: &LaunchError) -> Option<String> {
    match error {
        LaunchError::Upstream { status, .. } => upstream_hint(*status).map(String::from),
        LaunchError::ChainRejected(msg) | LaunchError::Network(msg)
            if msg.to_lowercase().contains("insufficient funds") =>
        {
            Some("Insufficient SOL balance for transaction fees".to_string())
        }
        LaunchError::WalletNotFound { username, .. } => Some(format!(
            "@{} needs to link a wallet on bags.fm before they can receive fees",
            username
        )),
        LaunchError::Configuration(_) => {
            Some("Set api_key in the config file or export BAGS_API_KEY".to_string())
        }
        LaunchError::WalletUnavailable(_) => {
            Some("Pass --keypair or set LAUNCH_KEYPAIR to a Solana keypair file".to_string())
        }
        LaunchError::ConfirmationTimeout { signature, .. } => Some(format!(
            "The transaction may still land; check {}{} before retrying",
            TRANSACTION_URL_PREFIX, signature
        )),
        _ => None,
    }
}

pub fn token_page_url(token_mint: &str) -> String {
    format!("{}{}", TOKEN_PAGE_URL_PREFIX, token_mint)
}

pub fn transaction_url(signature: &str) -> String {
    format!("{}{}", TRANSACTION_URL_PREFIX, signature)
}

/// JSON report of a successful launch
pub fn success_report(success: &LaunchSuccess) -> CliResult<Value> {
    let mut report = serde_json::to_value(success)?;
    if let Some(obj) = report.as_object_mut() {
        obj.insert("tokenUrl".to_string(), json!(token_page_url(&success.token_mint)));
        obj.insert("transactionUrl".to_string(), json!(transaction_url(&success.signature)));
    }
    Ok(report)
}

/// JSON report of a failed launch
pub fn failure_report(failure: &LaunchFailure) -> Value {
    json!({
        "error": failure.error.code(),
        "message": failure.error.to_string(),
        "phase": failure.phase,
        "configSignature": failure.config_signature,
        "partialSuccess": failure.is_partial_success(),
        "hint": failure_hint(&failure.error),
    })
}
