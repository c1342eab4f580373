//! Launch data model
//!
//! Everything here is created fresh for one launch attempt and dropped when
//! the attempt ends. Nothing persists across runs.

use crate::error::{LaunchError, LaunchResult};
use serde::Serialize;
use std::fmt;

/// Quote mint for every fee-share config (wrapped SOL)
pub const WRAPPED_SOL_MINT: &str = "So11111111111111111111111111111111111111112";

/// Gateway prefix stripped from metadata URIs to recover the IPFS hash
pub const IPFS_GATEWAY_PREFIX: &str = "https://ipfs.io/ipfs/";

/// 100% in basis points
pub const TOTAL_BPS: u16 = 10_000;

/// Lamports per SOL
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Social platform used to resolve a fee claimer's wallet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialPlatform {
    #[default]
    Twitter,
}

impl SocialPlatform {
    pub fn as_str(&self) -> &'static str {
        match self {
            SocialPlatform::Twitter => "twitter",
        }
    }

    pub fn parse(s: &str) -> LaunchResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "twitter" | "x" => Ok(SocialPlatform::Twitter),
            other => Err(LaunchError::Validation(format!(
                "Unknown social platform: '{}'. Supported: twitter",
                other
            ))),
        }
    }
}

impl fmt::Display for SocialPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Creator/claimer fee split in basis points. Always sums to [`TOTAL_BPS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSplit {
    creator_bps: u16,
    claimer_bps: u16,
}

impl FeeSplit {
    pub fn new(creator_bps: u16, claimer_bps: u16) -> LaunchResult<Self> {
        if u32::from(creator_bps) + u32::from(claimer_bps) != u32::from(TOTAL_BPS) {
            return Err(LaunchError::Validation(format!(
                "Fee split must total {} bps, got {} + {}",
                TOTAL_BPS, creator_bps, claimer_bps
            )));
        }
        Ok(Self {
            creator_bps,
            claimer_bps,
        })
    }

    /// All fees to the creator
    pub fn creator_only() -> Self {
        Self {
            creator_bps: TOTAL_BPS,
            claimer_bps: 0,
        }
    }

    pub fn creator_bps(&self) -> u16 {
        self.creator_bps
    }

    pub fn claimer_bps(&self) -> u16 {
        self.claimer_bps
    }
}

impl Default for FeeSplit {
    fn default() -> Self {
        Self::creator_only()
    }
}

/// Token image to upload with the metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Optional links attached to the token metadata
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SocialLinks {
    pub website: Option<String>,
    pub twitter: Option<String>,
    pub telegram: Option<String>,
}

/// Everything needed to launch one token
#[derive(Debug, Clone)]
pub struct LaunchRequest {
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub image: Option<ImageUpload>,
    /// Raw handle as typed; cleaned before use. Empty means no fee sharing.
    pub social_username: Option<String>,
    pub platform: SocialPlatform,
    pub fee_split: FeeSplit,
    /// Pays for the launch and receives its proceeds
    pub launch_wallet: String,
    pub initial_buy_lamports: u64,
    pub links: SocialLinks,
}

/// Which transaction of a launch a payload belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Config,
    Launch,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Config => f.write_str("config"),
            TransactionKind::Launch => f.write_str("launch"),
        }
    }
}

/// Base58-encoded unsigned transaction as returned by the launch API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedTransaction {
    pub kind: TransactionKind,
    pub encoded: String,
}

impl SerializedTransaction {
    pub fn config(encoded: impl Into<String>) -> Self {
        Self {
            kind: TransactionKind::Config,
            encoded: encoded.into(),
        }
    }

    pub fn launch(encoded: impl Into<String>) -> Self {
        Self {
            kind: TransactionKind::Launch,
            encoded: encoded.into(),
        }
    }
}

/// Result of metadata creation
#[derive(Debug, Clone, PartialEq)]
pub struct TokenArtifact {
    pub token_mint: String,
    pub metadata_uri: String,
    pub launch_record: serde_json::Value,
}

impl TokenArtifact {
    /// IPFS content hash behind the metadata URI
    ///
    /// URIs not served from the known gateway are passed through unchanged.
    pub fn ipfs_hash(&self) -> &str {
        self.metadata_uri
            .strip_prefix(IPFS_GATEWAY_PREFIX)
            .unwrap_or(&self.metadata_uri)
    }
}

/// Launch config as returned by either create-config operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchConfig {
    pub config_key: String,
    /// Must be signed and confirmed before the config is usable
    pub pending_transaction: Option<SerializedTransaction>,
}

/// Outcome of asking for a launch transaction
#[derive(Debug, Clone, PartialEq)]
pub enum LaunchPlan {
    /// Sign this and the launch is done
    Ready(SerializedTransaction),
    /// The config transaction has to land first
    NeedsConfigSigning(PendingConfig),
}

/// Context kept to resume after the config transaction is confirmed
#[derive(Debug, Clone, PartialEq)]
pub struct PendingConfig {
    pub config_transaction: SerializedTransaction,
    pub token: TokenArtifact,
    pub config_key: String,
    pub launch_wallet: String,
    pub initial_buy_lamports: u64,
}

/// Fee-sharing details reported on success
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeSharingSummary {
    pub platform: SocialPlatform,
    pub username: String,
    pub creator_percent: f64,
    pub claimer_percent: f64,
}

impl FeeSharingSummary {
    pub fn new(platform: SocialPlatform, username: &str, split: FeeSplit) -> Self {
        Self {
            platform,
            username: username.to_string(),
            creator_percent: bps_to_percent(split.creator_bps()),
            claimer_percent: bps_to_percent(split.claimer_bps()),
        }
    }
}

pub fn bps_to_percent(bps: u16) -> f64 {
    f64::from(bps) / 100.0
}

/// States of one launch attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LaunchPhase {
    Validating,
    CollectingMetadata,
    ConfiguringFeeShare,
    RequestingLaunchTx,
    SigningConfig,
    RequestingLaunchTxAfterConfig,
    SigningLaunch,
    Confirming,
    Done,
    Failed,
}

impl LaunchPhase {
    /// Human-readable progress line
    pub fn description(&self) -> &'static str {
        match self {
            LaunchPhase::Validating => "Validating launch request...",
            LaunchPhase::CollectingMetadata => "Creating token metadata...",
            LaunchPhase::ConfiguringFeeShare => "Setting up fee sharing...",
            LaunchPhase::RequestingLaunchTx => "Preparing launch transaction...",
            LaunchPhase::SigningConfig => "Signing the configuration transaction...",
            LaunchPhase::RequestingLaunchTxAfterConfig => "Creating launch transaction...",
            LaunchPhase::SigningLaunch => "Signing the launch transaction...",
            LaunchPhase::Confirming => "Confirming launch transaction...",
            LaunchPhase::Done => "Launch complete",
            LaunchPhase::Failed => "Launch failed",
        }
    }
}

/// Successful launch
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchSuccess {
    pub token_mint: String,
    pub metadata_uri: String,
    pub signature: String,
    pub config_signature: Option<String>,
    pub fee_sharing: Option<FeeSharingSummary>,
}

/// Failed launch
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchFailure {
    pub error: LaunchError,
    /// State the attempt was in when it failed
    pub phase: LaunchPhase,
    /// Set when a config transaction was already confirmed on-chain
    pub config_signature: Option<String>,
}

impl LaunchFailure {
    /// The config step is paid for and must not be redone
    pub fn is_partial_success(&self) -> bool {
        self.config_signature.is_some()
    }
}

/// Terminal result of `launch`
#[derive(Debug, Clone, PartialEq)]
pub enum LaunchOutcome {
    Success(LaunchSuccess),
    Failure(LaunchFailure),
}

impl LaunchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, LaunchOutcome::Success(_))
    }

    pub fn success(&self) -> Option<&LaunchSuccess> {
        match self {
            LaunchOutcome::Success(s) => Some(s),
            LaunchOutcome::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&LaunchFailure> {
        match self {
            LaunchOutcome::Success(_) => None,
            LaunchOutcome::Failure(f) => Some(f),
        }
    }
}
