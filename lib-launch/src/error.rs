//! Error types for the launch library
//!
//! Every failure a launch can end in is one variant of [`LaunchError`].
//! Nothing is retried or swallowed inside the library: errors flow back to
//! the caller of `launch`, which decides what (if anything) to retry.

use thiserror::Error;

/// Launch error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LaunchError {
    /// Bad input. Never reaches the network.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Image does not satisfy the upload constraints
    #[error("Invalid media: {0}")]
    InvalidMedia(String),

    /// Missing credentials or settings
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The launch API rejected the request or answered with an unexpected shape.
    /// `status` is `None` when no HTTP status was received.
    #[error("Upstream error{}: {message}", .status.map(|s| format!(" ({})", s)).unwrap_or_default())]
    Upstream { status: Option<u16>, message: String },

    /// Social handle has no wallet registered with the launch platform
    #[error("@{username} has no registered {platform} wallet; they need to claim one first")]
    WalletNotFound { platform: String, username: String },

    /// Signing was declined
    #[error("Transaction was rejected by user")]
    UserRejected,

    /// No signing capability is present
    #[error("Wallet unavailable: {0}")]
    WalletUnavailable(String),

    /// Transport failure talking to the chain
    #[error("Network error: {0}")]
    Network(String),

    /// The transaction landed but the chain rejected it
    #[error("Transaction failed on-chain: {0}")]
    ChainRejected(String),

    /// Gave up waiting for confirmation. The transaction may still land.
    #[error("Transaction {signature} not confirmed after {waited_secs}s")]
    ConfirmationTimeout { signature: String, waited_secs: u64 },
}

impl LaunchError {
    /// Stable machine-readable tag for this error
    pub fn code(&self) -> &'static str {
        match self {
            LaunchError::Validation(_) => "validation_error",
            LaunchError::InvalidMedia(_) => "invalid_media_error",
            LaunchError::Configuration(_) => "configuration_error",
            LaunchError::Upstream { .. } => "upstream_error",
            LaunchError::WalletNotFound { .. } => "wallet_not_found_error",
            LaunchError::UserRejected => "user_rejected_error",
            LaunchError::WalletUnavailable(_) => "wallet_unavailable_error",
            LaunchError::Network(_) => "network_error",
            LaunchError::ChainRejected(_) => "chain_rejected_error",
            LaunchError::ConfirmationTimeout { .. } => "confirmation_timeout_error",
        }
    }

    /// Shorthand for an upstream error without an HTTP status
    pub fn upstream(message: impl Into<String>) -> Self {
        LaunchError::Upstream {
            status: None,
            message: message.into(),
        }
    }
}

/// Result type alias for launch operations
pub type LaunchResult<T> = std::result::Result<T, LaunchError>;

impl From<reqwest::Error> for LaunchError {
    fn from(err: reqwest::Error) -> Self {
        LaunchError::Upstream {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}
