//! Bags Token Launch Library
//!
//! Orchestrates a token launch against the Bags launch API:
//! metadata creation, optional fee sharing with a social handle,
//! launch transaction creation, and signing through an injected wallet.
//!
//! # Flow
//!
//! 1. Validate the request (no network)
//! 2. Create token metadata and reserve the mint
//! 3. With a handle: resolve its wallet, order the fee slots and create
//!    the fee-share config. Without one: create a standalone config
//! 4. If the config needs signing, sign/broadcast/confirm it first, then
//!    request the launch transaction for the confirmed config
//! 5. Sign, broadcast and confirm the launch transaction
//!
//! # Example
//!
//! ```ignore
//! use lib_launch::{ApiConfig, BagsApiClient, LaunchOrchestrator};
//!
//! let api = BagsApiClient::new(ApiConfig { api_key: Some(key), ..Default::default() })?;
//! let orchestrator = LaunchOrchestrator::new(api, Some(signer));
//! match orchestrator.launch(request).await {
//!     LaunchOutcome::Success(s) => println!("{}", s.token_mint),
//!     LaunchOutcome::Failure(f) => eprintln!("{}", f.error),
//! }
//! ```

pub mod api;
pub mod error;
pub mod fee_share;
pub mod keypair_signer;
pub mod orchestrator;
pub mod rpc;
pub mod signer;
pub mod testing;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use api::{ApiConfig, BagsApiClient, LaunchApi};
pub use error::{LaunchError, LaunchResult};
pub use fee_share::{FeeShareConfig, FeeSlots};
pub use keypair_signer::{ConfirmSettings, KeypairSigner};
pub use orchestrator::{LaunchObserver, LaunchOrchestrator, NoopObserver};
pub use rpc::{resolve_rpc_url, RpcClient};
pub use signer::{ApprovalRequest, AutoApprove, Signer, SigningApproval};
pub use types::*;
pub use validation::{clean_username, validate_request};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
