//! Testing utilities for lib-launch
//!
//! Scripted [`LaunchApi`] and [`Signer`] implementations that write every
//! call into one shared [`CallLog`], so tests can assert both what was
//! called and in which order.

use crate::api::{FeeShareConfigRequest, LaunchApi, LaunchTransactionRequest, TokenInfoRequest};
use crate::error::{LaunchError, LaunchResult};
use crate::orchestrator::LaunchObserver;
use crate::signer::{Confirmation, SignedTransaction, Signer};
use crate::types::{
    LaunchConfig, LaunchPhase, SerializedTransaction, SocialPlatform, TokenArtifact,
    TransactionKind,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// One observed call against a mock
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateTokenInfo { name: String, symbol: String },
    LookupPlatformWallet { platform: SocialPlatform, username: String },
    CreateFeeShareConfig(FeeShareConfigRequest),
    CreateStandaloneLaunchConfig { launch_wallet: String },
    CreateLaunchTransaction(LaunchTransactionRequest),
    CreateLaunchTransactionAfterConfig(LaunchTransactionRequest),
    Sign(TransactionKind),
    Broadcast(TransactionKind),
    Confirm(String),
}

impl Call {
    /// Calls that reach the launch API
    pub fn is_api(&self) -> bool {
        !matches!(self, Call::Sign(_) | Call::Broadcast(_) | Call::Confirm(_))
    }
}

/// Ordered call record shared between mocks
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    fn guard(&self) -> MutexGuard<'_, Vec<Call>> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn record(&self, call: Call) {
        self.guard().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.guard().clone()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.guard().iter().filter(|c| predicate(*c)).count()
    }

    /// Index of the first matching call
    pub fn position(&self, predicate: impl Fn(&Call) -> bool) -> Option<usize> {
        self.guard().iter().position(|c| predicate(c))
    }

    pub fn api_calls(&self) -> usize {
        self.count(Call::is_api)
    }
}

/// Token every default mock hands out
pub fn sample_token() -> TokenArtifact {
    TokenArtifact {
        token_mint: "MintX111111111111111111111111111111111111111".to_string(),
        metadata_uri: "https://ipfs.io/ipfs/QmHash".to_string(),
        launch_record: serde_json::json!({ "name": "Test", "symbol": "TST" }),
    }
}

/// Scripted launch API
///
/// Every response is a `LaunchResult`, so a test fails a step by putting an
/// `Err` in the matching field. Handles not present in `wallets` resolve to
/// `WalletNotFound`.
#[derive(Debug)]
pub struct MockLaunchApi {
    log: CallLog,
    pub token: LaunchResult<TokenArtifact>,
    pub wallets: HashMap<String, String>,
    pub fee_share_config: LaunchResult<LaunchConfig>,
    pub standalone_config: LaunchResult<LaunchConfig>,
    pub launch_transaction: LaunchResult<SerializedTransaction>,
    pub launch_transaction_after_config: LaunchResult<SerializedTransaction>,
}

impl MockLaunchApi {
    /// Happy-path API: no config ever needs signing
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            token: Ok(sample_token()),
            wallets: HashMap::new(),
            fee_share_config: Ok(LaunchConfig {
                config_key: "FeeCfg1".to_string(),
                pending_transaction: None,
            }),
            standalone_config: Ok(LaunchConfig {
                config_key: "SoloCfg1".to_string(),
                pending_transaction: None,
            }),
            launch_transaction: Ok(SerializedTransaction::launch("launch-tx")),
            launch_transaction_after_config: Ok(SerializedTransaction::launch("launch-tx-after-config")),
        }
    }

    pub fn log(&self) -> &CallLog {
        &self.log
    }

    pub fn with_wallet(mut self, username: &str, wallet: &str) -> Self {
        self.wallets.insert(username.to_string(), wallet.to_string());
        self
    }

    /// Fee-share config comes back with a transaction to sign
    pub fn with_pending_fee_share_config(mut self) -> Self {
        self.fee_share_config = Ok(LaunchConfig {
            config_key: "FeeCfg1".to_string(),
            pending_transaction: Some(SerializedTransaction::config("fee-config-tx")),
        });
        self
    }

    /// Standalone config comes back with a transaction to sign
    pub fn with_pending_standalone_config(mut self) -> Self {
        self.standalone_config = Ok(LaunchConfig {
            config_key: "SoloCfg1".to_string(),
            pending_transaction: Some(SerializedTransaction::config("solo-config-tx")),
        });
        self
    }
}

#[async_trait]
impl LaunchApi for MockLaunchApi {
    async fn create_token_info(&self, request: &TokenInfoRequest) -> LaunchResult<TokenArtifact> {
        self.log.record(Call::CreateTokenInfo {
            name: request.name.clone(),
            symbol: request.symbol.clone(),
        });
        self.token.clone()
    }

    async fn lookup_platform_wallet(
        &self,
        platform: SocialPlatform,
        username: &str,
    ) -> LaunchResult<String> {
        self.log.record(Call::LookupPlatformWallet {
            platform,
            username: username.to_string(),
        });
        self.wallets
            .get(username)
            .cloned()
            .ok_or_else(|| LaunchError::WalletNotFound {
                platform: platform.to_string(),
                username: username.to_string(),
            })
    }

    async fn create_fee_share_config(
        &self,
        request: &FeeShareConfigRequest,
    ) -> LaunchResult<LaunchConfig> {
        self.log.record(Call::CreateFeeShareConfig(request.clone()));
        self.fee_share_config.clone()
    }

    async fn create_standalone_launch_config(
        &self,
        launch_wallet: &str,
    ) -> LaunchResult<LaunchConfig> {
        self.log.record(Call::CreateStandaloneLaunchConfig {
            launch_wallet: launch_wallet.to_string(),
        });
        self.standalone_config.clone()
    }

    async fn create_launch_transaction(
        &self,
        request: &LaunchTransactionRequest,
    ) -> LaunchResult<SerializedTransaction> {
        self.log.record(Call::CreateLaunchTransaction(request.clone()));
        self.launch_transaction.clone()
    }

    async fn create_launch_transaction_after_config(
        &self,
        request: &LaunchTransactionRequest,
    ) -> LaunchResult<SerializedTransaction> {
        self.log
            .record(Call::CreateLaunchTransactionAfterConfig(request.clone()));
        self.launch_transaction_after_config.clone()
    }
}

/// Scripted wallet
///
/// Signatures are `<kind>-sig`, which lets `confirm` recover the kind.
/// Failures are keyed by transaction kind.
#[derive(Debug)]
pub struct MockSigner {
    log: CallLog,
    pub sign_failures: HashMap<TransactionKind, LaunchError>,
    pub broadcast_failures: HashMap<TransactionKind, LaunchError>,
    pub confirm_failures: HashMap<TransactionKind, LaunchError>,
}

impl MockSigner {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            sign_failures: HashMap::new(),
            broadcast_failures: HashMap::new(),
            confirm_failures: HashMap::new(),
        }
    }

    pub fn signature_for(kind: TransactionKind) -> String {
        format!("{}-sig", kind)
    }

    fn kind_of(signature: &str) -> TransactionKind {
        if signature == Self::signature_for(TransactionKind::Config) {
            TransactionKind::Config
        } else {
            TransactionKind::Launch
        }
    }

    pub fn rejecting(mut self, kind: TransactionKind) -> Self {
        self.sign_failures.insert(kind, LaunchError::UserRejected);
        self
    }

    pub fn failing_broadcast(mut self, kind: TransactionKind, error: LaunchError) -> Self {
        self.broadcast_failures.insert(kind, error);
        self
    }

    pub fn failing_confirm(mut self, kind: TransactionKind, error: LaunchError) -> Self {
        self.confirm_failures.insert(kind, error);
        self
    }
}

#[async_trait]
impl Signer for MockSigner {
    async fn sign(&self, transaction: &SerializedTransaction) -> LaunchResult<SignedTransaction> {
        self.log.record(Call::Sign(transaction.kind));
        if let Some(err) = self.sign_failures.get(&transaction.kind) {
            return Err(err.clone());
        }
        Ok(SignedTransaction {
            kind: transaction.kind,
            wire: transaction.encoded.as_bytes().to_vec(),
            signature: Self::signature_for(transaction.kind),
        })
    }

    async fn broadcast(&self, transaction: &SignedTransaction) -> LaunchResult<String> {
        self.log.record(Call::Broadcast(transaction.kind));
        if let Some(err) = self.broadcast_failures.get(&transaction.kind) {
            return Err(err.clone());
        }
        Ok(transaction.signature.clone())
    }

    async fn confirm(&self, signature: &str) -> LaunchResult<Confirmation> {
        self.log.record(Call::Confirm(signature.to_string()));
        if let Some(err) = self.confirm_failures.get(&Self::kind_of(signature)) {
            return Err(err.clone());
        }
        Ok(Confirmation {
            signature: signature.to_string(),
            slot: 1,
            commitment: "confirmed".to_string(),
        })
    }
}

/// Observer that keeps every phase it was told about
#[derive(Debug, Default)]
pub struct RecordingObserver {
    phases: Mutex<Vec<LaunchPhase>>,
}

impl RecordingObserver {
    pub fn phases(&self) -> Vec<LaunchPhase> {
        self.phases
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl LaunchObserver for RecordingObserver {
    fn on_phase(&self, phase: LaunchPhase) {
        self.phases
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(phase);
    }
}
