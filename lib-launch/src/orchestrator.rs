//! Launch orchestration
//!
//! Drives one launch attempt through its states:
//!
//! ```text
//! Validating → CollectingMetadata → (ConfiguringFeeShare)? → RequestingLaunchTx
//!   → (SigningConfig → RequestingLaunchTxAfterConfig)? → SigningLaunch → Confirming
//!   → Done | Failed
//! ```
//!
//! Fee sharing is configured only when a handle was supplied. The config
//! signing round-trip happens only when the chosen launch config comes back
//! with a pending transaction. Nothing is retried and nothing is rolled back:
//! a confirmed config transaction stays confirmed, and a later failure
//! reports its signature so the caller knows that step is already paid for.

use crate::api::{FeeShareConfigRequest, LaunchApi, LaunchTransactionRequest, TokenInfoRequest};
use crate::error::{LaunchError, LaunchResult};
use crate::fee_share::{FeeShareConfig, FeeSlots};
use crate::signer::Signer;
use crate::types::{
    FeeSharingSummary, LaunchConfig, LaunchFailure, LaunchOutcome, LaunchPhase, LaunchPlan,
    LaunchRequest, LaunchSuccess, PendingConfig, SerializedTransaction, TokenArtifact,
};
use crate::validation::{validate_request, ValidatedRequest};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Receives every state transition of a launch
pub trait LaunchObserver: Send + Sync {
    fn on_phase(&self, _phase: LaunchPhase) {}
}

/// Ignores all transitions
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl LaunchObserver for NoopObserver {}

/// Per-attempt state
struct RunState<'a> {
    phase: LaunchPhase,
    config_signature: Option<String>,
    observer: &'a dyn LaunchObserver,
}

impl<'a> RunState<'a> {
    fn new(observer: &'a dyn LaunchObserver) -> Self {
        Self {
            phase: LaunchPhase::Validating,
            config_signature: None,
            observer,
        }
    }

    fn enter(&mut self, phase: LaunchPhase) {
        debug!("Launch phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
        self.observer.on_phase(phase);
    }
}

/// Sequences API calls and signatures for a launch
///
/// The signer is injected at construction. Without one, every launch fails
/// with `WalletUnavailable` before touching the network.
pub struct LaunchOrchestrator<A, S> {
    api: A,
    signer: Option<S>,
    observer: Arc<dyn LaunchObserver>,
}

impl<A: LaunchApi, S: Signer> LaunchOrchestrator<A, S> {
    pub fn new(api: A, signer: Option<S>) -> Self {
        Self {
            api,
            signer,
            observer: Arc::new(NoopObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn LaunchObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Run one launch attempt to a terminal outcome
    pub async fn launch(&self, request: LaunchRequest) -> LaunchOutcome {
        let mut run = RunState::new(self.observer.as_ref());
        run.enter(LaunchPhase::Validating);

        match self.run(request, &mut run).await {
            Ok(success) => {
                run.enter(LaunchPhase::Done);
                info!(
                    "Token {} launched, signature {}",
                    success.token_mint, success.signature
                );
                LaunchOutcome::Success(success)
            }
            Err(error) => {
                let failed_in = run.phase;
                run.enter(LaunchPhase::Failed);
                if run.config_signature.is_some() {
                    warn!(
                        "Launch failed in {:?} after config transaction confirmed: {}",
                        failed_in, error
                    );
                } else {
                    warn!("Launch failed in {:?}: {}", failed_in, error);
                }
                LaunchOutcome::Failure(LaunchFailure {
                    error,
                    phase: failed_in,
                    config_signature: run.config_signature,
                })
            }
        }
    }

    async fn run(&self, request: LaunchRequest, run: &mut RunState<'_>) -> LaunchResult<LaunchSuccess> {
        let signer = self.signer.as_ref().ok_or_else(|| {
            LaunchError::WalletUnavailable("No wallet connected".to_string())
        })?;
        let ValidatedRequest { request, username } = validate_request(request)?;

        info!("Launching {} ({})", request.name, request.symbol);
        run.enter(LaunchPhase::CollectingMetadata);
        let token = self
            .api
            .create_token_info(&TokenInfoRequest {
                name: request.name.trim().to_string(),
                symbol: request.symbol.trim().to_string(),
                description: request.description.trim().to_string(),
                image: request.image.clone(),
                links: request.links.clone(),
            })
            .await?;

        let (config, fee_sharing) = match &username {
            Some(username) => {
                run.enter(LaunchPhase::ConfiguringFeeShare);
                let fee_share = self.configure_fee_share(&request, username, &token).await?;
                let summary = FeeSharingSummary::new(request.platform, username, request.fee_split);
                (fee_share.launch_config(), Some(summary))
            }
            None => {
                run.enter(LaunchPhase::RequestingLaunchTx);
                let config = self
                    .api
                    .create_standalone_launch_config(&request.launch_wallet)
                    .await?;
                (config, None)
            }
        };

        if run.phase != LaunchPhase::RequestingLaunchTx {
            run.enter(LaunchPhase::RequestingLaunchTx);
        }
        let plan = self
            .request_launch_plan(&token, config, &request.launch_wallet, request.initial_buy_lamports)
            .await?;

        let launch_transaction = match plan {
            LaunchPlan::Ready(transaction) => transaction,
            LaunchPlan::NeedsConfigSigning(pending) => {
                run.enter(LaunchPhase::SigningConfig);
                info!("Config transaction must be signed before launch");
                let config_signature = sign_broadcast_confirm(signer, &pending.config_transaction).await?;
                run.config_signature = Some(config_signature);

                run.enter(LaunchPhase::RequestingLaunchTxAfterConfig);
                self.api
                    .create_launch_transaction_after_config(&LaunchTransactionRequest::new(
                        &pending.token,
                        &pending.config_key,
                        &pending.launch_wallet,
                        pending.initial_buy_lamports,
                    ))
                    .await?
            }
        };

        run.enter(LaunchPhase::SigningLaunch);
        let signed = signer.sign(&launch_transaction).await?;
        let signature = signer.broadcast(&signed).await?;

        run.enter(LaunchPhase::Confirming);
        signer.confirm(&signature).await?;

        Ok(LaunchSuccess {
            token_mint: token.token_mint,
            metadata_uri: token.metadata_uri,
            signature,
            config_signature: run.config_signature.clone(),
            fee_sharing,
        })
    }

    /// Resolve the claimer wallet, order the slots and create the config
    async fn configure_fee_share(
        &self,
        request: &LaunchRequest,
        username: &str,
        token: &TokenArtifact,
    ) -> LaunchResult<FeeShareConfig> {
        let claimer_wallet = self
            .api
            .lookup_platform_wallet(request.platform, username)
            .await?;
        debug!("@{} resolves to {}", username, claimer_wallet);

        let slots = FeeSlots::order(&request.launch_wallet, &claimer_wallet, request.fee_split)?;
        let config = self
            .api
            .create_fee_share_config(&FeeShareConfigRequest::new(
                &slots,
                &request.launch_wallet,
                &token.token_mint,
            ))
            .await?;
        info!(
            "Fee share config {} created ({} bps / {} bps)",
            config.config_key, slots.wallet_a_bps, slots.wallet_b_bps
        );
        Ok(FeeShareConfig::new(slots, claimer_wallet, config))
    }

    /// Decide between a ready launch transaction and a config-first round-trip
    ///
    /// A pending config transaction means the launch transaction cannot be
    /// requested yet; no API call is made in that case.
    pub async fn request_launch_plan(
        &self,
        token: &TokenArtifact,
        config: LaunchConfig,
        launch_wallet: &str,
        initial_buy_lamports: u64,
    ) -> LaunchResult<LaunchPlan> {
        if let Some(config_transaction) = config.pending_transaction {
            return Ok(LaunchPlan::NeedsConfigSigning(PendingConfig {
                config_transaction,
                token: token.clone(),
                config_key: config.config_key,
                launch_wallet: launch_wallet.to_string(),
                initial_buy_lamports,
            }));
        }

        let transaction = self
            .api
            .create_launch_transaction(&LaunchTransactionRequest::new(
                token,
                &config.config_key,
                launch_wallet,
                initial_buy_lamports,
            ))
            .await?;
        Ok(LaunchPlan::Ready(transaction))
    }
}

/// One full sign → broadcast → confirm cycle; returns the signature
async fn sign_broadcast_confirm<S: Signer>(
    signer: &S,
    transaction: &SerializedTransaction,
) -> LaunchResult<String> {
    let signed = signer.sign(transaction).await?;
    let signature = signer.broadcast(&signed).await?;
    signer.confirm(&signature).await?;
    info!("{} transaction {} confirmed", transaction.kind, signature);
    Ok(signature)
}
