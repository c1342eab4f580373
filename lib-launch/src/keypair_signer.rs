//! Signer backed by a local Solana keypair
//!
//! Decodes the base58 transactions handed out by the launch API, asks for
//! approval, fills in this wallet's signature slot, then sends and confirms
//! through [`RpcClient`].

use crate::error::{LaunchError, LaunchResult};
use crate::rpc::RpcClient;
use crate::signer::{ApprovalRequest, Confirmation, SignedTransaction, Signer, SigningApproval};
use crate::types::SerializedTransaction;
use async_trait::async_trait;
use solana_sdk::signature::{read_keypair_file, Keypair, Signature};
use solana_sdk::signer::Signer as _;
use solana_sdk::transaction::VersionedTransaction;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Confirmation polling bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmSettings {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for ConfirmSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            poll_interval: Duration::from_millis(500),
        }
    }
}

/// Decode an API-provided base58 transaction
pub fn decode_transaction(encoded: &str) -> LaunchResult<VersionedTransaction> {
    let bytes = bs58::decode(encoded.trim())
        .into_vec()
        .map_err(|e| LaunchError::upstream(format!("Transaction is not valid base58: {}", e)))?;
    bincode::deserialize(&bytes)
        .map_err(|e| LaunchError::upstream(format!("Transaction could not be decoded: {}", e)))
}

/// Put `keypair`'s signature into its slot among the required signers
pub fn sign_in_place(transaction: &mut VersionedTransaction, keypair: &Keypair) -> LaunchResult<Signature> {
    let signer_key = keypair.pubkey();
    let required = usize::from(transaction.message.header().num_required_signatures);
    let position = transaction
        .message
        .static_account_keys()
        .iter()
        .take(required)
        .position(|key| key == &signer_key)
        .ok_or_else(|| {
            LaunchError::upstream(format!(
                "Transaction does not require a signature from {}",
                signer_key
            ))
        })?;

    let signature = keypair.sign_message(&transaction.message.serialize());
    if transaction.signatures.len() < required {
        transaction.signatures.resize(required, Signature::default());
    }
    transaction.signatures[position] = signature;
    Ok(signature)
}

/// Local-keypair wallet
pub struct KeypairSigner {
    keypair: Keypair,
    rpc: RpcClient,
    approval: Arc<dyn SigningApproval>,
    settings: ConfirmSettings,
}

impl KeypairSigner {
    pub fn new(
        keypair: Keypair,
        rpc: RpcClient,
        approval: Arc<dyn SigningApproval>,
        settings: ConfirmSettings,
    ) -> Self {
        Self {
            keypair,
            rpc,
            approval,
            settings,
        }
    }

    /// Load the keypair from a Solana CLI keypair file
    pub fn from_file(
        path: &Path,
        rpc: RpcClient,
        approval: Arc<dyn SigningApproval>,
        settings: ConfirmSettings,
    ) -> LaunchResult<Self> {
        let keypair = read_keypair_file(path).map_err(|e| {
            LaunchError::WalletUnavailable(format!(
                "Failed to read keypair {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(Self::new(keypair, rpc, approval, settings))
    }

    /// Base58 address of the wallet
    pub fn wallet_address(&self) -> String {
        self.keypair.pubkey().to_string()
    }
}

impl std::fmt::Debug for KeypairSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeypairSigner")
            .field("wallet", &self.keypair.pubkey())
            .field("rpc", &self.rpc.url())
            .field("settings", &self.settings)
            .finish()
    }
}

#[async_trait]
impl Signer for KeypairSigner {
    async fn sign(&self, transaction: &SerializedTransaction) -> LaunchResult<SignedTransaction> {
        let mut decoded = decode_transaction(&transaction.encoded)?;

        let request = ApprovalRequest {
            kind: transaction.kind,
            signer: self.wallet_address(),
            required_signatures: usize::from(decoded.message.header().num_required_signatures),
            instruction_count: decoded.message.instructions().len(),
        };
        if !self.approval.approve(&request).await {
            info!("{} transaction declined", transaction.kind);
            return Err(LaunchError::UserRejected);
        }

        let signature = sign_in_place(&mut decoded, &self.keypair)?;
        let wire = bincode::serialize(&decoded)
            .map_err(|e| LaunchError::upstream(format!("Failed to serialize signed transaction: {}", e)))?;
        debug!("Signed {} transaction {}", transaction.kind, signature);

        Ok(SignedTransaction {
            kind: transaction.kind,
            wire,
            signature: signature.to_string(),
        })
    }

    async fn broadcast(&self, transaction: &SignedTransaction) -> LaunchResult<String> {
        let signature = self.rpc.send_transaction(&transaction.wire).await?;
        info!("Sent {} transaction {}", transaction.kind, signature);
        Ok(signature)
    }

    async fn confirm(&self, signature: &str) -> LaunchResult<Confirmation> {
        self.rpc
            .wait_for_confirmation(signature, self.settings.timeout, self.settings.poll_interval)
            .await
    }
}
