//! Signer contract
//!
//! The orchestrator only ever calls `sign`, then `broadcast`, then `confirm`
//! for a given transaction, each after the previous one finished.
//! `sign` may wait on a person for as long as it likes; bounding that wait
//! is the signer's business, not the caller's.

use crate::error::LaunchResult;
use crate::types::{SerializedTransaction, TransactionKind};
use async_trait::async_trait;

/// Transaction with the wallet's signature applied, ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub kind: TransactionKind,
    /// Wire bytes
    pub wire: Vec<u8>,
    /// Base58 signature added by this wallet
    pub signature: String,
}

/// Commitment reached by a confirmed transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub signature: String,
    pub slot: u64,
    pub commitment: String,
}

/// Wallet capability consumed by the orchestrator
#[async_trait]
pub trait Signer: Send + Sync {
    /// Sign an API-provided transaction
    ///
    /// Fails with `UserRejected` when approval is declined.
    async fn sign(&self, transaction: &SerializedTransaction) -> LaunchResult<SignedTransaction>;

    /// Submit a signed transaction and return its signature
    async fn broadcast(&self, transaction: &SignedTransaction) -> LaunchResult<String>;

    /// Wait, bounded, for the transaction to be confirmed
    async fn confirm(&self, signature: &str) -> LaunchResult<Confirmation>;
}

/// What the wallet is being asked to sign
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalRequest {
    pub kind: TransactionKind,
    /// Address that will sign
    pub signer: String,
    pub required_signatures: usize,
    pub instruction_count: usize,
}

/// Out-of-band approval before a signature is produced
#[async_trait]
pub trait SigningApproval: Send + Sync {
    async fn approve(&self, request: &ApprovalRequest) -> bool;
}

/// Approves everything
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoApprove;

#[async_trait]
impl SigningApproval for AutoApprove {
    async fn approve(&self, _request: &ApprovalRequest) -> bool {
        true
    }
}
