//! Fee-share slot ordering
//!
//! The launch API wants the two wallets of a fee-share config in a fixed
//! order: the wallet whose address sorts first (byte-wise) goes in slot A,
//! whether it belongs to the creator or the claimer. Each wallet's share
//! travels with it.

use crate::error::{LaunchError, LaunchResult};
use crate::types::{FeeSplit, LaunchConfig, SerializedTransaction, TOTAL_BPS};

/// Wallet pair in API slot order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeSlots {
    pub wallet_a: String,
    pub wallet_b: String,
    pub wallet_a_bps: u16,
    pub wallet_b_bps: u16,
}

impl FeeSlots {
    /// Order creator and claimer into slots A/B
    ///
    /// `str` ordering is byte-wise, so addresses differing only in case never
    /// compare equal. Identical wallets are rejected.
    pub fn order(creator_wallet: &str, claimer_wallet: &str, split: FeeSplit) -> LaunchResult<Self> {
        if creator_wallet == claimer_wallet {
            return Err(LaunchError::Validation(
                "Fee claimer wallet is the launch wallet; nothing to share".to_string(),
            ));
        }

        let slots = if creator_wallet < claimer_wallet {
            FeeSlots {
                wallet_a: creator_wallet.to_string(),
                wallet_b: claimer_wallet.to_string(),
                wallet_a_bps: split.creator_bps(),
                wallet_b_bps: split.claimer_bps(),
            }
        } else {
            FeeSlots {
                wallet_a: claimer_wallet.to_string(),
                wallet_b: creator_wallet.to_string(),
                wallet_a_bps: split.claimer_bps(),
                wallet_b_bps: split.creator_bps(),
            }
        };

        debug_assert_eq!(
            u32::from(slots.wallet_a_bps) + u32::from(slots.wallet_b_bps),
            u32::from(TOTAL_BPS)
        );
        Ok(slots)
    }
}

/// Fee-share config as created upstream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeShareConfig {
    pub slots: FeeSlots,
    pub claimer_wallet: String,
    pub config_key: String,
    pub pending_transaction: Option<SerializedTransaction>,
}

impl FeeShareConfig {
    pub fn new(slots: FeeSlots, claimer_wallet: String, config: LaunchConfig) -> Self {
        Self {
            slots,
            claimer_wallet,
            config_key: config.config_key,
            pending_transaction: config.pending_transaction,
        }
    }

    pub fn launch_config(&self) -> LaunchConfig {
        LaunchConfig {
            config_key: self.config_key.clone(),
            pending_transaction: self.pending_transaction.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(creator: u16) -> FeeSplit {
        FeeSplit::new(creator, TOTAL_BPS - creator).unwrap()
    }

    #[test]
    fn test_alice_takes_slot_a_as_creator() {
        let slots = FeeSlots::order("Alice", "Bob", split(1000)).unwrap();
        assert_eq!(slots.wallet_a, "Alice");
        assert_eq!(slots.wallet_a_bps, 1000);
        assert_eq!(slots.wallet_b, "Bob");
        assert_eq!(slots.wallet_b_bps, 9000);
    }

    #[test]
    fn test_alice_takes_slot_a_as_claimer() {
        let slots = FeeSlots::order("Bob", "Alice", split(1000)).unwrap();
        assert_eq!(slots.wallet_a, "Alice");
        assert_eq!(slots.wallet_a_bps, 9000);
        assert_eq!(slots.wallet_b, "Bob");
        assert_eq!(slots.wallet_b_bps, 1000);
    }

    #[test]
    fn test_ordering_is_ordinal_not_case_insensitive() {
        // 'Z' (0x5A) sorts before 'a' (0x61)
        let slots = FeeSlots::order("alice", "Zed", split(5000)).unwrap();
        assert_eq!(slots.wallet_a, "Zed");

        let slots = FeeSlots::order("bob", "Bob", split(5000)).unwrap();
        assert_eq!(slots.wallet_a, "Bob");
    }

    #[test]
    fn test_identical_wallets_rejected() {
        assert!(FeeSlots::order("Same", "Same", split(5000)).is_err());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_slots_total_and_order(
                creator in "[1-9A-HJ-NP-Za-km-z]{1,44}",
                claimer in "[1-9A-HJ-NP-Za-km-z]{1,44}",
                creator_bps in 0u16..=TOTAL_BPS,
            ) {
                prop_assume!(creator != claimer);
                let slots = FeeSlots::order(&creator, &claimer, split(creator_bps)).unwrap();
                prop_assert_eq!(u32::from(slots.wallet_a_bps) + u32::from(slots.wallet_b_bps), 10_000);
                prop_assert!(slots.wallet_a < slots.wallet_b);

                let swapped = FeeSlots::order(&claimer, &creator, split(TOTAL_BPS - creator_bps)).unwrap();
                prop_assert_eq!(slots, swapped);
            }
        }
    }
}
