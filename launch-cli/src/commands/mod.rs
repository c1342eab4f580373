//! Command handlers (imperative shell)
//!
//! Each handler resolves settings, builds its collaborators and prints
//! through [`crate::output::Output`].

pub mod common;
pub mod config;
pub mod fee_wallet;
pub mod launch;
pub mod ping;
