//! Bags Launch CLI Library
//!
//! Command-line front end for `lib-launch`: launch a token, look up fee
//! wallets, check the API and manage the config file.
//!
//! ## Architecture
//!
//! This crate follows the **Functional Core, Imperative Shell** (FCIS) architecture pattern:
//!
//! - **Functional Core** (`logic/` module): Pure functions for settings and reports
//! - **Imperative Shell** (`commands/` module): Side effects, I/O, and command orchestration
//! - **Error Handling** (`error/` module): Structured, domain-specific error types
//! - **Output Abstraction** (`output/` module): Testable printing interface

pub mod argument_parsing;
pub mod cli_config;
pub mod commands;
pub mod error;
pub mod logic;
pub mod output;

pub use argument_parsing::{format_output, run_cli, LaunchCli, LaunchCommand};
pub use error::{CliError, CliResult};
pub use output::Output;

/// Launch CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
