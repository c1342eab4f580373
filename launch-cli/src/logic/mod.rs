//! Pure functional business logic
//!
//! Functions here take inputs and return outputs: no I/O, no printing.
//! The `commands` shell composes them with the side effects.

pub mod config;
pub mod launch;

// Re-export commonly used types
pub use config::{
    expand_home, mask_secret, resolve_settings, settings_summary, validate_output_format,
    LaunchSettings, SettingsOverrides,
};
pub use launch::{
    failure_hint, failure_report, fee_split_from_creator_percent, mime_type_for_path,
    sol_to_lamports, success_report, upstream_hint,
};
