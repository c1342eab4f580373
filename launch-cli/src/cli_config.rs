//! CLI configuration loader and runtime defaults.

use crate::error::{CliError, CliResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Directory under the home directory holding CLI state
pub const DEFAULT_CONFIG_DIR: &str = ".bags-launch";

/// Default CLI config filename under ~/.bags-launch/
pub const DEFAULT_CONFIG_FILENAME: &str = "cli.toml";

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct CliConfig {
    pub default_profile: Option<String>,
    pub defaults: Option<LaunchDefaults>,
    #[serde(default)]
    pub profiles: HashMap<String, LaunchDefaults>,
}

/// Settings a config table may carry; every key is optional
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LaunchDefaults {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub rpc_url: Option<String>,
    pub helius_api_key: Option<String>,
    pub keypair: Option<String>,
    pub platform: Option<String>,
    pub confirm_timeout_secs: Option<u64>,
    pub poll_interval_ms: Option<u64>,
}

pub fn default_config_path() -> PathBuf {
    if let Some(home) = dirs::home_dir() {
        home.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILENAME)
    } else {
        PathBuf::from("./launch-cli.toml")
    }
}

pub fn config_path(path: Option<&str>) -> PathBuf {
    path.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load the config file
///
/// A missing default file yields an empty config; a missing file that was
/// asked for explicitly is an error.
pub fn load_config(path: Option<&str>) -> CliResult<CliConfig> {
    let config_path = config_path(path);

    if !config_path.exists() {
        if path.is_some() {
            return Err(CliError::ConfigError(format!(
                "Configuration file not found: {}",
                config_path.display()
            )));
        }
        return Ok(CliConfig::default());
    }

    let raw = fs::read_to_string(&config_path)
        .map_err(|e| CliError::ConfigError(format!("Failed to read config: {}", e)))?;

    toml::from_str(&raw)
        .map_err(|e| CliError::ConfigError(format!("Invalid CLI config: {}", e)))
}

pub fn save_config(path: Option<&str>, config: &CliConfig) -> CliResult<()> {
    write_config_text(path, &serialize_config(config)?)
}

pub fn serialize_config(config: &CliConfig) -> CliResult<String> {
    toml::to_string_pretty(config)
        .map_err(|e| CliError::ConfigError(format!("Failed to serialize config: {}", e)))
}

/// Write raw TOML text to the config location, creating its directory
pub fn write_config_text(path: Option<&str>, text: &str) -> CliResult<()> {
    let config_path = config_path(path);
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            CliError::ConfigError(format!("Failed to create config directory: {}", e))
        })?;
    }

    fs::write(&config_path, text)
        .map_err(|e| CliError::ConfigError(format!("Failed to write config: {}", e)))?;
    Ok(())
}

pub fn resolve_profile<'a>(config: &'a CliConfig, name: &str) -> Option<&'a LaunchDefaults> {
    config.profiles.get(name)
}

/// Layer `overrides` on top of `base`; set keys in `overrides` win
pub fn merge_defaults(base: LaunchDefaults, overrides: &LaunchDefaults) -> LaunchDefaults {
    LaunchDefaults {
        api_url: overrides.api_url.clone().or(base.api_url),
        api_key: overrides.api_key.clone().or(base.api_key),
        rpc_url: overrides.rpc_url.clone().or(base.rpc_url),
        helius_api_key: overrides.helius_api_key.clone().or(base.helius_api_key),
        keypair: overrides.keypair.clone().or(base.keypair),
        platform: overrides.platform.clone().or(base.platform),
        confirm_timeout_secs: overrides.confirm_timeout_secs.or(base.confirm_timeout_secs),
        poll_interval_ms: overrides.poll_interval_ms.or(base.poll_interval_ms),
    }
}

/// `[defaults]` with the selected profile layered on top
///
/// `profile` falls back to `default_profile`. Naming a profile that does not
/// exist is an error.
pub fn effective_defaults(config: &CliConfig, profile: Option<&str>) -> CliResult<LaunchDefaults> {
    let mut merged = config.defaults.clone().unwrap_or_default();

    let profile_name = profile
        .map(String::from)
        .or_else(|| config.default_profile.clone());
    if let Some(name) = profile_name {
        let profile = resolve_profile(config, &name)
            .ok_or_else(|| CliError::UnknownProfile(name.clone()))?;
        merged = merge_defaults(merged, profile);
    }

    Ok(merged)
}

/// Starter file written by `config init`
pub fn config_template() -> String {
    r#"# Bags launch CLI configuration
# Command-line flags and environment variables override these values.

# default_profile = "main"

[defaults]
# api_url = "https://public-api-v2.bags.fm/api/v1"
# api_key = "your-bags-api-key"            # or BAGS_API_KEY
# rpc_url = "https://api.mainnet-beta.solana.com"  # or SOLANA_RPC_URL
# helius_api_key = ""                      # used when rpc_url is unset
# keypair = "~/.config/solana/id.json"     # or LAUNCH_KEYPAIR
platform = "twitter"
confirm_timeout_secs = 60
poll_interval_ms = 500

# [profiles.devnet]
# rpc_url = "https://api.devnet.solana.com"
"#
    .to_string()
}
