//! Pure configuration logic
//!
//! Turns the merged config file table plus command-line overrides into the
//! settings the commands run with. No I/O.

use crate::cli_config::LaunchDefaults;
use crate::error::{CliError, CliResult};
use lib_launch::api::DEFAULT_API_URL;
use lib_launch::{resolve_rpc_url, ConfirmSettings, SocialPlatform};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Values given on the command line or through the environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub rpc_url: Option<String>,
    pub helius_api_key: Option<String>,
    pub keypair: Option<String>,
}

/// Everything a command needs to talk to the API and the chain
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchSettings {
    pub api_url: String,
    pub api_key: Option<String>,
    pub rpc_url: String,
    pub keypair: Option<PathBuf>,
    pub platform: SocialPlatform,
    pub confirm: ConfirmSettings,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Expand a leading `~/` against `home`
pub fn expand_home(path: &str, home: Option<&Path>) -> CliResult<PathBuf> {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = home.ok_or(CliError::HomeDirectoryNotFound)?;
        Ok(home.join(rest))
    } else if path == "~" {
        home.map(Path::to_path_buf).ok_or(CliError::HomeDirectoryNotFound)
    } else {
        Ok(PathBuf::from(path))
    }
}

/// Combine file settings and overrides; overrides win
///
/// The API key stays optional here. A missing key is reported by the API
/// client before its first request.
pub fn resolve_settings(
    file: &LaunchDefaults,
    overrides: &SettingsOverrides,
    home: Option<&Path>,
) -> CliResult<LaunchSettings> {
    let api_url = non_blank(overrides.api_url.clone())
        .or_else(|| non_blank(file.api_url.clone()))
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    validate_http_url(&api_url)?;

    let rpc_url = resolve_rpc_url(
        non_blank(overrides.rpc_url.clone())
            .or_else(|| non_blank(file.rpc_url.clone()))
            .as_deref(),
        non_blank(overrides.helius_api_key.clone())
            .or_else(|| non_blank(file.helius_api_key.clone()))
            .as_deref(),
    );
    validate_http_url(&rpc_url)?;

    let keypair = non_blank(overrides.keypair.clone())
        .or_else(|| non_blank(file.keypair.clone()))
        .map(|p| expand_home(&p, home))
        .transpose()?;

    let platform = match file.platform.as_deref() {
        Some(name) => SocialPlatform::parse(name)?,
        None => SocialPlatform::default(),
    };

    let defaults = ConfirmSettings::default();
    let confirm = ConfirmSettings {
        timeout: file
            .confirm_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout),
        poll_interval: file
            .poll_interval_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.poll_interval),
    };
    if confirm.timeout.is_zero() || confirm.poll_interval.is_zero() {
        return Err(CliError::ConfigError(
            "confirm_timeout_secs and poll_interval_ms must be greater than zero".to_string(),
        ));
    }

    Ok(LaunchSettings {
        api_url,
        api_key: non_blank(overrides.api_key.clone()).or_else(|| non_blank(file.api_key.clone())),
        rpc_url,
        keypair,
        platform,
        confirm,
    })
}

/// Require an http(s) URL
pub fn validate_http_url(url: &str) -> CliResult<()> {
    if url.starts_with("https://") || url.starts_with("http://") {
        Ok(())
    } else {
        Err(CliError::ConfigError(format!(
            "URL must start with http:// or https://: '{}'",
            url
        )))
    }
}

/// Validate output format
pub fn validate_output_format(format: &str) -> CliResult<()> {
    match format.to_lowercase().as_str() {
        "json" | "table" => Ok(()),
        other => Err(CliError::InvalidArgument(format!(
            "Unknown output format: '{}'. Supported: json, table",
            other
        ))),
    }
}

/// Show only the ends of a secret
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len().max(4));
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Display form of the settings, secrets masked
///
/// The RPC URL is masked as a whole when it embeds an API key.
pub fn settings_summary(settings: &LaunchSettings) -> Value {
    let rpc_url = match settings.rpc_url.split_once("api-key=") {
        Some((prefix, key)) => format!("{}api-key={}", prefix, mask_secret(key)),
        None => settings.rpc_url.clone(),
    };
    json!({
        "api_url": settings.api_url,
        "api_key": settings.api_key.as_deref().map(mask_secret).unwrap_or_else(|| "(not set)".to_string()),
        "rpc_url": rpc_url,
        "keypair": settings
            .keypair
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not set)".to_string()),
        "platform": settings.platform.as_str(),
        "confirm_timeout_secs": settings.confirm.timeout.as_secs(),
        "poll_interval_ms": settings.confirm.poll_interval.as_millis() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib_launch::rpc::DEFAULT_RPC_URL;

    #[test]
    fn test_empty_settings_use_defaults() {
        let settings =
            resolve_settings(&LaunchDefaults::default(), &SettingsOverrides::default(), None).unwrap();
        assert_eq!(settings.api_url, DEFAULT_API_URL);
        assert_eq!(settings.rpc_url, DEFAULT_RPC_URL);
        assert!(settings.api_key.is_none());
        assert!(settings.keypair.is_none());
        assert_eq!(settings.confirm, ConfirmSettings::default());
    }

    #[test]
    fn test_overrides_win_over_file() {
        let file = LaunchDefaults {
            api_key: Some("file-key".to_string()),
            rpc_url: Some("https://file-rpc".to_string()),
            ..Default::default()
        };
        let overrides = SettingsOverrides {
            api_key: Some("flag-key".to_string()),
            ..Default::default()
        };
        let settings = resolve_settings(&file, &overrides, None).unwrap();
        assert_eq!(settings.api_key.as_deref(), Some("flag-key"));
        assert_eq!(settings.rpc_url, "https://file-rpc");
    }

    #[test]
    fn test_helius_key_builds_rpc_url() {
        let file = LaunchDefaults {
            helius_api_key: Some("abc".to_string()),
            ..Default::default()
        };
        let settings = resolve_settings(&file, &SettingsOverrides::default(), None).unwrap();
        assert_eq!(settings.rpc_url, "https://mainnet.helius-rpc.com/?api-key=abc");
    }

    #[test]
    fn test_blank_api_key_is_unset() {
        let overrides = SettingsOverrides {
            api_key: Some("   ".to_string()),
            ..Default::default()
        };
        let settings = resolve_settings(&LaunchDefaults::default(), &overrides, None).unwrap();
        assert!(settings.api_key.is_none());
    }

    #[test]
    fn test_keypair_home_expansion() {
        let file = LaunchDefaults {
            keypair: Some("~/.config/solana/id.json".to_string()),
            ..Default::default()
        };
        let settings =
            resolve_settings(&file, &SettingsOverrides::default(), Some(Path::new("/home/dev"))).unwrap();
        assert_eq!(
            settings.keypair,
            Some(PathBuf::from("/home/dev/.config/solana/id.json"))
        );

        let err = resolve_settings(&file, &SettingsOverrides::default(), None).unwrap_err();
        assert!(matches!(err, CliError::HomeDirectoryNotFound));
    }

    #[test]
    fn test_unknown_platform_is_rejected() {
        let file = LaunchDefaults {
            platform: Some("myspace".to_string()),
            ..Default::default()
        };
        let err = resolve_settings(&file, &SettingsOverrides::default(), None).unwrap_err();
        assert!(matches!(err, CliError::Launch(_)));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let file = LaunchDefaults {
            confirm_timeout_secs: Some(0),
            ..Default::default()
        };
        assert!(resolve_settings(&file, &SettingsOverrides::default(), None).is_err());
    }

    #[test]
    fn test_validate_output_format() {
        assert!(validate_output_format("json").is_ok());
        assert!(validate_output_format("TABLE").is_ok());
        assert!(validate_output_format("xml").is_err());
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("bags_1234567890abcd"), "bags...abcd");
        assert_eq!(mask_secret("short"), "*****");
        assert_eq!(mask_secret(""), "****");
    }

    #[test]
    fn test_summary_masks_secrets() {
        let settings = LaunchSettings {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: Some("bags_1234567890abcd".to_string()),
            rpc_url: "https://mainnet.helius-rpc.com/?api-key=helius0123456789".to_string(),
            keypair: None,
            platform: SocialPlatform::Twitter,
            confirm: ConfirmSettings::default(),
        };
        let summary = settings_summary(&settings).to_string();
        assert!(!summary.contains("1234567890"));
        assert!(!summary.contains("helius0123456789"));
        assert!(summary.contains("bags...abcd"));
        assert!(summary.contains("api-key=heli...6789"));
    }
}
