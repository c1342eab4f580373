//! API health check command

use crate::argument_parsing::{load_settings, LaunchCli};
use crate::commands::common::build_api_client;
use crate::error::{CliError, CliResult};
use crate::output::{ConsoleOutput, Output};
use lib_launch::LaunchResult;

// ============================================================================
// PURE LOGIC - No side effects, fully testable
// ============================================================================

/// Turn a ping result into a command result, printing along the way
pub fn report_ping(api_url: &str, result: LaunchResult<bool>, output: &dyn Output) -> CliResult<()> {
    match result {
        Ok(true) => {
            output.success(&format!("Launch API at {} is reachable", api_url))?;
            Ok(())
        }
        Ok(false) => {
            output.warning(&format!("Launch API at {} answered, but not with pong", api_url))?;
            Err(CliError::Other("Launch API health check failed".to_string()))
        }
        Err(e) => {
            output.error(&format!("Launch API at {} is unreachable: {}", api_url, e))?;
            Err(e.into())
        }
    }
}

// ============================================================================
// IMPERATIVE SHELL - All side effects here
// ============================================================================

/// Handle ping command
pub async fn handle_ping_command(cli: &LaunchCli) -> CliResult<()> {
    let settings = load_settings(cli)?;
    let client = build_api_client(&settings)?;
    report_ping(&settings.api_url, client.ping().await, &ConsoleOutput)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::testing::MockOutput;
    use lib_launch::LaunchError;

    #[test]
    fn test_report_ping_ok() {
        let output = MockOutput::new();
        report_ping("https://api.test", Ok(true), &output).unwrap();
        output.assert_contains_message("reachable");
    }

    #[test]
    fn test_report_ping_not_pong() {
        let output = MockOutput::new();
        assert!(report_ping("https://api.test", Ok(false), &output).is_err());
        output.assert_contains_message("not with pong");
    }

    #[test]
    fn test_report_ping_transport_failure() {
        let output = MockOutput::new();
        let err = report_ping(
            "https://api.test",
            Err(LaunchError::upstream("connection refused")),
            &output,
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Launch(LaunchError::Upstream { status: None, .. })));
        output.assert_contains_error("unreachable");
    }
}
