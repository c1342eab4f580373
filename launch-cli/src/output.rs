//! Output abstraction for testable printing
//!
//! Commands print through [`Output`] so tests can capture what a user would
//! see. [`PhaseReporter`] forwards launch progress to an `Output`.

use crate::error::CliResult;
use lib_launch::{LaunchObserver, LaunchPhase};
use std::sync::Arc;
use tracing::warn;

/// Output abstraction for printing results
pub trait Output: Send + Sync {
    /// Print normal output
    fn print(&self, msg: &str) -> CliResult<()>;

    /// Print formatted JSON
    fn print_json(&self, data: &serde_json::Value) -> CliResult<()> {
        self.print(&serde_json::to_string_pretty(data)?)
    }

    /// Print error message
    fn error(&self, msg: &str) -> CliResult<()>;

    /// Print success message with checkmark
    fn success(&self, msg: &str) -> CliResult<()> {
        self.print(&format!("✅ {}", msg))
    }

    /// Print warning message
    fn warning(&self, msg: &str) -> CliResult<()> {
        self.print(&format!("⚠️  {}", msg))
    }

    /// Print info message
    fn info(&self, msg: &str) -> CliResult<()> {
        self.print(&format!("ℹ️  {}", msg))
    }

    /// Print a section header
    fn header(&self, title: &str) -> CliResult<()> {
        self.print(&format!("\n{}\n{}", title, "=".repeat(title.len())))
    }
}

/// Standard console output implementation
pub struct ConsoleOutput;

impl Output for ConsoleOutput {
    fn print(&self, msg: &str) -> CliResult<()> {
        println!("{}", msg);
        Ok(())
    }

    fn error(&self, msg: &str) -> CliResult<()> {
        eprintln!("❌ {}", msg);
        Ok(())
    }
}

/// Prints one progress line per launch phase
pub struct PhaseReporter {
    output: Arc<dyn Output>,
}

impl PhaseReporter {
    pub fn new(output: Arc<dyn Output>) -> Self {
        Self { output }
    }
}

impl LaunchObserver for PhaseReporter {
    fn on_phase(&self, phase: LaunchPhase) {
        // Terminal phases are reported by the command itself
        if matches!(phase, LaunchPhase::Done | LaunchPhase::Failed) {
            return;
        }
        if let Err(e) = self.output.info(phase.description()) {
            warn!("Could not report launch phase {:?}: {}", phase, e);
        }
    }
}
