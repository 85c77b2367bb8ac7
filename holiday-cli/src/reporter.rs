//! Terminal rendering of the client's side channels

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

use colored::*;
use holiday_client::{Reporter, Severity};
use tracing::debug;

/// Prints notifications and upload progress to stderr
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    failure_shown: AtomicBool,
}

impl ConsoleReporter {
    /// Whether a warning or error has already been printed
    pub fn has_shown_failure(&self) -> bool {
        self.failure_shown.load(Ordering::SeqCst)
    }
}

impl Reporter for ConsoleReporter {
    fn notify(&self, severity: Severity, message: &str) {
        if matches!(severity, Severity::Warning | Severity::Error) {
            self.failure_shown.store(true, Ordering::SeqCst);
        }
        let marker = match severity {
            Severity::Info => "ℹ".blue(),
            Severity::Success => "✓".green(),
            Severity::Warning => "⚠".yellow(),
            Severity::Error => "✗".red(),
        };
        eprintln!("{} {}", marker, message);
    }

    fn on_progress(&self, percent: u8) {
        eprint!("\r  {} {:>3}%", "Uploading".dimmed(), percent);
        if percent >= 100 {
            eprintln!();
        }
        let _ = std::io::stderr().flush();
    }

    fn navigate(&self, location: &str) {
        debug!("Redirect to {}", location);
        eprintln!(
            "  {} Run {} to sign in again.",
            "→".cyan(),
            "holiday auth login".bold()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_failures_are_remembered() {
        let reporter = ConsoleReporter::default();

        reporter.notify(Severity::Success, "Logged in");
        reporter.notify(Severity::Info, "Nothing to do");
        assert!(!reporter.has_shown_failure());

        reporter.notify(Severity::Error, "Invalid response from server.");
        assert!(reporter.has_shown_failure());
    }
}
