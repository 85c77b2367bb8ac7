//! Side channels of the request pipeline
//!
//! User-facing notifications, upload progress and forced navigation are pushed
//! through a `Reporter` so that the pipeline does not depend on any particular
//! front end.

use tracing::{debug, error, info, warn};

/// Severity of a user-facing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Success => write!(f, "success"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Observer for the pipeline's side effects
pub trait Reporter: Send + Sync {
    /// Shows a transient notification to the user
    fn notify(&self, severity: Severity, message: &str);

    /// Reports upload progress as a rounded percentage (0-100)
    fn on_progress(&self, percent: u8) {
        debug!("Upload progress: {}%", percent);
    }

    /// Sends the user to another entry point (e.g. the login screen)
    fn navigate(&self, location: &str);
}

/// Reporter that turns every side effect into a tracing event
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn notify(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Info | Severity::Success => info!("{}", message),
            Severity::Warning => warn!("{}", message),
            Severity::Error => error!("{}", message),
        }
    }

    fn navigate(&self, location: &str) {
        info!("Navigation requested: {}", location);
    }
}
