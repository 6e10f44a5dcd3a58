//! Diagnostic severity levels.

use serde::{Deserialize, Serialize};

/// How serious a diagnostic is.
///
/// Only [`Severity::Error`] affects the run outcome; notices and warnings are
/// informational and never change the exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Informational message (e.g., effective device configuration).
    Notice,
    /// Something suspicious that does not prevent compilation.
    Warning,
    /// A fatal problem. Errors are normally reported through typed error
    /// values; sink-level errors exist for collaborators that render logs.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Notice => write!(f, "notice"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}
