//! Diagnostics collected while serializing
//!
//! Purely informational: the caller decides whether to log or display them.

use serde::Serialize;
use strum::AsRefStr;
use strum::Display;

/// How serious a diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    /// Data was replaced by an error marker
    Error,
    /// Data was degraded but is still present
    Warning,
}

/// One entry of the diagnostics channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// How serious it is
    pub severity:    Severity,
    /// Human readable description
    pub message:     String,
    /// Path of the affected object (`$`, `$.field`, `$.list[2]`, `$.map["key"]`)
    pub object_path: String,
}

impl Diagnostic {
    /// Create an error diagnostic
    pub fn error(message: impl Into<String>, object_path: impl Into<String>) -> Self {
        Self {
            severity:    Severity::Error,
            message:     message.into(),
            object_path: object_path.into(),
        }
    }

    /// Create a warning diagnostic
    pub fn warning(message: impl Into<String>, object_path: impl Into<String>) -> Self {
        Self {
            severity:    Severity::Warning,
            message:     message.into(),
            object_path: object_path.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.object_path, self.message)
    }
}
