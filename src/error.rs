//! Error types for `overture`
//!
//! The presentation itself has no user-visible error surface: an unavailable
//! renderer, an exhausted interaction, or a stale timer all degrade to
//! skip-ahead behavior inside the engine. The errors here belong to the
//! process boundary only: loading a script, writing output, exiting cleanly.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `overture` CLI operations.
///
/// These codes follow Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Script error (invalid YAML, validation failure)
    pub const SCRIPT_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `overture` operations.
///
/// Aggregates the domain-specific errors and provides a unified interface
/// for error reporting and exit code mapping.
#[derive(Debug, Error)]
pub enum OvertureError {
    /// Script loading or validation error
    #[error(transparent)]
    Script(#[from] ScriptError),

    /// Stage frontend error
    #[error(transparent)]
    Stage(#[from] StageError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl OvertureError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Script(_) => ExitCode::SCRIPT_ERROR,
            Self::Stage(_) => ExitCode::ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
            Self::Json(_) => ExitCode::ERROR,
        }
    }
}

// ============================================================================
// Script Errors
// ============================================================================

/// Script loading and validation errors.
///
/// Cover every failure mode between a path on disk and a usable
/// [`Script`](crate::script::Script): reading the file, parsing the YAML,
/// and semantic validation of the parsed document.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// Script file could not be read
    #[error("cannot read script {path}: {source}")]
    Read {
        /// Path to the script file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// YAML parsing failed
    #[error("parse error in {path}: {message}")]
    Parse {
        /// Path to the script file
        path: PathBuf,
        /// Error message from the parser
        message: String,
    },

    /// Semantic validation failed
    #[error("script validation failed with {} error(s)", errors.len())]
    Validation {
        /// All validation errors found
        errors: Vec<ValidationIssue>,
    },
}

// ============================================================================
// Stage Errors
// ============================================================================

/// Stage frontend startup errors.
///
/// Nothing in this crate produces these: the bundled console stage cannot
/// fail once constructed, and the stage traits are infallible by contract.
/// Embedders whose frontends can fail to come up (a window that never
/// opens, a renderer without a context) surface that here.
#[derive(Debug, Error)]
pub enum StageError {
    /// Frontend failed to start
    #[error("stage failed to start: {0}")]
    Startup(String),
}

// ============================================================================
// Validation Issues
// ============================================================================

/// A single issue found during script validation.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Dotted path to the problematic field (e.g., "retry.messages")
    pub path: String,
    /// Description of the validation issue
    pub message: String,
    /// Severity level of the issue
    pub severity: Severity,
}

impl ValidationIssue {
    /// Creates an error-severity issue.
    #[must_use]
    pub fn error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            severity: Severity::Error,
        }
    }

    /// Creates a warning-severity issue.
    #[must_use]
    pub fn warning(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            severity: Severity::Warning,
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {} at {}", prefix, self.message, self.path)
    }
}

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Validation failure that prevents the script from being used
    Error,
    /// Potential issue that does not prevent loading
    Warning,
}

/// Convenience result type for `overture` operations.
pub type Result<T> = std::result::Result<T, OvertureError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_code_mapping() {
        let e = OvertureError::Script(ScriptError::Validation { errors: vec![] });
        assert_eq!(e.exit_code(), ExitCode::SCRIPT_ERROR);

        let e = OvertureError::Io(std::io::Error::other("boom"));
        assert_eq!(e.exit_code(), ExitCode::IO_ERROR);

        let e = OvertureError::Stage(StageError::Startup("no backend".to_string()));
        assert_eq!(e.exit_code(), ExitCode::ERROR);
    }

    #[test]
    fn validation_issue_display() {
        let issue = ValidationIssue::error("retry.messages", "expected exactly 3 messages");
        let rendered = issue.to_string();
        assert!(rendered.starts_with("error:"));
        assert!(rendered.contains("retry.messages"));

        let issue = ValidationIssue::warning("countdown.target", "target is in the past");
        assert!(issue.to_string().starts_with("warning:"));
    }

    #[test]
    fn script_error_display_counts_errors() {
        let e = ScriptError::Validation {
            errors: vec![
                ValidationIssue::error("a", "x"),
                ValidationIssue::error("b", "y"),
            ],
        };
        assert!(e.to_string().contains("2 error(s)"));
    }
}
