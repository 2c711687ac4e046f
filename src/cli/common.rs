//! Shared CLI types: errors, exit codes, and JSON response shapes.

use crate::models::{ValidationError, ValidationReport};
use crate::snippet::ImportWarning;
use serde::Serialize;
use std::fmt;

/// Process exit codes used by all commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command succeeded
    Success = 0,
    /// Input was rejected (invalid layout, unreadable snippet, strict warnings)
    ValidationFailed = 1,
    /// File system or internal failure
    IoError = 2,
}

impl ExitCode {
    /// Numeric code passed to `std::process::exit`.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// Error returned by a command handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliError {
    /// Exit code the process should end with
    pub exit_code: ExitCode,
    /// Message printed to stderr
    pub message: String,
}

impl CliError {
    /// File system or internal failure (exit code 2).
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            exit_code: ExitCode::IoError,
            message: message.into(),
        }
    }

    /// Rejected input (exit code 1).
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            exit_code: ExitCode::ValidationFailed,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type of command handlers.
pub type CliResult<T> = Result<T, CliError>;

/// One validation finding in JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationMessage {
    /// "error" or "warning"
    pub severity: String,
    /// Stable error kind, absent for warnings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Page ordinal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Widget id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub widget: Option<String>,
    /// Human-readable description
    pub message: String,
    /// Suggested fix
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl From<&ValidationError> for ValidationMessage {
    fn from(error: &ValidationError) -> Self {
        Self {
            severity: "error".to_string(),
            kind: Some(error.kind.as_str().to_string()),
            page: error.page,
            widget: error.widget.clone(),
            message: error.message.clone(),
            suggestion: error.suggestion.clone(),
        }
    }
}

/// JSON output of `validate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResponse {
    /// True if the layout has no errors
    pub valid: bool,
    /// Errors followed by warnings
    pub errors: Vec<ValidationMessage>,
}

impl From<&ValidationReport> for ValidationResponse {
    fn from(report: &ValidationReport) -> Self {
        let errors = report.errors.iter().map(ValidationMessage::from);
        let warnings = report.warnings.iter().map(|warning| ValidationMessage {
            severity: "warning".to_string(),
            kind: None,
            page: None,
            widget: None,
            message: warning.message.clone(),
            suggestion: None,
        });

        Self {
            valid: report.is_valid(),
            errors: errors.chain(warnings).collect(),
        }
    }
}

/// Import warning in JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WarningMessage {
    /// 1-based document line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// Description
    pub message: String,
}

impl From<&ImportWarning> for WarningMessage {
    fn from(warning: &ImportWarning) -> Self {
        Self {
            line: warning.line,
            message: warning.message.clone(),
        }
    }
}
