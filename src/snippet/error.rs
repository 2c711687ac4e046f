//! Classified snippet failures and import warnings.

use crate::models::ValidationReport;
use std::fmt;

/// Failure of a snippet operation.
///
/// The first three variants classify *input* problems and map to a
/// client-error response in any transport layer. [`SnippetError::InvalidLayout`]
/// is a contract fault: a device handed to the generator, or assembled by the
/// parser, broke the model invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnippetError {
    /// Input is not a well-formed YAML mapping document.
    InvalidYaml {
        /// Parser message
        message: String,
        /// 1-based line of the syntax error, if known
        line: Option<usize>,
        /// 1-based column of the syntax error, if known
        column: Option<usize>,
    },
    /// Well-formed document without a recognizable page dispatch.
    UnrecognizedDisplayStructure {
        /// What was missing
        reason: String,
    },
    /// Dispatch recognized but it contains no page branches.
    NoPagesFound {
        /// 1-based document line of the dispatch statement
        line: usize,
    },
    /// Device violates model invariants.
    InvalidLayout(ValidationReport),
}

impl SnippetError {
    /// Stable identifier of the failure category.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidYaml { .. } => "invalid_yaml",
            Self::UnrecognizedDisplayStructure { .. } => "unrecognized_display_structure",
            Self::NoPagesFound { .. } => "no_pages_found",
            Self::InvalidLayout(_) => "invalid_layout",
        }
    }

    /// Returns true if the failure is caused by the supplied snippet text.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        !matches!(self, Self::InvalidLayout(_))
    }

    pub(crate) fn unrecognized(reason: impl Into<String>) -> Self {
        Self::UnrecognizedDisplayStructure {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SnippetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidYaml {
                message,
                line: Some(line),
                column: Some(column),
            } => write!(f, "invalid YAML at line {line}, column {column}: {message}"),
            Self::InvalidYaml { message, .. } => write!(f, "invalid YAML: {message}"),
            Self::UnrecognizedDisplayStructure { reason } => {
                write!(f, "unrecognized display structure: {reason}")
            }
            Self::NoPagesFound { line } => write!(
                f,
                "no pages found: the page dispatch on line {line} has no `case` branches"
            ),
            Self::InvalidLayout(report) => {
                write!(f, "invalid layout:\n{}", report.format_message())
            }
        }
    }
}

impl std::error::Error for SnippetError {}

/// Non-fatal problem found while importing a snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportWarning {
    /// 1-based document line, if the problem is local
    pub line: Option<usize>,
    /// Human-readable description
    pub message: String,
}

impl ImportWarning {
    /// Creates a warning without line context.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            line: None,
            message: message.into(),
        }
    }

    /// Creates a warning tied to a document line.
    pub fn at_line(line: usize, message: impl Into<String>) -> Self {
        Self {
            line: Some(line),
            message: message.into(),
        }
    }
}

impl fmt::Display for ImportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {}: {}", line, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}
