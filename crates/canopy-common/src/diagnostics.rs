//! Diagnostic types carried by syntax nodes.
//!
//! A parser reports problems as `DiagnosticInfo` values attached to the shared
//! node they concern. They are inert data: no tree operation ever fails
//! because a node carries diagnostics. Positions inside a `DiagnosticInfo` are
//! relative to the start of the owning node's span (its text without leading
//! trivia); resolving them against a positioned tree yields a `Diagnostic`.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
    Suggestion = 2,
    Message = 3,
}

/// A node-relative diagnostic as produced by a parser.
///
/// `offset` and `width` locate the problem relative to the start of the
/// owning node's span. A zero width with zero offset covers the node start.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DiagnosticInfo {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message_text: Arc<str>,
    pub offset: u32,
    pub width: u32,
}

impl DiagnosticInfo {
    /// Create an error diagnostic covering the node start.
    #[must_use]
    pub fn error(code: u32, message: impl Into<Arc<str>>) -> Self {
        Self {
            code,
            category: DiagnosticCategory::Error,
            message_text: message.into(),
            offset: 0,
            width: 0,
        }
    }

    /// Create a warning diagnostic covering the node start.
    #[must_use]
    pub fn warning(code: u32, message: impl Into<Arc<str>>) -> Self {
        Self {
            category: DiagnosticCategory::Warning,
            ..Self::error(code, message)
        }
    }

    /// Place the diagnostic at `offset` (relative to the node span) with `width`.
    #[must_use]
    pub fn with_location(mut self, offset: u32, width: u32) -> Self {
        self.offset = offset;
        self.width = width;
        self
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }

    /// Resolve against the absolute start of the owning node's span.
    #[must_use]
    pub fn resolve(&self, file: &str, span_start: u32) -> Diagnostic {
        Diagnostic {
            file: file.to_string(),
            start: span_start + self.offset,
            length: self.width,
            message_text: self.message_text.to_string(),
            category: self.category,
            code: self.code,
        }
    }
}

/// A diagnostic positioned in a file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    #[must_use]
    pub const fn error(file: String, start: u32, length: u32, message: String, code: u32) -> Self {
        Self {
            file,
            start,
            length,
            message_text: message,
            category: DiagnosticCategory::Error,
            code,
        }
    }
}

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}
