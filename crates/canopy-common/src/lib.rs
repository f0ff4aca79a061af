//! Common types and utilities for the canopy syntax tree.
//!
//! This crate provides foundational types used across all canopy crates:
//! - Text spans and edits (`TextSpan`, `TextChange`, `TextChangeRange`)
//! - Diagnostics carried by syntax nodes (`DiagnosticInfo`) and their
//!   resolved, absolutely positioned form (`Diagnostic`)
//! - Centralized limits and thresholds

// Span - Source location tracking (byte offsets) and text edits
pub mod span;
pub use span::{TextChange, TextChangeRange, TextSize, TextSpan, apply_text_changes};

// Diagnostics attached to nodes and resolved against a tree
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticInfo, format_message};

// Centralized limits and thresholds
pub mod limits;

#[cfg(test)]
#[path = "../tests/span_tests.rs"]
mod span_tests;

#[cfg(test)]
#[path = "../tests/diagnostics_tests.rs"]
mod diagnostics_tests;
