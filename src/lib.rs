//! Canopy: persistent red/green syntax trees.
//!
//! This crate re-exports the workspace under one roof:
//!
//! - [`common`]: text spans, text changes, diagnostics and limits
//! - [`syntax`]: shared green nodes, positioned red nodes, lists, side tables,
//!   rewriting and node tracking
//! - [`differ`]: text changes between two versions of a tree
//!
//! ```ignore
//! use canopy::{SyntaxTree, text_changes};
//!
//! let changes = text_changes(Some(&before), Some(&after));
//! ```
//!
//! Call [`tracing_config::init_tracing`] once at startup to see what the
//! cache, the rewriter and the differ are doing.

pub use canopy_common as common;
pub use canopy_differ as differ;
pub use canopy_syntax as syntax;

pub mod tracing_config;

pub use canopy_common::{
    Diagnostic, DiagnosticCategory, DiagnosticInfo, TextChange, TextChangeRange, TextSize, TextSpan,
    apply_text_changes,
};
pub use canopy_differ::{possibly_different_spans, text_change_ranges, text_changes};
pub use canopy_syntax::{
    EditError, GreenNode, NodeCache, NodeTracker, RemoveOptions, SideTables, SyntaxAnnotation, SyntaxKind,
    SyntaxNode, SyntaxNodeOrToken, SyntaxToken, SyntaxTree, SyntaxTrivia,
};
