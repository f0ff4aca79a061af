//! Errors returned by tree-editing operations.
//!
//! Only argument problems a caller can reasonably check for and recover from
//! are reported this way. Broken invariants (out-of-range indices, builders
//! fed the wrong element type) panic at the call site.

use canopy_common::TextSpan;
use thiserror::Error;

use crate::kind::SyntaxKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// A node passed for tracking is not part of the given root's tree.
    #[error("node {kind:?} at {span} is not a descendant of the root being tracked")]
    InvalidNodeToTrack { kind: SyntaxKind, span: TextSpan },

    /// A node, token or trivia passed for replacement is not part of the tree.
    #[error("{kind:?} at {span} is not part of this tree")]
    NodeNotInTree { kind: SyntaxKind, span: TextSpan },

    /// A list operation referred to an element the list does not contain.
    #[error("{kind:?} at {span} is not an element of this list")]
    MissingListItem { kind: SyntaxKind, span: TextSpan },

    /// A separator was replaced by a token of a different kind.
    #[error("separator of kind {expected:?} cannot be replaced by {found:?}")]
    SeparatorKindMismatch {
        expected: SyntaxKind,
        found: SyntaxKind,
    },

    /// A separated list needs a new separator but has none to copy.
    #[error("separated list has no separator to copy; set one with with_separator_template")]
    MissingSeparatorTemplate,
}
