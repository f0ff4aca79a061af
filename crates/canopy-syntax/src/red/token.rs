//! Positioned tokens.
//!
//! Tokens are not memoized: a `SyntaxToken` is a value built on demand from
//! its container, green token, position and slot index. Two tokens are equal
//! when all four agree, so re-fetching a token from the same tree yields an
//! equal value.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use canopy_common::{Diagnostic, TextSize, TextSpan};

use super::node::{SyntaxNode, collect_diagnostics};
use crate::annotation::SyntaxAnnotation;
use crate::green::GreenNode;
use crate::kind::SyntaxKind;
use crate::lists::SyntaxTriviaList;

#[derive(Clone)]
pub struct SyntaxToken {
    /// Raw container; may be an internal list node.
    parent: Option<SyntaxNode>,
    green: GreenNode,
    position: TextSize,
    index: u32,
}

impl SyntaxToken {
    pub(crate) fn new(parent: Option<SyntaxNode>, green: GreenNode, position: TextSize, index: usize) -> SyntaxToken {
        debug_assert!(green.is_token(), "{green:?} is not a token");
        SyntaxToken {
            parent,
            green,
            position,
            index: index as u32,
        }
    }

    /// A token outside of any tree, positioned at 0.
    ///
    /// # Panics
    ///
    /// Panics if `green` is not a token.
    #[must_use]
    pub fn detached(green: GreenNode) -> SyntaxToken {
        assert!(green.is_token(), "{green:?} is not a token");
        SyntaxToken::new(None, green, 0, 0)
    }

    #[inline]
    #[must_use]
    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> SyntaxKind {
        self.green.kind()
    }

    /// Token text without trivia.
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        self.green.token_text()
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> TextSize {
        self.position
    }

    #[inline]
    #[must_use]
    pub fn end_position(&self) -> TextSize {
        self.position + self.green.full_width()
    }

    #[inline]
    #[must_use]
    pub fn full_width(&self) -> TextSize {
        self.green.full_width()
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> TextSize {
        self.green.token_text().len() as TextSize
    }

    #[must_use]
    pub fn full_span(&self) -> TextSpan {
        TextSpan::new(self.position, self.green.full_width())
    }

    #[must_use]
    pub fn span(&self) -> TextSpan {
        TextSpan::new(self.span_start(), self.width())
    }

    #[must_use]
    pub fn span_start(&self) -> TextSize {
        self.position + self.green.leading_trivia_width()
    }

    #[inline]
    #[must_use]
    pub fn is_missing(&self) -> bool {
        self.green.is_missing()
    }

    #[must_use]
    pub fn contains_diagnostics(&self) -> bool {
        self.green.contains_diagnostics()
    }

    #[must_use]
    pub fn contains_directives(&self) -> bool {
        self.green.contains_directives()
    }

    #[must_use]
    pub fn has_structured_trivia(&self) -> bool {
        self.green.contains_structured_trivia()
    }

    /// The immediate container, which may be an internal list node.
    pub(crate) fn raw_parent(&self) -> Option<SyntaxNode> {
        self.parent.clone()
    }

    pub(crate) fn raw_parent_ref(&self) -> Option<&SyntaxNode> {
        self.parent.as_ref()
    }

    #[inline]
    pub(crate) fn index_in_parent(&self) -> usize {
        self.index as usize
    }

    /// The node containing this token; lists are skipped.
    #[must_use]
    pub fn parent(&self) -> Option<SyntaxNode> {
        let parent = self.parent.as_ref()?;
        if parent.is_list() { parent.raw_parent() } else { Some(parent.clone()) }
    }

    /// Ancestors of this token, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = SyntaxNode> + use<> {
        std::iter::successors(self.parent(), SyntaxNode::parent)
    }

    #[must_use]
    pub fn leading_trivia(&self) -> SyntaxTriviaList {
        SyntaxTriviaList::new(Some(self.clone()), self.green.leading_trivia().cloned(), self.position, true)
    }

    #[must_use]
    pub fn trailing_trivia(&self) -> SyntaxTriviaList {
        let trailing = self.green.trailing_trivia();
        let start = self.end_position() - trailing.map_or(0, GreenNode::full_width);
        SyntaxTriviaList::new(Some(self.clone()), trailing.cloned(), start, false)
    }

    #[must_use]
    pub fn has_leading_trivia(&self) -> bool {
        self.green.leading_trivia().is_some()
    }

    #[must_use]
    pub fn has_trailing_trivia(&self) -> bool {
        self.green.trailing_trivia().is_some()
    }

    /// Diagnostics on this token and its trivia.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        collect_diagnostics(&self.green, self.position, "", &mut out);
        out
    }

    #[must_use]
    pub fn annotations(&self) -> Arc<[SyntaxAnnotation]> {
        self.green.annotations()
    }

    #[must_use]
    pub fn has_annotation(&self, annotation: &SyntaxAnnotation) -> bool {
        self.green.has_annotation(annotation)
    }

    #[must_use]
    pub fn has_annotations_of_kind(&self, kind: &str) -> bool {
        self.green.has_annotations_of_kind(kind)
    }

    /// A detached copy of this token with `annotations` added.
    #[must_use]
    pub fn with_additional_annotations<I>(&self, annotations: I) -> SyntaxToken
    where
        I: IntoIterator<Item = SyntaxAnnotation>,
    {
        SyntaxToken::detached(self.green.with_additional_annotations(annotations))
    }

    /// A detached copy of this token without `annotations`.
    #[must_use]
    pub fn without_annotations<'a, I>(&self, annotations: I) -> SyntaxToken
    where
        I: IntoIterator<Item = &'a SyntaxAnnotation>,
    {
        SyntaxToken::detached(self.green.without_annotations(annotations))
    }

    /// A detached copy with different leading trivia.
    #[must_use]
    pub fn with_leading_trivia(&self, trivia: Option<GreenNode>) -> SyntaxToken {
        SyntaxToken::detached(self.green.with_leading_trivia(trivia))
    }

    /// A detached copy with different trailing trivia.
    #[must_use]
    pub fn with_trailing_trivia(&self, trivia: Option<GreenNode>) -> SyntaxToken {
        SyntaxToken::detached(self.green.with_trailing_trivia(trivia))
    }

    #[must_use]
    pub fn to_full_string(&self) -> String {
        self.green.to_full_string()
    }

    fn parent_identity(&self) -> usize {
        self.parent.as_ref().map_or(0, SyntaxNode::identity)
    }
}

impl PartialEq for SyntaxToken {
    fn eq(&self, other: &Self) -> bool {
        self.parent_identity() == other.parent_identity()
            && self.index == other.index
            && self.position == other.position
            && GreenNode::ptr_eq(&self.green, &other.green)
    }
}

impl Eq for SyntaxToken {}

impl Hash for SyntaxToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.parent_identity().hash(state);
        self.index.hash(state);
        self.position.hash(state);
        self.green.hash(state);
    }
}

/// Token text without trivia.
impl fmt::Display for SyntaxToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

impl fmt::Debug for SyntaxToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{} {:?}", self.kind(), self.full_span(), self.text())
    }
}
