//! Positioned trivia.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use canopy_common::{TextSize, TextSpan};

use super::node::SyntaxNode;
use super::token::SyntaxToken;
use crate::annotation::SyntaxAnnotation;
use crate::green::GreenNode;
use crate::kind::{SyntaxKind, TriviaStructure};

#[derive(Clone)]
pub struct SyntaxTrivia {
    token: Option<SyntaxToken>,
    green: GreenNode,
    position: TextSize,
    /// Index within the owning token's leading or trailing trivia list.
    index: u32,
    is_leading: bool,
}

impl SyntaxTrivia {
    pub(crate) fn new(
        token: Option<SyntaxToken>,
        green: GreenNode,
        position: TextSize,
        index: usize,
        is_leading: bool,
    ) -> SyntaxTrivia {
        debug_assert!(green.is_trivia(), "{green:?} is not trivia");
        SyntaxTrivia {
            token,
            green,
            position,
            index: index as u32,
            is_leading,
        }
    }

    /// Trivia outside of any token, positioned at 0.
    ///
    /// # Panics
    ///
    /// Panics if `green` is not trivia.
    #[must_use]
    pub fn detached(green: GreenNode) -> SyntaxTrivia {
        assert!(green.is_trivia(), "{green:?} is not trivia");
        SyntaxTrivia::new(None, green, 0, 0, true)
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

    /// The token this trivia is attached to.
    #[must_use]
    pub fn token(&self) -> Option<&SyntaxToken> {
        self.token.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> TextSize {
        self.position
    }

    #[must_use]
    pub fn full_width(&self) -> TextSize {
        self.green.full_width()
    }

    /// Trivia has no trivia of its own: span and full span coincide.
    #[must_use]
    pub fn span(&self) -> TextSpan {
        TextSpan::new(self.position, self.green.full_width())
    }

    #[must_use]
    pub fn full_span(&self) -> TextSpan {
        self.span()
    }

    #[inline]
    pub(crate) fn index(&self) -> usize {
        self.index as usize
    }

    #[must_use]
    pub fn is_leading(&self) -> bool {
        self.is_leading
    }

    #[must_use]
    pub fn has_structure(&self) -> bool {
        self.green.is_structured_trivia()
    }

    #[must_use]
    pub fn structure_kind(&self) -> Option<TriviaStructure> {
        self.green.structure()
    }

    #[must_use]
    pub fn is_directive(&self) -> bool {
        self.structure_kind() == Some(TriviaStructure::Directive)
    }

    #[must_use]
    pub fn is_skipped_tokens(&self) -> bool {
        self.structure_kind() == Some(TriviaStructure::SkippedTokens)
    }

    /// The tree inside a structured trivia, rooted at a node whose
    /// `parent_trivia` is this trivia. Repeated calls return the same root
    /// as long as a handle into it is alive; detached trivia gets a new
    /// root each time.
    #[must_use]
    pub fn structure(&self) -> Option<SyntaxNode> {
        if !self.has_structure() {
            return None;
        }
        let root = match self.token.as_ref().and_then(|token| token.raw_parent_ref().map(|host| (token, host))) {
            Some((token, host)) => {
                let key = (token.index_in_parent() as u32, self.is_leading, self.index);
                host.structured_root_in(key, self)
            }
            None => SyntaxNode::new_structured_root(self.clone()),
        };
        Some(root)
    }

    /// The text of this trivia.
    #[must_use]
    pub fn text(&self) -> String {
        self.green.to_full_string()
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
    pub fn with_additional_annotations<I>(&self, annotations: I) -> SyntaxTrivia
    where
        I: IntoIterator<Item = SyntaxAnnotation>,
    {
        SyntaxTrivia::detached(self.green.with_additional_annotations(annotations))
    }
}

impl PartialEq for SyntaxTrivia {
    fn eq(&self, other: &Self) -> bool {
        self.token == other.token
            && self.index == other.index
            && self.is_leading == other.is_leading
            && self.position == other.position
            && GreenNode::ptr_eq(&self.green, &other.green)
    }
}

impl Eq for SyntaxTrivia {}

impl Hash for SyntaxTrivia {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.token.hash(state);
        self.index.hash(state);
        self.position.hash(state);
        self.green.hash(state);
    }
}

impl fmt::Display for SyntaxTrivia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

impl fmt::Debug for SyntaxTrivia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{} {:?}", self.kind(), self.span(), self.text())
    }
}
