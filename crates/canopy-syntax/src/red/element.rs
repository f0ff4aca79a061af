//! `SyntaxNodeOrToken`: an element of a child list.

use std::fmt;
use std::sync::Arc;

use canopy_common::{TextSize, TextSpan};

use super::node::SyntaxNode;
use super::token::SyntaxToken;
use crate::annotation::SyntaxAnnotation;
use crate::green::GreenNode;
use crate::kind::SyntaxKind;

#[derive(Clone, PartialEq, Eq, Hash)]
pub enum SyntaxNodeOrToken {
    Node(SyntaxNode),
    Token(SyntaxToken),
}

impl SyntaxNodeOrToken {
    /// Wrap a detached green node or token.
    #[must_use]
    pub fn detached(green: GreenNode) -> SyntaxNodeOrToken {
        if green.is_token() {
            SyntaxNodeOrToken::Token(SyntaxToken::detached(green))
        } else {
            SyntaxNodeOrToken::Node(SyntaxNode::new_root(green))
        }
    }

    #[must_use]
    pub fn green(&self) -> &GreenNode {
        match self {
            SyntaxNodeOrToken::Node(node) => node.green(),
            SyntaxNodeOrToken::Token(token) => token.green(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> SyntaxKind {
        self.green().kind()
    }

    #[must_use]
    pub fn is_node(&self) -> bool {
        matches!(self, SyntaxNodeOrToken::Node(_))
    }

    #[must_use]
    pub fn is_token(&self) -> bool {
        matches!(self, SyntaxNodeOrToken::Token(_))
    }

    #[must_use]
    pub fn as_node(&self) -> Option<&SyntaxNode> {
        match self {
            SyntaxNodeOrToken::Node(node) => Some(node),
            SyntaxNodeOrToken::Token(_) => None,
        }
    }

    #[must_use]
    pub fn as_token(&self) -> Option<&SyntaxToken> {
        match self {
            SyntaxNodeOrToken::Token(token) => Some(token),
            SyntaxNodeOrToken::Node(_) => None,
        }
    }

    #[must_use]
    pub fn into_node(self) -> Option<SyntaxNode> {
        match self {
            SyntaxNodeOrToken::Node(node) => Some(node),
            SyntaxNodeOrToken::Token(_) => None,
        }
    }

    #[must_use]
    pub fn into_token(self) -> Option<SyntaxToken> {
        match self {
            SyntaxNodeOrToken::Token(token) => Some(token),
            SyntaxNodeOrToken::Node(_) => None,
        }
    }

    #[must_use]
    pub fn position(&self) -> TextSize {
        match self {
            SyntaxNodeOrToken::Node(node) => node.position(),
            SyntaxNodeOrToken::Token(token) => token.position(),
        }
    }

    #[must_use]
    pub fn end_position(&self) -> TextSize {
        self.position() + self.green().full_width()
    }

    #[must_use]
    pub fn full_span(&self) -> TextSpan {
        TextSpan::new(self.position(), self.green().full_width())
    }

    #[must_use]
    pub fn span(&self) -> TextSpan {
        match self {
            SyntaxNodeOrToken::Node(node) => node.span(),
            SyntaxNodeOrToken::Token(token) => token.span(),
        }
    }

    #[must_use]
    pub fn full_width(&self) -> TextSize {
        self.green().full_width()
    }

    #[must_use]
    pub fn is_missing(&self) -> bool {
        self.green().is_missing()
    }

    #[must_use]
    pub fn parent(&self) -> Option<SyntaxNode> {
        match self {
            SyntaxNodeOrToken::Node(node) => node.parent(),
            SyntaxNodeOrToken::Token(token) => token.parent(),
        }
    }

    pub(crate) fn raw_parent(&self) -> Option<SyntaxNode> {
        match self {
            SyntaxNodeOrToken::Node(node) => node.raw_parent(),
            SyntaxNodeOrToken::Token(token) => token.raw_parent(),
        }
    }

    pub(crate) fn index_in_parent(&self) -> usize {
        match self {
            SyntaxNodeOrToken::Node(node) => node.index_in_parent(),
            SyntaxNodeOrToken::Token(token) => token.index_in_parent(),
        }
    }

    #[must_use]
    pub fn annotations(&self) -> Arc<[SyntaxAnnotation]> {
        self.green().annotations()
    }

    #[must_use]
    pub fn has_annotation(&self, annotation: &SyntaxAnnotation) -> bool {
        self.green().has_annotation(annotation)
    }

    /// A detached copy with `annotations` added.
    #[must_use]
    pub fn with_additional_annotations<I>(&self, annotations: I) -> SyntaxNodeOrToken
    where
        I: IntoIterator<Item = SyntaxAnnotation>,
    {
        SyntaxNodeOrToken::detached(self.green().with_additional_annotations(annotations))
    }

    #[must_use]
    pub fn to_full_string(&self) -> String {
        self.green().to_full_string()
    }

    /// The next sibling element under the same owner, skipping empty slots
    /// and stepping through lists.
    #[must_use]
    pub fn next_sibling_or_token(&self) -> Option<SyntaxNodeOrToken> {
        let parent = self.parent()?;
        let children = parent.children_with_tokens();
        let index = children.index_of(self)?;
        children.get(index + 1)
    }

    /// The previous sibling element under the same owner.
    #[must_use]
    pub fn previous_sibling_or_token(&self) -> Option<SyntaxNodeOrToken> {
        let parent = self.parent()?;
        let children = parent.children_with_tokens();
        let index = children.index_of(self)?;
        children.get(index.checked_sub(1)?)
    }
}

impl From<SyntaxNode> for SyntaxNodeOrToken {
    fn from(node: SyntaxNode) -> Self {
        SyntaxNodeOrToken::Node(node)
    }
}

impl From<SyntaxToken> for SyntaxNodeOrToken {
    fn from(token: SyntaxToken) -> Self {
        SyntaxNodeOrToken::Token(token)
    }
}

impl fmt::Display for SyntaxNodeOrToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxNodeOrToken::Node(node) => fmt::Display::fmt(node, f),
            SyntaxNodeOrToken::Token(token) => fmt::Display::fmt(token, f),
        }
    }
}

impl fmt::Debug for SyntaxNodeOrToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxNodeOrToken::Node(node) => fmt::Debug::fmt(node, f),
            SyntaxNodeOrToken::Token(token) => fmt::Debug::fmt(token, f),
        }
    }
}
