//! Incremental builders for list views.

use super::node_list::SyntaxNodeList;
use super::node_or_token_list::SyntaxNodeOrTokenList;
use super::separated::SeparatedSyntaxList;
use super::token_list::SyntaxTokenList;
use super::trivia_list::SyntaxTriviaList;
use crate::green::{GreenListBuilder, GreenNode};

/// Accumulates elements and produces any homogeneous list view.
#[derive(Clone, Debug, Default)]
pub struct SyntaxListBuilder {
    inner: GreenListBuilder,
}

impl SyntaxListBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        SyntaxListBuilder {
            inner: GreenListBuilder::with_capacity(capacity),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Add an element; a list adds each of its elements.
    pub fn add(&mut self, element: &GreenNode) -> &mut Self {
        self.inner.add(element);
        self
    }

    pub fn add_range<'a, I>(&mut self, elements: I) -> &mut Self
    where
        I: IntoIterator<Item = &'a GreenNode>,
    {
        self.inner.add_range(elements);
        self
    }

    pub fn remove_last(&mut self) -> Option<GreenNode> {
        self.inner.remove_last()
    }

    #[must_use]
    pub fn to_node_list(&self) -> SyntaxNodeList {
        SyntaxNodeList::from_greens(self.inner.as_slice())
    }

    #[must_use]
    pub fn to_token_list(&self) -> SyntaxTokenList {
        SyntaxTokenList::from_greens(self.inner.as_slice())
    }

    #[must_use]
    pub fn to_node_or_token_list(&self) -> SyntaxNodeOrTokenList {
        SyntaxNodeOrTokenList::from_greens(self.inner.as_slice())
    }

    #[must_use]
    pub fn to_trivia_list(&self) -> SyntaxTriviaList {
        SyntaxTriviaList::from_greens(self.inner.as_slice())
    }

    /// The green encoding of the accumulated elements.
    #[must_use]
    pub fn to_green(&self) -> Option<GreenNode> {
        self.inner.to_list()
    }
}

/// Builds a `SeparatedSyntaxList`, enforcing node/separator alternation.
#[derive(Clone, Debug, Default)]
pub struct SeparatedSyntaxListBuilder {
    inner: GreenListBuilder,
    expect_separator: bool,
}

impl SeparatedSyntaxListBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of raw elements (nodes and separators).
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// # Panics
    ///
    /// Panics (in debug builds) when a separator is expected.
    pub fn add(&mut self, node: &GreenNode) -> &mut Self {
        debug_assert!(!self.expect_separator, "expected a separator, got node {node:?}");
        debug_assert!(!node.is_token());
        self.inner.add(node);
        self.expect_separator = true;
        self
    }

    /// # Panics
    ///
    /// Panics (in debug builds) when a node is expected.
    pub fn add_separator(&mut self, separator: &GreenNode) -> &mut Self {
        debug_assert!(self.expect_separator, "expected a node, got separator {separator:?}");
        debug_assert!(separator.is_token());
        self.inner.add(separator);
        self.expect_separator = false;
        self
    }

    #[must_use]
    pub fn to_list(&self) -> SeparatedSyntaxList {
        SeparatedSyntaxList::from_greens(self.inner.as_slice())
    }
}
