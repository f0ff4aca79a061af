//! `SyntaxNodeList`: a list slot holding nodes only.

use std::fmt;

use canopy_common::TextSpan;

use super::{ListHost, missing_item};
use crate::error::EditError;
use crate::green::GreenNode;
use crate::kind::SyntaxKind;
use crate::red::{SyntaxNode, SyntaxNodeOrToken};

#[derive(Clone, Default)]
pub struct SyntaxNodeList {
    host: ListHost,
}

impl SyntaxNodeList {
    pub(crate) fn from_host(host: ListHost) -> Self {
        SyntaxNodeList { host }
    }

    /// A detached list of `nodes`.
    #[must_use]
    pub fn from_greens<'a, I>(nodes: I) -> Self
    where
        I: IntoIterator<Item = &'a GreenNode>,
    {
        let host = ListHost::from_greens(nodes);
        debug_assert!(host.greens().iter().all(|green| !green.is_token()));
        SyntaxNodeList { host }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.host.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.host.len() == 0
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<SyntaxNode> {
        self.host.get(index).and_then(SyntaxNodeOrToken::into_node)
    }

    #[must_use]
    pub fn first(&self) -> Option<SyntaxNode> {
        self.get(0)
    }

    #[must_use]
    pub fn last(&self) -> Option<SyntaxNode> {
        self.get(self.len().checked_sub(1)?)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = SyntaxNode> + ExactSizeIterator + '_ {
        (0..self.len()).map(|index| match self.get(index) {
            Some(node) => node,
            None => unreachable!("node list element {index} is not a node"),
        })
    }

    #[must_use]
    pub fn index_of(&self, node: &SyntaxNode) -> Option<usize> {
        self.host.index_of(&SyntaxNodeOrToken::Node(node.clone()))
    }

    /// Index of the first element of `kind`.
    #[must_use]
    pub fn index_of_kind(&self, kind: SyntaxKind) -> Option<usize> {
        (0..self.len()).find(|&index| self.host.green_at(index).is_some_and(|green| green.kind() == kind))
    }

    #[must_use]
    pub fn any(&self, kind: SyntaxKind) -> bool {
        self.index_of_kind(kind).is_some()
    }

    /// The green encoding of the list (`None` when empty).
    #[must_use]
    pub fn green(&self) -> Option<&GreenNode> {
        self.host.green()
    }

    #[must_use]
    pub fn full_span(&self) -> TextSpan {
        self.host.full_span()
    }

    #[must_use]
    pub fn span(&self) -> TextSpan {
        self.host.span()
    }

    #[must_use]
    pub fn to_full_string(&self) -> String {
        self.host.to_full_string()
    }

    // =========================================================================
    // Edits (each returns a new, detached list)
    // =========================================================================

    #[must_use]
    pub fn add(&self, node: GreenNode) -> Self {
        self.insert(self.len(), node)
    }

    #[must_use]
    pub fn add_range(&self, nodes: Vec<GreenNode>) -> Self {
        self.insert_range(self.len(), nodes)
    }

    #[must_use]
    pub fn insert(&self, index: usize, node: GreenNode) -> Self {
        self.insert_range(index, vec![node])
    }

    /// # Panics
    ///
    /// Panics when `index > len()`.
    #[must_use]
    pub fn insert_range(&self, index: usize, nodes: Vec<GreenNode>) -> Self {
        debug_assert!(nodes.iter().all(|node| !node.is_token()));
        SyntaxNodeList::from_host(self.host.inserted(index, nodes))
    }

    /// # Panics
    ///
    /// Panics when `index >= len()`.
    #[must_use]
    pub fn remove_at(&self, index: usize) -> Self {
        SyntaxNodeList::from_host(self.host.removed_at(index))
    }

    pub fn remove(&self, node: &SyntaxNode) -> Result<Self, EditError> {
        let index = self.require(node)?;
        Ok(self.remove_at(index))
    }

    pub fn replace(&self, node: &SyntaxNode, replacement: GreenNode) -> Result<Self, EditError> {
        self.replace_range(node, vec![replacement])
    }

    pub fn replace_range(&self, node: &SyntaxNode, replacements: Vec<GreenNode>) -> Result<Self, EditError> {
        let index = self.require(node)?;
        Ok(SyntaxNodeList::from_host(self.host.replaced_at(index, replacements)))
    }

    fn require(&self, node: &SyntaxNode) -> Result<usize, EditError> {
        self.index_of(node)
            .ok_or_else(|| missing_item(&SyntaxNodeOrToken::Node(node.clone())))
    }
}

impl fmt::Debug for SyntaxNodeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
