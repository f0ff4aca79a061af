//! Builder for the green list encoding.

use super::node::GreenNode;
use crate::kind::SyntaxKind;

/// Accumulates list elements, flattening nested lists as they are added.
#[derive(Clone, Debug, Default)]
pub struct GreenListBuilder {
    nodes: Vec<GreenNode>,
}

impl GreenListBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Add an element; a list contributes each of its elements.
    pub fn add(&mut self, node: &GreenNode) -> &mut Self {
        if node.is_list() {
            self.nodes.extend(node.children().cloned());
        } else {
            self.nodes.push(node.clone());
        }
        self
    }

    pub fn add_option(&mut self, node: Option<&GreenNode>) -> &mut Self {
        if let Some(node) = node {
            self.add(node);
        }
        self
    }

    pub fn add_range<'a, I>(&mut self, nodes: I) -> &mut Self
    where
        I: IntoIterator<Item = &'a GreenNode>,
    {
        for node in nodes {
            self.add(node);
        }
        self
    }

    pub fn remove_last(&mut self) -> Option<GreenNode> {
        self.nodes.pop()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&GreenNode> {
        self.nodes.get(index)
    }

    /// Whether any element has `kind`.
    #[must_use]
    pub fn any(&self, kind: SyntaxKind) -> bool {
        self.nodes.iter().any(|node| node.kind() == kind)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[GreenNode] {
        &self.nodes
    }

    /// The list encoding of the accumulated elements.
    #[must_use]
    pub fn to_list(&self) -> Option<GreenNode> {
        GreenNode::list(self.nodes.iter().cloned())
    }

    #[must_use]
    pub fn into_list(self) -> Option<GreenNode> {
        GreenNode::list(self.nodes)
    }
}
