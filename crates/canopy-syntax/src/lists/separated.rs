//! `SeparatedSyntaxList`: nodes alternating with separator tokens.
//!
//! The raw list holds `node (separator node)* separator?`: even raw indices
//! are nodes and odd raw indices are separators. A trailing separator is
//! allowed. Every edit keeps the alternation, synthesizing or dropping
//! separators as needed.
//!
//! Synthesized separators copy the kind and text of an existing separator (or
//! of the template set with `with_separator_template`), carry no trivia, and
//! are marked with the elastic annotation so a formatter may space them.

use std::fmt;

use canopy_common::TextSpan;
use tracing::trace;

use super::node_or_token_list::SyntaxNodeOrTokenList;
use super::{ListHost, missing_item};
use crate::annotation::SyntaxAnnotation;
use crate::error::EditError;
use crate::green::GreenNode;
use crate::red::{SyntaxNode, SyntaxNodeOrToken, SyntaxToken};

#[derive(Clone, Default)]
pub struct SeparatedSyntaxList {
    host: ListHost,
    separator_template: Option<GreenNode>,
}

/// Whether a separator's trailing trivia holds a line break or a line
/// comment, binding it to the element before it.
fn keep_separator_with_previous(separator: &GreenNode) -> bool {
    let Some(trailing) = separator.trailing_trivia() else {
        return false;
    };
    let trivia: Vec<&GreenNode> = if trailing.is_list() {
        trailing.children().collect()
    } else {
        vec![trailing]
    };
    trivia.into_iter().any(|trivia| trivia.kind().ends_line())
}

impl SeparatedSyntaxList {
    pub(crate) fn from_host(host: ListHost) -> Self {
        SeparatedSyntaxList {
            host,
            separator_template: None,
        }
    }

    /// A detached list from raw alternating elements.
    ///
    /// # Panics
    ///
    /// Panics (in debug builds) when the elements do not alternate node,
    /// separator, node, ...
    #[must_use]
    pub fn from_greens<'a, I>(elements: I) -> Self
    where
        I: IntoIterator<Item = &'a GreenNode>,
    {
        let host = ListHost::from_greens(elements);
        debug_assert!(
            host.greens()
                .iter()
                .enumerate()
                .all(|(index, green)| green.is_token() == (index % 2 == 1)),
            "separated list elements must alternate node and separator"
        );
        SeparatedSyntaxList::from_host(host)
    }

    /// The same list, using `separator` as the model for synthesized
    /// separators when the list has none of its own.
    #[must_use]
    pub fn with_separator_template(mut self, separator: GreenNode) -> Self {
        debug_assert!(separator.is_token());
        self.separator_template = Some(separator);
        self
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.host.len().div_ceil(2)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.host.len() == 0
    }

    #[must_use]
    pub fn separator_count(&self) -> usize {
        self.host.len() / 2
    }

    /// Node `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<SyntaxNode> {
        self.host.get(index * 2).and_then(SyntaxNodeOrToken::into_node)
    }

    /// Separator `index` (the one following node `index`).
    #[must_use]
    pub fn separator(&self, index: usize) -> Option<SyntaxToken> {
        self.host.get(index * 2 + 1).and_then(SyntaxNodeOrToken::into_token)
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
            None => unreachable!("separated list element {index} is not a node"),
        })
    }

    pub fn separators(&self) -> impl DoubleEndedIterator<Item = SyntaxToken> + ExactSizeIterator + '_ {
        (0..self.separator_count()).map(|index| match self.separator(index) {
            Some(token) => token,
            None => unreachable!("separated list separator {index} is not a token"),
        })
    }

    /// Nodes and separators in raw order.
    #[must_use]
    pub fn with_separators(&self) -> SyntaxNodeOrTokenList {
        SyntaxNodeOrTokenList::from_host(self.host.clone())
    }

    /// Index of `node` among the nodes.
    #[must_use]
    pub fn index_of(&self, node: &SyntaxNode) -> Option<usize> {
        let raw = self.host.index_of(&SyntaxNodeOrToken::Node(node.clone()))?;
        (raw % 2 == 0).then_some(raw / 2)
    }

    #[must_use]
    pub fn separator_index_of(&self, separator: &SyntaxToken) -> Option<usize> {
        let raw = self.host.index_of(&SyntaxNodeOrToken::Token(separator.clone()))?;
        (raw % 2 == 1).then_some(raw / 2)
    }

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

    fn from_raw(&self, raw: Vec<GreenNode>) -> Self {
        SeparatedSyntaxList {
            host: ListHost::from_greens(&raw),
            separator_template: self.separator_template.clone(),
        }
    }

    /// A fresh separator modelled on the list's first separator or template.
    fn create_separator(&self) -> Result<GreenNode, EditError> {
        let model = self
            .host
            .green_at(1)
            .cloned()
            .or_else(|| self.separator_template.clone())
            .ok_or(EditError::MissingSeparatorTemplate)?;
        Ok(GreenNode::token(model.kind(), model.token_text(), None, None)
            .with_additional_annotations([SyntaxAnnotation::elastic()]))
    }

    // =========================================================================
    // Edits (each returns a new, detached list)
    // =========================================================================

    pub fn add(&self, node: GreenNode) -> Result<Self, EditError> {
        self.insert(self.len(), node)
    }

    pub fn add_range(&self, nodes: Vec<GreenNode>) -> Result<Self, EditError> {
        self.insert_range(self.len(), nodes)
    }

    pub fn insert(&self, index: usize, node: GreenNode) -> Result<Self, EditError> {
        self.insert_range(index, vec![node])
    }

    /// Insert `nodes` before node `index`, adding separators between the new
    /// nodes and their neighbours.
    ///
    /// When the separator in front of the insertion point does not end its
    /// line, the new nodes go in front of that separator, so it stays
    /// attached to the node it follows in the source.
    ///
    /// # Panics
    ///
    /// Panics when `index > len()`.
    pub fn insert_range(&self, index: usize, nodes: Vec<GreenNode>) -> Result<Self, EditError> {
        assert!(index <= self.len(), "insert index {index} out of range ({})", self.len());
        debug_assert!(nodes.iter().all(|node| !node.is_token()));
        let raw = self.host.greens();
        let mut insertion = if index < self.len() { index * 2 } else { raw.len() };

        if insertion > 0 && insertion < raw.len() {
            let previous = &raw[insertion - 1];
            if previous.is_token() && !keep_separator_with_previous(previous) {
                insertion -= 1;
            }
        }

        let mut inserted = Vec::with_capacity(nodes.len() * 2 + 1);
        for node in nodes {
            if !inserted.is_empty() || (insertion > 0 && !raw[insertion - 1].is_token()) {
                inserted.push(self.create_separator()?);
            }
            inserted.push(node);
        }
        if insertion < raw.len() && !raw[insertion].is_token() && !inserted.is_empty() {
            inserted.push(self.create_separator()?);
        }
        trace!(index, insertion, added = inserted.len(), "separated list insert");

        let mut result = raw;
        result.splice(insertion..insertion, inserted);
        Ok(self.from_raw(result))
    }

    /// Remove node `index` with the separator after it (or, for the last
    /// node, the separator before it).
    ///
    /// # Panics
    ///
    /// Panics when `index >= len()`.
    #[must_use]
    pub fn remove_at(&self, index: usize) -> Self {
        assert!(index < self.len(), "remove index {index} out of range ({})", self.len());
        let mut raw = self.host.greens();
        let node_index = index * 2;
        let has_separator_after = index < self.separator_count();
        raw.remove(node_index);
        if has_separator_after {
            raw.remove(node_index);
        } else if index > 0 {
            raw.remove(node_index - 1);
        }
        self.from_raw(raw)
    }

    pub fn remove(&self, node: &SyntaxNode) -> Result<Self, EditError> {
        let index = self.require(node)?;
        Ok(self.remove_at(index))
    }

    /// Replace `node` by `replacement`, keeping separators.
    pub fn replace(&self, node: &SyntaxNode, replacement: GreenNode) -> Result<Self, EditError> {
        debug_assert!(!replacement.is_token());
        let index = self.require(node)?;
        let mut raw = self.host.greens();
        raw[index * 2] = replacement;
        Ok(self.from_raw(raw))
    }

    /// Replace `node` by `replacements` (possibly none), adjusting
    /// separators.
    pub fn replace_range(&self, node: &SyntaxNode, replacements: Vec<GreenNode>) -> Result<Self, EditError> {
        let index = self.require(node)?;
        if replacements.is_empty() {
            return Ok(self.remove_at(index));
        }
        self.remove_at(index).insert_range_keeping_template(index, replacements, self)
    }

    fn insert_range_keeping_template(
        mut self,
        index: usize,
        nodes: Vec<GreenNode>,
        original: &SeparatedSyntaxList,
    ) -> Result<Self, EditError> {
        if self.separator_template.is_none() {
            self.separator_template = original.host.green_at(1).cloned();
        }
        self.insert_range(index, nodes)
    }

    /// Replace a separator by a token of the same kind.
    pub fn replace_separator(&self, separator: &SyntaxToken, replacement: GreenNode) -> Result<Self, EditError> {
        let index = self
            .separator_index_of(separator)
            .ok_or_else(|| missing_item(&SyntaxNodeOrToken::Token(separator.clone())))?;
        if replacement.kind() != separator.kind() {
            return Err(EditError::SeparatorKindMismatch {
                expected: separator.kind(),
                found: replacement.kind(),
            });
        }
        let mut raw = self.host.greens();
        raw[index * 2 + 1] = replacement;
        Ok(self.from_raw(raw))
    }

    fn require(&self, node: &SyntaxNode) -> Result<usize, EditError> {
        self.index_of(node)
            .ok_or_else(|| missing_item(&SyntaxNodeOrToken::Node(node.clone())))
    }
}

impl fmt::Debug for SeparatedSyntaxList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.with_separators().iter()).finish()
    }
}
