//! List views over positioned nodes.
//!
//! A list slot of a node holds either nothing, a single element, or a list
//! node (singleton elision: one element is stored without a list wrapper).
//! Every list view here reads the slot through `ListHost`, which hides that
//! three-way shape.
//!
//! - `child`: `ChildSyntaxList`, all children of a node with list slots
//!   flattened, and `SlotCursor` indexing
//! - `node_list`, `node_or_token_list`, `token_list`, `trivia_list`: homogeneous
//!   list views with immutable edit operations
//! - `separated`: `SeparatedSyntaxList`, nodes alternating with separators
//! - `builder`: incremental list builders

pub mod builder;
pub mod child;
pub mod node_list;
pub mod node_or_token_list;
pub mod separated;
pub mod token_list;
pub mod trivia_list;

pub use builder::{SeparatedSyntaxListBuilder, SyntaxListBuilder};
pub use child::{ChildIter, ChildSyntaxList, SlotCursor};
pub use node_list::SyntaxNodeList;
pub use node_or_token_list::SyntaxNodeOrTokenList;
pub use separated::SeparatedSyntaxList;
pub use token_list::SyntaxTokenList;
pub use trivia_list::SyntaxTriviaList;

use canopy_common::{TextSize, TextSpan};

use crate::green::{GreenListBuilder, GreenNode};
use crate::red::{SyntaxNode, SyntaxNodeOrToken, SyntaxToken};

// =============================================================================
// ListHost
// =============================================================================

/// The three shapes a list slot can take.
#[derive(Clone, Default)]
pub(crate) enum ListHost {
    #[default]
    Empty,
    Single(SyntaxNodeOrToken),
    Many(SyntaxNode),
}

impl ListHost {
    /// The list stored in `slot` of `owner`.
    pub(crate) fn from_slot(owner: &SyntaxNode, slot: usize) -> ListHost {
        match owner.green().slot(slot) {
            None => ListHost::Empty,
            Some(green) if green.is_list() => owner.node_slot(slot).map_or(ListHost::Empty, ListHost::Many),
            Some(_) => owner.child_element(slot).map_or(ListHost::Empty, ListHost::Single),
        }
    }

    /// A list outside of any tree.
    pub(crate) fn detached(green: Option<GreenNode>) -> ListHost {
        match green {
            None => ListHost::Empty,
            Some(green) if green.is_list() => ListHost::Many(SyntaxNode::new_root(green)),
            Some(green) => ListHost::Single(SyntaxNodeOrToken::detached(green)),
        }
    }

    /// A detached list of `elements`, flattened through the list builder.
    pub(crate) fn from_greens<'a, I>(elements: I) -> ListHost
    where
        I: IntoIterator<Item = &'a GreenNode>,
    {
        let mut builder = GreenListBuilder::new();
        builder.add_range(elements);
        ListHost::detached(builder.into_list())
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            ListHost::Empty => 0,
            ListHost::Single(_) => 1,
            ListHost::Many(list) => list.green().slot_count(),
        }
    }

    /// The green encoding of the whole list.
    pub(crate) fn green(&self) -> Option<&GreenNode> {
        match self {
            ListHost::Empty => None,
            ListHost::Single(element) => Some(element.green()),
            ListHost::Many(list) => Some(list.green()),
        }
    }

    /// Green of element `index`.
    pub(crate) fn green_at(&self, index: usize) -> Option<&GreenNode> {
        match self {
            ListHost::Empty => None,
            ListHost::Single(element) => (index == 0).then(|| element.green()),
            ListHost::Many(list) => {
                (index < list.green().slot_count()).then(|| list.green().slot(index)).flatten()
            }
        }
    }

    /// Green elements in order.
    pub(crate) fn greens(&self) -> Vec<GreenNode> {
        (0..self.len()).filter_map(|index| self.green_at(index).cloned()).collect()
    }

    pub(crate) fn get(&self, index: usize) -> Option<SyntaxNodeOrToken> {
        match self {
            ListHost::Empty => None,
            ListHost::Single(element) => (index == 0).then(|| element.clone()),
            ListHost::Many(list) => list.list_element(index),
        }
    }

    pub(crate) fn position(&self) -> TextSize {
        match self {
            ListHost::Empty => 0,
            ListHost::Single(element) => element.position(),
            ListHost::Many(list) => list.position(),
        }
    }

    pub(crate) fn full_span(&self) -> TextSpan {
        TextSpan::new(self.position(), self.green().map_or(0, GreenNode::full_width))
    }

    pub(crate) fn span(&self) -> TextSpan {
        match self.green() {
            None => TextSpan::empty(self.position()),
            Some(green) => TextSpan::new(self.position() + green.leading_trivia_width(), green.width()),
        }
    }

    /// Index of `element` in this list, by positioned identity.
    pub(crate) fn index_of(&self, element: &SyntaxNodeOrToken) -> Option<usize> {
        match self {
            ListHost::Empty => None,
            ListHost::Single(single) => (single == element).then_some(0),
            ListHost::Many(list) => {
                let parent = element.raw_parent()?;
                if !SyntaxNode::ptr_eq(&parent, list) {
                    return None;
                }
                Some(element.index_in_parent())
            }
        }
    }

    pub(crate) fn to_full_string(&self) -> String {
        self.green().map(GreenNode::to_full_string).unwrap_or_default()
    }

    /// A detached list built by applying `edit` to this list's elements.
    pub(crate) fn edited(&self, edit: impl FnOnce(&mut Vec<GreenNode>)) -> ListHost {
        let mut elements = self.greens();
        edit(&mut elements);
        ListHost::from_greens(&elements)
    }

    /// Insert `items` at `index`.
    ///
    /// # Panics
    ///
    /// Panics when `index > len()`.
    pub(crate) fn inserted(&self, index: usize, items: Vec<GreenNode>) -> ListHost {
        assert!(index <= self.len(), "insert index {index} out of range ({})", self.len());
        self.edited(|elements| {
            elements.splice(index..index, items);
        })
    }

    /// Remove the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics when `index >= len()`.
    pub(crate) fn removed_at(&self, index: usize) -> ListHost {
        assert!(index < self.len(), "remove index {index} out of range ({})", self.len());
        self.edited(|elements| {
            elements.remove(index);
        })
    }

    /// Replace the element at `index` by `items`.
    pub(crate) fn replaced_at(&self, index: usize, items: Vec<GreenNode>) -> ListHost {
        assert!(index < self.len(), "replace index {index} out of range ({})", self.len());
        self.edited(|elements| {
            elements.splice(index..=index, items);
        })
    }
}

/// The `EditError` for an element a list does not contain.
pub(crate) fn missing_item(element: &SyntaxNodeOrToken) -> crate::EditError {
    crate::EditError::MissingListItem {
        kind: element.kind(),
        span: element.full_span(),
    }
}

impl SyntaxNode {
    /// Element `index` of a list node.
    ///
    /// Token positions come from the list's slot offsets, which are a table
    /// lookup for long lists.
    pub(crate) fn list_element(&self, index: usize) -> Option<SyntaxNodeOrToken> {
        let green = self.green();
        if index >= green.slot_count() {
            return None;
        }
        let element = green.slot(index)?;
        if element.is_token() {
            let position = self.position() + green.slot_offset(index);
            Some(SyntaxNodeOrToken::Token(SyntaxToken::new(
                Some(self.clone()),
                element.clone(),
                position,
                index,
            )))
        } else {
            self.node_slot(index).map(SyntaxNodeOrToken::Node)
        }
    }

    /// The node list stored in `slot`.
    #[must_use]
    pub fn node_list(&self, slot: usize) -> SyntaxNodeList {
        SyntaxNodeList::from_host(ListHost::from_slot(self, slot))
    }

    /// The token list stored in `slot`.
    #[must_use]
    pub fn token_list(&self, slot: usize) -> SyntaxTokenList {
        SyntaxTokenList::from_host(ListHost::from_slot(self, slot))
    }

    /// The mixed node-or-token list stored in `slot`.
    #[must_use]
    pub fn node_or_token_list(&self, slot: usize) -> SyntaxNodeOrTokenList {
        SyntaxNodeOrTokenList::from_host(ListHost::from_slot(self, slot))
    }

    /// The separated list stored in `slot`.
    #[must_use]
    pub fn separated_list(&self, slot: usize) -> SeparatedSyntaxList {
        SeparatedSyntaxList::from_host(ListHost::from_slot(self, slot))
    }
}
