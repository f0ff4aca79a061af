//! All children of a node, with list slots flattened.
//!
//! A node's slots are empty, hold a single element, or hold a list. Logical
//! child `i` is found by walking slots and counting each slot's *occupancy*
//! (0 for an empty slot, the element count for a list, 1 otherwise). The walk
//! state is a `SlotCursor`; iterators keep theirs between steps so a full
//! scan costs one pass over the slots.

use std::iter::FusedIterator;

use canopy_common::{TextSize, TextSpan};

use crate::green::GreenNode;
use crate::red::{SyntaxNode, SyntaxNodeOrToken, SyntaxToken};

/// Position of a slot walk: the slot, how many logical children precede it,
/// and its absolute start.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SlotCursor {
    pub slot_index: usize,
    pub preceding_occupancy: usize,
    pub position_at_slot: TextSize,
}

#[inline]
fn occupancy(slot: Option<&GreenNode>) -> usize {
    match slot {
        None => 0,
        Some(green) if green.is_list() => green.slot_count(),
        Some(_) => 1,
    }
}

#[inline]
fn slot_width(slot: Option<&GreenNode>) -> TextSize {
    slot.map_or(0, GreenNode::full_width)
}

/// Children of a node, lists flattened, in source order.
#[derive(Clone)]
pub struct ChildSyntaxList {
    node: SyntaxNode,
    count: usize,
}

impl ChildSyntaxList {
    #[must_use]
    pub fn new(node: SyntaxNode) -> Self {
        let count = node.green().slots().map(occupancy).sum();
        ChildSyntaxList { node, count }
    }

    #[must_use]
    pub fn node(&self) -> &SyntaxNode {
        &self.node
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Cursor at the first slot.
    #[must_use]
    pub fn start_cursor(&self) -> SlotCursor {
        SlotCursor {
            slot_index: 0,
            preceding_occupancy: 0,
            position_at_slot: self.node.position(),
        }
    }

    /// Cursor one past the last slot.
    #[must_use]
    pub fn end_cursor(&self) -> SlotCursor {
        SlotCursor {
            slot_index: self.node.green().slot_count(),
            preceding_occupancy: self.count,
            position_at_slot: self.node.end_position(),
        }
    }

    /// Cursor at the slot holding logical child `index`, starting the walk
    /// from `hint`. Moves left when the hint is past `index`, then right.
    ///
    /// # Panics
    ///
    /// Panics when `index >= len()`.
    #[must_use]
    pub fn seek(&self, index: usize, hint: SlotCursor) -> SlotCursor {
        assert!(index < self.count, "child index {index} out of range ({})", self.count);
        let green = self.node.green();
        let mut cursor = hint;
        while cursor.slot_index > 0 && cursor.preceding_occupancy > index {
            cursor.slot_index -= 1;
            let slot = green.slot(cursor.slot_index);
            cursor.preceding_occupancy -= occupancy(slot);
            cursor.position_at_slot -= slot_width(slot);
        }
        loop {
            let slot = green.slot(cursor.slot_index);
            let occupied = occupancy(slot);
            if index < cursor.preceding_occupancy + occupied {
                return cursor;
            }
            cursor.preceding_occupancy += occupied;
            cursor.position_at_slot += slot_width(slot);
            cursor.slot_index += 1;
        }
    }

    /// Logical child `index`, found through the slot walk from `cursor`.
    fn element_at(&self, index: usize, cursor: SlotCursor) -> Option<SyntaxNodeOrToken> {
        let slot = self.node.green().slot(cursor.slot_index)?;
        if slot.is_list() {
            let list = self.node.node_slot(cursor.slot_index)?;
            return list.list_element(index - cursor.preceding_occupancy);
        }
        if slot.is_token() {
            return Some(SyntaxNodeOrToken::Token(SyntaxToken::new(
                Some(self.node.clone()),
                slot.clone(),
                cursor.position_at_slot,
                cursor.slot_index,
            )));
        }
        self.node.node_slot(cursor.slot_index).map(SyntaxNodeOrToken::Node)
    }

    /// Logical child `index`; `None` when out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<SyntaxNodeOrToken> {
        if index >= self.count {
            return None;
        }
        let cursor = self.seek(index, self.start_cursor());
        self.element_at(index, cursor)
    }

    #[must_use]
    pub fn first(&self) -> Option<SyntaxNodeOrToken> {
        self.get(0)
    }

    #[must_use]
    pub fn last(&self) -> Option<SyntaxNodeOrToken> {
        let index = self.count.checked_sub(1)?;
        let cursor = self.seek(index, self.end_cursor());
        self.element_at(index, cursor)
    }

    /// Logical index of `element` among these children.
    #[must_use]
    pub fn index_of(&self, element: &SyntaxNodeOrToken) -> Option<usize> {
        let container = element.raw_parent()?;
        if container.is_list() {
            let owner = container.raw_parent()?;
            return self.logical_index(&owner, container.index_in_parent(), element.index_in_parent());
        }
        self.logical_index(&container, element.index_in_parent(), 0)
    }

    fn logical_index(&self, container: &SyntaxNode, slot: usize, offset: usize) -> Option<usize> {
        if !SyntaxNode::ptr_eq(container, &self.node) {
            return None;
        }
        let preceding: usize = self.node.green().slots().take(slot).map(occupancy).sum();
        Some(preceding + offset)
    }

    /// The child whose full span contains `position`, descending into list
    /// slots.
    #[must_use]
    pub fn child_that_contains_position(&self, position: TextSize) -> Option<SyntaxNodeOrToken> {
        match self.node.raw_child_containing(position)? {
            SyntaxNodeOrToken::Node(list) if list.is_list() => list.raw_child_containing(position),
            element => Some(element),
        }
    }

    #[must_use]
    pub fn full_span(&self) -> TextSpan {
        self.node.full_span()
    }

    #[must_use]
    pub fn iter(&self) -> ChildIter {
        ChildIter {
            front: 0,
            back: self.count,
            front_cursor: self.start_cursor(),
            back_cursor: self.end_cursor(),
            list: self.clone(),
        }
    }

    /// Children in reverse order.
    pub fn reversed(&self) -> std::iter::Rev<ChildIter> {
        self.iter().rev()
    }
}

impl IntoIterator for ChildSyntaxList {
    type Item = SyntaxNodeOrToken;
    type IntoIter = ChildIter;

    fn into_iter(self) -> ChildIter {
        self.iter()
    }
}

impl IntoIterator for &ChildSyntaxList {
    type Item = SyntaxNodeOrToken;
    type IntoIter = ChildIter;

    fn into_iter(self) -> ChildIter {
        self.iter()
    }
}

/// Double-ended iterator over a `ChildSyntaxList`, keeping a slot cursor at
/// each end.
#[derive(Clone)]
pub struct ChildIter {
    list: ChildSyntaxList,
    front: usize,
    back: usize,
    front_cursor: SlotCursor,
    back_cursor: SlotCursor,
}

impl Iterator for ChildIter {
    type Item = SyntaxNodeOrToken;

    fn next(&mut self) -> Option<SyntaxNodeOrToken> {
        if self.front >= self.back {
            return None;
        }
        let index = self.front;
        self.front_cursor = self.list.seek(index, self.front_cursor);
        self.front += 1;
        self.list.element_at(index, self.front_cursor)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for ChildIter {
    fn next_back(&mut self) -> Option<SyntaxNodeOrToken> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        let index = self.back;
        self.back_cursor = self.list.seek(index, self.back_cursor);
        self.list.element_at(index, self.back_cursor)
    }
}

impl ExactSizeIterator for ChildIter {}

impl FusedIterator for ChildIter {}

// =============================================================================
// Child access on SyntaxNode
// =============================================================================

impl SyntaxNode {
    /// All children, tokens included, with list slots flattened.
    #[must_use]
    pub fn children_with_tokens(&self) -> ChildSyntaxList {
        ChildSyntaxList::new(self.clone())
    }

    /// Child nodes, with list slots flattened.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = SyntaxNode> + use<> {
        self.children_with_tokens()
            .into_iter()
            .filter_map(SyntaxNodeOrToken::into_node)
    }

    #[must_use]
    pub fn first_child_or_token(&self) -> Option<SyntaxNodeOrToken> {
        self.children_with_tokens().first()
    }

    #[must_use]
    pub fn last_child_or_token(&self) -> Option<SyntaxNodeOrToken> {
        self.children_with_tokens().last()
    }

    /// The child (node or token) whose full span contains `position`.
    ///
    /// # Panics
    ///
    /// Panics when `position` is outside this node's full span.
    #[must_use]
    pub fn child_that_contains_position(&self, position: TextSize) -> SyntaxNodeOrToken {
        assert!(
            self.full_span().contains(position),
            "position {position} outside {:?}",
            self
        );
        match self.children_with_tokens().child_that_contains_position(position) {
            Some(child) => child,
            None => unreachable!("a non-empty full span always has a child at each position"),
        }
    }

    /// Next sibling node under the same owner.
    #[must_use]
    pub fn next_sibling(&self) -> Option<SyntaxNode> {
        let element = SyntaxNodeOrToken::Node(self.clone());
        let parent = self.parent()?;
        let children = parent.children_with_tokens();
        let index = children.index_of(&element)?;
        children.iter().skip(index + 1).find_map(SyntaxNodeOrToken::into_node)
    }

    /// Previous sibling node under the same owner.
    #[must_use]
    pub fn previous_sibling(&self) -> Option<SyntaxNode> {
        let element = SyntaxNodeOrToken::Node(self.clone());
        let parent = self.parent()?;
        let children = parent.children_with_tokens();
        let index = children.index_of(&element)?;
        children.iter().take(index).rev().find_map(SyntaxNodeOrToken::into_node)
    }
}
