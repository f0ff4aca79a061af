//! Positioned (red) nodes.
//!
//! A `SyntaxNode` pairs a green node with its absolute position and a link
//! to its parent. Red nodes are created lazily, the first time a traversal
//! asks for a child, and memoized in a slot on the parent so the same
//! (parent, slot) pair always yields the same instance.
//!
//! # Ownership
//!
//! The red tree is owned root-down: a parent owns its memoized children and a
//! child only holds a weak link back to its parent. Elements of long lists
//! (`WEAK_LIST_THRESHOLD` and up) are held weakly by their list, so they can
//! be freed once nobody uses them; such an element holds a strong `anchor` to
//! the part of the tree above it instead.
//!
//! A handle carries a second `Arc`, its *keeper*: the nearest ancestor-or-self
//! that is the root or a weakly held element. The keeper owns every node
//! between itself and the handle's node, and its anchor chain owns everything
//! above, so parent links of a live handle can always be followed.
//!
//! Lists are red nodes internally (they need slots for their elements), but a
//! list is never reported as a parent: `parent()` steps over it.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

use canopy_common::limits::WEAK_LIST_THRESHOLD;
use canopy_common::{Diagnostic, TextSize, TextSpan};
use dashmap::DashMap;
use rustc_hash::FxBuildHasher;

use super::element::SyntaxNodeOrToken;
use super::slot::{OnceSlot, WeakSlot};
use super::token::SyntaxToken;
use super::trivia::SyntaxTrivia;
use super::walk::WalkOptions;
use crate::annotation::SyntaxAnnotation;
use crate::green::GreenNode;
use crate::kind::SyntaxKind;

// =============================================================================
// Node data
// =============================================================================

pub(crate) struct NodeData {
    green: GreenNode,
    position: TextSize,
    parent: Option<Weak<NodeData>>,
    /// Strong link upward, only on weakly held list elements.
    anchor: Option<Arc<NodeData>>,
    /// Slot index within the (raw) parent.
    index: u32,
    /// Owning trivia of a structured trivia root.
    parent_trivia: Option<SyntaxTrivia>,
    children: Children,
    /// Roots of structured trivia attached to tokens in this node, held
    /// weakly. Created on the first `structure()` call.
    structures: OnceSlot<DashMap<StructureKey, Weak<NodeData>, FxBuildHasher>>,
}

/// A trivia of a token in a node: (token slot, leading side, trivia index).
pub(crate) type StructureKey = (u32, bool, u32);

enum Children {
    Strong(Box<[OnceSlot<Arc<NodeData>>]>),
    Weak(Box<[WeakSlot<NodeData>]>),
}

impl Children {
    fn for_green(green: &GreenNode) -> Children {
        let count = green.slot_count();
        if green.is_list() && count >= WEAK_LIST_THRESHOLD {
            Children::Weak((0..count).map(|_| WeakSlot::new()).collect())
        } else {
            Children::Strong((0..count).map(|_| OnceSlot::new()).collect())
        }
    }
}

impl NodeData {
    fn new(
        green: GreenNode,
        position: TextSize,
        parent: Option<Weak<NodeData>>,
        anchor: Option<Arc<NodeData>>,
        index: usize,
        parent_trivia: Option<SyntaxTrivia>,
    ) -> Arc<NodeData> {
        let children = Children::for_green(&green);
        Arc::new(NodeData {
            green,
            position,
            parent,
            anchor,
            index: index as u32,
            parent_trivia,
            children,
            structures: OnceSlot::new(),
        })
    }

    /// The memoized child at `index`, if it is materialized and alive.
    fn cached_child(&self, index: usize) -> Option<Arc<NodeData>> {
        match &self.children {
            Children::Strong(slots) => slots[index].get().cloned(),
            Children::Weak(slots) => slots[index].get(),
        }
    }
}

// =============================================================================
// SyntaxNode
// =============================================================================

#[derive(Clone)]
pub struct SyntaxNode {
    data: Arc<NodeData>,
    keeper: Arc<NodeData>,
}

impl SyntaxNode {
    /// The root of a new red tree over `green`.
    ///
    /// # Panics
    ///
    /// Panics if `green` is a token or plain trivia.
    #[must_use]
    pub fn new_root(green: GreenNode) -> SyntaxNode {
        assert!(
            !green.is_token() && (green.slot_count() > 0 || !green.is_trivia()),
            "a tree root must be a node, got {green:?}"
        );
        Self::root_from_data(NodeData::new(green, 0, None, None, 0, None))
    }

    /// The root of the tree inside a structured trivia.
    pub(crate) fn new_structured_root(trivia: SyntaxTrivia) -> SyntaxNode {
        let green = trivia.green().clone();
        let position = trivia.position();
        Self::root_from_data(NodeData::new(green, position, None, None, 0, Some(trivia)))
    }

    /// The structure root of `trivia`, a trivia of a token held by `self`.
    /// While any handle into that structure is alive, the same root is
    /// returned.
    pub(crate) fn structured_root_in(&self, key: StructureKey, trivia: &SyntaxTrivia) -> SyntaxNode {
        let table = self
            .data
            .structures
            .get_or_init(|| DashMap::with_hasher(FxBuildHasher));
        let mut entry = table.entry(key).or_default();
        if let Some(live) = entry.upgrade() {
            return Self::root_from_data(live);
        }
        let fresh = NodeData::new(
            trivia.green().clone(),
            trivia.position(),
            None,
            None,
            0,
            Some(trivia.clone()),
        );
        *entry = Arc::downgrade(&fresh);
        Self::root_from_data(fresh)
    }

    fn root_from_data(data: Arc<NodeData>) -> SyntaxNode {
        SyntaxNode {
            keeper: data.clone(),
            data,
        }
    }

    /// Rebuild a handle for live node data, finding its keeper by walking up.
    pub(crate) fn from_data(data: Arc<NodeData>) -> Option<SyntaxNode> {
        let mut current = data.clone();
        loop {
            if current.anchor.is_some() || current.parent.is_none() {
                return Some(SyntaxNode {
                    data,
                    keeper: current,
                });
            }
            let parent = current.parent.as_ref()?.upgrade()?;
            current = parent;
        }
    }

    pub(crate) fn data(&self) -> &Arc<NodeData> {
        &self.data
    }

    pub(crate) fn downgrade(&self) -> Weak<NodeData> {
        Arc::downgrade(&self.data)
    }

    #[inline]
    #[must_use]
    pub fn green(&self) -> &GreenNode {
        &self.data.green
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> SyntaxKind {
        self.data.green.kind()
    }

    /// Absolute start offset, including leading trivia.
    #[inline]
    #[must_use]
    pub fn position(&self) -> TextSize {
        self.data.position
    }

    #[inline]
    #[must_use]
    pub fn end_position(&self) -> TextSize {
        self.data.position + self.data.green.full_width()
    }

    #[inline]
    #[must_use]
    pub fn full_width(&self) -> TextSize {
        self.data.green.full_width()
    }

    #[must_use]
    pub fn width(&self) -> TextSize {
        self.data.green.width()
    }

    /// Span including leading and trailing trivia.
    #[inline]
    #[must_use]
    pub fn full_span(&self) -> TextSpan {
        TextSpan::new(self.data.position, self.data.green.full_width())
    }

    /// Span without the outer leading and trailing trivia.
    #[must_use]
    pub fn span(&self) -> TextSpan {
        let green = &self.data.green;
        TextSpan::new(self.span_start(), green.width())
    }

    #[must_use]
    pub fn span_start(&self) -> TextSize {
        self.data.position + self.data.green.leading_trivia_width()
    }

    #[inline]
    #[must_use]
    pub fn is_missing(&self) -> bool {
        self.data.green.is_missing()
    }

    #[inline]
    pub(crate) fn is_list(&self) -> bool {
        self.data.green.is_list()
    }

    #[inline]
    #[must_use]
    pub fn is_structured_trivia(&self) -> bool {
        self.data.green.is_structured_trivia()
    }

    #[must_use]
    pub fn contains_diagnostics(&self) -> bool {
        self.data.green.contains_diagnostics()
    }

    #[must_use]
    pub fn contains_directives(&self) -> bool {
        self.data.green.contains_directives()
    }

    #[must_use]
    pub fn contains_skipped_text(&self) -> bool {
        self.data.green.contains_skipped_text()
    }

    #[must_use]
    pub fn contains_annotations(&self) -> bool {
        self.data.green.contains_annotations()
    }

    #[must_use]
    pub fn has_structured_trivia(&self) -> bool {
        self.data.green.contains_structured_trivia()
    }

    /// The immediate container, which may be an internal list node.
    pub(crate) fn raw_parent(&self) -> Option<SyntaxNode> {
        let parent = self.data.parent.as_ref()?.upgrade()?;
        let keeper = match &self.data.anchor {
            Some(anchor) => anchor.clone(),
            None => self.keeper.clone(),
        };
        Some(SyntaxNode {
            data: parent,
            keeper,
        })
    }

    /// Slot index within the raw parent.
    #[inline]
    pub(crate) fn index_in_parent(&self) -> usize {
        self.data.index as usize
    }

    /// The parent node. Lists are skipped: an element of a list reports the
    /// list's owner.
    #[must_use]
    pub fn parent(&self) -> Option<SyntaxNode> {
        let parent = self.raw_parent()?;
        if parent.is_list() {
            parent.raw_parent()
        } else {
            Some(parent)
        }
    }

    /// For the root of a structured trivia, the trivia that owns it.
    #[must_use]
    pub fn parent_trivia(&self) -> Option<&SyntaxTrivia> {
        self.data.parent_trivia.as_ref()
    }

    /// The parent, or for a structured trivia root the parent of the token
    /// owning the trivia.
    #[must_use]
    pub fn parent_or_structured_trivia_parent(&self) -> Option<SyntaxNode> {
        match self.parent() {
            Some(parent) => Some(parent),
            None => self.parent_trivia()?.token()?.parent(),
        }
    }

    /// Topmost ancestor, without leaving structured trivia.
    #[must_use]
    pub fn root(&self) -> SyntaxNode {
        let mut node = self.clone();
        while let Some(parent) = node.raw_parent() {
            node = parent;
        }
        node
    }

    /// Topmost ancestor, ascending out of structured trivia.
    #[must_use]
    pub fn true_root(&self) -> SyntaxNode {
        let mut node = self.root();
        while let Some(outer) = node.parent_trivia().and_then(SyntaxTrivia::token).and_then(SyntaxToken::raw_parent) {
            node = outer.root();
        }
        node
    }

    /// Ancestors, nearest first, excluding `self`.
    pub fn ancestors(&self) -> impl Iterator<Item = SyntaxNode> + use<> {
        std::iter::successors(self.parent(), SyntaxNode::parent)
    }

    /// `self` followed by its ancestors.
    pub fn ancestors_and_self(&self) -> impl Iterator<Item = SyntaxNode> + use<> {
        std::iter::successors(Some(self.clone()), SyntaxNode::parent)
    }

    /// Ancestors-or-self, continuing out of structured trivia.
    pub fn ancestors_and_self_through_trivia(&self) -> impl Iterator<Item = SyntaxNode> + use<> {
        std::iter::successors(Some(self.clone()), SyntaxNode::parent_or_structured_trivia_parent)
    }

    /// Nearest ancestor-or-self matching `predicate`, ascending out of trivia.
    #[must_use]
    pub fn first_ancestor_or_self(&self, predicate: impl Fn(&SyntaxNode) -> bool) -> Option<SyntaxNode> {
        self.ancestors_and_self_through_trivia().find(|node| predicate(node))
    }

    /// Whether `self` lies inside `ancestor` (or is it), looking through
    /// structured trivia.
    #[must_use]
    pub fn is_descendant_of(&self, ancestor: &SyntaxNode) -> bool {
        let mut current = Some(self.clone());
        while let Some(node) = current {
            if SyntaxNode::ptr_eq(&node, ancestor) {
                return true;
            }
            current = match node.raw_parent() {
                Some(parent) => Some(parent),
                None => node.parent_trivia().and_then(SyntaxTrivia::token).and_then(SyntaxToken::raw_parent),
            };
        }
        false
    }

    #[inline]
    #[must_use]
    pub fn ptr_eq(a: &SyntaxNode, b: &SyntaxNode) -> bool {
        Arc::ptr_eq(&a.data, &b.data)
    }

    /// Address-based identity of this red node.
    #[inline]
    #[must_use]
    pub fn identity(&self) -> usize {
        Arc::as_ptr(&self.data) as usize
    }

    #[must_use]
    pub fn to_full_string(&self) -> String {
        self.data.green.to_full_string()
    }

    pub fn write_to(&self, out: &mut String, leading: bool, trailing: bool) {
        self.data.green.write_to(out, leading, trailing);
    }
}

// =============================================================================
// Child materialization
// =============================================================================

impl SyntaxNode {
    /// The red node for slot `index`, materializing and memoizing it on first
    /// use. `None` for empty slots and token slots.
    pub(crate) fn node_slot(&self, index: usize) -> Option<SyntaxNode> {
        let green = self.data.green.slot(index)?;
        if green.is_token() {
            return None;
        }
        Some(match &self.data.children {
            Children::Strong(slots) => {
                let data = slots[index]
                    .get_or_init(|| self.create_child(index, green, false))
                    .clone();
                SyntaxNode {
                    data,
                    keeper: self.keeper.clone(),
                }
            }
            Children::Weak(slots) => {
                let data = slots[index].get_or_init(|| self.create_child(index, green, true));
                SyntaxNode {
                    keeper: data.clone(),
                    data,
                }
            }
        })
    }

    fn create_child(&self, index: usize, green: &GreenNode, weakly_held: bool) -> Arc<NodeData> {
        NodeData::new(
            green.clone(),
            self.child_position(index),
            Some(Arc::downgrade(&self.data)),
            weakly_held.then(|| self.keeper.clone()),
            index,
            None,
        )
    }

    /// Absolute position of slot `index`.
    ///
    /// Scans preceding slots right to left and stops at the first sibling
    /// that is already materialized, using its end position.
    pub(crate) fn child_position(&self, index: usize) -> TextSize {
        let green = &self.data.green;
        if green.has_offset_table() {
            return self.data.position + green.slot_offset(index);
        }
        let mut offset = 0;
        let mut slot = index;
        while slot > 0 {
            slot -= 1;
            let Some(sibling) = green.slot(slot) else {
                continue;
            };
            if let Some(cached) = self.data.cached_child(slot) {
                return cached.position + cached.green.full_width() + offset;
            }
            offset += sibling.full_width();
        }
        self.data.position + offset
    }

    /// Node or token in raw slot `index` (a list slot yields the list node).
    pub(crate) fn child_element(&self, index: usize) -> Option<SyntaxNodeOrToken> {
        let green = self.data.green.slot(index)?;
        if green.is_token() {
            Some(SyntaxNodeOrToken::Token(SyntaxToken::new(
                Some(self.clone()),
                green.clone(),
                self.child_position(index),
                index,
            )))
        } else {
            self.node_slot(index).map(SyntaxNodeOrToken::Node)
        }
    }

    /// Raw child whose full span contains `position`.
    pub(crate) fn raw_child_containing(&self, position: TextSize) -> Option<SyntaxNodeOrToken> {
        if !self.full_span().contains(position) {
            return None;
        }
        let index = self
            .data
            .green
            .find_slot_index_containing_offset(position - self.data.position);
        self.child_element(index)
    }
}

// =============================================================================
// Diagnostics
// =============================================================================

impl SyntaxNode {
    /// All diagnostics in this subtree, positioned absolutely and sorted by
    /// start. Diagnostics on tokens and trivia are included.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics_in_file("")
    }

    /// Like `diagnostics`, reporting `file` as the location.
    #[must_use]
    pub fn diagnostics_in_file(&self, file: &str) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        collect_diagnostics(&self.data.green, self.data.position, file, &mut out);
        out
    }
}

pub(crate) fn collect_diagnostics(green: &GreenNode, position: TextSize, file: &str, out: &mut Vec<Diagnostic>) {
    let mut stack: Vec<(&GreenNode, TextSize)> = vec![(green, position)];
    while let Some((node, start)) = stack.pop() {
        if !node.contains_diagnostics() {
            continue;
        }
        let span_start = start + node.leading_trivia_width();
        out.extend(node.diagnostics().iter().map(|info| info.resolve(file, span_start)));
        if node.is_token() {
            if let Some(leading) = node.leading_trivia() {
                stack.push((leading, start));
            }
            if let Some(trailing) = node.trailing_trivia() {
                stack.push((trailing, start + node.full_width() - trailing.full_width()));
            }
        } else if node.slot_count() > 0 {
            let mut offset = start;
            for child in node.children() {
                stack.push((child, offset));
                offset += child.full_width();
            }
        }
    }
    out.sort_by_key(|diagnostic| diagnostic.start);
}

// =============================================================================
// Annotations
// =============================================================================

impl SyntaxNode {
    #[must_use]
    pub fn annotations(&self) -> Arc<[SyntaxAnnotation]> {
        self.data.green.annotations()
    }

    #[must_use]
    pub fn has_annotation(&self, annotation: &SyntaxAnnotation) -> bool {
        self.data.green.has_annotation(annotation)
    }

    #[must_use]
    pub fn has_annotations_of_kind(&self, kind: &str) -> bool {
        self.data.green.has_annotations_of_kind(kind)
    }

    /// A detached copy of this node with `annotations` added.
    #[must_use]
    pub fn with_additional_annotations<I>(&self, annotations: I) -> SyntaxNode
    where
        I: IntoIterator<Item = SyntaxAnnotation>,
    {
        SyntaxNode::new_root(self.data.green.with_additional_annotations(annotations))
    }

    /// A detached copy of this node without `annotations`.
    #[must_use]
    pub fn without_annotations<'a, I>(&self, annotations: I) -> SyntaxNode
    where
        I: IntoIterator<Item = &'a SyntaxAnnotation>,
    {
        SyntaxNode::new_root(self.data.green.without_annotations(annotations))
    }

    /// Nodes and tokens in this subtree (self included) carrying
    /// `annotation`, entering structured trivia. Only subtrees flagged as
    /// containing annotations are searched.
    #[must_use]
    pub fn annotated_nodes_and_tokens(&self, annotation: &SyntaxAnnotation) -> Vec<SyntaxNodeOrToken> {
        if !self.contains_annotations() {
            return Vec::new();
        }
        let prune = |node: &SyntaxNode| node.contains_annotations();
        let options = WalkOptions::default().with_descend_into(&prune).with_trivia(true);
        std::iter::once(SyntaxNodeOrToken::Node(self.clone()))
            .chain(self.descendant_nodes_and_tokens_with(options))
            .filter(|element| element.has_annotation(annotation))
            .collect()
    }

    #[must_use]
    pub fn annotated_nodes(&self, annotation: &SyntaxAnnotation) -> Vec<SyntaxNode> {
        self.annotated_nodes_and_tokens(annotation)
            .into_iter()
            .filter_map(SyntaxNodeOrToken::into_node)
            .collect()
    }

    /// Trivia in this subtree carrying `annotation`.
    #[must_use]
    pub fn annotated_trivia(&self, annotation: &SyntaxAnnotation) -> Vec<SyntaxTrivia> {
        if !self.contains_annotations() {
            return Vec::new();
        }
        self.descendant_trivia_with(WalkOptions::default().with_trivia(true))
            .into_iter()
            .filter(|trivia| trivia.has_annotation(annotation))
            .collect()
    }
}

// =============================================================================
// Trait impls
// =============================================================================

impl PartialEq for SyntaxNode {
    fn eq(&self, other: &Self) -> bool {
        SyntaxNode::ptr_eq(self, other)
    }
}

impl Eq for SyntaxNode {}

impl Hash for SyntaxNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

/// Text without the outer leading and trailing trivia.
impl fmt::Display for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.data.green, f)
    }
}

impl fmt::Debug for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{}", self.kind(), self.full_span())
    }
}
