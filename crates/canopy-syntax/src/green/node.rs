//! Green nodes: immutable, position-independent tree nodes.
//!
//! A `GreenNode` is a cheap handle (`Arc`) to node data that never changes
//! after construction. Green nodes know their kind, flags, children and full
//! width, but not their position or parent, so one green node can appear in
//! any number of trees at any number of places.
//!
//! Four shapes share the same handle type:
//! - **token**: terminal text plus optional leading/trailing trivia
//! - **trivia**: whitespace, comments and other non-semantic text
//! - **node**: fixed slots, each empty or holding one child (a child may be a
//!   list). Structured trivia are nodes flagged with a `TriviaStructure`.
//! - **list**: `SyntaxKind::LIST`, holding 2, 3 or N elements as its slots.
//!   A one-element list is never built; the element stands in for it.
//!
//! Identity is the address of the shared data. Equality and hashing on
//! `GreenNode` are by identity, never by structure.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use canopy_common::TextSize;
use canopy_common::limits::{LOTS_OF_CHILDREN_THRESHOLD, MAX_CACHED_CHILD_NUM};
use smallvec::SmallVec;

use super::flags::{NodeFlags, PackedHeader};
use crate::kind::{SyntaxKind, TriviaStructure};
use crate::side_table::{SideEntry, SideTables};

// =============================================================================
// Data
// =============================================================================

#[derive(Clone)]
pub struct GreenNode(Arc<GreenNodeData>);

pub(crate) struct GreenNodeData {
    header: PackedHeader,
    full_width: TextSize,
    payload: Payload,
}

#[derive(Clone)]
pub(crate) enum Payload {
    Token(TokenPayload),
    Trivia {
        text: Box<str>,
    },
    Node {
        slots: Box<[Option<GreenNode>]>,
        structure: Option<TriviaStructure>,
    },
    List(ListPayload),
}

#[derive(Clone)]
pub(crate) struct TokenPayload {
    text: Box<str>,
    leading: Option<GreenNode>,
    trailing: Option<GreenNode>,
    missing: bool,
}

#[derive(Clone)]
pub(crate) enum ListPayload {
    Two([GreenNode; 2]),
    Three([GreenNode; 3]),
    Many {
        children: Box<[GreenNode]>,
        /// Start offset of each child, present for long lists.
        offsets: Option<Box<[TextSize]>>,
    },
}

impl ListPayload {
    #[inline]
    fn children(&self) -> &[GreenNode] {
        match self {
            ListPayload::Two(children) => children,
            ListPayload::Three(children) => children,
            ListPayload::Many { children, .. } => children,
        }
    }
}

impl Payload {
    fn full_width(&self) -> TextSize {
        match self {
            Payload::Token(token) => {
                token.text.len() as TextSize
                    + token.leading.as_ref().map_or(0, GreenNode::full_width)
                    + token.trailing.as_ref().map_or(0, GreenNode::full_width)
            }
            Payload::Trivia { text } => text.len() as TextSize,
            Payload::Node { slots, .. } => slots.iter().flatten().map(GreenNode::full_width).sum(),
            Payload::List(list) => list.children().iter().map(GreenNode::full_width).sum(),
        }
    }

    fn slot_count(&self) -> usize {
        match self {
            Payload::Token(_) | Payload::Trivia { .. } => 0,
            Payload::Node { slots, .. } => slots.len(),
            Payload::List(list) => list.children().len(),
        }
    }

    /// Flags that follow from the payload alone (no side data, no context).
    fn derived_flags(&self) -> NodeFlags {
        match self {
            Payload::Token(token) => {
                let mut flags = NodeFlags::empty();
                for trivia in [&token.leading, &token.trailing].into_iter().flatten() {
                    flags |= trivia.flags().inherited_contents();
                }
                if !token.missing {
                    flags |= NodeFlags::IS_NOT_MISSING;
                }
                flags
            }
            Payload::Trivia { .. } => NodeFlags::IS_NOT_MISSING,
            Payload::Node { slots, structure } => {
                let mut flags = slots
                    .iter()
                    .flatten()
                    .fold(NodeFlags::empty(), |acc, child| acc | child.flags())
                    & NodeFlags::INHERIT_MASK;
                if let Some(structure) = structure {
                    flags |= NodeFlags::CONTAINS_STRUCTURED_TRIVIA;
                    match structure {
                        TriviaStructure::Directive => flags |= NodeFlags::CONTAINS_DIRECTIVES,
                        TriviaStructure::SkippedTokens => flags |= NodeFlags::CONTAINS_SKIPPED_TEXT,
                        TriviaStructure::Other => {}
                    }
                }
                flags
            }
            Payload::List(list) => {
                list.children()
                    .iter()
                    .fold(NodeFlags::empty(), |acc, child| acc | child.flags())
                    & NodeFlags::INHERIT_MASK
            }
        }
    }
}

impl Drop for GreenNodeData {
    fn drop(&mut self) {
        if self.header.flags().intersects(NodeFlags::SIDE_DATA_MASK) {
            SideTables::global().forget(self as *const GreenNodeData as usize);
        }
    }
}

// =============================================================================
// Construction
// =============================================================================

impl GreenNode {
    fn from_payload(kind: SyntaxKind, flags: NodeFlags, payload: Payload) -> GreenNode {
        let full_width = payload.full_width();
        let header = PackedHeader::new(kind, flags, payload.slot_count());
        GreenNode(Arc::new(GreenNodeData {
            header,
            full_width,
            payload,
        }))
    }

    /// Build a node from a payload, recording `side` in the side tables.
    pub(crate) fn from_payload_with_side(
        kind: SyntaxKind,
        context: NodeFlags,
        payload: Payload,
        side: Option<SideEntry>,
    ) -> GreenNode {
        let mut flags = payload.derived_flags() | (context & NodeFlags::FACTORY_CONTEXT_MASK);
        let side = side.filter(|entry| !entry.is_empty());
        if let Some(entry) = &side {
            flags |= entry.flags();
        }
        let node = GreenNode::from_payload(kind, flags, payload);
        if let Some(entry) = side {
            SideTables::global().attach(&node, entry);
        }
        node
    }

    /// Rebuild this node around a new payload, keeping its kind, factory
    /// context and side-table entry.
    pub(crate) fn rebuild(&self, payload: Payload) -> GreenNode {
        GreenNode::from_payload_with_side(
            self.kind(),
            self.flags(),
            payload,
            SideTables::global().entry(self),
        )
    }

    pub(crate) fn payload(&self) -> &Payload {
        &self.0.payload
    }

    /// A token with optional leading and trailing trivia.
    ///
    /// Trivia arguments are a single trivia node or a list of them.
    #[must_use]
    pub fn token(
        kind: SyntaxKind,
        text: &str,
        leading: Option<GreenNode>,
        trailing: Option<GreenNode>,
    ) -> GreenNode {
        debug_assert!(leading.as_ref().is_none_or(GreenNode::is_trivia_or_trivia_list));
        debug_assert!(trailing.as_ref().is_none_or(GreenNode::is_trivia_or_trivia_list));
        let payload = Payload::Token(TokenPayload {
            text: text.into(),
            leading,
            trailing,
            missing: false,
        });
        GreenNode::from_payload(kind, payload.derived_flags(), payload)
    }

    /// A zero-width token standing in for one the parser expected but did not find.
    #[must_use]
    pub fn missing_token(kind: SyntaxKind) -> GreenNode {
        GreenNode::missing_token_with_trivia(kind, None, None)
    }

    #[must_use]
    pub fn missing_token_with_trivia(
        kind: SyntaxKind,
        leading: Option<GreenNode>,
        trailing: Option<GreenNode>,
    ) -> GreenNode {
        let payload = Payload::Token(TokenPayload {
            text: "".into(),
            leading,
            trailing,
            missing: true,
        });
        GreenNode::from_payload(kind, payload.derived_flags(), payload)
    }

    #[must_use]
    pub fn trivia(kind: SyntaxKind, text: &str) -> GreenNode {
        let payload = Payload::Trivia { text: text.into() };
        GreenNode::from_payload(kind, payload.derived_flags(), payload)
    }

    /// A node with fixed slots. A node without any non-missing child is missing.
    #[must_use]
    pub fn node<I>(kind: SyntaxKind, slots: I) -> GreenNode
    where
        I: IntoIterator<Item = Option<GreenNode>>,
    {
        GreenNode::node_with_context(kind, slots, NodeFlags::empty())
    }

    /// A node recording parser context bits (`FACTORY_CONTEXT_MASK`).
    #[must_use]
    pub fn node_with_context<I>(kind: SyntaxKind, slots: I, context: NodeFlags) -> GreenNode
    where
        I: IntoIterator<Item = Option<GreenNode>>,
    {
        assert!(!kind.is_list(), "lists are built with GreenNode::list");
        let payload = Payload::Node {
            slots: slots.into_iter().collect(),
            structure: None,
        };
        let flags = payload.derived_flags() | (context & NodeFlags::FACTORY_CONTEXT_MASK);
        GreenNode::from_payload(kind, flags, payload)
    }

    /// A trivia node with internal structure (a directive, skipped tokens, ...).
    #[must_use]
    pub fn structured_trivia<I>(kind: SyntaxKind, structure: TriviaStructure, slots: I) -> GreenNode
    where
        I: IntoIterator<Item = Option<GreenNode>>,
    {
        let payload = Payload::Node {
            slots: slots.into_iter().collect(),
            structure: Some(structure),
        };
        GreenNode::from_payload(kind, payload.derived_flags(), payload)
    }

    /// The list encoding of `children`.
    ///
    /// Returns `None` for no children and the child itself for exactly one.
    /// Children must not be lists themselves; use `GreenListBuilder` to
    /// flatten.
    #[must_use]
    pub fn list<I>(children: I) -> Option<GreenNode>
    where
        I: IntoIterator<Item = GreenNode>,
    {
        let children: SmallVec<[GreenNode; 4]> = children.into_iter().collect();
        debug_assert!(children.iter().all(|child| !child.is_list()));
        let payload = match children.len() {
            0 => return None,
            1 => return children.into_iter().next(),
            2 => {
                let mut it = children.into_iter();
                let (Some(a), Some(b)) = (it.next(), it.next()) else {
                    return None;
                };
                ListPayload::Two([a, b])
            }
            3 => {
                let mut it = children.into_iter();
                let (Some(a), Some(b), Some(c)) = (it.next(), it.next(), it.next()) else {
                    return None;
                };
                ListPayload::Three([a, b, c])
            }
            len => {
                let offsets = (len >= LOTS_OF_CHILDREN_THRESHOLD).then(|| {
                    let mut start = 0;
                    children
                        .iter()
                        .map(|child| {
                            let offset = start;
                            start += child.full_width();
                            offset
                        })
                        .collect()
                });
                ListPayload::Many {
                    children: children.into_iter().collect(),
                    offsets,
                }
            }
        };
        let payload = Payload::List(payload);
        Some(GreenNode::from_payload(
            SyntaxKind::LIST,
            payload.derived_flags(),
            payload,
        ))
    }

    /// Concatenate two list-or-element values into one list encoding.
    #[must_use]
    pub fn list_concat(left: Option<&GreenNode>, right: Option<&GreenNode>) -> Option<GreenNode> {
        let mut builder = super::list::GreenListBuilder::new();
        builder.add_option(left);
        builder.add_option(right);
        builder.to_list()
    }

    /// The same node with new children.
    ///
    /// Kind, structure, factory context, diagnostics and annotations are kept.
    ///
    /// # Panics
    ///
    /// Panics when called on a token, trivia or list.
    #[must_use]
    pub fn with_slots<I>(&self, slots: I) -> GreenNode
    where
        I: IntoIterator<Item = Option<GreenNode>>,
    {
        let Payload::Node { structure, .. } = &self.0.payload else {
            panic!("with_slots called on {:?}, which has no fixed slots", self.kind());
        };
        let slots: Box<[Option<GreenNode>]> = slots.into_iter().collect();
        debug_assert_eq!(slots.len(), self.slot_count(), "slot count changed for {:?}", self.kind());
        self.rebuild(Payload::Node {
            slots,
            structure: *structure,
        })
    }

    /// The same node recording different parser context bits.
    #[must_use]
    pub fn with_factory_context(&self, context: NodeFlags) -> GreenNode {
        GreenNode::from_payload_with_side(
            self.kind(),
            context,
            self.0.payload.clone(),
            SideTables::global().entry(self),
        )
    }

    /// The same token with different leading trivia.
    ///
    /// # Panics
    ///
    /// Panics when `self` is not a token.
    #[must_use]
    pub fn with_leading_trivia(&self, leading: Option<GreenNode>) -> GreenNode {
        let Payload::Token(token) = &self.0.payload else {
            panic!("with_leading_trivia called on non-token {:?}", self.kind());
        };
        self.rebuild(Payload::Token(TokenPayload {
            leading,
            ..token.clone()
        }))
    }

    /// The same token with different trailing trivia.
    ///
    /// # Panics
    ///
    /// Panics when `self` is not a token.
    #[must_use]
    pub fn with_trailing_trivia(&self, trailing: Option<GreenNode>) -> GreenNode {
        let Payload::Token(token) = &self.0.payload else {
            panic!("with_trailing_trivia called on non-token {:?}", self.kind());
        };
        self.rebuild(Payload::Token(TokenPayload {
            trailing,
            ..token.clone()
        }))
    }
}

// =============================================================================
// Queries
// =============================================================================

impl GreenNode {
    #[inline]
    #[must_use]
    pub fn kind(&self) -> SyntaxKind {
        self.0.header.kind()
    }

    #[inline]
    #[must_use]
    pub fn flags(&self) -> NodeFlags {
        self.0.header.flags()
    }

    #[inline]
    #[must_use]
    pub fn header(&self) -> PackedHeader {
        self.0.header
    }

    /// Text length including all trivia.
    #[inline]
    #[must_use]
    pub fn full_width(&self) -> TextSize {
        self.0.full_width
    }

    #[inline]
    #[must_use]
    pub fn slot_count(&self) -> usize {
        match self.0.header.inline_slot_count() {
            Some(count) => count,
            None => self.0.payload.slot_count(),
        }
    }

    /// Child at `index`; `None` for an empty slot.
    ///
    /// # Panics
    ///
    /// Panics when `index >= slot_count()`.
    #[inline]
    #[must_use]
    pub fn slot(&self, index: usize) -> Option<&GreenNode> {
        match &self.0.payload {
            Payload::Node { slots, .. } => slots[index].as_ref(),
            Payload::List(list) => Some(&list.children()[index]),
            Payload::Token(_) | Payload::Trivia { .. } => {
                panic!("slot {index} requested on terminal {:?}", self.kind())
            }
        }
    }

    /// All slots in order, including empty ones.
    pub fn slots(&self) -> impl DoubleEndedIterator<Item = Option<&GreenNode>> + '_ {
        (0..self.slot_count()).map(move |index| self.slot(index))
    }

    /// Non-empty children in order.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = &GreenNode> + '_ {
        self.slots().flatten()
    }

    #[inline]
    #[must_use]
    pub fn is_list(&self) -> bool {
        self.kind().is_list()
    }

    #[inline]
    #[must_use]
    pub fn is_token(&self) -> bool {
        matches!(self.0.payload, Payload::Token(_))
    }

    /// True for plain and structured trivia.
    #[inline]
    #[must_use]
    pub fn is_trivia(&self) -> bool {
        matches!(
            self.0.payload,
            Payload::Trivia { .. } | Payload::Node { structure: Some(_), .. }
        )
    }

    #[inline]
    #[must_use]
    pub fn is_structured_trivia(&self) -> bool {
        self.structure().is_some()
    }

    #[inline]
    #[must_use]
    pub fn structure(&self) -> Option<TriviaStructure> {
        match &self.0.payload {
            Payload::Node { structure, .. } => *structure,
            _ => None,
        }
    }

    fn is_trivia_or_trivia_list(&self) -> bool {
        self.is_trivia() || (self.is_list() && self.children().all(GreenNode::is_trivia))
    }

    #[inline]
    #[must_use]
    pub fn is_missing(&self) -> bool {
        !self.flags().contains(NodeFlags::IS_NOT_MISSING)
    }

    #[inline]
    #[must_use]
    pub fn contains_diagnostics(&self) -> bool {
        self.flags().contains(NodeFlags::CONTAINS_DIAGNOSTICS)
    }

    #[inline]
    #[must_use]
    pub fn contains_annotations(&self) -> bool {
        self.flags().contains(NodeFlags::CONTAINS_ANNOTATIONS)
    }

    #[inline]
    #[must_use]
    pub fn contains_structured_trivia(&self) -> bool {
        self.flags().contains(NodeFlags::CONTAINS_STRUCTURED_TRIVIA)
    }

    #[inline]
    #[must_use]
    pub fn contains_directives(&self) -> bool {
        self.flags().contains(NodeFlags::CONTAINS_DIRECTIVES)
    }

    #[inline]
    #[must_use]
    pub fn contains_skipped_text(&self) -> bool {
        self.flags().contains(NodeFlags::CONTAINS_SKIPPED_TEXT)
    }

    /// Whether the node cache may intern this node.
    #[inline]
    #[must_use]
    pub fn is_cacheable(&self) -> bool {
        (self.flags() & NodeFlags::INHERIT_MASK) == NodeFlags::IS_NOT_MISSING
            && self.slot_count() <= MAX_CACHED_CHILD_NUM
    }

    /// Whether this node has exactly `kind`, `flags` and the given children
    /// by identity.
    #[must_use]
    pub fn is_cache_equivalent(
        &self,
        kind: SyntaxKind,
        flags: NodeFlags,
        children: &[Option<GreenNode>],
    ) -> bool {
        self.kind() == kind
            && self.flags() == flags
            && self.slot_count() == children.len()
            && children
                .iter()
                .enumerate()
                .all(|(index, child)| match (self.slot(index), child) {
                    (Some(a), Some(b)) => GreenNode::ptr_eq(a, b),
                    (None, None) => true,
                    _ => false,
                })
    }

    /// Token or trivia text; empty for nodes and lists.
    #[inline]
    #[must_use]
    pub fn token_text(&self) -> &str {
        match &self.0.payload {
            Payload::Token(token) => &token.text,
            Payload::Trivia { text } => text,
            _ => "",
        }
    }

    #[must_use]
    pub fn leading_trivia(&self) -> Option<&GreenNode> {
        match &self.0.payload {
            Payload::Token(token) => token.leading.as_ref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn trailing_trivia(&self) -> Option<&GreenNode> {
        match &self.0.payload {
            Payload::Token(token) => token.trailing.as_ref(),
            _ => None,
        }
    }

    /// Width of the leading trivia of the first terminal.
    #[must_use]
    pub fn leading_trivia_width(&self) -> TextSize {
        match &self.0.payload {
            Payload::Token(token) => token.leading.as_ref().map_or(0, GreenNode::full_width),
            Payload::Trivia { .. } => 0,
            _ if self.full_width() == 0 => 0,
            _ => self
                .first_terminal()
                .map_or(0, GreenNode::leading_trivia_width),
        }
    }

    /// Width of the trailing trivia of the last terminal.
    #[must_use]
    pub fn trailing_trivia_width(&self) -> TextSize {
        match &self.0.payload {
            Payload::Token(token) => token.trailing.as_ref().map_or(0, GreenNode::full_width),
            Payload::Trivia { .. } => 0,
            _ if self.full_width() == 0 => 0,
            _ => self
                .last_terminal()
                .map_or(0, GreenNode::trailing_trivia_width),
        }
    }

    /// Text length without the outer leading and trailing trivia.
    #[must_use]
    pub fn width(&self) -> TextSize {
        self.full_width() - self.leading_trivia_width() - self.trailing_trivia_width()
    }

    /// First token reached by always descending into the first non-empty slot.
    #[must_use]
    pub fn first_terminal(&self) -> Option<&GreenNode> {
        let mut node = self;
        loop {
            if node.is_token() {
                return Some(node);
            }
            node = node.children().next()?;
        }
    }

    /// Last token reached by always descending into the last non-empty slot.
    #[must_use]
    pub fn last_terminal(&self) -> Option<&GreenNode> {
        let mut node = self;
        loop {
            if node.is_token() {
                return Some(node);
            }
            node = node.children().next_back()?;
        }
    }

    /// Whether `slot_offset` is a table lookup rather than a scan.
    #[inline]
    pub(crate) fn has_offset_table(&self) -> bool {
        matches!(
            &self.0.payload,
            Payload::List(ListPayload::Many {
                offsets: Some(_),
                ..
            })
        )
    }

    /// Offset of slot `index` from the start of this node. `slot_count()`
    /// yields the full width.
    #[must_use]
    pub fn slot_offset(&self, index: usize) -> TextSize {
        if let Payload::List(ListPayload::Many {
            offsets: Some(offsets),
            ..
        }) = &self.0.payload
        {
            return offsets.get(index).copied().unwrap_or(self.0.full_width);
        }
        (0..index)
            .filter_map(|i| self.slot(i))
            .map(GreenNode::full_width)
            .sum()
    }

    /// Index of the slot whose full span contains `offset`.
    ///
    /// # Panics
    ///
    /// Panics when `offset >= full_width()`.
    #[must_use]
    pub fn find_slot_index_containing_offset(&self, offset: TextSize) -> usize {
        assert!(
            offset < self.full_width(),
            "offset {offset} outside node of width {}",
            self.full_width()
        );
        if let Payload::List(ListPayload::Many {
            offsets: Some(offsets),
            ..
        }) = &self.0.payload
        {
            return offsets.partition_point(|&start| start <= offset) - 1;
        }
        let mut accumulated = 0;
        for (index, slot) in self.slots().enumerate() {
            if let Some(child) = slot {
                accumulated += child.full_width();
                if offset < accumulated {
                    return index;
                }
            }
        }
        unreachable!("children widths do not add up to the full width")
    }

    #[inline]
    #[must_use]
    pub fn ptr_eq(a: &GreenNode, b: &GreenNode) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    /// Address-based identity, stable for the lifetime of the node.
    #[inline]
    #[must_use]
    pub fn identity(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }
}

// =============================================================================
// Text
// =============================================================================

enum WriteItem<'a> {
    Node {
        node: &'a GreenNode,
        leading: bool,
        trailing: bool,
    },
    Text(&'a str),
}

impl GreenNode {
    /// Append the text of this node to `out`.
    ///
    /// `leading`/`trailing` select whether the outermost leading and trailing
    /// trivia are written; inner trivia is always written. Uses an explicit
    /// stack, so arbitrarily deep trees never overflow the call stack.
    pub fn write_to(&self, out: &mut String, leading: bool, trailing: bool) {
        let mut stack = vec![WriteItem::Node {
            node: self,
            leading,
            trailing,
        }];
        while let Some(item) = stack.pop() {
            let (node, leading, trailing) = match item {
                WriteItem::Text(text) => {
                    out.push_str(text);
                    continue;
                }
                WriteItem::Node {
                    node,
                    leading,
                    trailing,
                } => (node, leading, trailing),
            };
            match &node.0.payload {
                Payload::Trivia { text } => out.push_str(text),
                Payload::Token(token) => {
                    if trailing && let Some(trivia) = &token.trailing {
                        stack.push(WriteItem::Node {
                            node: trivia,
                            leading: true,
                            trailing: true,
                        });
                    }
                    stack.push(WriteItem::Text(&token.text[..]));
                    if leading && let Some(trivia) = &token.leading {
                        stack.push(WriteItem::Node {
                            node: trivia,
                            leading: true,
                            trailing: true,
                        });
                    }
                }
                Payload::Node { .. } | Payload::List(_) => {
                    let present: SmallVec<[&GreenNode; 8]> = node.children().collect();
                    let last = present.len().saturating_sub(1);
                    for (index, child) in present.iter().enumerate().rev() {
                        stack.push(WriteItem::Node {
                            node: *child,
                            leading: leading || index != 0,
                            trailing: trailing || index != last,
                        });
                    }
                }
            }
        }
    }

    /// Text including all trivia.
    #[must_use]
    pub fn to_full_string(&self) -> String {
        let mut out = String::with_capacity(self.full_width() as usize);
        self.write_to(&mut out, true, true);
        out
    }
}

/// Text without the outer leading and trailing trivia.
impl fmt::Display for GreenNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::with_capacity(self.full_width() as usize);
        self.write_to(&mut out, false, false);
        f.write_str(&out)
    }
}

impl fmt::Debug for GreenNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.payload {
            Payload::Token(token) => write!(
                f,
                "{:?}@{}{:?}{}",
                self.kind(),
                self.full_width(),
                token.text,
                if token.missing { " (missing)" } else { "" }
            ),
            Payload::Trivia { text } => write!(f, "Trivia {:?} {text:?}", self.kind()),
            _ => write!(
                f,
                "{:?}@{} [{} slots]",
                self.kind(),
                self.full_width(),
                self.slot_count()
            ),
        }
    }
}

impl PartialEq for GreenNode {
    fn eq(&self, other: &Self) -> bool {
        GreenNode::ptr_eq(self, other)
    }
}

impl Eq for GreenNode {}

impl Hash for GreenNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}
