//! Node flags and the packed node header.
//!
//! Every green node starts with one 32-bit header word:
//!
//! ```text
//!  31      28 27     24 23          16 15                         0
//! +----------+---------+--------------+----------------------------+
//! | reserved | slots   | flags        | kind                       |
//! +----------+---------+--------------+----------------------------+
//! ```
//!
//! The slot field holds counts 0..=14 inline. The value 15 is a sentinel:
//! the node has 15 or more slots and the count must be read from its payload.

use bitflags::bitflags;
use canopy_common::limits::MAX_INLINE_SLOT_COUNT;

use crate::kind::SyntaxKind;

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct NodeFlags: u8 {
        /// Set on every node that covers at least one real (non-missing) token.
        /// Its absence is what makes a node missing.
        const IS_NOT_MISSING = 1 << 0;
        const CONTAINS_DIAGNOSTICS = 1 << 1;
        const CONTAINS_STRUCTURED_TRIVIA = 1 << 2;
        const CONTAINS_DIRECTIVES = 1 << 3;
        const CONTAINS_SKIPPED_TEXT = 1 << 4;
        const CONTAINS_ANNOTATIONS = 1 << 5;
        /// Parser context bits recorded by the node factory.
        const FACTORY_CONTEXT_IS_IN_ASYNC = 1 << 6;
        const FACTORY_CONTEXT_IS_IN_QUERY = 1 << 7;

        /// Flags a parent takes over from its children.
        const INHERIT_MASK = Self::IS_NOT_MISSING.bits()
            | Self::CONTAINS_DIAGNOSTICS.bits()
            | Self::CONTAINS_STRUCTURED_TRIVIA.bits()
            | Self::CONTAINS_DIRECTIVES.bits()
            | Self::CONTAINS_SKIPPED_TEXT.bits()
            | Self::CONTAINS_ANNOTATIONS.bits();

        const FACTORY_CONTEXT_MASK = Self::FACTORY_CONTEXT_IS_IN_ASYNC.bits()
            | Self::FACTORY_CONTEXT_IS_IN_QUERY.bits();

        /// Flags that mean the node may own a side-table entry.
        const SIDE_DATA_MASK = Self::CONTAINS_DIAGNOSTICS.bits()
            | Self::CONTAINS_ANNOTATIONS.bits();
    }
}

impl NodeFlags {
    /// Flags inherited from a child, excluding `IS_NOT_MISSING` (used where a
    /// child's presence must not make the parent "present", e.g. trivia on a
    /// missing token).
    #[inline]
    #[must_use]
    pub fn inherited_contents(self) -> NodeFlags {
        self & (NodeFlags::INHERIT_MASK - NodeFlags::IS_NOT_MISSING)
    }
}

/// Kind, flags and inline slot count packed into one word.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackedHeader(u32);

impl PackedHeader {
    const KIND_MASK: u32 = 0xFFFF;
    const FLAGS_SHIFT: u32 = 16;
    const FLAGS_MASK: u32 = 0xFF;
    const SLOTS_SHIFT: u32 = 24;
    const SLOTS_MASK: u32 = 0xF;

    #[must_use]
    pub fn new(kind: SyntaxKind, flags: NodeFlags, slot_count: usize) -> Self {
        let inline = slot_count.min(MAX_INLINE_SLOT_COUNT) as u32;
        PackedHeader(
            u32::from(kind.0)
                | (u32::from(flags.bits()) << Self::FLAGS_SHIFT)
                | (inline << Self::SLOTS_SHIFT),
        )
    }

    #[inline]
    #[must_use]
    pub const fn kind(self) -> SyntaxKind {
        SyntaxKind((self.0 & Self::KIND_MASK) as u16)
    }

    #[inline]
    #[must_use]
    pub const fn flags(self) -> NodeFlags {
        NodeFlags::from_bits_retain(((self.0 >> Self::FLAGS_SHIFT) & Self::FLAGS_MASK) as u8)
    }

    /// The slot count if it fits inline, `None` for the "too large" sentinel.
    #[inline]
    #[must_use]
    pub const fn inline_slot_count(self) -> Option<usize> {
        let raw = ((self.0 >> Self::SLOTS_SHIFT) & Self::SLOTS_MASK) as usize;
        if raw == MAX_INLINE_SLOT_COUNT {
            None
        } else {
            Some(raw)
        }
    }

    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Debug for PackedHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackedHeader")
            .field("kind", &self.kind())
            .field("flags", &self.flags())
            .field("slots", &self.inline_slot_count())
            .finish()
    }
}
