//! Centralized limits and thresholds for the canopy syntax tree.
//!
//! This module provides shared constants for search bounds, cache sizes and
//! representation cut-offs used throughout the codebase. Centralizing these
//! values:
//! - Prevents duplicate definitions with inconsistent values
//! - Makes it easy to tune the tree for memory or speed
//! - Documents the rationale for each limit
//!
//! # Categories
//!
//! - **Node layout**: inline slot counts and list representation cut-offs
//! - **Node cache**: interning table size and eligibility
//! - **Tree differ**: lookahead bounds

// =============================================================================
// Node Layout
// =============================================================================

/// Largest slot count stored inline in a green node header.
///
/// The header reserves four bits for the slot count. The value 15 is a
/// sentinel meaning "too large to store inline"; the count is then read from
/// the node payload instead. Nodes with at most 14 slots never touch the
/// payload to answer `slot_count()`.
pub const MAX_INLINE_SLOT_COUNT: usize = 15;

/// Number of list elements from which a green list precomputes child offsets.
///
/// Lists below this size locate a child by position with a linear scan over
/// child widths. From this size on, a cumulative offset table makes
/// `find_slot_index_containing_offset` a binary search and `slot_offset` O(1).
///
/// ```text
/// {                      // block with 200 statements:
///     stmt0; stmt1; ...  // find_token(pos) inside it binary-searches the
/// }                      // offsets table instead of summing 200 widths
/// ```
pub const LOTS_OF_CHILDREN_THRESHOLD: usize = 10;

/// Number of list elements from which positioned list elements are held weakly.
///
/// Large lists (top-level members of a big file, long statement blocks) are
/// usually visited once and then dropped. Holding their materialized elements
/// weakly lets those elements be freed as soon as no consumer references them;
/// re-visiting a freed element re-creates it.
pub const WEAK_LIST_THRESHOLD: usize = 32;

// =============================================================================
// Node Cache
// =============================================================================

/// Maximum number of children a node may have to be interned by the node cache.
///
/// Small shapes (a keyword wrapped as a predefined type, an identifier wrapped
/// as a name, a literal expression) dominate real trees and repeat constantly;
/// larger nodes rarely repeat exactly.
pub const MAX_CACHED_CHILD_NUM: usize = 3;

/// Default size of the node cache, as a power of two (65,536 entries).
pub const NODE_CACHE_SIZE_BITS: u32 = 16;

/// Number of independently locked cache shards, as a power of two (16 shards).
///
/// A lookup takes a read lock on one shard only; an insert tries the shard's
/// write lock and gives up on contention, so concurrent parsers never wait on
/// each other for long.
pub const NODE_CACHE_SHARD_BITS: u32 = 4;

// =============================================================================
// Tree Differ
// =============================================================================

/// How far the tree differ looks into the opposite pending stack for a match.
///
/// Each step compares the top of one stack with up to this many entries of
/// the other (and one level into each entry's children). The bound keeps each
/// decision O(1) with respect to file size; at worst the differ degrades to a
/// coarser replacement.
///
/// ```text
/// old: a; b; c;           // inserting 9+ statements before `a` is seen as
/// new: x1; ... x9; a; ... // a replacement instead of a pure insertion
/// ```
pub const MAX_DIFF_SEARCH_LENGTH: usize = 8;
