//! Interning cache for small green nodes.
//!
//! Parsers produce the same small shapes over and over: a keyword wrapped as
//! a predefined type, an identifier wrapped as a name. `NodeCache` lets a
//! parser reuse one green node for every occurrence.
//!
//! The cache is lossy and direct-mapped: each hash selects exactly one entry,
//! and a new node simply overwrites whatever was there. Entries are spread
//! over independently locked shards. Lookups take a shard read lock; inserts
//! only *try* the write lock and skip the insert under contention, so a race
//! costs at most a missed hit.
//!
//! Equivalence is checked by identity: a cached node is returned only when its
//! kind and flags match and every child is the very same green node. Because
//! children are compared by identity, a hit is always interchangeable with
//! the node the caller would have built.

use std::fmt;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use canopy_common::limits::{MAX_CACHED_CHILD_NUM, NODE_CACHE_SHARD_BITS, NODE_CACHE_SIZE_BITS};
use tracing::trace;

use super::flags::NodeFlags;
use super::node::GreenNode;
use crate::kind::SyntaxKind;

#[derive(Clone)]
struct CacheEntry {
    hash: u32,
    node: GreenNode,
}

struct CacheShard {
    entries: RwLock<Box<[Option<CacheEntry>]>>,
}

/// Hit/miss counters of a `NodeCache`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Inserts dropped because the shard was busy.
    pub skipped_writes: u64,
}

pub struct NodeCache {
    shards: Box<[CacheShard]>,
    entry_mask: u32,
    hits: AtomicU64,
    misses: AtomicU64,
    skipped_writes: AtomicU64,
}

/// `Hash.Combine`-style mixing: `current * 0xA5555529 + new_part`.
#[inline]
fn combine(new_part: u32, current: u32) -> u32 {
    current.wrapping_mul(0xA555_5529).wrapping_add(new_part)
}

#[inline]
fn identity_hash(node: &GreenNode) -> u32 {
    let addr = node.identity() as u64;
    (addr ^ (addr >> 32)) as u32
}

impl NodeCache {
    const SHARD_COUNT: usize = 1 << NODE_CACHE_SHARD_BITS;

    /// A cache with `2^NODE_CACHE_SIZE_BITS` entries.
    #[must_use]
    pub fn new() -> Self {
        Self::with_size_bits(NODE_CACHE_SIZE_BITS)
    }

    /// A cache with `2^size_bits` entries.
    ///
    /// # Panics
    ///
    /// Panics if `size_bits` is smaller than the shard bits or larger than 28.
    #[must_use]
    pub fn with_size_bits(size_bits: u32) -> Self {
        assert!(
            (NODE_CACHE_SHARD_BITS..=28).contains(&size_bits),
            "node cache size bits {size_bits} out of range"
        );
        let per_shard = 1usize << (size_bits - NODE_CACHE_SHARD_BITS);
        let shards = (0..Self::SHARD_COUNT)
            .map(|_| CacheShard {
                entries: RwLock::new(vec![None; per_shard].into_boxed_slice()),
            })
            .collect();
        NodeCache {
            shards,
            entry_mask: (per_shard - 1) as u32,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            skipped_writes: AtomicU64::new(0),
        }
    }

    /// Cache hash of a prospective node, or `None` if it can't be cached
    /// (too many children, or a child that is not cacheable itself).
    #[must_use]
    pub fn hash_for(kind: SyntaxKind, flags: NodeFlags, children: &[Option<GreenNode>]) -> Option<u32> {
        if children.len() > MAX_CACHED_CHILD_NUM
            || !children.iter().flatten().all(GreenNode::is_cacheable)
        {
            return None;
        }
        let mut code = u32::from(flags.bits()) ^ u32::from(kind.raw());
        for child in children {
            code = combine(child.as_ref().map_or(0, identity_hash), code);
        }
        Some(code & (i32::MAX as u32))
    }

    /// Cache hash of an existing node, `None` when it is not cacheable.
    #[must_use]
    pub fn hash_of(node: &GreenNode) -> Option<u32> {
        if !node.is_cacheable() || node.is_token() || node.is_trivia() {
            return None;
        }
        let children: Vec<Option<GreenNode>> = node.slots().map(|slot| slot.cloned()).collect();
        Self::hash_for(node.kind(), node.flags(), &children)
    }

    #[inline]
    fn locate(&self, hash: u32) -> (usize, usize) {
        let shard = hash as usize & (Self::SHARD_COUNT - 1);
        let entry = ((hash >> NODE_CACHE_SHARD_BITS) & self.entry_mask) as usize;
        (shard, entry)
    }

    /// Look up a node with exactly this kind, flags and children.
    #[must_use]
    pub fn lookup(
        &self,
        kind: SyntaxKind,
        flags: NodeFlags,
        children: &[Option<GreenNode>],
        hash: u32,
    ) -> Option<GreenNode> {
        let (shard, entry) = self.locate(hash);
        let Ok(entries) = self.shards[shard].entries.read() else {
            // A poisoned shard behaves like an empty one.
            return None;
        };
        match &entries[entry] {
            Some(cached) if cached.hash == hash && cached.node.is_cache_equivalent(kind, flags, children) => {
                Some(cached.node.clone())
            }
            _ => None,
        }
    }

    /// Offer `node` to the cache under `hash`.
    ///
    /// Nodes that are not cacheable are ignored, and so is the insert when
    /// another thread holds the shard.
    pub fn insert(&self, node: &GreenNode, hash: u32) {
        if !node.is_cacheable() {
            return;
        }
        let (shard, entry) = self.locate(hash);
        match self.shards[shard].entries.try_write() {
            Ok(mut entries) => {
                entries[entry] = Some(CacheEntry {
                    hash,
                    node: node.clone(),
                });
            }
            Err(_) => {
                self.skipped_writes.fetch_add(1, Ordering::Relaxed);
                trace!(shard, kind = ?node.kind(), "node cache shard busy, insert skipped");
            }
        }
    }

    /// Build a node, reusing a cached one when possible.
    #[must_use]
    pub fn node(&self, kind: SyntaxKind, slots: Vec<Option<GreenNode>>) -> GreenNode {
        self.node_with_context(kind, slots, NodeFlags::empty())
    }

    /// Build a node recording parser context bits, reusing a cached one when
    /// possible.
    #[must_use]
    pub fn node_with_context(
        &self,
        kind: SyntaxKind,
        slots: Vec<Option<GreenNode>>,
        context: NodeFlags,
    ) -> GreenNode {
        let flags = NodeFlags::IS_NOT_MISSING | (context & NodeFlags::FACTORY_CONTEXT_MASK);
        let Some(hash) = Self::hash_for(kind, flags, &slots) else {
            return GreenNode::node_with_context(kind, slots, context);
        };
        if let Some(hit) = self.lookup(kind, flags, &slots, hash) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(?kind, hash, "node cache hit");
            return hit;
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let node = GreenNode::node_with_context(kind, slots, context);
        self.insert(&node, hash);
        node
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            skipped_writes: self.skipped_writes.load(Ordering::Relaxed),
        }
    }

    /// Drop every cached node.
    pub fn clear(&self) {
        for shard in self.shards.iter() {
            if let Ok(mut entries) = shard.entries.write() {
                entries.iter_mut().for_each(|entry| *entry = None);
            }
        }
    }

    /// Total number of entries (occupied or not).
    #[must_use]
    pub fn capacity(&self) -> usize {
        Self::SHARD_COUNT * (self.entry_mask as usize + 1)
    }
}

impl Default for NodeCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NodeCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeCache")
            .field("capacity", &self.capacity())
            .field("stats", &self.stats())
            .finish()
    }
}
