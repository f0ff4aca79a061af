//! The green layer: shared, position-independent nodes.
//!
//! - `flags`: node flags and the packed header word
//! - `node`: `GreenNode`, its constructors and queries
//! - `list`: `GreenListBuilder` for the list encoding
//! - `cache`: `NodeCache`, the interning table for small nodes

pub mod cache;
pub mod flags;
pub mod list;
pub mod node;

pub use cache::{CacheStats, NodeCache};
pub use flags::{NodeFlags, PackedHeader};
pub use list::GreenListBuilder;
pub use node::GreenNode;
