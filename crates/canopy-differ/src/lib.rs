//! Text-level differences between two syntax trees.
//!
//! The differ walks two trees side by side, skipping subtrees that are shared
//! by identity and descending only where they differ, then trims the
//! resulting replacements down to the characters that actually changed:
//!
//! ```text
//! old: int x = 1;
//! new: int x = 2;
//! =>   [8..9) => "2"
//! ```
//!
//! Trees produced from one another by rewriting share most of their green
//! nodes, so diffing them costs time proportional to the edit rather than to
//! the file.

pub mod differ;
pub use differ::{
    node_possibly_different_spans, node_text_changes, possibly_different_spans, text_change_ranges, text_changes,
};

#[cfg(test)]
#[path = "../tests/differ_tests.rs"]
mod differ_tests;
