//! Persistent red/green syntax trees.
//!
//! This crate provides the tree representation shared by every later phase:
//! - Green layer: immutable, position-independent, shareable nodes
//!   (`GreenNode`), the list encoding, and the `NodeCache` interning table
//! - Side tables: diagnostics and annotations keyed by green identity
//! - Red layer: lazily materialized, positioned, parent-linked views
//!   (`SyntaxNode`, `SyntaxToken`, `SyntaxTrivia`)
//! - List views over mixed single/list slots, including separated lists
//! - Navigation, structural equivalence, rewriting and node tracking

// Kinds and flags
pub mod kind;
pub use kind::{SyntaxKind, TriviaStructure};

// Green layer
pub mod green;
pub use green::{CacheStats, GreenListBuilder, GreenNode, NodeCache, NodeFlags, PackedHeader};

// Diagnostics and annotations stored beside green nodes
pub mod annotation;
pub mod side_table;
pub use annotation::SyntaxAnnotation;
pub use side_table::SideTables;

// Editing errors
pub mod error;
pub use error::EditError;

// Red layer
pub mod red;
pub use red::{
    Descendants, SyntaxNode, SyntaxNodeOrToken, SyntaxToken, SyntaxTrivia, TokenFilter, WalkOptions,
};

// List views and builders
pub mod lists;
pub use lists::{
    ChildSyntaxList, SeparatedSyntaxList, SeparatedSyntaxListBuilder, SlotCursor, SyntaxListBuilder,
    SyntaxNodeList, SyntaxNodeOrTokenList, SyntaxTokenList, SyntaxTriviaList,
};

// Structural equivalence
pub mod equivalence;
pub use equivalence::{are_equivalent, are_equivalent_nodes};

// Rewriting
pub mod rewrite;
pub use rewrite::RemoveOptions;

// Tracking nodes across rewrites
pub mod tracking;
pub use tracking::NodeTracker;

pub mod tree;
pub use tree::SyntaxTree;

// Test language
#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

#[cfg(test)]
#[path = "../tests/green_tests.rs"]
mod green_tests;

#[cfg(test)]
#[path = "../tests/cache_tests.rs"]
mod cache_tests;

#[cfg(test)]
#[path = "../tests/side_table_tests.rs"]
mod side_table_tests;

#[cfg(test)]
#[path = "../tests/red_tests.rs"]
mod red_tests;

#[cfg(test)]
#[path = "../tests/list_tests.rs"]
mod list_tests;

#[cfg(test)]
#[path = "../tests/separated_list_tests.rs"]
mod separated_list_tests;

#[cfg(test)]
#[path = "../tests/navigation_tests.rs"]
mod navigation_tests;

#[cfg(test)]
#[path = "../tests/equivalence_tests.rs"]
mod equivalence_tests;

#[cfg(test)]
#[path = "../tests/rewrite_tests.rs"]
mod rewrite_tests;

#[cfg(test)]
#[path = "../tests/tracking_tests.rs"]
mod tracking_tests;

#[cfg(test)]
#[path = "../tests/testkit_tests.rs"]
mod testkit_tests;
