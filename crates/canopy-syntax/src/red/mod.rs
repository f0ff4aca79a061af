//! The red layer: positioned, parent-linked views over green nodes.
//!
//! - `slot`: publish-once cells for memoized children
//! - `node`: `SyntaxNode` and lazy child materialization
//! - `token`, `trivia`, `element`: the other positioned handles
//! - `navigation`: first/last/next/previous token, positional lookup
//! - `walk`: descendant enumeration

pub mod element;
pub mod navigation;
pub mod node;
pub(crate) mod slot;
pub mod token;
pub mod trivia;
pub mod walk;

pub use element::SyntaxNodeOrToken;
pub use navigation::TokenFilter;
pub use node::SyntaxNode;
pub use token::SyntaxToken;
pub use trivia::SyntaxTrivia;
pub use walk::{Descendants, WalkOptions};
