//! A small C-like language for exercising the tree core.
//!
//! Enabled in this crate's own tests and, for other crates, through the
//! `testkit` feature. All parses share one process-wide `NodeCache`, so small
//! nodes are interned across trees the way a real compilation session would.
//!
//! ```text
//! int x = 1;
//! #region helpers
//! int add(int a, int b) { return a + b; }
//! #endregion
//! ```

pub mod kinds;
pub mod lexer;
pub mod parser;

use once_cell::sync::Lazy;

use crate::green::{GreenNode, NodeCache};
use crate::red::SyntaxNode;
use crate::tree::SyntaxTree;

pub use lexer::Lexer;
pub use parser::{Parser, missing};

/// Shared state of every test parse.
pub struct TestSession {
    pub cache: NodeCache,
}

static SESSION: Lazy<TestSession> = Lazy::new(|| TestSession {
    cache: NodeCache::new(),
});

impl TestSession {
    #[must_use]
    pub fn global() -> &'static TestSession {
        &SESSION
    }
}

/// Parse `text` as a compilation unit.
#[must_use]
pub fn parse(text: &str) -> SyntaxTree {
    parse_with_path(text, "test.toy")
}

#[must_use]
pub fn parse_with_path(text: &str, path: &str) -> SyntaxTree {
    SyntaxTree::new(parse_green(text), path)
}

/// The green root of `text`.
#[must_use]
pub fn parse_green(text: &str) -> GreenNode {
    Parser::new(text, &TestSession::global().cache).parse_compilation_unit()
}

/// The first member of `text`, as a node in its parsed tree.
///
/// # Panics
///
/// Panics when `text` has no member.
#[must_use]
pub fn parse_member(text: &str) -> SyntaxNode {
    let tree = parse(text);
    match tree.root().children().next() {
        Some(member) => member,
        None => panic!("no member in {text:?}"),
    }
}

/// A detached expression green.
#[must_use]
pub fn parse_expression(text: &str) -> GreenNode {
    Parser::new(text, &TestSession::global().cache).parse_single_expression()
}

/// The tokens of `text`, ending with the end-of-file token.
#[must_use]
pub fn lex(text: &str) -> Vec<GreenNode> {
    Lexer::new(text).tokenize()
}

/// A token of a fixed-text kind (keyword or punctuation) without trivia.
///
/// # Panics
///
/// Panics for kinds without fixed text.
#[must_use]
pub fn punctuation(kind: crate::kind::SyntaxKind) -> GreenNode {
    match kinds::token_text(kind) {
        Some(text) => GreenNode::token(kind, text, None, None),
        None => panic!("{} has no fixed text", kinds::kind_name(kind)),
    }
}

#[must_use]
pub fn identifier(name: &str) -> GreenNode {
    GreenNode::token(kinds::IDENTIFIER_TOKEN, name, None, None)
}

/// `name` as an identifier expression, without trivia.
#[must_use]
pub fn identifier_name(name: &str) -> GreenNode {
    GreenNode::node(kinds::IDENTIFIER_NAME, [Some(identifier(name))])
}

/// A numeric literal expression without trivia.
#[must_use]
pub fn number(value: &str) -> GreenNode {
    let token = GreenNode::token(kinds::NUMERIC_LITERAL_TOKEN, value, None, None);
    GreenNode::node(kinds::LITERAL_EXPRESSION, [Some(token)])
}

#[must_use]
pub fn whitespace(text: &str) -> GreenNode {
    GreenNode::trivia(kinds::WHITESPACE_TRIVIA, text)
}

#[must_use]
pub fn end_of_line() -> GreenNode {
    GreenNode::trivia(kinds::END_OF_LINE_TRIVIA, "\n")
}

#[must_use]
pub fn line_comment(text: &str) -> GreenNode {
    GreenNode::trivia(kinds::LINE_COMMENT_TRIVIA, text)
}
