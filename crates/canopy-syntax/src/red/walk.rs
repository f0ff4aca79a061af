//! Descendant enumeration.
//!
//! `Descendants` walks a subtree in document order with an explicit stack.
//! List nodes are traversed but never yielded. A walk can be restricted to a
//! span, pruned with a `descend_into` predicate, and can enter structured
//! trivia, yielding the structure roots and their contents around the token
//! that owns them.

use std::fmt;

use canopy_common::TextSpan;

use super::element::SyntaxNodeOrToken;
use super::navigation::RawChildren;
use super::node::SyntaxNode;
use super::token::SyntaxToken;
use super::trivia::SyntaxTrivia;
use crate::lists::SyntaxTriviaList;

/// Options for a descendant walk.
#[derive(Clone, Copy, Default)]
pub struct WalkOptions<'a> {
    /// Only visit elements whose full span falls in this span.
    pub span: Option<TextSpan>,
    /// Children of a node are visited only when this returns `true`.
    pub descend_into: Option<&'a dyn Fn(&SyntaxNode) -> bool>,
    /// Enter structured trivia.
    pub descend_into_trivia: bool,
}

impl<'a> WalkOptions<'a> {
    #[must_use]
    pub fn in_span(span: TextSpan) -> Self {
        WalkOptions {
            span: Some(span),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_descend_into(mut self, predicate: &'a dyn Fn(&SyntaxNode) -> bool) -> Self {
        self.descend_into = Some(predicate);
        self
    }

    #[must_use]
    pub fn with_trivia(mut self, descend_into_trivia: bool) -> Self {
        self.descend_into_trivia = descend_into_trivia;
        self
    }
}

impl fmt::Debug for WalkOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalkOptions")
            .field("span", &self.span)
            .field("descend_into", &self.descend_into.is_some())
            .field("descend_into_trivia", &self.descend_into_trivia)
            .finish()
    }
}

/// Whether an element with `child` full span is visited for `span`.
/// Zero-width elements count when they touch the span.
fn is_in_span(span: TextSpan, child: TextSpan) -> bool {
    span.overlaps_with(child) || (child.is_empty() && span.intersects_with(child))
}

enum Frame {
    Children(RawChildren),
    Elements(std::vec::IntoIter<SyntaxNodeOrToken>),
    Token(SyntaxToken),
}

/// Iterator over the descendants of a node, in document order.
pub struct Descendants<'a> {
    stack: Vec<Frame>,
    options: WalkOptions<'a>,
}

impl<'a> Descendants<'a> {
    fn new(node: &SyntaxNode, options: WalkOptions<'a>) -> Self {
        Descendants {
            stack: vec![Frame::Children(RawChildren::new(node))],
            options,
        }
    }

    fn structures(list: &SyntaxTriviaList) -> Vec<SyntaxNodeOrToken> {
        list.iter()
            .filter_map(|trivia| trivia.structure())
            .map(SyntaxNodeOrToken::Node)
            .collect()
    }
}

impl Iterator for Descendants<'_> {
    type Item = SyntaxNodeOrToken;

    fn next(&mut self) -> Option<SyntaxNodeOrToken> {
        loop {
            let element = match self.stack.last_mut()? {
                Frame::Children(children) => children.next(),
                Frame::Elements(elements) => elements.next(),
                Frame::Token(_) => match self.stack.pop() {
                    Some(Frame::Token(token)) => return Some(SyntaxNodeOrToken::Token(token)),
                    _ => continue,
                },
            };
            let Some(element) = element else {
                self.stack.pop();
                continue;
            };
            if let Some(span) = self.options.span
                && !is_in_span(span, element.full_span())
            {
                continue;
            }
            match element {
                SyntaxNodeOrToken::Node(node) => {
                    let descend = node.is_list() || self.options.descend_into.is_none_or(|predicate| predicate(&node));
                    if descend {
                        self.stack.push(Frame::Children(RawChildren::new(&node)));
                    }
                    if node.is_list() {
                        continue;
                    }
                    return Some(SyntaxNodeOrToken::Node(node));
                }
                SyntaxNodeOrToken::Token(token) => {
                    if !(self.options.descend_into_trivia && token.has_structured_trivia()) {
                        return Some(SyntaxNodeOrToken::Token(token));
                    }
                    let leading = Self::structures(&token.leading_trivia());
                    let trailing = Self::structures(&token.trailing_trivia());
                    self.stack.push(Frame::Elements(trailing.into_iter()));
                    self.stack.push(Frame::Token(token));
                    self.stack.push(Frame::Elements(leading.into_iter()));
                }
            }
        }
    }
}

impl SyntaxNode {
    /// Descendant nodes and tokens (not `self`), in document order.
    #[must_use]
    pub fn descendant_nodes_and_tokens(&self) -> Descendants<'static> {
        Descendants::new(self, WalkOptions::default())
    }

    /// Descendant nodes and tokens under `options`.
    #[must_use]
    pub fn descendant_nodes_and_tokens_with<'a>(&self, options: WalkOptions<'a>) -> Descendants<'a> {
        Descendants::new(self, options)
    }

    /// Descendant nodes (not `self`), in document order.
    pub fn descendant_nodes(&self) -> impl Iterator<Item = SyntaxNode> + use<> {
        self.descendant_nodes_and_tokens()
            .filter_map(SyntaxNodeOrToken::into_node)
    }

    pub fn descendant_nodes_with<'a>(&self, options: WalkOptions<'a>) -> impl Iterator<Item = SyntaxNode> + use<'a> {
        self.descendant_nodes_and_tokens_with(options)
            .filter_map(SyntaxNodeOrToken::into_node)
    }

    /// `self` followed by its descendant nodes.
    pub fn descendant_nodes_and_self(&self) -> impl Iterator<Item = SyntaxNode> + use<> {
        std::iter::once(self.clone()).chain(self.descendant_nodes())
    }

    /// Descendant tokens, in document order.
    pub fn descendant_tokens(&self) -> impl Iterator<Item = SyntaxToken> + use<> {
        self.descendant_nodes_and_tokens()
            .filter_map(SyntaxNodeOrToken::into_token)
    }

    pub fn descendant_tokens_with<'a>(&self, options: WalkOptions<'a>) -> impl Iterator<Item = SyntaxToken> + use<'a> {
        self.descendant_nodes_and_tokens_with(options)
            .filter_map(SyntaxNodeOrToken::into_token)
    }

    /// All trivia in this subtree, in document order.
    #[must_use]
    pub fn descendant_trivia(&self) -> Vec<SyntaxTrivia> {
        self.descendant_trivia_with(WalkOptions::default())
    }

    /// Trivia under `options`. With `descend_into_trivia`, the trivia inside
    /// a structured trivia follows the structured trivia itself.
    #[must_use]
    pub fn descendant_trivia_with(&self, options: WalkOptions<'_>) -> Vec<SyntaxTrivia> {
        let descend_into_trivia = options.descend_into_trivia;
        let tokens = WalkOptions {
            descend_into_trivia: false,
            ..options
        };
        let mut out = Vec::new();
        for token in self.descendant_tokens_with(tokens) {
            for trivia in token.leading_trivia().iter().chain(token.trailing_trivia().iter()) {
                if let Some(span) = options.span
                    && !is_in_span(span, trivia.span())
                {
                    continue;
                }
                let structure = descend_into_trivia.then(|| trivia.structure()).flatten();
                out.push(trivia);
                if let Some(structure) = structure {
                    out.extend(structure.descendant_trivia_with(options));
                }
            }
        }
        out
    }
}
