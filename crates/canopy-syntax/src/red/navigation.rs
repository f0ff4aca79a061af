//! Token navigation and positional lookup.
//!
//! All walks here use the raw slot structure (a list is visited like any other
//! node) and explicit stacks, so deep trees never recurse on the call stack.
//! Which tokens count and which structured trivia are entered is decided by a
//! `TokenFilter`.

use canopy_common::{TextSize, TextSpan};

use super::element::SyntaxNodeOrToken;
use super::node::SyntaxNode;
use super::token::SyntaxToken;
use super::trivia::SyntaxTrivia;
use crate::green::GreenNode;
use crate::kind::TriviaStructure;
use crate::lists::SyntaxTriviaList;

// =============================================================================
// TokenFilter
// =============================================================================

/// Which tokens a navigation step accepts, and which structured trivia it
/// steps into.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TokenFilter {
    /// Accept tokens without text (missing tokens, end of file).
    pub include_zero_width: bool,
    /// Step into skipped-tokens trivia.
    pub include_skipped: bool,
    /// Step into directive trivia.
    pub include_directives: bool,
    /// Step into any other structured trivia.
    pub include_structured_trivia: bool,
}

impl TokenFilter {
    /// Only tokens with text; never enter trivia.
    pub const DEFAULT: TokenFilter = TokenFilter {
        include_zero_width: false,
        include_skipped: false,
        include_directives: false,
        include_structured_trivia: false,
    };

    /// Every token, entering every structured trivia.
    pub const ALL: TokenFilter = TokenFilter {
        include_zero_width: true,
        include_skipped: true,
        include_directives: true,
        include_structured_trivia: true,
    };

    #[must_use]
    pub const fn with_zero_width(mut self, include: bool) -> Self {
        self.include_zero_width = include;
        self
    }

    #[must_use]
    pub const fn with_skipped(mut self, include: bool) -> Self {
        self.include_skipped = include;
        self
    }

    #[must_use]
    pub const fn with_directives(mut self, include: bool) -> Self {
        self.include_directives = include;
        self
    }

    #[must_use]
    pub const fn with_structured_trivia(mut self, include: bool) -> Self {
        self.include_structured_trivia = include;
        self
    }

    #[inline]
    fn accepts(self, token: &SyntaxToken) -> bool {
        self.include_zero_width || token.width() > 0
    }

    #[inline]
    fn steps_into_any(self) -> bool {
        self.include_skipped || self.include_directives || self.include_structured_trivia
    }

    /// Whether navigation enters the structure of `trivia`.
    #[must_use]
    pub fn steps_into(self, trivia: &SyntaxTrivia) -> bool {
        match trivia.structure_kind() {
            None => false,
            Some(TriviaStructure::SkippedTokens) => self.include_skipped,
            Some(TriviaStructure::Directive) => self.include_directives,
            Some(TriviaStructure::Other) => self.include_structured_trivia,
        }
    }
}

// =============================================================================
// Raw children
// =============================================================================

/// Raw slot children of a node (a list slot yields the list node), tracking
/// positions from both ends.
pub(crate) struct RawChildren {
    node: SyntaxNode,
    front: usize,
    back: usize,
    front_position: TextSize,
    back_position: TextSize,
}

impl RawChildren {
    pub(crate) fn new(node: &SyntaxNode) -> Self {
        Self::starting_at(node, 0)
    }

    /// Children from slot `start` on.
    pub(crate) fn starting_at(node: &SyntaxNode, start: usize) -> Self {
        let count = node.green().slot_count();
        let start = start.min(count);
        RawChildren {
            front_position: node.position() + node.green().slot_offset(start),
            back_position: node.end_position(),
            front: start,
            back: count,
            node: node.clone(),
        }
    }

    /// Children before slot `end`.
    pub(crate) fn ending_at(node: &SyntaxNode, end: usize) -> Self {
        let end = end.min(node.green().slot_count());
        RawChildren {
            front_position: node.position(),
            back_position: node.position() + node.green().slot_offset(end),
            front: 0,
            back: end,
            node: node.clone(),
        }
    }

    fn element(&self, index: usize, green: &GreenNode, position: TextSize) -> Option<SyntaxNodeOrToken> {
        if green.is_token() {
            Some(SyntaxNodeOrToken::Token(SyntaxToken::new(
                Some(self.node.clone()),
                green.clone(),
                position,
                index,
            )))
        } else {
            self.node.node_slot(index).map(SyntaxNodeOrToken::Node)
        }
    }
}

impl Iterator for RawChildren {
    type Item = SyntaxNodeOrToken;

    fn next(&mut self) -> Option<SyntaxNodeOrToken> {
        while self.front < self.back {
            let index = self.front;
            self.front += 1;
            let Some(green) = self.node.green().slot(index).cloned() else {
                continue;
            };
            let position = self.front_position;
            self.front_position += green.full_width();
            return self.element(index, &green, position);
        }
        None
    }
}

impl DoubleEndedIterator for RawChildren {
    fn next_back(&mut self) -> Option<SyntaxNodeOrToken> {
        while self.front < self.back {
            self.back -= 1;
            let index = self.back;
            let Some(green) = self.node.green().slot(index).cloned() else {
                continue;
            };
            self.back_position -= green.full_width();
            return self.element(index, &green, self.back_position);
        }
        None
    }
}

// =============================================================================
// First / last token
// =============================================================================

fn structure_tokens_first(list: &SyntaxTriviaList, filter: TokenFilter) -> Option<SyntaxToken> {
    list.iter()
        .filter(|trivia| filter.steps_into(trivia))
        .find_map(|trivia| first_token_of(&trivia.structure()?, filter))
}

fn structure_tokens_last(list: &SyntaxTriviaList, filter: TokenFilter) -> Option<SyntaxToken> {
    list.reversed()
        .filter(|trivia| filter.steps_into(trivia))
        .find_map(|trivia| last_token_of(&trivia.structure()?, filter))
}

/// First acceptable token at `token`: inside its leading trivia, the token
/// itself, or inside its trailing trivia.
fn first_token_at(token: SyntaxToken, filter: TokenFilter) -> Option<SyntaxToken> {
    if filter.steps_into_any() && token.has_structured_trivia() {
        if let Some(found) = structure_tokens_first(&token.leading_trivia(), filter) {
            return Some(found);
        }
    }
    if filter.accepts(&token) {
        return Some(token);
    }
    if filter.steps_into_any() && token.has_structured_trivia() {
        return structure_tokens_first(&token.trailing_trivia(), filter);
    }
    None
}

fn last_token_at(token: SyntaxToken, filter: TokenFilter) -> Option<SyntaxToken> {
    if filter.steps_into_any() && token.has_structured_trivia() {
        if let Some(found) = structure_tokens_last(&token.trailing_trivia(), filter) {
            return Some(found);
        }
    }
    if filter.accepts(&token) {
        return Some(token);
    }
    if filter.steps_into_any() && token.has_structured_trivia() {
        return structure_tokens_last(&token.leading_trivia(), filter);
    }
    None
}

fn first_token_in(element: SyntaxNodeOrToken, filter: TokenFilter) -> Option<SyntaxToken> {
    match element {
        SyntaxNodeOrToken::Token(token) => first_token_at(token, filter),
        SyntaxNodeOrToken::Node(node) => first_token_of(&node, filter),
    }
}

fn last_token_in(element: SyntaxNodeOrToken, filter: TokenFilter) -> Option<SyntaxToken> {
    match element {
        SyntaxNodeOrToken::Token(token) => last_token_at(token, filter),
        SyntaxNodeOrToken::Node(node) => last_token_of(&node, filter),
    }
}

fn first_token_of(node: &SyntaxNode, filter: TokenFilter) -> Option<SyntaxToken> {
    let mut stack = vec![RawChildren::new(node)];
    while let Some(mut children) = stack.pop() {
        let Some(child) = children.next() else {
            continue;
        };
        stack.push(children);
        match child {
            SyntaxNodeOrToken::Token(token) => {
                if let Some(found) = first_token_at(token, filter) {
                    return Some(found);
                }
            }
            SyntaxNodeOrToken::Node(child) => {
                if filter.include_zero_width || child.full_width() > 0 {
                    stack.push(RawChildren::new(&child));
                }
            }
        }
    }
    None
}

fn last_token_of(node: &SyntaxNode, filter: TokenFilter) -> Option<SyntaxToken> {
    let mut stack = vec![RawChildren::new(node)];
    while let Some(mut children) = stack.pop() {
        let Some(child) = children.next_back() else {
            continue;
        };
        stack.push(children);
        match child {
            SyntaxNodeOrToken::Token(token) => {
                if let Some(found) = last_token_at(token, filter) {
                    return Some(found);
                }
            }
            SyntaxNodeOrToken::Node(child) => {
                if filter.include_zero_width || child.full_width() > 0 {
                    stack.push(RawChildren::new(&child));
                }
            }
        }
    }
    None
}

// =============================================================================
// Next / previous token
// =============================================================================

/// First acceptable token after `node`, climbing through ancestors and out of
/// structured trivia.
fn next_token_after_node(node: &SyntaxNode, filter: TokenFilter) -> Option<SyntaxToken> {
    let mut node = node.clone();
    while let Some(parent) = node.raw_parent() {
        let found = RawChildren::starting_at(&parent, node.index_in_parent() + 1)
            .find_map(|sibling| first_token_in(sibling, filter));
        if found.is_some() {
            return found;
        }
        node = parent;
    }
    let trivia = node.parent_trivia()?.clone();
    next_token_after_trivia(&trivia, filter)
}

fn previous_token_before_node(node: &SyntaxNode, filter: TokenFilter) -> Option<SyntaxToken> {
    let mut node = node.clone();
    while let Some(parent) = node.raw_parent() {
        let found = RawChildren::ending_at(&parent, node.index_in_parent())
            .rev()
            .find_map(|sibling| last_token_in(sibling, filter));
        if found.is_some() {
            return found;
        }
        node = parent;
    }
    let trivia = node.parent_trivia()?.clone();
    previous_token_before_trivia(&trivia, filter)
}

fn next_token_after_token(
    token: &SyntaxToken,
    filter: TokenFilter,
    search_trailing_trivia: bool,
) -> Option<SyntaxToken> {
    let parent = token.raw_parent()?;
    if search_trailing_trivia && filter.steps_into_any() {
        if let Some(found) = structure_tokens_first(&token.trailing_trivia(), filter) {
            return Some(found);
        }
    }
    let found = RawChildren::starting_at(&parent, token.index_in_parent() + 1)
        .find_map(|sibling| first_token_in(sibling, filter));
    found.or_else(|| next_token_after_node(&parent, filter))
}

fn previous_token_before_token(
    token: &SyntaxToken,
    filter: TokenFilter,
    search_leading_trivia: bool,
) -> Option<SyntaxToken> {
    let parent = token.raw_parent()?;
    if search_leading_trivia && filter.steps_into_any() {
        if let Some(found) = structure_tokens_last(&token.leading_trivia(), filter) {
            return Some(found);
        }
    }
    let found = RawChildren::ending_at(&parent, token.index_in_parent())
        .rev()
        .find_map(|sibling| last_token_in(sibling, filter));
    found.or_else(|| previous_token_before_node(&parent, filter))
}

/// Next token after a trivia: later structured trivia of the same token, the
/// token itself when the trivia was leading, then onward.
fn next_token_after_trivia(trivia: &SyntaxTrivia, filter: TokenFilter) -> Option<SyntaxToken> {
    let token = trivia.token()?;
    let after = |list: SyntaxTriviaList, skip: usize| {
        list.iter()
            .skip(skip)
            .filter(|trivia| filter.steps_into(trivia))
            .find_map(|trivia| first_token_of(&trivia.structure()?, filter))
    };
    if trivia.is_leading() {
        if let Some(found) = after(token.leading_trivia(), trivia.index() + 1) {
            return Some(found);
        }
        if filter.accepts(token) {
            return Some(token.clone());
        }
        if let Some(found) = after(token.trailing_trivia(), 0) {
            return Some(found);
        }
    } else if let Some(found) = after(token.trailing_trivia(), trivia.index() + 1) {
        return Some(found);
    }
    next_token_after_token(token, filter, false)
}

fn previous_token_before_trivia(trivia: &SyntaxTrivia, filter: TokenFilter) -> Option<SyntaxToken> {
    let token = trivia.token()?;
    let before = |list: SyntaxTriviaList, end: usize| {
        list.iter()
            .take(end)
            .rev()
            .filter(|trivia| filter.steps_into(trivia))
            .find_map(|trivia| last_token_of(&trivia.structure()?, filter))
    };
    if !trivia.is_leading() {
        if let Some(found) = before(token.trailing_trivia(), trivia.index()) {
            return Some(found);
        }
        if filter.accepts(token) {
            return Some(token.clone());
        }
        let leading = token.leading_trivia();
        let count = leading.len();
        if let Some(found) = before(leading, count) {
            return Some(found);
        }
    } else if let Some(found) = before(token.leading_trivia(), trivia.index()) {
        return Some(found);
    }
    previous_token_before_token(token, filter, false)
}

// =============================================================================
// Public navigation API
// =============================================================================

impl SyntaxNode {
    /// First token of this node with text.
    #[must_use]
    pub fn first_token(&self) -> Option<SyntaxToken> {
        first_token_of(self, TokenFilter::DEFAULT)
    }

    /// Last token of this node with text.
    #[must_use]
    pub fn last_token(&self) -> Option<SyntaxToken> {
        last_token_of(self, TokenFilter::DEFAULT)
    }

    #[must_use]
    pub fn first_token_with(&self, filter: TokenFilter) -> Option<SyntaxToken> {
        first_token_of(self, filter)
    }

    #[must_use]
    pub fn last_token_with(&self, filter: TokenFilter) -> Option<SyntaxToken> {
        last_token_of(self, filter)
    }

    /// The token whose full span contains `position`.
    ///
    /// At the end of a root, the root's last token (zero-width included, such
    /// as an end-of-file token) is returned. With `find_inside_trivia`, a
    /// position inside structured trivia yields the token of the structure.
    /// `None` when the position is outside this node.
    #[must_use]
    pub fn find_token(&self, position: TextSize, find_inside_trivia: bool) -> Option<SyntaxToken> {
        let filter = if find_inside_trivia { TokenFilter::ALL } else { TokenFilter::DEFAULT };
        self.find_token_with(position, filter)
    }

    /// Like `find_token`, entering the structured trivia `filter` steps into.
    #[must_use]
    pub fn find_token_with(&self, position: TextSize, filter: TokenFilter) -> Option<SyntaxToken> {
        let mut token = if position == self.end_position() && self.raw_parent().is_none() {
            last_token_of(self, TokenFilter::DEFAULT.with_zero_width(true))?
        } else if self.full_span().contains(position) {
            self.find_token_internal(position)?
        } else {
            return None;
        };
        if filter.steps_into_any() {
            while let Some(trivia) = trivia_of_token_at(&token, position) {
                if !filter.steps_into(&trivia) {
                    break;
                }
                let Some(structure) = trivia.structure() else {
                    break;
                };
                let Some(inner) = structure.find_token_internal(position) else {
                    break;
                };
                token = inner;
            }
        }
        Some(token)
    }

    fn find_token_internal(&self, position: TextSize) -> Option<SyntaxToken> {
        let mut current = self.clone();
        loop {
            match current.raw_child_containing(position)? {
                SyntaxNodeOrToken::Token(token) => return Some(token),
                SyntaxNodeOrToken::Node(node) => current = node,
            }
        }
    }

    /// The trivia whose span contains `position`.
    #[must_use]
    pub fn find_trivia(&self, position: TextSize, find_inside_trivia: bool) -> Option<SyntaxTrivia> {
        if !self.full_span().contains(position) {
            return None;
        }
        let mut node = self.clone();
        loop {
            let token = node.find_token_internal(position)?;
            let trivia = trivia_of_token_at(&token, position)?;
            if find_inside_trivia
                && let Some(structure) = trivia.structure()
            {
                node = structure;
                continue;
            }
            return Some(trivia);
        }
    }

    /// The node that best covers `span`: the lowest ancestor of the token at
    /// `span.start` whose full span contains `span`.
    ///
    /// Unless `innermost` is set, ties (parents with the same full span) are
    /// resolved toward the outermost node, stopping at `self` and below the
    /// tree root.
    #[must_use]
    pub fn find_node(&self, span: TextSpan, find_inside_trivia: bool, innermost: bool) -> Option<SyntaxNode> {
        if !self.full_span().contains_span(span) {
            return None;
        }
        let token = self.find_token(span.start, find_inside_trivia)?;
        let mut node = token
            .parent()?
            .ancestors_and_self_through_trivia()
            .find(|candidate| candidate.full_span().contains_span(span))?;
        if !innermost {
            while !SyntaxNode::ptr_eq(&node, self) {
                let Some(parent) = node.parent() else {
                    break;
                };
                if parent.full_width() != node.full_width() || parent.parent().is_none() {
                    break;
                }
                node = parent;
            }
        }
        Some(node)
    }
}

/// The trivia of `token` containing `position`, if the position falls in its
/// leading or trailing trivia.
fn trivia_of_token_at(token: &SyntaxToken, position: TextSize) -> Option<SyntaxTrivia> {
    let span = token.span();
    let list = if position < span.start {
        token.leading_trivia()
    } else if position >= span.end() {
        token.trailing_trivia()
    } else {
        return None;
    };
    list.iter()
        .take_while(|trivia| trivia.position() <= position)
        .find(|trivia| trivia.span().contains(position))
}

impl SyntaxToken {
    /// The next token with text, in document order.
    #[must_use]
    pub fn next_token(&self) -> Option<SyntaxToken> {
        self.next_token_with(TokenFilter::DEFAULT)
    }

    #[must_use]
    pub fn previous_token(&self) -> Option<SyntaxToken> {
        self.previous_token_with(TokenFilter::DEFAULT)
    }

    /// The next token accepted by `filter`, entering structured trivia the
    /// filter steps into, and leaving structured trivia into the enclosing
    /// tree.
    #[must_use]
    pub fn next_token_with(&self, filter: TokenFilter) -> Option<SyntaxToken> {
        if self.raw_parent_ref().is_none() {
            return None;
        }
        next_token_after_token(self, filter, true)
    }

    #[must_use]
    pub fn previous_token_with(&self, filter: TokenFilter) -> Option<SyntaxToken> {
        if self.raw_parent_ref().is_none() {
            return None;
        }
        previous_token_before_token(self, filter, true)
    }
}
