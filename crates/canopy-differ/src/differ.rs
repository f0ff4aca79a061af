//! The tree differ.
//!
//! Two stacks hold the pending old and new elements, seeded with the two
//! roots. Each step compares the tops: identical elements are skipped, nodes
//! that look alike are expanded into their children, and elements that match
//! something a few entries deeper on the other stack mark the elements before
//! that match as inserted or deleted. Whatever is left pairs up as a plain
//! replacement. Consumed elements become change records; records that touch
//! in the old text are merged, and a final pass strips the text the two sides
//! of each record have in common.
//!
//! Every pair of inputs produces a valid result. In the worst case that is a
//! single replacement of the whole document.

use canopy_common::limits::MAX_DIFF_SEARCH_LENGTH;
use canopy_common::{TextChange, TextChangeRange, TextSize, TextSpan};
use canopy_syntax::{GreenNode, SyntaxNode, SyntaxNodeOrToken, SyntaxTree};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use tracing::{debug, trace};

type Elements = SmallVec<[SyntaxNodeOrToken; 4]>;

/// A replacement of old elements by new ones, before text reduction.
#[derive(Debug)]
struct ChangeRecord {
    range: TextChangeRange,
    old_nodes: Elements,
    new_nodes: Elements,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DiffAction {
    /// The tops are the same green node.
    SkipBoth,
    ReduceOld,
    ReduceNew,
    ReduceBoth,
    /// This many new elements precede the match of the old top.
    InsertNew(usize),
    /// This many old elements precede the match of the new top.
    DeleteOld(usize),
    ReplaceOldWithNew,
}

/// Best match found for an element in a stack. `similarity` orders `None`
/// below every score, so "no match" loses every comparison.
#[derive(Clone, Copy, Debug, Default)]
struct BestMatch {
    index: Option<usize>,
    similarity: Option<TextSize>,
}

impl BestMatch {
    /// Take `index` if it scores strictly higher; earlier entries win ties.
    fn offer(&mut self, index: usize, similarity: TextSize) -> bool {
        if Some(similarity) > self.similarity {
            self.index = Some(index);
            self.similarity = Some(similarity);
            true
        } else {
            false
        }
    }
}

/// Scratch sets reused by every similarity computation.
#[derive(Default)]
struct Similarity {
    nodes: FxHashSet<usize>,
    texts: FxHashSet<String>,
}

impl Similarity {
    /// Amount of text `a` and `b` plausibly share.
    ///
    /// Tokens share their text when it is equal, plus every trivia piece of
    /// `b` whose text also appears around `a`. Nodes share every child of `b`
    /// that is also a child of `a`, or that is a token whose text also
    /// appears among `a`'s tokens.
    fn between(&mut self, a: &SyntaxNodeOrToken, b: &SyntaxNodeOrToken) -> TextSize {
        self.nodes.clear();
        self.texts.clear();
        let mut weight: TextSize = 0;
        match (a, b) {
            (SyntaxNodeOrToken::Token(a), SyntaxNodeOrToken::Token(b)) => {
                if a.text() == b.text() {
                    weight += b.width();
                }
                self.texts.extend(trivia_pieces(a.green()).map(GreenNode::to_full_string));
                weight += trivia_pieces(b.green())
                    .filter(|piece| self.texts.contains(&piece.to_full_string()))
                    .map(GreenNode::full_width)
                    .sum::<TextSize>();
            }
            _ => {
                for child in children(a) {
                    self.nodes.insert(child.green().identity());
                    if let Some(token) = child.as_token() {
                        self.texts.insert(token.text().to_string());
                    }
                }
                for child in children(b) {
                    if self.nodes.contains(&child.green().identity()) {
                        weight += child.full_width();
                    } else if let Some(token) = child.as_token()
                        && self.texts.contains(token.text())
                    {
                        weight += token.width();
                    }
                }
            }
        }
        weight
    }
}

/// Leading then trailing trivia pieces of a token green.
fn trivia_pieces(token: &GreenNode) -> impl Iterator<Item = &GreenNode> {
    token
        .leading_trivia()
        .into_iter()
        .chain(token.trailing_trivia())
        .flat_map(|side| {
            let (list, single) = if side.is_list() { (Some(side), None) } else { (None, Some(side)) };
            list.into_iter().flat_map(|list| list.children()).chain(single)
        })
}

/// Children with tokens of a node; nothing for a token.
fn children(element: &SyntaxNodeOrToken) -> impl Iterator<Item = SyntaxNodeOrToken> {
    element
        .as_node()
        .map(SyntaxNode::children_with_tokens)
        .into_iter()
        .flat_map(|list| list.into_iter())
}

#[inline]
fn are_identical(a: &SyntaxNodeOrToken, b: &SyntaxNodeOrToken) -> bool {
    GreenNode::ptr_eq(a.green(), b.green())
}

#[inline]
fn are_similar(a: &SyntaxNodeOrToken, b: &SyntaxNodeOrToken) -> bool {
    a.kind() == b.kind()
}

/// Stacks keep their top at the end; index 0 is the top.
#[inline]
fn peek(stack: &[SyntaxNodeOrToken], index: usize) -> Option<&SyntaxNodeOrToken> {
    stack.len().checked_sub(index + 1).map(|at| &stack[at])
}

struct TreeDiffer {
    old_nodes: Vec<SyntaxNodeOrToken>,
    new_nodes: Vec<SyntaxNodeOrToken>,
    changes: Vec<ChangeRecord>,
    old_span: TextSpan,
    similarity: Similarity,
}

impl TreeDiffer {
    fn new(old_root: &SyntaxNode, new_root: &SyntaxNode) -> TreeDiffer {
        TreeDiffer {
            old_nodes: vec![SyntaxNodeOrToken::Node(old_root.clone())],
            new_nodes: vec![SyntaxNodeOrToken::Node(new_root.clone())],
            changes: Vec::new(),
            old_span: old_root.full_span(),
            similarity: Similarity::default(),
        }
    }

    fn compute_change_records(&mut self) {
        loop {
            if self.new_nodes.is_empty() {
                if !self.old_nodes.is_empty() {
                    self.record_delete_old(self.old_nodes.len());
                }
                break;
            }
            if self.old_nodes.is_empty() {
                self.record_insert_new(self.new_nodes.len());
                break;
            }
            let action = self.next_action();
            trace!(?action, old = self.old_nodes.len(), new = self.new_nodes.len(), "differ step");
            match action {
                DiffAction::SkipBoth => {
                    self.old_nodes.pop();
                    self.new_nodes.pop();
                }
                DiffAction::ReduceOld => replace_top_with_children(&mut self.old_nodes),
                DiffAction::ReduceNew => replace_top_with_children(&mut self.new_nodes),
                DiffAction::ReduceBoth => {
                    replace_top_with_children(&mut self.old_nodes);
                    replace_top_with_children(&mut self.new_nodes);
                }
                DiffAction::InsertNew(count) => self.record_insert_new(count),
                DiffAction::DeleteOld(count) => self.record_delete_old(count),
                DiffAction::ReplaceOldWithNew => self.record_replace_old_with_new(1, 1),
            }
        }
        debug!(records = self.changes.len(), "computed change records");
    }

    fn next_action(&mut self) -> DiffAction {
        let (Some(old_top), Some(new_top)) = (peek(&self.old_nodes, 0).cloned(), peek(&self.new_nodes, 0).cloned())
        else {
            return DiffAction::ReplaceOldWithNew;
        };
        let old_is_token = old_top.is_token();
        let new_is_token = new_top.is_token();

        let old_in_new = find_best_match(&mut self.similarity, &self.new_nodes, &old_top, 0);
        let new_in_old = find_best_match(&mut self.similarity, &self.old_nodes, &new_top, 0);

        if old_in_new.index == Some(0) && new_in_old.index == Some(0) {
            if are_identical(&old_top, &new_top) {
                return DiffAction::SkipBoth;
            }
            if !old_is_token && !new_is_token {
                return DiffAction::ReduceBoth;
            }
            return DiffAction::ReplaceOldWithNew;
        }

        if old_in_new.index.is_some() || new_in_old.index.is_some() {
            if new_in_old.index.is_none() || old_in_new.similarity >= new_in_old.similarity {
                // The old top reappears later among the new elements, so the
                // new elements before it were probably inserted, unless the
                // old side has a later sibling that matches just as well.
                if let Some(index) = old_in_new.index.filter(|&index| index > 0)
                    && let Some(matched) = peek(&self.new_nodes, index).cloned()
                {
                    let old_in_old = find_best_match(&mut self.similarity, &self.old_nodes, &matched, 1);
                    let old_has_similar_sibling = old_in_old.index.is_some_and(|at| at >= 1)
                        && old_in_old.similarity >= old_in_new.similarity;
                    if !old_has_similar_sibling {
                        return DiffAction::InsertNew(index);
                    }
                }
                if !new_is_token {
                    return if are_similar(&old_top, &new_top) {
                        DiffAction::ReduceBoth
                    } else {
                        DiffAction::ReduceNew
                    };
                }
            } else {
                if let Some(index) = new_in_old.index.filter(|&index| index > 0) {
                    return DiffAction::DeleteOld(index);
                }
                if !old_is_token {
                    return if are_similar(&old_top, &new_top) {
                        DiffAction::ReduceBoth
                    } else {
                        DiffAction::ReduceOld
                    };
                }
            }
        }
        DiffAction::ReplaceOldWithNew
    }

    fn record_delete_old(&mut self, old_count: usize) {
        let old_span = span_of_top(&self.old_nodes, old_count);
        let old_nodes = take_top(&mut self.old_nodes, old_count);
        self.record_change(ChangeRecord {
            range: TextChangeRange::new(old_span, 0),
            old_nodes,
            new_nodes: Elements::new(),
        });
    }

    fn record_insert_new(&mut self, new_count: usize) {
        let new_span = span_of_top(&self.new_nodes, new_count);
        let new_nodes = take_top(&mut self.new_nodes, new_count);
        let start = peek(&self.old_nodes, 0).map_or(self.old_span.end(), SyntaxNodeOrToken::position);
        self.record_change(ChangeRecord {
            range: TextChangeRange::new(TextSpan::empty(start), new_span.length),
            old_nodes: Elements::new(),
            new_nodes,
        });
    }

    fn record_replace_old_with_new(&mut self, old_count: usize, new_count: usize) {
        let old_span = span_of_top(&self.old_nodes, old_count);
        let old_nodes = take_top(&mut self.old_nodes, old_count);
        let new_span = span_of_top(&self.new_nodes, new_count);
        let new_nodes = take_top(&mut self.new_nodes, new_count);
        self.record_change(ChangeRecord {
            range: TextChangeRange::new(old_span, new_span.length),
            old_nodes,
            new_nodes,
        });
    }

    /// Append `change`, merging it into the previous record when the two
    /// touch in the old text.
    fn record_change(&mut self, change: ChangeRecord) {
        if let Some(last) = self.changes.last_mut() {
            if last.range.span.end() == change.range.span.start {
                trace!(at = change.range.span.start, "merged adjacent change records");
                last.range = TextChangeRange::new(
                    TextSpan::new(last.range.span.start, last.range.span.length + change.range.span.length),
                    last.range.new_length + change.range.new_length,
                );
                last.old_nodes.extend(change.old_nodes);
                last.new_nodes.extend(change.new_nodes);
                return;
            }
            debug_assert!(change.range.span.start >= last.range.span.end(), "change records out of order");
        }
        self.changes.push(change);
    }

    /// Change records trimmed to the characters that differ, with new text.
    /// Records that turn out to change nothing are dropped.
    fn reduce_changes(&self) -> Vec<TextChange> {
        let mut reduced = Vec::with_capacity(self.changes.len());
        for record in &self.changes {
            let new_text = full_text(&record.new_nodes);
            let mut span = record.range.span;
            let mut text = new_text.as_str();
            if span.length > 0 && !text.is_empty() {
                let old_text = full_text(&record.old_nodes);
                let (leading, trailing) = common_edge_lengths(&old_text, text);
                if leading > 0 || trailing > 0 {
                    let common = (leading + trailing) as TextSize;
                    span = TextSpan::new(span.start + leading as TextSize, span.length - common);
                    text = &text[leading..text.len() - trailing];
                }
            }
            if span.length == 0 && text.is_empty() {
                continue;
            }
            reduced.push(TextChange::new(span, text));
        }
        reduced
    }

    /// Spans of the new text covered by unreduced change records.
    fn spans_in_new(&self) -> Vec<TextSpan> {
        let mut spans = Vec::new();
        let mut delta: i64 = 0;
        for record in &self.changes {
            let range = record.range;
            if range.new_length > 0 {
                let start = (i64::from(range.span.start) + delta) as TextSize;
                spans.push(TextSpan::new(start, range.new_length));
            }
            delta += i64::from(range.new_length) - i64::from(range.span.length);
        }
        spans
    }
}

/// Where `element` best matches among the first `MAX_DIFF_SEARCH_LENGTH`
/// entries of `stack`, starting at `start_index`, also looking one level
/// into each entry's children.
fn find_best_match(
    similarity: &mut Similarity,
    stack: &[SyntaxNodeOrToken],
    element: &SyntaxNodeOrToken,
    start_index: usize,
) -> BestMatch {
    let mut best = BestMatch::default();
    for (index, candidate) in stack.iter().rev().take(MAX_DIFF_SEARCH_LENGTH).enumerate() {
        if index < start_index {
            continue;
        }
        if are_identical(candidate, element) {
            if best.offer(index, element.full_width()) {
                return best;
            }
            continue;
        }
        if are_similar(candidate, element) {
            let score = similarity.between(candidate, element);
            // A token scoring its whole width may be a textual twin.
            let twin = score == element.full_width()
                && element.is_token()
                && candidate.to_full_string() == element.to_full_string();
            if best.offer(index, score) && twin {
                return best;
            }
            continue;
        }
        for child in children(candidate).take(MAX_DIFF_SEARCH_LENGTH) {
            if are_identical(&child, element) {
                if best.offer(index, element.full_width()) {
                    return best;
                }
            } else if are_similar(&child, element) {
                let score = similarity.between(&child, element);
                best.offer(index, score);
            }
        }
    }
    best
}

/// Replace the top of `stack` by its children of nonzero width.
fn replace_top_with_children(stack: &mut Vec<SyntaxNodeOrToken>) {
    let Some(top) = stack.pop() else {
        return;
    };
    debug_assert!(top.is_node(), "only nodes can be reduced");
    let children: Elements = children(&top).filter(|child| child.full_width() > 0).collect();
    stack.extend(children.into_iter().rev());
}

/// Full span covered by the top `count` entries of `stack`.
fn span_of_top(stack: &[SyntaxNodeOrToken], count: usize) -> TextSpan {
    match (peek(stack, 0), peek(stack, count.saturating_sub(1))) {
        (Some(first), Some(last)) => TextSpan::from_bounds(first.position(), last.end_position()),
        _ => TextSpan::default(),
    }
}

/// Pop the top `count` entries, in document order.
fn take_top(stack: &mut Vec<SyntaxNodeOrToken>, count: usize) -> Elements {
    let split = stack.len().saturating_sub(count);
    stack.drain(split..).rev().collect()
}

fn full_text(elements: &[SyntaxNodeOrToken]) -> String {
    elements.iter().map(SyntaxNodeOrToken::to_full_string).collect()
}

/// Byte lengths of the common prefix and of the common suffix of what
/// remains, both on character boundaries.
fn common_edge_lengths(old: &str, new: &str) -> (usize, usize) {
    let leading: usize = old
        .chars()
        .zip(new.chars())
        .take_while(|(a, b)| a == b)
        .map(|(c, _)| c.len_utf8())
        .sum();
    let trailing: usize = old[leading..]
        .chars()
        .rev()
        .zip(new[leading..].chars().rev())
        .take_while(|(a, b)| a == b)
        .map(|(c, _)| c.len_utf8())
        .sum();
    (leading, trailing)
}

// =============================================================================
// Public API
// =============================================================================

/// Ordered, non-overlapping replacements turning the text of `old` into the
/// text of `new`.
#[must_use]
pub fn node_text_changes(old: &SyntaxNode, new: &SyntaxNode) -> Vec<TextChange> {
    if GreenNode::ptr_eq(old.green(), new.green()) {
        return Vec::new();
    }
    let mut differ = TreeDiffer::new(old, new);
    differ.compute_change_records();
    let changes = differ.reduce_changes();
    debug!(changes = changes.len(), "computed text changes");
    changes
}

/// Spans of the text of `new` that may differ from the text of `old`.
#[must_use]
pub fn node_possibly_different_spans(old: &SyntaxNode, new: &SyntaxNode) -> Vec<TextSpan> {
    if GreenNode::ptr_eq(old.green(), new.green()) {
        return Vec::new();
    }
    let mut differ = TreeDiffer::new(old, new);
    differ.compute_change_records();
    differ.spans_in_new()
}

/// Text changes between two versions of a document.
///
/// A missing `before` means the document did not exist: the result inserts
/// all of `after`. A missing `after` means it was deleted: the result removes
/// all of `before`.
#[must_use]
pub fn text_changes(before: Option<&SyntaxTree>, after: Option<&SyntaxTree>) -> Vec<TextChange> {
    match (before, after) {
        (None, None) => Vec::new(),
        (None, Some(after)) if after.is_empty() => Vec::new(),
        (None, Some(after)) => vec![TextChange::new(TextSpan::empty(0), after.text())],
        (Some(before), None) if before.is_empty() => Vec::new(),
        (Some(before), None) => vec![TextChange::new(TextSpan::new(0, before.len()), String::new())],
        (Some(before), Some(after)) => node_text_changes(before.root(), after.root()),
    }
}

/// `text_changes` without the new text.
#[must_use]
pub fn text_change_ranges(before: Option<&SyntaxTree>, after: Option<&SyntaxTree>) -> Vec<TextChangeRange> {
    text_changes(before, after).iter().map(TextChange::range).collect()
}

/// Spans of `after` that may differ from `before`. Everything may differ in
/// a new document; nothing remains of a deleted one.
#[must_use]
pub fn possibly_different_spans(before: Option<&SyntaxTree>, after: Option<&SyntaxTree>) -> Vec<TextSpan> {
    match (before, after) {
        (_, None) => Vec::new(),
        (None, Some(after)) if after.is_empty() => Vec::new(),
        (None, Some(after)) => vec![TextSpan::new(0, after.len())],
        (Some(before), Some(after)) => node_possibly_different_spans(before.root(), after.root()),
    }
}

#[cfg(test)]
#[path = "../tests/best_match_tests.rs"]
mod best_match_tests;
