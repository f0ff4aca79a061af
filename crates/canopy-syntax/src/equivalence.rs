//! Trivia-insensitive structural equivalence.
//!
//! Two trees are equivalent when they have the same shape, kind for kind, and
//! every pair of tokens agrees on text and missing-ness. Trivia is ignored
//! entirely. An optional predicate names child kinds to skip (for example,
//! function bodies when comparing only signatures); skipped children are
//! removed from both sides before comparing, with list slots flattened.

use smallvec::SmallVec;

use crate::green::GreenNode;
use crate::kind::SyntaxKind;
use crate::red::{SyntaxNode, SyntaxToken};

/// Children of `node` with lists flattened and ignored kinds removed.
fn significant_children<'a>(node: &'a GreenNode, ignore: &dyn Fn(SyntaxKind) -> bool) -> SmallVec<[&'a GreenNode; 8]> {
    let mut out = SmallVec::new();
    for child in node.children() {
        if child.is_list() {
            out.extend(child.children().filter(|element| element.is_token() || !ignore(element.kind())));
        } else if child.is_token() || !ignore(child.kind()) {
            out.push(child);
        }
    }
    out
}

/// Whether `before` and `after` are structurally equivalent.
///
/// Tokens are compared by kind, missing-ness and text. Nodes are compared
/// slot by slot, or, when `ignore_child_kind` is given, by their flattened
/// children after dropping nodes whose kind it accepts.
#[must_use]
pub fn are_equivalent(
    before: &GreenNode,
    after: &GreenNode,
    ignore_child_kind: Option<&dyn Fn(SyntaxKind) -> bool>,
) -> bool {
    let mut stack: Vec<(&GreenNode, &GreenNode)> = vec![(before, after)];
    while let Some((left, right)) = stack.pop() {
        if GreenNode::ptr_eq(left, right) {
            continue;
        }
        if left.kind() != right.kind() {
            return false;
        }
        if left.is_token() || right.is_token() {
            if left.is_token() != right.is_token()
                || left.is_missing() != right.is_missing()
                || left.token_text() != right.token_text()
            {
                return false;
            }
            continue;
        }
        match ignore_child_kind {
            Some(ignore) => {
                let left_children = significant_children(left, ignore);
                let right_children = significant_children(right, ignore);
                if left_children.len() != right_children.len() {
                    return false;
                }
                stack.extend(left_children.into_iter().zip(right_children));
            }
            None => {
                if left.slot_count() != right.slot_count() {
                    return false;
                }
                for (a, b) in left.slots().zip(right.slots()) {
                    match (a, b) {
                        (None, None) => {}
                        (Some(a), Some(b)) => stack.push((a, b)),
                        _ => return false,
                    }
                }
            }
        }
    }
    true
}

/// `are_equivalent` over optional nodes: two absent nodes are equivalent.
#[must_use]
pub fn are_equivalent_nodes(
    before: Option<&SyntaxNode>,
    after: Option<&SyntaxNode>,
    ignore_child_kind: Option<&dyn Fn(SyntaxKind) -> bool>,
) -> bool {
    match (before, after) {
        (None, None) => true,
        (Some(before), Some(after)) => are_equivalent(before.green(), after.green(), ignore_child_kind),
        _ => false,
    }
}

impl SyntaxNode {
    /// Structural equivalence, ignoring trivia.
    #[must_use]
    pub fn is_equivalent_to(&self, other: &SyntaxNode) -> bool {
        are_equivalent(self.green(), other.green(), None)
    }
}

impl SyntaxToken {
    /// Same kind, text and missing-ness.
    #[must_use]
    pub fn is_equivalent_to(&self, other: &SyntaxToken) -> bool {
        are_equivalent(self.green(), other.green(), None)
    }
}
