//! Tree rewriting: replace, insert and remove nodes, tokens and trivia.
//!
//! Every operation returns a new tree and leaves the original untouched. A
//! single pass walks down only into elements whose full span touches one of
//! the targets, rebuilds the targets, and rebuilds each ancestor around its
//! new children with `with_slots`, so untouched subtrees are shared with the
//! old tree and ancestors keep their diagnostics and annotations.
//!
//! Targets are matched by green identity and absolute position, which
//! identifies a red element uniquely within one tree (a parent's green can
//! never be its child's green).
//!
//! A replacement may produce zero, one or several elements. In a list they
//! are spliced in place; in a fixed slot several elements become a list and
//! zero leave the slot empty. Lists that alternate node/separator keep that
//! shape: missing separators are synthesized from an existing one and
//! surplus separators are dropped.

use bitflags::bitflags;
use canopy_common::{TextSize, TextSpan};
use rustc_hash::FxHashSet;
use smallvec::{SmallVec, smallvec};
use tracing::debug;

use crate::annotation::SyntaxAnnotation;
use crate::error::EditError;
use crate::green::{GreenListBuilder, GreenNode};
use crate::kind::TriviaStructure;
use crate::red::navigation::RawChildren;
use crate::red::{SyntaxNode, SyntaxNodeOrToken, SyntaxToken, SyntaxTrivia};

bitflags! {
    /// Which trivia of a removed node survives the removal.
    ///
    /// Kept trivia is prepended to the leading trivia of the token that
    /// follows the removed node, or appended to the trailing trivia of the
    /// last token of the tree when nothing follows.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct RemoveOptions: u8 {
        /// The leading trivia of the removed node's first token.
        const KEEP_LEADING_TRIVIA = 1 << 0;
        /// The trailing trivia of the removed node's last token.
        const KEEP_TRAILING_TRIVIA = 1 << 1;
        const KEEP_EXTERIOR_TRIVIA = Self::KEEP_LEADING_TRIVIA.bits() | Self::KEEP_TRAILING_TRIVIA.bits();
        /// Directive trivia anywhere inside the removed node.
        const KEEP_DIRECTIVES = 1 << 2;
    }
}

impl RemoveOptions {
    pub const KEEP_NO_TRIVIA: RemoveOptions = RemoveOptions::empty();
}

type Splice = SmallVec<[GreenNode; 1]>;
type Key = (usize, TextSize);

type NodeEdit<'f> = &'f mut dyn FnMut(&SyntaxNode, &GreenNode) -> Splice;
type TokenEdit<'f> = &'f mut dyn FnMut(&SyntaxToken, &GreenNode) -> Splice;
type TriviaEdit<'f> = &'f mut dyn FnMut(&SyntaxTrivia, &GreenNode) -> Splice;

fn node_key(node: &SyntaxNode) -> Key {
    (node.green().identity(), node.position())
}

fn token_key(token: &SyntaxToken) -> Key {
    (token.green().identity(), token.position())
}

fn trivia_key(trivia: &SyntaxTrivia) -> Key {
    (trivia.green().identity(), trivia.position())
}

/// The elements of a single-or-list trivia value.
fn trivia_elements(trivia: Option<&GreenNode>) -> impl Iterator<Item = &GreenNode> {
    let (list, single) = match trivia {
        Some(green) if green.is_list() => (Some(green), None),
        other => (None, other),
    };
    list.into_iter().flat_map(GreenNode::children).chain(single)
}

/// The value stored in a fixed slot for a splice.
fn slot_value(results: &[GreenNode]) -> Option<GreenNode> {
    match results {
        [] => None,
        [single] => Some(single.clone()),
        many => {
            let mut builder = GreenListBuilder::with_capacity(many.len());
            builder.add_range(many);
            builder.into_list()
        }
    }
}

fn unchanged(results: &[GreenNode], original: &GreenNode) -> bool {
    matches!(results, [single] if GreenNode::ptr_eq(single, original))
}

/// Whether a list alternates node, separator, node, ... with at least one
/// separator.
fn is_separated_shape(list: &GreenNode) -> bool {
    list.slot_count() >= 2
        && list
            .children()
            .enumerate()
            .all(|(index, child)| child.is_token() == (index % 2 == 1))
}

/// A fresh separator shaped like `model`, without trivia.
fn synthesize_separator(model: &GreenNode) -> GreenNode {
    GreenNode::token(model.kind(), model.token_text(), None, None)
        .with_additional_annotations([SyntaxAnnotation::elastic()])
}

/// Restore node/separator alternation after a splice.
fn repair_separated(elements: Vec<GreenNode>, model: &GreenNode, allow_trailing: bool) -> Vec<GreenNode> {
    let mut out: Vec<GreenNode> = Vec::with_capacity(elements.len());
    for element in elements {
        let previous_is_token = out.last().is_none_or(GreenNode::is_token);
        if element.is_token() {
            if !previous_is_token {
                out.push(element);
            }
        } else {
            if !previous_is_token {
                out.push(synthesize_separator(model));
            }
            out.push(element);
        }
    }
    if !allow_trailing && out.last().is_some_and(GreenNode::is_token) {
        out.pop();
    }
    out
}

/// Append `trivia` to the trailing trivia of the last token under `green`.
fn append_to_last_token(green: &GreenNode, trivia: Vec<GreenNode>) -> GreenNode {
    let mut path: Vec<(GreenNode, usize)> = Vec::new();
    let mut current = green.clone();
    while !current.is_token() {
        let Some(index) = (0..current.slot_count()).rev().find(|&index| current.slot(index).is_some()) else {
            return green.clone();
        };
        let Some(child) = current.slot(index).cloned() else {
            return green.clone();
        };
        path.push((current, index));
        current = child;
    }
    let mut builder = GreenListBuilder::new();
    builder.add_range(trivia_elements(current.trailing_trivia()));
    builder.add_range(&trivia);
    let mut rebuilt = current.with_trailing_trivia(builder.into_list());
    while let Some((parent, index)) = path.pop() {
        let slots = parent
            .slots()
            .enumerate()
            .map(|(slot, child)| if slot == index { Some(rebuilt.clone()) } else { child.cloned() });
        rebuilt = if parent.is_list() {
            GreenNode::list(slots.flatten()).unwrap_or(rebuilt)
        } else {
            parent.with_slots(slots.collect::<Vec<_>>())
        };
    }
    rebuilt
}

// =============================================================================
// The rewriting pass
// =============================================================================

#[derive(Default)]
struct Rewriter<'f> {
    spans: Vec<TextSpan>,
    nodes: FxHashSet<Key>,
    tokens: FxHashSet<Key>,
    trivia: FxHashSet<Key>,
    removals: FxHashSet<Key>,
    remove_options: RemoveOptions,
    /// Trivia of removed nodes waiting for the next token.
    residual: Vec<GreenNode>,
    on_node: Option<NodeEdit<'f>>,
    on_token: Option<TokenEdit<'f>>,
    on_trivia: Option<TriviaEdit<'f>>,
}

impl<'f> Rewriter<'f> {
    fn add_node(&mut self, root: &SyntaxNode, node: &SyntaxNode) -> Result<(), EditError> {
        ensure_in_tree(root, node)?;
        self.spans.push(node.full_span());
        self.nodes.insert(node_key(node));
        Ok(())
    }

    fn add_token(&mut self, root: &SyntaxNode, token: &SyntaxToken) -> Result<(), EditError> {
        match token.raw_parent_ref() {
            Some(parent) if parent.is_descendant_of(root) => {}
            _ => {
                return Err(EditError::NodeNotInTree {
                    kind: token.kind(),
                    span: token.full_span(),
                });
            }
        }
        self.spans.push(token.full_span());
        self.tokens.insert(token_key(token));
        Ok(())
    }

    fn add_trivia(&mut self, root: &SyntaxNode, trivia: &SyntaxTrivia) -> Result<(), EditError> {
        match trivia.token().and_then(SyntaxToken::raw_parent_ref) {
            Some(parent) if parent.is_descendant_of(root) => {}
            _ => {
                return Err(EditError::NodeNotInTree {
                    kind: trivia.kind(),
                    span: trivia.full_span(),
                });
            }
        }
        self.spans.push(trivia.full_span());
        self.trivia.insert(trivia_key(trivia));
        Ok(())
    }

    fn add_removal(&mut self, root: &SyntaxNode, node: &SyntaxNode) -> Result<(), EditError> {
        ensure_in_tree(root, node)?;
        self.spans.push(node.full_span());
        self.removals.insert(node_key(node));
        Ok(())
    }

    fn should_visit(&self, span: TextSpan) -> bool {
        self.spans.iter().any(|target| target.intersects_with(span))
    }

    /// Rewrite `root`, returning the elements that take its place.
    fn run(mut self, root: &SyntaxNode) -> Splice {
        debug!(
            targets = self.spans.len(),
            removals = self.removals.len(),
            "rewrite pass"
        );
        let mut results = self.visit(SyntaxNodeOrToken::Node(root.clone()));
        if !self.residual.is_empty()
            && let Some(last) = results.last_mut()
        {
            let residual = std::mem::take(&mut self.residual);
            *last = append_to_last_token(last, residual);
        }
        results
    }

    fn visit(&mut self, element: SyntaxNodeOrToken) -> Splice {
        if !self.should_visit(element.full_span()) {
            return smallvec![element.green().clone()];
        }
        match element {
            SyntaxNodeOrToken::Node(node) => self.visit_node(&node),
            SyntaxNodeOrToken::Token(token) => self.visit_token(&token),
        }
    }

    fn visit_node(&mut self, node: &SyntaxNode) -> Splice {
        if node.is_list() {
            return self.visit_list(node);
        }
        let key = node_key(node);
        if self.removals.contains(&key) {
            self.absorb_removed(&SyntaxNodeOrToken::Node(node.clone()));
            return Splice::new();
        }
        let rewritten = self.rebuild_node(node);
        if self.nodes.contains(&key)
            && let Some(edit) = self.on_node.as_mut()
        {
            return edit(node, &rewritten);
        }
        smallvec![rewritten]
    }

    fn rebuild_node(&mut self, node: &SyntaxNode) -> GreenNode {
        let green = node.green();
        let mut changed = false;
        let mut slots = Vec::with_capacity(green.slot_count());
        let mut position = node.position();
        for index in 0..green.slot_count() {
            let Some(child) = green.slot(index) else {
                slots.push(None);
                continue;
            };
            let element = if child.is_token() {
                SyntaxNodeOrToken::Token(SyntaxToken::new(Some(node.clone()), child.clone(), position, index))
            } else {
                match node.node_slot(index) {
                    Some(child_node) => SyntaxNodeOrToken::Node(child_node),
                    None => {
                        slots.push(Some(child.clone()));
                        continue;
                    }
                }
            };
            position += child.full_width();
            let results = self.visit(element);
            if unchanged(&results, child) {
                slots.push(Some(child.clone()));
            } else {
                changed = true;
                slots.push(slot_value(&results));
            }
        }
        if changed {
            green.with_slots(slots)
        } else {
            green.clone()
        }
    }

    /// A list visit returns the list green itself when nothing changed, or
    /// its new elements otherwise.
    fn visit_list(&mut self, list: &SyntaxNode) -> Splice {
        let elements: Vec<SyntaxNodeOrToken> = RawChildren::new(list).collect();
        let separated = is_separated_shape(list.green());
        let count = elements.len();

        let mut removed = vec![false; count];
        if !self.removals.is_empty() {
            for index in (0..count).rev() {
                let Some(node) = elements[index].as_node() else {
                    continue;
                };
                if !self.removals.contains(&node_key(node)) {
                    continue;
                }
                removed[index] = true;
                if separated {
                    let separator = if index + 1 < count && !removed[index + 1] {
                        Some(index + 1)
                    } else {
                        index.checked_sub(1).filter(|&previous| !removed[previous])
                    };
                    if let Some(separator) = separator {
                        removed[separator] = true;
                        // The token after the separator must receive the residual trivia.
                        self.spans.push(elements[separator].full_span());
                    }
                }
            }
        }

        let mut changed = false;
        let mut out: Vec<GreenNode> = Vec::with_capacity(count);
        for (index, element) in elements.into_iter().enumerate() {
            if removed[index] {
                self.absorb_removed(&element);
                changed = true;
                continue;
            }
            let original = element.green().clone();
            let results = self.visit(element);
            changed |= !unchanged(&results, &original);
            out.extend(results);
        }
        if !changed {
            return smallvec![list.green().clone()];
        }
        if separated
            && let Some(model) = list.green().slot(1)
        {
            let allow_trailing = list.green().children().next_back().is_some_and(GreenNode::is_token);
            out = repair_separated(out, model, allow_trailing);
        }
        out.into_iter().collect()
    }

    fn visit_token(&mut self, token: &SyntaxToken) -> Splice {
        let mut green = token.green().clone();
        if !self.trivia.is_empty() || token.has_structured_trivia() {
            let leading = self.rebuild_trivia(&token.leading_trivia().iter().collect::<Vec<_>>());
            let trailing = self.rebuild_trivia(&token.trailing_trivia().iter().collect::<Vec<_>>());
            if let Some(leading) = leading {
                green = green.with_leading_trivia(leading);
            }
            if let Some(trailing) = trailing {
                green = green.with_trailing_trivia(trailing);
            }
        }
        if !self.residual.is_empty() {
            let mut builder = GreenListBuilder::new();
            builder.add_range(&std::mem::take(&mut self.residual));
            builder.add_range(trivia_elements(green.leading_trivia()));
            green = green.with_leading_trivia(builder.into_list());
        }
        if self.tokens.contains(&token_key(token))
            && let Some(edit) = self.on_token.as_mut()
        {
            return edit(token, &green);
        }
        smallvec![green]
    }

    /// New trivia value for a token side, or `None` when unchanged.
    fn rebuild_trivia(&mut self, trivia: &[SyntaxTrivia]) -> Option<Option<GreenNode>> {
        let mut changed = false;
        let mut out: Vec<GreenNode> = Vec::with_capacity(trivia.len());
        for item in trivia {
            if !self.should_visit(item.full_span()) {
                out.push(item.green().clone());
                continue;
            }
            let mut rewritten: Splice = match item.structure() {
                Some(structure) => self.visit_node(&structure),
                None => smallvec![item.green().clone()],
            };
            if self.trivia.contains(&trivia_key(item))
                && let Some(edit) = self.on_trivia.as_mut()
                && let [single] = rewritten.as_slice()
            {
                rewritten = edit(item, single);
            }
            changed |= !unchanged(&rewritten, item.green());
            out.extend(rewritten);
        }
        changed.then(|| GreenNode::list(out))
    }

    /// Collect the trivia a removed element leaves behind.
    fn absorb_removed(&mut self, element: &SyntaxNodeOrToken) {
        let options = self.remove_options;
        if options.is_empty() {
            return;
        }
        let tokens: Vec<&GreenNode> = green_tokens(element.green());
        let (Some(first), Some(last)) = (tokens.first(), tokens.last()) else {
            return;
        };
        let keep_leading = options.contains(RemoveOptions::KEEP_LEADING_TRIVIA);
        let keep_trailing = options.contains(RemoveOptions::KEEP_TRAILING_TRIVIA);
        if keep_leading {
            self.residual.extend(trivia_elements(first.leading_trivia()).cloned());
        }
        if options.contains(RemoveOptions::KEEP_DIRECTIVES) {
            let count = tokens.len();
            for (index, token) in tokens.iter().enumerate() {
                let leading = !(keep_leading && index == 0);
                let trailing = !(keep_trailing && index + 1 == count);
                let sides = leading
                    .then(|| token.leading_trivia())
                    .flatten()
                    .into_iter()
                    .chain(trailing.then(|| token.trailing_trivia()).flatten());
                self.residual.extend(
                    sides
                        .flat_map(|side| trivia_elements(Some(side)))
                        .filter(|trivia| trivia.structure() == Some(TriviaStructure::Directive))
                        .cloned(),
                );
            }
        }
        if keep_trailing {
            self.residual.extend(trivia_elements(last.trailing_trivia()).cloned());
        }
    }
}

/// Tokens under `green`, in order.
fn green_tokens(green: &GreenNode) -> Vec<&GreenNode> {
    let mut out = Vec::new();
    let mut stack = vec![green];
    while let Some(node) = stack.pop() {
        if node.is_token() {
            out.push(node);
        } else {
            stack.extend(node.children().rev());
        }
    }
    out
}

fn ensure_in_tree(root: &SyntaxNode, node: &SyntaxNode) -> Result<(), EditError> {
    if node.is_descendant_of(root) {
        Ok(())
    } else {
        Err(EditError::NodeNotInTree {
            kind: node.kind(),
            span: node.full_span(),
        })
    }
}

/// The single root a pass produced.
///
/// # Panics
///
/// Panics when the root itself was replaced by zero or several elements.
fn single_root(results: Splice) -> SyntaxNode {
    match results.as_slice() {
        [root] => SyntaxNode::new_root(root.clone()),
        other => panic!("the root of a rewrite must stay a single node, got {} elements", other.len()),
    }
}

// =============================================================================
// Public API
// =============================================================================

impl SyntaxNode {
    /// Replace `old` (a descendant-or-self) with `new`.
    pub fn replace_node(&self, old: &SyntaxNode, new: GreenNode) -> Result<SyntaxNode, EditError> {
        self.replace_node_with_nodes(old, vec![new])
    }

    /// Replace each of `nodes`; `compute` receives the original node and its
    /// green after any nested targets were already rewritten.
    pub fn replace_nodes<F>(&self, nodes: &[SyntaxNode], mut compute: F) -> Result<SyntaxNode, EditError>
    where
        F: FnMut(&SyntaxNode, &GreenNode) -> GreenNode,
    {
        let mut edit = |node: &SyntaxNode, rewritten: &GreenNode| -> Splice { smallvec![compute(node, rewritten)] };
        let mut rewriter = Rewriter::default();
        for node in nodes {
            rewriter.add_node(self, node)?;
        }
        rewriter.on_node = Some(&mut edit);
        Ok(single_root(rewriter.run(self)))
    }

    /// Replace `old` with zero or more nodes. In an alternating separated
    /// list, separators are synthesized or dropped to keep the alternation.
    pub fn replace_node_with_nodes(&self, old: &SyntaxNode, new: Vec<GreenNode>) -> Result<SyntaxNode, EditError> {
        let mut edit = |_: &SyntaxNode, _: &GreenNode| -> Splice { new.iter().cloned().collect() };
        let mut rewriter = Rewriter::default();
        rewriter.add_node(self, old)?;
        rewriter.on_node = Some(&mut edit);
        Ok(single_root(rewriter.run(self)))
    }

    /// Insert `new` right before `anchor`.
    pub fn insert_nodes_before(&self, anchor: &SyntaxNode, new: Vec<GreenNode>) -> Result<SyntaxNode, EditError> {
        self.insert_nodes(anchor, new, true)
    }

    /// Insert `new` right after `anchor`.
    pub fn insert_nodes_after(&self, anchor: &SyntaxNode, new: Vec<GreenNode>) -> Result<SyntaxNode, EditError> {
        self.insert_nodes(anchor, new, false)
    }

    fn insert_nodes(&self, anchor: &SyntaxNode, new: Vec<GreenNode>, before: bool) -> Result<SyntaxNode, EditError> {
        let mut edit = |_: &SyntaxNode, rewritten: &GreenNode| -> Splice {
            let mut out: Splice = SmallVec::with_capacity(new.len() + 1);
            if !before {
                out.push(rewritten.clone());
            }
            out.extend(new.iter().cloned());
            if before {
                out.push(rewritten.clone());
            }
            out
        };
        let mut rewriter = Rewriter::default();
        rewriter.add_node(self, anchor)?;
        rewriter.on_node = Some(&mut edit);
        Ok(single_root(rewriter.run(self)))
    }

    pub fn replace_token(&self, old: &SyntaxToken, new: GreenNode) -> Result<SyntaxNode, EditError> {
        self.replace_tokens(std::slice::from_ref(old), |_, _| new.clone())
    }

    /// Replace each of `tokens`; `compute` receives the original token and
    /// its green with rewritten trivia.
    pub fn replace_tokens<F>(&self, tokens: &[SyntaxToken], mut compute: F) -> Result<SyntaxNode, EditError>
    where
        F: FnMut(&SyntaxToken, &GreenNode) -> GreenNode,
    {
        let mut edit = |token: &SyntaxToken, rewritten: &GreenNode| -> Splice { smallvec![compute(token, rewritten)] };
        let mut rewriter = Rewriter::default();
        for token in tokens {
            rewriter.add_token(self, token)?;
        }
        rewriter.on_token = Some(&mut edit);
        Ok(single_root(rewriter.run(self)))
    }

    /// Replace each of `trivia`, including trivia inside structured trivia.
    pub fn replace_trivia<F>(&self, trivia: &[SyntaxTrivia], mut compute: F) -> Result<SyntaxNode, EditError>
    where
        F: FnMut(&SyntaxTrivia, &GreenNode) -> GreenNode,
    {
        let mut edit = |item: &SyntaxTrivia, rewritten: &GreenNode| -> Splice { smallvec![compute(item, rewritten)] };
        let mut rewriter = Rewriter::default();
        for item in trivia {
            rewriter.add_trivia(self, item)?;
        }
        rewriter.on_trivia = Some(&mut edit);
        Ok(single_root(rewriter.run(self)))
    }

    /// Replace one trivia with zero or more trivia.
    pub fn replace_trivia_with(&self, old: &SyntaxTrivia, new: Vec<GreenNode>) -> Result<SyntaxNode, EditError> {
        debug_assert!(new.iter().all(GreenNode::is_trivia));
        let mut edit = |_: &SyntaxTrivia, _: &GreenNode| -> Splice { new.iter().cloned().collect() };
        let mut rewriter = Rewriter::default();
        rewriter.add_trivia(self, old)?;
        rewriter.on_trivia = Some(&mut edit);
        Ok(single_root(rewriter.run(self)))
    }

    /// Replace nodes, tokens and trivia in one pass.
    pub fn replace_syntax<N, T, V>(
        &self,
        nodes: &[SyntaxNode],
        mut compute_node: N,
        tokens: &[SyntaxToken],
        mut compute_token: T,
        trivia: &[SyntaxTrivia],
        mut compute_trivia: V,
    ) -> Result<SyntaxNode, EditError>
    where
        N: FnMut(&SyntaxNode, &GreenNode) -> GreenNode,
        T: FnMut(&SyntaxToken, &GreenNode) -> GreenNode,
        V: FnMut(&SyntaxTrivia, &GreenNode) -> GreenNode,
    {
        let mut on_node = |node: &SyntaxNode, green: &GreenNode| -> Splice { smallvec![compute_node(node, green)] };
        let mut on_token = |token: &SyntaxToken, green: &GreenNode| -> Splice { smallvec![compute_token(token, green)] };
        let mut on_trivia = |item: &SyntaxTrivia, green: &GreenNode| -> Splice { smallvec![compute_trivia(item, green)] };
        let mut rewriter = Rewriter::default();
        for node in nodes {
            rewriter.add_node(self, node)?;
        }
        for token in tokens {
            rewriter.add_token(self, token)?;
        }
        for item in trivia {
            rewriter.add_trivia(self, item)?;
        }
        rewriter.on_node = Some(&mut on_node);
        rewriter.on_token = Some(&mut on_token);
        rewriter.on_trivia = Some(&mut on_trivia);
        Ok(single_root(rewriter.run(self)))
    }

    /// Remove `node`. Returns `None` when `node` is `self`.
    pub fn remove_node(&self, node: &SyntaxNode, options: RemoveOptions) -> Result<Option<SyntaxNode>, EditError> {
        self.remove_nodes(std::slice::from_ref(node), options)
    }

    /// Remove `nodes`. In a separated list the separator after a removed
    /// element goes with it, or the one before it for the last element.
    pub fn remove_nodes(&self, nodes: &[SyntaxNode], options: RemoveOptions) -> Result<Option<SyntaxNode>, EditError> {
        let mut rewriter = Rewriter {
            remove_options: options,
            ..Rewriter::default()
        };
        for node in nodes {
            rewriter.add_removal(self, node)?;
        }
        let results = rewriter.run(self);
        Ok(match results.as_slice() {
            [] => None,
            [root] => Some(SyntaxNode::new_root(root.clone())),
            other => panic!("removal produced {} roots", other.len()),
        })
    }

    /// A copy of this node with slot `index` set to `value`, as a new root.
    ///
    /// # Panics
    ///
    /// Panics when `index` is out of range or `self` is a token-like node.
    #[must_use]
    pub fn with_slot(&self, index: usize, value: Option<GreenNode>) -> SyntaxNode {
        let green = self.green();
        assert!(index < green.slot_count(), "slot {index} out of range for {:?}", green.kind());
        let slots = green
            .slots()
            .enumerate()
            .map(|(slot, child)| if slot == index { value.clone() } else { child.cloned() });
        SyntaxNode::new_root(green.with_slots(slots.collect::<Vec<_>>()))
    }
}
