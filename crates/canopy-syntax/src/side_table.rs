//! Out-of-band storage for diagnostics and annotations.
//!
//! Green nodes only carry *flags* saying whether they (or a descendant) have
//! diagnostics or annotations. The content lives here, keyed by node
//! identity. Nodes without side data never touch the table, and a node's
//! entry is removed when the node is dropped, so the table never extends a
//! node's lifetime.
//!
//! Every operation that "adds" side data builds a new green node; existing
//! nodes are never changed.

use std::sync::Arc;

use canopy_common::DiagnosticInfo;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use rustc_hash::FxBuildHasher;

use crate::annotation::SyntaxAnnotation;
use crate::green::{GreenNode, NodeFlags};

static GLOBAL: Lazy<SideTables> = Lazy::new(SideTables::new);

static EMPTY_DIAGNOSTICS: Lazy<Arc<[DiagnosticInfo]>> = Lazy::new(|| Arc::from(Vec::new()));

static EMPTY_ANNOTATIONS: Lazy<Arc<[SyntaxAnnotation]>> = Lazy::new(|| Arc::from(Vec::new()));

/// Diagnostics and annotations owned by one green node.
#[derive(Clone, Debug)]
pub(crate) struct SideEntry {
    pub(crate) diagnostics: Arc<[DiagnosticInfo]>,
    pub(crate) annotations: Arc<[SyntaxAnnotation]>,
}

impl Default for SideEntry {
    fn default() -> Self {
        Self {
            diagnostics: EMPTY_DIAGNOSTICS.clone(),
            annotations: EMPTY_ANNOTATIONS.clone(),
        }
    }
}

impl SideEntry {
    pub(crate) fn is_empty(&self) -> bool {
        self.diagnostics.is_empty() && self.annotations.is_empty()
    }

    /// Flags the owning node must carry for this entry.
    pub(crate) fn flags(&self) -> NodeFlags {
        let mut flags = NodeFlags::empty();
        if !self.diagnostics.is_empty() {
            flags |= NodeFlags::CONTAINS_DIAGNOSTICS;
        }
        if !self.annotations.is_empty() {
            flags |= NodeFlags::CONTAINS_ANNOTATIONS;
        }
        flags
    }
}

/// Identity-keyed table of side data.
pub struct SideTables {
    entries: DashMap<usize, SideEntry, FxBuildHasher>,
}

impl SideTables {
    fn new() -> Self {
        SideTables {
            entries: DashMap::with_hasher(FxBuildHasher),
        }
    }

    /// The process-wide table.
    #[must_use]
    pub fn global() -> &'static SideTables {
        &GLOBAL
    }

    pub(crate) fn entry(&self, node: &GreenNode) -> Option<SideEntry> {
        if !node.flags().intersects(NodeFlags::SIDE_DATA_MASK) {
            return None;
        }
        self.entries.get(&node.identity()).map(|entry| entry.clone())
    }

    pub(crate) fn attach(&self, node: &GreenNode, entry: SideEntry) {
        debug_assert!(node.flags().contains(entry.flags()));
        self.entries.insert(node.identity(), entry);
    }

    pub(crate) fn forget(&self, identity: usize) {
        self.entries.remove(&identity);
    }

    /// Diagnostics attached directly to `node`.
    #[must_use]
    pub fn diagnostics(&self, node: &GreenNode) -> Arc<[DiagnosticInfo]> {
        if !node.contains_diagnostics() {
            return EMPTY_DIAGNOSTICS.clone();
        }
        self.entries
            .get(&node.identity())
            .map_or_else(|| EMPTY_DIAGNOSTICS.clone(), |entry| entry.diagnostics.clone())
    }

    /// Annotations attached directly to `node`.
    #[must_use]
    pub fn annotations(&self, node: &GreenNode) -> Arc<[SyntaxAnnotation]> {
        if !node.contains_annotations() {
            return EMPTY_ANNOTATIONS.clone();
        }
        self.entries
            .get(&node.identity())
            .map_or_else(|| EMPTY_ANNOTATIONS.clone(), |entry| entry.annotations.clone())
    }

    /// Number of nodes that currently own side data.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Side data on green nodes
// =============================================================================

impl GreenNode {
    fn with_side_entry(&self, entry: SideEntry) -> GreenNode {
        GreenNode::from_payload_with_side(self.kind(), self.flags(), self.payload().clone(), Some(entry))
    }

    fn side_entry(&self) -> SideEntry {
        SideTables::global().entry(self).unwrap_or_default()
    }

    #[must_use]
    pub fn diagnostics(&self) -> Arc<[DiagnosticInfo]> {
        SideTables::global().diagnostics(self)
    }

    /// The same node with its own diagnostics replaced by `diagnostics`.
    #[must_use]
    pub fn with_diagnostics<I>(&self, diagnostics: I) -> GreenNode
    where
        I: IntoIterator<Item = DiagnosticInfo>,
    {
        let entry = SideEntry {
            diagnostics: diagnostics.into_iter().collect(),
            ..self.side_entry()
        };
        self.with_side_entry(entry)
    }

    /// The same node with one more diagnostic.
    #[must_use]
    pub fn add_error(&self, diagnostic: DiagnosticInfo) -> GreenNode {
        let mut diagnostics = self.diagnostics().to_vec();
        diagnostics.push(diagnostic);
        self.with_diagnostics(diagnostics)
    }

    #[must_use]
    pub fn annotations(&self) -> Arc<[SyntaxAnnotation]> {
        SideTables::global().annotations(self)
    }

    #[must_use]
    pub fn has_annotations(&self) -> bool {
        !self.annotations().is_empty()
    }

    #[must_use]
    pub fn has_annotation(&self, annotation: &SyntaxAnnotation) -> bool {
        self.contains_annotations() && self.annotations().contains(annotation)
    }

    #[must_use]
    pub fn has_annotations_of_kind(&self, kind: &str) -> bool {
        self.contains_annotations() && self.annotations().iter().any(|a| a.kind() == Some(kind))
    }

    #[must_use]
    pub fn annotations_of_kind(&self, kind: &str) -> Vec<SyntaxAnnotation> {
        self.annotations()
            .iter()
            .filter(|a| a.kind() == Some(kind))
            .cloned()
            .collect()
    }

    /// The same node with exactly `annotations` (duplicates collapsed).
    #[must_use]
    pub fn with_annotations<I>(&self, annotations: I) -> GreenNode
    where
        I: IntoIterator<Item = SyntaxAnnotation>,
    {
        let mut unique: Vec<SyntaxAnnotation> = Vec::new();
        for annotation in annotations {
            if !unique.contains(&annotation) {
                unique.push(annotation);
            }
        }
        if unique.is_empty() && !self.has_annotations() {
            return self.clone();
        }
        let entry = SideEntry {
            annotations: unique.into(),
            ..self.side_entry()
        };
        self.with_side_entry(entry)
    }

    /// The same node with `annotations` added; returns `self` when all of
    /// them are already present.
    #[must_use]
    pub fn with_additional_annotations<I>(&self, annotations: I) -> GreenNode
    where
        I: IntoIterator<Item = SyntaxAnnotation>,
    {
        let current = self.annotations();
        let mut merged = current.to_vec();
        for annotation in annotations {
            if !merged.contains(&annotation) {
                merged.push(annotation);
            }
        }
        if merged.len() == current.len() {
            return self.clone();
        }
        let entry = SideEntry {
            annotations: merged.into(),
            ..self.side_entry()
        };
        self.with_side_entry(entry)
    }

    /// The same node without `annotations`; returns `self` when none of them
    /// are present.
    #[must_use]
    pub fn without_annotations<'a, I>(&self, annotations: I) -> GreenNode
    where
        I: IntoIterator<Item = &'a SyntaxAnnotation>,
    {
        let removed: Vec<&SyntaxAnnotation> = annotations.into_iter().collect();
        self.retain_annotations(|annotation| !removed.contains(&annotation))
    }

    /// The same node without annotations of `kind`.
    #[must_use]
    pub fn without_annotations_of_kind(&self, kind: &str) -> GreenNode {
        self.retain_annotations(|annotation| annotation.kind() != Some(kind))
    }

    fn retain_annotations(&self, keep: impl Fn(&SyntaxAnnotation) -> bool) -> GreenNode {
        let current = self.annotations();
        let kept: Vec<SyntaxAnnotation> = current.iter().filter(|a| keep(a)).cloned().collect();
        if kept.len() == current.len() {
            return self.clone();
        }
        let entry = SideEntry {
            annotations: kept.into(),
            ..self.side_entry()
        };
        self.with_side_entry(entry)
    }
}
