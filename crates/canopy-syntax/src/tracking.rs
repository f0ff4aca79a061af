//! Node tracking across rewrites.
//!
//! `track` stamps nodes with a per-node marker annotation. Annotations live on
//! green nodes and survive any rewrite that keeps or clones the node, so the
//! "current" versions of a tracked node in a later tree are the nodes carrying
//! its marker. Lookups build a marker -> nodes map once per (true) root and
//! cache it weakly; a map whose nodes were dropped is rebuilt on demand.

use std::sync::{Arc, Weak};

use dashmap::DashMap;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::annotation::SyntaxAnnotation;
use crate::error::EditError;
use crate::red::node::NodeData;
use crate::red::{SyntaxNode, WalkOptions};

/// Annotation kind of tracking markers.
pub const TRACKING_ANNOTATION_KIND: &str = "canopy.tracked";

type CurrentNodes = FxHashMap<SyntaxAnnotation, Vec<Weak<NodeData>>>;

struct TrackedNode {
    node: Weak<NodeData>,
    marker: SyntaxAnnotation,
}

struct RootMap {
    root: Weak<NodeData>,
    nodes: Arc<CurrentNodes>,
}

/// Markers of tracked nodes and the per-root lookup caches.
#[derive(Default)]
pub struct NodeTracker {
    /// Keyed by red node identity.
    markers: DashMap<usize, TrackedNode>,
    /// Keyed by true-root identity.
    roots: DashMap<usize, RootMap>,
}

impl NodeTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A new version of `root` in which every node of `nodes` carries its
    /// tracking marker. Nodes that already carry one keep it.
    pub fn track(&self, root: &SyntaxNode, nodes: &[SyntaxNode]) -> Result<SyntaxNode, EditError> {
        for node in nodes {
            if !node.is_descendant_of(root) {
                return Err(EditError::InvalidNodeToTrack {
                    kind: node.kind(),
                    span: node.full_span(),
                });
            }
        }
        self.markers.retain(|_, tracked| tracked.node.strong_count() > 0);
        let tracked = root.replace_nodes(nodes, |original, rewritten| {
            let marker = self.marker_for(original);
            if rewritten.has_annotation(&marker) {
                rewritten.clone()
            } else {
                rewritten.with_additional_annotations([marker])
            }
        })?;
        debug!(count = nodes.len(), "tracked nodes");
        Ok(tracked)
    }

    pub fn track_node(&self, root: &SyntaxNode, node: &SyntaxNode) -> Result<SyntaxNode, EditError> {
        self.track(root, std::slice::from_ref(node))
    }

    /// Whether `node` has a tracking marker.
    #[must_use]
    pub fn is_tracked(&self, node: &SyntaxNode) -> bool {
        self.existing_marker(node).is_some()
    }

    /// Every node in `root`'s tree that descends from the tracked `original`.
    /// Empty when `original` was never tracked or has been removed.
    #[must_use]
    pub fn current_nodes(&self, root: &SyntaxNode, original: &SyntaxNode) -> Vec<SyntaxNode> {
        let Some(marker) = self.existing_marker(original) else {
            return Vec::new();
        };
        let root = root.true_root();
        if let Some(nodes) = self.cached(&root, &marker) {
            return nodes;
        }
        self.rebuild(&root, &marker)
    }

    /// The single current node for `original`, if there is exactly one.
    #[must_use]
    pub fn current_node(&self, root: &SyntaxNode, original: &SyntaxNode) -> Option<SyntaxNode> {
        let mut nodes = self.current_nodes(root, original);
        if nodes.len() == 1 { nodes.pop() } else { None }
    }

    fn marker_for(&self, node: &SyntaxNode) -> SyntaxAnnotation {
        if let Some(marker) = self.existing_marker(node) {
            return marker;
        }
        let marker = SyntaxAnnotation::with_kind(TRACKING_ANNOTATION_KIND);
        self.markers.insert(
            node.identity(),
            TrackedNode {
                node: node.downgrade(),
                marker: marker.clone(),
            },
        );
        marker
    }

    /// The marker recorded for `node`, or the one its green already carries.
    fn existing_marker(&self, node: &SyntaxNode) -> Option<SyntaxAnnotation> {
        if let Some(tracked) = self.markers.get(&node.identity())
            && tracked.node.upgrade().is_some_and(|data| Arc::ptr_eq(&data, node.data()))
        {
            return Some(tracked.marker.clone());
        }
        node.green()
            .annotations_of_kind(TRACKING_ANNOTATION_KIND)
            .into_iter()
            .next()
    }

    /// Current nodes from the cached map, if it is there and still alive.
    fn cached(&self, root: &SyntaxNode, marker: &SyntaxAnnotation) -> Option<Vec<SyntaxNode>> {
        let entry = self.roots.get(&root.identity())?;
        if !entry.root.upgrade().is_some_and(|data| Arc::ptr_eq(&data, root.data())) {
            return None;
        }
        let Some(weak_nodes) = entry.nodes.get(marker) else {
            return Some(Vec::new());
        };
        weak_nodes
            .iter()
            .map(|weak| weak.upgrade().and_then(SyntaxNode::from_data))
            .collect()
    }

    fn rebuild(&self, root: &SyntaxNode, marker: &SyntaxAnnotation) -> Vec<SyntaxNode> {
        let descend = |node: &SyntaxNode| node.contains_annotations();
        let options = WalkOptions::default()
            .with_descend_into(&descend)
            .with_trivia(true);
        let mut current: FxHashMap<SyntaxAnnotation, Vec<SyntaxNode>> = FxHashMap::default();
        let candidates = std::iter::once(root.clone()).chain(root.descendant_nodes_with(options));
        for node in candidates {
            if !node.green().has_annotations_of_kind(TRACKING_ANNOTATION_KIND) {
                continue;
            }
            for found in node.green().annotations_of_kind(TRACKING_ANNOTATION_KIND) {
                current.entry(found).or_default().push(node.clone());
            }
        }
        debug!(markers = current.len(), "built tracking map");

        let weak: CurrentNodes = current
            .iter()
            .map(|(found, nodes)| (found.clone(), nodes.iter().map(SyntaxNode::downgrade).collect()))
            .collect();
        self.roots.retain(|_, entry| entry.root.strong_count() > 0);
        self.roots.insert(
            root.identity(),
            RootMap {
                root: root.downgrade(),
                nodes: Arc::new(weak),
            },
        );
        current.remove(marker).unwrap_or_default()
    }
}

impl std::fmt::Debug for NodeTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeTracker")
            .field("tracked", &self.markers.len())
            .field("roots", &self.roots.len())
            .finish()
    }
}
