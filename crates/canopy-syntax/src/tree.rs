//! `SyntaxTree`: a root together with the file it was parsed from.

use std::fmt;
use std::sync::Arc;

use canopy_common::{Diagnostic, TextSize};

use crate::green::GreenNode;
use crate::red::SyntaxNode;

#[derive(Clone)]
pub struct SyntaxTree {
    root: SyntaxNode,
    file_path: Arc<str>,
}

impl SyntaxTree {
    /// A tree over `root`.
    ///
    /// # Panics
    ///
    /// Panics if `root` is a token or plain trivia.
    #[must_use]
    pub fn new(root: GreenNode, file_path: impl Into<Arc<str>>) -> SyntaxTree {
        SyntaxTree::from_root(SyntaxNode::new_root(root), file_path)
    }

    /// A tree over an existing red root. A non-root node is re-rooted.
    #[must_use]
    pub fn from_root(root: SyntaxNode, file_path: impl Into<Arc<str>>) -> SyntaxTree {
        let root = if root.parent().is_some() || root.parent_trivia().is_some() {
            SyntaxNode::new_root(root.green().clone())
        } else {
            root
        };
        SyntaxTree {
            root,
            file_path: file_path.into(),
        }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> &SyntaxNode {
        &self.root
    }

    #[inline]
    #[must_use]
    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    /// The same file with a new root.
    #[must_use]
    pub fn with_root(&self, root: SyntaxNode) -> SyntaxTree {
        SyntaxTree::from_root(root, self.file_path.clone())
    }

    /// The full source text.
    #[must_use]
    pub fn text(&self) -> String {
        self.root.to_full_string()
    }

    #[must_use]
    pub fn len(&self) -> TextSize {
        self.root.full_width()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every diagnostic in the tree, located in this tree's file.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.root.diagnostics_in_file(&self.file_path)
    }
}

impl fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("file_path", &self.file_path)
            .field("root", &self.root)
            .finish()
    }
}
