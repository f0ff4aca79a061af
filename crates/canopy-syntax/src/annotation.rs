//! Syntax annotations.
//!
//! An annotation is an opaque marker attached to a green node through the
//! side tables. Annotations compare by identity: two annotations created with
//! the same kind and data are still different markers. Cloning an annotation
//! keeps its identity.

use once_cell::sync::Lazy;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ANNOTATION_ID: AtomicU64 = AtomicU64::new(1);

static ELASTIC: Lazy<SyntaxAnnotation> =
    Lazy::new(|| SyntaxAnnotation::with_kind(SyntaxAnnotation::ELASTIC_KIND));

#[derive(Clone)]
pub struct SyntaxAnnotation {
    id: u64,
    kind: Option<Arc<str>>,
    data: Option<Arc<str>>,
}

impl SyntaxAnnotation {
    /// Kind of the process-wide elastic marker.
    pub const ELASTIC_KIND: &'static str = "Elastic";

    /// A fresh annotation without kind or data.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: NEXT_ANNOTATION_ID.fetch_add(1, Ordering::Relaxed),
            kind: None,
            data: None,
        }
    }

    /// A fresh annotation of `kind`.
    #[must_use]
    pub fn with_kind(kind: impl Into<Arc<str>>) -> Self {
        Self {
            kind: Some(kind.into()),
            ..Self::new()
        }
    }

    /// A fresh annotation of `kind` carrying `data`.
    #[must_use]
    pub fn with_data(kind: impl Into<Arc<str>>, data: impl Into<Arc<str>>) -> Self {
        Self {
            kind: Some(kind.into()),
            data: Some(data.into()),
            ..Self::new()
        }
    }

    /// The shared marker placed on synthesized tokens whose trivia a
    /// formatter may adjust freely.
    #[must_use]
    pub fn elastic() -> SyntaxAnnotation {
        ELASTIC.clone()
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    #[must_use]
    pub fn data(&self) -> Option<&str> {
        self.data.as_deref()
    }

    #[must_use]
    pub fn is_elastic(&self) -> bool {
        self.id == ELASTIC.id
    }
}

impl Default for SyntaxAnnotation {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for SyntaxAnnotation {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for SyntaxAnnotation {}

impl Hash for SyntaxAnnotation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for SyntaxAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Annotation#{}", self.id)?;
        if let Some(kind) = &self.kind {
            write!(f, "({kind}")?;
            if let Some(data) = &self.data {
                write!(f, ": {data}")?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}
