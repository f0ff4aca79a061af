//! Publish-once cells used to memoize positioned children.
//!
//! Both cells follow the same protocol: read; if empty, build a candidate and
//! try to publish it with a single compare-and-swap. If another thread
//! published first, the candidate is dropped and the published value is
//! returned. No thread ever blocks and every reader of a slot sees the same
//! instance.

use std::fmt;
use std::sync::{Arc, Weak};

use arc_swap::ArcSwapAny;
use once_cell::race::OnceBox;

/// A strongly held, write-once cell.
pub(crate) struct OnceSlot<T> {
    cell: OnceBox<T>,
}

impl<T> OnceSlot<T> {
    pub(crate) const fn new() -> Self {
        Self {
            cell: OnceBox::new(),
        }
    }

    #[inline]
    pub(crate) fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    /// The published value, publishing `make()` if the cell is empty.
    ///
    /// `make` may run on several threads at once; all but one result are
    /// dropped.
    #[inline]
    pub(crate) fn get_or_init(&self, make: impl FnOnce() -> T) -> &T {
        self.cell.get_or_init(|| Box::new(make()))
    }
}

impl<T> Default for OnceSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for OnceSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(value) => f.debug_tuple("OnceSlot").field(value).finish(),
            None => f.write_str("OnceSlot(<empty>)"),
        }
    }
}

/// A weakly held cell. The value is re-created after its last strong holder
/// drops it.
pub(crate) struct WeakSlot<T> {
    cell: ArcSwapAny<Weak<T>>,
}

impl<T> WeakSlot<T> {
    pub(crate) fn new() -> Self {
        Self {
            cell: ArcSwapAny::new(Weak::new()),
        }
    }

    /// The live value, if one is published and still referenced.
    #[inline]
    pub(crate) fn get(&self) -> Option<Arc<T>> {
        self.cell.load().upgrade()
    }

    /// The live value, publishing `make()` if there is none.
    pub(crate) fn get_or_init(&self, make: impl FnOnce() -> Arc<T>) -> Arc<T> {
        let mut current: Weak<T> = (*self.cell.load()).clone();
        if let Some(live) = current.upgrade() {
            return live;
        }
        let fresh = make();
        loop {
            let previous = self.cell.compare_and_swap(&current, Arc::downgrade(&fresh));
            if Weak::ptr_eq(&previous, &current) {
                return fresh;
            }
            if let Some(winner) = previous.upgrade() {
                return winner;
            }
            // The winner is already gone; retry against it.
            current = (*previous).clone();
        }
    }
}

impl<T> Default for WeakSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for WeakSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let live = self.get().is_some();
        f.debug_struct("WeakSlot").field("live", &live).finish()
    }
}
