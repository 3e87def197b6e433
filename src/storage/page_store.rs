//! Page Store - simulated block storage for B-tree nodes.
//!
//! The [`PageStore`] plays the role of a disk: it hands out page handles,
//! serves child reads and accepts writes. Nothing is actually persisted;
//! every access is counted so that tests can assert the exact I/O cost of
//! tree operations.

use std::fmt;

use tracing::debug;

use crate::common::PageId;
use crate::storage::page::Node;
use crate::storage::IoStats;

/// Arena of B-tree nodes addressed by [`PageId`].
///
/// # Layout
/// ```text
/// ┌─────────┬─────────┬─────────┬─────────┬─────────┐
/// │ Page 0  │ Page 1  │ Page 2  │  ...    │ Page N  │
/// └─────────┴─────────┴─────────┴─────────┴─────────┘
///   pages: Vec<Node<K>>, PageId(i) lives at pages[i]
/// ```
///
/// Pages are never freed individually. A node that falls out of the tree
/// (for example the right half of a merge) stays in the arena, unreachable,
/// until the store itself is dropped.
///
/// # Accounting
/// - [`allocate`](Self::allocate) counts one allocation
/// - [`read`](Self::read) counts one read per child page returned
/// - [`write`](Self::write) counts one write
///
/// [`get`](Self::get) is uncounted and reserved for debug collaborators
/// (validator, text codec, graphviz) that inspect the tree from outside.
pub struct PageStore<K> {
    pages: Vec<Node<K>>,
    stats: IoStats,
}

impl<K> PageStore<K> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            stats: IoStats::new(),
        }
    }

    /// Inspect a page without counting a read.
    pub fn get(&self, page_id: PageId) -> Option<&Node<K>> {
        self.pages.get(page_id.index())
    }

    /// Mutable access to a page without counting I/O.
    #[cfg(test)]
    pub(crate) fn get_mut(&mut self, page_id: PageId) -> Option<&mut Node<K>> {
        self.pages.get_mut(page_id.index())
    }

    /// Access a page whose handle came from this store.
    ///
    /// # Panics
    /// Panics if `page_id` was not produced by this store.
    #[inline]
    pub(crate) fn node(&self, page_id: PageId) -> &Node<K> {
        &self.pages[page_id.index()]
    }

    /// Mutable counterpart of [`node`](Self::node).
    ///
    /// # Panics
    /// Panics if `page_id` was not produced by this store.
    #[inline]
    pub(crate) fn node_mut(&mut self, page_id: PageId) -> &mut Node<K> {
        &mut self.pages[page_id.index()]
    }

    /// Number of pages ever allocated, reachable or not.
    #[inline]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// I/O counters for this store.
    #[inline]
    pub fn stats(&self) -> &IoStats {
        &self.stats
    }
}

impl<K: fmt::Debug> PageStore<K> {
    /// Allocate a new, empty leaf page.
    pub fn allocate(&mut self) -> PageId {
        let page_id = PageId::new(self.pages.len() as u32);
        self.pages.push(Node::new());
        self.stats.record_allocation();
        debug!(page = %page_id, "page.allocate");
        page_id
    }

    /// Read the `i`-th child of `parent`.
    ///
    /// Returns `None` when `parent` has no child at `i` (or is not a page of
    /// this store). Callers probe next to node boundaries, so an absent child
    /// is an ordinary answer rather than an error, and it is not counted.
    pub fn read(&self, parent: PageId, i: usize) -> Option<PageId> {
        let child = *self.get(parent)?.children.get(i)?;
        self.stats.record_read();
        debug!(
            page = %child,
            median = ?self.get(child).and_then(|n| n.median()).map(|(_, k)| k),
            "page.read"
        );
        Some(child)
    }

    /// Mark a page as persisted.
    pub fn write(&self, page_id: PageId) {
        self.stats.record_write();
        debug!(
            page = %page_id,
            median = ?self.get(page_id).and_then(|n| n.median()).map(|(_, k)| k),
            "page.write"
        );
    }
}

impl<K> Default for PageStore<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> fmt::Debug for PageStore<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageStore")
            .field("page_count", &self.pages.len())
            .field("stats", &self.stats.snapshot())
            .finish()
    }
}
