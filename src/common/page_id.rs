//! Page handles.

use std::fmt;

/// Handle to a node held by the [`PageStore`](crate::storage::PageStore).
///
/// Stands in for a disk block address: `PageId(i)` names slot `i` of the
/// store's arena. Parents refer to their children only through these
/// handles; the store owns every node. A handle from another store simply
/// fails to resolve through [`PageStore::get`](crate::storage::PageStore::get).
///
/// # Example
/// ```
/// use pagetree::{BTree, PageId};
///
/// let tree: BTree<u32> = BTree::with_min_degree(2).unwrap();
/// assert_eq!(tree.root(), PageId::new(0));
/// assert!(tree.node(PageId::new(1)).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(pub u32);

impl PageId {
    /// Handle for arena slot `id`.
    #[inline]
    pub fn new(id: u32) -> Self {
        PageId(id)
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Page({})", self.0)
    }
}
