//! Node - the contents of one B-tree page.
//!
//! A [`Node`] is the in-memory image of a disk block: an ordered key array
//! and, for internal nodes, the handles of its children. Nodes never own
//! their children; they only name them by [`PageId`].

use crate::common::PageId;

/// One page worth of B-tree state.
///
/// The `leaf` flag is kept explicitly rather than derived from `children`
/// so that the validator can catch the two disagreeing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<K> {
    /// Ordered keys.
    pub keys: Vec<K>,

    /// Child handles; `keys.len() + 1` of them when internal.
    pub children: Vec<PageId>,

    /// True iff the node has no children.
    pub leaf: bool,
}

impl<K> Node<K> {
    /// Create an empty leaf.
    pub fn new() -> Self {
        Self {
            keys: Vec::new(),
            children: Vec::new(),
            leaf: true,
        }
    }

    /// Create a leaf holding `keys`.
    pub fn leaf(keys: Vec<K>) -> Self {
        Self {
            keys,
            children: Vec::new(),
            leaf: true,
        }
    }

    /// Create an internal node.
    pub fn internal(keys: Vec<K>, children: Vec<PageId>) -> Self {
        Self {
            keys,
            children,
            leaf: false,
        }
    }

    /// Number of keys held.
    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True if the node holds no keys.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// True if the node holds `2n - 1` keys and must be split before an
    /// insertion can descend through it.
    #[inline]
    pub fn is_full(&self, min_degree: usize) -> bool {
        self.keys.len() >= 2 * min_degree - 1
    }

    /// True if the node is at (or below) the `n - 1` key minimum and must be
    /// rebalanced before a deletion can descend through it.
    #[inline]
    pub fn is_starving(&self, min_degree: usize) -> bool {
        self.keys.len() < min_degree
    }

    /// Index/key at `len / 2`; for a full node this is position `n - 1`.
    pub fn median(&self) -> Option<(usize, &K)> {
        let index = self.keys.len() / 2;
        self.keys.get(index).map(|key| (index, key))
    }
}

impl<K: Ord> Node<K> {
    /// Position of the first key strictly greater than `key`.
    ///
    /// Returns `len()` when `key` is greater than or equal to every key. Used
    /// both as the insertion point and as the child to descend into.
    pub fn index_for(&self, key: &K) -> usize {
        self.keys.partition_point(|k| k <= key)
    }

    /// Position of the first key greater than or equal to `key`.
    pub(crate) fn lower_bound(&self, key: &K) -> usize {
        self.keys.partition_point(|k| k < key)
    }
}

impl<K> Default for Node<K> {
    fn default() -> Self {
        Self::new()
    }
}
