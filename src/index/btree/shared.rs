//! Lock-serialized access to a [`BTree`] from several threads.
//!
//! Splits and merges touch a parent and two children in one logical step, so
//! every mutation takes the tree's write lock. Lookups share the read lock;
//! the I/O counters they bump are atomic.

use std::fmt;

use parking_lot::RwLock;

use crate::common::Result;
use crate::storage::IoSnapshot;

use super::BTree;

/// A [`BTree`] behind a `parking_lot::RwLock`.
///
/// # Example
/// ```
/// use pagetree::{BTree, SharedBTree};
/// use std::sync::Arc;
///
/// let tree = Arc::new(SharedBTree::new(BTree::with_min_degree(2).unwrap()));
/// tree.insert(7).unwrap();
/// assert!(tree.contains(&7));
/// ```
pub struct SharedBTree<K> {
    tree: RwLock<BTree<K>>,
}

impl<K: Ord + Clone + fmt::Debug> SharedBTree<K> {
    /// Wrap an existing tree.
    pub fn new(tree: BTree<K>) -> Self {
        Self {
            tree: RwLock::new(tree),
        }
    }

    /// Insert under the write lock.
    pub fn insert(&self, key: K) -> Result<()> {
        self.tree.write().insert(key)
    }

    /// Delete under the write lock.
    pub fn delete(&self, key: &K) -> Result<bool> {
        self.tree.write().delete(key)
    }

    /// Point lookup under the read lock.
    pub fn contains(&self, key: &K) -> bool {
        self.tree.read().contains(key)
    }

    /// All keys in order, under the read lock.
    pub fn keys(&self) -> Vec<K> {
        self.tree.read().keys()
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.tree.read().len()
    }

    /// True if the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.tree.read().is_empty()
    }

    /// Current I/O counters.
    pub fn stats(&self) -> IoSnapshot {
        self.tree.read().stats()
    }

    /// Run the invariant checker under the read lock.
    pub fn validate(&self) -> Result<()> {
        self.tree.read().validate()
    }

    /// Unwrap the tree.
    pub fn into_inner(self) -> BTree<K> {
        self.tree.into_inner()
    }
}

impl<K> fmt::Debug for SharedBTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedBTree").finish_non_exhaustive()
    }
}
