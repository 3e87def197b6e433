//! B-tree over a [`PageStore`]: construction, search, traversal, insertion.
//!
//! Deletion lives in [`delete`](super::delete), invariant checking in
//! [`validate`](super::validate).

use std::fmt;

use tracing::debug;

use crate::common::{Error, PageId, Result, TreeConfig, Violation};
use crate::storage::page::Node;
use crate::storage::{IoSnapshot, PageStore};

/// A B-tree of minimum degree `n` whose nodes live in a [`PageStore`].
///
/// Every child access goes through [`PageStore::read`] and every persistence
/// point through [`PageStore::write`], so the cost of an operation is visible
/// in [`stats`](Self::stats).
///
/// # Architecture
/// ```text
/// ┌──────────────────────────────────────────────┐
/// │ BTree                                        │
/// │   root: PageId ──┐     config: TreeConfig    │
/// │                  ▼                           │
/// │  ┌────────────────────────────────────────┐  │
/// │  │ PageStore   allocate / read / write    │  │
/// │  │   [Node0] [Node1] [Node2] ...          │  │
/// │  │   IoStats { allocations, reads, writes}│  │
/// │  └────────────────────────────────────────┘  │
/// └──────────────────────────────────────────────┘
/// ```
///
/// # Example
/// ```
/// use pagetree::{BTree, TreeConfig};
///
/// let mut tree = BTree::new(TreeConfig::new(2)).unwrap();
/// for key in 1..=10 {
///     tree.insert(key).unwrap();
/// }
/// assert!(tree.contains(&7));
/// assert_eq!(tree.keys(), (1..=10).collect::<Vec<_>>());
/// ```
pub struct BTree<K> {
    pub(super) config: TreeConfig,
    pub(super) root: PageId,
    pub(super) store: PageStore<K>,
}

impl<K> BTree<K> {
    /// Minimum degree `n`.
    #[inline]
    pub fn min_degree(&self) -> usize {
        self.config.min_degree
    }

    /// Settings this tree was built with.
    #[inline]
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Handle of the current root page.
    #[inline]
    pub fn root(&self) -> PageId {
        self.root
    }

    /// The underlying page store.
    #[inline]
    pub fn store(&self) -> &PageStore<K> {
        &self.store
    }

    /// Inspect a page without counting a read.
    pub fn node(&self, page_id: PageId) -> Option<&Node<K>> {
        self.store.get(page_id)
    }

    /// Current I/O counters.
    pub fn stats(&self) -> IoSnapshot {
        self.store.stats().snapshot()
    }

    /// Zero the I/O counters.
    pub fn reset_stats(&self) {
        self.store.stats().reset();
    }

    /// Number of keys in the tree. Does not count reads.
    pub fn len(&self) -> usize {
        self.count_keys(self.root)
    }

    /// True if the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.store.get(self.root).map_or(true, |root| root.leaf && root.is_empty())
    }

    /// Number of levels, counting the root. Does not count reads.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut current = Some(self.root);
        while let Some(page) = current {
            let Some(node) = self.store.get(page) else {
                break;
            };
            height += 1;
            current = node.children.first().copied();
        }
        height
    }

    fn count_keys(&self, page: PageId) -> usize {
        self.store.get(page).map_or(0, |node| {
            node.len()
                + node
                    .children
                    .iter()
                    .map(|&child| self.count_keys(child))
                    .sum::<usize>()
        })
    }

    /// Error for an internal node whose child array disagrees with its keys.
    pub(super) fn child_count_mismatch(&self, page: PageId) -> Error {
        let (keys, children) = self
            .store
            .get(page)
            .map_or((0, 0), |node| (node.len(), node.children.len()));
        Error::StructuralViolation {
            page,
            violation: Violation::ChildCountMismatch { keys, children },
        }
    }
}

impl<K: Ord + Clone + fmt::Debug> BTree<K> {
    /// Create an empty tree: one allocated and written leaf root.
    ///
    /// # Errors
    /// Returns `Error::InvalidMinDegree` if `config.min_degree < 2`.
    pub fn new(config: TreeConfig) -> Result<Self> {
        config.validate()?;

        let mut store = PageStore::new();
        let root = store.allocate();
        store.write(root);

        Ok(Self {
            config,
            root,
            store,
        })
    }

    /// Create an empty tree with the given minimum degree and default settings.
    pub fn with_min_degree(min_degree: usize) -> Result<Self> {
        Self::new(TreeConfig::new(min_degree))
    }

    /// Assemble a tree from an already populated store.
    pub(super) fn from_parts(config: TreeConfig, store: PageStore<K>, root: PageId) -> Self {
        Self {
            config,
            root,
            store,
        }
    }

    // ========================================================================
    // Search and traversal
    // ========================================================================

    /// Find `key`, returning the page holding it and its index in that page.
    pub fn search(&self, key: &K) -> Option<(PageId, usize)> {
        self.search_from(self.root, key)
    }

    /// Find `key` in the subtree rooted at `page`.
    ///
    /// Costs one counted read per level descended below `page`.
    pub fn search_from(&self, page: PageId, key: &K) -> Option<(PageId, usize)> {
        let mut current = page;
        loop {
            let node = self.store.get(current)?;
            let i = node.lower_bound(key);
            if node.keys.get(i) == Some(key) {
                return Some((current, i));
            }
            if node.leaf {
                return None;
            }
            current = self.store.read(current, i)?;
        }
    }

    /// True if `key` is in the tree.
    pub fn contains(&self, key: &K) -> bool {
        self.search(key).is_some()
    }

    /// Visit every key in non-decreasing order.
    pub fn walk<F: FnMut(&K)>(&self, mut f: F) {
        self.walk_node(self.root, &mut f);
    }

    fn walk_node<F: FnMut(&K)>(&self, page: PageId, f: &mut F) {
        let Some(node) = self.store.get(page) else {
            return;
        };
        for (i, key) in node.keys.iter().enumerate() {
            if !node.leaf {
                if let Some(child) = self.store.read(page, i) {
                    self.walk_node(child, f);
                }
            }
            f(key);
        }
        if !node.leaf {
            if let Some(child) = self.store.read(page, node.keys.len()) {
                self.walk_node(child, f);
            }
        }
    }

    /// All keys in non-decreasing order.
    pub fn keys(&self) -> Vec<K> {
        let mut keys = Vec::new();
        self.walk(|key| keys.push(key.clone()));
        keys
    }

    // ========================================================================
    // Insertion
    // ========================================================================

    /// Insert `key`. Duplicates are kept.
    ///
    /// Full nodes are split on the way down, so the insert finishes in a
    /// single root-to-leaf pass.
    ///
    /// # Errors
    /// Returns `Error::StructuralViolation` if the tree breaks an invariant.
    pub fn insert(&mut self, key: K) -> Result<()> {
        let mut root = self.root;
        if self.store.node(root).is_full(self.config.min_degree) {
            root = self.split_root()?;
        }
        self.insert_non_full(root, key)?;
        self.check_after_mutation()
    }

    /// Grow the tree by one level: a new root whose only child is the old
    /// root, which is then split as child 0. Returns the new root.
    pub fn split_root(&mut self) -> Result<PageId> {
        let old_root = self.root;
        let new_root = self.store.allocate();
        *self.store.node_mut(new_root) = Node::internal(Vec::new(), vec![old_root]);
        self.root = new_root;

        if let Err(err) = self.split_child(new_root, 0) {
            self.root = old_root;
            return Err(err);
        }
        debug!(root = %new_root, "btree.split_root");
        Ok(new_root)
    }

    /// Split child `i` of `parent` around its median and promote the median
    /// into `parent`. Returns the promoted key.
    ///
    /// The child keeps the keys left of the median; a new right sibling
    /// takes the keys (and children) right of it. `parent`, the child and
    /// the sibling are written.
    ///
    /// # Errors
    /// - `Error::InvalidSplit` if there is no child `i` or it holds no keys
    /// - `Error::StructuralViolation` if any of the three nodes ends up
    ///   inconsistent
    pub fn split_child(&mut self, parent: PageId, i: usize) -> Result<K> {
        let invalid = |reason| Error::InvalidSplit {
            page: parent,
            index: i,
            reason,
        };
        let y = self.store.read(parent, i).ok_or_else(|| invalid("no such child"))?;
        if i > self.store.node(parent).keys.len() {
            return Err(self.child_count_mismatch(parent));
        }
        let median_index = match self.store.node(y).median() {
            Some((index, _)) => index,
            None => return Err(invalid("child has no keys")),
        };

        let z = self.store.allocate();

        let y_node = self.store.node_mut(y);
        let leaf = y_node.leaf;
        let right_keys = y_node.keys.split_off(median_index + 1);
        let median = y_node.keys.remove(median_index);
        let right_children = if !leaf && y_node.children.len() > median_index {
            y_node.children.split_off(median_index + 1)
        } else {
            Vec::new()
        };
        *self.store.node_mut(z) = Node {
            keys: right_keys,
            children: right_children,
            leaf,
        };

        let parent_node = self.store.node_mut(parent);
        parent_node.keys.insert(i, median.clone());
        parent_node.children.insert(i + 1, z);
        parent_node.leaf = false;

        debug!(
            parent = %parent,
            left = %y,
            right = %z,
            median = ?median,
            leaf,
            "btree.split_child"
        );

        self.store.write(parent);
        self.store.write(y);
        self.store.write(z);

        let max_keys = self.config.max_keys();
        for page in [parent, y, z] {
            super::validate::check_node(page, self.store.node(page), max_keys)?;
        }
        Ok(median)
    }

    /// Insert into the subtree at `page`, which must not be full.
    fn insert_non_full(&mut self, page: PageId, key: K) -> Result<()> {
        let min_degree = self.config.min_degree;
        let mut current = page;
        loop {
            let node = self.store.node(current);
            let i = node.index_for(&key);

            if node.leaf {
                self.store.node_mut(current).keys.insert(i, key);
                self.store.write(current);
                return Ok(());
            }

            let mut child = self
                .store
                .read(current, i)
                .ok_or_else(|| self.child_count_mismatch(current))?;
            if self.store.node(child).is_full(min_degree) {
                let median = self.split_child(current, i)?;
                if key > median {
                    child = self
                        .store
                        .read(current, i + 1)
                        .ok_or_else(|| self.child_count_mismatch(current))?;
                }
            }
            current = child;
        }
    }

    /// Run the validator if the config asks for it.
    pub(super) fn check_after_mutation(&self) -> Result<()> {
        if self.config.validate_after_mutation {
            self.validate()?;
        }
        Ok(())
    }
}

impl<K> fmt::Debug for BTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BTree")
            .field("min_degree", &self.config.min_degree)
            .field("root", &self.root)
            .field("store", &self.store)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(n: usize, notation: &str) -> BTree<i64> {
        BTree::from_notation(TreeConfig::new(n).with_validation(true), notation).unwrap()
    }

    /// `(4(2(1)(3))(68(5)(7)(910)))`
    fn one_to_ten() -> BTree<i64> {
        let mut tree = BTree::new(TreeConfig::new(2).with_validation(true)).unwrap();
        for key in 1..=10 {
            tree.insert(key).unwrap();
        }
        tree
    }

    #[test]
    fn test_new_tree_is_single_written_leaf() {
        let tree: BTree<i64> = BTree::with_min_degree(2).unwrap();

        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.height(), 1);
        assert_eq!(
            tree.stats(),
            IoSnapshot {
                allocations: 1,
                reads: 0,
                writes: 1
            }
        );
    }

    #[test]
    fn test_invalid_degree_rejected() {
        let result: Result<BTree<i64>> = BTree::with_min_degree(1);
        assert_eq!(result.unwrap_err(), Error::InvalidMinDegree(1));
    }

    #[test]
    fn test_search_hits_and_misses() {
        let tree = one_to_ten();

        let (page, index) = tree.search(&8).unwrap();
        assert_eq!(tree.node(page).unwrap().keys, vec![6, 8]);
        assert_eq!(index, 1);

        let (page, index) = tree.search(&10).unwrap();
        assert_eq!(tree.node(page).unwrap().keys, vec![9, 10]);
        assert_eq!(index, 1);

        assert_eq!(tree.search(&0), None);
        assert_eq!(tree.search(&11), None);
    }

    #[test]
    fn test_search_reads_one_page_per_level() {
        let tree = one_to_ten();
        tree.reset_stats();

        assert!(tree.contains(&4));
        assert_eq!(tree.stats().reads, 0);

        assert!(tree.contains(&9));
        assert_eq!(tree.stats().reads, 2);
    }

    #[test]
    fn test_walk_in_order() {
        let tree = one_to_ten();
        assert_eq!(tree.keys(), (1..=10).collect::<Vec<_>>());
        assert_eq!(tree.len(), 10);
        assert_eq!(tree.height(), 3);
    }

    #[test]
    fn test_walk_reads_every_child_once() {
        let tree = one_to_ten();
        tree.reset_stats();

        tree.keys();

        // 7 pages below the root
        assert_eq!(tree.stats().reads, 7);
        assert_eq!(tree.stats().writes, 0);
    }

    #[test]
    fn test_split_child() {
        let mut tree = tree(2, "(3(12)(567))");
        let root = tree.root();

        let median = tree.split_child(root, 1).unwrap();

        assert_eq!(median, 6);
        assert_eq!(tree.render(), "(36(12)(5)(7))");
    }

    #[test]
    fn test_split_child_io() {
        let mut tree = tree(2, "(3(12)(567))");
        tree.reset_stats();

        tree.split_child(tree.root(), 1).unwrap();

        assert_eq!(
            tree.stats(),
            IoSnapshot {
                allocations: 1,
                reads: 1,
                writes: 3
            }
        );
    }

    #[test]
    fn test_split_child_rejects_bad_index() {
        let mut tree = tree(2, "(3(12)(567))");
        let root = tree.root();

        let err = tree.split_child(root, 5).unwrap_err();
        assert!(matches!(err, Error::InvalidSplit { index: 5, .. }));
        assert_eq!(tree.render(), "(3(12)(567))");
    }

    #[test]
    fn test_split_root_uses_middle_key() {
        let cases = [
            ("(123)", "(2(1)(3))"),
            ("(1234)", "(3(12)(4))"),
            ("(12345)", "(3(12)(45))"),
            ("(222)", "(2(2)(2))"),
        ];

        for (input, want) in cases {
            let mut tree = tree(3, input);
            tree.split_root().unwrap();
            assert_eq!(tree.render(), want, "splitting {}", input);
        }
    }

    #[test]
    fn test_split_internal_root() {
        let mut tree = tree(2, "(246(1)(3)(5)(78))");
        tree.split_root().unwrap();
        assert_eq!(tree.render(), "(4(2(1)(3))(6(5)(78)))");
    }

    #[test]
    fn test_split_empty_root_restores_root() {
        let mut tree: BTree<i64> = BTree::with_min_degree(2).unwrap();
        let root = tree.root();

        assert!(tree.split_root().is_err());
        assert_eq!(tree.root(), root);
    }

    #[test]
    fn test_insert_sequences() {
        let cases: [(&[i64], &str); 5] = [
            (&[1, 2, 3, 4], "(2(1)(34))"),
            (&[1, 2, 3, 4, 5, 6, 7], "(24(1)(3)(567))"),
            (&[1, 2, 3, 4, 5, 6, 7, 8], "(246(1)(3)(5)(78))"),
            (&[1, 2, 3, 4, 5, 6, 7, 8, 9], "(4(2(1)(3))(6(5)(789)))"),
            (
                &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10],
                "(4(2(1)(3))(68(5)(7)(910)))",
            ),
        ];

        for (keys, want) in cases {
            let mut tree = BTree::new(TreeConfig::new(2).with_validation(true)).unwrap();
            for &key in keys {
                tree.insert(key).unwrap();
            }
            assert_eq!(tree.render(), want);
        }
    }

    #[test]
    fn test_insert_into_root_leaf_io() {
        let mut tree: BTree<i64> = BTree::with_min_degree(2).unwrap();
        tree.reset_stats();

        tree.insert(1).unwrap();

        assert_eq!(
            tree.stats(),
            IoSnapshot {
                allocations: 0,
                reads: 0,
                writes: 1
            }
        );
    }

    #[test]
    fn test_insert_with_root_split_io() {
        let mut tree: BTree<i64> = BTree::with_min_degree(2).unwrap();
        for key in 1..=3 {
            tree.insert(key).unwrap();
        }
        tree.reset_stats();

        tree.insert(4).unwrap();

        // split: new root + sibling, 1 read, 3 writes; descent: 1 read, 1 write
        assert_eq!(
            tree.stats(),
            IoSnapshot {
                allocations: 2,
                reads: 2,
                writes: 4
            }
        );
    }

    #[test]
    fn test_insert_duplicates() {
        let mut tree = BTree::new(TreeConfig::new(2).with_validation(true)).unwrap();
        for key in [5, 5, 5, 5, 5, 3, 5] {
            tree.insert(key).unwrap();
        }
        assert_eq!(tree.keys(), vec![3, 5, 5, 5, 5, 5, 5]);
    }
}
