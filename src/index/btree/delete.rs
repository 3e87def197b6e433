//! B-tree deletion.
//!
//! Deletion runs top-down in a single pass. Before descending into a child
//! the child is topped up to at least `n` keys (by rotating a key in from a
//! sibling or by merging with one), so removing a key from a leaf never
//! leaves a node below the minimum and nothing has to propagate back up.
//!
//! # Cases
//! ```text
//! key found in x:
//!   1   x is a leaf                  remove it
//!   2a  predecessor leaf has >= n    replace with predecessor
//!   2b  successor leaf has >= n      replace with successor
//!   2c  both children have n-1       merge them, recurse into the result
//! key not in x, child c has n-1:
//!   3a  right sibling has >= n       rotate a key left into c
//!   3a' left sibling has >= n        rotate a key right into c
//!   3b  neither                      merge c with a sibling
//! ```

use std::fmt;

use tracing::{debug, trace};

use crate::common::{PageId, Result};

use super::BTree;

/// Which edge of a subtree to follow down to a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Left,
    Right,
}

impl<K: Ord + Clone + fmt::Debug> BTree<K> {
    /// Remove one occurrence of `key`.
    ///
    /// Returns `Ok(false)` if the key is not in the tree. Nodes on the search
    /// path may still have been rebalanced in that case.
    ///
    /// # Errors
    /// Returns `Error::StructuralViolation` if the tree breaks an invariant.
    pub fn delete(&mut self, key: &K) -> Result<bool> {
        let found = self.delete_from(self.root, key)?;
        self.check_after_mutation()?;
        Ok(found)
    }

    fn delete_from(&mut self, page: PageId, key: &K) -> Result<bool> {
        let node = self.store.node(page);
        let i = node.lower_bound(key);
        let found = node.keys.get(i) == Some(key);
        let leaf = node.leaf;

        match (found, leaf) {
            (true, true) => {
                trace!(page = %page, index = i, "btree.delete.leaf");
                self.store.node_mut(page).keys.remove(i);
                self.store.write(page);
                Ok(true)
            }
            (true, false) => self.delete_internal(page, i, key),
            (false, true) => Ok(false),
            (false, false) => {
                let child = self.ensure_not_starving(page, i)?;
                self.delete_from(child, key)
            }
        }
    }

    /// Remove `keys[i]` (equal to `key`) from internal node `x`.
    fn delete_internal(&mut self, x: PageId, i: usize, key: &K) -> Result<bool> {
        let min_degree = self.config.min_degree;

        let left = self.child(x, i)?;
        let pred_leaf = self.edge_leaf(left, Edge::Right)?;
        if !self.store.node(pred_leaf).is_starving(min_degree) {
            if let Some(pred) = self.store.node_mut(pred_leaf).keys.pop() {
                trace!(page = %x, leaf = %pred_leaf, "btree.delete.predecessor");
                self.store.node_mut(x).keys[i] = pred;
                self.store.write(pred_leaf);
                self.store.write(x);
                return Ok(true);
            }
        }

        let right = self.child(x, i + 1)?;
        let succ_leaf = self.edge_leaf(right, Edge::Left)?;
        if !self.store.node(succ_leaf).is_starving(min_degree) {
            let succ = self.store.node_mut(succ_leaf).keys.remove(0);
            trace!(page = %x, leaf = %succ_leaf, "btree.delete.successor");
            self.store.node_mut(x).keys[i] = succ;
            self.store.write(succ_leaf);
            self.store.write(x);
            return Ok(true);
        }

        // Both edge leaves are at the minimum. If a child above them still
        // has spare keys, pull the replacement up through it instead of
        // merging, which would overflow.
        if !self.store.node(left).is_starving(min_degree) {
            if let Some(pred) = self.store.node(pred_leaf).keys.last().cloned() {
                trace!(page = %x, child = %left, "btree.delete.predecessor_subtree");
                self.delete_from(left, &pred)?;
                self.store.node_mut(x).keys[i] = pred;
                self.store.write(x);
                return Ok(true);
            }
        }
        if !self.store.node(right).is_starving(min_degree) {
            if let Some(succ) = self.store.node(succ_leaf).keys.first().cloned() {
                trace!(page = %x, child = %right, "btree.delete.successor_subtree");
                self.delete_from(right, &succ)?;
                self.store.node_mut(x).keys[i] = succ;
                self.store.write(x);
                return Ok(true);
            }
        }

        trace!(page = %x, index = i, "btree.delete.merge_children");
        let merged = self.merge(x, i)?;
        self.delete_from(merged, key)
    }

    /// Make sure child `ci` of `x` holds at least `n` keys and return the
    /// page the deletion should continue in.
    fn ensure_not_starving(&mut self, x: PageId, ci: usize) -> Result<PageId> {
        let min_degree = self.config.min_degree;
        let x_node = self.store.node(x);
        if x_node.children.len() != x_node.keys.len() + 1 {
            return Err(self.child_count_mismatch(x));
        }

        let c = self.child(x, ci)?;
        if !self.store.node(c).is_starving(min_degree) {
            return Ok(c);
        }

        if let Some(right) = self.store.read(x, ci + 1) {
            if !self.store.node(right).is_starving(min_degree) {
                self.rotate_from_right(x, ci, c, right);
                return Ok(c);
            }
        }
        if ci > 0 {
            if let Some(left) = self.store.read(x, ci - 1) {
                if !self.store.node(left).is_starving(min_degree) {
                    self.rotate_from_left(x, ci, left, c);
                    return Ok(c);
                }
            }
        }

        let siblings = self.store.node(x).children.len();
        if ci + 1 < siblings {
            self.merge(x, ci)
        } else if ci > 0 {
            self.merge(x, ci - 1)
        } else {
            // A keyless root with a single child has nothing to borrow from.
            Ok(c)
        }
    }

    /// Move the separator `x.keys[ci]` down into `c` and the first key of
    /// `right` up into its place. `right`'s first child moves over to `c`.
    fn rotate_from_right(&mut self, x: PageId, ci: usize, c: PageId, right: PageId) {
        let right_node = self.store.node_mut(right);
        let first_key = right_node.keys.remove(0);
        let first_child = if right_node.leaf || right_node.children.is_empty() {
            None
        } else {
            Some(right_node.children.remove(0))
        };

        let separator = std::mem::replace(&mut self.store.node_mut(x).keys[ci], first_key);

        let c_node = self.store.node_mut(c);
        c_node.keys.push(separator);
        if let Some(child) = first_child {
            c_node.children.push(child);
        }

        debug!(parent = %x, child = %c, sibling = %right, "btree.rotate_left");
        self.store.write(x);
        self.store.write(c);
        self.store.write(right);
    }

    /// Mirror of [`rotate_from_right`](Self::rotate_from_right): the
    /// separator `x.keys[ci - 1]` moves down to the front of `c` and the last
    /// key of `left` takes its place.
    fn rotate_from_left(&mut self, x: PageId, ci: usize, left: PageId, c: PageId) {
        let left_node = self.store.node_mut(left);
        let Some(last_key) = left_node.keys.pop() else {
            return;
        };
        let last_child = if left_node.leaf {
            None
        } else {
            left_node.children.pop()
        };

        let separator = std::mem::replace(&mut self.store.node_mut(x).keys[ci - 1], last_key);

        let c_node = self.store.node_mut(c);
        c_node.keys.insert(0, separator);
        if let Some(child) = last_child {
            c_node.children.insert(0, child);
        }

        debug!(parent = %x, child = %c, sibling = %left, "btree.rotate_right");
        self.store.write(x);
        self.store.write(c);
        self.store.write(left);
    }

    /// Fold child `i + 1` of `x` and the separator `x.keys[i]` into child `i`.
    ///
    /// Returns the merged child. If `x` is the root and loses its last key,
    /// the merged child becomes the new root. The emptied right child is left
    /// unreachable in the store.
    pub(super) fn merge(&mut self, x: PageId, i: usize) -> Result<PageId> {
        if i >= self.store.node(x).keys.len() {
            return Err(self.child_count_mismatch(x));
        }
        let y = self.child(x, i)?;
        let z = self.child(x, i + 1)?;

        let x_node = self.store.node_mut(x);
        let separator = x_node.keys.remove(i);
        x_node.children.remove(i + 1);
        let x_emptied = x_node.keys.is_empty();

        let z_node = std::mem::take(self.store.node_mut(z));
        let y_node = self.store.node_mut(y);
        y_node.keys.push(separator);
        y_node.keys.extend(z_node.keys);
        if !y_node.leaf {
            y_node.children.extend(z_node.children);
        }

        debug!(parent = %x, left = %y, right = %z, "btree.merge");
        self.store.write(x);
        self.store.write(y);

        if x_emptied && x == self.root {
            debug!(old_root = %x, new_root = %y, "btree.root_collapse");
            self.root = y;
        }
        Ok(y)
    }

    /// Counted read of child `i`; a missing child of an internal node is a
    /// structural error here.
    fn child(&self, page: PageId, i: usize) -> Result<PageId> {
        self.store
            .read(page, i)
            .ok_or_else(|| self.child_count_mismatch(page))
    }

    /// Follow the first (or last) child down from `page` until a leaf.
    fn edge_leaf(&self, page: PageId, edge: Edge) -> Result<PageId> {
        let mut current = page;
        loop {
            let node = self.store.node(current);
            if node.leaf {
                return Ok(current);
            }
            let i = match edge {
                Edge::Left => 0,
                Edge::Right => node.keys.len(),
            };
            current = self.child(current, i)?;
        }
    }
}
