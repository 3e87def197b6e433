//! Structural invariant checker.
//!
//! Walks every reachable page through the uncounted [`PageStore::get`] path,
//! so validating never shows up in the I/O statistics.
//!
//! [`PageStore::get`]: crate::storage::PageStore::get

use crate::common::{Error, PageId, Result, Violation};
use crate::storage::page::Node;

use super::BTree;

impl<K> BTree<K> {
    /// Check every reachable node against the B-tree invariants.
    ///
    /// # Errors
    /// Returns the first `Error::StructuralViolation` found, depth first.
    pub fn validate(&self) -> Result<()> {
        let root = self.store.get(self.root).ok_or(Error::StructuralViolation {
            page: self.root,
            violation: Violation::DanglingChild { child: self.root },
        })?;
        self.validate_node(self.root, root)
    }

    fn validate_node(&self, page: PageId, node: &Node<K>) -> Result<()> {
        check_node(page, node, self.config.max_keys())?;
        for &child in &node.children {
            let child_node = self.store.get(child).ok_or(Error::StructuralViolation {
                page,
                violation: Violation::DanglingChild { child },
            })?;
            self.validate_node(child, child_node)?;
        }
        Ok(())
    }
}

/// Check a single node's key bound and key/child consistency.
pub(crate) fn check_node<K>(page: PageId, node: &Node<K>, max_keys: usize) -> Result<()> {
    let violation = if node.keys.len() > max_keys {
        Some(Violation::TooManyKeys {
            keys: node.keys.len(),
            max: max_keys,
        })
    } else if node.leaf && !node.children.is_empty() {
        Some(Violation::LeafWithChildren {
            children: node.children.len(),
        })
    } else if !node.leaf && node.children.is_empty() {
        Some(Violation::InternalWithoutChildren)
    } else if !node.leaf && node.children.len() != node.keys.len() + 1 {
        Some(Violation::ChildCountMismatch {
            keys: node.keys.len(),
            children: node.children.len(),
        })
    } else {
        None
    };

    match violation {
        Some(violation) => Err(Error::StructuralViolation { page, violation }),
        None => Ok(()),
    }
}
