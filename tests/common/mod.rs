//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::sync::Once;

use pagetree::{BTree, PageId, TreeConfig};
use tracing_subscriber::EnvFilter;

/// Route `tracing` output to the test harness once per binary.
///
/// `RUST_LOG=pagetree=debug cargo test` shows every page read and write.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pagetree=warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_ansi(false)
            .try_init();
    });
}

/// Empty tree with validation after every mutation.
pub fn checked_tree<K>(min_degree: usize) -> BTree<K>
where
    K: Ord + Clone + std::fmt::Debug,
{
    BTree::new(TreeConfig::new(min_degree).with_validation(true)).unwrap()
}

/// Parse with validation on.
pub fn parse(min_degree: usize, notation: &str) -> BTree<i64> {
    BTree::from_notation(TreeConfig::new(min_degree).with_validation(true), notation).unwrap()
}

/// Smallest key count found on any non-root page, if there is one.
pub fn min_non_root_keys<K>(tree: &BTree<K>) -> Option<usize> {
    fn visit<K>(tree: &BTree<K>, page: PageId, is_root: bool, min: &mut Option<usize>) {
        let Some(node) = tree.node(page) else {
            return;
        };
        if !is_root {
            *min = Some(min.map_or(node.len(), |m| m.min(node.len())));
        }
        for &child in &node.children {
            visit(tree, child, false, min);
        }
    }

    let mut min = None;
    visit(tree, tree.root(), true, &mut min);
    min
}
