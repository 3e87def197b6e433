//! Graphviz (DOT) rendering for debugging.
//!
//! Produces the text of a `digraph`; turning it into an image is left to the
//! caller (`dot -Tpng tree.dot -o tree.png`).

use std::fmt::{self, Write};

use crate::common::PageId;

use super::codec::TextKey;
use super::BTree;

/// `Display` adapter that writes a tree as a DOT graph.
struct Dot<'a, K>(&'a BTree<K>);

impl<K: TextKey> fmt::Display for Dot<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("digraph G {\n")?;
        self.0.write_dot_page(f, self.0.root)?;
        f.write_str("}\n")
    }
}

impl<K: TextKey> BTree<K> {
    /// Render the reachable pages as a DOT graph, one vertex per page.
    ///
    /// Vertices are named after their page id and labelled with their keys;
    /// pages are inspected without counting reads.
    pub fn to_dot(&self) -> String {
        Dot(self).to_string()
    }

    fn write_dot_page<W: Write>(&self, out: &mut W, page: PageId) -> fmt::Result {
        let Some(node) = self.store.get(page) else {
            return Ok(());
        };

        write!(out, "  p{} [label=\"", page.0)?;
        for (i, key) in node.keys.iter().enumerate() {
            if i > 0 {
                out.write_char(' ')?;
            }
            key.write_token(out)?;
        }
        out.write_str("\"];\n")?;

        for &child in &node.children {
            writeln!(out, "  p{} -> p{};", page.0, child.0)?;
        }
        for &child in &node.children {
            self.write_dot_page(out, child)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::common::TreeConfig;

    use super::*;

    #[test]
    fn test_single_leaf() {
        let tree: BTree<i64> =
            BTree::from_notation(TreeConfig::new(2), "(123)").unwrap();
        assert_eq!(tree.to_dot(), "digraph G {\n  p0 [label=\"1 2 3\"];\n}\n");
    }

    #[test]
    fn test_edges() {
        let tree: BTree<i64> =
            BTree::from_notation(TreeConfig::new(2), "(2(1)(34))").unwrap();
        let dot = tree.to_dot();

        assert!(dot.starts_with("digraph G {\n"));
        assert!(dot.contains("  p0 [label=\"2\"];\n"));
        assert!(dot.contains("  p0 -> p1;\n"));
        assert!(dot.contains("  p0 -> p2;\n"));
        assert!(dot.contains("  p2 [label=\"3 4\"];\n"));
        assert!(dot.ends_with("}\n"));
        assert_eq!(tree.stats().reads, 0);
    }

    #[test]
    fn test_full_graph_text() {
        let tree: BTree<u32> =
            BTree::from_notation(TreeConfig::new(2), "(M(DH)(QX))").unwrap();
        assert_eq!(
            tree.to_dot(),
            "digraph G {\n  p0 [label=\"M\"];\n  p0 -> p1;\n  p0 -> p2;\n  \
             p1 [label=\"D H\"];\n  p2 [label=\"Q X\"];\n}\n"
        );
    }

    #[test]
    fn test_dangling_child_is_skipped() {
        let mut tree: BTree<i64> =
            BTree::from_notation(TreeConfig::new(2), "(2(1)(3))").unwrap();
        let root = tree.root();
        tree.store.get_mut(root).unwrap().children[1] = PageId::new(9);

        let dot = tree.to_dot();
        assert!(dot.contains("  p0 -> p9;\n"));
        assert!(!dot.contains("p9 [label"));
        assert!(dot.ends_with("}\n"));
    }
}
