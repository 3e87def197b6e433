//! Parenthesized text notation for building and printing trees.
//!
//! A node is written as `(` + its keys + its children + `)`:
//!
//! ```text
//! (4(2(1)(3))(6(5)(78)))
//!
//!            4
//!          /   \
//!         2     6
//!        / \   / \
//!       1   3 5   7 8
//! ```
//!
//! Every character other than a parenthesis is one key. Digits `0`-`9` stand
//! for the values 0-9, any other character for its code point, so letters
//! can be used as keys (`(M(DH)(QTX))`). When printing, keys in the ASCII
//! letter range are written as letters and everything else in decimal.

use std::fmt::{self, Write};

use crate::common::{Error, PageId, Result, TreeConfig};
use crate::storage::PageStore;

use super::BTree;

/// Keys that can appear in the text notation.
pub trait TextKey: Sized {
    /// Decode one notation character, or `None` if it does not fit in `Self`.
    fn from_token(c: char) -> Option<Self>;

    /// Write the notation form of this key.
    fn write_token<W: Write>(&self, out: &mut W) -> fmt::Result;
}

macro_rules! impl_text_key {
    ($($t:ty),* $(,)?) => {
        $(
            impl TextKey for $t {
                fn from_token(c: char) -> Option<Self> {
                    match c.to_digit(10) {
                        Some(digit) => <$t>::try_from(digit).ok(),
                        None => <$t>::try_from(u32::from(c)).ok(),
                    }
                }

                fn write_token<W: Write>(&self, out: &mut W) -> fmt::Result {
                    match u8::try_from(*self) {
                        Ok(byte) if byte.is_ascii_alphabetic() => out.write_char(char::from(byte)),
                        _ => write!(out, "{}", self),
                    }
                }
            }
        )*
    };
}

impl_text_key!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

fn malformed(offset: usize, reason: &'static str) -> Error {
    Error::MalformedInput { offset, reason }
}

impl<K: TextKey + Ord + Clone + fmt::Debug> BTree<K> {
    /// Build a tree from its text notation.
    ///
    /// Every `(` allocates a page through the store, so the returned tree
    /// reports one allocation per node. Reads and writes stay at zero.
    ///
    /// # Errors
    /// - `Error::InvalidMinDegree` for a bad config
    /// - `Error::MalformedInput` for unbalanced parentheses, keys outside a
    ///   node, text after the root closes, empty input, or a key character
    ///   that does not fit in `K`
    /// - `Error::StructuralViolation` if validation is enabled and the
    ///   described tree breaks an invariant
    pub fn from_notation(config: TreeConfig, input: &str) -> Result<Self> {
        config.validate()?;

        let mut store = PageStore::new();
        let mut stack: Vec<PageId> = Vec::new();
        let mut root = None;

        for (offset, c) in input.char_indices() {
            match c {
                '(' => {
                    if root.is_some() {
                        return Err(malformed(offset, "content after the root node"));
                    }
                    let page = store.allocate();
                    if let Some(&parent) = stack.last() {
                        let parent_node = store.node_mut(parent);
                        parent_node.leaf = false;
                        parent_node.children.push(page);
                    }
                    stack.push(page);
                }
                ')' => {
                    let page = stack
                        .pop()
                        .ok_or_else(|| malformed(offset, "unbalanced closing parenthesis"))?;
                    if stack.is_empty() {
                        root = Some(page);
                    }
                }
                _ => {
                    let &page = stack
                        .last()
                        .ok_or_else(|| malformed(offset, "key outside of a node"))?;
                    let key = K::from_token(c)
                        .ok_or_else(|| malformed(offset, "key does not fit the key type"))?;
                    store.node_mut(page).keys.push(key);
                }
            }
        }

        if !stack.is_empty() {
            return Err(malformed(input.len(), "unclosed parenthesis"));
        }
        let root = root.ok_or_else(|| malformed(0, "no root node"))?;

        let tree = Self::from_parts(config, store, root);
        tree.check_after_mutation()?;
        Ok(tree)
    }
}

impl<K: TextKey> BTree<K> {
    /// Print the whole tree in text notation.
    ///
    /// Pages are inspected without counting reads.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Print a single page's keys, without its children: `(68)`.
    pub fn render_page(&self, page: PageId) -> Option<String> {
        let node = self.store.get(page)?;
        let mut out = String::from("(");
        for key in &node.keys {
            key.write_token(&mut out).ok()?;
        }
        out.push(')');
        Some(out)
    }

    fn write_page<W: Write>(&self, out: &mut W, page: PageId) -> fmt::Result {
        out.write_char('(')?;
        if let Some(node) = self.store.get(page) {
            for key in &node.keys {
                key.write_token(out)?;
            }
            for &child in &node.children {
                self.write_page(out, child)?;
            }
        }
        out.write_char(')')
    }
}

impl<K: TextKey> fmt::Display for BTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_page(f, self.root)
    }
}
