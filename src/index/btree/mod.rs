//! B-tree index implementation.
//!
//! # Components
//! - [`BTree`] - The tree: search, walk, insert, delete
//! - [`TextKey`] - Keys usable in the `(2(1)(34))` text notation
//! - [`SharedBTree`] - Lock-serialized wrapper for multi-threaded callers
//!
//! Deletion, validation, the text codec and DOT rendering are split into
//! their own files but all extend [`BTree`].

mod codec;
mod delete;
mod graphviz;
mod shared;
mod tree;
mod validate;

pub use codec::TextKey;
pub use shared::SharedBTree;
pub use tree::BTree;
