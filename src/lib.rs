//! pagetree - A disk-oriented B-tree index over an instrumented page store.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                            pagetree                             │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                 Index Layer (index/)                     │   │
//! │  │   BTree: search · walk · insert · delete · validate      │   │
//! │  │   text notation codec · DOT rendering · SharedBTree      │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓  allocate / read / write         │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │               Storage Layer (storage/)                   │   │
//! │  │     PageStore (node arena) + Node + IoStats counters     │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The tree never touches a child node directly: every descent is a counted
//! page read and every modification ends in a counted page write. Those
//! counters are what a B-tree exists to minimise, and tests assert them
//! exactly.
//!
//! # Modules
//! - [`common`] - Shared primitives (PageId, Error, config)
//! - [`storage`] - Page store, node layout and I/O statistics
//! - [`index`] - The B-tree
//!
//! # Logging
//! Page I/O, splits, merges and rotations are reported through `tracing`
//! at `debug`/`trace` level. Install any subscriber to receive them.
//!
//! # Quick Start
//! ```
//! use pagetree::{BTree, TreeConfig};
//!
//! let mut tree = BTree::new(TreeConfig::new(2)).unwrap();
//! for key in 1..=10 {
//!     tree.insert(key).unwrap();
//! }
//! assert_eq!(tree.render(), "(4(2(1)(3))(68(5)(7)(910)))");
//!
//! tree.delete(&4).unwrap();
//! assert!(!tree.contains(&4));
//! println!("{}", tree.stats());
//! ```

pub mod common;
pub mod index;
pub mod storage;

// Re-export commonly used items at crate root for convenience
pub use common::config::{DEFAULT_MIN_DEGREE, MIN_DEGREE_FLOOR};
pub use common::{Error, PageId, Result, TreeConfig, Violation};

pub use index::btree::{BTree, SharedBTree, TextKey};
pub use storage::page::Node;
pub use storage::{IoSnapshot, IoStats, PageStore};
