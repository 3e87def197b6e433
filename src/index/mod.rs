//! Index structures.
//!
//! - [`btree`] - B-tree over the instrumented page store

pub mod btree;
