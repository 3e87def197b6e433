//! Page contents.
//!
//! This module contains:
//! - [`Node`] - The keys and child handles stored in one page

mod node;

pub use node::Node;
