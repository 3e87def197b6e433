//! Storage layer - simulated block storage and page formats.
//!
//! This module handles page-level access:
//! - [`PageStore`] - Allocation, reads and writes of pages
//! - [`page`] - Page contents ([`Node`](page::Node))
//! - [`IoStats`] - Per-store I/O counters

pub mod page;
mod page_store;
mod stats;

pub use page_store::PageStore;
pub use stats::{IoSnapshot, IoStats};
