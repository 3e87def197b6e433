//! Common types and utilities shared across pagetree.
//!
//! This module contains fundamental primitives used throughout the codebase:
//! - Configuration ([`TreeConfig`])
//! - Error types
//! - Identifiers ([`PageId`])

pub mod config;
pub mod error;
mod page_id;

pub use config::TreeConfig;
pub use error::{Error, Result, Violation};
pub use page_id::PageId;
