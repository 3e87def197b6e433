//! Error types for pagetree.

use thiserror::Error;

use super::PageId;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors in pagetree.
///
/// Absent keys and out-of-range child reads are not errors: they surface as
/// `None` / `Ok(false)` from the operation that hit them.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A node broke a B-tree invariant after a mutation.
    ///
    /// This indicates a bug in the tree algorithms, not a user error.
    #[error("structural violation at {page}: {violation}")]
    StructuralViolation { page: PageId, violation: Violation },

    /// The text notation could not be parsed.
    #[error("malformed input at offset {offset}: {reason}")]
    MalformedInput { offset: usize, reason: &'static str },

    /// `split_child` was pointed at a child that cannot be split.
    #[error("cannot split child {index} of {page}: {reason}")]
    InvalidSplit {
        page: PageId,
        index: usize,
        reason: &'static str,
    },

    /// Minimum degree below 2.
    #[error("invalid minimum degree {0}: must be at least 2")]
    InvalidMinDegree(usize),
}

/// The specific invariant a node broke.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    #[error("node holds {keys} keys, at most {max} allowed")]
    TooManyKeys { keys: usize, max: usize },

    #[error("internal node holds {keys} keys but {children} children")]
    ChildCountMismatch { keys: usize, children: usize },

    #[error("leaf node has {children} children")]
    LeafWithChildren { children: usize },

    #[error("internal node has no children")]
    InternalWithoutChildren,

    #[error("child handle {child} does not resolve to a page")]
    DanglingChild { child: PageId },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::StructuralViolation {
            page: PageId::new(3),
            violation: Violation::TooManyKeys { keys: 4, max: 3 },
        };
        assert_eq!(
            format!("{}", err),
            "structural violation at Page(3): node holds 4 keys, at most 3 allowed"
        );

        let err = Error::MalformedInput {
            offset: 7,
            reason: "unclosed parenthesis",
        };
        assert_eq!(
            format!("{}", err),
            "malformed input at offset 7: unclosed parenthesis"
        );
    }

    #[test]
    fn test_invalid_degree_display() {
        assert_eq!(
            Error::InvalidMinDegree(1).to_string(),
            "invalid minimum degree 1: must be at least 2"
        );
    }

    #[test]
    fn test_result_type_alias() {
        fn might_fail() -> Result<u32> {
            Ok(42)
        }

        assert_eq!(might_fail().unwrap(), 42);
    }
}
