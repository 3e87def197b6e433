//! Configuration for pagetree.

use super::{Error, Result};

/// Smallest legal minimum degree.
///
/// With `n = 2` every non-root node holds 1 to 3 keys (a 2-3-4 tree).
pub const MIN_DEGREE_FLOOR: usize = 2;

/// Minimum degree used by [`TreeConfig::default`].
pub const DEFAULT_MIN_DEGREE: usize = 2;

/// Construction-time settings for a [`BTree`](crate::index::btree::BTree).
///
/// # Example
/// ```
/// use pagetree::TreeConfig;
///
/// let config = TreeConfig::default().with_min_degree(3).with_validation(true);
/// assert_eq!(config.min_degree, 3);
/// assert_eq!(config.max_keys(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeConfig {
    /// Minimum degree `n`: non-root nodes hold between `n-1` and `2n-1` keys.
    pub min_degree: usize,

    /// Run the invariant checker after every insert and delete.
    ///
    /// Defaults to on in debug builds and off in release builds.
    pub validate_after_mutation: bool,
}

impl TreeConfig {
    /// Create a config with the given minimum degree.
    pub fn new(min_degree: usize) -> Self {
        Self {
            min_degree,
            ..Self::default()
        }
    }

    /// Set the minimum degree.
    pub fn with_min_degree(mut self, min_degree: usize) -> Self {
        self.min_degree = min_degree;
        self
    }

    /// Enable or disable post-mutation validation.
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validate_after_mutation = enabled;
        self
    }

    /// Maximum keys per node (`2n - 1`).
    #[inline]
    pub fn max_keys(&self) -> usize {
        2 * self.min_degree - 1
    }

    /// Check that the settings describe a usable tree.
    ///
    /// # Errors
    /// Returns `Error::InvalidMinDegree` if `min_degree < 2`.
    pub fn validate(&self) -> Result<()> {
        if self.min_degree < MIN_DEGREE_FLOOR {
            return Err(Error::InvalidMinDegree(self.min_degree));
        }
        Ok(())
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            min_degree: DEFAULT_MIN_DEGREE,
            validate_after_mutation: cfg!(debug_assertions),
        }
    }
}
