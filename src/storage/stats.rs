//! Page I/O statistics tracking.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for every page operation issued against a [`PageStore`].
///
/// All fields are atomic so that read-only tree operations (search, walk)
/// can count through a shared reference.
///
/// # Memory Ordering
/// We use `Ordering::Relaxed` for all operations: we only need each
/// increment to be atomic, not ordered relative to the other counters.
///
/// # Example
/// ```
/// use pagetree::storage::IoStats;
/// use std::sync::atomic::Ordering;
///
/// let stats = IoStats::new();
/// stats.reads.fetch_add(1, Ordering::Relaxed);
/// assert_eq!(stats.snapshot().reads, 1);
/// ```
///
/// [`PageStore`]: crate::storage::PageStore
#[derive(Debug)]
pub struct IoStats {
    /// Number of pages allocated.
    pub allocations: AtomicU64,

    /// Number of child pages read.
    pub reads: AtomicU64,

    /// Number of pages written.
    pub writes: AtomicU64,
}

impl IoStats {
    /// Create a new stats tracker with all counters at zero.
    pub fn new() -> Self {
        Self {
            allocations: AtomicU64::new(0),
            reads: AtomicU64::new(0),
            writes: AtomicU64::new(0),
        }
    }

    #[inline]
    pub(crate) fn record_allocation(&self) {
        self.allocations.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_read(&self) {
        self.reads.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of current statistics.
    pub fn snapshot(&self) -> IoSnapshot {
        IoSnapshot {
            allocations: self.allocations.load(Ordering::Relaxed),
            reads: self.reads.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.allocations.store(0, Ordering::Relaxed);
        self.reads.store(0, Ordering::Relaxed);
        self.writes.store(0, Ordering::Relaxed);
    }
}

impl Default for IoStats {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time copy of [`IoStats`].
///
/// Snapshots subtract, so the cost of a single operation is
/// `after - before`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IoSnapshot {
    pub allocations: u64,
    pub reads: u64,
    pub writes: u64,
}

impl IoSnapshot {
    /// Total block accesses (reads plus writes).
    pub fn io_total(&self) -> u64 {
        self.reads + self.writes
    }

    /// Emits the counters to the tracing infrastructure.
    pub fn emit_tracing(&self) {
        tracing::info!(
            target: "pagetree::stats",
            allocations = self.allocations,
            reads = self.reads,
            writes = self.writes,
            "page io snapshot"
        );
    }
}

impl std::ops::Sub for IoSnapshot {
    type Output = IoSnapshot;

    fn sub(self, rhs: IoSnapshot) -> IoSnapshot {
        IoSnapshot {
            allocations: self.allocations.saturating_sub(rhs.allocations),
            reads: self.reads.saturating_sub(rhs.reads),
            writes: self.writes.saturating_sub(rhs.writes),
        }
    }
}

impl fmt::Display for IoSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "IoStats {{ allocations: {}, reads: {}, writes: {} }}",
            self.allocations, self.reads, self.writes
        )
    }
}
