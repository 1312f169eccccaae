//! Invariant alarm (§4.9): a non-blocking counter of contract violations —
//! an attempted id generation, a denied metadata key leak. Recording is
//! infallible by construction: no lock that can poison across a panic
//! boundary, no I/O.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Default number of alarm descriptions retained for diagnostics.
const DEFAULT_CAPACITY: usize = 64;

/// Bounded record of tracer-contract violations.
///
/// The counter is lock-free; the ring buffer of descriptions uses a plain
/// `Mutex` but is only ever touched for the duration of a `push_back`/
/// `pop_front` pair, so it cannot deadlock against anything else in the
/// tracer.
pub struct InvariantAlarm {
    count: AtomicU64,
    recent: Mutex<VecDeque<String>>,
    capacity: usize,
}

impl InvariantAlarm {
    /// Create a new alarm with the default ring-buffer capacity (64).
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a new alarm retaining at most `capacity` recent descriptions.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            count: AtomicU64::new(0),
            recent: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Record a violation. Never panics, never blocks meaningfully.
    pub fn record(&self, description: impl Into<String>) {
        self.count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut recent) = self.recent.lock() {
            if recent.len() == self.capacity {
                recent.pop_front();
            }
            recent.push_back(description.into());
        }
    }

    /// Total violations recorded since construction.
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// A snapshot of the most recent descriptions, oldest first.
    pub fn recent(&self) -> Vec<String> {
        self.recent
            .lock()
            .map(|r| r.iter().cloned().collect())
            .unwrap_or_default()
    }
}

impl Default for InvariantAlarm {
    fn default() -> Self {
        Self::new()
    }
}
