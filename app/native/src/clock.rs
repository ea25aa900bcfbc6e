//! Wall-clock access for the sink.
//!
//! The sink only ever reads the current time when a cooking item is created.
//! Going through [`Clock`] keeps that read replaceable, so tests and the
//! session replayer run on a clock they control.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::sink::Timestamp;

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now(&self) -> Timestamp;
}

/// The real wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0)
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same time, so a test can keep one handle while the sink
/// owns another.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock frozen at `start` milliseconds.
    #[must_use]
    pub fn new(start: Timestamp) -> Self { Self { now: Arc::new(AtomicU64::new(start)) } }

    /// Jump to an absolute time.
    pub fn set(&self, now: Timestamp) { self.now.store(now, Ordering::Release); }

    /// Move forward by whole seconds.
    pub fn advance_secs(&self, secs: u64) {
        self.now.fetch_add(secs.saturating_mul(1000), Ordering::AcqRel);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp { self.now.load(Ordering::Acquire) }
}

// ============================================================================
// Tests
// ============================================================================
