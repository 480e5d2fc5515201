//! ## callsim-core::time
//! **Virtual clock for deterministic runs**
//!
//! The driver reads either the wall clock or this counter. In virtual mode the
//! clock only moves when the driver has nothing to deliver, so two runs with the
//! same seeds see the exact same sequence of `now` values.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A millisecond counter shared between clones.
#[derive(Clone, Debug, Default)]
pub struct VirtualClock {
    offset: Arc<AtomicU64>,
}

impl VirtualClock {
    /// Creates a new virtual clock starting at `start_ms`.
    pub fn new(start_ms: u64) -> Self {
        Self {
            offset: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    /// Returns the current virtual time in milliseconds.
    #[inline]
    pub fn now_ms(&self) -> u64 {
        self.offset.load(Ordering::Acquire)
    }

    /// Advances the clock by `ms` milliseconds.
    #[inline]
    pub fn advance(&self, ms: u64) {
        self.offset.fetch_add(ms, Ordering::Release);
    }
}
