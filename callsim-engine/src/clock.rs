//! Time sources for the driver loop.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;

use callsim_core::VirtualClock;

/// Supplies `now` to the driver and decides what "waiting" means.
#[async_trait]
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;

    /// Called when the source had nothing to deliver at the current time.
    async fn idle(&self);
}

/// Milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct WallClock;

#[async_trait]
impl Clock for WallClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or_default()
    }

    async fn idle(&self) {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
}

#[async_trait]
impl Clock for VirtualClock {
    fn now_ms(&self) -> u64 {
        VirtualClock::now_ms(self)
    }

    async fn idle(&self) {
        self.advance(1);
    }
}
