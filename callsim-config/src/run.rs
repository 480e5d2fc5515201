//! Driver loop parameters.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Where the driver reads `now` from.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClockKind {
    /// Milliseconds since the Unix epoch; sleeps 1ms when idle.
    #[default]
    Wall,
    /// Deterministic counter that advances 1ms when idle.
    Virtual,
}

/// Where delivered events go.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// Emit each event as a `debug` trace.
    #[default]
    Log,
    /// Discard events.
    Null,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
#[serde(default)]
pub struct RunConfig {
    /// Warmup period in seconds; events are delivered but not measured.
    pub warmup_secs: u64,

    /// Measured run length in seconds.
    #[validate(range(min = 1))]
    pub duration_secs: u64,

    pub clock: ClockKind,

    pub sink: SinkKind,

    /// Track duplicate and out-of-order deliveries.
    pub audit: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            warmup_secs: 5,
            duration_secs: 600,
            clock: ClockKind::Wall,
            sink: SinkKind::Log,
            audit: true,
        }
    }
}
