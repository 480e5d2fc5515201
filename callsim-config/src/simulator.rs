//! Call simulator and network transformer parameters.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Parameters of the call event generator.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Size of the agent pool.
    #[validate(range(min = 1, max = 10_000_000))]
    pub agents: u32,

    /// Size of the phone number pool.
    #[validate(range(min = 1, max = 10_000_000))]
    pub phone_numbers: u32,

    /// Mean call duration in milliseconds.
    #[validate(range(min = 1))]
    pub mean_call_duration_ms: u64,

    /// Upper bound on a call's duration in milliseconds.
    #[validate(range(min = 1))]
    pub max_call_duration_ms: u64,

    /// Target number of new calls started per millisecond. May be fractional.
    #[validate(range(min = 0.0, max = 1_000_000.0))]
    pub target_events_per_ms: f64,

    /// Seed for the generator's RNG.
    pub seed: u64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            agents: 5000,
            phone_numbers: 5000,
            mean_call_duration_ms: 5_000,
            max_call_duration_ms: 20_000,
            target_events_per_ms: 5.0,
            seed: 0,
        }
    }
}

/// Parameters of the delay/duplication layer between generator and sink.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
#[serde(default)]
pub struct TransformerConfig {
    /// Refill stops once this many events are waiting for delivery.
    #[validate(range(min = 1, max = 10_000_000))]
    pub max_pending: usize,

    /// Chance that an event is sent once more (0.0 to 0.5).
    #[validate(range(min = 0.0, max = 0.5))]
    pub duplication_probability: f64,

    /// Number of distinct extra delays, in milliseconds `0..delay_size`.
    #[validate(range(min = 1, max = 100_000))]
    pub delay_size: u64,

    /// Zipf exponent of the extra delay distribution.
    #[validate(range(min = 0.0, max = 16.0))]
    pub delay_skew: f64,

    /// Seed for the transformer's RNG.
    pub seed: u64,
}

impl Default for TransformerConfig {
    fn default() -> Self {
        Self {
            max_pending: 10_000,
            duplication_probability: 0.05,
            delay_size: 1,
            delay_skew: 1.0,
            seed: 1,
        }
    }
}
