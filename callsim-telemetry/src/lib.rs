//! # callsim Telemetry
//!
//! Crate for logging and metrics of a generator run.

pub mod logging;
pub mod metrics;

pub use logging::EventLogger;
pub use metrics::MetricsRecorder;
