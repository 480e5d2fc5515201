//! ## callsim-telemetry::logging
//! **Structured logging with `tracing`**
//!
//! `RUST_LOG` selects the level (default `info`). Per-event traces are emitted
//! at `debug`, window and pool details at `trace`.

use tracing::info_span;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    pub fn init() {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_thread_names(true)
            .with_span_events(FmtSpan::ENTER)
            .init()
    }

    /// Logs the start of a driver phase (`warmup`, `run`, `drain`).
    #[inline]
    pub fn log_phase(phase: &str, duration_ms: u64) {
        let span = info_span!("phase", phase = phase);
        let _entered = span.enter();
        tracing::info!(duration_ms, "Entering {phase} phase");
    }
}
