//! ## callsim-telemetry::metrics
//! **Prometheus counters for delivered traffic**
//!
//! Counters are cumulative over the whole process; per-phase numbers live in
//! the driver's run report instead.

use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub begin_events: IntCounter,
    pub end_events: IntCounter,
    pub idle_ticks: IntCounter,
    pub pending_events: IntGauge,
}

impl MetricsRecorder {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let begin_events =
            IntCounter::new("callsim_begin_events_total", "Call begin events delivered")?;
        let end_events = IntCounter::new("callsim_end_events_total", "Call end events delivered")?;
        let idle_ticks = IntCounter::new(
            "callsim_idle_ticks_total",
            "Driver ticks with nothing ready to deliver",
        )?;
        let pending_events = IntGauge::new(
            "callsim_pending_events",
            "Events generated but not yet delivered",
        )?;

        registry.register(Box::new(begin_events.clone()))?;
        registry.register(Box::new(end_events.clone()))?;
        registry.register(Box::new(idle_ticks.clone()))?;
        registry.register(Box::new(pending_events.clone()))?;

        Ok(Self {
            registry,
            begin_events,
            end_events,
            idle_ticks,
            pending_events,
        })
    }

    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    #[inline]
    pub fn record_delivery(&self, is_begin: bool) {
        if is_begin {
            self.begin_events.inc();
        } else {
            self.end_events.inc();
        }
    }

    #[inline]
    pub fn record_idle(&self) {
        self.idle_ticks.inc();
    }

    #[inline]
    pub fn set_pending(&self, pending: usize) {
        self.pending_events.set(pending as i64);
    }
}
