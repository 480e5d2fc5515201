//! # Runner
//!
//! Pulls events from a source at the clock's current time and hands them to a
//! sink. A run has three phases:
//!
//! 1. **warmup**: events are delivered but tallied apart from the measurement
//! 2. **run**: the measured phase
//! 3. **drain**: time is ignored and the source is emptied, so every call that
//!    was started also has its end delivered

use tracing::{info, instrument};

use callsim_config::{ClockKind, RunConfig, SinkKind};
use callsim_core::{CallEvent, VirtualClock};
use callsim_simulator::EventSource;
use callsim_telemetry::{EventLogger, MetricsRecorder};

use crate::audit::DeliveryAudit;
use crate::clock::{Clock, WallClock};
use crate::error::EngineError;
use crate::report::{Fingerprint, PhaseTally, Report};
use crate::sink::{EventSink, LogSink, NullSink};

pub struct Runner {
    clock: Box<dyn Clock>,
    sink: Box<dyn EventSink>,
    metrics: MetricsRecorder,
    warmup_ms: u64,
    duration_ms: u64,
    audit_enabled: bool,
    audit: DeliveryAudit,
    fingerprint: Fingerprint,
}

impl Runner {
    pub fn new(
        config: &RunConfig,
        clock: Box<dyn Clock>,
        sink: Box<dyn EventSink>,
        metrics: MetricsRecorder,
    ) -> Self {
        Self {
            clock,
            sink,
            metrics,
            warmup_ms: config.warmup_secs.saturating_mul(1_000),
            duration_ms: config.duration_secs.saturating_mul(1_000),
            audit_enabled: config.audit,
            audit: DeliveryAudit::new(),
            fingerprint: Fingerprint::new(),
        }
    }

    /// Uses the built-in clock and sink selected by `config`.
    pub fn from_config(config: &RunConfig, metrics: MetricsRecorder) -> Self {
        let clock: Box<dyn Clock> = match config.clock {
            ClockKind::Wall => Box::new(WallClock),
            ClockKind::Virtual => Box::new(VirtualClock::new(0)),
        };
        let sink: Box<dyn EventSink> = match config.sink {
            SinkKind::Log => Box::new(LogSink),
            SinkKind::Null => Box::new(NullSink),
        };
        Self::new(config, clock, sink, metrics)
    }

    #[instrument(level = "info", name = "runner", skip_all)]
    pub async fn run<S>(&mut self, source: &mut S) -> Result<Report, EngineError>
    where
        S: EventSource<Event = CallEvent>,
    {
        self.audit = DeliveryAudit::new();
        self.fingerprint = Fingerprint::new();

        let start_ms = self.clock.now_ms();
        let warmup_end = start_ms.saturating_add(self.warmup_ms);
        let run_end = warmup_end.saturating_add(self.duration_ms);

        EventLogger::log_phase("warmup", self.warmup_ms);
        let warmup = self.deliver_until(source, warmup_end).await?;

        EventLogger::log_phase("run", self.duration_ms);
        let measured_start = self.clock.now_ms();
        let measured = self.deliver_until(source, run_end).await?;
        let measured_ms = self.clock.now_ms().saturating_sub(measured_start);

        EventLogger::log_phase("drain", 0);
        let mut drained = 0;
        while let Some(event) = source.drain() {
            self.deliver(event).await?;
            drained += 1;
        }
        self.metrics.set_pending(source.pending());
        info!(drained, "Drain complete");

        let (duplicates, ends_before_start) = if self.audit_enabled {
            (self.audit.duplicates(), self.audit.ends_before_start())
        } else {
            (0, 0)
        };

        Ok(Report {
            warmup,
            measured,
            drained,
            measured_ms,
            events_per_ms: measured.total() as f64 / measured_ms.max(1) as f64,
            duplicates,
            ends_before_start,
            fingerprint: self.fingerprint.hex(),
        })
    }

    async fn deliver_until<S>(
        &mut self,
        source: &mut S,
        until_ms: u64,
    ) -> Result<PhaseTally, EngineError>
    where
        S: EventSource<Event = CallEvent>,
    {
        let mut tally = PhaseTally::default();
        loop {
            let now_ms = self.clock.now_ms();
            if now_ms >= until_ms {
                return Ok(tally);
            }
            match source.next(now_ms) {
                Some(event) => {
                    tally.record(&event);
                    self.deliver(event).await?;
                }
                None => {
                    self.metrics.record_idle();
                    self.metrics.set_pending(source.pending());
                    self.clock.idle().await;
                }
            }
        }
    }

    async fn deliver(&mut self, event: CallEvent) -> Result<(), EngineError> {
        if self.audit_enabled {
            self.audit.observe(&event);
        }
        self.fingerprint.update(&event);
        self.metrics.record_delivery(event.is_begin());
        self.sink.accept(event).await?;
        Ok(())
    }
}
