//! Run summary and stream fingerprint.

use std::fs::File;
use std::path::Path;

use blake3::Hasher;
use serde::Serialize;

use callsim_core::{CallEvent, CallPhase};

use crate::error::EngineError;

/// Begin and end deliveries within one phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PhaseTally {
    pub begins: u64,
    pub ends: u64,
}

impl PhaseTally {
    #[inline]
    pub fn record(&mut self, event: &CallEvent) {
        if event.is_begin() {
            self.begins += 1;
        } else {
            self.ends += 1;
        }
    }

    #[inline]
    pub fn total(&self) -> u64 {
        self.begins + self.ends
    }
}

/// Order-sensitive BLAKE3 digest of every delivered event.
#[derive(Debug, Clone, Default)]
pub struct Fingerprint {
    hasher: Hasher,
}

impl Fingerprint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, event: &CallEvent) {
        let (tag, timestamp) = match event.phase {
            CallPhase::Begin { start_ms } => (0u8, start_ms),
            CallPhase::End { end_ms } => (1u8, end_ms),
        };
        self.hasher.update(&event.call_id.to_le_bytes());
        self.hasher.update(&event.agent_id.to_le_bytes());
        self.hasher.update(&event.phone_number.to_le_bytes());
        self.hasher.update(&[tag]);
        self.hasher.update(&timestamp.to_le_bytes());
    }

    pub fn hex(&self) -> String {
        hex::encode(self.hasher.finalize().as_bytes())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub warmup: PhaseTally,
    pub measured: PhaseTally,
    /// Events delivered after the measured phase by draining the source.
    pub drained: u64,
    /// Clock time covered by the measured phase.
    pub measured_ms: u64,
    pub events_per_ms: f64,
    pub duplicates: u64,
    pub ends_before_start: u64,
    pub fingerprint: String,
}

impl Report {
    pub fn total_delivered(&self) -> u64 {
        self.warmup.total() + self.measured.total() + self.drained
    }

    pub fn verify_fingerprint(&self, expected: &str) -> Result<(), EngineError> {
        if self.fingerprint.eq_ignore_ascii_case(expected) {
            Ok(())
        } else {
            Err(EngineError::FingerprintMismatch {
                expected: expected.to_owned(),
                actual: self.fingerprint.clone(),
            })
        }
    }

    pub fn write_yaml(&self, path: &Path) -> Result<(), EngineError> {
        let file = File::create(path)?;
        serde_yaml::to_writer(file, self)?;
        Ok(())
    }
}
