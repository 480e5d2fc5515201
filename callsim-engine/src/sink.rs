//! Destinations for delivered events.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use callsim_core::{CallEvent, SimulationError};

#[async_trait]
pub trait EventSink: Send {
    async fn accept(&mut self, event: CallEvent) -> Result<(), SimulationError>;
}

/// Emits one `debug` trace per event.
#[derive(Debug, Default)]
pub struct LogSink;

#[async_trait]
impl EventSink for LogSink {
    async fn accept(&mut self, event: CallEvent) -> Result<(), SimulationError> {
        debug!(
            call_id = event.call_id,
            agent_id = event.agent_id,
            phone_number = event.phone_number,
            phase = ?event.phase,
            "Event delivered"
        );
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct NullSink;

#[async_trait]
impl EventSink for NullSink {
    async fn accept(&mut self, _event: CallEvent) -> Result<(), SimulationError> {
        Ok(())
    }
}

/// Appends every event to a buffer shared with whoever holds a clone.
#[derive(Debug, Clone, Default)]
pub struct CollectSink {
    events: Arc<Mutex<Vec<CallEvent>>>,
}

impl CollectSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything collected so far.
    pub fn events(&self) -> Vec<CallEvent> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

#[async_trait]
impl EventSink for CollectSink {
    async fn accept(&mut self, event: CallEvent) -> Result<(), SimulationError> {
        self.events.lock().push(event);
        Ok(())
    }
}
