//! Call event types.

use serde::{Deserialize, Serialize};

/// Which half of a call an event represents, with the matching timestamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallPhase {
    Begin { start_ms: u64 },
    End { end_ms: u64 },
}

/// One half of a simulated call. A call produces exactly one `Begin` and one
/// `End` event sharing `call_id`, `agent_id` and `phone_number`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallEvent {
    /// Monotonically increasing call identifier
    pub call_id: u64,

    /// Agent handling the call, checked out of the agent pool
    pub agent_id: u32,

    /// Caller's number, checked out of the phone number pool
    pub phone_number: u64,

    pub phase: CallPhase,
}

impl CallEvent {
    #[inline]
    pub fn begin(call_id: u64, agent_id: u32, phone_number: u64, start_ms: u64) -> Self {
        Self {
            call_id,
            agent_id,
            phone_number,
            phase: CallPhase::Begin { start_ms },
        }
    }

    #[inline]
    pub fn end(call_id: u64, agent_id: u32, phone_number: u64, end_ms: u64) -> Self {
        Self {
            call_id,
            agent_id,
            phone_number,
            phase: CallPhase::End { end_ms },
        }
    }

    /// Start timestamp, present only on a begin event.
    pub fn start_timestamp(&self) -> Option<u64> {
        match self.phase {
            CallPhase::Begin { start_ms } => Some(start_ms),
            CallPhase::End { .. } => None,
        }
    }

    /// End timestamp, present only on an end event.
    pub fn end_timestamp(&self) -> Option<u64> {
        match self.phase {
            CallPhase::Begin { .. } => None,
            CallPhase::End { end_ms } => Some(end_ms),
        }
    }

    #[inline]
    pub fn is_begin(&self) -> bool {
        matches!(self.phase, CallPhase::Begin { .. })
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        matches!(self.phase, CallPhase::End { .. })
    }

    /// The timestamp carried by this event, whichever half it is.
    pub fn timestamp(&self) -> u64 {
        match self.phase {
            CallPhase::Begin { start_ms } => start_ms,
            CallPhase::End { end_ms } => end_ms,
        }
    }
}
