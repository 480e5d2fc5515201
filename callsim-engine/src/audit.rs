//! Delivery audit.
//!
//! The transport layer may repeat an event or let a call's end overtake its
//! begin. The audit only counts these; the stream reaching the sink is never
//! altered.

use std::collections::HashMap;

use callsim_core::CallEvent;

#[derive(Debug, Clone, Copy, Default)]
struct Seen {
    begin: bool,
    end: bool,
}

#[derive(Debug, Default)]
pub struct DeliveryAudit {
    calls: HashMap<u64, Seen>,
    duplicates: u64,
    ends_before_start: u64,
}

impl DeliveryAudit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, event: &CallEvent) {
        let seen = self.calls.entry(event.call_id).or_default();
        if event.is_begin() {
            if seen.begin {
                self.duplicates += 1;
            }
            seen.begin = true;
        } else if seen.end {
            self.duplicates += 1;
        } else {
            if !seen.begin {
                self.ends_before_start += 1;
            }
            seen.end = true;
        }
    }

    /// Deliveries of an event half that had already been delivered.
    pub fn duplicates(&self) -> u64 {
        self.duplicates
    }

    /// First deliveries of an end event whose begin had not arrived yet.
    pub fn ends_before_start(&self) -> u64 {
        self.ends_before_start
    }

    /// Calls whose begin was delivered but whose end never was.
    pub fn unfinished_calls(&self) -> usize {
        self.calls.values().filter(|seen| !seen.end).count()
    }
}
