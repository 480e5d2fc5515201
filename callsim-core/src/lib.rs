//! # callsim-core
//!
//! Foundation layer for the call-center workload generator: the event shape,
//! the time-keyed delivery queue and the fixed-size resource pools that the
//! simulator checks agents and phone numbers out of.
//!
//! ### Expectations:
//! - Single-threaded, synchronous, driven by an external clock in milliseconds
//! - O(1) pool checkout/return, O(log n) queue insertion by timestamp
//! - No randomness in this crate; every random draw lives in `callsim-simulator`
//!
//! ### Key Submodules:
//! - `event`: `CallEvent` begin/end halves of a call
//! - `queue`: `DelayedQueue`, releases values no earlier than their ready time
//! - `pool`: `ResourcePool`, free-index checkout/return of reusable tokens
//! - `time`: `VirtualClock` for deterministic runs

pub mod error;
pub mod event;
pub mod pool;
pub mod queue;
pub mod time;

pub mod prelude {
    pub use crate::error::*;
    pub use crate::event::*;
    pub use crate::pool::*;
    pub use crate::queue::*;
    pub use crate::time::*;
}

pub use error::SimulationError;
pub use event::{CallEvent, CallPhase};
pub use pool::{Lease, ResourcePool};
pub use queue::DelayedQueue;
pub use time::VirtualClock;
