// callsim-engine/src/lib.rs

/*!
# callsim Engine

Drives an event source against a clock and a sink, and reports what was
delivered. Frontends (the CLI, embedding applications, integration tests)
share this loop instead of each stepping the simulator by hand.

## Key Components:
- **Clock:** wall time for live runs, a virtual counter for reproducible ones.
- **Sink:** where delivered events go.
- **Runner:** warmup, measured run and drain, with metrics and a stream fingerprint.
*/

pub mod audit;
pub mod clock;
pub mod error;
pub mod report;
pub mod runner;
pub mod runtime;
pub mod sink;

pub use clock::{Clock, WallClock};
pub use error::EngineError;
pub use report::{Fingerprint, PhaseTally, Report};
pub use runner::Runner;
pub use runtime::run_simulation;
pub use sink::{CollectSink, EventSink, LogSink, NullSink};
