// callsim-simulator/src/lib.rs

/*!
# callsim Simulator

Synthetic call-center traffic: a resource-pooled generator of begin/end call
events paced to a target rate, and a transport model that delays and
duplicates those events on their way to a consumer.

## Key Components:
- **Event Source:** pull-based `next(now)` / `drain()` protocol shared by every stage.
- **Call Simulator:** agent and phone number pools, normal call durations, per-millisecond rate windows.
- **Network Models:** Zipf-distributed extra delay and probabilistic duplication.
*/

pub mod network;
pub mod phone;
pub mod simulator;
pub mod source;

pub use network::delay::ZipfDelay;
pub use network::jitter::{NetworkJitterTransformer, TransformerStats, MAX_DUPLICATES};
pub use simulator::{CallSimulator, SimulatorStats};
pub use source::EventSource;
