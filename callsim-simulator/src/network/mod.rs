//! ## callsim-simulator::network
//! **Transport condition models between generator and sink**
//!
//! ### Key Submodules:
//! - `delay`: Zipf-shaped extra delay sampler
//! - `jitter`: delay/duplication transformer wrapping any `EventSource`

pub mod delay;
pub mod jitter;
