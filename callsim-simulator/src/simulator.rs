//! # Call Event Simulator
//!
//! Generates begin/end pairs for synthetic calls. Each call checks one agent
//! and one phone number out of their pools; the end event waits in an internal
//! [`DelayedQueue`] until the call's duration has elapsed, and returning it
//! puts both tokens back.
//!
//! New calls are paced by a one-millisecond window: every time the driver's
//! clock crosses into a new millisecond the window target becomes
//! `floor(rate) + bernoulli(frac(rate)) + backlog`, where backlog is whatever
//! the previous window failed to emit (for instance because a pool was empty).

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use tracing::{error, info, trace};

use callsim_config::SimulatorConfig;
use callsim_core::{CallEvent, DelayedQueue, Lease, ResourcePool, SimulationError};

use crate::phone::generate_phone_numbers;
use crate::source::EventSource;

/// An end event together with the tokens it returns when released.
#[derive(Debug)]
struct PendingEnd {
    event: CallEvent,
    agent: Lease<u32>,
    phone: Lease<u64>,
}

/// Rate-limiting state for the current one-millisecond window.
#[derive(Debug, Default, Clone, Copy)]
struct RateWindow {
    /// Last millisecond processed; `None` until the first tick.
    current_ms: Option<u64>,
    target: u64,
    emitted: u64,
}

impl RateWindow {
    #[inline]
    fn backlog(&self) -> u64 {
        self.target - self.emitted
    }

    #[inline]
    fn exhausted(&self) -> bool {
        self.emitted >= self.target
    }
}

/// Point-in-time counters for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SimulatorStats {
    /// Begin events emitted.
    pub created: u64,
    /// End events released by `next`.
    pub completed: u64,
    /// End events released by `drain`.
    pub drained: u64,
    /// Calls whose end event is still pending.
    pub in_flight: usize,
    pub agents_available: usize,
    pub phones_available: usize,
    /// Shortfall carried into the current window.
    pub backlog: u64,
}

pub struct CallSimulator {
    rng: SmallRng,
    call_duration: Normal<f64>,
    max_call_duration_ms: u64,
    rate: f64,
    agents: ResourcePool<u32>,
    phone_numbers: ResourcePool<u64>,
    pending_ends: DelayedQueue<PendingEnd>,
    window: RateWindow,
    last_call_id: u64,
    created: u64,
    completed: u64,
    drained: u64,
}

impl CallSimulator {
    /// Builds a simulator, rejecting configurations that could never make progress.
    pub fn new(config: &SimulatorConfig) -> Result<Self, SimulationError> {
        config
            .check()
            .map_err(|e| SimulationError::Config(e.to_string()))?;

        let mean = config.mean_call_duration_ms as f64;
        let call_duration = Normal::new(mean, mean / 2.0)
            .map_err(|e| SimulationError::Config(format!("call duration: {e}")))?;

        let mut rng = SmallRng::seed_from_u64(config.seed);
        let phone_numbers = generate_phone_numbers(&mut rng, config.phone_numbers as usize);

        info!(
            agents = config.agents,
            phone_numbers = config.phone_numbers,
            mean_call_duration_ms = config.mean_call_duration_ms,
            max_call_duration_ms = config.max_call_duration_ms,
            target_events_per_ms = config.target_events_per_ms,
            seed = config.seed,
            "Call simulator initialized"
        );

        Ok(Self {
            rng,
            call_duration,
            max_call_duration_ms: config.max_call_duration_ms,
            rate: config.target_events_per_ms,
            agents: ResourcePool::from_tokens((0..config.agents).collect()),
            phone_numbers: ResourcePool::from_tokens(phone_numbers),
            pending_ends: DelayedQueue::new(),
            window: RateWindow::default(),
            last_call_id: 0,
            created: 0,
            completed: 0,
            drained: 0,
        })
    }

    /// Steps the simulator at `now_ms`.
    ///
    /// Due end events take priority over new calls so that tokens recycle
    /// before the pools starve. Returns `None` when nothing is due and either
    /// the window quota is spent or a pool is empty.
    pub fn next(&mut self, now_ms: u64) -> Option<CallEvent> {
        self.roll_window(now_ms);

        // Strictly earlier than now: a call ending this millisecond waits a tick.
        if let Some(pending) = now_ms
            .checked_sub(1)
            .and_then(|cutoff| self.pending_ends.next_ready(cutoff))
        {
            let event = self.recycle(pending);
            self.completed += 1;
            self.verify();
            return Some(event);
        }

        if self.window.exhausted() {
            self.verify();
            return None;
        }

        let event = self.start_call(now_ms);
        self.verify();
        event
    }

    /// Releases one pending end event regardless of its time, recycling its tokens.
    pub fn drain(&mut self) -> Option<CallEvent> {
        let event = self.pending_ends.drain().map(|pending| self.recycle(pending));
        if event.is_some() {
            self.drained += 1;
        }
        self.verify();
        event
    }

    /// Checks that outstanding agents, outstanding phone numbers and pending
    /// end events all agree.
    pub fn check_invariants(&self) -> Result<(), SimulationError> {
        let outstanding_agents = self.agents.checked_out();
        let outstanding_phones = self.phone_numbers.checked_out();
        let pending = self.pending_ends.len();

        if outstanding_agents != outstanding_phones {
            return Err(SimulationError::Inconsistent(format!(
                "outstanding agents ({outstanding_agents}) != outstanding phones ({outstanding_phones})"
            )));
        }
        if outstanding_agents != pending {
            return Err(SimulationError::Inconsistent(format!(
                "outstanding agents ({outstanding_agents}) != pending end events ({pending})"
            )));
        }
        Ok(())
    }

    pub fn stats(&self) -> SimulatorStats {
        SimulatorStats {
            created: self.created,
            completed: self.completed,
            drained: self.drained,
            in_flight: self.pending_ends.len(),
            agents_available: self.agents.available(),
            phones_available: self.phone_numbers.available(),
            backlog: self.window.backlog(),
        }
    }

    /// Calls started but not yet ended.
    #[inline]
    pub fn in_flight(&self) -> usize {
        self.pending_ends.len()
    }

    #[inline]
    pub fn backlog(&self) -> u64 {
        self.window.backlog()
    }

    fn roll_window(&mut self, now_ms: u64) {
        if self.window.current_ms.is_some_and(|current| now_ms <= current) {
            return;
        }

        let backlog = self.window.backlog();
        let whole = self.rate.floor();
        let extra = u64::from(self.rng.random_bool(self.rate - whole));
        self.window = RateWindow {
            current_ms: Some(now_ms),
            target: whole as u64 + extra + backlog,
            emitted: 0,
        };
        trace!(now_ms, target = self.window.target, backlog, "Rate window opened");
    }

    fn start_call(&mut self, now_ms: u64) -> Option<CallEvent> {
        if self.agents.available() == 0 || self.phone_numbers.available() == 0 {
            trace!(now_ms, "Resource pools exhausted");
            return None;
        }
        let (Some(agent), Some(phone)) = (self.agents.acquire(), self.phone_numbers.acquire())
        else {
            return None;
        };

        self.last_call_id += 1;
        let call_id = self.last_call_id;
        let duration_ms = self.sample_duration();

        let begin = CallEvent::begin(call_id, agent.token(), phone.token(), now_ms);
        let end_ms = now_ms + duration_ms;
        let end = CallEvent::end(call_id, agent.token(), phone.token(), end_ms);
        self.pending_ends.add(
            end_ms,
            PendingEnd {
                event: end,
                agent,
                phone,
            },
        );

        self.window.emitted += 1;
        self.created += 1;
        Some(begin)
    }

    /// Normal(mean, mean / 2) truncated to whole milliseconds, resampled until
    /// it lies in `(0, max]`.
    fn sample_duration(&mut self) -> u64 {
        loop {
            let sample = self.call_duration.sample(&mut self.rng) as i64;
            if sample > 0 && sample as u64 <= self.max_call_duration_ms {
                return sample as u64;
            }
        }
    }

    fn recycle(&mut self, pending: PendingEnd) -> CallEvent {
        let PendingEnd {
            event,
            agent,
            phone,
        } = pending;
        if let Err(e) = self
            .agents
            .release(agent)
            .and_then(|_| self.phone_numbers.release(phone))
        {
            fatal(e);
        }
        event
    }

    fn verify(&self) {
        if let Err(e) = self.check_invariants() {
            fatal(e);
        }
    }
}

/// Bookkeeping defects abort the run.
fn fatal(err: SimulationError) -> ! {
    error!("{err}");
    panic!("call simulator invariant violated: {err}");
}

impl EventSource for CallSimulator {
    type Event = CallEvent;

    fn next(&mut self, now_ms: u64) -> Option<CallEvent> {
        CallSimulator::next(self, now_ms)
    }

    fn drain(&mut self) -> Option<CallEvent> {
        CallSimulator::drain(self)
    }

    fn pending(&self) -> usize {
        self.in_flight()
    }
}
