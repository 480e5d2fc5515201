//! # Network Jitter Transformer
//!
//! Emulates an unreliable link between the generator and the sink. Every event
//! pulled from the wrapped source is held back by an extra Zipf-distributed
//! delay and, with a small probability, sent more than once. Each copy draws
//! its own delay, so duplicates may overtake one another and may also overtake
//! the other half of their call: an end event can reach the sink before its
//! begin event. Sinks must tolerate both.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use callsim_config::TransformerConfig;
use callsim_core::{DelayedQueue, SimulationError};

use crate::network::delay::ZipfDelay;
use crate::source::EventSource;

/// Upper bound on extra copies of a single event.
pub const MAX_DUPLICATES: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransformerStats {
    /// Events pulled from the source.
    pub received: u64,
    /// Extra copies queued on top of `received`.
    pub duplicated: u64,
    /// Events handed out by `next` or `drain`.
    pub delivered: u64,
    /// Events waiting in the transformer's own queue.
    pub pending: usize,
}

/// Borrows its source for its whole lifetime; the source keeps ownership of
/// its own state and can be inspected again once the transformer is dropped.
pub struct NetworkJitterTransformer<'a, S: EventSource> {
    source: &'a mut S,
    delayed: DelayedQueue<S::Event>,
    delays: ZipfDelay,
    rng: SmallRng,
    max_pending: usize,
    duplication_probability: f64,
    received: u64,
    duplicated: u64,
    delivered: u64,
}

impl<'a, S> NetworkJitterTransformer<'a, S>
where
    S: EventSource,
    S::Event: Clone,
{
    pub fn new(config: &TransformerConfig, source: &'a mut S) -> Result<Self, SimulationError> {
        config
            .check()
            .map_err(|e| SimulationError::Config(e.to_string()))?;
        let delays = ZipfDelay::new(config.delay_size, config.delay_skew)?;

        info!(
            max_pending = config.max_pending,
            duplication_probability = config.duplication_probability,
            delay_size = config.delay_size,
            delay_skew = config.delay_skew,
            seed = config.seed,
            "Network jitter transformer initialized"
        );

        Ok(Self {
            source,
            delayed: DelayedQueue::new(),
            delays,
            rng: SmallRng::seed_from_u64(config.seed),
            max_pending: config.max_pending,
            duplication_probability: config.duplication_probability,
            received: 0,
            duplicated: 0,
            delivered: 0,
        })
    }

    /// Refills from the source up to `max_pending`, then returns the next event
    /// whose delivery time has come.
    pub fn next(&mut self, now_ms: u64) -> Option<S::Event> {
        while self.delayed.len() < self.max_pending {
            let Some(event) = self.source.next(now_ms) else {
                break;
            };
            self.received += 1;
            self.transform_and_queue(event, now_ms);
        }

        let event = self.delayed.next_ready(now_ms);
        if event.is_some() {
            self.delivered += 1;
        }
        event
    }

    /// Queues `event` (and any duplicates) at `now_ms` plus a sampled delay.
    pub fn transform_and_queue(&mut self, event: S::Event, now_ms: u64) {
        let extra_copies = self.extra_copies();
        self.duplicated += u64::from(extra_copies);
        for _ in 0..extra_copies {
            let delay_ms = self.delays.sample(&mut self.rng);
            self.delayed.add(now_ms + delay_ms, event.clone());
        }

        let delay_ms = self.delays.sample(&mut self.rng);
        self.delayed.add(now_ms + delay_ms, event);
    }

    /// Returns a queued event if any, otherwise whatever the source still holds.
    pub fn drain(&mut self) -> Option<S::Event> {
        let event = self.delayed.drain().or_else(|| self.source.drain());
        if event.is_some() {
            self.delivered += 1;
        }
        event
    }

    pub fn stats(&self) -> TransformerStats {
        TransformerStats {
            received: self.received,
            duplicated: self.duplicated,
            delivered: self.delivered,
            pending: self.delayed.len(),
        }
    }

    #[inline]
    pub fn source(&self) -> &S {
        &*self.source
    }

    /// Each success of the duplication coin adds a copy, up to the cap.
    fn extra_copies(&mut self) -> u32 {
        let mut copies = 0;
        while copies < MAX_DUPLICATES && self.rng.random_bool(self.duplication_probability) {
            copies += 1;
        }
        copies
    }
}

impl<S> EventSource for NetworkJitterTransformer<'_, S>
where
    S: EventSource,
    S::Event: Clone,
{
    type Event = S::Event;

    fn next(&mut self, now_ms: u64) -> Option<S::Event> {
        NetworkJitterTransformer::next(self, now_ms)
    }

    fn drain(&mut self) -> Option<S::Event> {
        NetworkJitterTransformer::drain(self)
    }

    fn pending(&self) -> usize {
        self.delayed.len() + self.source.pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CallSimulator;
    use callsim_config::SimulatorConfig;
    use callsim_core::CallEvent;
    use std::collections::{HashMap, HashSet};

    /// Emits 0, 1, 2, ... once per call, `per_tick` times per millisecond.
    struct Counter {
        next_value: u64,
        per_tick: u64,
        tick: Option<u64>,
        emitted_this_tick: u64,
    }

    impl Counter {
        fn new(per_tick: u64) -> Self {
            Self {
                next_value: 0,
                per_tick,
                tick: None,
                emitted_this_tick: 0,
            }
        }
    }

    impl EventSource for Counter {
        type Event = u64;

        fn next(&mut self, now_ms: u64) -> Option<u64> {
            if self.tick != Some(now_ms) {
                self.tick = Some(now_ms);
                self.emitted_this_tick = 0;
            }
            if self.emitted_this_tick == self.per_tick {
                return None;
            }
            self.emitted_this_tick += 1;
            self.next_value += 1;
            Some(self.next_value - 1)
        }

        fn drain(&mut self) -> Option<u64> {
            None
        }
    }

    fn transformer_config(duplication_probability: f64, delay_size: u64) -> TransformerConfig {
        TransformerConfig {
            max_pending: 10_000,
            duplication_probability,
            delay_size,
            delay_skew: 1.0,
            seed: 11,
        }
    }

    fn simulator_config() -> SimulatorConfig {
        SimulatorConfig {
            agents: 40,
            phone_numbers: 40,
            mean_call_duration_ms: 300,
            max_call_duration_ms: 1_000,
            target_events_per_ms: 0.8,
            seed: 5,
        }
    }

    #[test]
    fn without_jitter_order_is_preserved() {
        let mut direct = CallSimulator::new(&simulator_config()).unwrap();
        let mut expected = Vec::new();
        for now in 0..2_000 {
            while let Some(event) = direct.next(now) {
                expected.push(event);
            }
        }

        let mut wrapped = CallSimulator::new(&simulator_config()).unwrap();
        let mut transformer =
            NetworkJitterTransformer::new(&transformer_config(0.0, 1), &mut wrapped).unwrap();
        let mut delivered = Vec::new();
        for now in 0..2_000 {
            while let Some(event) = transformer.next(now) {
                delivered.push(event);
            }
        }
        assert_eq!(delivered, expected);
        assert_eq!(transformer.stats().duplicated, 0);
    }

    #[test]
    fn refill_stops_at_max_pending() {
        let mut source = Counter::new(u64::MAX);
        let config = TransformerConfig {
            max_pending: 5,
            ..transformer_config(0.0, 1)
        };
        let mut transformer = NetworkJitterTransformer::new(&config, &mut source).unwrap();
        assert_eq!(transformer.next(0), Some(0));
        let stats = transformer.stats();
        assert_eq!(stats.received, 5);
        assert_eq!(stats.pending, 4);
    }

    #[test]
    fn delayed_events_are_not_released_early() {
        let mut source = Counter::new(1);
        let mut transformer =
            NetworkJitterTransformer::new(&transformer_config(0.0, 50), &mut source).unwrap();
        let mut released_at = HashMap::new();
        for now in 0..500 {
            while let Some(value) = transformer.next(now) {
                released_at.insert(value, now);
            }
        }
        // The counter emits value `n` at millisecond `n`.
        for (value, now) in released_at {
            assert!(now >= value);
            assert!(now - value < 50);
        }
    }

    #[test]
    fn duplicates_are_counted_and_delivered() {
        let mut source = Counter::new(3);
        let mut transformer =
            NetworkJitterTransformer::new(&transformer_config(0.5, 20), &mut source).unwrap();
        let mut delivered = Vec::new();
        for now in 0..1_000 {
            while let Some(value) = transformer.next(now) {
                delivered.push(value);
            }
        }
        while let Some(value) = transformer.drain() {
            delivered.push(value);
        }

        let stats = transformer.stats();
        assert_eq!(stats.received, 3_000);
        assert!(stats.duplicated > 0);
        assert_eq!(delivered.len() as u64, stats.received + stats.duplicated);
        assert_eq!(stats.delivered, delivered.len() as u64);

        let distinct: HashSet<u64> = delivered.iter().copied().collect();
        assert_eq!(distinct.len(), 3_000);
    }

    #[test]
    fn duplication_is_capped() {
        let mut source = Counter::new(1);
        let mut transformer =
            NetworkJitterTransformer::new(&transformer_config(0.0, 1), &mut source).unwrap();
        transformer.duplication_probability = 1.0;
        transformer.transform_and_queue(42, 0);
        assert_eq!(transformer.stats().pending, MAX_DUPLICATES as usize + 1);
    }

    #[test]
    fn drain_flushes_transformer_then_simulator() {
        let mut simulator = CallSimulator::new(&simulator_config()).unwrap();
        let mut events: Vec<CallEvent> = Vec::new();
        {
            let mut transformer =
                NetworkJitterTransformer::new(&transformer_config(0.05, 30), &mut simulator)
                    .unwrap();
            for now in 0..1_500 {
                while let Some(event) = transformer.next(now) {
                    events.push(event);
                }
            }
            assert!(transformer.pending() > 0);
            while let Some(event) = transformer.drain() {
                events.push(event);
            }
            assert_eq!(transformer.pending(), 0);
            assert_eq!(transformer.drain(), None);
        }

        assert_eq!(simulator.in_flight(), 0);
        let begins: HashSet<u64> = events
            .iter()
            .filter(|e| e.is_begin())
            .map(|e| e.call_id)
            .collect();
        let ends: HashSet<u64> = events.iter().filter(|e| e.is_end()).map(|e| e.call_id).collect();
        assert!(!begins.is_empty());
        assert_eq!(begins, ends);
    }

    #[test]
    fn same_seeds_same_delivery() {
        let run = || {
            let mut simulator = CallSimulator::new(&simulator_config()).unwrap();
            let mut transformer =
                NetworkJitterTransformer::new(&transformer_config(0.1, 40), &mut simulator)
                    .unwrap();
            let mut delivered = Vec::new();
            for now in 0..1_000 {
                while let Some(event) = transformer.next(now) {
                    delivered.push(event);
                }
            }
            delivered
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        let mut source = Counter::new(1);
        let config = TransformerConfig {
            delay_size: 0,
            ..transformer_config(0.0, 1)
        };
        assert!(matches!(
            NetworkJitterTransformer::new(&config, &mut source),
            Err(SimulationError::Config(_))
        ));
    }
}
