use std::collections::HashSet;

use callsim_config::{
    CallSimConfig, ClockKind, RunConfig, SimulatorConfig, SinkKind, TransformerConfig,
};
use callsim_core::{CallEvent, VirtualClock};
use callsim_engine::{run_simulation, CollectSink, Runner};
use callsim_simulator::{CallSimulator, NetworkJitterTransformer};
use callsim_telemetry::MetricsRecorder;

fn config(seed: u64) -> CallSimConfig {
    CallSimConfig {
        simulator: SimulatorConfig {
            agents: 60,
            phone_numbers: 60,
            mean_call_duration_ms: 150,
            max_call_duration_ms: 600,
            target_events_per_ms: 0.4,
            seed,
        },
        transformer: TransformerConfig {
            max_pending: 10_000,
            duplication_probability: 0.05,
            delay_size: 25,
            delay_skew: 1.0,
            seed: seed + 1,
        },
        run: RunConfig {
            warmup_secs: 1,
            duration_secs: 2,
            clock: ClockKind::Virtual,
            sink: SinkKind::Null,
            audit: true,
        },
    }
}

fn collecting_runner(run: &RunConfig, sink: &CollectSink, metrics: MetricsRecorder) -> Runner {
    Runner::new(
        run,
        Box::new(VirtualClock::new(0)),
        Box::new(sink.clone()),
        metrics,
    )
}

fn halves(events: &[CallEvent]) -> (HashSet<u64>, HashSet<u64>) {
    let begins = events.iter().filter(|e| e.is_begin()).map(|e| e.call_id).collect();
    let ends = events.iter().filter(|e| e.is_end()).map(|e| e.call_id).collect();
    (begins, ends)
}

#[tokio::test]
async fn equal_seeds_give_equal_fingerprints() {
    let first = run_simulation(&config(7), MetricsRecorder::new().unwrap())
        .await
        .unwrap();
    let second = run_simulation(&config(7), MetricsRecorder::new().unwrap())
        .await
        .unwrap();
    let other = run_simulation(&config(8), MetricsRecorder::new().unwrap())
        .await
        .unwrap();

    assert_eq!(first.fingerprint, second.fingerprint);
    assert_eq!(first.total_delivered(), second.total_delivered());
    second.verify_fingerprint(&first.fingerprint).unwrap();
    assert!(other.verify_fingerprint(&first.fingerprint).is_err());
}

#[tokio::test]
async fn jittered_run_delivers_every_call_completely() {
    let config = config(3);
    let mut simulator = CallSimulator::new(&config.simulator).unwrap();
    let sink = CollectSink::new();
    let mut runner = collecting_runner(&config.run, &sink, MetricsRecorder::new().unwrap());

    let report = {
        let mut transformer =
            NetworkJitterTransformer::new(&config.transformer, &mut simulator).unwrap();
        runner.run(&mut transformer).await.unwrap()
    };

    assert_eq!(simulator.in_flight(), 0);
    simulator.check_invariants().unwrap();

    let events = sink.events();
    assert_eq!(events.len() as u64, report.total_delivered());
    assert!(report.warmup.begins > 0);
    assert!(report.measured.begins > 0);
    assert_eq!(report.measured_ms, 2_000);

    let (begins, ends) = halves(&events);
    assert_eq!(begins, ends);

    let distinct: HashSet<(u64, bool)> = events.iter().map(|e| (e.call_id, e.is_begin())).collect();
    assert_eq!(report.duplicates, (events.len() - distinct.len()) as u64);
    assert!(report.duplicates > 0);
}

#[tokio::test]
async fn direct_run_has_no_transport_anomalies() {
    let config = config(11);
    let mut simulator = CallSimulator::new(&config.simulator).unwrap();
    let sink = CollectSink::new();
    let metrics = MetricsRecorder::new().unwrap();
    let mut runner = collecting_runner(&config.run, &sink, metrics.clone());

    let report = runner.run(&mut simulator).await.unwrap();

    assert_eq!(report.duplicates, 0);
    assert_eq!(report.ends_before_start, 0);
    assert_eq!(simulator.in_flight(), 0);

    let events = sink.events();
    let (begins, ends) = halves(&events);
    assert_eq!(begins, ends);
    assert_eq!(metrics.begin_events.get(), begins.len() as u64);
    assert_eq!(metrics.end_events.get(), ends.len() as u64);
    assert_eq!(metrics.pending_events.get(), 0);

    // Every end carries a timestamp strictly after its begin.
    for event in events.iter().filter(|e| e.is_end()) {
        let begin = events
            .iter()
            .find(|b| b.is_begin() && b.call_id == event.call_id)
            .unwrap();
        assert!(event.timestamp() > begin.timestamp());
    }
}

#[tokio::test]
async fn invalid_configuration_fails_before_running() {
    let mut config = config(1);
    config.simulator.max_call_duration_ms = 10;
    let result = run_simulation(&config, MetricsRecorder::new().unwrap()).await;
    assert!(matches!(result, Err(callsim_engine::EngineError::Config(_))));
}
