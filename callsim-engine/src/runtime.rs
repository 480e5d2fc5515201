// callsim-engine/src/runtime.rs

/*!
# Runtime

Wires the configured generator, transport model and driver together. This is
the one place that knows the full pipeline:

`CallSimulator` → `NetworkJitterTransformer` → `Runner` → sink
*/

use tracing::{info, instrument};

use callsim_config::CallSimConfig;
use callsim_simulator::{CallSimulator, NetworkJitterTransformer};
use callsim_telemetry::MetricsRecorder;

use crate::error::EngineError;
use crate::report::Report;
use crate::runner::Runner;

/// Runs one complete generation: warmup, measured phase and drain.
#[instrument(
    level = "info",
    name = "run_simulation",
    skip_all,
    fields(seed = config.simulator.seed)
)]
pub async fn run_simulation(
    config: &CallSimConfig,
    metrics: MetricsRecorder,
) -> Result<Report, EngineError> {
    config.check()?;

    let mut simulator = CallSimulator::new(&config.simulator)?;
    let mut runner = Runner::from_config(&config.run, metrics);

    let report = {
        let mut transformer = NetworkJitterTransformer::new(&config.transformer, &mut simulator)?;
        let report = runner.run(&mut transformer).await?;
        let stats = transformer.stats();
        info!(
            received = stats.received,
            duplicated = stats.duplicated,
            delivered = stats.delivered,
            in_flight = transformer.source().in_flight(),
            "Transformer finished"
        );
        report
    };

    simulator.check_invariants()?;
    let stats = simulator.stats();
    info!(
        created = stats.created,
        completed = stats.completed,
        drained = stats.drained,
        "Simulator finished"
    );
    info!(
        fingerprint = %report.fingerprint,
        duplicates = report.duplicates,
        ends_before_start = report.ends_before_start,
        events_per_ms = report.events_per_ms,
        "Run complete"
    );

    Ok(report)
}
