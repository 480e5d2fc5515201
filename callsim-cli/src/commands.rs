use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::info;

use callsim_config::{CallSimConfig, ClockKind};
use callsim_engine::run_simulation;
use callsim_telemetry::metrics::MetricsRecorder;

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate call events, then drain every call still in flight
    Run(RunArgs),
    /// Load and validate configuration, then print the effective values
    CheckConfig(CheckConfigArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Configuration file (defaults to config/callsim.yaml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Seed for the call simulator; the transformer uses seed + 1
    #[arg(long)]
    pub seed: Option<u64>,
    /// Measured run length in seconds
    #[arg(long)]
    pub duration: Option<u64>,
    /// Warmup length in seconds
    #[arg(long)]
    pub warmup: Option<u64>,
    /// Use the deterministic virtual clock instead of wall time
    #[arg(long)]
    pub virtual_clock: bool,
    /// Fail unless the delivered stream has this fingerprint
    #[arg(long)]
    pub expect_hash: Option<String>,
    /// Write the run report as YAML
    #[arg(long)]
    pub report: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct CheckConfigArgs {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl RunArgs {
    fn apply(&self, config: &mut CallSimConfig) {
        if let Some(seed) = self.seed {
            config.simulator.seed = seed;
            config.transformer.seed = seed.wrapping_add(1);
        }
        if let Some(duration) = self.duration {
            config.run.duration_secs = duration;
        }
        if let Some(warmup) = self.warmup {
            config.run.warmup_secs = warmup;
        }
        if self.virtual_clock {
            config.run.clock = ClockKind::Virtual;
        }
    }
}

pub async fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut config = CallSimConfig::load(args.config.as_deref())?;
    args.apply(&mut config);

    let metrics = MetricsRecorder::new()?;
    let report = run_simulation(&config, metrics.clone()).await?;

    info!(
        warmup_events = report.warmup.total(),
        measured_events = report.measured.total(),
        drained = report.drained,
        fingerprint = %report.fingerprint,
        "Simulation complete"
    );
    info!("Final metrics:\n{}", metrics.gather_metrics()?);

    if let Some(path) = &args.report {
        report.write_yaml(path)?;
        info!("Report written to {}", path.display());
    }
    if let Some(expected) = &args.expect_hash {
        report.verify_fingerprint(expected)?;
        info!("Fingerprint matches expected value");
    }
    Ok(())
}

pub fn check_config(args: CheckConfigArgs) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = CallSimConfig::load(args.config.as_deref())?;
    info!(?config, "Configuration is valid");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_flags_override_loaded_values() {
        let cli = Cli::parse_from([
            "callsim",
            "run",
            "--seed",
            "42",
            "--duration",
            "3",
            "--warmup",
            "0",
            "--virtual-clock",
            "--expect-hash",
            "abc",
        ]);
        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };

        let mut config = CallSimConfig::default();
        args.apply(&mut config);
        assert_eq!(config.simulator.seed, 42);
        assert_eq!(config.transformer.seed, 43);
        assert_eq!(config.run.duration_secs, 3);
        assert_eq!(config.run.warmup_secs, 0);
        assert_eq!(config.run.clock, ClockKind::Virtual);
        assert_eq!(args.expect_hash.as_deref(), Some("abc"));
    }

    #[test]
    fn omitted_flags_keep_configuration() {
        let cli = Cli::parse_from(["callsim", "run"]);
        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };
        let mut config = CallSimConfig::default();
        args.apply(&mut config);
        assert_eq!(config.run.duration_secs, 600);
        assert_eq!(config.run.clock, ClockKind::Wall);
    }

    #[test]
    fn check_config_accepts_path() {
        let cli = Cli::parse_from(["callsim", "check-config", "--config", "custom.yaml"]);
        let Commands::CheckConfig(args) = cli.command else {
            panic!("expected check-config command");
        };
        assert_eq!(args.config, Some(PathBuf::from("custom.yaml")));
    }
}
