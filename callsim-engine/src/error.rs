use thiserror::Error;

use callsim_config::ConfigError;
use callsim_core::SimulationError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Simulation error: {0}")]
    Simulation(#[from] SimulationError),

    #[error("Fingerprint mismatch: expected {expected}, got {actual}")]
    FingerprintMismatch { expected: String, actual: String },

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("Report serialization error: {0}")]
    Report(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
