use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal consistency violation: {0}")]
    Inconsistent(String),

    #[error("Event sink error: {0}")]
    Sink(String),
}
