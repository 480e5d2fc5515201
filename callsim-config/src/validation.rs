//! Constraints that span several fields or that `validator` ranges cannot express.

use crate::{ConfigError, SimulatorConfig, TransformerConfig};

pub fn check_simulator(config: &SimulatorConfig) -> Result<(), ConfigError> {
    if !config.target_events_per_ms.is_finite() || config.target_events_per_ms <= 0.0 {
        return Err(ConfigError::Constraint(format!(
            "target_events_per_ms must be a positive number, got {}",
            config.target_events_per_ms
        )));
    }
    if config.max_call_duration_ms < config.mean_call_duration_ms {
        return Err(ConfigError::Constraint(format!(
            "max_call_duration_ms ({}) must be at least mean_call_duration_ms ({})",
            config.max_call_duration_ms, config.mean_call_duration_ms
        )));
    }
    Ok(())
}

pub fn check_transformer(config: &TransformerConfig) -> Result<(), ConfigError> {
    if !config.duplication_probability.is_finite() {
        return Err(ConfigError::Constraint(
            "duplication_probability must be finite".into(),
        ));
    }
    if !config.delay_skew.is_finite() {
        return Err(ConfigError::Constraint("delay_skew must be finite".into()));
    }
    Ok(())
}
