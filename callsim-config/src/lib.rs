//! # callsim Configuration System
//!
//! Layered configuration for the call-center workload generator.
//!
//! ## Features
//! - **Unified Configuration**: one document covers generator, transformer and driver
//! - **Validation**: per-field ranges via `validator`, cross-field constraints in code
//! - **Environment Awareness**: `CALLSIM_*` variables override file values

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

mod error;
mod run;
mod simulator;
mod validation;

pub use error::ConfigError;
pub use run::{ClockKind, RunConfig, SinkKind};
pub use simulator::{SimulatorConfig, TransformerConfig};

/// Default location of the configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/callsim.yaml";

/// Top‑level configuration container.
#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone)]
#[serde(default)]
pub struct CallSimConfig {
    /// Call event generator parameters.
    #[validate(nested)]
    pub simulator: SimulatorConfig,

    /// Delay/duplication layer parameters.
    #[validate(nested)]
    pub transformer: TransformerConfig,

    /// Driver loop parameters.
    #[validate(nested)]
    pub run: RunConfig,
}

impl CallSimConfig {
    /// Load configuration from defaults, a YAML file and the environment.
    ///
    /// Hierarchy:
    /// 1. Default values
    /// 2. `path` if given (must exist), otherwise `config/callsim.yaml` if present
    /// 3. `CALLSIM_*` environment variables, nested with `__`
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(CallSimConfig::default()));

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::FileNotFound(PathBuf::from(path)));
                }
                figment = figment.merge(Yaml::file(path));
            }
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                figment = figment.merge(Yaml::file(DEFAULT_CONFIG_PATH));
            }
            None => debug!("{DEFAULT_CONFIG_PATH} not found, using default configuration"),
        }

        figment
            .merge(Env::prefixed("CALLSIM_").split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.check()?;
                Ok(config)
            })
    }

    /// Runs field validation followed by the cross-field constraints.
    pub fn check(&self) -> Result<(), ConfigError> {
        self.validate()?;
        validation::check_simulator(&self.simulator)?;
        validation::check_transformer(&self.transformer)
    }
}

impl SimulatorConfig {
    pub fn check(&self) -> Result<(), ConfigError> {
        self.validate()?;
        validation::check_simulator(self)
    }
}

impl TransformerConfig {
    pub fn check(&self) -> Result<(), ConfigError> {
        self.validate()?;
        validation::check_transformer(self)
    }
}
