//! Configuration system for the simulation kernel.
//!
//! This module provides YAML/JSON configuration file support for defining
//! testbenches declaratively: kernel parameters, the signal table, and
//! declared rendezvous events.
//!
//! # Configuration File Structure
//!
//! ```yaml
//! simulation:
//!   max_delta_cycles: 1000
//!   abort_on_fault: false
//!
//! signals:
//!   - name: clk
//!     init: 0
//!     external: true
//!   - name: rst_n
//!     init: 1
//!
//! events:
//!   - tx_done
//!   - rx_done
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::scheduler::Kernel;
use crate::types::Value;

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unknown file format: {0}")]
    UnknownFormat(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Global kernel parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationParams {
    /// Micro-step bound per macro time slot; exceeding it is a fatal
    /// delta cycle overflow
    #[serde(default = "default_max_delta_cycles")]
    pub max_delta_cycles: u32,

    /// Whether the first process fault ends the run
    #[serde(default)]
    pub abort_on_fault: bool,

    /// Logging level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_max_delta_cycles() -> u32 {
    1000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            max_delta_cycles: default_max_delta_cycles(),
            abort_on_fault: false,
            log_level: default_log_level(),
        }
    }
}

/// Configuration for a single signal.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignalConfig {
    /// Unique signal name
    pub name: String,

    /// Initial value
    #[serde(default)]
    pub init: Value,

    /// Whether the signal is owned by the external engine
    #[serde(default)]
    pub external: bool,
}

/// Complete testbench configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SimConfig {
    /// Global kernel parameters
    #[serde(default)]
    pub simulation: SimulationParams,

    /// Signal table
    #[serde(default)]
    pub signals: Vec<SignalConfig>,

    /// Declared rendezvous event names
    #[serde(default)]
    pub events: Vec<String>,
}

impl SimConfig {
    /// Creates a new empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Loads configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> ConfigResult<Self> {
        let config: SimConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Loads configuration from a JSON string.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a file, auto-detecting format.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match ext.to_lowercase().as_str() {
            "yaml" | "yml" => Self::from_yaml_file(path),
            "json" => Self::from_json_file(path),
            _ => Err(ConfigError::UnknownFormat(ext.to_string())),
        }
    }

    /// Validates the entire configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.simulation.max_delta_cycles == 0 {
            return Err(ConfigError::Validation(
                "max_delta_cycles must be at least 1".to_string(),
            ));
        }

        let mut names = std::collections::HashSet::new();
        for sig in &self.signals {
            if sig.name.is_empty() {
                return Err(ConfigError::Validation(
                    "Signal with empty name".to_string(),
                ));
            }
            if !names.insert(sig.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "Duplicate signal name: {}",
                    sig.name
                )));
            }
        }

        let mut event_names = std::collections::HashSet::new();
        for ev in &self.events {
            if !event_names.insert(ev.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "Duplicate event name: {}",
                    ev
                )));
            }
        }

        Ok(())
    }

    /// Saves configuration to a YAML file.
    pub fn to_yaml_file<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Builds a kernel preloaded with this configuration's signals and
    /// events.
    pub fn build_kernel(&self) -> ConfigResult<Kernel> {
        self.validate()?;
        let mut kernel = Kernel::with_params(self.simulation.clone());
        for sig in &self.signals {
            let added = if sig.external {
                kernel.add_external_signal(&sig.name, sig.init)
            } else {
                kernel.add_signal(&sig.name, sig.init)
            };
            if added.is_none() {
                return Err(ConfigError::Validation(format!(
                    "Duplicate signal name: {}",
                    sig.name
                )));
            }
        }
        for ev in &self.events {
            kernel.declare_event(ev);
        }
        Ok(kernel)
    }
}
