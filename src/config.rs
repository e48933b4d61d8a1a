//! Configuration for building networks.
//!
//! Supports YAML configuration files with sensible defaults.

use crate::neural::{Activation, Group, Network, NetworkError};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub topology: TopologyConfig,
    /// Seed for the random source; entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,
    /// Decimal places kept after randomization
    #[serde(default)]
    pub precision: Option<i32>,
}

/// Network layout, input group first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologyConfig {
    pub groups: Vec<GroupConfig>,
}

/// A single group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupConfig {
    /// Number of units
    pub size: usize,
    /// Activation shared by the units (unused for the input group)
    #[serde(default)]
    pub activation: Activation,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            topology: TopologyConfig::default(),
            seed: None,
            precision: None,
        }
    }
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            groups: vec![
                GroupConfig {
                    size: 2,
                    activation: Activation::Identity,
                },
                GroupConfig {
                    size: 3,
                    activation: Activation::Tanh,
                },
                GroupConfig {
                    size: 1,
                    activation: Activation::Sigmoid,
                },
            ],
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse and validate YAML configuration
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_yaml()?)?;
        Ok(())
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.topology.groups.is_empty() {
            return Err(ConfigError::Invalid(
                "topology must contain at least one group".to_string(),
            ));
        }
        if let Some(index) = self.topology.groups.iter().position(|g| g.size == 0) {
            return Err(ConfigError::Invalid(format!("group {} has size 0", index)));
        }
        Ok(())
    }

    /// Random source: seeded when `seed` is set
    pub fn rng(&self) -> ChaCha8Rng {
        match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        }
    }

    /// Build the configured network, wired, with every parameter at zero
    pub fn build(&self) -> Result<Network, ConfigError> {
        self.validate()?;

        let mut network = Network::new();
        for group in &self.topology.groups {
            network.append(Group::new(group.size, group.activation)?);
        }
        network.wire_all()?;

        log::debug!(
            "Network built: sizes = {:?}",
            self.topology.groups.iter().map(|g| g.size).collect::<Vec<_>>()
        );
        Ok(network)
    }

    /// Build, randomize, and quantize to `precision` when set
    pub fn build_random<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Network, ConfigError> {
        let mut network = self.build()?;
        network.randomize(rng);
        if let Some(digits) = self.precision {
            network.quantize(digits);
        }
        Ok(network)
    }
}

/// Errors that can occur while loading or applying configuration
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
    Invalid(String),
    Network(NetworkError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::Yaml(e) => write!(f, "YAML error: {}", e),
            Self::Invalid(msg) => write!(f, "Invalid configuration: {}", msg),
            Self::Network(e) => write!(f, "Network error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Yaml(e) => Some(e),
            Self::Invalid(_) => None,
            Self::Network(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Yaml(e)
    }
}

impl From<NetworkError> for ConfigError {
    fn from(e: NetworkError) -> Self {
        Self::Network(e)
    }
}
