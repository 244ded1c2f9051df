//! Engine configuration with documented defaults
//!
//! Every tunable of the round scheduler lives here. Configuration is passed
//! explicitly into each simulation call; there is no global instance.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};

/// Default upper bound on rounds per battle
pub const DEFAULT_MAX_ROUNDS: u32 = 1000;

/// How the two sides of a round exchange fire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FiringOrder {
    /// Attacker volley first; a side wiped by it does not fire back
    #[default]
    Sequential,
    /// Both sides fire every round, even a side wiped earlier in the round
    Simultaneous,
}

/// Configuration for the combat engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of rounds before the battle is called
    ///
    /// A loadout where neither side can ever deal damage would otherwise
    /// loop forever. Hitting the cap ends the battle as a draw and records
    /// an anomaly on the result.
    pub max_rounds: u32,

    /// Exchange order inside a round
    pub firing_order: FiringOrder,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            firing_order: FiringOrder::Sequential,
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    pub fn with_firing_order(mut self, firing_order: FiringOrder) -> Self {
        self.firing_order = firing_order;
        self
    }

    /// Parse a config from TOML text
    ///
    /// Missing keys fall back to their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.max_rounds == 0 {
            return Err(SimError::InvalidConfig(
                "max_rounds must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_rounds, DEFAULT_MAX_ROUNDS);
        assert_eq!(config.firing_order, FiringOrder::Sequential);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str("max_rounds = 50").unwrap();
        assert_eq!(config.max_rounds, 50);
        assert_eq!(config.firing_order, FiringOrder::Sequential);
    }

    #[test]
    fn test_firing_order_from_toml() {
        let config = EngineConfig::from_toml_str("firing_order = \"simultaneous\"").unwrap();
        assert_eq!(config.firing_order, FiringOrder::Simultaneous);
    }

    #[test]
    fn test_zero_rounds_rejected() {
        let err = EngineConfig::from_toml_str("max_rounds = 0").unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig(_)));
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        let err = EngineConfig::from_toml_str("max_rounds = \"many\"").unwrap_err();
        assert!(matches!(err, SimError::TomlError(_)));
    }
}
