//! Simulation configuration with documented constants
//!
//! All tunable cadences and severity penalties are collected here with
//! explanations of their purpose and how they interact with each other.

use std::path::Path;

use serde::Deserialize;

use crate::capacity::SeverityTable;
use crate::core::error::{AnatomyError, Result};
use crate::core::types::Seconds;

/// Configuration for the body simulation subsystems
///
/// Loaded from TOML by the host; any field left out falls back to its default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === HEALTH SUBSYSTEM ===
    /// Seconds between health updates (queued damage, natural healing)
    ///
    /// Direct damage through `World::damage` ignores this cadence; only
    /// commands pushed with `World::queue_damage` wait for it.
    pub health_update_interval: Seconds,

    // === CAPACITY SUBSYSTEM ===
    /// Seconds between capacity recomputations
    ///
    /// This is the staleness window: capacity snapshots may lag health
    /// changes by up to one interval.
    pub capacity_update_interval: Seconds,

    // === DECISION SUBSYSTEM ===
    /// Seconds between decision-making passes of external AI collaborators
    ///
    /// The world only gates the cadence; the decisions themselves live
    /// outside this crate.
    pub decision_update_interval: Seconds,

    /// Capacity penalty scalar for each damage state
    pub severity: SeverityTable,

    /// Seed for the per-creature damage RNG streams
    pub rng_seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            health_update_interval: 0.25,
            capacity_update_interval: 0.5,
            decision_update_interval: 1.0,
            severity: SeverityTable::default(),
            rng_seed: 0x5eed,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let intervals = [
            ("health_update_interval", self.health_update_interval),
            ("capacity_update_interval", self.capacity_update_interval),
            ("decision_update_interval", self.decision_update_interval),
        ];
        for (name, value) in intervals {
            if !(value > 0.0) {
                return Err(AnatomyError::InvalidConfig(format!(
                    "{} must be positive (got {})",
                    name, value
                )));
            }
        }

        self.severity.validate()
    }
}
