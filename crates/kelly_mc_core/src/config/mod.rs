//! Simulation configuration
//!
//! `SimulationConfig` holds everything needed for a run: the setups, the
//! ensemble dimensions, the starting capital, the stake defaults, and the
//! policy knobs for the optimizer and the analytics reduction.
//!
//! # Builder DSL
//!
//! ```ignore
//! use kelly_mc_core::config::{SetupBuilder, SimulationBuilder};
//!
//! let config = SimulationBuilder::new()
//!     .paths(10_000)
//!     .periods(100)
//!     .initial_capital(100.0)
//!     .seed(7)
//!     .setup(
//!         SetupBuilder::new("Trend", 0.5)
//!             .scenario("Win", 0.6, 0.20)
//!             .scenario("Loss", 0.4, -0.10),
//!     )
//!     .setup(
//!         SetupBuilder::new("Chop", 0.5)
//!             .scenario("Win", 0.5, 0.10)
//!             .scenario("Loss", 0.5, -0.08)
//!             .kelly_fraction(0.1),
//!     )
//!     .build();
//! ```

use serde::{Deserialize, Serialize};

use crate::analysis::AnalyticsSettings;
use crate::model::{Scenario, Setup};
use crate::optimization::KellySettings;

pub mod builder;

pub use builder::{SetupBuilder, SimulationBuilder};

fn default_num_simulations() -> usize {
    10_000
}

fn default_num_periods() -> usize {
    100
}

fn default_initial_capital() -> f64 {
    100.0
}

fn default_kelly_fraction() -> f64 {
    0.25
}

/// Complete run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub setups: Vec<Setup>,

    /// Number of simulated paths (N)
    #[serde(default = "default_num_simulations")]
    pub num_simulations: usize,

    /// Number of periods per path (T)
    #[serde(default = "default_num_periods")]
    pub num_periods: usize,

    /// Starting wealth of every path (V0)
    #[serde(default = "default_initial_capital")]
    pub initial_capital: f64,

    /// Stake used by setups without an override
    #[serde(default = "default_kelly_fraction")]
    pub default_kelly_fraction: f64,

    /// Seed for reproducible runs; `None` draws one from OS entropy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    #[serde(default)]
    pub kelly: KellySettings,

    #[serde(default)]
    pub analytics: AnalyticsSettings,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            setups: Vec::new(),
            num_simulations: default_num_simulations(),
            num_periods: default_num_periods(),
            initial_capital: default_initial_capital(),
            default_kelly_fraction: default_kelly_fraction(),
            seed: None,
            kelly: KellySettings::default(),
            analytics: AnalyticsSettings::default(),
        }
    }
}

impl SimulationConfig {
    /// Reference configuration with two equally likely regimes
    #[must_use]
    pub fn default_two_regime() -> Self {
        Self {
            setups: vec![
                Setup::new(
                    "Setup A",
                    0.5,
                    vec![
                        Scenario::new("Win", 0.6, 0.20),
                        Scenario::new("Loss", 0.3, -0.10),
                        Scenario::new("Stress", 0.1, -0.50),
                    ],
                ),
                Setup::new(
                    "Setup B",
                    0.5,
                    vec![
                        Scenario::new("Win", 0.4, 0.15),
                        Scenario::new("Loss", 0.45, -0.08),
                        Scenario::new("Stress", 0.15, -0.40),
                    ],
                ),
            ],
            ..Default::default()
        }
    }

    /// Stake for a setup when no optimization is requested: override, else default
    #[must_use]
    pub fn effective_fraction(&self, setup: &Setup) -> f64 {
        setup.kelly_fraction.unwrap_or(self.default_kelly_fraction)
    }

    /// Sum of setup probabilities (should be 1.0 for a valid configuration)
    #[must_use]
    pub fn total_setup_probability(&self) -> f64 {
        self.setups.iter().map(|s| s.probability).sum()
    }

    /// Copy of this configuration with a different seed
    #[must_use]
    pub fn with_seed(&self, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_fraction() {
        let mut config = SimulationConfig::default_two_regime();
        config.setups[1].kelly_fraction = Some(0.6);

        assert_eq!(config.effective_fraction(&config.setups[0]), 0.25);
        assert_eq!(config.effective_fraction(&config.setups[1]), 0.6);
    }

    #[test]
    fn test_serde_defaults() {
        let json = r#"{
            "setups": [{
                "name": "Only",
                "probability": 1.0,
                "scenarios": [
                    {"name": "Up", "probability": 0.5, "return_pct": 0.1},
                    {"name": "Down", "probability": 0.5, "return_pct": -0.1}
                ]
            }]
        }"#;

        let config: SimulationConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.num_simulations, 10_000);
        assert_eq!(config.num_periods, 100);
        assert_eq!(config.initial_capital, 100.0);
        assert_eq!(config.default_kelly_fraction, 0.25);
        assert_eq!(config.seed, None);
        assert_eq!(config.analytics, AnalyticsSettings::default());
    }

    #[test]
    fn test_two_regime_probabilities() {
        let config = SimulationConfig::default_two_regime();
        assert!((config.total_setup_probability() - 1.0).abs() < 1e-12);
        for setup in &config.setups {
            assert!((setup.total_probability() - 1.0).abs() < 1e-12);
        }
    }
}
