//! Fluent builders for setups and simulation configurations
//!
//! Builders do not validate. Call [`crate::validation::validate`] on the
//! built configuration before handing it to the engine.

use super::SimulationConfig;
use crate::analysis::AnalyticsSettings;
use crate::model::{Scenario, Setup};
use crate::optimization::KellySettings;

/// Builder for a single [`Setup`]
#[derive(Debug, Clone)]
pub struct SetupBuilder {
    setup: Setup,
}

impl SetupBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>, probability: f64) -> Self {
        Self {
            setup: Setup::new(name, probability, Vec::new()),
        }
    }

    /// Append a scenario with the given probability and fractional return
    #[must_use]
    pub fn scenario(mut self, name: impl Into<String>, probability: f64, return_pct: f64) -> Self {
        self.setup
            .scenarios
            .push(Scenario::new(name, probability, return_pct));
        self
    }

    /// Override the run's default stake for this setup
    #[must_use]
    pub fn kelly_fraction(mut self, fraction: f64) -> Self {
        self.setup.kelly_fraction = Some(fraction);
        self
    }

    #[must_use]
    pub fn build(self) -> Setup {
        self.setup
    }
}

impl From<SetupBuilder> for Setup {
    fn from(builder: SetupBuilder) -> Self {
        builder.build()
    }
}

/// Builder for a [`SimulationConfig`]
#[derive(Debug, Clone, Default)]
pub struct SimulationBuilder {
    config: SimulationConfig,
}

impl SimulationBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a setup (accepts a `Setup` or a `SetupBuilder`)
    #[must_use]
    pub fn setup(mut self, setup: impl Into<Setup>) -> Self {
        self.config.setups.push(setup.into());
        self
    }

    /// Number of simulated paths
    #[must_use]
    pub fn paths(mut self, num_simulations: usize) -> Self {
        self.config.num_simulations = num_simulations;
        self
    }

    /// Number of periods per path
    #[must_use]
    pub fn periods(mut self, num_periods: usize) -> Self {
        self.config.num_periods = num_periods;
        self
    }

    #[must_use]
    pub fn initial_capital(mut self, capital: f64) -> Self {
        self.config.initial_capital = capital;
        self
    }

    #[must_use]
    pub fn default_kelly_fraction(mut self, fraction: f64) -> Self {
        self.config.default_kelly_fraction = fraction;
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn kelly_settings(mut self, settings: KellySettings) -> Self {
        self.config.kelly = settings;
        self
    }

    #[must_use]
    pub fn analytics_settings(mut self, settings: AnalyticsSettings) -> Self {
        self.config.analytics = settings;
        self
    }

    #[must_use]
    pub fn build(self) -> SimulationConfig {
        self.config
    }
}
