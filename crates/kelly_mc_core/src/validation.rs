//! Configuration validation
//!
//! Every check runs independently so the caller sees all problems at once.
//! Nothing here panics on bad business data; an empty list means the
//! configuration is safe to hand to the optimizer and the engine.

use crate::config::SimulationConfig;
use crate::error::ValidationError;
use crate::model::{Scenario, Setup};

/// Tolerance for probability sums
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Upper bound on simulated paths
pub const MAX_SIMULATIONS: usize = 1_000_000;

/// Upper bound on periods per path
pub const MAX_PERIODS: usize = 100_000;

/// Upper bound on stored wealth values, `paths × (periods + 1)`
pub const MAX_CELLS: usize = 250_000_000;

fn probability_in_range(p: f64) -> bool {
    p > 0.0 && p <= 1.0
}

fn sums_to_one(total: f64) -> bool {
    (total - 1.0).abs() <= PROBABILITY_TOLERANCE
}

/// Validate a single scenario
pub fn validate_scenario(scenario: &Scenario) -> Vec<String> {
    let mut errors = Vec::new();

    if scenario.name.trim().is_empty() {
        errors.push("Scenario name cannot be empty".to_string());
    }
    if !probability_in_range(scenario.probability) {
        errors.push(format!(
            "Probability {} not in (0, 1]",
            scenario.probability
        ));
    }
    if !scenario.return_pct.is_finite() {
        errors.push(format!("Return {} is not a finite number", scenario.return_pct));
    } else if scenario.return_pct <= -1.0 {
        errors.push(format!(
            "Return {} would cause total loss (must be > -100%)",
            scenario.return_pct
        ));
    }

    errors
}

/// Validate a setup and all of its scenarios
pub fn validate_setup(setup: &Setup) -> Vec<String> {
    let mut errors = Vec::new();

    if setup.name.trim().is_empty() {
        errors.push("Setup name cannot be empty".to_string());
    }
    if !probability_in_range(setup.probability) {
        errors.push(format!(
            "Setup probability {} not in (0, 1]",
            setup.probability
        ));
    }
    if setup.scenarios.len() < 2 {
        errors.push(format!(
            "Setup must have at least 2 scenarios, found {}",
            setup.scenarios.len()
        ));
    }

    let total = setup.total_probability();
    if !sums_to_one(total) {
        errors.push(format!(
            "Scenario probabilities sum to {total:.6}, must equal 1.0"
        ));
    }

    if let Some(fraction) = setup.kelly_fraction
        && !fraction.is_finite()
    {
        errors.push(format!("Custom Kelly fraction {fraction} is not finite"));
    }

    for scenario in &setup.scenarios {
        let label = if scenario.name.trim().is_empty() {
            "<unnamed>"
        } else {
            scenario.name.as_str()
        };
        for e in validate_scenario(scenario) {
            errors.push(format!("[{label}] {e}"));
        }
    }

    errors
}

/// Validate a full configuration
///
/// Returns an ordered list of human-readable problems; empty means valid.
pub fn validate(config: &SimulationConfig) -> Vec<String> {
    let mut errors = Vec::new();

    if config.num_simulations < 1 {
        errors.push("Number of simulations must be >= 1".to_string());
    }
    if config.num_simulations > MAX_SIMULATIONS {
        errors.push(format!(
            "Number of simulations exceeds {MAX_SIMULATIONS} limit"
        ));
    }
    if config.num_periods < 1 {
        errors.push("Number of periods must be >= 1".to_string());
    }
    if config.num_periods > MAX_PERIODS {
        errors.push(format!("Number of periods exceeds {MAX_PERIODS} limit"));
    }
    let cells = config
        .num_periods
        .checked_add(1)
        .and_then(|width| width.checked_mul(config.num_simulations));
    if cells.is_none_or(|cells| cells > MAX_CELLS) {
        errors.push(format!(
            "Paths x (periods + 1) exceeds {MAX_CELLS} stored values"
        ));
    }
    if !(config.initial_capital.is_finite() && config.initial_capital > 0.0) {
        errors.push(format!(
            "Initial capital must be positive, got {}",
            config.initial_capital
        ));
    }
    if !config.default_kelly_fraction.is_finite() {
        errors.push(format!(
            "Default Kelly fraction {} is not finite",
            config.default_kelly_fraction
        ));
    }
    if config.setups.is_empty() {
        errors.push("At least one setup is required".to_string());
    }
    if let Err(e) = config.kelly.check() {
        errors.push(e.to_string());
    }
    if let Err(e) = config.analytics.check() {
        errors.push(e.to_string());
    }

    let total = config.total_setup_probability();
    if !config.setups.is_empty() && !sums_to_one(total) {
        errors.push(format!(
            "Setup probabilities sum to {total:.6}, must equal 1.0"
        ));
    }

    for setup in &config.setups {
        let label = if setup.name.trim().is_empty() {
            "<unnamed>"
        } else {
            setup.name.as_str()
        };
        for e in validate_setup(setup) {
            errors.push(format!("[{label}] {e}"));
        }
    }

    errors
}

/// Result-style gate over [`validate`]
pub fn ensure_valid(config: &SimulationConfig) -> Result<(), ValidationError> {
    let problems = validate(config);
    if problems.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { problems })
    }
}
