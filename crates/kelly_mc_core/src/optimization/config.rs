//! Optimizer settings
//!
//! The Kelly search is a bounded one-dimensional root find, so its budget is
//! small and fixed. These knobs exist for tests and for callers that want
//! the legacy long-only behaviour.

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

fn default_max_iterations() -> usize {
    200
}

fn default_tolerance() -> f64 {
    1e-12
}

fn default_boundary_margin() -> f64 {
    1e-9
}

fn default_max_fraction() -> f64 {
    10.0
}

/// Settings for the growth-optimal fraction search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KellySettings {
    /// Bisection budget
    pub max_iterations: usize,

    /// Convergence threshold on the bracket width (scaled by `1 + |f|`)
    pub tolerance: f64,

    /// Distance kept from a ruin edge, relative to the edge magnitude
    pub boundary_margin: f64,

    /// Magnitude cap applied to a side of the feasible interval that has no
    /// opposing-sign return to bound it
    pub max_fraction: f64,

    /// Forbid negative (short) stakes; a non-positive edge then yields zero
    pub long_only: bool,
}

impl Default for KellySettings {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
            boundary_margin: default_boundary_margin(),
            max_fraction: default_max_fraction(),
            long_only: false,
        }
    }
}

impl KellySettings {
    /// Long-only search: no shorting, zero stake without a positive edge
    #[must_use]
    pub fn long_only() -> Self {
        Self {
            long_only: true,
            ..Self::default()
        }
    }

    /// Reject settings that could push the search outside the feasible set
    pub fn check(&self) -> Result<(), SimulationError> {
        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            return Err(SimulationError::InvalidSetting {
                name: "tolerance",
                value: self.tolerance,
                reason: "must be finite and non-negative",
            });
        }
        if !(self.boundary_margin > 0.0 && self.boundary_margin < 0.5) {
            return Err(SimulationError::InvalidSetting {
                name: "boundary_margin",
                value: self.boundary_margin,
                reason: "must lie strictly between 0 and 0.5",
            });
        }
        if !(self.max_fraction.is_finite() && self.max_fraction > 0.0) {
            return Err(SimulationError::InvalidSetting {
                name: "max_fraction",
                value: self.max_fraction,
                reason: "must be positive and finite",
            });
        }
        Ok(())
    }
}
