//! Kelly optimization result types

use serde::{Deserialize, Serialize};

/// How the fraction search ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConvergenceStatus {
    /// Interior optimum located within tolerance, or an exact constrained optimum
    Converged,

    /// Growth is monotonic over the feasible interval (all returns share a
    /// sign, or the optimum is pinned at the ruin margin). The reported
    /// fraction is the practical boundary just inside the feasible edge.
    Degenerate,

    /// Search budget exhausted; the fraction falls back to zero
    NotConverged,
}

/// Growth-optimal stake for one setup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KellyResult {
    pub setup_name: String,

    /// Growth-maximizing fraction `f*`
    pub optimal_fraction: f64,

    /// `G(f*) = Σ p_i ln(1 + f* r_i)`
    pub expected_log_growth: f64,

    /// Expected per-period return when staking `f*`, i.e. `f* · E[r]`
    pub expected_return: f64,

    /// Per-period return variance when staking `f*`, i.e. `f*² · Var[r]`
    pub return_variance: f64,

    /// Unlevered expected return `E[r]`
    pub edge: f64,

    /// Unlevered return variance `Var[r]`
    pub edge_variance: f64,

    /// Bisection steps taken
    pub iterations: usize,

    pub status: ConvergenceStatus,

    pub odds_description: String,
}

impl KellyResult {
    #[must_use]
    pub fn converged(&self) -> bool {
        self.status != ConvergenceStatus::NotConverged
    }

    /// Fraction of full Kelly, e.g. `0.5` for half-Kelly
    #[must_use]
    pub fn scaled_fraction(&self, multiplier: f64) -> f64 {
        self.optimal_fraction * multiplier
    }
}
