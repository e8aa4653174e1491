//! Growth-optimal (Kelly) stake search
//!
//! For a setup with scenarios `(p_i, r_i)` the expected log-growth of staking
//! a fraction `f` is
//!
//! ```text
//! G(f) = Σ p_i ln(1 + f r_i)
//! ```
//!
//! `G` is strictly concave on the feasible set `{ f : 1 + f r_i > 0 ∀ i }`, so
//! its derivative `G'(f) = Σ p_i r_i / (1 + f r_i)` is strictly decreasing and
//! the optimum is the unique root of `G'` when one exists. The search is a
//! bracketed bisection on the sign of `G'`, kept a small margin away from the
//! ruin edges.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::model::Setup;

use super::config::KellySettings;
use super::result::{ConvergenceStatus, KellyResult};

/// Open interval of fractions that never drive wealth to zero or below.
///
/// A side is `±∞` when no return of the opposing sign bounds it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeasibleInterval {
    pub lower: f64,
    pub upper: f64,
}

impl FeasibleInterval {
    #[must_use]
    pub fn contains(&self, fraction: f64) -> bool {
        fraction > self.lower && fraction < self.upper
    }
}

/// Feasible stake interval implied by a setup's returns
///
/// Positive returns bound `f` from below at `-1/r_i`; negative returns bound
/// it from above at `-1/r_i`.
#[must_use]
pub fn feasible_interval(setup: &Setup) -> FeasibleInterval {
    let mut lower = f64::NEG_INFINITY;
    let mut upper = f64::INFINITY;

    for scenario in &setup.scenarios {
        let r = scenario.return_pct;
        if r > 0.0 {
            lower = lower.max(-1.0 / r);
        } else if r < 0.0 {
            upper = upper.min(-1.0 / r);
        }
    }

    FeasibleInterval { lower, upper }
}

/// `G(f)` for a setup; `-∞` when any scenario would wipe out the stake
#[must_use]
pub fn expected_log_growth(setup: &Setup, fraction: f64) -> f64 {
    let mut growth = 0.0;
    for scenario in &setup.scenarios {
        let factor = 1.0 + fraction * scenario.return_pct;
        if factor <= 0.0 {
            return f64::NEG_INFINITY;
        }
        growth += scenario.probability * factor.ln();
    }
    growth
}

/// `G'(f)`; only meaningful inside the feasible interval
fn growth_slope(setup: &Setup, fraction: f64) -> f64 {
    setup
        .scenarios
        .iter()
        .map(|s| s.probability * s.return_pct / (1.0 + fraction * s.return_pct))
        .sum()
}

/// Pull a finite edge inward by the configured margin, or cap an open side
fn search_bound(edge: f64, settings: &KellySettings, toward_positive: bool) -> f64 {
    if edge.is_finite() {
        let margin = settings.boundary_margin * edge.abs().max(1.0);
        if toward_positive { edge + margin } else { edge - margin }
    } else if toward_positive {
        -settings.max_fraction
    } else {
        settings.max_fraction
    }
}

/// Find the growth-optimal fraction with default settings
#[must_use]
pub fn optimize_kelly(setup: &Setup) -> KellyResult {
    optimize_kelly_with(setup, &KellySettings::default())
}

/// Find the growth-optimal fraction for one setup
///
/// Deterministic and side-effect free. Never fails: a search that runs out of
/// budget, or whose settings leave no bracket inside the feasible interval,
/// reports [`ConvergenceStatus::NotConverged`] with a zero stake.
#[must_use]
pub fn optimize_kelly_with(setup: &Setup, settings: &KellySettings) -> KellyResult {
    let interval = feasible_interval(setup);
    let mut lo = search_bound(interval.lower, settings, true);
    let hi = search_bound(interval.upper, settings, false);
    if settings.long_only {
        lo = lo.max(0.0);
    }

    let bracket_ok = settings.check().is_ok()
        && lo <= hi
        && interval.contains(lo)
        && interval.contains(hi);
    if !bracket_ok {
        tracing::warn!(
            setup = %setup.name,
            lo,
            hi,
            "Kelly search bracket falls outside the feasible interval, using zero stake"
        );
        return build_result(setup, 0.0, ConvergenceStatus::NotConverged, 0);
    }

    let live = setup.scenarios.iter().filter(|s| s.probability > 0.0);
    let (has_gain, has_loss) = live.fold((false, false), |(gain, loss), s| {
        (gain || s.return_pct > 0.0, loss || s.return_pct < 0.0)
    });

    let (fraction, status, iterations) = match (has_gain, has_loss) {
        // Flat setup: every stake grows at zero
        (false, false) => (0.0_f64.max(lo).min(hi), ConvergenceStatus::Degenerate, 0),
        // Growth increases with the stake up to the upper edge
        (true, false) => (hi, ConvergenceStatus::Degenerate, 0),
        // Growth increases as the stake falls toward the lower edge
        (false, true) => (lo, pinned_status(lo, settings), 0),
        (true, true) => bisect(setup, settings, lo, hi),
    };

    let result = build_result(setup, fraction, status, iterations);

    match result.status {
        ConvergenceStatus::NotConverged => tracing::warn!(
            setup = %setup.name,
            iterations,
            "Kelly search did not converge, falling back to zero stake"
        ),
        _ => tracing::debug!(
            setup = %setup.name,
            fraction = result.optimal_fraction,
            growth = result.expected_log_growth,
            status = ?result.status,
            "Kelly search finished"
        ),
    }

    result
}

/// A lower bound of exactly zero only arises from the long-only constraint,
/// where staking nothing is the exact constrained optimum.
fn pinned_status(lo: f64, settings: &KellySettings) -> ConvergenceStatus {
    if settings.long_only && lo == 0.0 {
        ConvergenceStatus::Converged
    } else {
        ConvergenceStatus::Degenerate
    }
}

fn bisect(
    setup: &Setup,
    settings: &KellySettings,
    mut lo: f64,
    mut hi: f64,
) -> (f64, ConvergenceStatus, usize) {
    if lo >= hi {
        return (0.0, ConvergenceStatus::NotConverged, 0);
    }
    if growth_slope(setup, lo) <= 0.0 {
        return (lo, pinned_status(lo, settings), 0);
    }
    if growth_slope(setup, hi) >= 0.0 {
        return (hi, ConvergenceStatus::Degenerate, 0);
    }

    let mut iteration = 0;
    while iteration < settings.max_iterations {
        let mid = f64::midpoint(lo, hi);
        if hi - lo <= settings.tolerance * (1.0 + mid.abs()) || mid <= lo || mid >= hi {
            return (mid, ConvergenceStatus::Converged, iteration);
        }
        iteration += 1;

        if growth_slope(setup, mid) > 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    let mid = f64::midpoint(lo, hi);
    if hi - lo <= settings.tolerance * (1.0 + mid.abs()) {
        (mid, ConvergenceStatus::Converged, iteration)
    } else {
        (0.0, ConvergenceStatus::NotConverged, iteration)
    }
}

fn build_result(
    setup: &Setup,
    fraction: f64,
    status: ConvergenceStatus,
    iterations: usize,
) -> KellyResult {
    let edge = setup.expected_return();
    let edge_variance = setup.return_variance();

    KellyResult {
        setup_name: setup.name.clone(),
        optimal_fraction: fraction,
        expected_log_growth: expected_log_growth(setup, fraction),
        expected_return: fraction * edge,
        return_variance: fraction * fraction * edge_variance,
        edge,
        edge_variance,
        iterations,
        status,
        odds_description: setup.odds_description(),
    }
}

/// Optimize every setup independently, preserving order
#[must_use]
pub fn optimize_all(setups: &[Setup], settings: &KellySettings) -> Vec<KellyResult> {
    #[cfg(feature = "parallel")]
    let results = setups
        .par_iter()
        .map(|setup| optimize_kelly_with(setup, settings))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let results = setups
        .iter()
        .map(|setup| optimize_kelly_with(setup, settings))
        .collect();

    results
}

/// Probability-weighted average of the per-setup optimal fractions
#[must_use]
pub fn blended_kelly(setups: &[Setup], settings: &KellySettings) -> f64 {
    setups
        .iter()
        .zip(optimize_all(setups, settings))
        .map(|(setup, result)| setup.probability * result.optimal_fraction)
        .sum()
}
