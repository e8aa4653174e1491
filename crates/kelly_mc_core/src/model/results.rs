//! Simulation outputs
//!
//! `TrajectoryEnsemble` is the raw wealth matrix produced by one engine run.
//! `AnalyticsResult` is its reduction to distribution, drawdown, and risk
//! statistics.

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;
use crate::optimization::KellyResult;

/// Wealth trajectories for every simulated path
///
/// Stored row-major as an `N × (T+1)` matrix; row `i` is path `i` and column
/// 0 is the initial capital. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryEnsemble {
    num_paths: usize,
    num_periods: usize,
    initial_capital: f64,
    /// Seed the run was generated from (drawn from entropy when none was given)
    seed: u64,
    wealth: Vec<f64>,
    /// How often each setup was drawn across all live cells
    setup_counts: Vec<u64>,
    /// How often each scenario was drawn, per setup
    scenario_counts: Vec<Vec<u64>>,
}

impl TrajectoryEnsemble {
    pub(crate) fn from_parts(
        num_paths: usize,
        num_periods: usize,
        initial_capital: f64,
        seed: u64,
        wealth: Vec<f64>,
        setup_counts: Vec<u64>,
        scenario_counts: Vec<Vec<u64>>,
    ) -> Self {
        Self {
            num_paths,
            num_periods,
            initial_capital,
            seed,
            wealth,
            setup_counts,
            scenario_counts,
        }
    }

    /// Build an ensemble from explicit wealth paths (e.g. recorded or
    /// hand-constructed histories). Every path must start at `V0` and have the
    /// same length of at least two points.
    pub fn from_paths(initial_capital: f64, paths: &[Vec<f64>]) -> Result<Self, SimulationError> {
        let width = paths
            .first()
            .map(Vec::len)
            .ok_or(SimulationError::Precondition("at least one path is required"))?;
        if width < 2 {
            return Err(SimulationError::Precondition(
                "paths need an initial value and at least one period",
            ));
        }

        for path in paths {
            if path.len() != width {
                return Err(SimulationError::RaggedPaths {
                    expected: width,
                    found: path.len(),
                });
            }
            if path[0] != initial_capital {
                return Err(SimulationError::Precondition(
                    "every path must start at the initial capital",
                ));
            }
        }
        let wealth = paths.concat();

        Ok(Self {
            num_paths: paths.len(),
            num_periods: width - 1,
            initial_capital,
            seed: 0,
            wealth,
            setup_counts: Vec::new(),
            scenario_counts: Vec::new(),
        })
    }

    #[must_use]
    pub fn num_paths(&self) -> usize {
        self.num_paths
    }

    #[must_use]
    pub fn num_periods(&self) -> usize {
        self.num_periods
    }

    #[must_use]
    pub fn initial_capital(&self) -> f64 {
        self.initial_capital
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of points per path (`T + 1`), saturating for a malformed
    /// deserialized shape
    #[must_use]
    pub fn width(&self) -> usize {
        self.num_periods.saturating_add(1)
    }

    /// Length the wealth matrix must have for the declared shape, or `None`
    /// when the shape overflows
    #[must_use]
    pub fn expected_len(&self) -> Option<usize> {
        self.num_periods
            .checked_add(1)
            .and_then(|width| width.checked_mul(self.num_paths))
    }

    /// The full row-major wealth matrix
    #[must_use]
    pub fn wealth(&self) -> &[f64] {
        &self.wealth
    }

    /// Wealth history of path `index`, or `None` when out of range
    #[must_use]
    pub fn path(&self, index: usize) -> Option<&[f64]> {
        let width = self.width();
        let start = index.checked_mul(width)?;
        self.wealth.get(start..start.checked_add(width)?)
    }

    /// Iterate over all paths in order
    pub fn paths(&self) -> impl Iterator<Item = &[f64]> {
        self.wealth.chunks_exact(self.width())
    }

    /// Final-period wealth of every path
    #[must_use]
    pub fn terminal_wealth(&self) -> Vec<f64> {
        self.paths().filter_map(|p| p.last().copied()).collect()
    }

    /// Number of paths whose wealth was clamped to zero
    #[must_use]
    pub fn ruined_paths(&self) -> usize {
        self.paths()
            .filter(|p| p.last().is_some_and(|v| *v == 0.0))
            .count()
    }

    #[must_use]
    pub fn setup_counts(&self) -> &[u64] {
        &self.setup_counts
    }

    #[must_use]
    pub fn scenario_counts(&self) -> &[Vec<u64>] {
        &self.scenario_counts
    }
}

/// Distribution of final-period wealth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminalWealthStats {
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// (percentile as 0-1, value), linearly interpolated
    pub percentiles: Vec<(f64, f64)>,
}

impl TerminalWealthStats {
    /// Look up a reported percentile, e.g. `percentile(0.05)`
    #[must_use]
    pub fn percentile(&self, p: f64) -> Option<f64> {
        self.percentiles
            .iter()
            .find(|(q, _)| (*q - p).abs() < 1e-9)
            .map(|(_, v)| *v)
    }
}

/// Growth and volatility statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnStats {
    pub cagr_mean: f64,
    pub cagr_median: f64,
    pub annualized_volatility: f64,
    /// `None` when returns have zero dispersion
    pub sharpe_ratio: Option<f64>,
}

/// Peak-to-trough statistics; drawdowns are positive fractions in [0, 1]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawdownStats {
    pub max_drawdown_mean: f64,
    pub max_drawdown_median: f64,
    pub max_drawdown_worst: f64,
    pub avg_drawdown: f64,
    /// Longest underwater run across all paths, in periods
    pub max_duration: usize,
    /// Mean over paths of each path's longest underwater run
    pub mean_duration: f64,
}

/// Loss and tail-risk statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskStats {
    pub probability_of_loss: f64,
    pub probability_of_profit: f64,
    pub probability_of_ruin: f64,
    /// Paths whose wealth was clamped to exactly zero
    pub ruined_paths: usize,
    /// Confidence level of the VaR/CVaR figures, e.g. 0.95
    pub confidence: f64,
    /// Value-at-Risk as a positive loss amount relative to `V0`
    pub value_at_risk: f64,
    /// Mean loss over paths at or beyond the VaR threshold
    pub conditional_value_at_risk: f64,
}

/// Complete statistics for one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsResult {
    pub num_paths: usize,
    pub num_periods: usize,
    pub initial_capital: f64,
    pub seed: u64,
    pub terminal: TerminalWealthStats,
    pub returns: ReturnStats,
    pub drawdown: DrawdownStats,
    pub risk: RiskStats,
    /// Optimizer output per setup, regardless of the stakes actually simulated
    pub kelly: Vec<KellyResult>,
}
