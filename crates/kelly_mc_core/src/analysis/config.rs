//! Policy constants for the analytics reduction.

use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;

/// Percentiles reported for terminal wealth, as fractions in (0, 1)
pub const DEFAULT_PERCENTILES: [f64; 9] = [0.01, 0.05, 0.10, 0.25, 0.50, 0.75, 0.90, 0.95, 0.99];

/// Knobs that turn raw trajectories into annualized and risk statistics.
///
/// Periods are abstract time steps, so the annualization factor is explicit
/// rather than guessed. The default of one period per year reports CAGR and
/// volatility per period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsSettings {
    /// Periods that make up one year for CAGR, volatility and Sharpe
    pub periods_per_year: f64,
    /// A path is ruined when terminal wealth falls below this fraction of V0
    pub ruin_threshold: f64,
    /// Annual risk-free rate subtracted in the Sharpe ratio
    pub risk_free_rate: f64,
    /// Confidence level for VaR and CVaR
    pub var_confidence: f64,
    pub percentiles: Vec<f64>,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            periods_per_year: 1.0,
            ruin_threshold: 0.10,
            risk_free_rate: 0.0,
            var_confidence: 0.95,
            percentiles: DEFAULT_PERCENTILES.to_vec(),
        }
    }
}

impl AnalyticsSettings {
    /// Reject settings that would make the reduction meaningless
    pub fn check(&self) -> Result<(), AnalyticsError> {
        if !(self.periods_per_year.is_finite() && self.periods_per_year > 0.0) {
            return Err(AnalyticsError::InvalidSetting {
                name: "periods_per_year",
                value: self.periods_per_year,
                reason: "must be positive and finite",
            });
        }
        if !(0.0..=1.0).contains(&self.ruin_threshold) {
            return Err(AnalyticsError::InvalidSetting {
                name: "ruin_threshold",
                value: self.ruin_threshold,
                reason: "must lie in [0, 1]",
            });
        }
        if !self.risk_free_rate.is_finite() {
            return Err(AnalyticsError::InvalidSetting {
                name: "risk_free_rate",
                value: self.risk_free_rate,
                reason: "must be finite",
            });
        }
        if !(self.var_confidence > 0.0 && self.var_confidence < 1.0) {
            return Err(AnalyticsError::InvalidSetting {
                name: "var_confidence",
                value: self.var_confidence,
                reason: "must lie strictly between 0 and 1",
            });
        }
        if let Some(&p) = self.percentiles.iter().find(|p| !(0.0..=1.0).contains(*p)) {
            return Err(AnalyticsError::InvalidSetting {
                name: "percentiles",
                value: p,
                reason: "each percentile must lie in [0, 1]",
            });
        }
        Ok(())
    }
}
