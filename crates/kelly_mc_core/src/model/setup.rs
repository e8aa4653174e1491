//! Betting setups and their outcome scenarios
//!
//! These are plain value types. Construction never fails; semantic checks
//! live in [`crate::validation`] so that partially-filled forms can still be
//! represented and validated incrementally.

use serde::{Deserialize, Serialize};

/// A single outcome within a setup (e.g. win, loss, stress)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    /// Probability of this outcome given its setup is active, in (0, 1]
    pub probability: f64,
    /// Fractional return of the staked amount, e.g. 0.20 for +20%, -0.50 for -50%
    pub return_pct: f64,
}

impl Scenario {
    #[must_use]
    pub fn new(name: impl Into<String>, probability: f64, return_pct: f64) -> Self {
        Self {
            name: name.into(),
            probability,
            return_pct,
        }
    }
}

/// A market regime: a named set of mutually exclusive scenarios, drawn with
/// `probability` each period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setup {
    pub name: String,
    pub probability: f64,
    pub scenarios: Vec<Scenario>,
    /// Per-setup stake override; `None` defers to the run default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kelly_fraction: Option<f64>,
}

impl Setup {
    #[must_use]
    pub fn new(name: impl Into<String>, probability: f64, scenarios: Vec<Scenario>) -> Self {
        Self {
            name: name.into(),
            probability,
            scenarios,
            kelly_fraction: None,
        }
    }

    /// Set a custom stake fraction for this setup
    #[must_use]
    pub fn with_kelly_fraction(mut self, fraction: f64) -> Self {
        self.kelly_fraction = Some(fraction);
        self
    }

    /// Sum of scenario probabilities (should be 1.0 for a valid setup)
    #[must_use]
    pub fn total_probability(&self) -> f64 {
        self.scenarios.iter().map(|s| s.probability).sum()
    }

    /// Unlevered expected return `E[r] = Σ p_i r_i`
    #[must_use]
    pub fn expected_return(&self) -> f64 {
        self.scenarios
            .iter()
            .map(|s| s.probability * s.return_pct)
            .sum()
    }

    /// Unlevered return variance `Σ p_i (r_i - E[r])²`
    #[must_use]
    pub fn return_variance(&self) -> f64 {
        let mean = self.expected_return();
        self.scenarios
            .iter()
            .map(|s| s.probability * (s.return_pct - mean).powi(2))
            .sum()
    }

    /// Human readable odds, e.g. `Win: 60% chance of +20.0%; Loss: 40% chance of -10.0%`
    #[must_use]
    pub fn odds_description(&self) -> String {
        self.scenarios
            .iter()
            .map(|s| {
                let sign = if s.return_pct >= 0.0 { "+" } else { "" };
                format!(
                    "{}: {:.0}% chance of {sign}{:.1}%",
                    s.name,
                    s.probability * 100.0,
                    s.return_pct * 100.0
                )
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}
