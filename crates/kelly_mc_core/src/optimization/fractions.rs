//! Stake resolution
//!
//! The engine takes one fraction per setup. Which fraction a setup gets is a
//! caller decision made once, before simulation starts.

use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::error::SimulationError;

use super::kelly::optimize_kelly_with;

/// Where a single setup's stake comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FractionSource {
    /// The setup's own override, falling back to the run default
    Custom,
    /// The growth-optimal fraction from the optimizer
    KellyOptimal,
    /// The run default, ignoring any override
    Default,
}

/// How stakes are resolved across all setups
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum FractionPolicy {
    /// Override when present, otherwise the run default
    #[default]
    Configured,
    /// Override when present, otherwise `multiplier · f*` (0.5 for half-Kelly)
    KellyOptimal { multiplier: f64 },
    /// One explicit source per setup, in setup order
    PerSetup(Vec<FractionSource>),
}

/// Resolve one stake per setup
///
/// Optimal fractions are computed with `config.kelly`. Fails when the policy
/// does not line up with the setups, when it needs the optimizer and
/// `config.kelly` is out of range, or when it yields a non-finite stake.
pub fn resolve_fractions(
    config: &SimulationConfig,
    policy: &FractionPolicy,
) -> Result<Vec<f64>, SimulationError> {
    let needs_optimizer = match policy {
        FractionPolicy::Configured => false,
        FractionPolicy::KellyOptimal { .. } => true,
        FractionPolicy::PerSetup(sources) => sources.contains(&FractionSource::KellyOptimal),
    };
    if needs_optimizer {
        config.kelly.check()?;
    }

    let fractions: Vec<f64> = match policy {
        FractionPolicy::Configured => config
            .setups
            .iter()
            .map(|setup| config.effective_fraction(setup))
            .collect(),
        FractionPolicy::KellyOptimal { multiplier } => config
            .setups
            .iter()
            .map(|setup| match setup.kelly_fraction {
                Some(fraction) => fraction,
                None => optimize_kelly_with(setup, &config.kelly).scaled_fraction(*multiplier),
            })
            .collect(),
        FractionPolicy::PerSetup(sources) => {
            if sources.len() != config.setups.len() {
                return Err(SimulationError::SourceCountMismatch {
                    setups: config.setups.len(),
                    sources: sources.len(),
                });
            }
            config
                .setups
                .iter()
                .zip(sources)
                .map(|(setup, source)| match source {
                    FractionSource::Custom => config.effective_fraction(setup),
                    FractionSource::KellyOptimal => {
                        optimize_kelly_with(setup, &config.kelly).optimal_fraction
                    }
                    FractionSource::Default => config.default_kelly_fraction,
                })
                .collect()
        }
    };

    if let Some((setup, &value)) = fractions.iter().enumerate().find(|(_, f)| !f.is_finite()) {
        return Err(SimulationError::NonFiniteFraction { setup, value });
    }

    tracing::debug!(?fractions, "Resolved stake fractions");
    Ok(fractions)
}
