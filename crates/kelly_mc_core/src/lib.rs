//! Kelly sizing and Monte Carlo risk engine
//!
//! This crate computes growth-optimal stake fractions for discrete,
//! multi-regime betting or investment processes and simulates large ensembles
//! of wealth trajectories to characterize the resulting growth and risk.
//! It provides:
//! - A validator that reports every configuration problem at once
//! - A Kelly optimizer with a ruin-avoidance feasibility bound
//! - A reproducible, block-parallel two-tier Monte Carlo engine
//! - Terminal wealth, return, drawdown and tail-risk analytics
//!
//! # Call order
//!
//! ```ignore
//! use kelly_mc_core::{
//!     FractionPolicy, SimulationConfig, analyze, ensure_valid, resolve_fractions, simulate,
//! };
//!
//! let config = SimulationConfig::default_two_regime();
//! ensure_valid(&config)?;
//!
//! let fractions = resolve_fractions(&config, &FractionPolicy::KellyOptimal { multiplier: 0.5 })?;
//! let ensemble = simulate(&config, &fractions, Some(7))?;
//! let result = analyze(&ensemble, &config)?;
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod analysis;
pub mod error;
pub mod optimization;
pub mod sampling;
pub mod simulation;
pub mod validation;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use analysis::{AnalyticsSettings, analyze};
pub use config::{SetupBuilder, SimulationBuilder, SimulationConfig};
pub use error::{AnalyticsError, SimulationError, ValidationError};
pub use model::{AnalyticsResult, Scenario, Setup, TrajectoryEnsemble};
pub use optimization::{
    ConvergenceStatus, FractionPolicy, FractionSource, KellyResult, KellySettings,
    optimize_kelly, resolve_fractions,
};
pub use simulation::simulate;
pub use validation::{ensure_valid, validate};
