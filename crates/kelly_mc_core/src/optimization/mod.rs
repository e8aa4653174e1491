//! Growth-optimal stake sizing
//!
//! Finds, for each setup, the fraction of wealth to stake that maximizes the
//! expected logarithmic growth rate, subject to never risking ruin in any
//! single scenario.
//!
//! # Example
//!
//! ```ignore
//! use kelly_mc_core::optimization::{optimize_kelly, FractionPolicy, resolve_fractions};
//!
//! let result = optimize_kelly(&config.setups[0]);
//! println!("f* = {:.3} (G = {:.5})", result.optimal_fraction, result.expected_log_growth);
//!
//! // Half-Kelly stakes for every setup without an override
//! let fractions = resolve_fractions(&config, &FractionPolicy::KellyOptimal { multiplier: 0.5 })?;
//! ```

mod config;
mod fractions;
mod kelly;
mod result;

pub use config::KellySettings;
pub use fractions::{FractionPolicy, FractionSource, resolve_fractions};
pub use kelly::{
    FeasibleInterval, blended_kelly, expected_log_growth, feasible_interval, optimize_all,
    optimize_kelly, optimize_kelly_with,
};
pub use result::{ConvergenceStatus, KellyResult};
