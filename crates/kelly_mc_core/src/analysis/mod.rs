//! Risk and return analytics over a simulated ensemble.
//!
//! ```ignore
//! use kelly_mc_core::{analyze, simulate};
//!
//! let ensemble = simulate(&config, &fractions, Some(7))?;
//! let result = analyze(&ensemble, &config)?;
//!
//! println!("median terminal wealth: {:.2}", result.terminal.median);
//! println!("P(ruin): {:.2}%", result.risk.probability_of_ruin * 100.0);
//! ```
//!
//! Policy constants (annualization, ruin threshold, risk-free rate, VaR
//! confidence, reported percentiles) live in [`AnalyticsSettings`] on the
//! configuration.

mod config;
mod drawdown;
mod evaluator;
mod metrics;

pub use config::*;
pub use drawdown::*;
pub use evaluator::*;
pub use metrics::*;
