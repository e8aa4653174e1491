//! Integration tests for the Kelly / Monte Carlo pipeline
//!
//! Tests are organized by topic:
//! - `determinism` - Seeded reproducibility and thread-count independence
//! - `trajectories` - Ruin clamp, setup frequencies, stake application
//! - `reference_run` - The two-regime reference configuration end to end
//! - `degenerate` - Single path, single period, flat and one-sided setups
//! - `builder_dsl` - Builder DSL and validation round trip

mod reference_run;
