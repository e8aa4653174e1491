//! Monte Carlo engine
//!
//! Every period, each live path draws a setup from the setup distribution,
//! then a scenario from that setup's distribution, and compounds its wealth
//! by `1 + f_setup · r_scenario`. Wealth that reaches zero or below is clamped
//! to exactly zero and stays there.
//!
//! # Reproducibility
//!
//! Paths are processed in blocks of [`BLOCK_SIZE`]. Block `b` owns two
//! `SmallRng` streams derived from `(seed, b)`: one for setup draws and one
//! for scenario draws. Inside a block, periods advance in order and, within a
//! period, paths in ascending order; each live cell takes exactly one uniform
//! from each stream and ruined paths take none. The same seed, configuration
//! and fractions therefore give the same ensemble bit for bit, regardless of
//! how many threads run the blocks.

use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::SimulationConfig;
use crate::error::SimulationError;
use crate::model::TrajectoryEnsemble;
use crate::sampling::{CategoricalTable, Stream, stream_seed};

/// Paths per independently seeded block
pub const BLOCK_SIZE: usize = 256;

/// Per-setup data the inner loop needs, flattened out of the configuration
struct SetupTable {
    fraction: f64,
    returns: Vec<f64>,
    scenarios: CategoricalTable,
}

/// Draw tallies of one block, summed after all blocks finish
#[derive(Debug, Clone, Default)]
struct DrawCounts {
    setups: Vec<u64>,
    scenarios: Vec<Vec<u64>>,
}

impl DrawCounts {
    fn zeroed(tables: &[SetupTable]) -> Self {
        Self {
            setups: vec![0; tables.len()],
            scenarios: tables.iter().map(|t| vec![0; t.returns.len()]).collect(),
        }
    }

    fn merge(mut self, other: Self) -> Self {
        for (a, b) in self.setups.iter_mut().zip(&other.setups) {
            *a += b;
        }
        for (row, other_row) in self.scenarios.iter_mut().zip(&other.scenarios) {
            for (a, b) in row.iter_mut().zip(other_row) {
                *a += b;
            }
        }
        self
    }
}

/// Check the engine's own preconditions and return the row width `T + 1`
fn check_preconditions(
    config: &SimulationConfig,
    fractions: &[f64],
) -> Result<usize, SimulationError> {
    if config.setups.is_empty() {
        return Err(SimulationError::Precondition("at least one setup is required"));
    }
    if fractions.len() != config.setups.len() {
        return Err(SimulationError::FractionCountMismatch {
            setups: config.setups.len(),
            fractions: fractions.len(),
        });
    }
    if let Some((setup, &value)) = fractions.iter().enumerate().find(|(_, f)| !f.is_finite()) {
        return Err(SimulationError::NonFiniteFraction { setup, value });
    }
    if config.setups.iter().any(|s| s.scenarios.is_empty()) {
        return Err(SimulationError::Precondition("every setup needs at least one scenario"));
    }
    if config.num_simulations == 0 {
        return Err(SimulationError::Precondition("number of paths must be at least 1"));
    }
    if config.num_periods == 0 {
        return Err(SimulationError::Precondition("number of periods must be at least 1"));
    }
    if !(config.initial_capital.is_finite() && config.initial_capital > 0.0) {
        return Err(SimulationError::Precondition("initial capital must be positive and finite"));
    }

    let width = config
        .num_periods
        .checked_add(1)
        .ok_or(SimulationError::Precondition("number of periods is too large"))?;
    let fits = config
        .num_simulations
        .checked_mul(width)
        .and_then(|cells| cells.checked_mul(size_of::<f64>()))
        .is_some_and(|bytes| bytes <= isize::MAX as usize)
        && BLOCK_SIZE.checked_mul(width).is_some();
    if !fits {
        return Err(SimulationError::Precondition("wealth matrix does not fit in memory"));
    }
    Ok(width)
}

/// Run `num_periods` periods for the paths of one block.
///
/// `block` is the row-major slice of this block's paths; column 0 is filled
/// with the initial capital here.
fn simulate_block(
    block: &mut [f64],
    block_index: usize,
    width: usize,
    initial_capital: f64,
    seed: u64,
    setup_table: &CategoricalTable,
    tables: &[SetupTable],
) -> DrawCounts {
    let num_paths = block.len() / width;
    let mut counts = DrawCounts::zeroed(tables);
    let mut setup_rng = SmallRng::seed_from_u64(stream_seed(seed, block_index, Stream::Setup));
    let mut scenario_rng =
        SmallRng::seed_from_u64(stream_seed(seed, block_index, Stream::Scenario));

    for path in 0..num_paths {
        block[path * width] = initial_capital;
    }

    for t in 0..width - 1 {
        for path in 0..num_paths {
            let cell = path * width + t;
            let current = block[cell];
            if current <= 0.0 {
                block[cell + 1] = 0.0;
                continue;
            }

            let setup = setup_table.sample(setup_rng.random::<f64>());
            let table = &tables[setup];
            let scenario = table.scenarios.sample(scenario_rng.random::<f64>());

            let next = current * (1.0 + table.fraction * table.returns[scenario]);
            block[cell + 1] = if next > 0.0 { next } else { 0.0 };

            counts.setups[setup] += 1;
            counts.scenarios[setup][scenario] += 1;
        }
    }

    counts
}

/// Simulate `config.num_simulations` wealth paths over `config.num_periods`
/// periods using one stake fraction per setup.
///
/// The explicit `seed` wins over `config.seed`; with neither, a seed is drawn
/// from OS entropy and recorded in the returned ensemble. The configuration
/// is assumed to have passed validation; only the engine's own preconditions
/// are checked here.
pub fn simulate(
    config: &SimulationConfig,
    fractions: &[f64],
    seed: Option<u64>,
) -> Result<TrajectoryEnsemble, SimulationError> {
    let width = check_preconditions(config, fractions)?;

    let seed = seed.or(config.seed).unwrap_or_else(rand::random);
    let num_paths = config.num_simulations;
    let num_periods = config.num_periods;
    let initial_capital = config.initial_capital;

    tracing::debug!(num_paths, num_periods, seed, ?fractions, "Starting simulation");
    let started = Instant::now();

    let setup_table = CategoricalTable::new(config.setups.iter().map(|s| s.probability));
    let tables: Vec<SetupTable> = config
        .setups
        .iter()
        .zip(fractions)
        .map(|(setup, &fraction)| SetupTable {
            fraction,
            returns: setup.scenarios.iter().map(|s| s.return_pct).collect(),
            scenarios: CategoricalTable::new(setup.scenarios.iter().map(|s| s.probability)),
        })
        .collect();

    let mut wealth = vec![0.0; num_paths * width];
    let run_block = |(index, block): (usize, &mut [f64])| {
        simulate_block(
            block,
            index,
            width,
            initial_capital,
            seed,
            &setup_table,
            &tables,
        )
    };

    #[cfg(feature = "parallel")]
    let counts = wealth
        .par_chunks_mut(BLOCK_SIZE * width)
        .enumerate()
        .map(run_block)
        .reduce(|| DrawCounts::zeroed(&tables), DrawCounts::merge);

    #[cfg(not(feature = "parallel"))]
    let counts = wealth
        .chunks_mut(BLOCK_SIZE * width)
        .enumerate()
        .map(run_block)
        .fold(DrawCounts::zeroed(&tables), DrawCounts::merge);

    let ensemble = TrajectoryEnsemble::from_parts(
        num_paths,
        num_periods,
        initial_capital,
        seed,
        wealth,
        counts.setups,
        counts.scenarios,
    );

    tracing::info!(
        num_paths,
        num_periods,
        seed,
        ruined = ensemble.ruined_paths(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Simulation complete"
    );

    Ok(ensemble)
}
