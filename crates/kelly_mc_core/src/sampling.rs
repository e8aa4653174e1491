//! Seed derivation and categorical sampling for the Monte Carlo engine.

/// SplitMix64 finalizer; a bijective mix of 64-bit values
#[must_use]
pub fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

/// Random stream a draw belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    /// Which setup is active for a cell
    Setup = 0,
    /// Which scenario of that setup occurs
    Scenario = 1,
}

/// Seed of one stream within one path block
///
/// Distinct `(block, stream)` pairs give decorrelated seeds for the same run
/// seed, independent of how blocks are scheduled across threads.
#[must_use]
pub fn stream_seed(seed: u64, block: usize, stream: Stream) -> u64 {
    let lane = ((block as u64) << 1) | stream as u64;
    splitmix64(seed ^ splitmix64(lane))
}

/// Inverse-CDF lookup table for a discrete distribution
#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalTable {
    cumulative: Vec<f64>,
}

impl CategoricalTable {
    /// Build from probabilities, in order. The final bucket is pinned to 1.0
    /// so rounding in the running sum can never leave a uniform unmapped.
    #[must_use]
    pub fn new(probabilities: impl IntoIterator<Item = f64>) -> Self {
        let mut total = 0.0;
        let mut cumulative: Vec<f64> = probabilities
            .into_iter()
            .map(|p| {
                total += p;
                total
            })
            .collect();
        if let Some(last) = cumulative.last_mut() {
            *last = 1.0;
        }
        Self { cumulative }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }

    /// Map a uniform `u ∈ [0, 1)` to the first bucket whose cumulative
    /// probability exceeds it
    #[must_use]
    pub fn sample(&self, u: f64) -> usize {
        self.cumulative
            .partition_point(|&c| c <= u)
            .min(self.cumulative.len().saturating_sub(1))
    }
}
