//! Peak-to-trough analysis of a single wealth path.

use serde::{Deserialize, Serialize};

/// Drawdowns at or below this depth count as being at the peak
pub const UNDERWATER_EPSILON: f64 = 1e-10;

/// Drawdown summary of one path
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PathDrawdown {
    /// Deepest decline from the running peak, as a fraction in [0, 1]
    pub max_drawdown: f64,
    /// Mean depth over underwater periods; 0 if never underwater
    pub avg_drawdown: f64,
    /// Longest run of consecutive underwater periods
    pub max_duration: usize,
}

/// Drawdown series `D(t) = (M(t) - V(t)) / M(t)` with `M(t)` the running peak.
///
/// A non-positive peak yields a drawdown of 0 for that point.
#[must_use]
pub fn drawdown_series(path: &[f64]) -> Vec<f64> {
    let mut peak = f64::NEG_INFINITY;
    path.iter()
        .map(|&value| {
            if value > peak {
                peak = value;
            }
            if peak > 0.0 {
                ((peak - value) / peak).clamp(0.0, 1.0)
            } else {
                0.0
            }
        })
        .collect()
}

/// Single-pass drawdown reduction of one path
#[must_use]
pub fn path_drawdown(path: &[f64]) -> PathDrawdown {
    let Some(&first) = path.first() else {
        return PathDrawdown::default();
    };

    let mut peak = first;
    let mut max_drawdown = 0.0_f64;
    let mut underwater_sum = 0.0;
    let mut underwater_periods = 0usize;
    let mut run = 0usize;
    let mut max_duration = 0usize;

    for &value in path {
        if value > peak {
            peak = value;
        }
        let drawdown = if peak > 0.0 {
            ((peak - value) / peak).clamp(0.0, 1.0)
        } else {
            0.0
        };

        max_drawdown = max_drawdown.max(drawdown);

        if drawdown > UNDERWATER_EPSILON {
            underwater_sum += drawdown;
            underwater_periods += 1;
            run += 1;
            max_duration = max_duration.max(run);
        } else {
            run = 0;
        }
    }

    let avg_drawdown = if underwater_periods > 0 {
        underwater_sum / underwater_periods as f64
    } else {
        0.0
    };

    PathDrawdown {
        max_drawdown,
        avg_drawdown,
        max_duration,
    }
}
