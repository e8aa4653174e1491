//! Reduction of a trajectory ensemble to an `AnalyticsResult`.
//!
//! Each path is first summarized independently (in parallel under the
//! `parallel` feature), then the per-path summaries are aggregated.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::SimulationConfig;
use crate::error::AnalyticsError;
use crate::model::{
    AnalyticsResult, DrawdownStats, ReturnStats, RiskStats, TerminalWealthStats,
    TrajectoryEnsemble,
};
use crate::optimization::optimize_all;

use super::config::AnalyticsSettings;
use super::drawdown::{PathDrawdown, path_drawdown};
use super::metrics::{
    RunningStats, fraction_where, mean, median_sorted, percentile_sorted, sorted, std_dev,
};

/// Everything analytics needs from one path
#[derive(Debug, Clone, Copy)]
struct PathSummary {
    terminal: f64,
    cagr: f64,
    /// Annualized std-dev of live log returns
    volatility: f64,
    /// Per-period simple returns over live cells
    returns: RunningStats,
    drawdown: PathDrawdown,
}

fn summarize_path(path: &[f64], periods: usize, settings: &AnalyticsSettings) -> PathSummary {
    let initial = path[0];
    let terminal = path[path.len() - 1];

    let cagr = if terminal > 0.0 && initial > 0.0 {
        (terminal / initial).powf(settings.periods_per_year / periods as f64) - 1.0
    } else {
        -1.0
    };

    let mut log_returns = RunningStats::default();
    let mut returns = RunningStats::default();
    for pair in path.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        if from <= 0.0 {
            break;
        }
        returns.push(to / from - 1.0);
        if to > 0.0 {
            log_returns.push((to / from).ln());
        }
    }

    PathSummary {
        terminal,
        cagr,
        volatility: log_returns.std_dev() * settings.periods_per_year.sqrt(),
        returns,
        drawdown: path_drawdown(path),
    }
}

fn check_ensemble(
    ensemble: &TrajectoryEnsemble,
    config: &SimulationConfig,
) -> Result<(), AnalyticsError> {
    if ensemble.num_paths() == 0 || ensemble.num_periods() == 0 {
        return Err(AnalyticsError::EmptyEnsemble);
    }
    let found = ensemble.wealth().len();
    match ensemble.expected_len() {
        Some(expected) if expected == found => {}
        expected => {
            return Err(AnalyticsError::ShapeMismatch {
                expected: expected.unwrap_or(usize::MAX),
                found,
            });
        }
    }
    let tolerance = 1e-9 * config.initial_capital.abs().max(1.0);
    if (ensemble.initial_capital() - config.initial_capital).abs() > tolerance {
        return Err(AnalyticsError::CapitalMismatch {
            ensemble: ensemble.initial_capital(),
            config: config.initial_capital,
        });
    }
    config.analytics.check()
}

/// Reduce an ensemble to distribution, return, drawdown and risk statistics,
/// plus the optimizer summary for every configured setup.
///
/// Fails only on an empty or malformed ensemble, an ensemble produced with a
/// different initial capital, or out-of-range analytics settings.
pub fn analyze(
    ensemble: &TrajectoryEnsemble,
    config: &SimulationConfig,
) -> Result<AnalyticsResult, AnalyticsError> {
    check_ensemble(ensemble, config)?;

    let settings = &config.analytics;
    let periods = ensemble.num_periods();
    let width = ensemble.width();
    let v0 = ensemble.initial_capital();

    #[cfg(feature = "parallel")]
    let summaries: Vec<PathSummary> = ensemble
        .wealth()
        .par_chunks(width)
        .map(|path| summarize_path(path, periods, settings))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let summaries: Vec<PathSummary> = ensemble
        .wealth()
        .chunks(width)
        .map(|path| summarize_path(path, periods, settings))
        .collect();

    let terminal: Vec<f64> = summaries.iter().map(|s| s.terminal).collect();
    let sorted_terminal = sorted(&terminal);

    let terminal_stats = TerminalWealthStats {
        mean: mean(&terminal),
        median: median_sorted(&sorted_terminal),
        std_dev: std_dev(&terminal),
        min: sorted_terminal[0],
        max: sorted_terminal[sorted_terminal.len() - 1],
        percentiles: settings
            .percentiles
            .iter()
            .map(|&p| (p, percentile_sorted(&sorted_terminal, p)))
            .collect(),
    };

    let cagr: Vec<f64> = summaries.iter().map(|s| s.cagr).collect();
    let volatility: Vec<f64> = summaries.iter().map(|s| s.volatility).collect();
    let pooled = summaries
        .iter()
        .fold(RunningStats::default(), |acc, s| acc.merge(s.returns));

    let per_period_rf = settings.risk_free_rate / settings.periods_per_year;
    let pooled_std = pooled.std_dev();
    let sharpe_ratio = (pooled.count() > 0 && pooled_std > 0.0)
        .then(|| (pooled.mean() - per_period_rf) / pooled_std * settings.periods_per_year.sqrt());

    let return_stats = ReturnStats {
        cagr_mean: mean(&cagr),
        cagr_median: median_sorted(&sorted(&cagr)),
        annualized_volatility: mean(&volatility),
        sharpe_ratio,
    };

    let max_drawdowns: Vec<f64> = summaries.iter().map(|s| s.drawdown.max_drawdown).collect();
    let avg_drawdowns: Vec<f64> = summaries.iter().map(|s| s.drawdown.avg_drawdown).collect();
    let durations: Vec<f64> = summaries
        .iter()
        .map(|s| s.drawdown.max_duration as f64)
        .collect();

    let drawdown_stats = DrawdownStats {
        max_drawdown_mean: mean(&max_drawdowns),
        max_drawdown_median: median_sorted(&sorted(&max_drawdowns)),
        max_drawdown_worst: max_drawdowns.iter().copied().fold(0.0, f64::max),
        avg_drawdown: mean(&avg_drawdowns),
        max_duration: summaries
            .iter()
            .map(|s| s.drawdown.max_duration)
            .max()
            .unwrap_or(0),
        mean_duration: mean(&durations),
    };

    let confidence = settings.var_confidence;
    let var_threshold = percentile_sorted(&sorted_terminal, 1.0 - confidence);
    let tail: Vec<f64> = sorted_terminal
        .iter()
        .take_while(|v| **v <= var_threshold)
        .map(|v| v0 - v)
        .collect();

    let risk_stats = RiskStats {
        probability_of_loss: fraction_where(&terminal, |v| v < v0),
        probability_of_profit: fraction_where(&terminal, |v| v > v0),
        probability_of_ruin: fraction_where(&terminal, |v| v < settings.ruin_threshold * v0),
        ruined_paths: terminal.iter().filter(|v| **v == 0.0).count(),
        confidence,
        value_at_risk: v0 - var_threshold,
        conditional_value_at_risk: if tail.is_empty() {
            v0 - var_threshold
        } else {
            mean(&tail)
        },
    };

    tracing::debug!(
        paths = ensemble.num_paths(),
        periods,
        mean_terminal = terminal_stats.mean,
        ruin = risk_stats.probability_of_ruin,
        "Analytics computed"
    );

    Ok(AnalyticsResult {
        num_paths: ensemble.num_paths(),
        num_periods: periods,
        initial_capital: v0,
        seed: ensemble.seed(),
        terminal: terminal_stats,
        returns: return_stats,
        drawdown: drawdown_stats,
        risk: risk_stats,
        kelly: optimize_all(&config.setups, &config.kelly),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_config(initial_capital: f64) -> SimulationConfig {
        SimulationConfig {
            initial_capital,
            ..SimulationConfig::default_two_regime()
        }
    }

    #[test]
    fn test_hand_built_ensemble() {
        let ensemble = TrajectoryEnsemble::from_paths(
            100.0,
            &[
                vec![100.0, 110.0, 121.0],
                vec![100.0, 50.0, 0.0],
                vec![100.0, 90.0, 99.0],
                vec![100.0, 100.0, 100.0],
            ],
        )
        .unwrap();

        let result = analyze(&ensemble, &flat_config(100.0)).unwrap();

        assert_eq!(result.num_paths, 4);
        assert!((result.terminal.mean - 80.0).abs() < 1e-9);
        assert_eq!(result.terminal.min, 0.0);
        assert!((result.terminal.max - 121.0).abs() < 1e-9);
        assert!((result.terminal.median - 99.5).abs() < 1e-9);

        assert_eq!(result.risk.probability_of_loss, 0.5);
        assert_eq!(result.risk.probability_of_profit, 0.25);
        assert_eq!(result.risk.probability_of_ruin, 0.25);
        assert_eq!(result.risk.ruined_paths, 1);

        assert_eq!(result.drawdown.max_drawdown_worst, 1.0);
        assert_eq!(result.drawdown.max_duration, 2);

        // Path 0 grows 10% a period; the ruined path is -100%
        assert!(result.returns.cagr_median > -1.0);
        let expected_cagr = (0.1 - 1.0 + (0.99_f64.sqrt() - 1.0)) / 4.0;
        assert!((result.returns.cagr_mean - expected_cagr).abs() < 1e-9);
        assert_eq!(result.kelly.len(), 2);
    }

    #[test]
    fn test_var_and_cvar_are_positive_losses() {
        let paths: Vec<Vec<f64>> = (1..=100).map(|i| vec![100.0, f64::from(i)]).collect();
        let ensemble = TrajectoryEnsemble::from_paths(100.0, &paths).unwrap();

        let result = analyze(&ensemble, &flat_config(100.0)).unwrap();

        // 5th percentile of 1..=100 with linear interpolation is 5.95
        assert!((result.risk.value_at_risk - (100.0 - 5.95)).abs() < 1e-9);
        // Tail holds 1..=5
        assert!((result.risk.conditional_value_at_risk - 97.0).abs() < 1e-9);
        assert!(result.risk.conditional_value_at_risk >= result.risk.value_at_risk);
    }

    #[test]
    fn test_single_path_single_period() {
        let ensemble = TrajectoryEnsemble::from_paths(100.0, &[vec![100.0, 105.0]]).unwrap();
        let result = analyze(&ensemble, &flat_config(100.0)).unwrap();

        assert_eq!(result.terminal.std_dev, 0.0);
        assert_eq!(result.terminal.median, 105.0);
        assert_eq!(result.terminal.percentile(0.01), Some(105.0));
        assert_eq!(result.returns.sharpe_ratio, None);
        assert_eq!(result.returns.annualized_volatility, 0.0);
        assert!((result.returns.cagr_mean - 0.05).abs() < 1e-12);
        assert_eq!(result.drawdown.max_drawdown_worst, 0.0);
    }

    #[test]
    fn test_zero_dispersion_has_no_sharpe() {
        let paths = vec![vec![100.0, 200.0, 400.0]; 3];
        let ensemble = TrajectoryEnsemble::from_paths(100.0, &paths).unwrap();
        let result = analyze(&ensemble, &flat_config(100.0)).unwrap();

        assert_eq!(result.terminal.std_dev, 0.0);
        assert!(result.returns.sharpe_ratio.is_none());
    }

    #[test]
    fn test_capital_mismatch_rejected() {
        let ensemble = TrajectoryEnsemble::from_paths(100.0, &[vec![100.0, 105.0]]).unwrap();
        assert!(matches!(
            analyze(&ensemble, &flat_config(200.0)),
            Err(AnalyticsError::CapitalMismatch { .. })
        ));
    }

    #[test]
    fn test_malformed_ensemble_rejected() {
        let json = r#"{
            "num_paths": 2, "num_periods": 1, "initial_capital": 100.0, "seed": 0,
            "wealth": [100.0, 101.0, 100.0],
            "setup_counts": [], "scenario_counts": []
        }"#;
        let ensemble: TrajectoryEnsemble = serde_json::from_str(json).unwrap();

        assert_eq!(
            analyze(&ensemble, &flat_config(100.0)),
            Err(AnalyticsError::ShapeMismatch {
                expected: 4,
                found: 3
            })
        );
    }

    #[test]
    fn test_overflowing_shape_rejected() {
        let json = format!(
            r#"{{
            "num_paths": 2, "num_periods": {}, "initial_capital": 100.0, "seed": 0,
            "wealth": [100.0, 101.0, 100.0, 99.0],
            "setup_counts": [], "scenario_counts": []
        }}"#,
            u64::MAX
        );
        let ensemble: TrajectoryEnsemble = serde_json::from_str(&json).unwrap();

        assert_eq!(
            analyze(&ensemble, &flat_config(100.0)),
            Err(AnalyticsError::ShapeMismatch {
                expected: usize::MAX,
                found: 4
            })
        );
    }

    #[test]
    fn test_ruin_threshold_is_configurable() {
        let ensemble =
            TrajectoryEnsemble::from_paths(100.0, &[vec![100.0, 15.0], vec![100.0, 120.0]])
                .unwrap();

        let mut config = flat_config(100.0);
        assert_eq!(analyze(&ensemble, &config).unwrap().risk.probability_of_ruin, 0.0);

        config.analytics.ruin_threshold = 0.20;
        assert_eq!(analyze(&ensemble, &config).unwrap().risk.probability_of_ruin, 0.5);
    }
}
