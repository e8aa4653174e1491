//! End-to-end runs of the two-regime reference configuration
//!
//! Setup A (0.5): Win 0.6/+20%, Loss 0.3/-10%, Stress 0.1/-50%
//! Setup B (0.5): Win 0.4/+15%, Loss 0.45/-8%, Stress 0.15/-40%

use crate::analysis::analyze;
use crate::config::SimulationConfig;
use crate::optimization::{
    ConvergenceStatus, FractionPolicy, expected_log_growth, feasible_interval, optimize_all,
    resolve_fractions,
};
use crate::simulation::simulate;
use crate::validation::validate;

fn reference() -> SimulationConfig {
    SimulationConfig {
        num_simulations: 10_000,
        num_periods: 100,
        initial_capital: 100.0,
        default_kelly_fraction: 0.25,
        ..SimulationConfig::default_two_regime()
    }
}

#[test]
fn test_reference_is_valid() {
    assert!(validate(&reference()).is_empty());
}

#[test]
fn test_reference_quarter_stake() {
    let config = reference();
    let fractions = resolve_fractions(&config, &FractionPolicy::Configured).unwrap();
    assert_eq!(fractions, vec![0.25, 0.25]);

    let ensemble = simulate(&config, &fractions, Some(7)).unwrap();
    let result = analyze(&ensemble, &config).unwrap();

    assert_eq!(result.num_paths, 10_000);
    assert_eq!(result.seed, 7);

    let terminal = &result.terminal;
    assert!(terminal.mean.is_finite() && terminal.mean > 0.0);
    assert!(terminal.median > 0.0);
    assert!(terminal.min >= 0.0);
    assert!(terminal.std_dev > 0.0);

    // Each period's expected log growth is slightly negative at f = 0.25,
    // so the median drifts below V0 while the mean stays near it
    assert!(terminal.median < 100.0);
    assert!(terminal.mean > 50.0 && terminal.mean < 200.0);

    // Worst single-period factor is 0.875, so ruin to zero is impossible
    assert_eq!(result.risk.ruined_paths, 0);
    assert!((0.0..1.0).contains(&result.risk.probability_of_ruin));
    assert!(result.risk.probability_of_loss > 0.0 && result.risk.probability_of_loss < 1.0);

    let percentiles: Vec<f64> = terminal.percentiles.iter().map(|(_, v)| *v).collect();
    assert!(percentiles.windows(2).all(|w| w[0] <= w[1]));
    assert!(terminal.percentile(0.25).unwrap() <= terminal.median);
    assert!(terminal.median <= terminal.percentile(0.75).unwrap());

    assert!(result.risk.value_at_risk > 0.0);
    assert!(result.risk.conditional_value_at_risk >= result.risk.value_at_risk);
    assert!(result.drawdown.max_drawdown_mean > 0.0);
    assert!(result.drawdown.max_drawdown_worst <= 1.0);
    assert!(result.returns.sharpe_ratio.is_some());
}

#[test]
fn test_reference_full_stake_has_partial_ruin() {
    let config = reference();
    let ensemble = simulate(&config, &[1.0, 1.0], Some(7)).unwrap();
    let result = analyze(&ensemble, &config).unwrap();

    let ruin = result.risk.probability_of_ruin;
    assert!(ruin > 0.0 && ruin < 1.0, "P(ruin) = {ruin}");
    assert!(result.drawdown.max_drawdown_worst > 0.9);
}

#[test]
fn test_reference_kelly_summary() {
    let config = reference();
    let results = optimize_all(&config.setups, &config.kelly);
    assert_eq!(results.len(), 2);

    for (setup, result) in config.setups.iter().zip(&results) {
        let interval = feasible_interval(setup);
        assert_eq!(result.status, ConvergenceStatus::Converged);
        assert!(interval.contains(result.optimal_fraction));

        // Grid comparison over the feasible interval
        let steps = 400;
        let lo = interval.lower.max(-10.0);
        let hi = interval.upper.min(10.0);
        for i in 1..steps {
            let f = lo + (hi - lo) * i as f64 / steps as f64;
            assert!(result.expected_log_growth >= expected_log_growth(setup, f) - 1e-12);
        }
    }

    // Setup A has a positive edge, Setup B a negative one
    assert!(results[0].optimal_fraction > 0.0);
    assert!(results[1].optimal_fraction < 0.0);
}

#[test]
fn test_half_kelly_beats_overbetting() {
    let config = SimulationConfig {
        num_simulations: 4_000,
        num_periods: 100,
        ..SimulationConfig::default_two_regime()
    };
    let half = resolve_fractions(&config, &FractionPolicy::KellyOptimal { multiplier: 0.5 })
        .unwrap();
    let over: Vec<f64> = half.iter().map(|f| f * 6.0).collect();

    let half_result = analyze(&simulate(&config, &half, Some(11)).unwrap(), &config).unwrap();
    let over_result = analyze(&simulate(&config, &over, Some(11)).unwrap(), &config).unwrap();

    assert!(half_result.terminal.median > over_result.terminal.median);
    assert!(half_result.drawdown.max_drawdown_mean < over_result.drawdown.max_drawdown_mean);
}
