//! Run report rendering (plain text or JSON)

use std::fmt;

use kelly_mc_core::{AnalyticsResult, SimulationConfig, TrajectoryEnsemble};
use serde::Serialize;

use crate::format::{
    format_amount, format_fraction, format_percentage, format_ratio, percentile_label,
};

/// Per-setup line of the report: what was staked and how often it came up
#[derive(Debug, Clone, Serialize)]
pub struct SetupSummary {
    pub name: String,
    pub probability: f64,
    pub fraction: f64,
    pub draws: u64,
    pub odds: String,
}

/// Everything printed for one run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub policy: String,
    pub setups: Vec<SetupSummary>,
    pub analytics: AnalyticsResult,
}

impl RunReport {
    pub fn new(
        policy: impl Into<String>,
        config: &SimulationConfig,
        fractions: &[f64],
        ensemble: &TrajectoryEnsemble,
        analytics: AnalyticsResult,
    ) -> Self {
        let setups = config
            .setups
            .iter()
            .zip(fractions)
            .enumerate()
            .map(|(i, (setup, &fraction))| SetupSummary {
                name: setup.name.clone(),
                probability: setup.probability,
                fraction,
                draws: ensemble.setup_counts().get(i).copied().unwrap_or(0),
                odds: setup.odds_description(),
            })
            .collect();

        Self {
            policy: policy.into(),
            setups,
            analytics,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = &self.analytics;

        writeln!(
            out,
            "Simulated {} paths x {} periods from {} (seed {})",
            a.num_paths,
            a.num_periods,
            format_amount(a.initial_capital),
            a.seed
        )?;
        writeln!(out, "Stake policy: {}", self.policy)?;

        writeln!(out, "\nKelly sizing")?;
        for (summary, kelly) in self.setups.iter().zip(&a.kelly) {
            writeln!(
                out,
                "  {:<16} P={:<6} f*={} ({:?})  G(f*)={:.5}  staked={}  draws={}",
                summary.name,
                format_percentage(summary.probability),
                format_fraction(kelly.optimal_fraction),
                kelly.status,
                kelly.expected_log_growth,
                format_fraction(summary.fraction),
                summary.draws
            )?;
            writeln!(out, "    {}", summary.odds)?;
        }

        let t = &a.terminal;
        writeln!(out, "\nTerminal wealth")?;
        writeln!(out, "  Mean     {}", format_amount(t.mean))?;
        writeln!(out, "  Median   {}", format_amount(t.median))?;
        writeln!(out, "  Std dev  {}", format_amount(t.std_dev))?;
        writeln!(
            out,
            "  Range    {} .. {}",
            format_amount(t.min),
            format_amount(t.max)
        )?;
        for (p, value) in &t.percentiles {
            writeln!(out, "  {:<8} {}", percentile_label(*p), format_amount(*value))?;
        }

        let r = &a.returns;
        writeln!(out, "\nReturns")?;
        writeln!(out, "  CAGR mean     {}", format_percentage(r.cagr_mean))?;
        writeln!(out, "  CAGR median   {}", format_percentage(r.cagr_median))?;
        writeln!(out, "  Volatility    {}", format_percentage(r.annualized_volatility))?;
        writeln!(out, "  Sharpe        {}", format_ratio(r.sharpe_ratio))?;

        let d = &a.drawdown;
        writeln!(out, "\nDrawdown")?;
        writeln!(out, "  Max mean      {}", format_percentage(d.max_drawdown_mean))?;
        writeln!(out, "  Max median    {}", format_percentage(d.max_drawdown_median))?;
        writeln!(out, "  Worst         {}", format_percentage(d.max_drawdown_worst))?;
        writeln!(out, "  Average       {}", format_percentage(d.avg_drawdown))?;
        writeln!(
            out,
            "  Duration      max {} / mean {:.1} periods",
            d.max_duration, d.mean_duration
        )?;

        let k = &a.risk;
        let confidence = format_percentage(k.confidence);
        writeln!(out, "\nRisk")?;
        writeln!(out, "  P(loss)       {}", format_percentage(k.probability_of_loss))?;
        writeln!(out, "  P(profit)     {}", format_percentage(k.probability_of_profit))?;
        writeln!(
            out,
            "  P(ruin)       {} ({} paths wiped out)",
            format_percentage(k.probability_of_ruin),
            k.ruined_paths
        )?;
        writeln!(out, "  VaR {confidence:<9} {}", format_amount(k.value_at_risk))?;
        writeln!(
            out,
            "  CVaR {confidence:<8} {}",
            format_amount(k.conditional_value_at_risk)
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kelly_mc_core::{analyze, simulate};

    fn small_report() -> RunReport {
        let config = SimulationConfig {
            num_simulations: 200,
            num_periods: 20,
            ..SimulationConfig::default_two_regime()
        };
        let fractions = [0.25, 0.25];
        let ensemble = simulate(&config, &fractions, Some(7)).unwrap();
        let analytics = analyze(&ensemble, &config).unwrap();
        RunReport::new("configured", &config, &fractions, &ensemble, analytics)
    }

    #[test]
    fn test_text_sections() {
        let text = small_report().to_text();

        assert!(text.starts_with("Simulated 200 paths x 20 periods from 100.00 (seed 7)"));
        for section in ["Kelly sizing", "Terminal wealth", "Returns", "Drawdown", "Risk"] {
            assert!(text.contains(section), "missing {section}");
        }
        assert!(text.contains("Setup A"));
        assert!(text.contains("P50"));
    }

    #[test]
    fn test_display_matches_text() {
        let report = small_report();
        let shown = format!("{report}");

        assert_eq!(shown, report.to_text());
        assert!(shown.ends_with('\n'));
        assert!(shown.contains("CVaR"));
    }

    #[test]
    fn test_json_is_parseable() {
        let report = small_report();
        let json = report.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["policy"], "configured");
        assert_eq!(value["setups"].as_array().map(Vec::len), Some(2));
        assert_eq!(value["analytics"]["num_paths"], 200);

        let draws: u64 = report.setups.iter().map(|s| s.draws).sum();
        assert_eq!(draws, 200 * 20);
    }
}
