use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use kelly_mc_core::{FractionPolicy, SimulationConfig};

/// How stakes are chosen for setups without an explicit override
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Per-setup override, otherwise the configured default fraction
    Configured,
    /// Full growth-optimal fraction
    Optimal,
    /// Half of the growth-optimal fraction
    HalfKelly,
}

impl PolicyArg {
    pub fn to_policy(self) -> FractionPolicy {
        match self {
            PolicyArg::Configured => FractionPolicy::Configured,
            PolicyArg::Optimal => FractionPolicy::KellyOptimal { multiplier: 1.0 },
            PolicyArg::HalfKelly => FractionPolicy::KellyOptimal { multiplier: 0.5 },
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PolicyArg::Configured => "configured",
            PolicyArg::Optimal => "optimal",
            PolicyArg::HalfKelly => "half-kelly",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "kelly_mc")]
#[command(about = "Kelly stake sizing and Monte Carlo risk simulation")]
pub struct Args {
    /// YAML scenario file (default: built-in two-regime example)
    pub config: Option<PathBuf>,

    /// Number of simulated paths
    #[arg(short = 'n', long)]
    pub paths: Option<usize>,

    /// Number of periods per path
    #[arg(short = 't', long)]
    pub periods: Option<usize>,

    /// Initial capital
    #[arg(short, long)]
    pub capital: Option<f64>,

    /// Random seed (overrides the scenario file)
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Stake policy
    #[arg(short, long, value_enum, default_value_t = PolicyArg::Configured)]
    pub policy: PolicyArg,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write the example scenario file to this path and exit
    #[arg(long, value_name = "PATH")]
    pub write_example: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Apply command-line overrides on top of a loaded configuration
    pub fn apply_overrides(&self, config: &mut SimulationConfig) {
        if let Some(paths) = self.paths {
            config.num_simulations = paths;
        }
        if let Some(periods) = self.periods {
            config.num_periods = periods;
        }
        if let Some(capital) = self.capital {
            config.initial_capital = capital;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let args = Args::try_parse_from(["kelly_mc"]).unwrap();

        assert_eq!(args.config, None);
        assert_eq!(args.policy, PolicyArg::Configured);
        assert_eq!(args.format, OutputFormat::Text);
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_parse_overrides() {
        let args = Args::try_parse_from([
            "kelly_mc",
            "plan.yaml",
            "-n",
            "500",
            "--periods",
            "12",
            "--seed",
            "7",
            "--policy",
            "half-kelly",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(args.config, Some(PathBuf::from("plan.yaml")));
        assert_eq!(args.policy, PolicyArg::HalfKelly);
        assert_eq!(args.format, OutputFormat::Json);

        let mut config = SimulationConfig::default_two_regime();
        args.apply_overrides(&mut config);
        assert_eq!(config.num_simulations, 500);
        assert_eq!(config.num_periods, 12);
        assert_eq!(config.initial_capital, 100.0);
    }

    #[test]
    fn test_policy_mapping() {
        assert_eq!(
            PolicyArg::HalfKelly.to_policy(),
            FractionPolicy::KellyOptimal { multiplier: 0.5 }
        );
        assert_eq!(PolicyArg::Optimal.label(), "optimal");
    }
}
