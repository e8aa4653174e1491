//! Command-line front end for `kelly_mc_core`
//!
//! Loads a scenario file, then drives the core in its fixed order:
//! validate, resolve fractions (optimizing where the policy asks for it),
//! simulate, analyze.

use std::io::Write;
use std::path::PathBuf;

use color_eyre::eyre::WrapErr;
use kelly_mc_core::{
    KellyResult, SimulationConfig, analyze, resolve_fractions, simulate, validate,
};

pub mod cli;
pub mod format;
pub mod logging;
pub mod report;
pub mod scenario_file;

pub use cli::{Args, OutputFormat, PolicyArg};
pub use logging::init_logging;
pub use report::RunReport;

/// How a run ended
#[derive(Debug, Clone, PartialEq)]
pub enum RunStatus {
    /// Report written to the output
    Completed,
    /// Configuration rejected; nothing was simulated
    Invalid(Vec<String>),
    /// Example scenario file written
    ExampleWritten(PathBuf),
}

/// Log every setup whose Kelly search fell back to a zero stake; returns
/// how many did
fn warn_unconverged(results: &[KellyResult]) -> usize {
    let mut count = 0;
    for result in results.iter().filter(|r| !r.converged()) {
        tracing::warn!(
            setup = %result.setup_name,
            status = ?result.status,
            "Kelly search did not converge"
        );
        count += 1;
    }
    count
}

/// Execute one invocation, writing the report to `out`
pub fn run(args: &Args, out: &mut impl Write) -> color_eyre::Result<RunStatus> {
    if let Some(path) = &args.write_example {
        scenario_file::write_example(path)?;
        writeln!(out, "Wrote example scenario to {}", path.display())?;
        return Ok(RunStatus::ExampleWritten(path.clone()));
    }

    let mut config = match &args.config {
        Some(path) => scenario_file::load_config(path)?,
        None => {
            tracing::info!("No scenario file given, using the two-regime example");
            SimulationConfig::default_two_regime()
        }
    };
    args.apply_overrides(&mut config);

    let problems = validate(&config);
    if !problems.is_empty() {
        tracing::warn!(count = problems.len(), "Configuration rejected");
        return Ok(RunStatus::Invalid(problems));
    }

    let fractions = resolve_fractions(&config, &args.policy.to_policy())
        .wrap_err("Failed to resolve stake fractions")?;
    let ensemble = simulate(&config, &fractions, args.seed).wrap_err("Simulation failed")?;
    let analytics = analyze(&ensemble, &config).wrap_err("Analytics failed")?;
    warn_unconverged(&analytics.kelly);

    let report = RunReport::new(args.policy.label(), &config, &fractions, &ensemble, analytics);
    match args.format {
        OutputFormat::Text => write!(out, "{report}")?,
        OutputFormat::Json => writeln!(out, "{}", report.to_json()?)?,
    }

    Ok(RunStatus::Completed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::tempdir;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["kelly_mc"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_default_run_text() {
        let mut out = Vec::new();
        let status = run(&args(&["-n", "300", "-t", "25", "-s", "7"]), &mut out).unwrap();

        assert_eq!(status, RunStatus::Completed);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Simulated 300 paths x 25 periods"));
        assert!(text.contains("seed 7"));
    }

    #[test]
    fn test_json_output_with_half_kelly() {
        let mut out = Vec::new();
        let status = run(
            &args(&["-n", "200", "-t", "10", "-s", "1", "-p", "half-kelly", "-f", "json"]),
            &mut out,
        )
        .unwrap();

        assert_eq!(status, RunStatus::Completed);
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["policy"], "half-kelly");
        assert_eq!(value["analytics"]["seed"], 1);
    }

    #[test]
    fn test_write_example_then_run_it() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("example.yaml");
        let path_str = path.to_str().unwrap();

        let mut out = Vec::new();
        let status = run(&args(&["--write-example", path_str]), &mut out).unwrap();
        assert_eq!(status, RunStatus::ExampleWritten(path.clone()));

        let mut out = Vec::new();
        let argv = [path_str, "-n", "100", "-t", "5", "-s", "3"];
        let status = run(&args(&argv), &mut out).unwrap();
        assert_eq!(status, RunStatus::Completed);
    }

    #[test]
    fn test_invalid_file_is_rejected_before_simulating() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(
            &path,
            r#"
setups:
  - name: Lopsided
    probability: 1.1
    scenarios:
      - {name: Up, probability: 0.5, return_pct: 0.1}
      - {name: Down, probability: 0.4, return_pct: -0.1}
"#,
        )
        .unwrap();

        let mut out = Vec::new();
        let status = run(&args(&[path.to_str().unwrap()]), &mut out).unwrap();

        match status {
            RunStatus::Invalid(problems) => {
                assert!(problems.iter().any(|p| p.contains("Setup probabilities sum to")));
                assert!(problems.iter().any(|p| p.contains("Scenario probabilities sum to")));
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
        assert!(out.is_empty());
    }

    #[test]
    fn test_unconverged_searches_are_counted_from_analytics() {
        let mut config = SimulationConfig {
            num_simulations: 50,
            num_periods: 5,
            ..SimulationConfig::default_two_regime()
        };
        let fractions = [0.25, 0.25];
        let ensemble = simulate(&config, &fractions, Some(1)).unwrap();

        let analytics = analyze(&ensemble, &config).unwrap();
        assert_eq!(warn_unconverged(&analytics.kelly), 0);

        config.kelly.max_iterations = 2;
        let analytics = analyze(&ensemble, &config).unwrap();
        assert_eq!(warn_unconverged(&analytics.kelly), 2);
    }

    #[test]
    fn test_overrides_can_invalidate() {
        let mut out = Vec::new();
        let status = run(&args(&["--capital=-5"]), &mut out).unwrap();
        assert!(matches!(status, RunStatus::Invalid(_)));
    }
}
