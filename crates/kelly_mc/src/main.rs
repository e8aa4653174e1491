use std::process::ExitCode;

use clap::Parser;
use kelly_mc::{Args, RunStatus, init_logging, run};

fn main() -> color_eyre::Result<ExitCode> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(&args.log_level)?;

    let mut stdout = std::io::stdout().lock();
    match run(&args, &mut stdout)? {
        RunStatus::Completed | RunStatus::ExampleWritten(_) => Ok(ExitCode::SUCCESS),
        RunStatus::Invalid(problems) => {
            eprintln!("Configuration has {} problem(s):", problems.len());
            for problem in &problems {
                eprintln!("  - {problem}");
            }
            Ok(ExitCode::from(2))
        }
    }
}
