//! Sonde - Main Entry Point
//!
//! Exit codes: 0 when every expectation passed, 1 when at least one failed,
//! 2 for configuration, loading or static-check errors.

use std::process::ExitCode;

use clap::Parser;
use sonde_cli::{Cli, Commands, commands, logging};

const EXIT_FAILURES: u8 = 1;
const EXIT_ERROR: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => match commands::run(&args).await {
            Ok(report) if report.all_passed() => ExitCode::SUCCESS,
            Ok(_) => ExitCode::from(EXIT_FAILURES),
            Err(e) => {
                eprintln!("Error: {e}");
                ExitCode::from(EXIT_ERROR)
            }
        },
        Commands::Check(args) => match commands::check(&args).await {
            Ok(issues) if issues.is_empty() => ExitCode::SUCCESS,
            Ok(_) => ExitCode::from(EXIT_ERROR),
            Err(e) => {
                eprintln!("Error: {e}");
                ExitCode::from(EXIT_ERROR)
            }
        },
    }
}
