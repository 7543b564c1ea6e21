//! Command-line definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use sonde_infrastructure::{ConfigOverrides, ReportFormat};

/// Top-level parser.
#[derive(Debug, Parser)]
#[command(name = "sonde", about = "Declarative HTTP scenario runner")]
#[command(version, long_about = None)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a suite against a server and report every expectation
    Run(RunArgs),

    /// Check a suite offline for references that can never resolve
    Check(CheckArgs),
}

/// Arguments of `sonde run`.
#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Suite file (.yaml, .yml or .json)
    pub suite: PathBuf,

    /// Base URL, overriding the suite, config file and environment
    #[arg(long)]
    pub base_url: Option<String>,

    /// Seed fixture file whose keys override the suite's seeds
    #[arg(long)]
    pub seeds: Option<PathBuf>,

    /// Config file (.toml, .yaml or .json)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Per-request timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

impl RunArgs {
    /// Command-line values that override every other config layer.
    #[must_use]
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            base_url: self.base_url.clone(),
            timeout_ms: self.timeout_ms,
        }
    }
}

/// Arguments of `sonde check`.
#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    /// Suite file (.yaml, .yml or .json)
    pub suite: PathBuf,

    /// Seed fixture file whose keys override the suite's seeds
    #[arg(long)]
    pub seeds: Option<PathBuf>,
}

/// Report formats selectable on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Stable JSON
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => Self::Text,
            OutputFormat::Json => Self::Json,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from([
            "sonde",
            "run",
            "suites/json-server.yaml",
            "--base-url",
            "http://localhost:4000",
            "--timeout-ms",
            "500",
            "--format",
            "json",
        ])
        .unwrap();

        let Commands::Run(args) = cli.command else {
            unreachable!("expected run");
        };
        assert_eq!(args.suite, PathBuf::from("suites/json-server.yaml"));
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(
            args.overrides(),
            ConfigOverrides {
                base_url: Some("http://localhost:4000".into()),
                timeout_ms: Some(500),
            }
        );
    }

    #[test]
    fn test_parse_check() {
        let cli = Cli::try_parse_from(["sonde", "check", "suite.json", "--seeds", "seeds.json"])
            .unwrap();
        let Commands::Check(args) = cli.command else {
            unreachable!("expected check");
        };
        assert_eq!(args.seeds, Some(PathBuf::from("seeds.json")));
    }
}
