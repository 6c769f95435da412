//! Fairquant - FAIR Cyber-Risk Quantification
//!
//! Quantifies inherent and residual annualized loss exposure for batches of
//! risks described in TOML scenario files.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{QuantifyCommand, ValuateCommand};
use fairquant_observability::{init_logging, LogFormat};
use tracing::Level;

#[derive(Debug, Parser)]
#[command(name = "fairquant", version, about = "FAIR cyber-risk quantification")]
struct Cli {
    /// Log output format (pretty, json, compact)
    #[arg(long, global = true, env = "LOG_FORMAT", default_value = "pretty")]
    log_format: LogFormat,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Quantify every risk in a scenario file
    Quantify(QuantifyCommand),
    /// Value a single cost-module for one incident
    Valuate(ValuateCommand),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    init_logging(cli.log_format, level);

    match &cli.command {
        Command::Quantify(cmd) => cmd.run(),
        Command::Valuate(cmd) => cmd.run(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_quantify() {
        let cli = Cli::parse_from([
            "fairquant",
            "--log-format",
            "json",
            "quantify",
            "risks.toml",
            "--sampled",
            "--seed",
            "42",
        ]);
        assert_eq!(cli.log_format, LogFormat::Json);
        match cli.command {
            Command::Quantify(cmd) => {
                assert!(cmd.sampled);
                assert_eq!(cmd.seed, Some(42));
                assert_eq!(cmd.scenario_file.to_str(), Some("risks.toml"));
            }
            other => panic!("expected quantify, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_valuate() {
        let cli = Cli::parse_from([
            "fairquant",
            "valuate",
            "--cost-type",
            "per_hour",
            "--factor",
            "50",
            "--hours",
            "4",
            "-v",
        ]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Valuate(_)));
    }
}
