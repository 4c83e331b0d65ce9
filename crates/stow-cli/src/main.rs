//! # stow CLI entry point
//!
//! Parses command-line arguments, initialises logging, loads the optional
//! config file, and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use stow_cli::analyze::{run_analyze, AnalyzeArgs};
use stow_cli::config::StowConfig;
use stow_cli::lookup::{run_lookup, LookupArgs};
use stow_cli::reference::{run_check_reference, CheckReferenceArgs};

/// Stowage compatibility checker.
///
/// Flags adjacent cargo tanks whose chemicals are reactively incompatible,
/// using a reactivity-group chart and exception lists.
#[derive(Parser, Debug)]
#[command(name = "stow", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit log lines as JSON.
    #[arg(long, global = true)]
    json_logs: bool,

    /// Path to configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check a stowage plan for incompatible adjacent tanks.
    Analyze(AnalyzeArgs),

    /// Resolve a chemical name against the reference index.
    Lookup(LookupArgs),

    /// Report skipped records and warnings for a reference document.
    CheckReference(CheckReferenceArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.json_logs {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let config = match StowConfig::load_optional(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(1);
        }
    };

    let result = match cli.command {
        Commands::Analyze(args) => run_analyze(&args, &config),
        Commands::Lookup(args) => run_lookup(&args, &config),
        Commands::CheckReference(args) => run_check_reference(&args, &config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stow_cli::config::OutputFormat;

    #[test]
    fn cli_parse_analyze() {
        let cli = Cli::try_parse_from([
            "stow",
            "analyze",
            "--reference",
            "ref.yaml",
            "--plan",
            "plan.yaml",
            "--format",
            "json",
            "--unique",
        ])
        .unwrap();
        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.reference, Some(PathBuf::from("ref.yaml")));
        assert_eq!(args.plan, PathBuf::from("plan.yaml"));
        assert_eq!(args.format, Some(OutputFormat::Json));
        assert!(args.unique);
    }

    #[test]
    fn cli_parse_analyze_requires_plan() {
        assert!(Cli::try_parse_from(["stow", "analyze", "--reference", "ref.yaml"]).is_err());
    }

    #[test]
    fn cli_parse_analyze_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["stow", "analyze", "--plan", "p.yaml", "--format", "pdf"]).is_err());
    }

    #[test]
    fn cli_parse_lookup() {
        let cli = Cli::try_parse_from(["stow", "lookup", "acetic acid"]).unwrap();
        let Commands::Lookup(args) = cli.command else {
            panic!("expected lookup");
        };
        assert_eq!(args.name, "acetic acid");
        assert!(args.reference.is_none());
    }

    #[test]
    fn cli_parse_check_reference() {
        let cli = Cli::try_parse_from(["stow", "check-reference", "--reference", "r.json", "--strict"]).unwrap();
        let Commands::CheckReference(args) = cli.command else {
            panic!("expected check-reference");
        };
        assert_eq!(args.reference, Some(PathBuf::from("r.json")));
        assert!(args.strict);
    }

    #[test]
    fn cli_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["stow", "lookup", "x", "-vv", "--config", "stow.yaml", "--json-logs"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.json_logs);
        assert_eq!(cli.config, Some(PathBuf::from("stow.yaml")));
    }

    #[test]
    fn cli_verify_command() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
