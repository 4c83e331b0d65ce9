//! # Analyze Subcommand
//!
//! Load reference data and a stowage plan, replay the plan through the
//! editor, run one analysis pass, and print the result.
//!
//! ## Exit Codes
//!
//! - `0`: no problems.
//! - `2`: at least one incompatible adjacency.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use stow_engine::CompatibilityEngine;

use crate::config::{OutputFormat, StowConfig};
use crate::plan::StowagePlan;
use crate::report::AnalysisReport;

/// Exit code when problems were found.
pub const EXIT_PROBLEMS: u8 = 2;

/// Arguments for the analyze subcommand.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Stowage plan (YAML or JSON).
    #[arg(long)]
    pub plan: PathBuf,

    /// Reference data document (YAML or JSON).
    #[arg(long)]
    pub reference: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Report one problem per tank pair instead of one per direction.
    #[arg(long)]
    pub unique: bool,
}

/// Execute the analyze subcommand.
pub fn run_analyze(args: &AnalyzeArgs, config: &StowConfig) -> Result<u8> {
    let reference_path = crate::reference_path(args.reference.as_deref(), config)?;
    let (reference, _) = crate::load_reference(&reference_path)?;

    let plan = StowagePlan::load(&args.plan)?;
    let (editor, rejected) = plan
        .apply(reference.index())
        .with_context(|| format!("invalid plan: {}", args.plan.display()))?;
    for entry in &rejected {
        tracing::warn!(position = %entry.position, chemical = %entry.chemical, reason = %entry.reason, "plan entry rejected");
    }

    let grid = editor.snapshot();
    let result = CompatibilityEngine::from_reference(&reference).analyze(&grid);

    let unique = args.unique || config.unique_problems;
    let report = AnalysisReport::new(&grid, &result, unique, &rejected, reference.warnings());

    match args.format.or(config.format).unwrap_or_default() {
        OutputFormat::Text => print!("{}", report.to_text()),
        OutputFormat::Json => println!("{}", report.to_json().context("failed to serialize report")?),
    }

    Ok(if result.is_clear() { 0 } else { EXIT_PROBLEMS })
}
