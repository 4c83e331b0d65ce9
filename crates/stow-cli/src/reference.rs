//! # Check-Reference Subcommand
//!
//! Load a reference document and report what ingestion skipped or ignored,
//! plus every condition under which analysis would silently degrade.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use stow_pack::{IngestReport, ReferenceDataWarning};

use crate::config::StowConfig;

/// Arguments for the check-reference subcommand.
#[derive(Args, Debug)]
pub struct CheckReferenceArgs {
    /// Reference data document (YAML or JSON).
    #[arg(long)]
    pub reference: Option<PathBuf>,

    /// Exit non-zero on warnings as well as on skipped records.
    #[arg(long)]
    pub strict: bool,
}

/// Execute the check-reference subcommand.
///
/// Exits `1` when records were skipped, or when `--strict` is set and any
/// warning was raised.
pub fn run_check_reference(args: &CheckReferenceArgs, config: &StowConfig) -> Result<u8> {
    let path = crate::reference_path(args.reference.as_deref(), config)?;
    let (reference, report) = crate::load_reference(&path)?;
    let warnings = reference.warnings();

    print!("{}", render(&report, &warnings));

    let failed = !report.skipped.is_empty() || (args.strict && !warnings.is_empty());
    Ok(u8::from(failed))
}

fn render(report: &IngestReport, warnings: &[ReferenceDataWarning]) -> String {
    let mut lines = vec![
        format!("  chemicals:               {}", report.chemicals),
        format!("  chart rows:              {}", report.chart_rows),
        format!("  compatible overrides:    {}", report.compatible_overrides),
        format!("  incompatible overrides:  {}", report.incompatible_overrides),
    ];
    for skipped in &report.skipped {
        lines.push(format!("  skipped: {}", skipped.reason));
    }
    for cell in &report.ignored_cells {
        lines.push(format!("  ignored {cell}"));
    }
    for warning in warnings {
        lines.push(format!("  warning: {warning}"));
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
