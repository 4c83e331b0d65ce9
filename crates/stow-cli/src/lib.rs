//! # stow-cli — Stowage Compatibility CLI
//!
//! Provides the `stow` command-line interface over the engine crates.
//!
//! ## Subcommands
//!
//! - `stow analyze`: Load reference data and a stowage plan, run one
//!   analysis pass, print the problem list or a JSON report.
//! - `stow lookup`: Resolve a chemical name against the index.
//! - `stow check-reference`: Report skipped records and degraded-analysis
//!   warnings for a reference document.
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in `main.rs`; handlers here return an exit code.
//! - Handlers delegate to the domain crates. No classification logic here.

pub mod analyze;
pub mod config;
pub mod lookup;
pub mod plan;
pub mod reference;
pub mod report;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use stow_pack::{IngestReport, ReferenceData};

use crate::config::StowConfig;

/// Pick the reference document: the explicit flag wins over the config file.
pub fn reference_path(flag: Option<&Path>, config: &StowConfig) -> Result<PathBuf> {
    flag.map(Path::to_path_buf)
        .or_else(|| config.reference.clone())
        .context("no reference data given; pass --reference or set `reference` in the config file")
}

/// Load reference data and log every degraded-analysis warning.
pub fn load_reference(path: &Path) -> Result<(ReferenceData, IngestReport)> {
    let (data, report) = ReferenceData::load(path)
        .with_context(|| format!("failed to load reference data: {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        chemicals = report.chemicals,
        skipped = report.skipped.len(),
        "reference data loaded"
    );
    for warning in data.warnings() {
        tracing::warn!(%warning, "reference data is incomplete");
    }
    Ok((data, report))
}
