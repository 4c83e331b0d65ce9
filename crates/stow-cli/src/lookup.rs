//! # Lookup Subcommand
//!
//! Resolve a name the way the plan editor would and print the record.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use stow_pack::ChemicalRecord;

use crate::config::StowConfig;

/// Arguments for the lookup subcommand.
#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Chemical name or fragment.
    pub name: String,

    /// Reference data document (YAML or JSON).
    #[arg(long)]
    pub reference: Option<PathBuf>,
}

/// Execute the lookup subcommand. Exits `1` when the name does not resolve.
pub fn run_lookup(args: &LookupArgs, config: &StowConfig) -> Result<u8> {
    let path = crate::reference_path(args.reference.as_deref(), config)?;
    let (reference, _) = crate::load_reference(&path)?;

    match reference.index().resolve(&args.name) {
        Some(record) => {
            println!("{}", describe(record));
            Ok(0)
        }
        None => {
            println!("chemical not found: '{}'", args.name);
            Ok(1)
        }
    }
}

fn describe(record: &ChemicalRecord) -> String {
    let group = record
        .group
        .map_or_else(|| "unknown".to_string(), |g| g.to_string());
    match &record.footnote {
        Some(note) => format!("{} (group {group}) [{note}]", record.name),
        None => format!("{} (group {group})", record.name),
    }
}
