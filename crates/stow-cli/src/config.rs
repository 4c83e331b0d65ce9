//! # Configuration File
//!
//! Optional YAML file passed with the global `--config` flag:
//!
//! ```yaml
//! reference: reference/imo-chart.yaml
//! format: json
//! unique_problems: false
//! ```
//!
//! Relative paths are resolved against the directory holding the config
//! file. Command-line flags override every value set here.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Output format for analysis results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Human-readable problem list.
    #[default]
    Text,
    /// JSON report with grid snapshot, result, and summary.
    Json,
}

/// Values loaded from the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StowConfig {
    /// Default reference document.
    #[serde(default)]
    pub reference: Option<PathBuf>,
    /// Default output format.
    #[serde(default)]
    pub format: Option<OutputFormat>,
    /// Report one problem per tank pair instead of one per direction.
    #[serde(default)]
    pub unique_problems: bool,
}

impl StowConfig {
    /// Load a config file and resolve its relative paths.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let mut config: Self = serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        if let (Some(reference), Some(dir)) = (config.reference.as_mut(), path.parent()) {
            if reference.is_relative() {
                *reference = dir.join(&*reference);
            }
        }
        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    /// Load `path` if given, otherwise use defaults.
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }
}
