//! # Stowage Plan Files
//!
//! A plan lists grid dimensions and the chemical entered for each tank:
//!
//! ```yaml
//! width: 4
//! height: 8
//! tanks:
//!   - { row: 0, column: 0, chemical: Acetic Acid }
//!   - { row: 0, column: 1, chemical: ammonia }
//! ```
//!
//! Applying a plan replays each entry through the [`PlanEditor`], exactly as
//! an operator typing into the grid would. Entries the editor rejects are
//! collected and reported; they do not stop the remaining entries.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use stow_core::{GridDimensions, TankPosition};
use stow_pack::ChemicalIndex;
use stow_state::PlanEditor;

/// A stowage plan as read from disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StowagePlan {
    /// Tanks across.
    pub width: usize,
    /// Tanks along.
    pub height: usize,
    /// Entered chemicals.
    #[serde(default)]
    pub tanks: Vec<PlannedTank>,
}

/// One entry of a stowage plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedTank {
    /// Row index.
    pub row: usize,
    /// Column index.
    pub column: usize,
    /// Chemical name as entered; blank leaves the tank empty.
    #[serde(default)]
    pub chemical: String,
}

/// A plan entry the editor refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedEntry {
    /// Tank the entry addressed.
    pub position: TankPosition,
    /// Name as entered.
    pub chemical: String,
    /// Why it was refused.
    pub reason: String,
}

impl StowagePlan {
    /// Read a YAML or JSON plan, choosing the format by extension.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read plan: {}", path.display()))?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let plan = match extension.as_deref() {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&text)
                .with_context(|| format!("failed to parse plan: {}", path.display()))?,
            Some("json") => serde_json::from_str(&text)
                .with_context(|| format!("failed to parse plan: {}", path.display()))?,
            _ => bail!("unsupported plan format: {}", path.display()),
        };
        Ok(plan)
    }

    /// Replay the plan through an editor.
    ///
    /// Invalid dimensions fail the whole plan. Individual entries that the
    /// editor rejects are returned alongside the editor.
    pub fn apply<'a>(&self, index: &'a ChemicalIndex) -> Result<(PlanEditor<'a>, Vec<RejectedEntry>)> {
        let dimensions = GridDimensions::new(self.width, self.height)
            .context("plan dimensions are out of range")?;
        let mut editor = PlanEditor::new(index, dimensions);
        let mut rejected = Vec::new();
        for entry in &self.tanks {
            let position = TankPosition::new(entry.row, entry.column);
            if let Err(e) = editor.assign(position, &entry.chemical) {
                rejected.push(RejectedEntry {
                    position,
                    chemical: entry.chemical.clone(),
                    reason: e.to_string(),
                });
            }
        }
        Ok((editor, rejected))
    }
}
