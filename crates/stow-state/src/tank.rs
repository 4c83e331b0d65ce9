//! # Tank

use serde::{Deserialize, Serialize};

use stow_core::{ReactivityGroup, TankPosition};
use stow_pack::ChemicalRecord;

/// A single cargo tank slot.
///
/// A tank is loaded iff its chemical name is non-blank. An unloaded tank
/// never carries a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tank {
    /// Where the tank sits on the grid.
    pub position: TankPosition,
    /// Canonical name of the stowed chemical; empty when unloaded.
    pub chemical_name: String,
    /// Resolved reactivity group, if loaded and classified.
    pub group: Option<ReactivityGroup>,
}

impl Tank {
    /// An empty tank.
    pub fn unloaded(position: TankPosition) -> Self {
        Self {
            position,
            chemical_name: String::new(),
            group: None,
        }
    }

    /// A tank loaded with a resolved chemical.
    pub fn loaded(position: TankPosition, record: &ChemicalRecord) -> Self {
        Self {
            position,
            chemical_name: record.name.clone(),
            group: record.group,
        }
    }

    /// Whether the tank holds a chemical.
    pub fn is_loaded(&self) -> bool {
        !self.chemical_name.trim().is_empty()
    }
}
