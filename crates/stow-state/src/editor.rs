//! # Plan Editor
//!
//! Owns the tank grid and applies operator edits to it.
//!
//! ## Edit Semantics
//!
//! - `assign(position, name)` re-resolves `name` through the chemical index
//!   on every call. The tank stores the record's canonical name and group.
//! - A blank name unloads the tank.
//! - A name that resolves to nothing is rejected with
//!   [`AssignmentError::ChemicalNotFound`] echoing the name. The tank keeps
//!   whatever it held before.
//! - `resize` to new dimensions rebuilds the grid; every tank is reset.

use stow_core::{AssignmentError, GridDimensions, GridError, TankPosition};
use stow_pack::ChemicalIndex;

use crate::grid::TankGrid;
use crate::tank::Tank;

/// Editor for one stowage plan.
#[derive(Debug, Clone)]
pub struct PlanEditor<'a> {
    index: &'a ChemicalIndex,
    grid: TankGrid,
}

impl<'a> PlanEditor<'a> {
    /// Start a plan with an empty grid of the given dimensions.
    pub fn new(index: &'a ChemicalIndex, dimensions: GridDimensions) -> Self {
        Self {
            index,
            grid: TankGrid::new(dimensions),
        }
    }

    /// Change grid dimensions.
    ///
    /// When the dimensions differ from the current ones, the grid is
    /// recreated and all tank contents are discarded. Requesting the current
    /// dimensions leaves the grid untouched.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), GridError> {
        let dimensions = GridDimensions::new(width, height)?;
        if dimensions != self.grid.dimensions() {
            tracing::info!(from = %self.grid.dimensions(), to = %dimensions, "recreating tank grid");
            self.grid = TankGrid::new(dimensions);
        }
        Ok(())
    }

    /// Assign a chemical to a tank by operator-entered name.
    pub fn assign(&mut self, position: TankPosition, raw_name: &str) -> Result<&Tank, AssignmentError> {
        if raw_name.trim().is_empty() {
            return Ok(self.clear(position)?);
        }
        let tank = self.grid.tank_mut(position)?;
        let Some(record) = self.index.resolve(raw_name) else {
            tracing::warn!(%position, name = raw_name, "assignment rejected: chemical not found");
            return Err(AssignmentError::ChemicalNotFound {
                name: raw_name.to_string(),
            });
        };
        tracing::debug!(%position, query = raw_name, resolved = %record.name, "tank assigned");
        *tank = Tank::loaded(position, record);
        Ok(tank)
    }

    /// Unload a tank.
    pub fn clear(&mut self, position: TankPosition) -> Result<&Tank, GridError> {
        let tank = self.grid.tank_mut(position)?;
        *tank = Tank::unloaded(position);
        Ok(tank)
    }

    /// The current grid.
    pub fn grid(&self) -> &TankGrid {
        &self.grid
    }

    /// A consistent copy of the grid for analysis.
    pub fn snapshot(&self) -> TankGrid {
        self.grid.clone()
    }

    /// The chemical index used for resolution.
    pub fn index(&self) -> &ChemicalIndex {
        self.index
    }
}
