//! # Tank Grid
//!
//! Rectangular array of tanks. Every position inside the dimensions holds
//! exactly one [`Tank`], created unloaded when the grid is built.

use serde::Serialize;

use stow_core::{GridDimensions, GridError, TankPosition};

use crate::tank::Tank;

/// Rectangular array of tank slots, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TankGrid {
    dimensions: GridDimensions,
    tanks: Vec<Tank>,
}

impl TankGrid {
    /// Create a grid of unloaded tanks.
    pub fn new(dimensions: GridDimensions) -> Self {
        let tanks = dimensions.positions().map(Tank::unloaded).collect();
        Self { dimensions, tanks }
    }

    /// Grid dimensions.
    pub fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// The tank at `position`, if it is on the grid.
    pub fn tank(&self, position: TankPosition) -> Option<&Tank> {
        self.slot(position).and_then(|i| self.tanks.get(i))
    }

    pub(crate) fn tank_mut(&mut self, position: TankPosition) -> Result<&mut Tank, GridError> {
        let dimensions = self.dimensions;
        self.slot(position)
            .and_then(|i| self.tanks.get_mut(i))
            .ok_or(GridError::PositionOutOfBounds {
                position,
                dimensions,
            })
    }

    /// Positions adjacent to `position` (8-connected, clipped, row-major).
    pub fn adjacent_positions(&self, position: TankPosition) -> Vec<TankPosition> {
        self.dimensions.neighbours(position)
    }

    /// All tanks in row-major order.
    pub fn tanks(&self) -> &[Tank] {
        &self.tanks
    }

    /// Loaded tanks in row-major order.
    pub fn loaded_tanks(&self) -> impl Iterator<Item = &Tank> {
        self.tanks.iter().filter(|t| t.is_loaded())
    }

    fn slot(&self, position: TankPosition) -> Option<usize> {
        self.dimensions
            .contains(position)
            .then(|| position.row * self.dimensions.width() + position.column)
    }
}
