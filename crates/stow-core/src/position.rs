//! # Tank Positions and Grid Dimensions
//!
//! A cargo tank is addressed by `(row, column)`, both zero-based. Grid
//! extents are bounded to the range an operator can edit: 2–8 tanks wide
//! and 4–12 tanks long.
//!
//! ## Adjacency
//!
//! Two tanks are adjacent when their cells touch at an edge or a corner
//! (the 8-connected Moore neighbourhood). Neighbourhoods are clipped to the
//! grid; there is no wraparound and a tank is never its own neighbour.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// Zero-based `(row, column)` address of a tank.
///
/// Orders row-major: by row, then by column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TankPosition {
    /// Row index, `0..height`.
    pub row: usize,
    /// Column index, `0..width`.
    pub column: usize,
}

impl TankPosition {
    /// Create a position from a row and column.
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl fmt::Display for TankPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Validated width and height of a tank grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDimensions")]
pub struct GridDimensions {
    width: usize,
    height: usize,
}

#[derive(Deserialize)]
struct RawDimensions {
    width: usize,
    height: usize,
}

impl TryFrom<RawDimensions> for GridDimensions {
    type Error = GridError;

    fn try_from(raw: RawDimensions) -> Result<Self, Self::Error> {
        Self::new(raw.width, raw.height)
    }
}

impl GridDimensions {
    /// Narrowest editable grid.
    pub const MIN_WIDTH: usize = 2;
    /// Widest editable grid.
    pub const MAX_WIDTH: usize = 8;
    /// Shortest editable grid.
    pub const MIN_HEIGHT: usize = 4;
    /// Longest editable grid.
    pub const MAX_HEIGHT: usize = 12;

    /// Create dimensions, rejecting values outside the editable range.
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        check_axis("width", width, Self::MIN_WIDTH, Self::MAX_WIDTH)?;
        check_axis("height", height, Self::MIN_HEIGHT, Self::MAX_HEIGHT)?;
        Ok(Self { width, height })
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of tank slots.
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Whether `position` addresses a tank on this grid.
    pub fn contains(&self, position: TankPosition) -> bool {
        position.row < self.height && position.column < self.width
    }

    /// Return `position` unchanged if it is on the grid.
    pub fn check(&self, position: TankPosition) -> Result<TankPosition, GridError> {
        if self.contains(position) {
            Ok(position)
        } else {
            Err(GridError::PositionOutOfBounds {
                position,
                dimensions: *self,
            })
        }
    }

    /// Every position on the grid in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = TankPosition> + '_ {
        (0..self.height)
            .flat_map(move |row| (0..self.width).map(move |column| TankPosition::new(row, column)))
    }

    /// Moore neighbourhood of `position`, clipped to the grid, row-major.
    ///
    /// Returns an empty list for positions that are off the grid.
    pub fn neighbours(&self, position: TankPosition) -> Vec<TankPosition> {
        if !self.contains(position) {
            return Vec::new();
        }
        let rows = position.row.saturating_sub(1)..=(position.row + 1).min(self.height - 1);
        let mut out = Vec::with_capacity(8);
        for row in rows {
            let columns =
                position.column.saturating_sub(1)..=(position.column + 1).min(self.width - 1);
            for column in columns {
                let candidate = TankPosition::new(row, column);
                if candidate != position {
                    out.push(candidate);
                }
            }
        }
        out
    }
}

impl fmt::Display for GridDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

fn check_axis(axis: &'static str, value: usize, min: usize, max: usize) -> Result<(), GridError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(GridError::DimensionOutOfRange {
            axis,
            value,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(width: usize, height: usize) -> GridDimensions {
        GridDimensions::new(width, height).unwrap()
    }

    #[test]
    fn rejects_out_of_range_dimensions() {
        assert!(matches!(
            GridDimensions::new(1, 8),
            Err(GridError::DimensionOutOfRange { axis: "width", value: 1, .. })
        ));
        assert!(matches!(
            GridDimensions::new(9, 8),
            Err(GridError::DimensionOutOfRange { axis: "width", .. })
        ));
        assert!(matches!(
            GridDimensions::new(4, 3),
            Err(GridError::DimensionOutOfRange { axis: "height", .. })
        ));
        assert!(matches!(
            GridDimensions::new(4, 13),
            Err(GridError::DimensionOutOfRange { axis: "height", .. })
        ));
    }

    #[test]
    fn accepts_range_edges() {
        assert!(GridDimensions::new(2, 4).is_ok());
        assert!(GridDimensions::new(8, 12).is_ok());
    }

    #[test]
    fn corner_has_three_neighbours() {
        let grid = dims(4, 8);
        let corner = grid.neighbours(TankPosition::new(0, 0));
        assert_eq!(
            corner,
            vec![
                TankPosition::new(0, 1),
                TankPosition::new(1, 0),
                TankPosition::new(1, 1),
            ]
        );
        assert_eq!(grid.neighbours(TankPosition::new(7, 3)).len(), 3);
    }

    #[test]
    fn interior_has_eight_neighbours() {
        let grid = dims(4, 8);
        let n = grid.neighbours(TankPosition::new(3, 2));
        assert_eq!(n.len(), 8);
        assert!(!n.contains(&TankPosition::new(3, 2)));
    }

    #[test]
    fn edge_has_five_neighbours() {
        let grid = dims(4, 8);
        assert_eq!(grid.neighbours(TankPosition::new(0, 2)).len(), 5);
        assert_eq!(grid.neighbours(TankPosition::new(4, 0)).len(), 5);
    }

    #[test]
    fn no_wraparound() {
        let grid = dims(4, 8);
        let n = grid.neighbours(TankPosition::new(0, 3));
        assert!(!n.iter().any(|p| p.column == 0));
        assert!(!n.iter().any(|p| p.row == 7));
    }

    #[test]
    fn off_grid_position_has_no_neighbours() {
        assert!(dims(4, 8).neighbours(TankPosition::new(8, 0)).is_empty());
    }

    #[test]
    fn positions_are_row_major_and_complete() {
        let grid = dims(2, 4);
        let all: Vec<_> = grid.positions().collect();
        assert_eq!(all.len(), grid.cell_count());
        assert_eq!(all[0], TankPosition::new(0, 0));
        assert_eq!(all[1], TankPosition::new(0, 1));
        assert_eq!(all[2], TankPosition::new(1, 0));
        let mut sorted = all.clone();
        sorted.sort();
        assert_eq!(all, sorted);
    }

    #[test]
    fn check_rejects_off_grid() {
        let grid = dims(4, 8);
        assert!(grid.check(TankPosition::new(7, 3)).is_ok());
        assert_eq!(
            grid.check(TankPosition::new(0, 4)),
            Err(GridError::PositionOutOfBounds {
                position: TankPosition::new(0, 4),
                dimensions: grid,
            })
        );
    }

    #[test]
    fn deserialization_validates_range() {
        let ok: GridDimensions = serde_json::from_str(r#"{"width":4,"height":8}"#).unwrap();
        assert_eq!(ok.to_string(), "4x8");
        let bad = serde_json::from_str::<GridDimensions>(r#"{"width":20,"height":8}"#);
        assert!(bad.is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn grid_and_position() -> impl Strategy<Value = (GridDimensions, TankPosition)> {
        (
            GridDimensions::MIN_WIDTH..=GridDimensions::MAX_WIDTH,
            GridDimensions::MIN_HEIGHT..=GridDimensions::MAX_HEIGHT,
        )
            .prop_flat_map(|(w, h)| {
                (Just(w), Just(h), 0..h, 0..w)
            })
            .prop_map(|(w, h, row, column)| {
                (
                    GridDimensions::new(w, h).unwrap(),
                    TankPosition::new(row, column),
                )
            })
    }

    proptest! {
        /// Neighbours stay on the grid, exclude the cell itself, and touch it.
        #[test]
        fn neighbours_are_clipped_moore_cells((grid, pos) in grid_and_position()) {
            let n = grid.neighbours(pos);
            prop_assert!(n.len() >= 3 && n.len() <= 8);
            for p in &n {
                prop_assert!(grid.contains(*p));
                prop_assert_ne!(*p, pos);
                prop_assert!(p.row.abs_diff(pos.row) <= 1);
                prop_assert!(p.column.abs_diff(pos.column) <= 1);
            }
        }

        /// Adjacency is symmetric.
        #[test]
        fn adjacency_is_symmetric((grid, pos) in grid_and_position()) {
            for p in grid.neighbours(pos) {
                prop_assert!(grid.neighbours(p).contains(&pos));
            }
        }
    }
}
