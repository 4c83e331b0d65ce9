//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types used throughout the stowage stack. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Editing errors echo the attempted input (chemical name, position) so the
//!   editor can show the operator exactly what was rejected.
//! - Reference-data errors carry the table and record index of the offending
//!   record. They are recoverable: loaders skip the record and continue.
//! - Nothing in the analysis pass returns an error. Malformed inputs are
//!   excluded from evaluation instead.

use thiserror::Error;

use crate::position::{GridDimensions, TankPosition};

/// Error in grid construction or tank addressing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// A grid dimension lies outside the editable range.
    #[error("{axis} {value} is outside the allowed range {min}..={max}")]
    DimensionOutOfRange {
        /// Which dimension was rejected ("width" or "height").
        axis: &'static str,
        /// The requested value.
        value: usize,
        /// Smallest accepted value.
        min: usize,
        /// Largest accepted value.
        max: usize,
    },

    /// A position does not address a tank on the current grid.
    #[error("position {position} is outside a {dimensions} grid")]
    PositionOutOfBounds {
        /// The requested position.
        position: TankPosition,
        /// Dimensions of the grid that was addressed.
        dimensions: GridDimensions,
    },
}

/// Error raised when an operator edit cannot be applied to a tank.
///
/// The tank keeps its previous contents whenever this error is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssignmentError {
    /// The entered name resolves to no record in the chemical index.
    #[error("chemical not found: '{name}'")]
    ChemicalNotFound {
        /// The name exactly as the operator entered it.
        name: String,
    },

    /// The edit addressed a position outside the grid.
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Error in reference data ingestion.
#[derive(Error, Debug)]
pub enum ReferenceDataError {
    /// A record is missing a field it cannot be used without.
    #[error("{table} record #{index} is missing required field '{field}'")]
    MissingField {
        /// Reference table the record belongs to.
        table: &'static str,
        /// Zero-based record index within the table.
        index: usize,
        /// Name of the missing field.
        field: &'static str,
    },

    /// A record field holds a value of the wrong kind.
    #[error("{table} record #{index} has an invalid '{field}': {raw}")]
    InvalidField {
        /// Reference table the record belongs to.
        table: &'static str,
        /// Zero-based record index within the table.
        index: usize,
        /// Name of the offending field.
        field: &'static str,
        /// The value as it appeared in the source data.
        raw: String,
    },

    /// A group token is not a reactivity group number.
    #[error("invalid reactivity group '{raw}'")]
    InvalidGroup {
        /// The token as it appeared in the source data.
        raw: String,
    },

    /// An incompatible-override record carries an unparsable group set.
    #[error("malformed group set '{raw}' for chemical '{chemical}'")]
    MalformedGroupSet {
        /// Chemical named by the override.
        chemical: String,
        /// The group set as it appeared in the source data.
        raw: String,
    },

    /// The reference document could not be parsed.
    #[error("failed to parse {format} reference data: {message}")]
    Parse {
        /// Document format ("yaml" or "json").
        format: &'static str,
        /// Parser diagnostic.
        message: String,
    },

    /// The reference file extension maps to no supported format.
    #[error("unsupported reference data format: {path}")]
    UnsupportedFormat {
        /// Path of the rejected file.
        path: String,
    },

    /// IO error while reading reference data.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
