//! # stow-core — Foundational Types for the Stowage Compatibility Stack
//!
//! This crate is the leaf of the workspace DAG. It defines the primitives
//! that every other crate shares: reactivity groups, tank positions, grid
//! dimensions, and the structured error hierarchy.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** A reactivity group is a
//!    `ReactivityGroup`, never a bare integer. An unclassified chemical has
//!    `Option::<ReactivityGroup>::None`, so "unknown" cannot be confused with
//!    a real group number.
//!
//! 2. **Validated dimensions.** `GridDimensions` can only be constructed
//!    inside the editable range, so every grid built from it satisfies the
//!    one-tank-per-position invariant over a sane extent.
//!
//! 3. **Row-major ordering.** `TankPosition` orders by row then column. Every
//!    map keyed by position iterates deterministically, which keeps repeated
//!    analysis passes byte-for-byte reproducible.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `stow-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod group;
pub mod position;

// Re-export primary types for ergonomic imports.
pub use error::{AssignmentError, GridError, ReferenceDataError};
pub use group::ReactivityGroup;
pub use position::{GridDimensions, TankPosition};
