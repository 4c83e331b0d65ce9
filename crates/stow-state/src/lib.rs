//! # stow-state — Tank Grid State
//!
//! Holds the mutable half of a stowage plan:
//!
//! - **Tank** (`tank.rs`): one slot, loaded with a resolved chemical or empty.
//!
//! - **Grid** (`grid.rs`): the rectangular array of tanks and its
//!   8-connected adjacency.
//!
//! - **Editor** (`editor.rs`): the only component that mutates a grid. Every
//!   assignment is re-resolved through the chemical index, and unresolved
//!   names are rejected with the prior tank contents intact.
//!
//! ## Design
//!
//! Reference tables are never touched here. The editor borrows the chemical
//! index read-only and hands analysis a cloned [`TankGrid`] snapshot, so a
//! pass can never observe a half-applied edit.

pub mod editor;
pub mod grid;
pub mod tank;

pub use editor::PlanEditor;
pub use grid::TankGrid;
pub use tank::Tank;
