//! # stow-engine — Compatibility Determination
//!
//! A full-grid pass over a [`TankGrid`](stow_state::TankGrid) that
//! classifies every pair of adjacent loaded tanks and collects the
//! incompatible ones into a problem list.
//!
//! ## Classification Model
//!
//! ```text
//! base      = matrix.is_flagged(T.group, A.group) ? Incompatible : Compatible
//! exception = registry.classify_exception(T, A)
//!
//! final = CompatibleException    if exception = compatible   and base = Incompatible
//!       = IncompatibleException  if exception = incompatible and base = Compatible
//!       = base                   otherwise
//! ```
//!
//! An exception that agrees with the base result is recorded on the
//! relationship but does not change the final classification.
//!
//! ## Pass Semantics
//!
//! - Pure: `(grid, matrix, registry) → AnalysisResult`, no I/O, no shared state.
//! - Every loaded tank is scanned independently, so each adjacency is
//!   evaluated from both ends and a flagged pair yields two problems.
//!   [`AnalysisResult::unique_problems`] is the explicit opt-in for one
//!   problem per pair.
//! - Tanks with no group are scanned but always classify `Compatible`.

pub mod analysis;
pub mod classification;

pub use analysis::{analyze, AnalysisResult, AnalysisSummary, CompatibilityEngine, Problem};
pub use classification::{BaseClassification, Classification, Relationship};
