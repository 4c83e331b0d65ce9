//! # stow-pack — Reference Data
//!
//! The four reference tables that drive compatibility determination, held
//! as immutable in-memory structures:
//!
//! - **Chemical index** (`chemicals.rs`): known chemicals and their reactivity
//!   groups, with first-match name resolution.
//!
//! - **Compatibility matrix** (`matrix.rs`): directional group-by-group
//!   flags built from the reactivity chart.
//!
//! - **Exception registry** (`exceptions.rs`): chemical-level overrides that
//!   force a pair compatible or incompatible regardless of the matrix.
//!
//! - **Ingestion** (`ingest.rs`): raw record shapes as handed over by the
//!   spreadsheet/file loaders, defensive conversion that skips unusable
//!   records, and the [`ReferenceData`] bundle.
//!
//! ## Crate Policy
//!
//! - Depends only on `stow-core` internally.
//! - Tables are built once and never mutated afterwards. Every lookup takes
//!   `&self`.
//! - A bad record never fails a whole load. It is skipped, logged, and
//!   counted in the [`IngestReport`].

pub mod chemicals;
pub mod exceptions;
pub mod ingest;
pub mod matrix;

pub use chemicals::{normalize_name, ChemicalIndex, ChemicalRecord};
pub use exceptions::{
    CompatibleOverride, ExceptionOutcome, ExceptionRegistry, GroupSet, IncompatibleOverride,
};
pub use ingest::{
    IngestReport, RawChartRow, RawChemical, RawCompatiblePair, RawGroup, RawGroupSet,
    RawIncompatibleRecord, RawReferenceData, RawText, ReferenceData, ReferenceDataWarning,
    SkippedRecord,
};
pub use matrix::{ChartRow, CompatibilityMatrix};
