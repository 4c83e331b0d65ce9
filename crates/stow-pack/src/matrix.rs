//! # Compatibility Matrix
//!
//! Directional group-by-group flag table built from the reactivity chart.
//!
//! Each chart row declares a source group and the candidate groups it is
//! flagged against. Building the matrix records `(source, candidate)` for
//! every flagged candidate and nothing else: `(candidate, source)` is only
//! present if the chart declares it in the candidate's own row.
//!
//! Lookups follow the same direction. `is_flagged(a, b)` consults the entry
//! `(a, b)` only. Published charts are usually symmetric, but the matrix
//! never back-fills the reverse direction on its own.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use stow_core::ReactivityGroup;

/// One row of the reactivity chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartRow {
    /// The group this row declares.
    pub group: ReactivityGroup,
    /// Groups marked as flagged in this row.
    pub flagged: BTreeSet<ReactivityGroup>,
}

impl ChartRow {
    /// Create a chart row.
    pub fn new(group: ReactivityGroup, flagged: impl IntoIterator<Item = ReactivityGroup>) -> Self {
        Self {
            group,
            flagged: flagged.into_iter().collect(),
        }
    }
}

/// Directional incompatibility flags between reactivity groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompatibilityMatrix {
    flagged: BTreeMap<ReactivityGroup, BTreeSet<ReactivityGroup>>,
}

impl CompatibilityMatrix {
    /// Create an empty matrix. Nothing is flagged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the matrix from chart rows.
    ///
    /// Rows declaring the same group accumulate.
    pub fn from_chart(rows: impl IntoIterator<Item = ChartRow>) -> Self {
        let mut matrix = Self::new();
        for row in rows {
            for candidate in row.flagged {
                matrix.flag(row.group, candidate);
            }
        }
        matrix
    }

    /// Record `(source, candidate)` as flagged.
    pub fn flag(&mut self, source: ReactivityGroup, candidate: ReactivityGroup) {
        self.flagged.entry(source).or_default().insert(candidate);
    }

    /// Whether the directional entry `(g1, g2)` is flagged.
    ///
    /// Always `false` when either group is unknown.
    pub fn is_flagged(&self, g1: Option<ReactivityGroup>, g2: Option<ReactivityGroup>) -> bool {
        match (g1, g2) {
            (Some(a), Some(b)) => self.flagged.get(&a).is_some_and(|row| row.contains(&b)),
            _ => false,
        }
    }

    /// Groups flagged in the row declared for `group`.
    pub fn flagged_against(&self, group: ReactivityGroup) -> impl Iterator<Item = ReactivityGroup> + '_ {
        self.flagged.get(&group).into_iter().flatten().copied()
    }

    /// Number of flagged directional entries.
    pub fn len(&self) -> usize {
        self.flagged.values().map(BTreeSet::len).sum()
    }

    /// Whether no entry is flagged.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Directional entries whose reverse is not flagged, in `(source, candidate)` order.
    ///
    /// Useful at the ingestion boundary to surface charts that are not
    /// symmetric. The lookup itself is unaffected.
    pub fn asymmetric_entries(&self) -> Vec<(ReactivityGroup, ReactivityGroup)> {
        self.flagged
            .iter()
            .flat_map(|(&source, row)| row.iter().map(move |&candidate| (source, candidate)))
            .filter(|&(source, candidate)| !self.is_flagged(Some(candidate), Some(source)))
            .collect()
    }
}
