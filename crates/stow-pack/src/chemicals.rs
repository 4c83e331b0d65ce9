//! # Chemical Index
//!
//! Lookup table from chemical names to [`ChemicalRecord`]s.
//!
//! ## Resolution Order
//!
//! Names are compared case-insensitively after trimming. A query resolves to:
//!
//! 1. the first record, in load order, whose name equals the query; else
//! 2. the first record, in load order, whose name contains the query.
//!
//! There is no ranking. A short query may resolve to an unrelated record
//! that happens to be loaded first. Compliance reports must stay
//! reproducible against the same reference data, so this order is fixed.

use serde::{Deserialize, Serialize};

use stow_core::ReactivityGroup;

/// A known chemical and its reactivity classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChemicalRecord {
    /// Canonical display name.
    pub name: String,
    /// Reactivity group, or `None` if the chemical is unclassified.
    pub group: Option<ReactivityGroup>,
    /// Optional footnote carried over from the reference list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footnote: Option<String>,
}

impl ChemicalRecord {
    /// Create a record.
    pub fn new(
        name: impl Into<String>,
        group: Option<ReactivityGroup>,
        footnote: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            group,
            footnote,
        }
    }
}

/// Normalize a chemical name for comparison: trimmed and lowercased.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Ordered index of known chemicals.
#[derive(Debug, Clone, Default)]
pub struct ChemicalIndex {
    records: Vec<ChemicalRecord>,
    normalized: Vec<String>,
}

impl ChemicalIndex {
    /// Build an index. Record order is preserved and defines resolution order.
    pub fn new(records: Vec<ChemicalRecord>) -> Self {
        let normalized = records.iter().map(|r| normalize_name(&r.name)).collect();
        Self {
            records,
            normalized,
        }
    }

    /// Resolve an operator-entered name.
    ///
    /// Returns `None` for empty or whitespace-only input and for names that
    /// match no record.
    pub fn resolve(&self, query: &str) -> Option<&ChemicalRecord> {
        let needle = normalize_name(query);
        if needle.is_empty() {
            return None;
        }
        let position = self
            .normalized
            .iter()
            .position(|name| *name == needle)
            .or_else(|| self.normalized.iter().position(|name| name.contains(&needle)))?;
        self.records.get(position)
    }

    /// Records in load order.
    pub fn records(&self) -> &[ChemicalRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the index holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
