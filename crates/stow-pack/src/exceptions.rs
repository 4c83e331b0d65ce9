//! # Exception Registry
//!
//! Chemical-level overrides layered on top of the compatibility matrix.
//!
//! - A [`CompatibleOverride`] declares an unordered pair of chemicals
//!   mutually safe, whatever their groups say.
//! - An [`IncompatibleOverride`] names one chemical and a set of groups. It
//!   applies to an evaluated pair when either member is the named chemical
//!   and either member's group is in the set.
//!
//! Compatible overrides are consulted first and win over incompatible ones
//! regardless of declaration order.
//!
//! ## Malformed Records
//!
//! An incompatible override whose group set could not be parsed is kept as
//! [`GroupSet::Malformed`]. It never matches; evaluation moves on to the
//! remaining overrides.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use stow_core::{ReactivityGroup, ReferenceDataError};

use crate::chemicals::normalize_name;

// ---------------------------------------------------------------------------
// ExceptionOutcome
// ---------------------------------------------------------------------------

/// Result of checking a chemical pair against the exception registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExceptionOutcome {
    /// A compatible override covers the pair.
    CompatibleException,
    /// An incompatible override covers the pair.
    IncompatibleException,
    /// No override applies.
    None,
}

impl fmt::Display for ExceptionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CompatibleException => write!(f, "compatible_exception"),
            Self::IncompatibleException => write!(f, "incompatible_exception"),
            Self::None => write!(f, "none"),
        }
    }
}

// ---------------------------------------------------------------------------
// Override records
// ---------------------------------------------------------------------------

/// Unordered pair of chemicals declared mutually safe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibleOverride {
    /// First chemical name.
    pub chemical_a: String,
    /// Second chemical name.
    pub chemical_b: String,
}

impl CompatibleOverride {
    /// Create an override for the pair.
    pub fn new(chemical_a: impl Into<String>, chemical_b: impl Into<String>) -> Self {
        Self {
            chemical_a: chemical_a.into(),
            chemical_b: chemical_b.into(),
        }
    }
}

/// Group set of an incompatible override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupSet {
    /// Parsed reactivity groups.
    Groups(BTreeSet<ReactivityGroup>),
    /// Source data that could not be parsed. Never matches.
    Malformed {
        /// The group data as it appeared in the source.
        raw: String,
    },
}

impl GroupSet {
    /// Parse a group list such as `"1, 4 7"`.
    ///
    /// Tokens are separated by commas, semicolons, or whitespace. A single
    /// non-numeric token makes the whole set malformed.
    pub fn parse(raw: &str) -> Self {
        let tokens = raw
            .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
            .filter(|t| !t.is_empty());
        let mut groups = BTreeSet::new();
        for token in tokens {
            match token.parse::<ReactivityGroup>() {
                Ok(group) => {
                    groups.insert(group);
                }
                Err(_) => {
                    return Self::Malformed {
                        raw: raw.to_string(),
                    }
                }
            }
        }
        Self::Groups(groups)
    }

    /// Whether the set contains either group. Malformed sets contain nothing.
    fn contains_any(&self, g1: ReactivityGroup, g2: ReactivityGroup) -> bool {
        match self {
            Self::Groups(groups) => groups.contains(&g1) || groups.contains(&g2),
            Self::Malformed { .. } => false,
        }
    }
}

/// A chemical forced incompatible with a set of groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncompatibleOverride {
    /// Chemical the override applies to.
    pub chemical: String,
    /// Groups the chemical is forced incompatible with.
    pub groups: GroupSet,
}

impl IncompatibleOverride {
    /// Create an override from parsed groups.
    pub fn new(chemical: impl Into<String>, groups: impl IntoIterator<Item = ReactivityGroup>) -> Self {
        Self {
            chemical: chemical.into(),
            groups: GroupSet::Groups(groups.into_iter().collect()),
        }
    }

    /// Create an override from raw group-set text.
    pub fn parse(chemical: impl Into<String>, raw_groups: &str) -> Self {
        Self {
            chemical: chemical.into(),
            groups: GroupSet::parse(raw_groups),
        }
    }

    /// The recoverable error describing this record, if its group set is malformed.
    pub fn malformed_error(&self) -> Option<ReferenceDataError> {
        match &self.groups {
            GroupSet::Malformed { raw } => Some(ReferenceDataError::MalformedGroupSet {
                chemical: self.chemical.clone(),
                raw: raw.clone(),
            }),
            GroupSet::Groups(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ExceptionRegistry
// ---------------------------------------------------------------------------

/// Both override lists, in declaration order.
///
/// Chemical names are normalized once here; `compatible_names[i]` and
/// `incompatible_names[i]` belong to the override at the same index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExceptionRegistry {
    compatible: Vec<CompatibleOverride>,
    incompatible: Vec<IncompatibleOverride>,
    compatible_names: Vec<(String, String)>,
    incompatible_names: Vec<String>,
}

impl ExceptionRegistry {
    /// Create a registry from both override lists.
    pub fn new(compatible: Vec<CompatibleOverride>, incompatible: Vec<IncompatibleOverride>) -> Self {
        let compatible_names = compatible
            .iter()
            .map(|o| (normalize_name(&o.chemical_a), normalize_name(&o.chemical_b)))
            .collect();
        let incompatible_names = incompatible
            .iter()
            .map(|o| normalize_name(&o.chemical))
            .collect();
        Self {
            compatible,
            incompatible,
            compatible_names,
            incompatible_names,
        }
    }

    /// Classify a chemical pair against the overrides.
    ///
    /// Chemical names compare case-insensitively after trimming. Returns
    /// [`ExceptionOutcome::None`] when either name is empty or either group
    /// is unknown.
    pub fn classify_exception(
        &self,
        chem1: &str,
        group1: Option<ReactivityGroup>,
        chem2: &str,
        group2: Option<ReactivityGroup>,
    ) -> ExceptionOutcome {
        let chem1 = normalize_name(chem1);
        let chem2 = normalize_name(chem2);
        let (Some(group1), Some(group2)) = (group1, group2) else {
            return ExceptionOutcome::None;
        };
        if chem1.is_empty() || chem2.is_empty() {
            return ExceptionOutcome::None;
        }

        if self
            .compatible_names
            .iter()
            .any(|(a, b)| (*a == chem1 && *b == chem2) || (*a == chem2 && *b == chem1))
        {
            return ExceptionOutcome::CompatibleException;
        }

        if self
            .incompatible
            .iter()
            .zip(&self.incompatible_names)
            .any(|(o, name)| (*name == chem1 || *name == chem2) && o.groups.contains_any(group1, group2))
        {
            return ExceptionOutcome::IncompatibleException;
        }

        ExceptionOutcome::None
    }

    /// Compatible overrides in declaration order.
    pub fn compatible_overrides(&self) -> &[CompatibleOverride] {
        &self.compatible
    }

    /// Incompatible overrides in declaration order.
    pub fn incompatible_overrides(&self) -> &[IncompatibleOverride] {
        &self.incompatible
    }

    /// Incompatible overrides whose group set is malformed.
    pub fn malformed_overrides(&self) -> impl Iterator<Item = &IncompatibleOverride> {
        self.incompatible
            .iter()
            .filter(|o| matches!(o.groups, GroupSet::Malformed { .. }))
    }

    /// Whether both lists are empty.
    pub fn is_empty(&self) -> bool {
        self.compatible.is_empty() && self.incompatible.is_empty()
    }
}
