//! # Relationship Classification
//!
//! The states a pair of adjacent loaded tanks can end up in, and the rule
//! that combines the matrix result with the exception outcome.

use std::fmt;

use serde::{Deserialize, Serialize};

use stow_pack::ExceptionOutcome;

/// Group-level result from the compatibility matrix alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseClassification {
    /// The matrix does not flag the group pair.
    Compatible,
    /// The matrix flags the group pair.
    Incompatible,
}

impl BaseClassification {
    /// Base classification from a matrix lookup.
    pub fn from_flag(flagged: bool) -> Self {
        if flagged {
            Self::Incompatible
        } else {
            Self::Compatible
        }
    }
}

/// Final classification of a tank relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Not flagged by the matrix, no overriding exception.
    Compatible,
    /// Flagged by the matrix, no overriding exception.
    Incompatible,
    /// Flagged by the matrix, cleared by a compatible override.
    CompatibleException,
    /// Not flagged by the matrix, forced by an incompatible override.
    IncompatibleException,
}

impl Classification {
    /// Combine a base classification with an exception outcome.
    ///
    /// Only an exception that disagrees with the base changes the result.
    pub fn resolve(base: BaseClassification, exception: ExceptionOutcome) -> Self {
        match (base, exception) {
            (BaseClassification::Incompatible, ExceptionOutcome::CompatibleException) => {
                Self::CompatibleException
            }
            (BaseClassification::Compatible, ExceptionOutcome::IncompatibleException) => {
                Self::IncompatibleException
            }
            (BaseClassification::Compatible, _) => Self::Compatible,
            (BaseClassification::Incompatible, _) => Self::Incompatible,
        }
    }

    /// Whether this is any flavour of incompatible, i.e. a reportable problem.
    pub fn is_incompatible(self) -> bool {
        matches!(self, Self::Incompatible | Self::IncompatibleException)
    }

    /// Whether an exception overrode the matrix.
    pub fn is_exception(self) -> bool {
        matches!(self, Self::CompatibleException | Self::IncompatibleException)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compatible => write!(f, "compatible"),
            Self::Incompatible => write!(f, "incompatible"),
            Self::CompatibleException => write!(f, "compatible_exception"),
            Self::IncompatibleException => write!(f, "incompatible_exception"),
        }
    }
}

/// One directional relationship between a tank and an adjacent tank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Matrix-only result.
    pub base: BaseClassification,
    /// Exception registry outcome, whether or not it changed the result.
    pub exception: ExceptionOutcome,
    /// Result after exception resolution.
    #[serde(rename = "final")]
    pub final_classification: Classification,
}

impl Relationship {
    /// Build a relationship, resolving the final classification.
    pub fn new(base: BaseClassification, exception: ExceptionOutcome) -> Self {
        Self {
            base,
            exception,
            final_classification: Classification::resolve(base, exception),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use super::BaseClassification::{Compatible as BaseOk, Incompatible as BaseBad};

    #[test]
    fn resolution_table() {
        let cases = [
            (BaseOk, ExceptionOutcome::None, Classification::Compatible),
            (BaseBad, ExceptionOutcome::None, Classification::Incompatible),
            (BaseBad, ExceptionOutcome::CompatibleException, Classification::CompatibleException),
            (BaseOk, ExceptionOutcome::IncompatibleException, Classification::IncompatibleException),
            // Exceptions agreeing with the base are no-ops.
            (BaseOk, ExceptionOutcome::CompatibleException, Classification::Compatible),
            (BaseBad, ExceptionOutcome::IncompatibleException, Classification::Incompatible),
        ];
        for (base, exception, expected) in cases {
            assert_eq!(
                Classification::resolve(base, exception),
                expected,
                "base={base:?} exception={exception:?}"
            );
        }
    }

    #[test]
    fn incompatible_flavours() {
        assert!(Classification::Incompatible.is_incompatible());
        assert!(Classification::IncompatibleException.is_incompatible());
        assert!(!Classification::Compatible.is_incompatible());
        assert!(!Classification::CompatibleException.is_incompatible());
    }

    #[test]
    fn exception_flavours() {
        assert!(Classification::CompatibleException.is_exception());
        assert!(Classification::IncompatibleException.is_exception());
        assert!(!Classification::Incompatible.is_exception());
    }

    #[test]
    fn relationship_keeps_redundant_exception_but_not_in_final() {
        let r = Relationship::new(BaseOk, ExceptionOutcome::CompatibleException);
        assert_eq!(r.exception, ExceptionOutcome::CompatibleException);
        assert_eq!(r.final_classification, Classification::Compatible);
    }

    #[test]
    fn relationship_serializes_final_field() {
        let r = Relationship::new(BaseBad, ExceptionOutcome::None);
        let json = serde_json::to_value(r).unwrap();
        assert_eq!(json["base"], "incompatible");
        assert_eq!(json["exception"], "none");
        assert_eq!(json["final"], "incompatible");
    }

    #[test]
    fn base_from_flag() {
        assert_eq!(BaseClassification::from_flag(true), BaseBad);
        assert_eq!(BaseClassification::from_flag(false), BaseOk);
    }
}
