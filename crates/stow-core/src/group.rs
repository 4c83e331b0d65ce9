//! # Reactivity Groups
//!
//! A reactivity group is the integer hazard category a chemical belongs to.
//! Group numbers drive every compatibility matrix lookup and every
//! incompatible-override match.
//!
//! Unclassified chemicals carry no group at all (`Option::None`). Nothing in
//! this crate invents a sentinel number for "unknown".

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ReferenceDataError;

/// Reactivity group number of a classified chemical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReactivityGroup(pub u16);

impl ReactivityGroup {
    /// Create a group from its number.
    pub fn new(number: u16) -> Self {
        Self(number)
    }

    /// The group number.
    pub fn number(self) -> u16 {
        self.0
    }

    /// Parse an optional group token from reference data.
    ///
    /// Empty tokens and the literal `unknown` (any case) map to `None`.
    /// Any other token must be a non-negative integer; a trailing `.0` from
    /// spreadsheet exports is accepted.
    pub fn parse_optional(raw: &str) -> Result<Option<Self>, ReferenceDataError> {
        let token = raw.trim();
        if token.is_empty() || token.eq_ignore_ascii_case("unknown") {
            return Ok(None);
        }
        token.parse().map(Some)
    }
}

impl FromStr for ReactivityGroup {
    type Err = ReferenceDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        let digits = token.strip_suffix(".0").unwrap_or(token);
        digits
            .parse::<u16>()
            .map(Self)
            .map_err(|_| ReferenceDataError::InvalidGroup {
                raw: s.to_string(),
            })
    }
}

impl From<u16> for ReactivityGroup {
    fn from(number: u16) -> Self {
        Self(number)
    }
}

impl fmt::Display for ReactivityGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
