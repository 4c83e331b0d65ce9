//! # Reference Data Ingestion
//!
//! Converts the raw tables handed over by the file/spreadsheet loaders into
//! the immutable [`ReferenceData`] bundle.
//!
//! ## Raw Shapes
//!
//! ```yaml
//! chemicals:
//!   - { name: Acetic Acid, group: 4, footnote: "see note 2" }
//!   - { name: Mystery Oil, group: unknown }
//! chart:
//!   - { group: 1, flagged: [2, 3] }
//! compatible_exceptions:
//!   - { chemical_a: Acetic Acid, chemical_b: Ammonia }
//! incompatible_exceptions:
//!   - { chemical: Acetic Acid, groups: "1, 5" }
//! ```
//!
//! ## Defensive Conversion
//!
//! A record that cannot be used (missing name, chart row without a group,
//! pair with an empty side) is skipped, logged at `warn`, and listed in the
//! [`IngestReport`] with a structured reason. Group tokens that are not
//! numbers are treated as "unknown" for chemicals and dropped for chart
//! cells. Incompatible overrides with unparsable group sets are kept but
//! never match; an empty group set skips the record.
//!
//! No cell type fails the whole document. Every cell shape deserializes,
//! and wrongly typed cells are handled per record like any other bad value.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use stow_core::{ReactivityGroup, ReferenceDataError};

use crate::chemicals::{ChemicalIndex, ChemicalRecord};
use crate::exceptions::{CompatibleOverride, ExceptionRegistry, GroupSet, IncompatibleOverride};
use crate::matrix::{ChartRow, CompatibilityMatrix};

// ---------------------------------------------------------------------------
// Raw record shapes
// ---------------------------------------------------------------------------

/// A group cell as it appears in source data: a number or free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawGroup {
    /// Numeric cell.
    Number(i64),
    /// Numeric cell exported as a float (`3.0`).
    Float(f64),
    /// Text cell (numeric text, "unknown", or garbage).
    Text(String),
    /// Any other cell (boolean, list, map, null).
    Other(serde_yaml::Value),
}

impl RawGroup {
    /// Interpret the cell as an optional reactivity group.
    pub fn to_group(&self) -> Result<Option<ReactivityGroup>, ReferenceDataError> {
        match self {
            Self::Number(n) => u16::try_from(*n)
                .map(|n| Some(ReactivityGroup(n)))
                .map_err(|_| ReferenceDataError::InvalidGroup { raw: n.to_string() }),
            Self::Float(x) if x.fract() == 0.0 && (0.0..=f64::from(u16::MAX)).contains(x) => {
                Ok(Some(ReactivityGroup(*x as u16)))
            }
            Self::Float(x) => Err(ReferenceDataError::InvalidGroup { raw: x.to_string() }),
            Self::Text(text) => ReactivityGroup::parse_optional(text),
            Self::Other(serde_yaml::Value::Null) => Ok(None),
            Self::Other(value) => Err(ReferenceDataError::InvalidGroup {
                raw: describe_value(value),
            }),
        }
    }
}

impl fmt::Display for RawGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(text) => write!(f, "{text}"),
            Self::Other(value) => write!(f, "{}", describe_value(value)),
        }
    }
}

/// A name or note cell: text, a number, or something unusable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawText {
    /// Text cell.
    Text(String),
    /// Numeric cell, taken verbatim as text.
    Number(serde_yaml::Number),
    /// Any other cell (boolean, list, map).
    Other(serde_yaml::Value),
}

impl RawText {
    /// The trimmed text of the cell, or the cell rendered for diagnostics.
    pub fn into_text(self) -> Result<String, String> {
        match self {
            Self::Text(text) => Ok(text.trim().to_string()),
            Self::Number(n) => Ok(n.to_string()),
            Self::Other(value) => Err(describe_value(&value)),
        }
    }
}

fn describe_value(value: &serde_yaml::Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("{value:?}"))
}

/// Group set of an incompatible-override record: a list or one delimited cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawGroupSet {
    /// List of group cells.
    List(Vec<RawGroup>),
    /// A single cell, possibly holding a delimited list.
    Single(RawGroup),
}

impl RawGroupSet {
    fn to_group_set(&self) -> GroupSet {
        match self {
            Self::Single(RawGroup::Text(text)) => GroupSet::parse(text),
            Self::Single(cell) => Self::List(vec![cell.clone()]).to_group_set(),
            Self::List(cells) => {
                let parsed: Result<Vec<_>, _> = cells
                    .iter()
                    .map(|cell| match cell.to_group() {
                        Ok(Some(group)) => Ok(group),
                        _ => Err(()),
                    })
                    .collect();
                match parsed {
                    Ok(groups) => GroupSet::Groups(groups.into_iter().collect()),
                    Err(()) => GroupSet::Malformed {
                        raw: cells
                            .iter()
                            .map(ToString::to_string)
                            .collect::<Vec<_>>()
                            .join(", "),
                    },
                }
            }
        }
    }
}

/// Chemical list entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawChemical {
    /// Display name.
    #[serde(default)]
    pub name: Option<RawText>,
    /// Reactivity group cell.
    #[serde(default)]
    pub group: Option<RawGroup>,
    /// Footnote cell.
    #[serde(default)]
    pub footnote: Option<RawText>,
}

/// Reactivity chart row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawChartRow {
    /// Group the row declares.
    #[serde(default)]
    pub group: Option<RawGroup>,
    /// Columns marked as flagged in this row.
    #[serde(default)]
    pub flagged: Vec<RawGroup>,
}

/// Compatible-override pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCompatiblePair {
    /// First chemical.
    #[serde(default)]
    pub chemical_a: Option<RawText>,
    /// Second chemical.
    #[serde(default)]
    pub chemical_b: Option<RawText>,
}

/// Incompatible-override record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawIncompatibleRecord {
    /// Named chemical.
    #[serde(default)]
    pub chemical: Option<RawText>,
    /// Groups the chemical is forced incompatible with.
    #[serde(default)]
    pub groups: Option<RawGroupSet>,
}

/// The four reference tables before conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawReferenceData {
    /// Chemical list.
    #[serde(default)]
    pub chemicals: Vec<RawChemical>,
    /// Reactivity chart rows.
    #[serde(default)]
    pub chart: Vec<RawChartRow>,
    /// Compatible-override pairs.
    #[serde(default)]
    pub compatible_exceptions: Vec<RawCompatiblePair>,
    /// Incompatible-override records.
    #[serde(default)]
    pub incompatible_exceptions: Vec<RawIncompatibleRecord>,
}

// ---------------------------------------------------------------------------
// IngestReport
// ---------------------------------------------------------------------------

/// A record left out of the converted tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRecord {
    /// Table the record came from.
    pub table: String,
    /// Zero-based index within the table.
    pub index: usize,
    /// Why it was skipped.
    pub reason: String,
}

/// Outcome of converting raw reference tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    /// Chemicals loaded into the index.
    pub chemicals: usize,
    /// Chart rows applied to the matrix.
    pub chart_rows: usize,
    /// Compatible overrides loaded.
    pub compatible_overrides: usize,
    /// Incompatible overrides loaded, malformed ones included.
    pub incompatible_overrides: usize,
    /// Records that were dropped.
    pub skipped: Vec<SkippedRecord>,
    /// Individual cells that were ignored or downgraded to "unknown".
    pub ignored_cells: Vec<String>,
}

impl IngestReport {
    fn skip(&mut self, table: &'static str, index: usize, error: ReferenceDataError) {
        tracing::warn!(table, index, %error, "skipping reference record");
        self.skipped.push(SkippedRecord {
            table: table.to_string(),
            index,
            reason: error.to_string(),
        });
    }

    fn skip_missing(&mut self, table: &'static str, index: usize, field: &'static str) {
        self.skip(table, index, ReferenceDataError::MissingField { table, index, field });
    }

    fn skip_invalid(&mut self, table: &'static str, index: usize, field: &'static str, raw: impl fmt::Display) {
        self.skip(
            table,
            index,
            ReferenceDataError::InvalidField {
                table,
                index,
                field,
                raw: raw.to_string(),
            },
        );
    }

    fn ignore_cell(&mut self, table: &'static str, index: usize, reason: impl fmt::Display) {
        tracing::warn!(table, index, %reason, "ignoring reference cell");
        self.ignored_cells
            .push(format!("{table} record #{index}: {reason}"));
    }
}

// ---------------------------------------------------------------------------
// ReferenceDataWarning
// ---------------------------------------------------------------------------

/// Conditions under which analysis silently degrades.
///
/// The engine still runs with incomplete reference data; these warnings
/// exist so that callers can tell the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ReferenceDataWarning {
    /// No chemicals: no tank can be loaded.
    EmptyChemicalIndex,
    /// No matrix entries: nothing is flagged by group.
    EmptyMatrix,
    /// Neither override list has entries.
    NoOverrides,
    /// Incompatible overrides that can never match.
    MalformedOverrides {
        /// Number of malformed records.
        count: usize,
    },
    /// Matrix entries whose reverse direction is not flagged.
    AsymmetricMatrix {
        /// Number of one-directional entries.
        entries: usize,
    },
}

impl fmt::Display for ReferenceDataWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyChemicalIndex => write!(f, "chemical index is empty"),
            Self::EmptyMatrix => {
                write!(f, "compatibility matrix is empty; no group pair can be flagged")
            }
            Self::NoOverrides => write!(f, "no exception overrides loaded"),
            Self::MalformedOverrides { count } => {
                write!(f, "{count} incompatible override(s) have malformed group sets and never match")
            }
            Self::AsymmetricMatrix { entries } => write!(
                f,
                "{entries} matrix entries are flagged in one direction only"
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// ReferenceData
// ---------------------------------------------------------------------------

/// Immutable bundle of the loaded reference tables.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    index: ChemicalIndex,
    matrix: CompatibilityMatrix,
    registry: ExceptionRegistry,
}

impl ReferenceData {
    /// Bundle already-built tables.
    pub fn new(index: ChemicalIndex, matrix: CompatibilityMatrix, registry: ExceptionRegistry) -> Self {
        Self {
            index,
            matrix,
            registry,
        }
    }

    /// Convert raw tables, skipping unusable records.
    pub fn from_raw(raw: RawReferenceData) -> (Self, IngestReport) {
        let mut report = IngestReport::default();

        let mut records = Vec::with_capacity(raw.chemicals.len());
        for (i, chem) in raw.chemicals.into_iter().enumerate() {
            let name = match required_text(chem.name, "chemicals", i, "name") {
                Ok(name) => name,
                Err(e) => {
                    report.skip("chemicals", i, e);
                    continue;
                }
            };
            let group = match chem.group.as_ref().map(RawGroup::to_group).transpose() {
                Ok(group) => group.flatten(),
                Err(e) => {
                    report.ignore_cell("chemicals", i, format!("{e}; treating '{name}' as unclassified"));
                    None
                }
            };
            let footnote = match chem.footnote.map(RawText::into_text) {
                Some(Ok(note)) if !note.is_empty() => Some(note),
                Some(Err(raw)) => {
                    report.ignore_cell("chemicals", i, format!("footnote {raw} is not text"));
                    None
                }
                _ => None,
            };
            records.push(ChemicalRecord::new(name, group, footnote));
        }
        report.chemicals = records.len();

        let mut rows = Vec::with_capacity(raw.chart.len());
        for (i, row) in raw.chart.into_iter().enumerate() {
            let Some(cell) = row.group.as_ref() else {
                report.skip_missing("chart", i, "group");
                continue;
            };
            let group = match cell.to_group() {
                Ok(Some(group)) => group,
                Ok(None) => {
                    report.skip_missing("chart", i, "group");
                    continue;
                }
                Err(_) => {
                    report.skip_invalid("chart", i, "group", cell);
                    continue;
                }
            };
            let mut flagged = Vec::with_capacity(row.flagged.len());
            for cell in &row.flagged {
                match cell.to_group() {
                    Ok(Some(candidate)) => flagged.push(candidate),
                    Ok(None) => {}
                    Err(e) => report.ignore_cell("chart", i, e),
                }
            }
            rows.push(ChartRow::new(group, flagged));
        }
        report.chart_rows = rows.len();

        let mut compatible = Vec::with_capacity(raw.compatible_exceptions.len());
        for (i, pair) in raw.compatible_exceptions.into_iter().enumerate() {
            let table = "compatible_exceptions";
            let names = required_text(pair.chemical_a, table, i, "chemical_a")
                .and_then(|a| required_text(pair.chemical_b, table, i, "chemical_b").map(|b| (a, b)));
            match names {
                Ok((a, b)) => compatible.push(CompatibleOverride::new(a, b)),
                Err(e) => report.skip(table, i, e),
            }
        }
        report.compatible_overrides = compatible.len();

        let mut incompatible = Vec::with_capacity(raw.incompatible_exceptions.len());
        for (i, record) in raw.incompatible_exceptions.into_iter().enumerate() {
            let chemical = match required_text(record.chemical, "incompatible_exceptions", i, "chemical") {
                Ok(chemical) => chemical,
                Err(e) => {
                    report.skip("incompatible_exceptions", i, e);
                    continue;
                }
            };
            let groups = match record.groups.as_ref().map(RawGroupSet::to_group_set) {
                Some(GroupSet::Groups(groups)) if groups.is_empty() => None,
                other => other,
            };
            let Some(groups) = groups else {
                report.skip_missing("incompatible_exceptions", i, "groups");
                continue;
            };
            let entry = IncompatibleOverride { chemical, groups };
            if let Some(e) = entry.malformed_error() {
                tracing::warn!(index = i, error = %e, "incompatible override will never match");
            }
            incompatible.push(entry);
        }
        report.incompatible_overrides = incompatible.len();

        let data = Self::new(
            ChemicalIndex::new(records),
            CompatibilityMatrix::from_chart(rows),
            ExceptionRegistry::new(compatible, incompatible),
        );
        tracing::debug!(
            chemicals = report.chemicals,
            chart_rows = report.chart_rows,
            compatible = report.compatible_overrides,
            incompatible = report.incompatible_overrides,
            skipped = report.skipped.len(),
            "reference data converted"
        );
        (data, report)
    }

    /// Parse and convert a YAML reference document.
    pub fn from_yaml_str(input: &str) -> Result<(Self, IngestReport), ReferenceDataError> {
        let raw: RawReferenceData =
            serde_yaml::from_str(input).map_err(|e| ReferenceDataError::Parse {
                format: "yaml",
                message: e.to_string(),
            })?;
        Ok(Self::from_raw(raw))
    }

    /// Parse and convert a JSON reference document.
    pub fn from_json_str(input: &str) -> Result<(Self, IngestReport), ReferenceDataError> {
        let raw: RawReferenceData =
            serde_json::from_str(input).map_err(|e| ReferenceDataError::Parse {
                format: "json",
                message: e.to_string(),
            })?;
        Ok(Self::from_raw(raw))
    }

    /// Load a reference document, choosing the format by file extension.
    pub fn load(path: &Path) -> Result<(Self, IngestReport), ReferenceDataError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let parse: fn(&str) -> Result<(Self, IngestReport), ReferenceDataError> =
            match extension.as_deref() {
                Some("yaml") | Some("yml") => Self::from_yaml_str,
                Some("json") => Self::from_json_str,
                _ => {
                    return Err(ReferenceDataError::UnsupportedFormat {
                        path: path.display().to_string(),
                    })
                }
            };
        let input = std::fs::read_to_string(path)?;
        parse(&input)
    }

    /// The chemical index.
    pub fn index(&self) -> &ChemicalIndex {
        &self.index
    }

    /// The compatibility matrix.
    pub fn matrix(&self) -> &CompatibilityMatrix {
        &self.matrix
    }

    /// The exception registry.
    pub fn registry(&self) -> &ExceptionRegistry {
        &self.registry
    }

    /// Degraded-analysis conditions present in this reference data.
    pub fn warnings(&self) -> Vec<ReferenceDataWarning> {
        let mut warnings = Vec::new();
        if self.index.is_empty() {
            warnings.push(ReferenceDataWarning::EmptyChemicalIndex);
        }
        if self.matrix.is_empty() {
            warnings.push(ReferenceDataWarning::EmptyMatrix);
        }
        if self.registry.is_empty() {
            warnings.push(ReferenceDataWarning::NoOverrides);
        }
        let malformed = self.registry.malformed_overrides().count();
        if malformed > 0 {
            warnings.push(ReferenceDataWarning::MalformedOverrides { count: malformed });
        }
        let asymmetric = self.matrix.asymmetric_entries().len();
        if asymmetric > 0 {
            warnings.push(ReferenceDataWarning::AsymmetricMatrix { entries: asymmetric });
        }
        warnings
    }
}

/// A mandatory text field: blank counts as missing, non-text as invalid.
fn required_text(
    value: Option<RawText>,
    table: &'static str,
    index: usize,
    field: &'static str,
) -> Result<String, ReferenceDataError> {
    match value.map(RawText::into_text) {
        Some(Ok(text)) if !text.is_empty() => Ok(text),
        Some(Err(raw)) => Err(ReferenceDataError::InvalidField {
            table,
            index,
            field,
            raw,
        }),
        _ => Err(ReferenceDataError::MissingField {
            table,
            index,
            field,
        }),
    }
}
