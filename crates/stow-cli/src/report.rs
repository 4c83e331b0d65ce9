//! # Analysis Report
//!
//! Point-in-time artifact combining the grid snapshot an analysis pass ran
//! on with its result. The engine never serializes; this module does.

use std::fmt::Write as _;

use serde::Serialize;

use stow_engine::{AnalysisResult, AnalysisSummary, Problem};
use stow_pack::ReferenceDataWarning;
use stow_state::TankGrid;

use crate::plan::RejectedEntry;

/// Everything one `stow analyze` run produced.
#[derive(Debug, Serialize)]
pub struct AnalysisReport<'a> {
    /// The grid the pass ran on.
    pub grid: &'a TankGrid,
    /// The full pass result, duplicated directional problems included.
    pub result: &'a AnalysisResult,
    /// Counts over the result.
    pub summary: AnalysisSummary,
    /// One problem per tank pair, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_problems: Option<Vec<Problem>>,
    /// Plan entries the editor refused.
    pub rejected_entries: &'a [RejectedEntry],
    /// Degraded-analysis warnings for the reference data used.
    pub reference_warnings: Vec<ReferenceDataWarning>,
}

impl<'a> AnalysisReport<'a> {
    /// Assemble a report.
    pub fn new(
        grid: &'a TankGrid,
        result: &'a AnalysisResult,
        unique: bool,
        rejected_entries: &'a [RejectedEntry],
        reference_warnings: Vec<ReferenceDataWarning>,
    ) -> Self {
        Self {
            grid,
            result,
            summary: result.summary(),
            unique_problems: unique.then(|| result.unique_problems()),
            rejected_entries,
            reference_warnings,
        }
    }

    /// Problems to display: the unique view when requested, else every direction.
    pub fn problems(&self) -> &[Problem] {
        self.unique_problems
            .as_deref()
            .unwrap_or(&self.result.problems)
    }

    /// Render as pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Render as a plain-text listing.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Grid {}: {} loaded tank(s), {} relationship(s) evaluated",
            self.grid.dimensions(),
            self.summary.loaded_tanks,
            self.summary.relationships
        );

        for warning in &self.reference_warnings {
            let _ = writeln!(out, "warning: {warning}");
        }

        if !self.rejected_entries.is_empty() {
            let _ = writeln!(out, "Rejected entries ({}):", self.rejected_entries.len());
            for entry in self.rejected_entries {
                let _ = writeln!(out, "  {} '{}': {}", entry.position, entry.chemical, entry.reason);
            }
        }

        let problems = self.problems();
        if problems.is_empty() {
            let _ = writeln!(out, "No problems found.");
        } else {
            let _ = writeln!(out, "Problems ({}):", problems.len());
            for p in problems {
                let _ = writeln!(
                    out,
                    "  {} {} <-> {} {} [{}]",
                    p.tank, p.chemical, p.neighbour, p.neighbour_chemical, p.classification
                );
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stow_core::{GridDimensions, ReactivityGroup, TankPosition};
    use stow_engine::analyze;
    use stow_pack::{ChartRow, ChemicalIndex, ChemicalRecord, CompatibilityMatrix, ExceptionRegistry};
    use stow_state::PlanEditor;

    fn scenario() -> (TankGrid, AnalysisResult) {
        let idx = ChemicalIndex::new(vec![
            ChemicalRecord::new("Acid X", Some(ReactivityGroup(1)), None),
            ChemicalRecord::new("Base Y", Some(ReactivityGroup(2)), None),
        ]);
        let mut editor = PlanEditor::new(&idx, GridDimensions::new(4, 8).unwrap());
        editor.assign(TankPosition::new(0, 0), "Acid X").unwrap();
        editor.assign(TankPosition::new(0, 1), "Base Y").unwrap();
        let grid = editor.snapshot();
        let matrix = CompatibilityMatrix::from_chart(vec![
            ChartRow::new(ReactivityGroup(1), [ReactivityGroup(2)]),
            ChartRow::new(ReactivityGroup(2), [ReactivityGroup(1)]),
        ]);
        let result = analyze(&grid, &matrix, &ExceptionRegistry::default());
        (grid, result)
    }

    #[test]
    fn text_lists_every_directional_problem_by_default() {
        let (grid, result) = scenario();
        let report = AnalysisReport::new(&grid, &result, false, &[], vec![]);
        let text = report.to_text();
        assert!(text.starts_with("Grid 4x8: 2 loaded tank(s), 2 relationship(s) evaluated"));
        assert!(text.contains("Problems (2):"));
        assert!(text.contains("(0, 0) Acid X <-> (0, 1) Base Y [incompatible]"));
        assert!(text.contains("(0, 1) Base Y <-> (0, 0) Acid X [incompatible]"));
    }

    #[test]
    fn unique_mode_lists_each_pair_once() {
        let (grid, result) = scenario();
        let report = AnalysisReport::new(&grid, &result, true, &[], vec![]);
        assert_eq!(report.problems().len(), 1);
        assert!(report.to_text().contains("Problems (1):"));
    }

    #[test]
    fn text_includes_rejections_and_warnings() {
        let (grid, result) = scenario();
        let rejected = vec![RejectedEntry {
            position: TankPosition::new(3, 3),
            chemical: "Kryptonite".into(),
            reason: "chemical not found: 'Kryptonite'".into(),
        }];
        let report = AnalysisReport::new(
            &grid,
            &result,
            false,
            &rejected,
            vec![ReferenceDataWarning::NoOverrides],
        );
        let text = report.to_text();
        assert!(text.contains("warning: no exception overrides loaded"));
        assert!(text.contains("Rejected entries (1):"));
        assert!(text.contains("(3, 3) 'Kryptonite': chemical not found: 'Kryptonite'"));
    }

    #[test]
    fn json_carries_grid_result_and_summary() {
        let (grid, result) = scenario();
        let report = AnalysisReport::new(&grid, &result, false, &[], vec![]);
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["grid"]["dimensions"]["height"], 8);
        assert_eq!(json["summary"]["problems"], 2);
        assert_eq!(json["result"]["problems"].as_array().unwrap().len(), 2);
        assert!(json.get("unique_problems").is_none());
    }
}
