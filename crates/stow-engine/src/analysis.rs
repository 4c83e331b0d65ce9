//! # Analysis Pass
//!
//! [`CompatibilityEngine::analyze`] walks every loaded tank, classifies its
//! relationship with each adjacent loaded tank, and aggregates the
//! incompatible ones into [`Problem`]s.
//!
//! ## Determinism
//!
//! Tanks are visited in row-major order and neighbours are visited in
//! row-major order. Results are keyed by `BTreeMap`. Two passes over the same
//! inputs produce equal results, problem order included.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize, Serializer};

use stow_core::TankPosition;
use stow_pack::{CompatibilityMatrix, ExceptionRegistry, ReferenceData};
use stow_state::{Tank, TankGrid};

use crate::classification::{BaseClassification, Classification, Relationship};

// ---------------------------------------------------------------------------
// Problem
// ---------------------------------------------------------------------------

/// An adjacent tank pair whose final classification is incompatible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    /// Tank the relationship was evaluated from.
    pub tank: TankPosition,
    /// Adjacent tank.
    pub neighbour: TankPosition,
    /// Chemical in `tank`.
    pub chemical: String,
    /// Chemical in `neighbour`.
    pub neighbour_chemical: String,
    /// Final classification (an incompatible flavour).
    pub classification: Classification,
}

// ---------------------------------------------------------------------------
// AnalysisResult
// ---------------------------------------------------------------------------

/// Counts over one analysis pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Loaded tanks scanned.
    pub loaded_tanks: usize,
    /// Directional relationships evaluated.
    pub relationships: usize,
    /// Relationships classified `Compatible`.
    pub compatible: usize,
    /// Relationships classified `Incompatible`.
    pub incompatible: usize,
    /// Relationships classified `CompatibleException`.
    pub compatible_exceptions: usize,
    /// Relationships classified `IncompatibleException`.
    pub incompatible_exceptions: usize,
    /// Entries in the problem list.
    pub problems: usize,
}

/// Snapshot produced by one analysis pass.
///
/// Serializes with `adjacency` as a list of `{tank, neighbours}` entries,
/// since positions are not string keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    /// Per loaded tank: adjacent loaded tank → relationship.
    #[serde(serialize_with = "serialize_adjacency")]
    pub adjacency: BTreeMap<TankPosition, BTreeMap<TankPosition, Relationship>>,
    /// Every incompatible relationship, in evaluation order.
    pub problems: Vec<Problem>,
}

impl AnalysisResult {
    /// Relationships recorded for a loaded tank.
    pub fn relationships_of(
        &self,
        tank: TankPosition,
    ) -> Option<&BTreeMap<TankPosition, Relationship>> {
        self.adjacency.get(&tank)
    }

    /// The relationship evaluated from `tank` towards `neighbour`.
    pub fn relationship(&self, tank: TankPosition, neighbour: TankPosition) -> Option<&Relationship> {
        self.adjacency.get(&tank)?.get(&neighbour)
    }

    /// Whether the pass found no problems.
    pub fn is_clear(&self) -> bool {
        self.problems.is_empty()
    }

    /// Problem list with one entry per unordered tank pair.
    ///
    /// The first problem recorded for a pair is kept. This is a separate
    /// view; [`AnalysisResult::problems`] always keeps both directions.
    pub fn unique_problems(&self) -> Vec<Problem> {
        let mut seen = BTreeSet::new();
        self.problems
            .iter()
            .filter(|p| {
                let key = if p.tank <= p.neighbour {
                    (p.tank, p.neighbour)
                } else {
                    (p.neighbour, p.tank)
                };
                seen.insert(key)
            })
            .cloned()
            .collect()
    }

    /// Counts over this result.
    pub fn summary(&self) -> AnalysisSummary {
        let mut summary = AnalysisSummary {
            loaded_tanks: self.adjacency.len(),
            problems: self.problems.len(),
            ..AnalysisSummary::default()
        };
        for relationship in self.adjacency.values().flat_map(BTreeMap::values) {
            summary.relationships += 1;
            match relationship.final_classification {
                Classification::Compatible => summary.compatible += 1,
                Classification::Incompatible => summary.incompatible += 1,
                Classification::CompatibleException => summary.compatible_exceptions += 1,
                Classification::IncompatibleException => summary.incompatible_exceptions += 1,
            }
        }
        summary
    }
}

fn serialize_adjacency<S: Serializer>(
    adjacency: &BTreeMap<TankPosition, BTreeMap<TankPosition, Relationship>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    #[derive(Serialize)]
    struct TankEntry<'a> {
        tank: TankPosition,
        neighbours: Vec<NeighbourEntry<'a>>,
    }

    #[derive(Serialize)]
    struct NeighbourEntry<'a> {
        position: TankPosition,
        #[serde(flatten)]
        relationship: &'a Relationship,
    }

    serializer.collect_seq(adjacency.iter().map(|(tank, neighbours)| TankEntry {
        tank: *tank,
        neighbours: neighbours
            .iter()
            .map(|(position, relationship)| NeighbourEntry {
                position: *position,
                relationship,
            })
            .collect(),
    }))
}

// ---------------------------------------------------------------------------
// CompatibilityEngine
// ---------------------------------------------------------------------------

/// Read-only view of the tables an analysis pass consults.
#[derive(Debug, Clone, Copy)]
pub struct CompatibilityEngine<'a> {
    matrix: &'a CompatibilityMatrix,
    registry: &'a ExceptionRegistry,
}

impl<'a> CompatibilityEngine<'a> {
    /// Create an engine over a matrix and an exception registry.
    pub fn new(matrix: &'a CompatibilityMatrix, registry: &'a ExceptionRegistry) -> Self {
        Self { matrix, registry }
    }

    /// Create an engine over loaded reference data.
    pub fn from_reference(reference: &'a ReferenceData) -> Self {
        Self::new(reference.matrix(), reference.registry())
    }

    /// Classify the relationship evaluated from `tank` towards `neighbour`.
    pub fn classify(&self, tank: &Tank, neighbour: &Tank) -> Relationship {
        let base = BaseClassification::from_flag(self.matrix.is_flagged(tank.group, neighbour.group));
        let exception = self.registry.classify_exception(
            &tank.chemical_name,
            tank.group,
            &neighbour.chemical_name,
            neighbour.group,
        );
        Relationship::new(base, exception)
    }

    /// Run a full pass over `grid`.
    pub fn analyze(&self, grid: &TankGrid) -> AnalysisResult {
        let mut result = AnalysisResult::default();

        for tank in grid.loaded_tanks() {
            let relationships = result.adjacency.entry(tank.position).or_default();
            for position in grid.adjacent_positions(tank.position) {
                let Some(neighbour) = grid.tank(position).filter(|t| t.is_loaded()) else {
                    continue;
                };
                let relationship = self.classify(tank, neighbour);
                relationships.insert(position, relationship);

                if relationship.final_classification.is_incompatible() {
                    result.problems.push(Problem {
                        tank: tank.position,
                        neighbour: position,
                        chemical: tank.chemical_name.clone(),
                        neighbour_chemical: neighbour.chemical_name.clone(),
                        classification: relationship.final_classification,
                    });
                }
            }
        }

        tracing::debug!(
            grid = %grid.dimensions(),
            loaded_tanks = result.adjacency.len(),
            problems = result.problems.len(),
            "analysis pass complete"
        );
        result
    }
}

/// Run a full pass over `grid` with the given tables.
pub fn analyze(
    grid: &TankGrid,
    matrix: &CompatibilityMatrix,
    registry: &ExceptionRegistry,
) -> AnalysisResult {
    CompatibilityEngine::new(matrix, registry).analyze(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stow_core::{GridDimensions, ReactivityGroup};
    use stow_pack::{
        ChartRow, ChemicalIndex, ChemicalRecord, CompatibleOverride, ExceptionOutcome,
        IncompatibleOverride,
    };
    use stow_state::PlanEditor;

    fn g(n: u16) -> ReactivityGroup {
        ReactivityGroup(n)
    }

    fn pos(row: usize, column: usize) -> TankPosition {
        TankPosition::new(row, column)
    }

    fn index() -> ChemicalIndex {
        ChemicalIndex::new(vec![
            ChemicalRecord::new("Acid X", Some(g(1)), None),
            ChemicalRecord::new("Base Y", Some(g(2)), None),
            ChemicalRecord::new("Solvent Z", Some(g(3)), None),
            ChemicalRecord::new("Mystery Oil", None, None),
        ])
    }

    fn symmetric_matrix() -> CompatibilityMatrix {
        CompatibilityMatrix::from_chart(vec![
            ChartRow::new(g(1), [g(2)]),
            ChartRow::new(g(2), [g(1)]),
        ])
    }

    fn grid(idx: &ChemicalIndex, loads: &[(TankPosition, &str)]) -> TankGrid {
        let mut editor = PlanEditor::new(idx, GridDimensions::new(4, 8).unwrap());
        for (p, name) in loads {
            editor.assign(*p, name).unwrap();
        }
        editor.snapshot()
    }

    #[test]
    fn flagged_pair_yields_two_problems() {
        let idx = index();
        let grid = grid(&idx, &[(pos(0, 0), "Acid X"), (pos(0, 1), "Base Y")]);
        let result = analyze(&grid, &symmetric_matrix(), &ExceptionRegistry::default());

        assert_eq!(result.problems.len(), 2);
        assert_eq!(result.problems[0].tank, pos(0, 0));
        assert_eq!(result.problems[0].neighbour, pos(0, 1));
        assert_eq!(result.problems[0].chemical, "Acid X");
        assert_eq!(result.problems[0].neighbour_chemical, "Base Y");
        assert_eq!(result.problems[1].tank, pos(0, 1));
        assert_eq!(result.problems[1].neighbour, pos(0, 0));
        assert!(result
            .problems
            .iter()
            .all(|p| p.classification == Classification::Incompatible));
    }

    #[test]
    fn compatible_override_clears_both_directions() {
        let idx = index();
        let grid = grid(&idx, &[(pos(0, 0), "Acid X"), (pos(0, 1), "Base Y")]);
        let registry = ExceptionRegistry::new(vec![CompatibleOverride::new("Acid X", "Base Y")], vec![]);
        let result = analyze(&grid, &symmetric_matrix(), &registry);

        assert!(result.is_clear());
        for (a, b) in [(pos(0, 0), pos(0, 1)), (pos(0, 1), pos(0, 0))] {
            let r = result.relationship(a, b).unwrap();
            assert_eq!(r.base, BaseClassification::Incompatible);
            assert_eq!(r.exception, ExceptionOutcome::CompatibleException);
            assert_eq!(r.final_classification, Classification::CompatibleException);
        }
    }

    #[test]
    fn incompatible_override_flags_unflagged_pair() {
        let idx = index();
        let grid = grid(&idx, &[(pos(3, 1), "Solvent Z"), (pos(4, 2), "Acid X")]);
        let registry =
            ExceptionRegistry::new(vec![], vec![IncompatibleOverride::new("Solvent Z", [g(1)])]);
        let result = analyze(&grid, &CompatibilityMatrix::new(), &registry);

        assert_eq!(result.problems.len(), 2);
        assert!(result
            .problems
            .iter()
            .all(|p| p.classification == Classification::IncompatibleException));
    }

    #[test]
    fn directional_matrix_is_not_symmetrized() {
        let idx = index();
        let grid = grid(&idx, &[(pos(0, 0), "Acid X"), (pos(1, 0), "Base Y")]);
        let one_way = CompatibilityMatrix::from_chart(vec![ChartRow::new(g(1), [g(2)])]);
        let result = analyze(&grid, &one_way, &ExceptionRegistry::default());

        assert_eq!(result.problems.len(), 1);
        assert_eq!(result.problems[0].tank, pos(0, 0));
        assert_eq!(
            result.relationship(pos(1, 0), pos(0, 0)).unwrap().final_classification,
            Classification::Compatible
        );
        assert_eq!(result.unique_problems().len(), 1);
    }

    #[test]
    fn unclassified_tank_is_always_compatible() {
        let idx = index();
        let grid = grid(&idx, &[(pos(2, 2), "Mystery Oil"), (pos(2, 3), "Acid X")]);
        let matrix = CompatibilityMatrix::from_chart(vec![ChartRow::new(g(1), [g(1), g(2), g(3)])]);
        let registry =
            ExceptionRegistry::new(vec![], vec![IncompatibleOverride::new("Mystery Oil", [g(1)])]);
        let result = analyze(&grid, &matrix, &registry);

        assert!(result.is_clear());
        let r = result.relationship(pos(2, 2), pos(2, 3)).unwrap();
        assert_eq!(r.final_classification, Classification::Compatible);
        assert_eq!(r.exception, ExceptionOutcome::None);
    }

    #[test]
    fn unloaded_neighbours_are_skipped() {
        let idx = index();
        let grid = grid(&idx, &[(pos(0, 0), "Acid X"), (pos(0, 2), "Base Y")]);
        let result = analyze(&grid, &symmetric_matrix(), &ExceptionRegistry::default());

        assert!(result.is_clear());
        assert_eq!(result.adjacency.len(), 2);
        assert!(result.relationships_of(pos(0, 0)).unwrap().is_empty());
        assert!(result.relationships_of(pos(0, 1)).is_none());
    }

    #[test]
    fn unique_problems_collapse_directional_duplicates() {
        let idx = index();
        let grid = grid(
            &idx,
            &[(pos(1, 1), "Acid X"), (pos(1, 2), "Base Y"), (pos(2, 1), "Base Y")],
        );
        let result = analyze(&grid, &symmetric_matrix(), &ExceptionRegistry::default());

        assert_eq!(result.problems.len(), 4);
        let unique = result.unique_problems();
        assert_eq!(unique.len(), 2);
        assert!(unique.iter().all(|p| p.tank == pos(1, 1)));
    }

    #[test]
    fn summary_counts_classifications() {
        let idx = index();
        let grid = grid(
            &idx,
            &[(pos(0, 0), "Acid X"), (pos(0, 1), "Base Y"), (pos(1, 0), "Solvent Z")],
        );
        let result = analyze(&grid, &symmetric_matrix(), &ExceptionRegistry::default());
        let summary = result.summary();

        assert_eq!(summary.loaded_tanks, 3);
        assert_eq!(summary.relationships, 6);
        assert_eq!(summary.incompatible, 2);
        assert_eq!(summary.compatible, 4);
        assert_eq!(summary.problems, 2);
        assert_eq!(summary.compatible_exceptions, 0);
    }

    #[test]
    fn adjacency_serializes_as_entry_list() {
        let idx = index();
        let grid = grid(&idx, &[(pos(0, 0), "Acid X"), (pos(0, 1), "Base Y")]);
        let result = analyze(&grid, &symmetric_matrix(), &ExceptionRegistry::default());
        let json = serde_json::to_value(&result).unwrap();

        let first = &json["adjacency"][0];
        assert_eq!(first["tank"]["row"], 0);
        assert_eq!(first["tank"]["column"], 0);
        assert_eq!(first["neighbours"][0]["position"]["column"], 1);
        assert_eq!(first["neighbours"][0]["final"], "incompatible");
        assert_eq!(json["problems"][1]["tank"]["column"], 1);
    }

    #[test]
    fn empty_tables_degrade_to_no_problems() {
        let idx = index();
        let grid = grid(&idx, &[(pos(0, 0), "Acid X"), (pos(0, 1), "Base Y")]);
        let result = analyze(&grid, &CompatibilityMatrix::new(), &ExceptionRegistry::default());
        assert!(result.is_clear());
        assert_eq!(result.summary().relationships, 2);
    }
}
