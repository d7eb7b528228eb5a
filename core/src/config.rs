//! Stage configuration presets and the tunables that drive wave pacing.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Cell, DefenderKind, LaneGrid};

/// A defender kind paired with the grid cell it should occupy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    /// Kind of defender to place.
    pub kind: DefenderKind,
    /// Cell the defender should occupy.
    pub cell: Cell,
}

impl Placement {
    /// Creates a new placement pairing.
    #[must_use]
    pub const fn new(kind: DefenderKind, cell: Cell) -> Self {
        Self { kind, cell }
    }
}

/// Pacing parameters for the recurring reinforcement waves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveTiming {
    /// Fixed cadence between successive wave starts.
    pub time_between_waves: Duration,
    /// Baseline number of defenders introduced per wave.
    pub defenders_per_wave: u32,
    /// Additional defenders added for each wave already elapsed.
    pub wave_scaling: u32,
    /// Number of waves the stage runs before completion fires.
    pub max_waves: u32,
    /// Delay between previewing a wave's placements and committing them.
    pub preview_delay: Duration,
}

/// Tunables for the emergency row-replacement reaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlareConfig {
    /// Cumulative spawn pressure a row must accrue to trigger a flare.
    pub threshold: u32,
    /// Defender kinds force-placed into the row, front to back.
    pub plan: Vec<DefenderKind>,
    /// Columns the plan occupies, nearest the goal first.
    pub back_columns: Vec<u32>,
}

/// Tunables for the adaptive bias wave planning applies to hot rows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionConfig {
    /// Minimum pressure a row needs before bias may favor it.
    pub min_spawns: u32,
    /// Kinds preferred when reinforcing a pressured row.
    pub preferred_kinds: Vec<DefenderKind>,
    /// Number of biased placements reserved for the pressured row.
    pub count: u32,
}

/// Complete description of one playable stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StageConfig {
    /// Display name of the stage.
    pub name: String,
    /// Hit points of the goal structure attackers try to breach.
    pub goal_hit_points: u32,
    /// Resource balance the adapter starts the attacking player with.
    pub starting_resource: u32,
    /// Lane grid the stage is played on.
    pub grid: LaneGrid,
    /// Wave pacing parameters.
    pub waves: WaveTiming,
    /// Highest column index wave planning may place defenders in.
    pub max_spawn_column: u32,
    /// Defender kinds unlocked once the keyed wave number is reached.
    pub unlocks: Vec<(u32, Vec<DefenderKind>)>,
    /// Defenders present on the grid before the first wave.
    pub initial_placements: Vec<Placement>,
    /// Emergency row-replacement tunables.
    pub flare: FlareConfig,
    /// Adaptive bias tunables.
    pub reaction: ReactionConfig,
}

impl StageConfig {
    /// Kinds available to wave planning once `wave` has been reached.
    ///
    /// Unlock entries accumulate: every entry keyed at or below `wave`
    /// contributes, in schedule order, without duplicates.
    #[must_use]
    pub fn unlocked_kinds(&self, wave: u32) -> Vec<DefenderKind> {
        let mut kinds = Vec::new();
        for (unlock_wave, entries) in &self.unlocks {
            if *unlock_wave > wave {
                continue;
            }
            for kind in entries {
                if !kinds.contains(kind) {
                    kinds.push(*kind);
                }
            }
        }
        kinds
    }

    /// Looks up one of the built-in stage presets by zero-based index.
    pub fn by_index(index: usize) -> Result<Self, StageError> {
        match index {
            0 => Ok(Self::garden_patch()),
            1 => Ok(Self::backyard()),
            2 => Ok(Self::fortress()),
            _ => Err(StageError::UnknownStage(index)),
        }
    }

    /// Introductory stage with a slow unlock schedule and a light garrison.
    #[must_use]
    pub fn garden_patch() -> Self {
        Self {
            name: "The Garden Patch".to_owned(),
            goal_hit_points: 200,
            starting_resource: 600,
            grid: LaneGrid::new(9, 5, 160.0),
            waves: WaveTiming {
                time_between_waves: Duration::from_millis(10_000),
                defenders_per_wave: 2,
                wave_scaling: 1,
                max_waves: 15,
                preview_delay: Duration::from_millis(8_000),
            },
            max_spawn_column: 6,
            unlocks: vec![
                (1, vec![DefenderKind::Pod]),
                (3, vec![DefenderKind::Bulwark]),
                (6, vec![DefenderKind::FrostPod]),
            ],
            initial_placements: vec![
                Placement::new(DefenderKind::Pod, Cell::new(1, 1)),
                Placement::new(DefenderKind::Pod, Cell::new(1, 3)),
            ],
            flare: FlareConfig {
                threshold: 9,
                plan: vec![
                    DefenderKind::Pod,
                    DefenderKind::Bulwark,
                    DefenderKind::Bulwark,
                    DefenderKind::Lance,
                ],
                back_columns: vec![0, 1, 2, 3],
            },
            reaction: ReactionConfig {
                min_spawns: 3,
                preferred_kinds: vec![DefenderKind::Bulwark, DefenderKind::FrostPod],
                count: 1,
            },
        }
    }

    /// Mid-tier stage with every kind unlocked by wave eight.
    #[must_use]
    pub fn backyard() -> Self {
        Self {
            name: "The Backyard".to_owned(),
            goal_hit_points: 300,
            starting_resource: 500,
            grid: LaneGrid::new(9, 5, 160.0),
            waves: WaveTiming {
                time_between_waves: Duration::from_millis(10_000),
                defenders_per_wave: 2,
                wave_scaling: 1,
                max_waves: 15,
                preview_delay: Duration::from_millis(8_000),
            },
            max_spawn_column: 7,
            unlocks: vec![
                (1, vec![DefenderKind::Pod, DefenderKind::Bulwark]),
                (4, vec![DefenderKind::FrostPod]),
                (8, vec![DefenderKind::Lance]),
            ],
            initial_placements: vec![
                Placement::new(DefenderKind::Pod, Cell::new(1, 0)),
                Placement::new(DefenderKind::Pod, Cell::new(1, 2)),
                Placement::new(DefenderKind::Pod, Cell::new(1, 4)),
                Placement::new(DefenderKind::Bulwark, Cell::new(3, 2)),
            ],
            flare: FlareConfig {
                threshold: 9,
                plan: vec![
                    DefenderKind::Pod,
                    DefenderKind::Bulwark,
                    DefenderKind::Bulwark,
                    DefenderKind::Lance,
                ],
                back_columns: vec![0, 1, 2, 3],
            },
            reaction: ReactionConfig {
                min_spawns: 3,
                preferred_kinds: vec![DefenderKind::Bulwark, DefenderKind::FrostPod],
                count: 1,
            },
        }
    }

    /// Final stage: everything unlocked early and a dense opening garrison.
    #[must_use]
    pub fn fortress() -> Self {
        Self {
            name: "The Fortress".to_owned(),
            goal_hit_points: 400,
            starting_resource: 450,
            grid: LaneGrid::new(9, 5, 160.0),
            waves: WaveTiming {
                time_between_waves: Duration::from_millis(9_000),
                defenders_per_wave: 3,
                wave_scaling: 1,
                max_waves: 15,
                preview_delay: Duration::from_millis(7_000),
            },
            max_spawn_column: 7,
            unlocks: vec![
                (
                    1,
                    vec![
                        DefenderKind::Pod,
                        DefenderKind::Bulwark,
                        DefenderKind::FrostPod,
                    ],
                ),
                (3, vec![DefenderKind::Lance]),
            ],
            initial_placements: vec![
                Placement::new(DefenderKind::Bulwark, Cell::new(4, 0)),
                Placement::new(DefenderKind::Bulwark, Cell::new(4, 1)),
                Placement::new(DefenderKind::Bulwark, Cell::new(4, 2)),
                Placement::new(DefenderKind::Bulwark, Cell::new(4, 3)),
                Placement::new(DefenderKind::Bulwark, Cell::new(4, 4)),
                Placement::new(DefenderKind::Pod, Cell::new(2, 1)),
                Placement::new(DefenderKind::Pod, Cell::new(2, 3)),
                Placement::new(DefenderKind::Lance, Cell::new(0, 2)),
            ],
            flare: FlareConfig {
                threshold: 9,
                plan: vec![
                    DefenderKind::Pod,
                    DefenderKind::Bulwark,
                    DefenderKind::Bulwark,
                    DefenderKind::Lance,
                ],
                back_columns: vec![0, 1, 2, 3],
            },
            reaction: ReactionConfig {
                min_spawns: 3,
                preferred_kinds: vec![DefenderKind::Bulwark, DefenderKind::FrostPod],
                count: 1,
            },
        }
    }
}

/// Errors produced while resolving stage configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum StageError {
    /// The requested stage index does not name a built-in preset.
    #[error("unknown stage index {0}")]
    UnknownStage(usize),
}

#[cfg(test)]
mod tests {
    use super::{StageConfig, StageError};
    use crate::DefenderKind;

    #[test]
    fn presets_resolve_by_index() {
        assert_eq!(
            StageConfig::by_index(0).expect("stage 0").name,
            "The Garden Patch"
        );
        assert_eq!(
            StageConfig::by_index(2).expect("stage 2").name,
            "The Fortress"
        );
        assert_eq!(StageConfig::by_index(3), Err(StageError::UnknownStage(3)));
    }

    #[test]
    fn unlocks_accumulate_across_waves() {
        let stage = StageConfig::garden_patch();
        assert_eq!(stage.unlocked_kinds(1), vec![DefenderKind::Pod]);
        assert_eq!(
            stage.unlocked_kinds(3),
            vec![DefenderKind::Pod, DefenderKind::Bulwark]
        );
        assert_eq!(
            stage.unlocked_kinds(10),
            vec![
                DefenderKind::Pod,
                DefenderKind::Bulwark,
                DefenderKind::FrostPod
            ]
        );
        assert!(stage.unlocked_kinds(0).is_empty());
    }

    #[test]
    fn initial_placements_fit_the_grid() {
        for index in 0..3 {
            let stage = StageConfig::by_index(index).expect("preset");
            for placement in &stage.initial_placements {
                assert!(stage.grid.contains(placement.cell), "{}", stage.name);
            }
            assert!(stage.max_spawn_column < stage.grid.columns());
        }
    }

    #[test]
    fn flare_plan_and_columns_stay_paired() {
        for index in 0..3 {
            let stage = StageConfig::by_index(index).expect("preset");
            assert_eq!(stage.flare.plan.len(), stage.flare.back_columns.len());
        }
    }

    #[test]
    fn presets_round_trip_through_bincode() {
        for index in 0..3 {
            let stage = StageConfig::by_index(index).expect("preset");
            let bytes = bincode::serialize(&stage).expect("serialize");
            let restored: StageConfig = bincode::deserialize(&bytes).expect("deserialize");
            assert_eq!(restored, stage);
        }
    }
}
