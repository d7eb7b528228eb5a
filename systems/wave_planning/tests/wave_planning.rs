//! Behavioral coverage for the wave planning system.

use std::time::Duration;

use lane_siege_core::{
    Cell, Command, DefenderKind, Event, FlareConfig, LaneGrid, Placement, ReactionConfig,
    RowPressureView, StageConfig, WaveSnapshot, WaveTiming,
};
use lane_siege_system_wave_planning::{Config, WavePlanning};

fn stage() -> StageConfig {
    StageConfig {
        name: "planner proving ground".to_owned(),
        goal_hit_points: 100,
        starting_resource: 0,
        grid: LaneGrid::new(9, 5, 160.0),
        waves: WaveTiming {
            time_between_waves: Duration::from_secs(10),
            defenders_per_wave: 2,
            wave_scaling: 1,
            max_waves: 15,
            preview_delay: Duration::from_secs(8),
        },
        max_spawn_column: 6,
        unlocks: vec![(1, vec![DefenderKind::Pod, DefenderKind::Bulwark])],
        initial_placements: Vec::new(),
        flare: FlareConfig {
            threshold: 9,
            plan: vec![DefenderKind::Pod],
            back_columns: vec![0],
        },
        reaction: ReactionConfig {
            min_spawns: 9,
            preferred_kinds: vec![DefenderKind::Bulwark],
            count: 1,
        },
    }
}

fn snapshot(current_wave: u32) -> WaveSnapshot {
    WaveSnapshot {
        current_wave,
        max_waves: 15,
        defenders_per_wave: 2,
        wave_scaling: 1,
        preview_delay: Duration::from_secs(2),
        completion_emitted: false,
    }
}

fn quiet_pressure() -> RowPressureView {
    RowPressureView::from_counters(vec![0; 5])
}

fn placements_of(out: &[Command]) -> &[Placement] {
    match out.iter().find_map(|command| match command {
        Command::BeginWave { placements } => Some(placements),
        _ => None,
    }) {
        Some(placements) => placements,
        None => panic!("expected a BeginWave command"),
    }
}

#[test]
fn cadence_pulse_yields_a_scaled_wave_of_unlocked_kinds() {
    let mut planner = WavePlanning::new(Config::new(7));
    let mut out = Vec::new();

    planner.handle(
        &[Event::WaveCadenceElapsed],
        &stage(),
        snapshot(1),
        &quiet_pressure(),
        |_| true,
        &mut out,
    );

    // Wave 2 scales to 2 + (2 - 1) × 1 placements.
    let placements = placements_of(&out);
    assert_eq!(placements.len(), 3);
    for placement in placements {
        assert!(placement.cell.column() <= 6);
        assert!(placement.cell.row() < 5);
        assert!(
            placement.kind == DefenderKind::Pod || placement.kind == DefenderKind::Bulwark,
            "kind must come from the unlock set"
        );
    }
    // Cells are claimed at most once within a plan.
    for (index, placement) in placements.iter().enumerate() {
        assert!(placements[index + 1..]
            .iter()
            .all(|other| other.cell != placement.cell));
    }
}

#[test]
fn identical_seeds_produce_identical_plans() {
    let mut first = WavePlanning::new(Config::new(42));
    let mut second = WavePlanning::new(Config::new(42));
    let mut first_out = Vec::new();
    let mut second_out = Vec::new();

    first.handle(
        &[Event::WaveCadenceElapsed],
        &stage(),
        snapshot(3),
        &quiet_pressure(),
        |_| true,
        &mut first_out,
    );
    second.handle(
        &[Event::WaveCadenceElapsed],
        &stage(),
        snapshot(3),
        &quiet_pressure(),
        |_| true,
        &mut second_out,
    );

    assert_eq!(first_out, second_out);
}

#[test]
fn hot_row_receives_a_preferred_placement_and_a_counter_reset() {
    let mut planner = WavePlanning::new(Config::new(11));
    let mut out = Vec::new();

    planner.handle(
        &[Event::WaveCadenceElapsed],
        &stage(),
        snapshot(1),
        &RowPressureView::from_counters(vec![9, 0, 0, 0, 0]),
        |_| true,
        &mut out,
    );

    assert!(out.contains(&Command::ResetRowPressure { row: 0 }));
    // Biased placements land first in the plan.
    let placements = placements_of(&out);
    assert_eq!(placements[0].kind, DefenderKind::Bulwark);
    assert_eq!(placements[0].cell.row(), 0);
}

#[test]
fn bias_requires_an_unlocked_preferred_kind() {
    let mut config = stage();
    config.unlocks = vec![(1, vec![DefenderKind::Pod])];
    let mut planner = WavePlanning::new(Config::new(11));
    let mut out = Vec::new();

    planner.handle(
        &[Event::WaveCadenceElapsed],
        &config,
        snapshot(1),
        &RowPressureView::from_counters(vec![9, 0, 0, 0, 0]),
        |_| true,
        &mut out,
    );

    assert!(!out
        .iter()
        .any(|command| matches!(command, Command::ResetRowPressure { .. })));
    for placement in placements_of(&out) {
        assert_eq!(placement.kind, DefenderKind::Pod);
    }
}

#[test]
fn pressure_below_the_reaction_floor_is_ignored() {
    let mut planner = WavePlanning::new(Config::new(11));
    let mut out = Vec::new();

    planner.handle(
        &[Event::WaveCadenceElapsed],
        &stage(),
        snapshot(1),
        &RowPressureView::from_counters(vec![8, 0, 0, 0, 0]),
        |_| true,
        &mut out,
    );

    assert!(!out
        .iter()
        .any(|command| matches!(command, Command::ResetRowPressure { .. })));
}

#[test]
fn a_full_grid_yields_an_empty_wave_without_failing() {
    let mut planner = WavePlanning::new(Config::new(3));
    let mut out = Vec::new();

    planner.handle(
        &[Event::WaveCadenceElapsed],
        &stage(),
        snapshot(1),
        &quiet_pressure(),
        |_| false,
        &mut out,
    );

    assert!(placements_of(&out).is_empty());
}

#[test]
fn waves_past_the_cap_advance_with_nothing_to_place() {
    let mut planner = WavePlanning::new(Config::new(3));
    let mut out = Vec::new();

    planner.handle(
        &[Event::WaveCadenceElapsed],
        &stage(),
        snapshot(15),
        &quiet_pressure(),
        |_| true,
        &mut out,
    );

    assert_eq!(
        out,
        vec![Command::BeginWave {
            placements: Vec::new()
        }]
    );
}

#[test]
fn completed_stages_are_left_alone() {
    let mut planner = WavePlanning::new(Config::new(3));
    let mut out = Vec::new();
    let mut waves = snapshot(16);
    waves.completion_emitted = true;

    planner.handle(
        &[Event::WaveCadenceElapsed],
        &stage(),
        waves,
        &quiet_pressure(),
        |_| true,
        &mut out,
    );

    assert!(out.is_empty());
}

#[test]
fn unrelated_events_produce_no_commands() {
    let mut planner = WavePlanning::new(Config::new(3));
    let mut out = Vec::new();

    planner.handle(
        &[Event::AllWavesComplete],
        &stage(),
        snapshot(1),
        &quiet_pressure(),
        |_| true,
        &mut out,
    );

    assert!(out.is_empty());
}

#[test]
fn claimed_cells_stay_unique_even_under_bias() {
    let mut planner = WavePlanning::new(Config::new(23));
    let mut out = Vec::new();

    planner.handle(
        &[Event::WaveCadenceElapsed],
        &stage(),
        snapshot(6),
        &RowPressureView::from_counters(vec![0, 20, 0, 0, 0]),
        |cell: Cell| cell.column() != 2,
        &mut out,
    );

    let placements = placements_of(&out);
    for placement in placements {
        assert_ne!(placement.cell.column(), 2, "occupied column must be skipped");
    }
    for (index, placement) in placements.iter().enumerate() {
        assert!(placements[index + 1..]
            .iter()
            .all(|other| other.cell != placement.cell));
    }
}
