#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Lane Siege.
//!
//! The world owns every mutable simulation structure: living units, the
//! defender occupancy grid, both projectile pools, the virtual-time task
//! scheduler, and wave progression. All mutation flows through [`apply`];
//! read access flows through [`query`].

use std::time::Duration;

use lane_siege_core::{
    AttackerId, Behavior, Cell, Command, DefenderId, DefenderKind, DefenderView, Event, Health,
    Placement, PlacementError, Side, StageConfig,
};
use lane_siege_system_targeting::nearest_ahead;

mod grid;
mod projectiles;
mod scheduler;
mod units;
mod waves;

use grid::OccupancyGrid;
use projectiles::ProjectileArena;
use scheduler::{Scheduler, Task};
use units::{Attacker, Defender, Phase};
use waves::{RowPressure, WaveState};

/// How long a slow effect lasts from its most recent application.
const SLOW_DURATION: Duration = Duration::from_secs(3);

/// Leap arc duration per world unit of distance, in milliseconds.
const LEAP_MILLIS_PER_UNIT: f32 = 2.0;
const LEAP_MIN_MILLIS: f32 = 400.0;
const LEAP_MAX_MILLIS: f32 = 800.0;
/// Fraction of a cell the leaper lands short of its target, on the spawn
/// side, so contact pairing can engage the vaulted defender.
const LEAP_LANDING_FACTOR: f32 = 0.5;

/// Represents the authoritative Lane Siege world state.
#[derive(Debug)]
pub struct World {
    stage: StageConfig,
    clock: Duration,
    goal_health: Health,
    goal_destroyed: bool,
    attackers: Vec<Attacker>,
    defenders: Vec<Defender>,
    next_attacker_id: u32,
    next_defender_id: u32,
    occupancy: OccupancyGrid,
    defender_shots: ProjectileArena,
    attacker_shots: ProjectileArena,
    scheduler: Scheduler,
    waves: WaveState,
    pressure: RowPressure,
}

impl World {
    /// Creates a new world for the provided stage, commits its initial
    /// placements, and arms the recurring wave cadence.
    #[must_use]
    pub fn new(stage: StageConfig) -> Self {
        let grid = stage.grid;
        let mut world = Self {
            clock: Duration::ZERO,
            goal_health: Health::new(stage.goal_hit_points),
            goal_destroyed: false,
            attackers: Vec::new(),
            defenders: Vec::new(),
            next_attacker_id: 0,
            next_defender_id: 0,
            occupancy: OccupancyGrid::new(grid.columns(), grid.rows()),
            defender_shots: ProjectileArena::new(Side::Defender),
            attacker_shots: ProjectileArena::new(Side::Attacker),
            scheduler: Scheduler::new(),
            waves: WaveState::new(),
            pressure: RowPressure::new(grid.rows()),
            stage,
        };
        let initial: Vec<Placement> = world.stage.initial_placements.clone();
        for placement in initial {
            if world.stage.grid.contains(placement.cell)
                && world.occupancy.is_free(placement.cell)
            {
                let _ = world.insert_defender(placement.kind, placement.cell);
            }
        }
        let cadence = world.stage.waves.time_between_waves;
        let _ = world.scheduler.schedule(cadence, Task::WaveCadence);
        world
    }

    fn insert_defender(&mut self, kind: DefenderKind, cell: Cell) -> DefenderId {
        let id = DefenderId::new(self.next_defender_id);
        self.next_defender_id = self.next_defender_id.wrapping_add(1);
        let position = self.stage.grid.column_center(cell.column());
        self.occupancy.occupy(id, cell);
        self.defenders.push(Defender::place(id, kind, cell, position));
        id
    }

    fn place_defender(&mut self, kind: DefenderKind, cell: Cell, out_events: &mut Vec<Event>) {
        let defender = self.insert_defender(kind, cell);
        out_events.push(Event::DefenderPlaced {
            defender,
            kind,
            cell,
        });
    }

    fn attacker_index(&self, id: AttackerId) -> Option<usize> {
        self.attackers
            .iter()
            .position(|attacker| attacker.id == id && attacker.is_alive())
    }

    fn defender_index(&self, id: DefenderId) -> Option<usize> {
        self.defenders
            .iter()
            .position(|defender| defender.id == id && defender.is_alive())
    }

    /// Marks the attacker dead, cancels its pending tasks, and emits the
    /// death signal. Removal happens in the next sweep.
    fn finish_attacker_death(&mut self, index: usize, out_events: &mut Vec<Event>) {
        let (id, slow_task, leap_task) = {
            let attacker = &mut self.attackers[index];
            attacker.health = Health::new(0);
            (attacker.id, attacker.slow_task.take(), attacker.leap_task.take())
        };
        if let Some(task) = slow_task {
            self.scheduler.cancel(task);
        }
        if let Some(task) = leap_task {
            self.scheduler.cancel(task);
        }
        out_events.push(Event::AttackerDied { attacker: id });
    }

    fn finish_defender_death(&mut self, index: usize, out_events: &mut Vec<Event>) {
        let (id, cell) = {
            let defender = &self.defenders[index];
            (defender.id, defender.cell)
        };
        self.occupancy.vacate(cell);
        out_events.push(Event::DefenderDied { defender: id });
    }

    fn sweep(&mut self) {
        self.attackers.retain(|attacker| attacker.is_alive());
        self.defenders.retain(|defender| defender.is_alive());
    }

    fn run_due_tasks(&mut self, out_events: &mut Vec<Event>) {
        while let Some(task) = self.scheduler.pop_due(self.clock) {
            match task {
                Task::WaveCadence => {
                    if self.waves.completion_emitted {
                        continue;
                    }
                    out_events.push(Event::WaveCadenceElapsed);
                    let cadence = self.stage.waves.time_between_waves;
                    let _ = self
                        .scheduler
                        .schedule(self.clock.saturating_add(cadence), Task::WaveCadence);
                }
                Task::CommitWave { placements } => {
                    for placement in placements {
                        if self.stage.grid.contains(placement.cell)
                            && self.occupancy.is_free(placement.cell)
                        {
                            self.place_defender(placement.kind, placement.cell, out_events);
                        }
                    }
                }
                Task::SlowExpiry { attacker } => {
                    if let Some(index) = self.attacker_index(attacker) {
                        let unit = &mut self.attackers[index];
                        unit.speed_factor = 1.0;
                        unit.slow_task = None;
                    }
                }
                Task::LeapLanding { attacker, position } => {
                    if let Some(index) = self.attacker_index(attacker) {
                        let unit = &mut self.attackers[index];
                        unit.position = position;
                        unit.phase = Phase::Advancing;
                        unit.leap_task = None;
                    }
                }
            }
        }
    }

    fn breach_goal(&mut self, index: usize, out_events: &mut Vec<Event>) {
        let (id, amount) = {
            let attacker = &self.attackers[index];
            (attacker.id, attacker.kind.damage().saturating_mul(2))
        };
        out_events.push(Event::AttackerReachedGoal {
            attacker: id,
            damage: amount,
        });
        self.goal_health = self.goal_health.saturating_sub(amount);
        out_events.push(Event::GoalDamaged {
            amount,
            remaining: self.goal_health.get(),
        });
        if self.goal_health.is_zero() && !self.goal_destroyed {
            self.goal_destroyed = true;
            out_events.push(Event::GoalDestroyed);
        }
        self.finish_attacker_death(index, out_events);
    }

    fn update_attackers(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let cell_length = self.stage.grid.cell_length();
        let defender_view = defender_view_of(&self.defenders);
        let seconds = dt.as_secs_f32();

        for index in 0..self.attackers.len() {
            let (kind, row, position, phase, leap_spent, alive) = {
                let attacker = &self.attackers[index];
                (
                    attacker.kind,
                    attacker.row,
                    attacker.position,
                    attacker.phase,
                    attacker.leap_spent,
                    attacker.is_alive(),
                )
            };
            if !alive {
                continue;
            }

            match phase {
                Phase::Leaping => {}
                Phase::Attacking { target } => {
                    let Some(defender_index) = self.defender_index(target) else {
                        self.attackers[index].phase = Phase::Advancing;
                        continue;
                    };
                    if kind.behavior() == Behavior::Ranged {
                        // Ranged units halted in melee keep firing point-blank
                        // via their projectile cooldown instead of biting.
                        continue;
                    }
                    if self.clock >= self.attackers[index].ready_at {
                        self.attackers[index].ready_at =
                            self.clock.saturating_add(kind.strike_period());
                        let died = self.defenders[defender_index].take_damage(kind.damage());
                        if died {
                            self.finish_defender_death(defender_index, out_events);
                            self.attackers[index].phase = Phase::Advancing;
                        }
                    }
                }
                Phase::Advancing => {
                    if kind.behavior() == Behavior::Leap && !leap_spent {
                        let live_target = nearest_ahead(row, position, &defender_view)
                            .filter(|snapshot| self.defender_index(snapshot.id).is_some());
                        if let Some(target) = live_target {
                            let distance = position - target.position;
                            let millis = (distance * LEAP_MILLIS_PER_UNIT)
                                .clamp(LEAP_MIN_MILLIS, LEAP_MAX_MILLIS);
                            let arc = Duration::from_millis(millis.round() as u64);
                            let landing =
                                target.position + LEAP_LANDING_FACTOR * cell_length;
                            let id = self.attackers[index].id;
                            let task = self.scheduler.schedule(
                                self.clock.saturating_add(arc),
                                Task::LeapLanding {
                                    attacker: id,
                                    position: landing,
                                },
                            );
                            let attacker = &mut self.attackers[index];
                            attacker.phase = Phase::Leaping;
                            attacker.leap_spent = true;
                            attacker.leap_task = Some(task);
                            continue;
                        }
                    }

                    let speed = self.attackers[index].current_speed();
                    let next_position = position - speed * seconds;
                    self.attackers[index].position = next_position;
                    if next_position <= 0.0 {
                        self.breach_goal(index, out_events);
                    }
                }
            }
        }
    }

    fn flare_row(&mut self, row: u32, out_events: &mut Vec<Event>) {
        out_events.push(Event::FlareTriggered { row });

        // Hard removal: occupants leave without death signals, so external
        // reward handling never sees them.
        for defender in &self.defenders {
            if defender.cell.row() == row {
                self.occupancy.vacate(defender.cell);
            }
        }
        self.defenders.retain(|defender| defender.cell.row() != row);

        let plan: Vec<(DefenderKind, u32)> = self
            .stage
            .flare
            .plan
            .iter()
            .copied()
            .zip(self.stage.flare.back_columns.iter().copied())
            .collect();
        for (kind, column) in plan {
            if column >= self.stage.grid.columns() {
                continue;
            }
            self.place_defender(kind, Cell::new(column, row), out_events);
        }
    }

    fn apply_slow(&mut self, index: usize, factor: f32) {
        let (id, previous) = {
            let attacker = &mut self.attackers[index];
            attacker.speed_factor = factor;
            (attacker.id, attacker.slow_task.take())
        };
        if let Some(task) = previous {
            self.scheduler.cancel(task);
        }
        let task = self.scheduler.schedule(
            self.clock.saturating_add(SLOW_DURATION),
            Task::SlowExpiry { attacker: id },
        );
        self.attackers[index].slow_task = Some(task);
    }
}

fn defender_view_of(defenders: &[Defender]) -> DefenderView {
    DefenderView::from_snapshots(
        defenders
            .iter()
            .filter(|defender| defender.is_alive())
            .map(|defender| lane_siege_core::DefenderSnapshot {
                id: defender.id,
                kind: defender.kind,
                cell: defender.cell,
                position: defender.position,
                health: defender.health,
                max_health: defender.kind.hit_points(),
            })
            .collect(),
    )
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            world.clock = world.clock.saturating_add(dt);
            out_events.push(Event::TimeAdvanced { dt });
            world.run_due_tasks(out_events);
            world.update_attackers(dt, out_events);
            let lane_width = world.stage.grid.width();
            world.defender_shots.advance(dt, lane_width);
            world.attacker_shots.advance(dt, lane_width);
            world.sweep();
        }
        Command::SpawnAttacker { row, kind } => {
            if row >= world.stage.grid.rows() {
                return;
            }
            let id = AttackerId::new(world.next_attacker_id);
            world.next_attacker_id = world.next_attacker_id.wrapping_add(1);
            let position = world.stage.grid.width();
            world.attackers.push(Attacker::spawn(id, kind, row, position));
            out_events.push(Event::AttackerSpawned {
                attacker: id,
                kind,
                row,
            });
        }
        Command::PlaceDefender { kind, cell } => {
            if !world.stage.grid.contains(cell) {
                out_events.push(Event::DefenderPlacementRejected {
                    kind,
                    cell,
                    reason: PlacementError::OutOfBounds,
                });
                return;
            }
            if world.occupancy.occupant(cell).is_some() {
                out_events.push(Event::DefenderPlacementRejected {
                    kind,
                    cell,
                    reason: PlacementError::Occupied,
                });
                return;
            }
            world.place_defender(kind, cell, out_events);
        }
        Command::RegisterRowPressure { row, amount } => {
            if row >= world.stage.grid.rows() {
                return;
            }
            world.pressure.add(row, amount);
            let threshold = world.stage.flare.threshold;
            while world.pressure.try_consume(row, threshold) {
                world.flare_row(row, out_events);
            }
        }
        Command::ResetRowPressure { row } => {
            world.pressure.reset(row);
        }
        Command::BeginWave { placements } => {
            if world.waves.completion_emitted {
                return;
            }
            let next = world.waves.current_wave.saturating_add(1);
            if next > world.stage.waves.max_waves {
                world.waves.completion_emitted = true;
                out_events.push(Event::AllWavesComplete);
                return;
            }
            world.waves.current_wave = next;
            let delay = world.stage.waves.preview_delay;
            out_events.push(Event::WaveStarted { wave: next });
            out_events.push(Event::WavePreviewed {
                wave: next,
                placements: placements.clone(),
                delay,
            });
            let _ = world.scheduler.schedule(
                world.clock.saturating_add(delay),
                Task::CommitWave { placements },
            );
        }
        Command::FireProjectile { defender, target } => {
            let Some(defender_index) = world.defender_index(defender) else {
                return;
            };
            let (kind, row, position, ready_at) = {
                let unit = &world.defenders[defender_index];
                (unit.kind, unit.cell.row(), unit.position, unit.ready_at)
            };
            if !kind.attacks() || world.clock < ready_at {
                return;
            }
            let Some(target_index) = world.attacker_index(target) else {
                return;
            };
            if world.attackers[target_index].phase == Phase::Leaping {
                return;
            }
            world.defenders[defender_index].ready_at =
                world.clock.saturating_add(kind.strike_period());
            let fired = world.defender_shots.fire(
                row,
                position,
                kind.projectile_speed(),
                kind.damage(),
                kind.piercing(),
                kind.slow_factor(),
            );
            if fired.is_some() {
                out_events.push(Event::DefenderFired { defender, target });
            }
        }
        Command::SpitProjectile { attacker, target } => {
            let Some(attacker_index) = world.attacker_index(attacker) else {
                return;
            };
            let (kind, row, position, ready_at) = {
                let unit = &world.attackers[attacker_index];
                (unit.kind, unit.row, unit.position, unit.ready_at)
            };
            let Some(projectile_speed) = kind.projectile_speed() else {
                return;
            };
            if world.clock < ready_at || world.defender_index(target).is_none() {
                return;
            }
            world.attackers[attacker_index].ready_at =
                world.clock.saturating_add(kind.strike_period());
            let fired = world.attacker_shots.fire(
                row,
                position,
                -projectile_speed,
                kind.damage(),
                false,
                None,
            );
            if fired.is_some() {
                out_events.push(Event::AttackerFired { attacker, target });
            }
        }
        Command::StrikeAttacker { projectile, target } => {
            if projectile.side() != Side::Defender {
                return;
            }
            let Some(index) = world.attacker_index(target) else {
                return;
            };
            if world.attackers[index].phase == Phase::Leaping {
                return;
            }
            let Some(outcome) = world.defender_shots.on_hit(projectile, target.get()) else {
                return;
            };
            if world.attackers[index].take_damage(outcome.damage) {
                world.finish_attacker_death(index, out_events);
            } else if let Some(factor) = outcome.slow_factor {
                world.apply_slow(index, factor);
            }
            world.sweep();
        }
        Command::StrikeDefender { projectile, target } => {
            if projectile.side() != Side::Attacker {
                return;
            }
            let Some(index) = world.defender_index(target) else {
                return;
            };
            let Some(outcome) = world.attacker_shots.on_hit(projectile, target.get()) else {
                return;
            };
            if world.defenders[index].take_damage(outcome.damage) {
                world.finish_defender_death(index, out_events);
            }
            world.sweep();
        }
        Command::EngageMelee { attacker, defender } => {
            let Some(attacker_index) = world.attacker_index(attacker) else {
                return;
            };
            if world.attackers[attacker_index].phase != Phase::Advancing {
                return;
            }
            if world.defender_index(defender).is_none() {
                return;
            }
            world.attackers[attacker_index].phase = Phase::Attacking { target: defender };
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::{defender_view_of, World};
    use lane_siege_core::{
        AttackerCooldownSnapshot, AttackerCooldownView, AttackerSnapshot, AttackerView, Behavior,
        DefenderCooldownSnapshot, DefenderCooldownView, DefenderId, DefenderView, Health,
        LaneGrid, ProjectileSnapshot, ProjectileView, RowPressureView, StageConfig, WaveSnapshot,
    };

    /// Provides read-only access to the stage configuration the world runs.
    #[must_use]
    pub fn stage(world: &World) -> &StageConfig {
        &world.stage
    }

    /// Lane grid the contest is played on.
    #[must_use]
    pub fn lane_grid(world: &World) -> LaneGrid {
        world.stage.grid
    }

    /// Current virtual clock reading.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// Remaining goal hit points.
    #[must_use]
    pub fn goal_health(world: &World) -> Health {
        world.goal_health
    }

    /// Whether the goal structure has fallen.
    #[must_use]
    pub fn goal_destroyed(world: &World) -> bool {
        world.goal_destroyed
    }

    /// Captures a read-only view of the live attackers.
    #[must_use]
    pub fn attacker_view(world: &World) -> AttackerView {
        AttackerView::from_snapshots(
            world
                .attackers
                .iter()
                .filter(|attacker| attacker.is_alive())
                .map(|attacker| AttackerSnapshot {
                    id: attacker.id,
                    kind: attacker.kind,
                    row: attacker.row,
                    position: attacker.position,
                    health: attacker.health,
                    max_health: attacker.kind.hit_points(),
                    phase: attacker.snapshot_phase(),
                })
                .collect(),
        )
    }

    /// Captures a read-only view of the live defenders.
    #[must_use]
    pub fn defender_view(world: &World) -> DefenderView {
        defender_view_of(&world.defenders)
    }

    /// Captures a read-only view of every active projectile on both sides.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        let mut snapshots: Vec<ProjectileSnapshot> = Vec::new();
        world.defender_shots.snapshots(&mut snapshots);
        world.attacker_shots.snapshots(&mut snapshots);
        ProjectileView::from_snapshots(snapshots)
    }

    /// Cooldown status of every attack-capable defender.
    #[must_use]
    pub fn defender_cooldown_view(world: &World) -> DefenderCooldownView {
        DefenderCooldownView::from_snapshots(
            world
                .defenders
                .iter()
                .filter(|defender| defender.is_alive() && defender.kind.attacks())
                .map(|defender| DefenderCooldownSnapshot {
                    defender: defender.id,
                    kind: defender.kind,
                    ready_in: defender.ready_at.saturating_sub(world.clock),
                })
                .collect(),
        )
    }

    /// Cooldown status of every ranged attacker.
    #[must_use]
    pub fn attacker_cooldown_view(world: &World) -> AttackerCooldownView {
        AttackerCooldownView::from_snapshots(
            world
                .attackers
                .iter()
                .filter(|attacker| {
                    attacker.is_alive() && attacker.kind.behavior() == Behavior::Ranged
                })
                .map(|attacker| AttackerCooldownSnapshot {
                    attacker: attacker.id,
                    kind: attacker.kind,
                    ready_in: attacker.ready_at.saturating_sub(world.clock),
                })
                .collect(),
        )
    }

    /// Snapshot of wave progression.
    #[must_use]
    pub fn wave_snapshot(world: &World) -> WaveSnapshot {
        WaveSnapshot {
            current_wave: world.waves.current_wave,
            max_waves: world.stage.waves.max_waves,
            defenders_per_wave: world.stage.waves.defenders_per_wave,
            wave_scaling: world.stage.waves.wave_scaling,
            preview_delay: world.stage.waves.preview_delay,
            completion_emitted: world.waves.completion_emitted,
        }
    }

    /// Per-row spawn pressure counters.
    #[must_use]
    pub fn row_pressure_view(world: &World) -> RowPressureView {
        RowPressureView::from_counters(world.pressure.counters().to_vec())
    }

    /// Identifiers of live defenders occupying the provided row.
    #[must_use]
    pub fn defenders_in_row(world: &World, row: u32) -> Vec<DefenderId> {
        world
            .defenders
            .iter()
            .filter(|defender| defender.is_alive() && defender.cell.row() == row)
            .map(|defender| defender.id)
            .collect()
    }

    /// Number of live defenders on the grid.
    #[must_use]
    pub fn remaining_defenders(world: &World) -> usize {
        world
            .defenders
            .iter()
            .filter(|defender| defender.is_alive())
            .count()
    }

    /// Reports whether no live defender remains anywhere on the grid.
    #[must_use]
    pub fn all_defenders_destroyed(world: &World) -> bool {
        remaining_defenders(world) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_siege_core::{AttackerKind, FlareConfig, LaneGrid, ReactionConfig, WaveTiming};

    fn stage() -> StageConfig {
        StageConfig {
            name: "cancellation range".to_owned(),
            goal_hit_points: 100,
            starting_resource: 0,
            grid: LaneGrid::new(9, 5, 160.0),
            waves: WaveTiming {
                time_between_waves: Duration::from_secs(100),
                defenders_per_wave: 2,
                wave_scaling: 1,
                max_waves: 3,
                preview_delay: Duration::from_secs(2),
            },
            max_spawn_column: 6,
            unlocks: vec![(1, vec![DefenderKind::Pod])],
            initial_placements: Vec::new(),
            flare: FlareConfig {
                threshold: 9,
                plan: Vec::new(),
                back_columns: Vec::new(),
            },
            reaction: ReactionConfig {
                min_spawns: 3,
                preferred_kinds: Vec::new(),
                count: 0,
            },
        }
    }

    #[test]
    fn death_mid_arc_cancels_the_pending_landing() {
        let mut world = World::new(stage());
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::PlaceDefender {
                kind: DefenderKind::Bulwark,
                cell: Cell::new(4, 0),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::SpawnAttacker {
                row: 0,
                kind: AttackerKind::Leaper,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(100),
            },
            &mut events,
        );
        assert!(matches!(world.attackers[0].phase, Phase::Leaping));
        assert!(world.attackers[0].leap_task.is_some());

        // Kill it mid-arc through the internal path; the landing task must
        // be cancelled along with the rest of its bookkeeping.
        events.clear();
        let _ = world.attackers[0].take_damage(1_000);
        world.finish_attacker_death(0, &mut events);
        world.sweep();
        let id = AttackerId::new(0);
        assert_eq!(events, vec![Event::AttackerDied { attacker: id }]);
        assert!(world.attackers.is_empty());

        // Ticking past the arc deadline fires nothing: the cancelled landing
        // neither resurrects the attacker nor mutates any state.
        events.clear();
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(1),
            },
            &mut events,
        );
        assert!(world.attackers.is_empty());
        assert_eq!(
            events,
            vec![Event::TimeAdvanced {
                dt: Duration::from_secs(1)
            }]
        );
    }
}
