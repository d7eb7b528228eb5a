#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line driver for the Lane Siege simulation.
//!
//! Runs one stage end to end: the world is advanced in fixed ticks, the pure
//! systems are wired into the command/event loop, and a scripted attacking
//! player spends its resource balance on spawns. Every signal the core emits
//! is logged, which makes the binary double as a smoke harness.

use std::{collections::HashSet, time::Duration};

use anyhow::Result;
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use lane_siege_core::{AttackerKind, Cell, Command, Event, StageConfig};
use lane_siege_system_collision::Collision;
use lane_siege_system_combat::Combat;
use lane_siege_system_targeting::Targeting;
use lane_siege_system_wave_planning::{Config as PlannerConfig, WavePlanning};
use lane_siege_world::{apply, query, World};

/// Resource income the attacking player accrues per simulated second.
const INCOME_PER_SECOND: u32 = 15;
/// Pause between scripted spawn attempts.
const SPAWN_INTERVAL: Duration = Duration::from_secs(2);

const SPAWN_ROTATION: [AttackerKind; 6] = [
    AttackerKind::Shambler,
    AttackerKind::Shambler,
    AttackerKind::Spitter,
    AttackerKind::Leaper,
    AttackerKind::Shambler,
    AttackerKind::Brute,
];

/// Command-line arguments accepted by the driver.
#[derive(Debug, Parser)]
#[command(name = "lane-siege", about = "Run a Lane Siege stage headlessly")]
struct Args {
    /// Zero-based index of the built-in stage preset to run.
    #[arg(long, default_value_t = 0)]
    stage: usize,

    /// Seed shared by wave planning and the scripted attacker.
    #[arg(long, default_value_t = 0x1a5e)]
    seed: u64,

    /// Maximum simulated time before the run stops, in seconds.
    #[arg(long, default_value_t = 300)]
    duration_secs: u64,

    /// Length of one simulation tick, in milliseconds.
    #[arg(long, default_value_t = 100)]
    tick_ms: u64,
}

/// Scripted attacking player: rotates through unit kinds, spawning whenever
/// the cadence elapses and the balance covers the cost.
#[derive(Debug)]
struct SpawnScript {
    rng: ChaCha8Rng,
    balance: u32,
    /// Sub-unit income carry, in thousandths of a resource unit.
    income_carry: u64,
    until_next: Duration,
    rotation_index: usize,
}

impl SpawnScript {
    fn new(seed: u64, starting_balance: u32) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            balance: starting_balance,
            income_carry: 0,
            until_next: Duration::ZERO,
            rotation_index: 0,
        }
    }

    fn accrue(&mut self, dt: Duration) {
        let millis = u64::try_from(dt.as_millis()).unwrap_or(u64::MAX);
        self.income_carry = self
            .income_carry
            .saturating_add(millis.saturating_mul(u64::from(INCOME_PER_SECOND)));
        let earned = u32::try_from(self.income_carry / 1_000).unwrap_or(u32::MAX);
        self.income_carry %= 1_000;
        self.balance = self.balance.saturating_add(earned);
        self.until_next = self.until_next.saturating_sub(dt);
    }

    /// Emits spawn commands plus the matching row-pressure registrations.
    /// Affordability lives here: the world never sees the balance.
    fn issue(&mut self, rows: u32, out: &mut Vec<Command>) {
        if !self.until_next.is_zero() || rows == 0 {
            return;
        }
        let kind = SPAWN_ROTATION[self.rotation_index % SPAWN_ROTATION.len()];
        if self.balance < kind.cost() {
            return;
        }
        self.rotation_index += 1;
        self.balance -= kind.cost();
        self.until_next = SPAWN_INTERVAL;
        let row = self.rng.gen_range(0..rows);
        out.push(Command::SpawnAttacker { row, kind });
        out.push(Command::RegisterRowPressure { row, amount: 1 });
    }
}

fn log_event(event: &Event) {
    match event {
        Event::WaveStarted { wave } => info!(wave, "wave started"),
        Event::WavePreviewed { wave, placements, delay } => {
            info!(wave, placements = placements.len(), ?delay, "wave previewed");
        }
        Event::AllWavesComplete => info!("all waves complete"),
        Event::FlareTriggered { row } => info!(row, "flare replanted a row"),
        Event::GoalDamaged { amount, remaining } => {
            info!(amount, remaining, "goal damaged");
        }
        Event::GoalDestroyed => info!("goal destroyed"),
        Event::AttackerReachedGoal { attacker, damage } => {
            info!(attacker = attacker.get(), damage, "attacker reached the goal");
        }
        other => debug!(?other, "event"),
    }
}

fn run_stage(args: &Args) -> Result<()> {
    let stage = StageConfig::by_index(args.stage)?;
    info!(stage = %stage.name, "starting stage");

    let starting_resource = stage.starting_resource;
    let mut world = World::new(stage);
    let mut script = SpawnScript::new(args.seed ^ 0x9e37_79b9, starting_resource);
    let mut targeting = Targeting::new();
    let mut combat = Combat::new();
    let mut collision = Collision::new();
    let mut planner = WavePlanning::new(PlannerConfig::new(args.seed));

    let dt = Duration::from_millis(args.tick_ms.max(1));
    let deadline = Duration::from_secs(args.duration_secs);
    let grid = query::lane_grid(&world);
    let rows = grid.rows();
    let cell_length = grid.cell_length();

    let mut events: Vec<Event> = Vec::new();
    let mut commands: Vec<Command> = Vec::new();
    let mut defender_targets = Vec::new();
    let mut attacker_targets = Vec::new();

    while query::clock(&world) < deadline {
        events.clear();
        apply(&mut world, Command::Tick { dt }, &mut events);

        let attackers = query::attacker_view(&world);
        let defenders = query::defender_view(&world);
        let projectiles = query::projectile_view(&world);

        commands.clear();
        targeting.handle(
            &defenders,
            &attackers,
            cell_length,
            &mut defender_targets,
            &mut attacker_targets,
        );
        combat.handle(
            query::defender_cooldown_view(&world),
            &defender_targets,
            query::attacker_cooldown_view(&world),
            &attacker_targets,
            &mut commands,
        );
        collision.handle(&attackers, &defenders, &projectiles, cell_length, &mut commands);

        let occupied: HashSet<Cell> = defenders.iter().map(|snapshot| snapshot.cell).collect();
        planner.handle(
            &events,
            query::stage(&world),
            query::wave_snapshot(&world),
            &query::row_pressure_view(&world),
            |cell| grid.contains(cell) && !occupied.contains(&cell),
            &mut commands,
        );

        script.accrue(dt);
        script.issue(rows, &mut commands);

        for command in commands.drain(..) {
            apply(&mut world, command, &mut events);
        }

        for event in &events {
            log_event(event);
        }

        if query::goal_destroyed(&world) {
            info!(
                clock = ?query::clock(&world),
                "attackers breached the goal; stage over"
            );
            return Ok(());
        }
    }

    info!(
        goal_hp = query::goal_health(&world).get(),
        defenders = query::remaining_defenders(&world),
        "time limit reached; the defense held"
    );
    Ok(())
}

/// Entry point for the Lane Siege command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    run_stage(&args)
}
