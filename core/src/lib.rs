#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lane Siege engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

mod config;

pub use config::{
    FlareConfig, Placement, ReactionConfig, StageConfig, StageError, WaveTiming,
};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that a new attacker enter the lane at the spawn edge.
    ///
    /// Affordability is checked by the adapter before submission; the world
    /// never inspects the resource balance.
    SpawnAttacker {
        /// Lane the attacker should traverse.
        row: u32,
        /// Kind of attacker to create.
        kind: AttackerKind,
    },
    /// Requests placement of a defender into a single grid cell.
    PlaceDefender {
        /// Kind of defender to construct.
        kind: DefenderKind,
        /// Grid cell the defender should occupy.
        cell: Cell,
    },
    /// Adds spawn pressure to a row, potentially triggering flare reactions.
    RegisterRowPressure {
        /// Row whose counter should grow.
        row: u32,
        /// Amount of pressure to add. Adapters register 1 per spawn.
        amount: u32,
    },
    /// Resets a row's pressure counter after an adaptive bias consumed it.
    ResetRowPressure {
        /// Row whose counter should return to zero.
        row: u32,
    },
    /// Starts the next reinforcement wave with a pre-planned placement list.
    BeginWave {
        /// Placements to preview and later commit.
        placements: Vec<Placement>,
    },
    /// Requests that a defender fire a projectile at an attacker.
    FireProjectile {
        /// Identifier of the defender ready to fire.
        defender: DefenderId,
        /// Attacker the projectile should be aimed at.
        target: AttackerId,
    },
    /// Requests that a ranged attacker fire a projectile at a defender.
    SpitProjectile {
        /// Identifier of the attacker ready to fire.
        attacker: AttackerId,
        /// Defender the projectile should be aimed at.
        target: DefenderId,
    },
    /// Routes a projectile overlap onto an attacker.
    StrikeAttacker {
        /// Handle of the striking projectile.
        projectile: ProjectileRef,
        /// Attacker that was overlapped.
        target: AttackerId,
    },
    /// Routes a projectile overlap onto a defender.
    StrikeDefender {
        /// Handle of the striking projectile.
        projectile: ProjectileRef,
        /// Defender that was overlapped.
        target: DefenderId,
    },
    /// Engages an attacker in melee against an adjacent defender.
    EngageMelee {
        /// Attacker entering melee.
        attacker: AttackerId,
        /// Defender being struck.
        defender: DefenderId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that an attacker entered the lane.
    AttackerSpawned {
        /// Identifier assigned to the new attacker.
        attacker: AttackerId,
        /// Kind of attacker that spawned.
        kind: AttackerKind,
        /// Lane the attacker occupies.
        row: u32,
    },
    /// Announces that an attacker died.
    AttackerDied {
        /// Identifier of the dead attacker.
        attacker: AttackerId,
    },
    /// Announces that an attacker crossed the goal line.
    AttackerReachedGoal {
        /// Identifier of the breaching attacker.
        attacker: AttackerId,
        /// Damage inflicted on the goal by the breach.
        damage: u32,
    },
    /// Confirms that a defender was placed into the grid.
    DefenderPlaced {
        /// Identifier assigned to the defender by the world.
        defender: DefenderId,
        /// Kind of defender that was placed.
        kind: DefenderKind,
        /// Cell the defender occupies.
        cell: Cell,
    },
    /// Reports that a defender placement request was rejected.
    DefenderPlacementRejected {
        /// Kind of defender requested for placement.
        kind: DefenderKind,
        /// Cell provided in the placement request.
        cell: Cell,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Announces that a defender died.
    DefenderDied {
        /// Identifier of the dead defender.
        defender: DefenderId,
    },
    /// Confirms that a defender fired a projectile.
    DefenderFired {
        /// Defender that fired.
        defender: DefenderId,
        /// Attacker the shot was aimed at.
        target: AttackerId,
    },
    /// Confirms that a ranged attacker fired a projectile.
    AttackerFired {
        /// Attacker that fired.
        attacker: AttackerId,
        /// Defender the shot was aimed at.
        target: DefenderId,
    },
    /// Announces that a reinforcement wave began.
    WaveStarted {
        /// One-based number of the wave that started.
        wave: u32,
    },
    /// Previews the placements an incoming wave will attempt to commit.
    WavePreviewed {
        /// One-based number of the previewed wave.
        wave: u32,
        /// Placements that will be committed once the delay elapses.
        placements: Vec<Placement>,
        /// Time until the previewed placements are committed.
        delay: Duration,
    },
    /// Signals that the wave cadence timer elapsed and a wave is due.
    WaveCadenceElapsed,
    /// Announces that the final wave has been exhausted. Emitted once.
    AllWavesComplete,
    /// Announces that sustained pressure force-replaced an entire row.
    FlareTriggered {
        /// Row that was cleared and replanted.
        row: u32,
    },
    /// Reports damage applied to the goal structure.
    GoalDamaged {
        /// Amount of damage applied.
        amount: u32,
        /// Goal hit points remaining after the damage.
        remaining: u32,
    },
    /// Announces that the goal structure fell. Emitted once.
    GoalDestroyed,
}

/// Unique identifier assigned to an attacker.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct AttackerId(u32);

impl AttackerId {
    /// Creates a new attacker identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a defender.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct DefenderId(u32);

impl DefenderId {
    /// Creates a new defender identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Side of the contest that owns a projectile.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Side {
    /// The projectile was fired by a defender and travels toward the spawn edge.
    Defender,
    /// The projectile was fired by an attacker and travels toward the goal.
    Attacker,
}

/// Arena handle identifying one pooled projectile slot.
///
/// The generation counter distinguishes the current occupant of a slot from
/// earlier ones, so commands holding a stale handle degrade to no-ops.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ProjectileRef {
    side: Side,
    slot: u32,
    generation: u32,
}

impl ProjectileRef {
    /// Creates a new projectile handle.
    #[must_use]
    pub const fn new(side: Side, slot: u32, generation: u32) -> Self {
        Self {
            side,
            slot,
            generation,
        }
    }

    /// Side of the contest that owns the referenced slot.
    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    /// Zero-based index of the referenced pool slot.
    #[must_use]
    pub const fn slot(&self) -> u32 {
        self.slot
    }

    /// Generation the slot carried when the handle was issued.
    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Cell {
    column: u32,
    row: u32,
}

impl Cell {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Describes the discrete lane grid the contest is played on.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LaneGrid {
    columns: u32,
    rows: u32,
    cell_length: f32,
}

impl LaneGrid {
    /// Creates a new lane grid description.
    #[must_use]
    pub const fn new(columns: u32, rows: u32, cell_length: f32) -> Self {
        Self {
            columns,
            rows,
            cell_length,
        }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of lanes contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a single square cell expressed in world units.
    #[must_use]
    pub const fn cell_length(&self) -> f32 {
        self.cell_length
    }

    /// Total width of the grid measured in world units.
    ///
    /// Attackers spawn at this x coordinate and advance toward zero.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.cell_length
    }

    /// Horizontal centre of the provided column in world units.
    #[must_use]
    pub fn column_center(&self, column: u32) -> f32 {
        (column as f32 + 0.5) * self.cell_length
    }

    /// Reports whether the cell lies within the configured dimensions.
    #[must_use]
    pub const fn contains(&self, cell: Cell) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }
}

/// Hit points carried by a living unit or the goal structure.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Health(u32);

impl Health {
    /// Creates a new health value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the remaining hit points.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether no hit points remain.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns the health reduced by `amount`, clamped at zero.
    #[must_use]
    pub const fn saturating_sub(self, amount: u32) -> Self {
        Self(self.0.saturating_sub(amount))
    }
}

/// Combat behavior exhibited by an attacker kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Behavior {
    /// Walks until adjacent to a defender, then strikes directly.
    Melee,
    /// Fires projectiles at defenders while continuing to advance.
    Ranged,
    /// Melee fighter that may leap once to the nearest same-row defender.
    Leap,
}

/// Kinds of attackers that can be introduced into a lane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackerKind {
    /// Baseline melee walker.
    Shambler,
    /// Slow, durable melee bruiser.
    Brute,
    /// Ranged attacker that fires while advancing.
    Spitter,
    /// Fast melee attacker with a one-time leap.
    Leaper,
}

impl AttackerKind {
    /// Combat behavior the kind exhibits.
    #[must_use]
    pub const fn behavior(self) -> Behavior {
        match self {
            Self::Shambler | Self::Brute => Behavior::Melee,
            Self::Spitter => Behavior::Ranged,
            Self::Leaper => Behavior::Leap,
        }
    }

    /// Hit points the kind spawns with.
    #[must_use]
    pub const fn hit_points(self) -> Health {
        match self {
            Self::Shambler => Health::new(100),
            Self::Brute => Health::new(300),
            Self::Spitter => Health::new(80),
            Self::Leaper => Health::new(90),
        }
    }

    /// Base horizontal speed in world units per second.
    #[must_use]
    pub const fn speed(self) -> f32 {
        match self {
            Self::Shambler => 40.0,
            Self::Brute => 25.0,
            Self::Spitter => 35.0,
            Self::Leaper => 50.0,
        }
    }

    /// Damage applied per strike or per projectile hit.
    #[must_use]
    pub const fn damage(self) -> u32 {
        match self {
            Self::Shambler => 20,
            Self::Brute => 40,
            Self::Spitter => 15,
            Self::Leaper => 25,
        }
    }

    /// Minimum time between successive strikes or shots.
    #[must_use]
    pub const fn strike_period(self) -> Duration {
        match self {
            Self::Shambler | Self::Leaper => Duration::from_millis(1_000),
            Self::Brute => Duration::from_millis(1_200),
            Self::Spitter => Duration::from_millis(1_500),
        }
    }

    /// Projectile speed for ranged kinds, in world units per second.
    #[must_use]
    pub const fn projectile_speed(self) -> Option<f32> {
        match self {
            Self::Spitter => Some(150.0),
            _ => None,
        }
    }

    /// Resource cost the adapter charges before spawning the kind.
    #[must_use]
    pub const fn cost(self) -> u32 {
        match self {
            Self::Shambler => 100,
            Self::Brute => 250,
            Self::Spitter => 150,
            Self::Leaper => 175,
        }
    }
}

/// Kinds of defenders that can be placed onto the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefenderKind {
    /// Baseline single-target shooter.
    Pod,
    /// Shooter whose hits slow the victim.
    FrostPod,
    /// Non-attacking blocker with a large hit point reserve.
    Bulwark,
    /// Long-range piercing beam emitter.
    Lance,
}

impl DefenderKind {
    /// Hit points the kind is placed with.
    #[must_use]
    pub const fn hit_points(self) -> Health {
        match self {
            Self::Pod | Self::FrostPod => Health::new(120),
            Self::Bulwark => Health::new(400),
            Self::Lance => Health::new(100),
        }
    }

    /// Damage applied per projectile hit. Zero marks a non-attacking kind.
    #[must_use]
    pub const fn damage(self) -> u32 {
        match self {
            Self::Pod => 20,
            Self::FrostPod => 10,
            Self::Bulwark => 0,
            Self::Lance => 8,
        }
    }

    /// Reports whether the kind participates in combat at all.
    #[must_use]
    pub const fn attacks(self) -> bool {
        self.damage() > 0
    }

    /// Minimum time between successive shots.
    #[must_use]
    pub const fn strike_period(self) -> Duration {
        match self {
            Self::Pod => Duration::from_millis(1_400),
            Self::FrostPod => Duration::from_millis(1_600),
            Self::Bulwark => Duration::from_millis(0),
            Self::Lance => Duration::from_millis(900),
        }
    }

    /// Targeting range in world units.
    #[must_use]
    pub const fn range(self) -> f32 {
        match self {
            Self::Pod | Self::FrostPod => 560.0,
            Self::Bulwark => 0.0,
            Self::Lance => 800.0,
        }
    }

    /// Slow factor carried by the kind's projectiles, if any.
    #[must_use]
    pub const fn slow_factor(self) -> Option<f32> {
        match self {
            Self::FrostPod => Some(0.5),
            _ => None,
        }
    }

    /// Reports whether the kind's projectiles pierce through victims.
    #[must_use]
    pub const fn piercing(self) -> bool {
        matches!(self, Self::Lance)
    }

    /// Projectile speed in world units per second.
    #[must_use]
    pub const fn projectile_speed(self) -> f32 {
        match self {
            Self::Pod | Self::FrostPod => 200.0,
            Self::Bulwark => 0.0,
            Self::Lance => 320.0,
        }
    }
}

/// Reasons a defender placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested cell lies beyond the configured grid bounds.
    OutOfBounds,
    /// The requested cell already holds a live defender.
    Occupied,
}

/// Lifecycle phase an attacker snapshot was captured in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttackerPhase {
    /// Advancing toward the goal at its current speed.
    Advancing,
    /// Halted in melee against the referenced defender.
    Attacking {
        /// Defender the attacker is engaged with.
        target: DefenderId,
    },
    /// Mid-leap, excluded from collision until landing.
    Leaping,
}

/// Immutable representation of a single attacker's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttackerSnapshot {
    /// Unique identifier assigned to the attacker.
    pub id: AttackerId,
    /// Kind of attacker captured.
    pub kind: AttackerKind,
    /// Lane the attacker occupies.
    pub row: u32,
    /// Continuous horizontal position in world units.
    pub position: f32,
    /// Remaining hit points.
    pub health: Health,
    /// Hit points the attacker spawned with.
    pub max_health: Health,
    /// Lifecycle phase at capture time.
    pub phase: AttackerPhase,
}

/// Read-only snapshot describing all live attackers, sorted by identifier.
#[derive(Clone, Debug, Default)]
pub struct AttackerView {
    snapshots: Vec<AttackerSnapshot>,
}

impl AttackerView {
    /// Creates a new attacker view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<AttackerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &AttackerSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<AttackerSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single defender's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DefenderSnapshot {
    /// Unique identifier assigned to the defender.
    pub id: DefenderId,
    /// Kind of defender captured.
    pub kind: DefenderKind,
    /// Grid cell the defender occupies.
    pub cell: Cell,
    /// Horizontal centre of the occupied cell in world units.
    pub position: f32,
    /// Remaining hit points.
    pub health: Health,
    /// Hit points the defender was placed with.
    pub max_health: Health,
}

/// Read-only snapshot describing all live defenders, sorted by identifier.
#[derive(Clone, Debug, Default)]
pub struct DefenderView {
    snapshots: Vec<DefenderSnapshot>,
}

impl DefenderView {
    /// Creates a new defender view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<DefenderSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &DefenderSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<DefenderSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of one active pooled projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Arena handle for the slot, generation included.
    pub handle: ProjectileRef,
    /// Side of the contest that fired the projectile.
    pub side: Side,
    /// Lane the projectile travels along.
    pub row: u32,
    /// Continuous horizontal position in world units.
    pub position: f32,
    /// Damage the projectile applies per hit.
    pub damage: u32,
    /// Whether the projectile pierces through victims.
    pub piercing: bool,
}

/// Read-only snapshot describing all active projectiles, sorted by handle.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.handle);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }
}

/// Cooldown status captured for one attack-capable defender.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DefenderCooldownSnapshot {
    /// Defender the cooldown belongs to.
    pub defender: DefenderId,
    /// Kind of the defender.
    pub kind: DefenderKind,
    /// Remaining time before the defender may fire again.
    pub ready_in: Duration,
}

/// Read-only view over defender cooldowns, sorted by identifier.
#[derive(Clone, Debug, Default)]
pub struct DefenderCooldownView {
    snapshots: Vec<DefenderCooldownSnapshot>,
}

impl DefenderCooldownView {
    /// Creates a new cooldown view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<DefenderCooldownSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.defender);
        Self { snapshots }
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<DefenderCooldownSnapshot> {
        self.snapshots
    }
}

/// Cooldown status captured for one ranged attacker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackerCooldownSnapshot {
    /// Attacker the cooldown belongs to.
    pub attacker: AttackerId,
    /// Kind of the attacker.
    pub kind: AttackerKind,
    /// Remaining time before the attacker may fire again.
    pub ready_in: Duration,
}

/// Read-only view over ranged attacker cooldowns, sorted by identifier.
#[derive(Clone, Debug, Default)]
pub struct AttackerCooldownView {
    snapshots: Vec<AttackerCooldownSnapshot>,
}

impl AttackerCooldownView {
    /// Creates a new cooldown view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<AttackerCooldownSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.attacker);
        Self { snapshots }
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<AttackerCooldownSnapshot> {
        self.snapshots
    }
}

/// Target assignment produced for a defender by the targeting system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DefenderTarget {
    /// Defender the assignment belongs to.
    pub defender: DefenderId,
    /// Attacker selected as the nearest eligible candidate.
    pub attacker: AttackerId,
}

/// Target assignment produced for a ranged attacker by the targeting system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackerTarget {
    /// Attacker the assignment belongs to.
    pub attacker: AttackerId,
    /// Defender selected as the nearest eligible candidate.
    pub defender: DefenderId,
}

/// Read-only snapshot of the wave scheduler's progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaveSnapshot {
    /// One-based number of the most recently started wave.
    pub current_wave: u32,
    /// Number of waves the stage runs before completion fires.
    pub max_waves: u32,
    /// Baseline defender count per wave before scaling.
    pub defenders_per_wave: u32,
    /// Additional defenders added per elapsed wave.
    pub wave_scaling: u32,
    /// Delay between a wave's preview and its committed placements.
    pub preview_delay: Duration,
    /// Whether the completion signal has already fired.
    pub completion_emitted: bool,
}

/// Read-only view over per-row spawn pressure counters.
#[derive(Clone, Debug, Default)]
pub struct RowPressureView {
    counters: Vec<u32>,
}

impl RowPressureView {
    /// Creates a new view from the provided per-row counters.
    #[must_use]
    pub fn from_counters(counters: Vec<u32>) -> Self {
        Self { counters }
    }

    /// Pressure accumulated in the provided row, zero when out of range.
    #[must_use]
    pub fn counter(&self, row: u32) -> u32 {
        usize::try_from(row)
            .ok()
            .and_then(|index| self.counters.get(index).copied())
            .unwrap_or(0)
    }

    /// Iterator over the counters in row order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.counters.iter().copied()
    }

    /// Number of rows covered by the view.
    #[must_use]
    pub fn rows(&self) -> u32 {
        u32::try_from(self.counters.len()).unwrap_or(u32::MAX)
    }
}
