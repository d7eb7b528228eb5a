#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave planning system that reacts to cadence pulses.
//!
//! Each pulse yields one `BeginWave` command whose placement list combines at
//! most one adaptive row bias with seeded random fill. The world owns the
//! actual preview/commit timing; this system only decides what to place.

use lane_siege_core::{
    Cell, Command, DefenderKind, Event, Placement, RowPressureView, StageConfig, WaveSnapshot,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Attempts allowed to land each biased placement in its reserved row.
const BIAS_RETRIES: u32 = 80;
/// Attempts allowed across the whole random fill before giving up.
const FILL_RETRIES: u32 = 200;

/// Configuration parameters required to construct the wave planning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided random seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Pure system that plans reinforcement waves from pressure and occupancy.
#[derive(Debug)]
pub struct WavePlanning {
    rng: ChaCha8Rng,
    scratch: Vec<Placement>,
    claimed: Vec<Cell>,
}

impl WavePlanning {
    /// Creates a new wave planning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            scratch: Vec::new(),
            claimed: Vec::new(),
        }
    }

    /// Reacts to `WaveCadenceElapsed`, emitting `BeginWave` (and, when a row
    /// bias applied, `ResetRowPressure`).
    ///
    /// Running out of retries yields a shorter placement list, never an
    /// error. Cells reported occupied and cells already claimed earlier in
    /// the same plan are both rejected.
    pub fn handle(
        &mut self,
        events: &[Event],
        stage: &StageConfig,
        waves: WaveSnapshot,
        pressure: &RowPressureView,
        is_cell_free: impl Fn(Cell) -> bool,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            if !matches!(event, Event::WaveCadenceElapsed) {
                continue;
            }
            self.plan_wave(stage, waves, pressure, &is_cell_free, out);
        }
    }

    fn plan_wave(
        &mut self,
        stage: &StageConfig,
        waves: WaveSnapshot,
        pressure: &RowPressureView,
        is_cell_free: &impl Fn(Cell) -> bool,
        out: &mut Vec<Command>,
    ) {
        if waves.completion_emitted {
            return;
        }

        let next_wave = waves.current_wave.saturating_add(1);
        if next_wave > waves.max_waves {
            // Advancing past the final wave lets the world announce
            // completion; there is nothing to place.
            out.push(Command::BeginWave {
                placements: Vec::new(),
            });
            return;
        }

        let count = waves
            .defenders_per_wave
            .saturating_add(next_wave.saturating_sub(1).saturating_mul(waves.wave_scaling));
        let unlocked = stage.unlocked_kinds(next_wave);
        self.scratch.clear();
        self.claimed.clear();

        if !unlocked.is_empty() {
            let max_column = stage
                .max_spawn_column
                .min(stage.grid.columns().saturating_sub(1));

            self.apply_row_bias(stage, pressure, max_column, count, &unlocked, is_cell_free, out);

            let mut attempts = 0;
            while self.scratch.len() < count as usize && attempts < FILL_RETRIES {
                attempts += 1;
                let row = self.rng.gen_range(0..stage.grid.rows());
                let column = self.rng.gen_range(0..=max_column);
                let cell = Cell::new(column, row);
                if !is_cell_free(cell) || self.claimed.contains(&cell) {
                    continue;
                }
                let kind = unlocked[self.rng.gen_range(0..unlocked.len())];
                self.claimed.push(cell);
                self.scratch.push(Placement::new(kind, cell));
            }
        }

        out.push(Command::BeginWave {
            placements: std::mem::take(&mut self.scratch),
        });
    }

    /// Reserves up to the configured number of preferred-kind placements in
    /// the most pressured row, then asks the world to zero that row's
    /// counter. At most one row is biased per wave.
    fn apply_row_bias(
        &mut self,
        stage: &StageConfig,
        pressure: &RowPressureView,
        max_column: u32,
        count: u32,
        unlocked: &[DefenderKind],
        is_cell_free: &impl Fn(Cell) -> bool,
        out: &mut Vec<Command>,
    ) {
        let Some((row, peak)) = hottest_row(pressure) else {
            return;
        };
        if peak < stage.reaction.min_spawns {
            return;
        }
        let preferred: Vec<DefenderKind> = stage
            .reaction
            .preferred_kinds
            .iter()
            .copied()
            .filter(|kind| unlocked.contains(kind))
            .collect();
        if preferred.is_empty() {
            return;
        }

        let reserved = stage.reaction.count.min(count);
        for _ in 0..reserved {
            for _ in 0..BIAS_RETRIES {
                let column = self.rng.gen_range(0..=max_column);
                let cell = Cell::new(column, row);
                if !is_cell_free(cell) || self.claimed.contains(&cell) {
                    continue;
                }
                let kind = preferred[self.rng.gen_range(0..preferred.len())];
                self.claimed.push(cell);
                self.scratch.push(Placement::new(kind, cell));
                break;
            }
        }

        out.push(Command::ResetRowPressure { row });
    }
}

/// Row holding the highest pressure counter, lowest index winning ties.
fn hottest_row(pressure: &RowPressureView) -> Option<(u32, u32)> {
    let mut best: Option<(u32, u32)> = None;
    for (index, counter) in pressure.iter().enumerate() {
        let row = u32::try_from(index).ok()?;
        match best {
            Some((_, peak)) if counter <= peak => {}
            _ => best = Some((row, counter)),
        }
    }
    best
}
