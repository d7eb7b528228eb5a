#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that detects overlaps and emits strike and engagement commands.

use lane_siege_core::{AttackerPhase, AttackerView, Command, DefenderView, ProjectileView, Side};

/// Fraction of a cell within which two lane occupants count as touching.
const CONTACT_FACTOR: f32 = 0.4;

/// Collision coordinator that pairs projectiles with victims and detects
/// melee adjacency each tick.
#[derive(Debug, Default)]
pub struct Collision {
    scratch: Vec<Command>,
}

impl Collision {
    /// Creates a new collision system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `StrikeAttacker`, `StrikeDefender`, and `EngageMelee` commands
    /// for every overlap found in the provided snapshots.
    ///
    /// Mid-leap attackers are invisible to every pairing, and engagement is
    /// only requested for attackers that are not already fighting.
    pub fn handle(
        &mut self,
        attackers: &AttackerView,
        defenders: &DefenderView,
        projectiles: &ProjectileView,
        cell_length: f32,
        out: &mut Vec<Command>,
    ) {
        self.scratch.clear();
        let contact = CONTACT_FACTOR * cell_length;

        for projectile in projectiles.iter() {
            match projectile.side {
                Side::Defender => {
                    for attacker in attackers.iter() {
                        if attacker.phase == AttackerPhase::Leaping
                            || attacker.row != projectile.row
                        {
                            continue;
                        }
                        if (attacker.position - projectile.position).abs() <= contact {
                            self.scratch.push(Command::StrikeAttacker {
                                projectile: projectile.handle,
                                target: attacker.id,
                            });
                        }
                    }
                }
                Side::Attacker => {
                    for defender in defenders.iter() {
                        if defender.cell.row() != projectile.row {
                            continue;
                        }
                        if (defender.position - projectile.position).abs() <= contact {
                            self.scratch.push(Command::StrikeDefender {
                                projectile: projectile.handle,
                                target: defender.id,
                            });
                        }
                    }
                }
            }
        }

        for attacker in attackers.iter() {
            if attacker.phase != AttackerPhase::Advancing {
                continue;
            }
            let mut nearest: Option<(f32, lane_siege_core::DefenderId)> = None;
            for defender in defenders.iter() {
                if defender.cell.row() != attacker.row {
                    continue;
                }
                let gap = (attacker.position - defender.position).abs();
                if gap > contact {
                    continue;
                }
                match nearest {
                    Some((best, _)) if gap >= best => {}
                    _ => nearest = Some((gap, defender.id)),
                }
            }
            if let Some((_, defender)) = nearest {
                self.scratch.push(Command::EngageMelee {
                    attacker: attacker.id,
                    defender,
                });
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}
