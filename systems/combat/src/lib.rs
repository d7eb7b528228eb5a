#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that emits projectile firing commands from targeting data.

use lane_siege_core::{
    AttackerCooldownSnapshot, AttackerCooldownView, AttackerId, AttackerTarget, Command,
    DefenderCooldownSnapshot, DefenderCooldownView, DefenderId, DefenderTarget,
};

/// Combat system that queues firing commands for shooters that are ready.
#[derive(Debug, Default)]
pub struct Combat {
    scratch: Vec<Command>,
}

impl Combat {
    /// Creates a new combat system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::FireProjectile` for ready defenders with a target and
    /// `Command::SpitProjectile` for ready ranged attackers with a target.
    pub fn handle(
        &mut self,
        defender_cooldowns: DefenderCooldownView,
        defender_targets: &[DefenderTarget],
        attacker_cooldowns: AttackerCooldownView,
        attacker_targets: &[AttackerTarget],
        out: &mut Vec<Command>,
    ) {
        self.scratch.clear();

        let cooldowns = defender_cooldowns.into_vec();
        for target in defender_targets {
            if let Some(snapshot) = find_defender_cooldown(&cooldowns, target.defender) {
                if snapshot.ready_in.is_zero() {
                    self.scratch.push(Command::FireProjectile {
                        defender: target.defender,
                        target: target.attacker,
                    });
                }
            }
        }

        let cooldowns = attacker_cooldowns.into_vec();
        for target in attacker_targets {
            if let Some(snapshot) = find_attacker_cooldown(&cooldowns, target.attacker) {
                if snapshot.ready_in.is_zero() {
                    self.scratch.push(Command::SpitProjectile {
                        attacker: target.attacker,
                        target: target.defender,
                    });
                }
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

fn find_defender_cooldown(
    cooldowns: &[DefenderCooldownSnapshot],
    defender: DefenderId,
) -> Option<&DefenderCooldownSnapshot> {
    cooldowns
        .binary_search_by_key(&defender, |snapshot| snapshot.defender)
        .ok()
        .map(|index| &cooldowns[index])
}

fn find_attacker_cooldown(
    cooldowns: &[AttackerCooldownSnapshot],
    attacker: AttackerId,
) -> Option<&AttackerCooldownSnapshot> {
    cooldowns
        .binary_search_by_key(&attacker, |snapshot| snapshot.attacker)
        .ok()
        .map(|index| &cooldowns[index])
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_siege_core::{AttackerKind, DefenderKind};
    use std::time::Duration;

    fn defender_snapshot(id: u32, ready_in: Duration) -> DefenderCooldownSnapshot {
        DefenderCooldownSnapshot {
            defender: DefenderId::new(id),
            kind: DefenderKind::Pod,
            ready_in,
        }
    }

    fn attacker_snapshot(id: u32, ready_in: Duration) -> AttackerCooldownSnapshot {
        AttackerCooldownSnapshot {
            attacker: AttackerId::new(id),
            kind: AttackerKind::Spitter,
            ready_in,
        }
    }

    fn defender_target(defender: u32, attacker: u32) -> DefenderTarget {
        DefenderTarget {
            defender: DefenderId::new(defender),
            attacker: AttackerId::new(attacker),
        }
    }

    fn attacker_target(attacker: u32, defender: u32) -> AttackerTarget {
        AttackerTarget {
            attacker: AttackerId::new(attacker),
            defender: DefenderId::new(defender),
        }
    }

    #[test]
    fn ready_shooters_fire_in_target_order() {
        let mut system = Combat::new();
        let mut out = Vec::new();

        system.handle(
            DefenderCooldownView::from_snapshots(vec![
                defender_snapshot(2, Duration::ZERO),
                defender_snapshot(5, Duration::ZERO),
            ]),
            &[defender_target(2, 4), defender_target(5, 1)],
            AttackerCooldownView::from_snapshots(vec![attacker_snapshot(9, Duration::ZERO)]),
            &[attacker_target(9, 2)],
            &mut out,
        );

        assert_eq!(
            out,
            vec![
                Command::FireProjectile {
                    defender: DefenderId::new(2),
                    target: AttackerId::new(4),
                },
                Command::FireProjectile {
                    defender: DefenderId::new(5),
                    target: AttackerId::new(1),
                },
                Command::SpitProjectile {
                    attacker: AttackerId::new(9),
                    target: DefenderId::new(2),
                },
            ],
        );
    }

    #[test]
    fn cooling_or_missing_shooters_are_skipped() {
        let mut system = Combat::new();
        let mut out = Vec::new();

        system.handle(
            DefenderCooldownView::from_snapshots(vec![
                defender_snapshot(3, Duration::from_millis(250)),
                defender_snapshot(8, Duration::ZERO),
            ]),
            &[defender_target(3, 9), defender_target(8, 2), defender_target(42, 3)],
            AttackerCooldownView::from_snapshots(vec![attacker_snapshot(
                1,
                Duration::from_millis(700),
            )]),
            &[attacker_target(1, 3), attacker_target(99, 0)],
            &mut out,
        );

        assert_eq!(
            out,
            vec![Command::FireProjectile {
                defender: DefenderId::new(8),
                target: AttackerId::new(2),
            }],
        );
    }

    #[test]
    fn no_targets_means_no_commands() {
        let mut system = Combat::new();
        let mut out = Vec::new();

        system.handle(
            DefenderCooldownView::from_snapshots(vec![defender_snapshot(0, Duration::ZERO)]),
            &[],
            AttackerCooldownView::from_snapshots(Vec::new()),
            &[],
            &mut out,
        );

        assert!(out.is_empty());
    }
}
