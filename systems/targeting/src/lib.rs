#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes deterministic target assignments from snapshots.

use lane_siege_core::{
    AttackerId, AttackerPhase, AttackerTarget, AttackerView, Behavior, DefenderId,
    DefenderSnapshot, DefenderTarget, DefenderView,
};

/// Number of cells a ranged attacker scans ahead of itself, independent of any
/// per-kind range table.
const RANGED_ENGAGEMENT_CELLS: f32 = 4.0;

/// Targeting system that reuses scratch buffers to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct Targeting {
    shooter_workspace: Vec<ShooterWorkspace>,
    candidate_workspace: Vec<AttackerCandidate>,
}

impl Targeting {
    /// Creates a new targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes target assignments for both sides of the contest.
    ///
    /// Both output buffers are cleared before being populated with the latest
    /// assignments. Defenders select the nearest live attacker strictly ahead
    /// of them (toward the spawn edge) within their kind's range; ranged
    /// attackers select the nearest live defender strictly ahead of them
    /// (toward the goal) within a fixed engagement distance.
    pub fn handle(
        &mut self,
        defenders: &DefenderView,
        attackers: &AttackerView,
        cell_length: f32,
        defender_out: &mut Vec<DefenderTarget>,
        attacker_out: &mut Vec<AttackerTarget>,
    ) {
        defender_out.clear();
        attacker_out.clear();

        if defenders.iter().next().is_none() || attackers.iter().next().is_none() {
            return;
        }

        self.prepare_shooter_workspace(defenders);
        self.prepare_candidate_workspace(attackers);

        for shooter in &self.shooter_workspace {
            let mut best: Option<(f32, &AttackerCandidate)> = None;
            for candidate in &self.candidate_workspace {
                if candidate.row != shooter.row {
                    continue;
                }
                let distance = candidate.position - shooter.position;
                if distance <= 0.0 || distance > shooter.range {
                    continue;
                }
                match best {
                    Some((best_distance, _)) if distance >= best_distance => {}
                    _ => best = Some((distance, candidate)),
                }
            }
            if let Some((_, candidate)) = best {
                defender_out.push(DefenderTarget {
                    defender: shooter.id,
                    attacker: candidate.id,
                });
            }
        }

        let engagement = RANGED_ENGAGEMENT_CELLS * cell_length;
        for attacker in attackers.iter() {
            if attacker.kind.behavior() != Behavior::Ranged {
                continue;
            }
            if let Some(defender) = nearest_ahead(attacker.row, attacker.position, defenders) {
                let distance = attacker.position - defender.position;
                if distance <= engagement {
                    attacker_out.push(AttackerTarget {
                        attacker: attacker.id,
                        defender: defender.id,
                    });
                }
            }
        }
    }

    fn prepare_shooter_workspace(&mut self, defenders: &DefenderView) {
        self.shooter_workspace.clear();
        for snapshot in defenders.iter() {
            if !snapshot.kind.attacks() {
                continue;
            }
            self.shooter_workspace.push(ShooterWorkspace {
                id: snapshot.id,
                row: snapshot.cell.row(),
                position: snapshot.position,
                range: snapshot.kind.range(),
            });
        }
    }

    fn prepare_candidate_workspace(&mut self, attackers: &AttackerView) {
        self.candidate_workspace.clear();
        for snapshot in attackers.iter() {
            if snapshot.phase == AttackerPhase::Leaping {
                continue;
            }
            self.candidate_workspace.push(AttackerCandidate {
                id: snapshot.id,
                row: snapshot.row,
                position: snapshot.position,
            });
        }
    }
}

/// Selects the nearest defender strictly ahead of the provided lane position,
/// ignoring range entirely.
///
/// Ties on distance resolve to the earliest snapshot in view order, which is
/// ascending by identifier.
#[must_use]
pub fn nearest_ahead(
    row: u32,
    position: f32,
    defenders: &DefenderView,
) -> Option<DefenderSnapshot> {
    let mut best: Option<(f32, DefenderSnapshot)> = None;
    for snapshot in defenders.iter() {
        if snapshot.cell.row() != row {
            continue;
        }
        let distance = position - snapshot.position;
        if distance <= 0.0 {
            continue;
        }
        match best {
            Some((best_distance, _)) if distance >= best_distance => {}
            _ => best = Some((distance, *snapshot)),
        }
    }
    best.map(|(_, snapshot)| snapshot)
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct ShooterWorkspace {
    id: DefenderId,
    row: u32,
    position: f32,
    range: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct AttackerCandidate {
    id: AttackerId,
    row: u32,
    position: f32,
}

#[cfg(test)]
mod tests {
    use super::{nearest_ahead, Targeting};
    use lane_siege_core::{
        AttackerId, AttackerKind, AttackerPhase, AttackerSnapshot, AttackerView, Cell, DefenderId,
        DefenderKind, DefenderSnapshot, DefenderView,
    };

    const CELL: f32 = 160.0;

    fn defender(id: u32, kind: DefenderKind, column: u32, row: u32) -> DefenderSnapshot {
        DefenderSnapshot {
            id: DefenderId::new(id),
            kind,
            cell: Cell::new(column, row),
            position: (column as f32 + 0.5) * CELL,
            health: kind.hit_points(),
            max_health: kind.hit_points(),
        }
    }

    fn attacker(id: u32, kind: AttackerKind, row: u32, position: f32) -> AttackerSnapshot {
        AttackerSnapshot {
            id: AttackerId::new(id),
            kind,
            row,
            position,
            health: kind.hit_points(),
            max_health: kind.hit_points(),
            phase: AttackerPhase::Advancing,
        }
    }

    fn run(
        defenders: Vec<DefenderSnapshot>,
        attackers: Vec<AttackerSnapshot>,
    ) -> (
        Vec<lane_siege_core::DefenderTarget>,
        Vec<lane_siege_core::AttackerTarget>,
    ) {
        let mut system = Targeting::new();
        let mut defender_out = Vec::new();
        let mut attacker_out = Vec::new();
        system.handle(
            &DefenderView::from_snapshots(defenders),
            &AttackerView::from_snapshots(attackers),
            CELL,
            &mut defender_out,
            &mut attacker_out,
        );
        (defender_out, attacker_out)
    }

    #[test]
    fn defender_picks_nearest_attacker_in_its_row() {
        let (defender_targets, _) = run(
            vec![defender(0, DefenderKind::Pod, 1, 2)],
            vec![
                attacker(0, AttackerKind::Shambler, 2, 700.0),
                attacker(1, AttackerKind::Shambler, 2, 500.0),
                attacker(2, AttackerKind::Shambler, 3, 400.0),
            ],
        );
        assert_eq!(defender_targets.len(), 1);
        assert_eq!(defender_targets[0].defender, DefenderId::new(0));
        assert_eq!(defender_targets[0].attacker, AttackerId::new(1));
    }

    #[test]
    fn defender_ignores_attackers_behind_or_out_of_range() {
        let (defender_targets, _) = run(
            vec![defender(0, DefenderKind::Pod, 4, 0)],
            vec![
                attacker(0, AttackerKind::Shambler, 0, 600.0),
                attacker(1, AttackerKind::Shambler, 0, 720.0 + 561.0),
            ],
        );
        // One attacker sits behind the shooter, the other beyond Pod range.
        assert!(defender_targets.is_empty());
    }

    #[test]
    fn non_attacking_defenders_never_target() {
        let (defender_targets, _) = run(
            vec![defender(0, DefenderKind::Bulwark, 1, 0)],
            vec![attacker(0, AttackerKind::Shambler, 0, 500.0)],
        );
        assert!(defender_targets.is_empty());
    }

    #[test]
    fn leaping_attackers_are_skipped() {
        let mut leaper = attacker(0, AttackerKind::Leaper, 0, 600.0);
        leaper.phase = AttackerPhase::Leaping;
        let mut system = Targeting::new();
        let mut defender_out = Vec::new();
        let mut attacker_out = Vec::new();
        system.handle(
            &DefenderView::from_snapshots(vec![defender(0, DefenderKind::Pod, 1, 0)]),
            &AttackerView::from_snapshots(vec![leaper]),
            CELL,
            &mut defender_out,
            &mut attacker_out,
        );
        assert!(defender_out.is_empty());
    }

    #[test]
    fn ranged_attacker_engages_within_four_cells() {
        let (_, attacker_targets) = run(
            vec![defender(0, DefenderKind::Bulwark, 1, 0)],
            vec![attacker(0, AttackerKind::Spitter, 0, 240.0 + 4.0 * CELL)],
        );
        assert_eq!(attacker_targets.len(), 1);
        assert_eq!(attacker_targets[0].defender, DefenderId::new(0));
    }

    #[test]
    fn ranged_attacker_holds_fire_beyond_engagement_distance() {
        let (_, attacker_targets) = run(
            vec![defender(0, DefenderKind::Bulwark, 1, 0)],
            vec![attacker(0, AttackerKind::Spitter, 0, 240.0 + 4.0 * CELL + 1.0)],
        );
        assert!(attacker_targets.is_empty());
    }

    #[test]
    fn melee_attackers_produce_no_ranged_assignments() {
        let (_, attacker_targets) = run(
            vec![defender(0, DefenderKind::Bulwark, 1, 0)],
            vec![attacker(0, AttackerKind::Brute, 0, 300.0)],
        );
        assert!(attacker_targets.is_empty());
    }

    #[test]
    fn nearest_ahead_ignores_range_and_other_rows() {
        let view = DefenderView::from_snapshots(vec![
            defender(0, DefenderKind::Pod, 0, 1),
            defender(1, DefenderKind::Bulwark, 5, 1),
            defender(2, DefenderKind::Bulwark, 6, 2),
        ]);
        let found = nearest_ahead(1, 1_400.0, &view).map(|snapshot| snapshot.id);
        assert_eq!(found, Some(DefenderId::new(1)));
        assert!(nearest_ahead(1, 10.0, &view).is_none());
    }
}
