//! Living units and their lifecycle state machines.

use std::time::Duration;

use lane_siege_core::{
    AttackerId, AttackerKind, AttackerPhase, Cell, DefenderId, DefenderKind, Health,
};

use crate::scheduler::TaskId;

/// Internal lifecycle phase of an attacker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Phase {
    Advancing,
    Attacking { target: DefenderId },
    Leaping,
}

#[derive(Clone, Debug)]
pub(crate) struct Attacker {
    pub(crate) id: AttackerId,
    pub(crate) kind: AttackerKind,
    pub(crate) row: u32,
    pub(crate) position: f32,
    pub(crate) health: Health,
    pub(crate) phase: Phase,
    /// Clock timestamp at which the next strike or shot becomes available.
    pub(crate) ready_at: Duration,
    /// Multiplier applied to base speed. Restored to 1.0 on slow expiry.
    pub(crate) speed_factor: f32,
    pub(crate) slow_task: Option<TaskId>,
    pub(crate) leap_task: Option<TaskId>,
    pub(crate) leap_spent: bool,
}

impl Attacker {
    pub(crate) fn spawn(id: AttackerId, kind: AttackerKind, row: u32, position: f32) -> Self {
        Self {
            id,
            kind,
            row,
            position,
            health: kind.hit_points(),
            phase: Phase::Advancing,
            ready_at: Duration::ZERO,
            speed_factor: 1.0,
            slow_task: None,
            leap_task: None,
            leap_spent: false,
        }
    }

    /// Reduces health, saturating at zero. Returns `true` when this call
    /// crossed into death; redundant kills report `false`.
    pub(crate) fn take_damage(&mut self, amount: u32) -> bool {
        if self.health.is_zero() {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        self.health.is_zero()
    }

    pub(crate) fn is_alive(&self) -> bool {
        !self.health.is_zero()
    }

    /// Effective horizontal speed in world units per second.
    pub(crate) fn current_speed(&self) -> f32 {
        self.kind.speed() * self.speed_factor
    }

    pub(crate) fn snapshot_phase(&self) -> AttackerPhase {
        match self.phase {
            Phase::Advancing => AttackerPhase::Advancing,
            Phase::Attacking { target } => AttackerPhase::Attacking { target },
            Phase::Leaping => AttackerPhase::Leaping,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Defender {
    pub(crate) id: DefenderId,
    pub(crate) kind: DefenderKind,
    pub(crate) cell: Cell,
    pub(crate) position: f32,
    pub(crate) health: Health,
    /// Clock timestamp at which the next shot becomes available.
    pub(crate) ready_at: Duration,
}

impl Defender {
    pub(crate) fn place(id: DefenderId, kind: DefenderKind, cell: Cell, position: f32) -> Self {
        Self {
            id,
            kind,
            cell,
            position,
            health: kind.hit_points(),
            ready_at: Duration::ZERO,
        }
    }

    pub(crate) fn take_damage(&mut self, amount: u32) -> bool {
        if self.health.is_zero() {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        self.health.is_zero()
    }

    pub(crate) fn is_alive(&self) -> bool {
        !self.health.is_zero()
    }
}
