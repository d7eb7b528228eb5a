//! Fixed-capacity pooled projectile arenas.

use std::time::Duration;

use lane_siege_core::{ProjectileRef, ProjectileSnapshot, Side};

/// Number of slots each side's pool holds.
pub(crate) const POOL_SIZE: usize = 50;
/// Maximum flight time before an unspent projectile is reclaimed.
pub(crate) const LIFESPAN: Duration = Duration::from_secs(5);
/// Extra distance past the lane bounds a projectile may travel before
/// being reclaimed.
pub(crate) const BOUNDS_MARGIN: f32 = 20.0;

/// Damage payload delivered by a successful hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct HitOutcome {
    pub(crate) damage: u32,
    pub(crate) slow_factor: Option<f32>,
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    active: bool,
    row: u32,
    position: f32,
    velocity: f32,
    damage: u32,
    piercing: bool,
    slow_factor: Option<f32>,
    remaining: Duration,
    struck: Vec<u32>,
}

impl Slot {
    fn idle() -> Self {
        Self {
            generation: 0,
            active: false,
            row: 0,
            position: 0.0,
            velocity: 0.0,
            damage: 0,
            piercing: false,
            slow_factor: None,
            remaining: Duration::ZERO,
            struck: Vec::new(),
        }
    }
}

/// One side's projectile pool.
///
/// Slots are recycled through a free list; the generation counter on each
/// slot invalidates handles issued to earlier occupants.
#[derive(Clone, Debug)]
pub(crate) struct ProjectileArena {
    side: Side,
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl ProjectileArena {
    pub(crate) fn new(side: Side) -> Self {
        let slots = (0..POOL_SIZE).map(|_| Slot::idle()).collect();
        let free = (0..POOL_SIZE as u32).rev().collect();
        Self { side, slots, free }
    }

    /// Activates a free slot, returning its handle. `None` when the pool is
    /// exhausted; callers drop the shot silently.
    pub(crate) fn fire(
        &mut self,
        row: u32,
        position: f32,
        velocity: f32,
        damage: u32,
        piercing: bool,
        slow_factor: Option<f32>,
    ) -> Option<ProjectileRef> {
        let index = self.free.pop()?;
        let slot = &mut self.slots[index as usize];
        slot.generation = slot.generation.wrapping_add(1);
        slot.active = true;
        slot.row = row;
        slot.position = position;
        slot.velocity = velocity;
        slot.damage = damage;
        slot.piercing = piercing;
        slot.slow_factor = slow_factor;
        slot.remaining = LIFESPAN;
        slot.struck.clear();
        Some(ProjectileRef::new(self.side, index, slot.generation))
    }

    /// Moves every active projectile and reclaims those that expire or leave
    /// the playable span.
    pub(crate) fn advance(&mut self, dt: Duration, lane_width: f32) {
        let min_x = -BOUNDS_MARGIN;
        let max_x = lane_width + BOUNDS_MARGIN;
        let seconds = dt.as_secs_f32();
        for index in 0..self.slots.len() {
            let slot = &mut self.slots[index];
            if !slot.active {
                continue;
            }
            slot.position += slot.velocity * seconds;
            slot.remaining = slot.remaining.saturating_sub(dt);
            if slot.remaining.is_zero() || slot.position < min_x || slot.position > max_x {
                slot.active = false;
                self.free.push(index as u32);
            }
        }
    }

    /// Applies a hit from the referenced projectile onto `victim`.
    ///
    /// Stale handles (wrong generation, inactive slot, wrong side) and repeat
    /// victims of a piercing projectile yield `None`. Non-piercing
    /// projectiles are reclaimed by their first hit.
    pub(crate) fn on_hit(&mut self, handle: ProjectileRef, victim: u32) -> Option<HitOutcome> {
        if handle.side() != self.side {
            return None;
        }
        let index = usize::try_from(handle.slot()).ok()?;
        let slot = self.slots.get_mut(index)?;
        if !slot.active || slot.generation != handle.generation() {
            return None;
        }
        if slot.piercing {
            if slot.struck.contains(&victim) {
                return None;
            }
            slot.struck.push(victim);
        } else {
            slot.active = false;
            self.free.push(handle.slot());
        }
        Some(HitOutcome {
            damage: slot.damage,
            slow_factor: slot.slow_factor,
        })
    }

    pub(crate) fn snapshots(&self, out: &mut Vec<ProjectileSnapshot>) {
        for (index, slot) in self.slots.iter().enumerate() {
            if !slot.active {
                continue;
            }
            out.push(ProjectileSnapshot {
                handle: ProjectileRef::new(self.side, index as u32, slot.generation),
                side: self.side,
                row: slot.row,
                position: slot.position,
                damage: slot.damage,
                piercing: slot.piercing,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ProjectileArena, POOL_SIZE};
    use lane_siege_core::Side;
    use std::time::Duration;

    fn full_arena() -> ProjectileArena {
        let mut arena = ProjectileArena::new(Side::Defender);
        for _ in 0..POOL_SIZE {
            assert!(arena
                .fire(0, 100.0, 200.0, 20, false, None)
                .is_some());
        }
        arena
    }

    #[test]
    fn exhausted_pool_yields_no_projectile() {
        let mut arena = full_arena();
        assert!(arena.fire(0, 100.0, 200.0, 20, false, None).is_none());
    }

    #[test]
    fn released_slots_are_reusable_with_fresh_generations() {
        let mut arena = full_arena();
        let handle = lane_siege_core::ProjectileRef::new(Side::Defender, 0, 1);
        assert!(arena.on_hit(handle, 7).is_some());

        let reissued = arena
            .fire(1, 50.0, 200.0, 20, false, None)
            .expect("slot freed by hit");
        assert_eq!(reissued.slot(), 0);
        assert_eq!(reissued.generation(), 2);
        // The original handle is stale now.
        assert!(arena.on_hit(handle, 7).is_none());
    }

    #[test]
    fn piercing_projectiles_strike_each_victim_once() {
        let mut arena = ProjectileArena::new(Side::Defender);
        let handle = arena
            .fire(0, 100.0, 320.0, 8, true, None)
            .expect("free pool");
        assert!(arena.on_hit(handle, 1).is_some());
        assert!(arena.on_hit(handle, 1).is_none());
        assert!(arena.on_hit(handle, 2).is_some());
    }

    #[test]
    fn projectiles_expire_after_lifespan() {
        let mut arena = ProjectileArena::new(Side::Defender);
        let handle = arena
            .fire(0, 100.0, 0.0, 20, false, None)
            .expect("free pool");
        arena.advance(Duration::from_secs(5), 1_440.0);
        assert!(arena.on_hit(handle, 1).is_none());
    }

    #[test]
    fn projectiles_deactivate_beyond_lane_bounds() {
        let mut arena = ProjectileArena::new(Side::Attacker);
        let handle = arena
            .fire(0, 10.0, -150.0, 15, false, None)
            .expect("free pool");
        arena.advance(Duration::from_millis(500), 1_440.0);
        // 10 - 75 = -65 lies past the margin.
        assert!(arena.on_hit(handle, 1).is_none());
    }

    #[test]
    fn wrong_side_handles_are_ignored() {
        let mut arena = ProjectileArena::new(Side::Defender);
        let _ = arena.fire(0, 100.0, 200.0, 20, false, None);
        let foreign = lane_siege_core::ProjectileRef::new(Side::Attacker, 0, 1);
        assert!(arena.on_hit(foreign, 1).is_none());
    }
}
