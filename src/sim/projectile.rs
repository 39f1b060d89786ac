//! Projectiles and the mark-then-reap entity lifecycle

use glam::Vec2;

use super::collision::Arena;
use crate::consts::{PROJECTILE_RADIUS, PROJECTILE_SPEED};

/// Entities that are deleted by clearing a flag, then compacted out later.
///
/// Collision scans only ever flip flags; `reap` is the single place where
/// collections shrink, so no scan observes a half-removed vector.
pub trait Transient {
    fn is_live(&self) -> bool;
}

/// Drop every entity that is no longer live. Returns how many were removed.
pub fn reap<T: Transient>(items: &mut Vec<T>) -> usize {
    let before = items.len();
    items.retain(Transient::is_live);
    before - items.len()
}

/// How a projectile picks its heading at fire time
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Aim {
    /// Fly along this direction (player shots)
    Direction(Vec2),
    /// Fly toward where this point is now; never re-aimed (alien shots)
    AtTarget(Vec2),
}

/// A moving shot
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub active: bool,
}

impl Projectile {
    /// Fire from `origin`. A zero-length heading yields a stationary shot.
    pub fn fire(origin: Vec2, aim: Aim) -> Self {
        let heading = match aim {
            Aim::Direction(dir) => dir,
            Aim::AtTarget(target) => target - origin,
        };
        Self {
            pos: origin,
            vel: heading.normalize_or_zero() * PROJECTILE_SPEED,
            radius: PROJECTILE_RADIUS,
            active: true,
        }
    }

    /// Advance one frame; expire on leaving the arena
    pub fn update(&mut self, arena: &Arena) {
        self.pos += self.vel;
        if !arena.contains(self.pos) {
            self.active = false;
        }
    }
}

impl Transient for Projectile {
    fn is_live(&self) -> bool {
        self.active
    }
}

/// Advance every active shot in a container, then reap the dead ones
pub fn advance_all(shots: &mut Vec<Projectile>, arena: &Arena) {
    for shot in shots.iter_mut().filter(|s| s.active) {
        shot.update(arena);
    }
    reap(shots);
}
