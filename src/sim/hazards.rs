//! Mobile hazards: drifting asteroids and shooting aliens

use glam::Vec2;

use super::collision::{Arena, Rect};
use super::projectile::{Aim, Projectile, Transient, advance_all};
use super::rng::RandomSource;
use crate::consts::*;

/// A rock that drifts toward the arena center
#[derive(Debug, Clone, PartialEq)]
pub struct Asteroid {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub active: bool,
    /// Current sprite rotation (degrees)
    pub rotation: f32,
    /// Degrees per frame
    pub spin: f32,
}

impl Asteroid {
    /// Spawn just outside a random edge, heading for the center
    pub fn spawn(rng: &mut impl RandomSource, arena: &Arena) -> Self {
        let radius = ASTEROID_RADIUS;
        let pos = if rng.coin() {
            let x = rng.uniform_int(0, arena.width as i32) as f32;
            let y = if rng.coin() { -radius } else { arena.height + radius };
            Vec2::new(x, y)
        } else {
            let y = rng.uniform_int(0, arena.height as i32) as f32;
            let x = if rng.coin() { -radius } else { arena.width + radius };
            Vec2::new(x, y)
        };

        // Each axis gets its own speed roll in [2.0, 3.0]
        let heading = (arena.center() - pos).normalize_or_zero();
        let vel = Vec2::new(
            heading.x * (2.0 + rng.scaled(0, 10, 10.0)),
            heading.y * (2.0 + rng.scaled(0, 10, 10.0)),
        );
        let spin = rng.scaled(-50, 50, 100.0);

        Self {
            pos,
            vel,
            radius,
            active: true,
            rotation: 0.0,
            spin,
        }
    }

    /// Advance one frame; expire once well past the arena edge
    pub fn update(&mut self, arena: &Arena) {
        self.pos += self.vel;
        self.rotation += self.spin;
        if !arena.contains_with_margin(self.pos, ASTEROID_DESPAWN_MARGIN) {
            self.active = false;
        }
    }
}

impl Transient for Asteroid {
    fn is_live(&self) -> bool {
        self.active
    }
}

/// A saucer that crosses right-to-left and fires at the player
#[derive(Debug, Clone, PartialEq)]
pub struct Alien {
    pub pos: Vec2,
    pub vel: Vec2,
    pub active: bool,
    /// Shots fired by this alien (they vanish with it)
    pub shots: Vec<Projectile>,
    pub fire_timer: f32,
    pub fire_interval: f32,
}

impl Alien {
    pub const SIZE: Vec2 = Vec2::new(ALIEN_WIDTH, ALIEN_HEIGHT);

    /// Spawn just past the right edge at a random height
    pub fn spawn(rng: &mut impl RandomSource, arena: &Arena) -> Self {
        let inset = ALIEN_HEIGHT as i32;
        let y = rng.uniform_int(inset, arena.height as i32 - inset) as f32;
        let vel = Vec2::new(-(3.0 + rng.scaled(0, 10, 5.0)), rng.scaled(-20, 20, 10.0));

        Self {
            pos: Vec2::new(arena.width + ALIEN_WIDTH / 2.0, y),
            vel,
            active: true,
            shots: Vec::new(),
            fire_timer: 0.0,
            fire_interval: Self::roll_fire_interval(rng),
        }
    }

    /// Seconds between shots, in [2.0, 4.0]
    fn roll_fire_interval(rng: &mut impl RandomSource) -> f32 {
        2.0 + rng.scaled(0, 10, 5.0)
    }

    /// Body rectangle for collision queries
    pub fn body(&self) -> Rect {
        Rect::centered(self.pos, Self::SIZE)
    }

    /// Advance one frame. Fires at `target` (the player's current position)
    /// whenever the fire timer elapses. Returns true if it fired.
    pub fn update(
        &mut self,
        dt: f32,
        target: Vec2,
        arena: &Arena,
        rng: &mut impl RandomSource,
    ) -> bool {
        self.pos += self.vel;

        let mut fired = false;
        self.fire_timer += dt;
        if self.fire_timer >= self.fire_interval {
            self.shots.push(Projectile::fire(self.pos, Aim::AtTarget(target)));
            self.fire_timer = 0.0;
            self.fire_interval = Self::roll_fire_interval(rng);
            fired = true;
        }

        advance_all(&mut self.shots, arena);

        if self.pos.x < -ALIEN_WIDTH
            || self.pos.y < -ALIEN_HEIGHT
            || self.pos.y > arena.height + ALIEN_HEIGHT
        {
            self.active = false;
        }
        fired
    }
}

impl Transient for Alien {
    fn is_live(&self) -> bool {
        self.active
    }
}
