//! Player craft: movement, shooting, shield energy and damage windows

use glam::Vec2;

use super::collision::Arena;
use super::projectile::{Aim, Projectile, advance_all};
use super::tick::TickInput;
use crate::audio::Cue;
use crate::consts::*;

/// The player-controlled craft
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    /// Shots fired by the player
    pub shots: Vec<Projectile>,
    /// Always within [0, SHIELD_MAX_ENERGY]
    pub shield_energy: f32,
    pub shield_active: bool,
    pub invulnerable: bool,
    pub invulnerability_timer: f32,
    /// Seconds until another collision may register
    pub collision_cooldown: f32,
    /// Last known aim point
    pub aim: Vec2,
}

impl Player {
    pub const SIZE: Vec2 = Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT);

    /// Fresh craft at the arena center, aiming straight up
    pub fn new(arena: &Arena) -> Self {
        let pos = arena.center();
        Self {
            pos,
            shots: Vec::new(),
            shield_energy: SHIELD_MAX_ENERGY,
            shield_active: false,
            invulnerable: false,
            invulnerability_timer: 0.0,
            collision_cooldown: 0.0,
            aim: pos - Vec2::new(0.0, 100.0),
        }
    }

    pub fn update(&mut self, dt: f32, input: &TickInput, arena: &Arena, cues: &mut Vec<Cue>) {
        // Movement
        let step = input.movement.clamp(Vec2::NEG_ONE, Vec2::ONE) * PLAYER_SPEED;
        self.pos = arena.clamp_inset(self.pos + step, Self::SIZE * 0.5);

        if let Some(aim) = input.aim {
            self.aim = aim;
        }

        if input.fire {
            self.shots
                .push(Projectile::fire(self.pos, Aim::Direction(self.aim - self.pos)));
            cues.push(Cue::ShotFired);
        }

        self.update_shield(dt, input.shield, cues);

        advance_all(&mut self.shots, arena);

        if self.invulnerable {
            self.invulnerability_timer -= dt;
            if self.invulnerability_timer <= 0.0 {
                self.invulnerable = false;
                self.invulnerability_timer = 0.0;
            }
        }
        self.collision_cooldown = (self.collision_cooldown - dt).max(0.0);
    }

    fn update_shield(&mut self, dt: f32, held: bool, cues: &mut Vec<Cue>) {
        if held && self.shield_energy > 0.0 {
            if !self.shield_active {
                cues.push(Cue::ShieldActivated);
                log::debug!("Shield up ({:.0} energy)", self.shield_energy);
            }
            self.shield_active = true;
            self.shield_energy -= SHIELD_DRAIN_RATE * dt;
            if self.shield_energy <= 0.0 {
                self.shield_energy = 0.0;
                self.shield_active = false;
                log::debug!("Shield depleted");
            }
        } else {
            self.shield_active = false;
            self.shield_energy = (self.shield_energy + SHIELD_RECHARGE_RATE * dt).min(SHIELD_MAX_ENERGY);
        }
    }

    /// Register a damaging contact. Returns true if the caller should take
    /// a life; false while invulnerable, cooling down, or shielded.
    pub fn hit(&mut self) -> bool {
        if self.invulnerable || self.collision_cooldown > 0.0 || self.shield_active {
            return false;
        }
        self.invulnerable = true;
        self.invulnerability_timer = INVULNERABILITY_SECS;
        self.collision_cooldown = COLLISION_COOLDOWN_SECS;
        true
    }

    /// Not protected by an invulnerability or cooldown window
    pub fn is_exposed(&self) -> bool {
        !self.invulnerable && self.collision_cooldown <= 0.0
    }

    /// Body radius derived from the sprite footprint
    pub fn collision_radius(&self) -> f32 {
        (PLAYER_WIDTH + PLAYER_HEIGHT) / 4.0
    }

    /// Radius used for every hazard query
    pub fn hit_radius(&self) -> f32 {
        if self.shield_active {
            SHIELD_RADIUS
        } else {
            self.collision_radius()
        }
    }

    /// Displace the craft (knockback), staying on screen
    pub fn shove(&mut self, offset: Vec2, arena: &Arena) {
        self.pos = arena.clamp_inset(self.pos + offset, Self::SIZE * 0.5);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DT: f32 = FRAME_DT;

    #[test]
    fn test_starts_centered_with_full_shield() {
        let player = Player::new(&Arena::default());
        assert_eq!(player.pos, Vec2::new(400.0, 300.0));
        assert_eq!(player.shield_energy, 100.0);
        assert!((player.collision_radius() - 30.25).abs() < 1e-6);
        assert_eq!(player.hit_radius(), player.collision_radius());
    }

    #[test]
    fn test_movement_is_clamped() {
        let arena = Arena::default();
        let mut player = Player::new(&arena);
        let mut cues = Vec::new();
        let input = TickInput {
            movement: Vec2::new(3.0, -1.0),
            ..Default::default()
        };
        player.update(DT, &input, &arena, &mut cues);
        assert_eq!(player.pos, Vec2::new(405.0, 295.0));

        for _ in 0..200 {
            player.update(DT, &input, &arena, &mut cues);
        }
        assert_eq!(player.pos, Vec2::new(800.0 - 32.0, 28.5));
    }

    #[test]
    fn test_fire_spawns_shot_toward_aim() {
        let arena = Arena::default();
        let mut player = Player::new(&arena);
        let mut cues = Vec::new();
        let input = TickInput {
            aim: Some(Vec2::new(600.0, 300.0)),
            fire: true,
            ..Default::default()
        };
        player.update(DT, &input, &arena, &mut cues);
        assert_eq!(cues, vec![Cue::ShotFired]);
        assert_eq!(player.shots.len(), 1);
        // Already advanced one frame
        assert_eq!(player.shots[0].pos, Vec2::new(415.0, 300.0));
        assert_eq!(player.aim, Vec2::new(600.0, 300.0));
    }

    #[test]
    fn test_shield_drains_recharges_and_cues_once() {
        let arena = Arena::default();
        let mut player = Player::new(&arena);
        let mut cues = Vec::new();
        let shield = TickInput {
            shield: true,
            ..Default::default()
        };

        player.update(1.0, &shield, &arena, &mut cues);
        assert!(player.shield_active);
        assert_eq!(player.shield_energy, 70.0);
        assert_eq!(player.hit_radius(), SHIELD_RADIUS);
        player.update(1.0, &shield, &arena, &mut cues);
        assert_eq!(cues, vec![Cue::ShieldActivated]);

        // Drained to zero the shield drops even while held
        player.update(3.0, &shield, &arena, &mut cues);
        assert_eq!(player.shield_energy, 0.0);
        assert!(!player.shield_active);

        player.update(1.0, &TickInput::default(), &arena, &mut cues);
        assert_eq!(player.shield_energy, 10.0);
    }

    #[test]
    fn test_hit_windows() {
        let arena = Arena::default();
        let mut player = Player::new(&arena);
        let mut cues = Vec::new();

        assert!(player.hit());
        assert!(player.invulnerable);
        assert!(!player.is_exposed());
        // Re-entrant hits are ignored
        assert!(!player.hit());

        // Cooldown ends first, invulnerability still holds
        player.update(0.6, &TickInput::default(), &arena, &mut cues);
        assert_eq!(player.collision_cooldown, 0.0);
        assert!(!player.hit());

        player.update(1.5, &TickInput::default(), &arena, &mut cues);
        assert!(!player.invulnerable);
        assert!(player.is_exposed());
        assert!(player.hit());
    }

    #[test]
    fn test_shield_blocks_hit() {
        let mut player = Player::new(&Arena::default());
        player.shield_active = true;
        assert!(!player.hit());
        assert!(!player.invulnerable);
    }

    proptest! {
        #[test]
        fn prop_shield_energy_stays_in_range(
            steps in proptest::collection::vec((any::<bool>(), 0.0f32..2.0), 1..200)
        ) {
            let arena = Arena::default();
            let mut player = Player::new(&arena);
            let mut cues = Vec::new();
            for (held, dt) in steps {
                let input = TickInput { shield: held, ..Default::default() };
                player.update(dt, &input, &arena, &mut cues);
                prop_assert!((0.0..=SHIELD_MAX_ENERGY).contains(&player.shield_energy));
                prop_assert!(!player.shield_active || player.shield_energy > 0.0);
            }
        }
    }
}
