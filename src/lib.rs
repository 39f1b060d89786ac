//! UFO Shooter - a three-level arcade shooter with a logic-gate boss
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (entities, collisions, levels, boss)
//! - `frontend`: Draw/play collaborator interface fed after each step
//! - `audio`: Named sound cues raised by the simulation
//! - `tuning`: Data-driven game balance
//! - `highscores`: Leaderboard of finished runs

pub mod audio;
pub mod frontend;
pub mod highscores;
pub mod sim;
pub mod tuning;

pub use audio::Cue;
pub use frontend::{Frontend, Hud, Sprite, SpriteKind, present, run_frame};
pub use highscores::HighScores;
pub use tuning::{SpawnCurve, Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Nominal frame time (the game is tuned for 60 FPS)
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Projectiles (per-frame speed, not scaled by dt)
    pub const PROJECTILE_RADIUS: f32 = 5.0;
    pub const PROJECTILE_SPEED: f32 = 15.0;

    /// Player sprite footprint
    pub const PLAYER_WIDTH: f32 = 64.0;
    pub const PLAYER_HEIGHT: f32 = 57.0;
    /// Pixels per frame per input axis
    pub const PLAYER_SPEED: f32 = 5.0;

    /// Shield economy
    pub const SHIELD_RADIUS: f32 = 80.0;
    pub const SHIELD_MAX_ENERGY: f32 = 100.0;
    pub const SHIELD_DRAIN_RATE: f32 = 30.0;
    pub const SHIELD_RECHARGE_RATE: f32 = 10.0;

    /// Damage windows
    pub const INVULNERABILITY_SECS: f32 = 2.0;
    pub const COLLISION_COOLDOWN_SECS: f32 = 0.5;

    /// Asteroid contact response
    pub const KNOCKBACK_DISTANCE: f32 = 20.0;
    pub const KNOCKBACK_DAMPING: f32 = 0.7;

    /// Asteroids
    pub const ASTEROID_RADIUS: f32 = 30.0;
    /// Asteroids may drift this far past the arena before despawning
    pub const ASTEROID_DESPAWN_MARGIN: f32 = 100.0;

    /// Alien body rectangle
    pub const ALIEN_WIDTH: f32 = 60.0;
    pub const ALIEN_HEIGHT: f32 = 61.0;

    /// Logic gates
    pub const GATE_RADIUS: f32 = 40.0;
    /// Below this many seconds left, gates start flashing
    pub const GATE_FLASH_THRESHOLD: f32 = 2.0;

    /// Boss core
    pub const BOSS_MAX_HEALTH: u32 = 100;
    pub const BOSS_CORE_RADIUS: f32 = 70.0;
    /// Distance of the laser emitters from the core (for drawing)
    pub const LASER_RING_RADIUS: f32 = 120.0;

    /// Post-level menu button
    pub const MENU_BUTTON_WIDTH: f32 = 200.0;
    pub const MENU_BUTTON_HEIGHT: f32 = 50.0;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
