//! Frame-stepped simulation module
//!
//! All gameplay logic lives here:
//! - One step per rendered frame, every timer advanced by the same dt
//! - Randomness only through `RandomSource`
//! - Entities are flagged inactive during scans and reaped afterwards
//! - No rendering or audio dependencies (cues are queued, never played)

pub mod autopilot;
pub mod boss;
pub mod collision;
pub mod hazards;
pub mod logic;
pub mod player;
pub mod projectile;
pub mod rng;
pub mod state;
pub mod tick;

pub use autopilot::autopilot;
pub use boss::{BossHit, Feedback, QuantumCore};
pub use collision::{Arena, Rect, circle_rect_overlap, circles_overlap};
pub use hazards::{Alien, Asteroid};
pub use logic::{BinaryGate, GateKind, GateVerdict, Laser, LaserCondition};
pub use player::Player;
pub use projectile::{Aim, Projectile, Transient, reap};
pub use rng::RandomSource;
pub use state::{GamePhase, GameState, Level, PuzzleStage};
pub use tick::{TickInput, tick};
