//! Game balance, loadable from JSON
//!
//! Every field has a default, so a tuning file only needs to list the
//! values it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};
use crate::sim::Arena;

/// Spawn interval that shrinks linearly with elapsed level time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnCurve {
    /// Interval at t = 0 (seconds)
    pub start: f32,
    /// Interval never drops below this
    pub floor: f32,
    /// Seconds of play that remove one second of interval
    pub ramp_secs: f32,
}

impl SpawnCurve {
    pub fn interval(&self, elapsed: f32) -> f32 {
        (self.start - elapsed / self.ramp_secs).max(self.floor)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub arena_width: f32,
    pub arena_height: f32,
    pub starting_lives: u32,

    // === Progression ===
    /// Score needed to clear level 1
    pub level_one_target: u32,
    /// Points over the banked score needed to clear level 2
    pub level_two_margin: u32,
    /// Carry-over: one life per this many points (minimum one)
    pub lives_per_points: u32,

    // === Scoring ===
    pub asteroid_points: u32,
    pub alien_points: u32,
    pub gate_points: u32,
    pub boss_hit_points: u32,
    pub boss_defeat_points: u32,

    // === Spawning ===
    pub asteroid_spawn: SpawnCurve,
    pub alien_spawn: SpawnCurve,
    /// Gates to solve before the boss appears
    pub puzzle_gate_count: u32,
    /// Seconds between extra puzzle gates
    pub puzzle_gate_interval: f32,
    /// Seconds a puzzle gate stays answerable
    pub puzzle_gate_time: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            starting_lives: 5,
            level_one_target: 500,
            level_two_margin: 500,
            lives_per_points: 100,
            asteroid_points: 10,
            alien_points: 20,
            gate_points: 100,
            boss_hit_points: 50,
            boss_defeat_points: 1000,
            asteroid_spawn: SpawnCurve {
                start: 1.0,
                floor: 0.3,
                ramp_secs: 60.0,
            },
            alien_spawn: SpawnCurve {
                start: 2.0,
                floor: 0.5,
                ramp_secs: 60.0,
            },
            puzzle_gate_count: 7,
            puzzle_gate_interval: 5.0,
            puzzle_gate_time: 10.0,
        }
    }
}

impl Tuning {
    pub fn arena(&self) -> Arena {
        Arena::new(self.arena_width, self.arena_height)
    }

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read, parse and validate a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.arena_width > 0.0 && self.arena_height > 0.0) {
            return Err(TuningError::invalid("arena", "dimensions must be positive"));
        }
        if self.lives_per_points == 0 {
            return Err(TuningError::invalid("lives_per_points", "must be non-zero"));
        }
        if self.puzzle_gate_count == 0 {
            return Err(TuningError::invalid("puzzle_gate_count", "must be non-zero"));
        }
        if !(self.puzzle_gate_time > 0.0) {
            return Err(TuningError::invalid("puzzle_gate_time", "must be positive"));
        }
        if !(self.puzzle_gate_interval > 0.0) {
            return Err(TuningError::invalid("puzzle_gate_interval", "must be positive"));
        }
        for (field, curve) in [
            ("asteroid_spawn", &self.asteroid_spawn),
            ("alien_spawn", &self.alien_spawn),
        ] {
            if !(curve.floor > 0.0) {
                return Err(TuningError::invalid(field, "floor must be positive"));
            }
            if !(curve.ramp_secs > 0.0) {
                return Err(TuningError::invalid(field, "ramp_secs must be positive"));
            }
            if curve.start < curve.floor {
                log::warn!("{} starts below its floor; the floor wins", field);
            }
        }
        if self.starting_lives == 0 {
            log::warn!("starting_lives is 0; every run ends on the first frame");
        }
        Ok(())
    }
}

/// Failure to load a tuning file
#[derive(Error, Debug)]
pub enum TuningError {
    #[error("cannot read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl TuningError {
    fn invalid(field: &'static str, reason: &'static str) -> Self {
        TuningError::Invalid { field, reason }
    }
}
