//! Demo pilot
//!
//! Produces the same `TickInput` a human would, so a headless run exercises
//! every gameplay path without any special casing in the simulation.

use glam::Vec2;

use super::logic::BinaryGate;
use super::projectile::Transient;
use super::state::{GamePhase, GameState, Level};
use super::tick::TickInput;
use crate::consts::*;

/// Frames between shots
const FIRE_EVERY: u64 = 12;
/// Hazards closer than this get dodged
const DODGE_RANGE: f32 = 120.0;
/// Enemy shots closer than this raise the shield
const SHIELD_RANGE: f32 = 90.0;
/// Vertical standoff used when lining up on a gate
const GATE_STANDOFF: f32 = 150.0;

/// What the pilot is currently shooting at
#[derive(Debug, Clone, Copy)]
enum Target {
    /// Shoot freely at this point
    Point(Vec2),
    /// Shoot once lined up at `station`, aiming at the gate center
    Gate { station: Vec2, center: Vec2 },
}

/// Decide this frame's input from the current state
pub fn autopilot(state: &GameState) -> TickInput {
    if state.phase != GamePhase::Playing {
        return TickInput {
            click: Some(state.menu_button().center()),
            ..Default::default()
        };
    }

    let player = &state.player;
    let target = pick_target(state);

    let home = match target {
        Some(Target::Gate { station, .. }) => station,
        _ if state.level == Level::Boss => {
            Vec2::new(state.arena.width / 2.0, state.arena.height * 0.75)
        }
        _ => state.arena.center(),
    };

    // Dodge the nearest hazard, otherwise drift home
    let movement = match nearest_threat(state) {
        Some(threat) if threat.distance(player.pos) < DODGE_RANGE => {
            (player.pos - threat).normalize_or(Vec2::Y)
        }
        _ => steer(player.pos, home),
    };

    let (aim, ready) = match target {
        Some(Target::Point(p)) => (Some(p), true),
        Some(Target::Gate { station, center }) => {
            (Some(center), player.pos.distance(station) < PLAYER_SPEED * 2.0)
        }
        None => (None, false),
    };

    let incoming = state
        .aliens
        .iter()
        .flat_map(|a| a.shots.iter())
        .any(|s| s.active && s.pos.distance(player.pos) < SHIELD_RANGE);
    let laser_threat = state
        .boss
        .as_ref()
        .is_some_and(|core| state.puzzle.boss_phase && core.any_laser_lethal());

    TickInput {
        movement,
        aim,
        fire: ready && state.frame % FIRE_EVERY == 0,
        shield: incoming || laser_threat,
        click: None,
    }
}

/// Unit-ish step toward `goal`, easing off when close
fn steer(from: Vec2, goal: Vec2) -> Vec2 {
    ((goal - from) / PLAYER_SPEED).clamp(Vec2::NEG_ONE, Vec2::ONE)
}

fn nearest(from: Vec2, points: impl Iterator<Item = Vec2>) -> Option<Vec2> {
    points.min_by(|a, b| {
        a.distance_squared(from)
            .partial_cmp(&b.distance_squared(from))
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}

fn nearest_threat(state: &GameState) -> Option<Vec2> {
    let rocks = state.asteroids.iter().filter(|r| r.active).map(|r| r.pos);
    let aliens = state.aliens.iter().filter(|a| a.active).map(|a| a.pos);
    let core = state
        .boss
        .as_ref()
        .filter(|core| state.puzzle.boss_phase && !core.is_defeated())
        .map(|core| core.pos + Vec2::new(0.0, BOSS_CORE_RADIUS));
    nearest(state.player.pos, rocks.chain(aliens).chain(core))
}

/// Station above a gate for a 1, below it for a 0
fn gate_target(gate: &BinaryGate) -> Target {
    let side = if gate.correct_answer() { -1.0 } else { 1.0 };
    Target::Gate {
        station: gate.pos + Vec2::new(0.0, side * GATE_STANDOFF),
        center: gate.pos,
    }
}

fn nearest_gate<'a>(from: Vec2, gates: &'a [BinaryGate]) -> Option<&'a BinaryGate> {
    gates.iter().filter(|g| g.is_live()).min_by(|a, b| {
        a.pos
            .distance_squared(from)
            .partial_cmp(&b.pos.distance_squared(from))
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}

fn pick_target(state: &GameState) -> Option<Target> {
    let from = state.player.pos;

    // Aliens are always worth shooting first on level 2 and 3
    let alien = nearest(from, state.aliens.iter().filter(|a| a.active).map(|a| a.pos));

    match state.level {
        Level::Asteroids => {
            let rock = state
                .asteroids
                .iter()
                .filter(|r| r.active)
                .min_by(|a, b| {
                    a.pos
                        .distance_squared(from)
                        .partial_cmp(&b.pos.distance_squared(from))
                        .unwrap_or(std::cmp::Ordering::Equal)
                })?;
            // Lead the target by its travel during the shot's flight
            let flight = rock.pos.distance(from) / PROJECTILE_SPEED;
            Some(Target::Point(rock.pos + rock.vel * flight))
        }
        Level::Aliens => alien.map(Target::Point),
        Level::Boss if !state.puzzle.boss_phase => alien
            .map(Target::Point)
            .or_else(|| nearest_gate(from, &state.puzzle.gates).map(gate_target)),
        Level::Boss => {
            let core = state.boss.as_ref().filter(|c| !c.is_defeated())?;
            if core.vulnerable {
                return Some(Target::Point(core.pos));
            }
            alien
                .map(Target::Point)
                .or_else(|| nearest_gate(from, &core.gates).map(gate_target))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::logic::GateKind;
    use crate::sim::tick::tick;

    #[test]
    fn test_clicks_menu_after_level() {
        let mut state = GameState::new(9);
        state.phase = GamePhase::GameOver;
        let input = autopilot(&state);
        assert_eq!(input.click, Some(Vec2::new(400.0, 375.0)));
    }

    #[test]
    fn test_solves_gate_from_the_right_side() {
        let mut state = GameState::new(9);
        state.start_level(Level::Boss);
        state.puzzle.gates = vec![BinaryGate::with_inputs(
            Vec2::new(400.0, 420.0),
            GateKind::And,
            true,
            true,
            10.0,
        )];

        for _ in 0..120 {
            let input = autopilot(&state);
            tick(&mut state, &input, FRAME_DT);
        }
        assert!(state.puzzle.gates_solved >= 1);
        assert!(state.score >= 100);
    }

    #[test]
    fn test_long_demo_run_keeps_invariants() {
        let mut state = GameState::new(31337);
        for _ in 0..(60 * 60 * 3) {
            let input = autopilot(&state);
            tick(&mut state, &input, FRAME_DT);

            let energy = state.player.shield_energy;
            assert!((0.0..=SHIELD_MAX_ENERGY).contains(&energy));
            if let Some(core) = &state.boss {
                assert!(core.health <= BOSS_MAX_HEALTH);
                assert!(core.gates.len() <= 3);
            }
            assert!(state.puzzle.gates.len() <= state.tuning.puzzle_gate_count as usize);
            if state.phase != GamePhase::Playing {
                assert!(state.high_score >= state.score);
            }
        }
        assert!(state.frame > 0);
    }
}
