//! Per-frame simulation step
//!
//! Order within a frame: menu handling, timers and spawns, kinematics,
//! collisions, player update, reap, outcome check.

use glam::Vec2;

use super::boss::BossHit;
use super::collision::{circle_rect_overlap, circles_overlap, separation_axis};
use super::hazards::{Alien, Asteroid};
use super::logic::{BinaryGate, GateKind, GateVerdict};
use super::projectile::{Transient, reap};
use super::rng::RandomSource;
use super::state::{GamePhase, GameState, Level};
use crate::audio::Cue;
use crate::consts::*;

/// Input intents for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Desired movement; each axis is clamped to [-1, 1]
    pub movement: Vec2,
    /// Aim point in arena coordinates (keeps the previous one when None)
    pub aim: Option<Vec2>,
    /// Fire pressed this frame
    pub fire: bool,
    /// Shield held
    pub shield: bool,
    /// Menu click position
    pub click: Option<Vec2>,
}

/// Advance the session by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.phase != GamePhase::Playing {
        if let Some(at) = input.click {
            state.click_menu(at);
        }
        return;
    }

    state.frame += 1;
    state.game_timer += dt;
    state.spawn_timer += dt;

    match state.level {
        Level::Asteroids => step_asteroids(state),
        Level::Aliens => step_aliens(state, dt),
        Level::Boss => step_boss(state, dt),
    }

    let arena = state.arena;
    state.player.update(dt, input, &arena, &mut state.cues);

    state.settle_outcome();
}

fn step_asteroids(state: &mut GameState) {
    let interval = state.tuning.asteroid_spawn.interval(state.game_timer);
    if state.spawn_timer >= interval {
        state.spawn_timer = 0.0;
        let rock = Asteroid::spawn(&mut state.rng, &state.arena);
        log::debug!("Asteroid spawned at ({:.0}, {:.0})", rock.pos.x, rock.pos.y);
        state.asteroids.push(rock);
    }

    let arena = state.arena;
    for rock in state.asteroids.iter_mut().filter(|r| r.active) {
        rock.update(&arena);
    }

    // Player shots vs asteroids
    let mut kills = 0;
    for shot in state.player.shots.iter_mut().filter(|s| s.active) {
        if let Some(rock) = state
            .asteroids
            .iter_mut()
            .find(|r| r.active && circles_overlap(shot.pos, shot.radius, r.pos, r.radius))
        {
            shot.active = false;
            rock.active = false;
            kills += 1;
        }
    }
    for _ in 0..kills {
        state.award(state.tuning.asteroid_points);
        state.cues.push(Cue::Explosion);
    }

    // First asteroid touching an exposed player knocks both apart
    let mut struck = false;
    if state.player.is_exposed() {
        let radius = state.player.hit_radius();
        let player_pos = state.player.pos;
        if let Some(rock) = state
            .asteroids
            .iter_mut()
            .find(|r| r.active && circles_overlap(player_pos, radius, r.pos, r.radius))
        {
            // Coincident centres have no axis to push along
            if let Some(axis) = separation_axis(player_pos, rock.pos) {
                rock.pos -= axis * KNOCKBACK_DISTANCE;
                rock.vel *= KNOCKBACK_DAMPING;
                state.player.shove(axis * KNOCKBACK_DISTANCE, &arena);
            }
            struck = true;
        }
    }
    if struck {
        state.damage_player();
    }

    reap(&mut state.asteroids);
}

fn step_aliens(state: &mut GameState, dt: f32) {
    let interval = state.tuning.alien_spawn.interval(state.game_timer);
    if state.spawn_timer >= interval {
        state.spawn_timer = 0.0;
        let alien = Alien::spawn(&mut state.rng, &state.arena);
        log::debug!("Alien spawned at y={:.0}", alien.pos.y);
        state.aliens.push(alien);
    }

    update_aliens(state, dt);
    resolve_alien_collisions(state);
}

fn step_boss(state: &mut GameState, dt: f32) {
    update_aliens(state, dt);
    if state.puzzle.boss_phase {
        step_core(state, dt);
    } else {
        step_puzzle(state, dt);
    }
    resolve_alien_collisions(state);
}

fn update_aliens(state: &mut GameState, dt: f32) {
    let target = state.player.pos;
    let arena = state.arena;
    for alien in state.aliens.iter_mut().filter(|a| a.active) {
        alien.update(dt, target, &arena, &mut state.rng);
    }
}

/// Alien bodies and alien shots vs the player, player shots vs aliens
fn resolve_alien_collisions(state: &mut GameState) {
    let mut kills = 0;
    for shot in state.player.shots.iter_mut().filter(|s| s.active) {
        if let Some(alien) = state
            .aliens
            .iter_mut()
            .find(|a| a.active && circle_rect_overlap(shot.pos, shot.radius, &a.body()))
        {
            shot.active = false;
            alien.active = false;
            kills += 1;
        }
    }
    for _ in 0..kills {
        state.award(state.tuning.alien_points);
        state.cues.push(Cue::Explosion);
    }

    let player_pos = state.player.pos;
    let radius = state.player.hit_radius();

    let rammed = state.player.is_exposed()
        && state
            .aliens
            .iter()
            .any(|a| a.active && circle_rect_overlap(player_pos, radius, &a.body()));

    let mut shot_hits = 0;
    for alien in &mut state.aliens {
        for shot in alien.shots.iter_mut().filter(|s| s.active) {
            if circles_overlap(shot.pos, shot.radius, player_pos, radius) {
                shot.active = false;
                shot_hits += 1;
            }
        }
        reap(&mut alien.shots);
    }

    if rammed {
        state.damage_player();
    }
    for _ in 0..shot_hits {
        state.damage_player();
    }

    reap(&mut state.aliens);
}

/// Level-3 puzzle stage: gates must be answered before the core fights
fn step_puzzle(state: &mut GameState, dt: f32) {
    let tuning = &state.tuning;
    let cap = tuning.puzzle_gate_count as usize;
    let (interval, time_limit) = (tuning.puzzle_gate_interval, tuning.puzzle_gate_time);

    state.puzzle.gate_timer += dt;
    let live = state.puzzle.gates.len();
    if live == 0 || (state.puzzle.gate_timer >= interval && live < cap) {
        let arena = state.arena;
        let pos = Vec2::new(
            state.rng.uniform_int(100, arena.width as i32 - 100) as f32,
            state.rng.uniform_int(150, arena.height as i32 - 150) as f32,
        );
        let kind = state.rng.pick(&GateKind::PUZZLE);
        state
            .puzzle
            .gates
            .push(BinaryGate::spawn(pos, kind, time_limit, &mut state.rng));
        state.puzzle.gate_timer = 0.0;
        log::debug!("Puzzle gate {} at ({:.0}, {:.0})", kind.label(), pos.x, pos.y);
    }

    for gate in &mut state.puzzle.gates {
        gate.update(dt);
    }

    let mut correct = 0;
    let mut wrong = 0;
    for shot in state.player.shots.iter_mut().filter(|s| s.active) {
        let Some(gate) = state
            .puzzle
            .gates
            .iter_mut()
            .find(|g| g.is_live() && circles_overlap(shot.pos, shot.radius, g.pos, g.radius()))
        else {
            continue;
        };
        shot.active = false;
        let answer = gate.answer_from_impact(shot.pos);
        match gate.submit(answer) {
            GateVerdict::Correct => correct += 1,
            GateVerdict::Wrong => wrong += 1,
            GateVerdict::AlreadySolved => {}
        }
        log::debug!("Gate {} answered {}", gate.kind.label(), answer as u8);
    }

    for _ in 0..correct {
        state.award(state.tuning.gate_points);
        state.cues.push(Cue::Explosion);
        state.puzzle.gates_solved += 1;
    }
    for _ in 0..wrong {
        state.lose_life();
        let alien = Alien::spawn(&mut state.rng, &state.arena);
        state.aliens.push(alien);
    }

    reap(&mut state.puzzle.gates);

    if state.puzzle.gates_solved >= state.tuning.puzzle_gate_count {
        state.puzzle.boss_phase = true;
        state.puzzle.gates.clear();
        log::info!("All {} gates solved, core awakens", state.puzzle.gates_solved);
    }
}

/// Level-3 boss stage
fn step_core(state: &mut GameState, dt: f32) {
    let Some(core) = state.boss.as_mut() else {
        return;
    };
    core.update(dt, &mut state.rng);

    let mut outcomes = Vec::new();
    for shot in state.player.shots.iter_mut().filter(|s| s.active) {
        if !core.is_defeated() && circles_overlap(shot.pos, shot.radius, core.pos, core.radius()) {
            shot.active = false;
            outcomes.push(core.hit());
            continue;
        }
        if let Some(index) = core
            .gates
            .iter()
            .position(|g| g.is_live() && circles_overlap(shot.pos, shot.radius, g.pos, g.radius()))
        {
            shot.active = false;
            let answer = core.gates[index].answer_from_impact(shot.pos);
            core.submit_gate(index, answer);
        }
    }

    let defeated = core.is_defeated();
    let touching = !defeated
        && circles_overlap(
            state.player.pos,
            state.player.hit_radius(),
            core.pos,
            core.radius(),
        );
    let lasered = core.any_laser_lethal();
    let health = core.health;

    for outcome in outcomes {
        match outcome {
            BossHit::Ignored | BossHit::Damaged => {
                state.award(state.tuning.boss_hit_points);
                log::debug!("Core hit, health {}", health);
            }
            BossHit::Defeated => {
                state.award(state.tuning.boss_defeat_points);
                state.cues.push(Cue::Explosion);
                state.puzzle.boss_defeated = true;
                log::info!("Core destroyed! score={}", state.score);
            }
        }
    }

    if touching {
        state.damage_player();
    }
    if lasered {
        state.damage_player();
    }
}
