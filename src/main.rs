//! UFO Shooter headless runner
//!
//! Drives the simulation with the demo pilot and logs what happens.
//!
//! Usage: `ufo-shooter [tuning.json] [seed]` (set `RUST_LOG=info` or `debug`)

use std::collections::HashMap;
use std::process::ExitCode;

use ufo_shooter::consts::FRAME_DT;
use ufo_shooter::sim::{GameState, autopilot};
use ufo_shooter::{Cue, Frontend, Hud, Sprite, Tuning, run_frame};

/// Five minutes of play at 60 FPS
const FRAME_BUDGET: u64 = 60 * 60 * 5;
/// HUD is logged this often
const HUD_EVERY: u64 = 60 * 10;

/// Frontend that only counts and logs
#[derive(Default)]
struct LogFrontend {
    frames: u64,
    sprites_drawn: u64,
    cues: HashMap<Cue, u32>,
    last_level: u32,
}

impl Frontend for LogFrontend {
    fn draw(&mut self, _sprite: &Sprite) {
        self.sprites_drawn += 1;
    }

    fn play(&mut self, cue: Cue) {
        log::trace!("cue: {}", cue.as_str());
        *self.cues.entry(cue).or_default() += 1;
    }

    fn hud(&mut self, hud: &Hud) {
        self.frames += 1;
        if hud.level != self.last_level || self.frames % HUD_EVERY == 0 {
            self.last_level = hud.level;
            log::info!(
                "L{} {:?} score={} lives={} shield={:.0} target={:?} boss={:?}",
                hud.level,
                hud.phase,
                hud.score,
                hud.lives,
                hud.shield_energy,
                hud.target,
                hud.boss_health
            );
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) => match Tuning::load(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => Tuning::default(),
    };
    let seed = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            log::error!("seed must be an unsigned integer: {}", e);
            return ExitCode::FAILURE;
        }
        None => 0x5eed,
    };

    log::info!("UFO Shooter (headless) starting, seed={}", seed);

    let mut state = GameState::with_tuning(seed, tuning);
    let mut frontend = LogFrontend::default();
    for _ in 0..FRAME_BUDGET {
        let input = autopilot(&state);
        run_frame(&mut state, &input, FRAME_DT, &mut frontend);
    }

    log::info!(
        "Finished: level {} score={} high score={} sprites drawn={}",
        state.level.number(),
        state.score,
        state.high_score,
        frontend.sprites_drawn
    );
    let mut cues: Vec<_> = frontend.cues.iter().collect();
    cues.sort_by_key(|(cue, _)| cue.as_str());
    for (cue, count) in cues {
        log::info!("  {:>10}: {}", cue.as_str(), count);
    }
    match serde_json::to_string_pretty(&state.high_scores) {
        Ok(json) => log::info!("Leaderboard: {}", json),
        Err(e) => log::warn!("Could not serialize leaderboard: {}", e),
    }

    ExitCode::SUCCESS
}
