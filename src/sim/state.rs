//! Session state: levels, lives, score and the entities of the active level

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::boss::QuantumCore;
use super::collision::{Arena, Rect};
use super::hazards::{Alien, Asteroid};
use super::logic::BinaryGate;
use super::player::Player;
use crate::audio::Cue;
use crate::consts::{MENU_BUTTON_HEIGHT, MENU_BUTTON_WIDTH};
use crate::highscores::HighScores;
use crate::tuning::Tuning;

/// The three encounters, played in a loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    Asteroids,
    Aliens,
    Boss,
}

impl Level {
    pub fn next(self) -> Self {
        match self {
            Level::Asteroids => Level::Aliens,
            Level::Aliens => Level::Boss,
            Level::Boss => Level::Asteroids,
        }
    }

    /// 1-based level number for display
    pub fn number(self) -> u32 {
        match self {
            Level::Asteroids => 1,
            Level::Aliens => 2,
            Level::Boss => 3,
        }
    }

    pub fn is_final(self) -> bool {
        self == Level::Boss
    }
}

/// Session overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    LevelComplete,
    GameOver,
}

/// Level-3 puzzle progress
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PuzzleStage {
    /// Live puzzle gates (pre-boss only)
    pub gates: Vec<BinaryGate>,
    /// Seconds since the last puzzle gate spawned
    pub gate_timer: f32,
    pub gates_solved: u32,
    /// The core is fighting back
    pub boss_phase: bool,
    pub boss_defeated: bool,
}

/// Complete game session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub arena: Arena,
    pub(crate) rng: Pcg32,
    pub level: Level,
    pub phase: GamePhase,
    pub score: u32,
    pub lives: u32,
    pub high_score: u32,
    /// Score at the last level completion
    pub banked_score: u32,
    /// Seconds spent in the current level
    pub game_timer: f32,
    /// Seconds since the last hazard spawn
    pub spawn_timer: f32,
    /// Frames since the run started
    pub frame: u64,
    pub player: Player,
    pub asteroids: Vec<Asteroid>,
    pub aliens: Vec<Alien>,
    pub puzzle: PuzzleStage,
    /// Present exactly while on the boss level
    pub boss: Option<QuantumCore>,
    /// Cues raised since the last `present`
    pub cues: Vec<Cue>,
    pub high_scores: HighScores,
}

impl GameState {
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        if let Err(e) = tuning.validate() {
            log::warn!("Running with suspect tuning: {}", e);
        }
        let arena = tuning.arena();
        let lives = tuning.starting_lives;
        let mut state = Self {
            seed,
            tuning,
            arena,
            rng: Pcg32::seed_from_u64(seed),
            level: Level::Asteroids,
            phase: GamePhase::Playing,
            score: 0,
            lives,
            high_score: 0,
            banked_score: 0,
            game_timer: 0.0,
            spawn_timer: 0.0,
            frame: 0,
            player: Player::new(&arena),
            asteroids: Vec::new(),
            aliens: Vec::new(),
            puzzle: PuzzleStage::default(),
            boss: None,
            cues: Vec::new(),
            high_scores: HighScores::new(),
        };
        state.start_level(Level::Asteroids);
        state
    }

    /// Reset every level-local collection and timer, then begin `level`
    pub fn start_level(&mut self, level: Level) {
        self.level = level;
        self.phase = GamePhase::Playing;
        self.game_timer = 0.0;
        self.spawn_timer = 0.0;
        self.player = Player::new(&self.arena);
        self.asteroids.clear();
        self.aliens.clear();
        self.puzzle = PuzzleStage::default();
        self.boss = match level {
            Level::Boss => Some(QuantumCore::new(&mut self.rng, &self.arena)),
            _ => None,
        };
        log::info!(
            "Level {} start: score={}, lives={}",
            level.number(),
            self.score,
            self.lives
        );
    }

    /// Lives granted for the next level at `score`
    pub fn carry_over_lives(&self, score: u32) -> u32 {
        score
            .checked_div(self.tuning.lives_per_points)
            .unwrap_or(0)
            .max(1)
    }

    /// Score that clears the current level, if it is score-based
    pub fn next_target(&self) -> Option<u32> {
        match self.level {
            Level::Asteroids => Some(self.tuning.level_one_target),
            Level::Aliens => Some(self.banked_score + self.tuning.level_two_margin),
            Level::Boss => None,
        }
    }

    /// Whether the current level's advancement condition holds
    pub fn target_met(&self) -> bool {
        match self.next_target() {
            Some(target) => self.score >= target,
            None => self.puzzle.boss_defeated && self.aliens.is_empty(),
        }
    }

    /// Move on from a completed level 1 or 2
    pub fn advance_level(&mut self) {
        if self.phase != GamePhase::LevelComplete {
            log::warn!("advance_level ignored outside LevelComplete");
            return;
        }
        if self.level.is_final() {
            self.restart();
            return;
        }
        self.lives = self.carry_over_lives(self.score);
        self.start_level(self.level.next());
    }

    /// Fresh run; the high score and leaderboard survive
    pub fn restart(&mut self) {
        log::info!("Restart (high score {})", self.high_score);
        self.score = 0;
        self.lives = self.tuning.starting_lives;
        self.banked_score = 0;
        self.frame = 0;
        self.cues.clear();
        self.start_level(Level::Asteroids);
    }

    /// The post-level button
    pub fn menu_button(&self) -> Rect {
        Rect::new(
            self.arena.width / 2.0 - MENU_BUTTON_WIDTH / 2.0,
            self.arena.height / 2.0 + 50.0,
            MENU_BUTTON_WIDTH,
            MENU_BUTTON_HEIGHT,
        )
    }

    /// Handle a click while a menu is showing
    pub fn click_menu(&mut self, at: Vec2) {
        if self.phase == GamePhase::Playing || !self.menu_button().contains(at) {
            return;
        }
        match self.phase {
            GamePhase::LevelComplete if !self.level.is_final() => self.advance_level(),
            _ => self.restart(),
        }
    }

    /// Apply a collision to the player; takes a life only if it lands
    pub(crate) fn damage_player(&mut self) -> bool {
        if self.player.hit() {
            self.lose_life();
            true
        } else {
            false
        }
    }

    /// Unconditional life loss
    pub(crate) fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.cues.push(Cue::LifeLost);
        log::debug!("Life lost, {} left", self.lives);
    }

    pub(crate) fn award(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// End-of-frame outcome check
    pub(crate) fn settle_outcome(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        if self.lives == 0 {
            if self.target_met() {
                self.complete_level();
            } else {
                self.game_over();
            }
        } else if self.level == Level::Boss && self.target_met() {
            self.complete_level();
        }
    }

    fn complete_level(&mut self) {
        self.phase = GamePhase::LevelComplete;
        self.banked_score = self.score;
        self.high_score = self.high_score.max(self.score);
        log::info!(
            "Level {} complete: score={}, next lives={}",
            self.level.number(),
            self.score,
            self.carry_over_lives(self.score)
        );
        if self.level.is_final() {
            self.record_run();
        }
    }

    fn game_over(&mut self) {
        self.phase = GamePhase::GameOver;
        self.high_score = self.high_score.max(self.score);
        log::info!(
            "Game over on level {}: score={}, high score={}",
            self.level.number(),
            self.score,
            self.high_score
        );
        self.record_run();
    }

    fn record_run(&mut self) {
        if let Some(rank) = self.high_scores.add_score(self.score, self.level, self.frame) {
            log::info!("Leaderboard rank #{} with {}", rank, self.score);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session() {
        let state = GameState::new(1);
        assert_eq!(state.level, Level::Asteroids);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.lives, 5);
        assert_eq!(state.score, 0);
        assert!(state.boss.is_none());
        assert_eq!(state.player.pos, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_carry_over_lives() {
        let state = GameState::new(1);
        assert_eq!(state.carry_over_lives(0), 1);
        assert_eq!(state.carry_over_lives(250), 2);
        assert_eq!(state.carry_over_lives(999), 9);
    }

    #[test]
    fn test_zero_lives_per_points_floors_to_one() {
        let tuning = Tuning {
            lives_per_points: 0,
            ..Default::default()
        };
        let mut state = GameState::with_tuning(1, tuning);
        assert_eq!(state.carry_over_lives(900), 1);

        state.score = 600;
        state.lives = 0;
        state.settle_outcome();
        assert_eq!(state.phase, GamePhase::LevelComplete);
        state.advance_level();
        assert_eq!(state.lives, 1);
    }

    #[test]
    fn test_level_cycle() {
        assert_eq!(Level::Asteroids.next(), Level::Aliens);
        assert_eq!(Level::Aliens.next(), Level::Boss);
        assert_eq!(Level::Boss.next(), Level::Asteroids);
        assert_eq!(Level::Boss.number(), 3);
    }

    #[test]
    fn test_level_one_threshold() {
        let mut state = GameState::new(1);
        state.score = 500;
        state.lives = 0;
        state.settle_outcome();
        assert_eq!(state.phase, GamePhase::LevelComplete);
        assert_eq!(state.banked_score, 500);
        assert_eq!(state.high_score, 500);

        let mut state = GameState::new(1);
        state.score = 499;
        state.lives = 0;
        state.settle_outcome();
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.high_score, 499);
        assert_eq!(state.high_scores.top_score(), Some(499));
    }

    #[test]
    fn test_level_two_threshold_is_relative_to_bank() {
        let mut state = GameState::new(1);
        state.score = 620;
        state.lives = 0;
        state.settle_outcome();
        state.advance_level();
        assert_eq!(state.level, Level::Aliens);
        assert_eq!(state.lives, 6);
        assert_eq!(state.next_target(), Some(1120));

        state.score = 1119;
        assert!(!state.target_met());
        state.score = 1120;
        state.lives = 0;
        state.settle_outcome();
        assert_eq!(state.phase, GamePhase::LevelComplete);
    }

    #[test]
    fn test_advance_requires_completion() {
        let mut state = GameState::new(1);
        state.advance_level();
        assert_eq!(state.level, Level::Asteroids);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_entering_boss_level_builds_core() {
        let mut state = GameState::new(1);
        state.level = Level::Aliens;
        state.phase = GamePhase::LevelComplete;
        state.score = 50;
        state.advance_level();
        assert_eq!(state.level, Level::Boss);
        assert_eq!(state.lives, 1);
        let core = state.boss.as_ref().expect("core on level 3");
        assert_eq!(core.health, 100);
        assert!(!state.puzzle.boss_phase);
    }

    #[test]
    fn test_restart_keeps_high_score() {
        let mut state = GameState::new(1);
        state.score = 300;
        state.lives = 0;
        state.settle_outcome();
        state.restart();
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 5);
        assert_eq!(state.level, Level::Asteroids);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.high_score, 300);
        assert_eq!(state.high_scores.entries.len(), 1);
    }

    #[test]
    fn test_menu_click() {
        let mut state = GameState::new(1);
        assert_eq!(state.menu_button(), Rect::new(300.0, 350.0, 200.0, 50.0));

        state.score = 500;
        state.lives = 0;
        state.settle_outcome();

        // Miss the button
        state.click_menu(Vec2::new(10.0, 10.0));
        assert_eq!(state.phase, GamePhase::LevelComplete);

        state.click_menu(Vec2::new(400.0, 375.0));
        assert_eq!(state.level, Level::Aliens);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.lives, 5);
    }

    #[test]
    fn test_boss_level_completes_with_lives_left() {
        let mut state = GameState::new(1);
        state.start_level(Level::Boss);
        state.puzzle.boss_defeated = true;
        state.settle_outcome();
        assert_eq!(state.phase, GamePhase::LevelComplete);

        // Final level menu restarts the run
        state.click_menu(state.menu_button().center());
        assert_eq!(state.level, Level::Asteroids);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_damage_respects_player_windows() {
        let mut state = GameState::new(1);
        assert!(state.damage_player());
        assert!(!state.damage_player());
        assert_eq!(state.lives, 4);
        assert_eq!(state.cues, vec![Cue::LifeLost]);
    }
}
