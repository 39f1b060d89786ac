//! Presentation boundary
//!
//! After each step the simulation hands a frontend three things: a pose for
//! every visible entity, the cues raised this frame, and a HUD snapshot.
//! Textures, audio playback, windowing and text layout live behind the trait.

use glam::Vec2;

use crate::audio::Cue;
use crate::sim::{GameState, GamePhase, GateKind, LaserCondition, Level, TickInput, tick};

/// What an entity is, with whatever the renderer needs to label it
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpriteKind {
    Player { shielded: bool },
    PlayerShot,
    Asteroid,
    Alien,
    AlienShot,
    Gate {
        kind: GateKind,
        input_a: bool,
        input_b: bool,
        timer: f32,
    },
    BossCore { health: u32 },
    Laser { condition: LaserCondition, lethal: bool },
    /// Marker left by the last boss gate answer
    Feedback { expected: bool, correct: bool },
}

/// One drawable entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub kind: SpriteKind,
    pub pos: Vec2,
    /// Degrees
    pub rotation: f32,
    pub active: bool,
    pub vulnerable: bool,
    pub flashing: bool,
}

impl Sprite {
    fn at(kind: SpriteKind, pos: Vec2) -> Self {
        Self {
            kind,
            pos,
            rotation: 0.0,
            active: true,
            vulnerable: false,
            flashing: false,
        }
    }
}

/// Numbers shown on screen
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub score: u32,
    pub lives: u32,
    pub high_score: u32,
    pub level: u32,
    pub phase: GamePhase,
    pub shield_energy: f32,
    /// Score that clears the level (levels 1 and 2)
    pub target: Option<u32>,
    /// Lives the next level would start with, once the target is met
    pub projected_lives: Option<u32>,
    /// Core health, once the core is fighting
    pub boss_health: Option<u32>,
    /// Core logic state (A, B), once the core is fighting
    pub logic: Option<(bool, bool)>,
}

impl Hud {
    pub fn from_state(state: &GameState) -> Self {
        let target = state.next_target();
        let projected_lives = target
            .filter(|_| state.target_met())
            .map(|_| state.carry_over_lives(state.score));
        let core = state
            .boss
            .as_ref()
            .filter(|_| state.level == Level::Boss && state.puzzle.boss_phase);

        Self {
            score: state.score,
            lives: state.lives,
            high_score: state.high_score,
            level: state.level.number(),
            phase: state.phase,
            shield_energy: state.player.shield_energy,
            target,
            projected_lives,
            boss_health: core.map(|c| c.health),
            logic: core.map(|c| (c.logic_a, c.logic_b)),
        }
    }
}

/// Receives the output of each frame
pub trait Frontend {
    fn draw(&mut self, sprite: &Sprite);
    fn play(&mut self, cue: Cue);
    fn hud(&mut self, _hud: &Hud) {}
}

/// Snapshot every visible entity, back to front
pub fn sprites(state: &GameState) -> Vec<Sprite> {
    let mut out = Vec::new();

    for rock in &state.asteroids {
        out.push(Sprite {
            rotation: rock.rotation,
            active: rock.active,
            ..Sprite::at(SpriteKind::Asteroid, rock.pos)
        });
    }

    for alien in &state.aliens {
        out.push(Sprite {
            active: alien.active,
            ..Sprite::at(SpriteKind::Alien, alien.pos)
        });
        for shot in &alien.shots {
            out.push(Sprite {
                active: shot.active,
                ..Sprite::at(SpriteKind::AlienShot, shot.pos)
            });
        }
    }

    let gates = state.puzzle.gates.iter().chain(
        state
            .boss
            .iter()
            .filter(|_| state.puzzle.boss_phase)
            .flat_map(|core| core.gates.iter()),
    );
    for gate in gates {
        let kind = SpriteKind::Gate {
            kind: gate.kind,
            input_a: gate.input_a,
            input_b: gate.input_b,
            timer: gate.timer,
        };
        out.push(Sprite {
            flashing: gate.flashing,
            ..Sprite::at(kind, gate.pos)
        });
    }

    if let Some(core) = state.boss.as_ref().filter(|_| state.puzzle.boss_phase) {
        if !core.is_defeated() {
            out.push(Sprite {
                vulnerable: core.vulnerable,
                ..Sprite::at(SpriteKind::BossCore { health: core.health }, core.pos)
            });
        }
        for (i, laser) in core.lasers.iter().enumerate() {
            let lethal = laser.is_lethal(core.logic_a, core.logic_b);
            let kind = SpriteKind::Laser {
                condition: laser.condition,
                lethal,
            };
            out.push(Sprite {
                flashing: lethal,
                ..Sprite::at(kind, core.laser_anchor(i))
            });
        }
        if let Some(feedback) = core.feedback {
            let kind = SpriteKind::Feedback {
                expected: feedback.expected,
                correct: feedback.correct,
            };
            out.push(Sprite::at(kind, feedback.pos));
        }
    }

    let player = &state.player;
    out.push(Sprite {
        flashing: player.invulnerable,
        ..Sprite::at(
            SpriteKind::Player {
                shielded: player.shield_active,
            },
            player.pos,
        )
    });
    for shot in &player.shots {
        out.push(Sprite {
            active: shot.active,
            ..Sprite::at(SpriteKind::PlayerShot, shot.pos)
        });
    }

    out
}

/// Hand this frame's cues, sprites and HUD to the frontend
pub fn present(state: &mut GameState, frontend: &mut impl Frontend) {
    for cue in state.cues.drain(..) {
        frontend.play(cue);
    }
    for sprite in sprites(state) {
        frontend.draw(&sprite);
    }
    frontend.hud(&Hud::from_state(state));
}

/// Step the simulation, then present the result
pub fn run_frame(state: &mut GameState, input: &TickInput, dt: f32, frontend: &mut impl Frontend) {
    tick(state, input, dt);
    present(state, frontend);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_DT;
    use crate::sim::Laser;

    #[derive(Default)]
    struct Recorder {
        sprites: Vec<Sprite>,
        cues: Vec<Cue>,
        huds: Vec<Hud>,
    }

    impl Frontend for Recorder {
        fn draw(&mut self, sprite: &Sprite) {
            self.sprites.push(*sprite);
        }

        fn play(&mut self, cue: Cue) {
            self.cues.push(cue);
        }

        fn hud(&mut self, hud: &Hud) {
            self.huds.push(hud.clone());
        }
    }

    #[test]
    fn test_present_drains_cues() {
        let mut state = GameState::new(3);
        let mut recorder = Recorder::default();
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        run_frame(&mut state, &fire, FRAME_DT, &mut recorder);

        assert_eq!(recorder.cues, vec![Cue::ShotFired]);
        assert!(state.cues.is_empty());
        assert!(recorder
            .sprites
            .iter()
            .any(|s| s.kind == SpriteKind::PlayerShot));
        assert_eq!(recorder.huds.len(), 1);
    }

    #[test]
    fn test_hud_targets_and_projection() {
        let mut state = GameState::new(3);
        let hud = Hud::from_state(&state);
        assert_eq!(hud.target, Some(500));
        assert_eq!(hud.projected_lives, None);
        assert_eq!(hud.level, 1);

        state.score = 730;
        let hud = Hud::from_state(&state);
        assert_eq!(hud.projected_lives, Some(7));
        assert_eq!(hud.boss_health, None);

        state.start_level(Level::Boss);
        assert_eq!(Hud::from_state(&state).target, None);
        state.puzzle.boss_phase = true;
        assert_eq!(Hud::from_state(&state).boss_health, Some(100));
    }

    #[test]
    fn test_boss_sprites() {
        let mut state = GameState::new(3);
        state.start_level(Level::Boss);
        state.puzzle.boss_phase = true;
        if let Some(core) = state.boss.as_mut() {
            core.logic_a = true;
            core.logic_b = true;
            core.lasers = vec![
                Laser::new(LaserCondition::AAndB, 1.0),
                Laser::new(LaserCondition::NotA, 1.0),
            ];
        }

        let sprites = sprites(&state);
        let lasers: Vec<_> = sprites
            .iter()
            .filter_map(|s| match s.kind {
                SpriteKind::Laser { lethal, .. } => Some(lethal),
                _ => None,
            })
            .collect();
        assert_eq!(lasers, vec![true, false]);
        assert!(sprites
            .iter()
            .any(|s| matches!(s.kind, SpriteKind::BossCore { health: 100 })));
        // The player is drawn above hazards
        assert!(matches!(
            sprites.last().map(|s| s.kind),
            Some(SpriteKind::Player { .. })
        ));
    }
}
