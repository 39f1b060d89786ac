//! Quantum core boss
//!
//! The core cycles a shared logic state (A, B), opens a short vulnerability
//! window on a fixed period, spawns its own logic gates, and fires lasers
//! whose lethality is decided by the current logic state.

use glam::Vec2;

use super::collision::Arena;
use super::logic::{BinaryGate, GateKind, GateVerdict, Laser, LaserCondition};
use super::projectile::reap;
use super::rng::RandomSource;
use crate::consts::*;
use crate::polar_to_cartesian;

/// Seconds before the first logic re-roll
const FIRST_LOGIC_INTERVAL: f32 = 5.0;
/// Vulnerability opens every period and stays open for the window
const VULNERABILITY_PERIOD: f32 = 8.0;
const VULNERABILITY_WINDOW: f32 = 2.0;
/// Boss gate spawning
const GATE_SPAWN_INTERVAL: f32 = 4.0;
const MAX_GATES: usize = 3;
const GATE_TIME_LIMIT: f32 = 10.0;
/// Solved gates needed to force a vulnerability window
const GATE_QUOTA: u32 = 4;
const FEEDBACK_SECS: f32 = 0.5;
/// Laser attacks
const ATTACK_INTERVAL: f32 = 3.0;
const ATTACK_DURATION: f32 = 2.5;
const SPECIAL_ATTACK_INTERVAL: f32 = 15.0;
const SPECIAL_ATTACK_DURATION: f32 = 4.0;

/// Result of a projectile striking the core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossHit {
    /// Not vulnerable (or already dead): nothing changed
    Ignored,
    Damaged,
    Defeated,
}

/// Brief marker showing how the last boss gate was answered
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Feedback {
    pub pos: Vec2,
    /// The answer the gate wanted
    pub expected: bool,
    pub correct: bool,
    pub remaining: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuantumCore {
    pub pos: Vec2,
    pub health: u32,
    pub logic_a: bool,
    pub logic_b: bool,
    pub logic_timer: f32,
    pub logic_interval: f32,
    pub vulnerable: bool,
    /// Seconds since the last vulnerability window opened
    pub vulnerability_timer: f32,
    pub gates: Vec<BinaryGate>,
    pub gate_spawn_timer: f32,
    /// Progress toward the next forced vulnerability window
    pub gates_solved: u32,
    pub feedback: Option<Feedback>,
    pub lasers: Vec<Laser>,
    pub attack_timer: f32,
    pub special_timer: f32,
}

impl QuantumCore {
    pub fn new(rng: &mut impl RandomSource, arena: &Arena) -> Self {
        Self {
            pos: Vec2::new(arena.width / 2.0, arena.height / 4.0),
            health: BOSS_MAX_HEALTH,
            logic_a: rng.coin(),
            logic_b: rng.coin(),
            logic_timer: 0.0,
            logic_interval: FIRST_LOGIC_INTERVAL,
            vulnerable: false,
            vulnerability_timer: 0.0,
            gates: Vec::new(),
            gate_spawn_timer: 0.0,
            gates_solved: 0,
            feedback: None,
            lasers: Vec::new(),
            attack_timer: 0.0,
            special_timer: 0.0,
        }
    }

    pub fn radius(&self) -> f32 {
        BOSS_CORE_RADIUS
    }

    pub fn is_defeated(&self) -> bool {
        self.health == 0
    }

    pub fn update(&mut self, dt: f32, rng: &mut impl RandomSource) {
        if self.is_defeated() {
            return;
        }

        // Logic state cycle
        self.logic_timer += dt;
        if self.logic_timer >= self.logic_interval {
            self.logic_timer = 0.0;
            self.logic_a = rng.coin();
            self.logic_b = rng.coin();
            self.logic_interval = 3.0 + rng.uniform_int(0, 4) as f32;
            log::debug!(
                "Core logic -> A={} B={} (next in {}s)",
                self.logic_a as u8,
                self.logic_b as u8,
                self.logic_interval
            );
            self.spawn_gate(rng);
        }

        // Vulnerability duty cycle
        self.vulnerability_timer += dt;
        if !self.vulnerable && self.vulnerability_timer >= VULNERABILITY_PERIOD {
            self.vulnerable = true;
            self.vulnerability_timer = 0.0;
            log::debug!("Core vulnerable");
        } else if self.vulnerable && self.vulnerability_timer >= VULNERABILITY_WINDOW {
            self.vulnerable = false;
            log::debug!("Core shielded");
        }

        // Periodic gates; the timer keeps running while capped
        self.gate_spawn_timer += dt;
        if self.gate_spawn_timer >= GATE_SPAWN_INTERVAL && self.gates.len() < MAX_GATES {
            self.spawn_gate(rng);
            self.gate_spawn_timer = 0.0;
        }

        for gate in &mut self.gates {
            gate.update(dt);
        }
        reap(&mut self.gates);

        if let Some(feedback) = &mut self.feedback {
            feedback.remaining -= dt;
            if feedback.remaining <= 0.0 {
                self.feedback = None;
            }
        }

        for laser in &mut self.lasers {
            laser.remaining -= dt;
        }
        reap(&mut self.lasers);

        self.attack_timer += dt;
        if self.attack_timer >= ATTACK_INTERVAL {
            self.attack_timer = 0.0;
            for _ in 0..2 {
                let condition = rng.pick(&LaserCondition::PLAIN);
                self.lasers.push(Laser::new(condition, ATTACK_DURATION));
            }
        }

        self.special_timer += dt;
        if self.special_timer >= SPECIAL_ATTACK_INTERVAL {
            self.special_timer = 0.0;
            let family = rng.pick(&GateKind::BOSS);
            log::debug!("Core special attack: {}", family.label());
            self.lasers.extend(
                LaserCondition::themed_set(family)
                    .into_iter()
                    .map(|condition| Laser::new(condition, SPECIAL_ATTACK_DURATION)),
            );
        }
    }

    /// Add one gate below the core unless the cap is reached
    pub fn spawn_gate(&mut self, rng: &mut impl RandomSource) {
        if self.gates.len() >= MAX_GATES {
            return;
        }
        let t = self.gate_spawn_timer;
        let offset = Vec2::new(t.cos() * 200.0, 150.0 + (t * 2.0).sin() * 100.0);
        let kind = rng.pick(&GateKind::BOSS);
        self.gates
            .push(BinaryGate::spawn(self.pos + offset, kind, GATE_TIME_LIMIT, rng));
        log::debug!("Core gate spawned: {}", kind.label());
    }

    /// Answer the gate at `index`. Every real answer starts a feedback pulse;
    /// correct answers consume the gate and count toward the quota.
    pub fn submit_gate(&mut self, index: usize, answer: bool) -> Option<GateVerdict> {
        let gate = self.gates.get_mut(index)?;
        let verdict = gate.submit(answer);
        if verdict == GateVerdict::AlreadySolved {
            return Some(verdict);
        }

        self.feedback = Some(Feedback {
            pos: gate.pos,
            expected: gate.correct_answer(),
            correct: verdict == GateVerdict::Correct,
            remaining: FEEDBACK_SECS,
        });

        if verdict == GateVerdict::Correct {
            reap(&mut self.gates);
            self.gates_solved += 1;
            if self.gates_solved >= GATE_QUOTA {
                self.gates_solved = 0;
                self.vulnerable = true;
                self.vulnerability_timer = 0.0;
                log::debug!("Gate quota met, core exposed");
            }
        }
        Some(verdict)
    }

    /// Projectile strike on the core
    pub fn hit(&mut self) -> BossHit {
        if !self.vulnerable || self.health == 0 {
            return BossHit::Ignored;
        }

        let damage = if self.health > 30 { 10 } else { 5 };
        self.health = self.health.saturating_sub(damage);
        self.vulnerable = false;
        self.vulnerability_timer = 0.0;

        if self.health == 0 {
            self.gates.clear();
            self.lasers.clear();
            BossHit::Defeated
        } else {
            BossHit::Damaged
        }
    }

    /// Any armed laser whose condition holds right now
    pub fn any_laser_lethal(&self) -> bool {
        self.lasers
            .iter()
            .any(|laser| laser.is_lethal(self.logic_a, self.logic_b))
    }

    /// Emitter position for laser `index` (evenly spaced ring around the core)
    pub fn laser_anchor(&self, index: usize) -> Vec2 {
        let slots = (self.lasers.len() + 1) as f32;
        let angle = (index as f32 * 360.0 / slots).to_radians();
        self.pos + polar_to_cartesian(LASER_RING_RADIUS, angle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn fresh_core() -> (QuantumCore, Pcg32) {
        let mut rng = Pcg32::seed_from_u64(2024);
        let core = QuantumCore::new(&mut rng, &Arena::default());
        (core, rng)
    }

    #[test]
    fn test_new_core() {
        let (core, _) = fresh_core();
        assert_eq!(core.pos, Vec2::new(400.0, 150.0));
        assert_eq!(core.health, 100);
        assert!(!core.vulnerable);
        assert_eq!(core.logic_interval, 5.0);
    }

    #[test]
    fn test_hit_from_35() {
        let (mut core, _) = fresh_core();
        core.health = 35;
        core.vulnerable = true;

        assert_eq!(core.hit(), BossHit::Damaged);
        assert_eq!(core.health, 25);
        assert!(!core.vulnerable);

        // Not re-armed yet
        assert_eq!(core.hit(), BossHit::Ignored);
        assert_eq!(core.health, 25);
    }

    #[test]
    fn test_low_health_damage_and_defeat() {
        let (mut core, _) = fresh_core();
        core.health = 30;
        core.vulnerable = true;
        assert_eq!(core.hit(), BossHit::Damaged);
        assert_eq!(core.health, 25);

        core.health = 3;
        core.vulnerable = true;
        core.gates
            .push(BinaryGate::with_inputs(Vec2::ZERO, GateKind::Nor, false, false, 10.0));
        core.lasers.push(Laser::new(LaserCondition::AOrB, 2.5));
        assert_eq!(core.hit(), BossHit::Defeated);
        assert_eq!(core.health, 0);
        assert!(core.gates.is_empty() && core.lasers.is_empty());

        // Nothing happens after defeat
        core.vulnerable = true;
        assert_eq!(core.hit(), BossHit::Ignored);
    }

    #[test]
    fn test_vulnerability_duty_cycle() {
        let (mut core, mut rng) = fresh_core();
        for _ in 0..15 {
            core.update(0.5, &mut rng);
            assert!(!core.vulnerable);
        }
        core.update(0.5, &mut rng);
        assert!(core.vulnerable, "opens at 8s");

        for _ in 0..3 {
            core.update(0.5, &mut rng);
            assert!(core.vulnerable);
        }
        core.update(0.5, &mut rng);
        assert!(!core.vulnerable, "closes after the 2s window");
    }

    #[test]
    fn test_gate_quota_forces_vulnerability() {
        let (mut core, _) = fresh_core();
        core.vulnerability_timer = 3.0;
        for i in 0..4 {
            assert!(!core.vulnerable);
            core.gates
                .push(BinaryGate::with_inputs(Vec2::new(100.0, 300.0), GateKind::Nand, true, true, 10.0));
            assert_eq!(core.submit_gate(0, false), Some(GateVerdict::Correct));
            assert!(core.gates.is_empty(), "solved gate removed immediately");
            assert_eq!(core.gates_solved, (i + 1) % 4);
        }
        assert!(core.vulnerable);
        assert_eq!(core.vulnerability_timer, 0.0);
    }

    #[test]
    fn test_wrong_answer_leaves_gate_with_feedback() {
        let (mut core, mut rng) = fresh_core();
        let pos = Vec2::new(250.0, 320.0);
        core.gates
            .push(BinaryGate::with_inputs(pos, GateKind::Not, false, false, 10.0));
        assert_eq!(core.submit_gate(0, false), Some(GateVerdict::Wrong));
        assert_eq!(core.gates.len(), 1);

        let feedback = core.feedback.expect("feedback pulse");
        assert_eq!(feedback.pos, pos);
        assert!(feedback.expected);
        assert!(!feedback.correct);

        core.update(0.6, &mut rng);
        assert!(core.feedback.is_none());
        assert_eq!(core.submit_gate(9, true), None);
    }

    #[test]
    fn test_gate_cap_and_kinds() {
        let (mut core, mut rng) = fresh_core();
        for _ in 0..(40 * 60) {
            core.update(FRAME_DT, &mut rng);
            assert!(core.gates.len() <= 3);
            for gate in &core.gates {
                assert!(GateKind::BOSS.contains(&gate.kind));
                assert!(!gate.kind.is_unary() || !gate.input_b);
            }
        }
    }

    #[test]
    fn test_special_attack_adds_themed_set() {
        let (mut core, mut rng) = fresh_core();
        core.special_timer = 14.99;
        core.update(0.02, &mut rng);
        assert_eq!(core.lasers.len(), 3);
        assert!(core.lasers.iter().all(|l| l.remaining == 4.0));
    }

    #[test]
    fn test_plain_attack_adds_two_lasers() {
        let (mut core, mut rng) = fresh_core();
        core.attack_timer = 2.99;
        core.update(0.02, &mut rng);
        assert_eq!(core.lasers.len(), 2);
        for laser in &core.lasers {
            assert!(LaserCondition::PLAIN.contains(&laser.condition));
            assert_eq!(laser.remaining, 2.5);
        }

        // Lethality follows the live logic state
        core.lasers = vec![Laser::new(LaserCondition::AAndB, 2.5)];
        core.logic_a = true;
        core.logic_b = false;
        assert!(!core.any_laser_lethal());
        core.logic_b = true;
        assert!(core.any_laser_lethal());

        core.update(2.6, &mut rng);
        assert!(core.lasers.is_empty(), "expired lasers are reaped");
    }

    #[test]
    fn test_laser_anchor_ring() {
        let (mut core, _) = fresh_core();
        core.lasers = vec![
            Laser::new(LaserCondition::NotA, 1.0),
            Laser::new(LaserCondition::NotB, 1.0),
            Laser::new(LaserCondition::AIsZero, 1.0),
        ];
        // Four slots: 0, 90, 180 degrees
        let first = core.laser_anchor(0);
        assert!((first - (core.pos + Vec2::new(120.0, 0.0))).length() < 1e-3);
        let second = core.laser_anchor(1);
        assert!((second - (core.pos + Vec2::new(0.0, 120.0))).length() < 1e-3);
    }

    proptest! {
        #[test]
        fn prop_health_stays_in_range(
            ops in proptest::collection::vec((any::<bool>(), any::<bool>(), 0.0f32..3.0), 1..300)
        ) {
            let (mut core, mut rng) = fresh_core();
            let mut last = core.health;
            for (force_open, strike, dt) in ops {
                if force_open {
                    core.vulnerable = true;
                }
                let was_vulnerable = core.vulnerable;
                if strike {
                    let outcome = core.hit();
                    if !was_vulnerable {
                        prop_assert_eq!(outcome, BossHit::Ignored);
                        prop_assert_eq!(core.health, last);
                    }
                } else {
                    core.update(dt, &mut rng);
                }
                prop_assert!(core.health <= BOSS_MAX_HEALTH);
                prop_assert!(core.health <= last);
                last = core.health;
            }
        }
    }
}
