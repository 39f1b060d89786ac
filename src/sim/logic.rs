//! Binary logic puzzles: gates, their truth table, and laser conditions
//!
//! A single evaluator (`GateKind::evaluate`) backs the level-3 puzzle gates,
//! the boss-owned gates and every laser condition.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::projectile::Transient;
use super::rng::RandomSource;
use crate::consts::{GATE_FLASH_THRESHOLD, GATE_RADIUS};

/// Gate types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateKind {
    And,
    Or,
    Xor,
    Nand,
    Nor,
    /// Unary: only input A matters
    Not,
    Xnor,
    IfAIsOne,
    IfBIsZero,
    IfAXorB,
}

impl GateKind {
    pub const ALL: [GateKind; 10] = [
        GateKind::And,
        GateKind::Or,
        GateKind::Xor,
        GateKind::Nand,
        GateKind::Nor,
        GateKind::Not,
        GateKind::Xnor,
        GateKind::IfAIsOne,
        GateKind::IfBIsZero,
        GateKind::IfAXorB,
    ];

    /// Kinds used by the level-3 puzzle stage
    pub const PUZZLE: [GateKind; 7] = [
        GateKind::And,
        GateKind::Or,
        GateKind::Xor,
        GateKind::Nand,
        GateKind::Nor,
        GateKind::Not,
        GateKind::Xnor,
    ];

    /// Kinds the boss spawns (and the families of its special attacks)
    pub const BOSS: [GateKind; 3] = [GateKind::Nand, GateKind::Nor, GateKind::Not];

    /// The truth table
    pub fn evaluate(self, a: bool, b: bool) -> bool {
        match self {
            GateKind::And => a && b,
            GateKind::Or => a || b,
            GateKind::Xor => a ^ b,
            GateKind::Nand => !(a && b),
            GateKind::Nor => !(a || b),
            GateKind::Not => !a,
            GateKind::Xnor => !(a ^ b),
            GateKind::IfAIsOne => a,
            GateKind::IfBIsZero => !b,
            GateKind::IfAXorB => a ^ b,
        }
    }

    pub fn is_unary(self) -> bool {
        self == GateKind::Not
    }

    pub fn label(self) -> &'static str {
        match self {
            GateKind::And => "AND",
            GateKind::Or => "OR",
            GateKind::Xor => "XOR",
            GateKind::Nand => "NAND",
            GateKind::Nor => "NOR",
            GateKind::Not => "NOT",
            GateKind::Xnor => "XNOR",
            GateKind::IfAIsOne => "IF A=1",
            GateKind::IfBIsZero => "IF B=0",
            GateKind::IfAXorB => "IF A XOR B",
        }
    }

    /// Parse a display label; unknown labels are rejected rather than
    /// silently evaluating to false
    pub fn from_label(s: &str) -> Option<Self> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.label().eq_ignore_ascii_case(wanted))
    }
}

/// Outcome of answering a gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateVerdict {
    Correct,
    Wrong,
    /// The gate had already been solved; nothing changed
    AlreadySolved,
}

/// A timed logic puzzle answered by shooting it
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryGate {
    pub pos: Vec2,
    pub kind: GateKind,
    pub input_a: bool,
    pub input_b: bool,
    pub solved: bool,
    /// Seconds left before the gate is missed
    pub timer: f32,
    /// Visual-only warning blink near expiry
    pub flashing: bool,
}

impl BinaryGate {
    /// Gate with random inputs (B forced low for unary gates)
    pub fn spawn(pos: Vec2, kind: GateKind, time_limit: f32, rng: &mut impl RandomSource) -> Self {
        let input_a = rng.coin();
        let input_b = if kind.is_unary() { false } else { rng.coin() };
        Self::with_inputs(pos, kind, input_a, input_b, time_limit)
    }

    /// Gate with fixed inputs
    pub fn with_inputs(pos: Vec2, kind: GateKind, a: bool, b: bool, time_limit: f32) -> Self {
        Self {
            pos,
            kind,
            input_a: a,
            input_b: b && !kind.is_unary(),
            solved: false,
            timer: time_limit,
            flashing: false,
        }
    }

    pub fn radius(&self) -> f32 {
        GATE_RADIUS
    }

    pub fn correct_answer(&self) -> bool {
        self.kind.evaluate(self.input_a, self.input_b)
    }

    /// Count down while unsolved; blink at 5Hz during the last seconds
    pub fn update(&mut self, dt: f32) {
        if self.solved {
            return;
        }
        self.timer -= dt;
        if self.timer < GATE_FLASH_THRESHOLD {
            self.flashing = (self.timer * 10.0) as i32 % 2 == 0;
        }
    }

    pub fn is_expired(&self) -> bool {
        !self.solved && self.timer <= 0.0
    }

    /// Answer encoded by where a shot struck: above center reads as 1
    pub fn answer_from_impact(&self, impact: Vec2) -> bool {
        impact.y < self.pos.y
    }

    pub fn submit(&mut self, answer: bool) -> GateVerdict {
        if self.solved {
            return GateVerdict::AlreadySolved;
        }
        if answer == self.correct_answer() {
            self.solved = true;
            GateVerdict::Correct
        } else {
            GateVerdict::Wrong
        }
    }
}

impl Transient for BinaryGate {
    /// Solved gates are consumed, expired ones are missed
    fn is_live(&self) -> bool {
        !self.solved && !self.is_expired()
    }
}

/// Condition attached to a boss laser; lethal while true
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LaserCondition {
    AAndB,
    AOrB,
    NotA,
    NotB,
    ANandB,
    ANorB,
    AIsOne,
    AIsZero,
    BIsOne,
    BIsZero,
    AXorB,
}

impl LaserCondition {
    /// Pool for the regular double attack
    pub const PLAIN: [LaserCondition; 3] = [
        LaserCondition::AAndB,
        LaserCondition::AOrB,
        LaserCondition::NotA,
    ];

    pub fn evaluate(self, a: bool, b: bool) -> bool {
        match self {
            LaserCondition::AAndB => GateKind::And.evaluate(a, b),
            LaserCondition::AOrB => GateKind::Or.evaluate(a, b),
            LaserCondition::NotA => GateKind::Not.evaluate(a, b),
            LaserCondition::NotB => GateKind::IfBIsZero.evaluate(a, b),
            LaserCondition::ANandB => GateKind::Nand.evaluate(a, b),
            LaserCondition::ANorB => GateKind::Nor.evaluate(a, b),
            LaserCondition::AIsOne => GateKind::IfAIsOne.evaluate(a, b),
            LaserCondition::AIsZero => !GateKind::IfAIsOne.evaluate(a, b),
            LaserCondition::BIsOne => !GateKind::IfBIsZero.evaluate(a, b),
            LaserCondition::BIsZero => GateKind::IfBIsZero.evaluate(a, b),
            LaserCondition::AXorB => GateKind::IfAXorB.evaluate(a, b),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LaserCondition::AAndB => "IF A AND B",
            LaserCondition::AOrB => "IF A OR B",
            LaserCondition::NotA => "IF NOT A",
            LaserCondition::NotB => "IF NOT B",
            LaserCondition::ANandB => "IF A NAND B",
            LaserCondition::ANorB => "IF A NOR B",
            LaserCondition::AIsOne => "IF A=1",
            LaserCondition::AIsZero => "IF A=0",
            LaserCondition::BIsOne => "IF B=1",
            LaserCondition::BIsZero => "IF B=0",
            LaserCondition::AXorB => "IF A XOR B",
        }
    }

    /// Three-laser pattern themed on a gate family
    pub fn themed_set(family: GateKind) -> [LaserCondition; 3] {
        match family {
            GateKind::Nand => [
                LaserCondition::ANandB,
                LaserCondition::AIsOne,
                LaserCondition::BIsOne,
            ],
            GateKind::Nor => [
                LaserCondition::ANorB,
                LaserCondition::AIsZero,
                LaserCondition::BIsZero,
            ],
            // NOT and everything else: the negation pattern
            _ => [
                LaserCondition::NotA,
                LaserCondition::NotB,
                LaserCondition::AIsZero,
            ],
        }
    }
}

/// An armed laser threat
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Laser {
    pub condition: LaserCondition,
    /// Seconds until the laser disarms
    pub remaining: f32,
}

impl Laser {
    pub fn new(condition: LaserCondition, duration: f32) -> Self {
        Self {
            condition,
            remaining: duration,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.remaining > 0.0
    }

    /// Dangerous only while armed and its condition holds for the current state
    pub fn is_lethal(&self, a: bool, b: bool) -> bool {
        self.is_armed() && self.condition.evaluate(a, b)
    }
}

impl Transient for Laser {
    fn is_live(&self) -> bool {
        self.is_armed()
    }
}
