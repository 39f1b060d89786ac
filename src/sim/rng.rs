//! Random integer source consumed by spawn logic
//!
//! Every random decision in the simulation is an inclusive integer roll,
//! optionally scaled afterwards (e.g. `roll(0, 10) / 10.0`).

use rand::Rng;
use rand_pcg::Pcg32;

/// Uniform inclusive integer generator
pub trait RandomSource {
    /// Uniform integer in `lo..=hi`. Returns `lo` when the range is empty.
    fn uniform_int(&mut self, lo: i32, hi: i32) -> i32;

    /// Fair coin
    fn coin(&mut self) -> bool {
        self.uniform_int(0, 1) == 1
    }

    /// Roll `lo..=hi` and divide by `scale`
    fn scaled(&mut self, lo: i32, hi: i32, scale: f32) -> f32 {
        self.uniform_int(lo, hi) as f32 / scale
    }

    /// Pick one element uniformly
    fn pick<T: Copy>(&mut self, items: &[T]) -> T
    where
        Self: Sized,
    {
        let last = items.len().saturating_sub(1) as i32;
        items[self.uniform_int(0, last) as usize]
    }
}

impl RandomSource for Pcg32 {
    fn uniform_int(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        self.random_range(lo..=hi)
    }
}

/// Replays a fixed list of rolls (clamped into the requested range)
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    rolls: Vec<i32>,
    cursor: usize,
}

#[cfg(test)]
impl ScriptedRng {
    pub fn new(rolls: &[i32]) -> Self {
        Self {
            rolls: rolls.to_vec(),
            cursor: 0,
        }
    }
}

#[cfg(test)]
impl RandomSource for ScriptedRng {
    fn uniform_int(&mut self, lo: i32, hi: i32) -> i32 {
        if self.rolls.is_empty() {
            return lo;
        }
        let roll = self.rolls[self.cursor % self.rolls.len()];
        self.cursor += 1;
        roll.clamp(lo, hi.max(lo))
    }
}
