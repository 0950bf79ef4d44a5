// Injected randomness for walker placement.
//
// Walkers never touch a global generator: whoever spawns them passes a
// RandomSource, so tests can replay a fixed sequence and two populations
// built from the same seed are bit-identical.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait RandomSource {
    /// Uniform scalar in [0, 1).
    fn rand_float(&mut self) -> f32;

    /// Uniform integer in [0, max] (inclusive).
    fn rand_int(&mut self, max: usize) -> usize;
}

/// `StdRng`-backed source, seeded once at startup.
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    pub fn from_entropy() -> Self {
        Self { rng: StdRng::from_entropy() }
    }
}

impl RandomSource for StdRandom {
    fn rand_float(&mut self) -> f32 {
        self.rng.gen_range(0.0..1.0)
    }

    fn rand_int(&mut self, max: usize) -> usize {
        self.rng.gen_range(0..=max)
    }
}

/// Replays a fixed list of scalars, wrapping around at the end.
///
/// `rand_int(max)` maps the next scalar onto [0, max].
pub struct ScriptedRandom {
    values: Vec<f32>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(values: Vec<f32>) -> Self {
        assert!(!values.is_empty(), "ScriptedRandom needs at least one value");
        Self { values, cursor: 0 }
    }

    fn next(&mut self) -> f32 {
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }
}

impl RandomSource for ScriptedRandom {
    fn rand_float(&mut self) -> f32 {
        self.next().clamp(0.0, 1.0 - f32::EPSILON)
    }

    fn rand_int(&mut self, max: usize) -> usize {
        let scaled = (self.rand_float() * (max + 1) as f32) as usize;
        scaled.min(max)
    }
}
