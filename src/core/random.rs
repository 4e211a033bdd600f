//! Injectable random source used by every stochastic step of generation.
//!
//! Generation never calls a global RNG. Everything goes through
//! [`RandomSource`], so tests can replay exact sequences with
//! [`ScriptedSource`] and tools can reproduce a plant from a seed with
//! [`RngSource::seeded`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform random numbers in `[0, 1)`.
pub trait RandomSource {
    /// Next uniform value in `[0, 1)`.
    fn next_f32(&mut self) -> f32;

    /// Uniform value in `[min, max)`.
    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Symmetric jitter in `[-spread/2, spread/2)`.
    fn jitter(&mut self, spread: f32) -> f32 {
        (self.next_f32() - 0.5) * spread
    }

    /// Uniform index in `[0, len)`. Returns 0 when `len` is 0.
    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((self.next_f32() * len as f32) as usize).min(len - 1)
    }

    /// True with probability `1 - threshold` (draw strictly above threshold).
    fn chance_above(&mut self, threshold: f32) -> bool {
        self.next_f32() > threshold
    }
}

impl<T: RandomSource + ?Sized> RandomSource for Box<T> {
    fn next_f32(&mut self) -> f32 {
        (**self).next_f32()
    }
}

/// Adapter from any `rand` generator.
#[derive(Clone, Debug)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<StdRng> {
    /// OS-seeded generator; plants differ on every run.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    /// Deterministic generator for reproducible plants.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_f32(&mut self) -> f32 {
        self.rng.random::<f32>()
    }
}

/// Replays a fixed sequence of values, cycling when exhausted.
///
/// Values are clamped into `[0, 1)` so scripted draws can never escape the
/// ranges the generators assume.
#[derive(Clone, Debug)]
pub struct ScriptedSource {
    values: Vec<f32>,
    cursor: usize,
}

impl ScriptedSource {
    pub fn new(values: impl Into<Vec<f32>>) -> Self {
        let values: Vec<f32> = values
            .into()
            .into_iter()
            .map(|v| v.clamp(0.0, 0.999_999))
            .collect();
        Self { values, cursor: 0 }
    }

    /// A source that always yields the same value.
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }

    /// Number of values drawn so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedSource {
    fn next_f32(&mut self) -> f32 {
        if self.values.is_empty() {
            self.cursor += 1;
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}
