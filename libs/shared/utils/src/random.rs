use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform draws in `[0, 1)`.
///
/// Fault injection and slot availability both draw from this trait so the
/// server can run on the thread-local generator while tests swap in a seeded
/// or constant source.
pub trait RandomSource: Send + Sync {
    fn next_unit(&self) -> f64;

    /// `true` with probability `probability`.
    fn chance(&self, probability: f64) -> bool {
        self.next_unit() < probability
    }
}

/// Production source backed by `rand::thread_rng`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_unit(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Reproducible source: the same seed yields the same sequence of draws.
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&self) -> f64 {
        self.rng.lock().gen::<f64>()
    }
}

/// Always returns the same value. Values outside `[0, 1)` are clamped.
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom(f64);

impl FixedRandom {
    pub fn new(value: f64) -> Self {
        Self(value.clamp(0.0, 1.0 - f64::EPSILON))
    }

    /// Every `chance` call with a probability above zero succeeds.
    pub fn always() -> Self {
        Self::new(0.0)
    }

    /// Every `chance` call with a probability below one fails.
    pub fn never() -> Self {
        Self::new(1.0)
    }
}

impl RandomSource for FixedRandom {
    fn next_unit(&self) -> f64 {
        self.0
    }
}
