//! RNG module - injected randomness for dealing and praise
//!
//! Every randomized decision (shape draws, palette tokens, praise phrases)
//! goes through the [`RandomSource`] trait so tests can script exact
//! sequences. [`SimpleRng`] is the shipped implementation, a small LCG that
//! keeps the core dependency-free and deterministic per seed.

/// Source of bounded random draws.
///
/// The single method is all the engine ever needs; implementations decide
/// whether the stream is seeded, scripted, or wired to an OS source.
pub trait RandomSource {
    /// Random value in range [0, max). `max` must be non-zero.
    fn next_range(&mut self, max: u32) -> u32;
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Current internal state (for carrying a sequence across restarts)
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl RandomSource for SimpleRng {
    fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }
}
