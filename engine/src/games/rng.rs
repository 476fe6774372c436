//! Uniform random outcome draws.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the uniform draws consumed by the simulators.
///
/// Entropy-seeded in production, fixed-seeded in tests so rounds replay
/// identically.
pub struct OutcomeRng(StdRng);

impl OutcomeRng {
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    /// Crash threshold in basis points, uniform over `[min, max)`.
    /// An empty range pins the draw to `min`.
    pub fn crash_threshold_bps(&mut self, min: u64, max: u64) -> u64 {
        if min >= max {
            return min;
        }
        self.0.gen_range(min..max)
    }

    /// Wheel pocket, uniform over `[0, pockets)`.
    pub fn wheel_pocket(&mut self, pockets: u8) -> u8 {
        self.0.gen_range(0..pockets)
    }

    /// Index into the reel symbol alphabet.
    pub fn reel_symbol(&mut self, symbols: u8) -> u8 {
        self.0.gen_range(0..symbols)
    }
}
