// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Resonance Round Engine - Random Draws
//
// Bounded integer draws for tokens, targets and starting resonance. The
// source is a seeded ChaCha8 stream: non-cryptographic use only, but
// replayable from a single u64.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::ValueRange;
use crate::types::{MAX_HZ, MIN_HZ};

/// Default rejection-sampling cap for [`FrequencyRng::random_resonance`].
pub const RESONANCE_ATTEMPTS: u32 = 100;

/// Outcome of a constrained resonance draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResonanceDraw {
    pub hz: i64,
    /// `false` when the retry cap was hit and the distance constraint dropped.
    pub constrained: bool,
}

#[derive(Debug, Clone)]
pub struct FrequencyRng {
    inner: ChaCha8Rng,
}

impl FrequencyRng {
    pub fn from_seed(seed: u64) -> Self {
        Self { inner: ChaCha8Rng::seed_from_u64(seed) }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_entropy() -> Self {
        Self { inner: ChaCha8Rng::from_entropy() }
    }

    /// Uniform over `lo..=hi`. An inverted range collapses to `lo`.
    pub fn random_int(&mut self, lo: i64, hi: i64) -> i64 {
        if hi <= lo {
            return lo;
        }
        self.inner.gen_range(lo..=hi)
    }

    pub fn random_token(&mut self, range: ValueRange) -> i64 {
        self.random_int(range.lo, range.hi)
    }

    pub fn random_target(&mut self, range: ValueRange) -> i64 {
        self.random_int(range.lo, range.hi)
    }

    /// Uniform over the full band with `|hz - target| >= min_distance`.
    ///
    /// After `attempts` rejected draws the last draw is returned as-is and
    /// the result is flagged unconstrained.
    pub fn random_resonance(&mut self, target: i64, min_distance: i64, attempts: u32) -> ResonanceDraw {
        let mut hz = self.random_int(MIN_HZ, MAX_HZ);
        for _ in 1..attempts.max(1) {
            if (hz - target).abs() >= min_distance {
                return ResonanceDraw { hz, constrained: true };
            }
            hz = self.random_int(MIN_HZ, MAX_HZ);
        }
        if (hz - target).abs() >= min_distance {
            return ResonanceDraw { hz, constrained: true };
        }
        log::warn!(
            "resonance draw gave up after {} attempts (target {}, min distance {}); using {}",
            attempts, target, min_distance, hz
        );
        ResonanceDraw { hz, constrained: false }
    }

    /// Pick an index in `0..len`. `len` must be non-zero.
    pub fn pick(&mut self, len: usize) -> usize {
        self.inner.gen_range(0..len)
    }

    pub fn coin(&mut self) -> bool {
        self.inner.gen_bool(0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_int_stays_in_closed_range() {
        let mut rng = FrequencyRng::from_seed(7);
        let mut seen_lo = false;
        let mut seen_hi = false;
        for _ in 0..2000 {
            let v = rng.random_int(1, 4);
            assert!((1..=4).contains(&v));
            seen_lo |= v == 1;
            seen_hi |= v == 4;
        }
        assert!(seen_lo && seen_hi, "both endpoints should be reachable");
    }

    #[test]
    fn degenerate_range_returns_lo() {
        let mut rng = FrequencyRng::from_seed(1);
        assert_eq!(rng.random_int(42, 42), 42);
        assert_eq!(rng.random_int(9, 3), 9);
    }

    #[test]
    fn tokens_and_targets_respect_config() {
        let mut rng = FrequencyRng::from_seed(99);
        let tokens = ValueRange::new(1, 500);
        let targets = ValueRange::new(3000, 7000);
        for _ in 0..500 {
            assert!(tokens.contains(rng.random_token(tokens)));
            assert!(targets.contains(rng.random_target(targets)));
        }
    }

    #[test]
    fn resonance_honors_feasible_distance() {
        let mut rng = FrequencyRng::from_seed(3);
        for target in [3000, 5000, 7000] {
            for _ in 0..200 {
                let draw = rng.random_resonance(target, 3000, RESONANCE_ATTEMPTS);
                assert!(draw.constrained);
                assert!((draw.hz - target).abs() >= 3000);
                assert!((MIN_HZ..=MAX_HZ).contains(&draw.hz));
            }
        }
    }

    #[test]
    fn infeasible_distance_falls_back() {
        let mut rng = FrequencyRng::from_seed(11);
        let draw = rng.random_resonance(5000, 20_000, RESONANCE_ATTEMPTS);
        assert!(!draw.constrained);
        assert!((MIN_HZ..=MAX_HZ).contains(&draw.hz));
    }

    #[test]
    fn same_seed_same_stream() {
        let mut a = FrequencyRng::from_seed(42);
        let mut b = FrequencyRng::from_seed(42);
        for _ in 0..32 {
            assert_eq!(a.random_int(0, 10_000), b.random_int(0, 10_000));
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn entropy_seeded_draws_stay_in_range() {
        let mut rng = FrequencyRng::from_entropy();
        for _ in 0..100 {
            assert!((0..=u32::MAX as i64).contains(&rng.random_int(0, u32::MAX as i64)));
        }
    }
}
