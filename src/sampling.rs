//! The randomness boundary of the engine.
//!
//! Route construction draws uniforms from a [`RandomSource`] and turns them
//! into choices with [`roulette`], which is a pure function. Anything that
//! implements the trait can drive a colony, so tests can replay fixed
//! draws.

/// How far the normalised cumulative weight may drift from `1`.
pub const CUMULATIVE_TOLERANCE: f64 = 1e-9;

/// Source of uniform random numbers.
///
/// Sources are `Send` so that per-ant forks can move onto worker threads.
pub trait RandomSource: Send {
    /// Uniform draw in `[0, 1)`.
    fn uniform(&mut self) -> f64;

    /// Independent source seeded from this one.
    fn fork(&mut self) -> Self
    where
        Self: Sized;
}

impl RandomSource for fastrand::Rng {
    #[inline]
    fn uniform(&mut self) -> f64 {
        self.f64()
    }

    fn fork(&mut self) -> Self {
        fastrand::Rng::with_seed(self.u64(..))
    }
}

/// Seeded source, or one seeded from entropy when `seed` is `None`.
pub fn rng_from_seed(seed: Option<u64>) -> fastrand::Rng {
    match seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    }
}

/// Uniformly pick an index in `0..n`. `n` must be non-zero.
pub fn pick_index<R: RandomSource>(rng: &mut R, n: usize) -> usize {
    let idx = (rng.uniform() * n as f64) as usize;
    idx.min(n - 1)
}

/// Select an index with probability proportional to its weight.
///
/// `u` is a uniform draw in `[0, 1)`. Returns `None` when the weights carry
/// no usable mass: the total is zero, negative or not finite.
pub fn roulette(weights: &[f64], u: f64) -> Option<usize> {
    let total: f64 = weights.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return None;
    }

    let mut cumulative = 0.0;
    let mut last_positive = None;
    for (idx, &w) in weights.iter().enumerate() {
        let p = w / total;
        cumulative += p;
        if p > 0.0 {
            last_positive = Some(idx);
            if u < cumulative {
                return Some(idx);
            }
        }
    }
    debug_assert!(
        (cumulative - 1.0).abs() <= CUMULATIVE_TOLERANCE,
        "normalised weights sum to {cumulative}"
    );
    // u landed in the rounding gap just below 1
    last_positive
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roulette_respects_boundaries() {
        let weights = [1.0, 3.0];
        assert_eq!(roulette(&weights, 0.0), Some(0));
        assert_eq!(roulette(&weights, 0.2499), Some(0));
        assert_eq!(roulette(&weights, 0.25), Some(1));
        assert_eq!(roulette(&weights, 0.9999), Some(1));
    }

    #[test]
    fn test_roulette_skips_zero_weights() {
        let weights = [0.0, 2.0, 0.0];
        assert_eq!(roulette(&weights, 0.0), Some(1));
        assert_eq!(roulette(&weights, 0.999_999), Some(1));
    }

    #[test]
    fn test_roulette_top_edge_picks_last_positive() {
        let weights = [0.1, 0.2, 0.0];
        assert_eq!(roulette(&weights, 1.0), Some(1));
    }

    #[test]
    fn test_roulette_no_mass() {
        assert_eq!(roulette(&[], 0.5), None);
        assert_eq!(roulette(&[0.0, 0.0], 0.5), None);
        assert_eq!(roulette(&[f64::INFINITY, 1.0], 0.5), None);
    }

    #[test]
    fn test_roulette_frequencies() {
        let weights = [1.0, 2.0, 7.0];
        let mut rng = fastrand::Rng::with_seed(7);
        let mut counts = [0usize; 3];
        let draws = 20_000;
        for _ in 0..draws {
            counts[roulette(&weights, rng.uniform()).unwrap()] += 1;
        }
        for (count, expected) in counts.iter().zip([0.1, 0.2, 0.7]) {
            let observed = *count as f64 / draws as f64;
            assert!((observed - expected).abs() < 0.02, "{observed} vs {expected}");
        }
    }

    #[test]
    fn test_pick_index_in_range() {
        let mut rng = fastrand::Rng::with_seed(3);
        for _ in 0..1000 {
            assert!(pick_index(&mut rng, 7) < 7);
        }
    }

    #[test]
    fn test_fork_is_deterministic() {
        let mut a = rng_from_seed(Some(42));
        let mut b = rng_from_seed(Some(42));
        let mut fa = RandomSource::fork(&mut a);
        let mut fb = RandomSource::fork(&mut b);
        for _ in 0..10 {
            assert_eq!(fa.uniform(), fb.uniform());
        }
    }
}
