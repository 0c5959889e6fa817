//! Pheromone trails on the edges of a complete graph.

use crate::error::{AcoError, AcoResult};
use crate::params::clamp_rate;

/// Unordered edge; `EdgeKey::new(a, b) == EdgeKey::new(b, a)`.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
pub struct EdgeKey(usize, usize);

impl EdgeKey {
    pub fn new(a: usize, b: usize) -> Self {
        if a < b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }

    pub fn low(&self) -> usize {
        self.0
    }

    pub fn high(&self) -> usize {
        self.1
    }
}

/// Symmetric N×N matrix of pheromone levels.
///
/// Levels are stored once per unordered edge (upper triangle, diagonal
/// included), so `get(i, j) == get(j, i)` holds by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct PheromoneField {
    size: usize,
    trails: Vec<f64>,
}

impl PheromoneField {
    /// A field of `size` nodes with every entry set to `initial`.
    pub fn new(size: usize, initial: f64) -> Self {
        Self {
            size,
            trails: vec![initial.max(0.0); size * (size + 1) / 2],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn slot(&self, key: EdgeKey) -> usize {
        let (a, b) = (key.low(), key.high());
        a * (2 * self.size - a + 1) / 2 + (b - a)
    }

    /// Pheromone level on the edge between `i` and `j`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.trails[self.slot(EdgeKey::new(i, j))]
    }

    /// Highest level on any edge, `0` for an empty field.
    pub fn max_level(&self) -> f64 {
        self.trails.iter().copied().fold(0.0, f64::max)
    }

    /// Every edge `i < j` with its level.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeKey, f64)> + '_ {
        (0..self.size)
            .flat_map(move |i| (i + 1..self.size).map(move |j| EdgeKey::new(i, j)))
            .map(move |key| (key, self.trails[self.slot(key)]))
    }

    /// Multiply every level by `1 - rate`.
    ///
    /// `rate` is clamped into `[0, 1]` rather than rejected, so `1.0` (or
    /// anything above it) clears the field and negative rates do nothing.
    pub fn evaporate(&mut self, rate: f64) {
        let keep = 1.0 - clamp_rate(rate);
        for level in &mut self.trails {
            *level *= keep;
        }
    }

    /// Reinforce every edge of `route` by `amount / route_length`.
    ///
    /// Consecutive pairs are reinforced, plus the closing edge from the last
    /// entry back to the first when the route is not already closed. Self
    /// loops are skipped. The field is left untouched when any argument is
    /// rejected.
    pub fn deposit(&mut self, route: &[usize], route_length: f64, amount: f64) -> AcoResult<()> {
        if !route_length.is_finite() || route_length <= 0.0 {
            return Err(AcoError::invalid(format!(
                "route length must be finite and positive, got {route_length}"
            )));
        }
        if !amount.is_finite() || amount < 0.0 {
            return Err(AcoError::invalid(format!(
                "deposit amount must be finite and non-negative, got {amount}"
            )));
        }
        if let Some(&bad) = route.iter().find(|&&idx| idx >= self.size) {
            return Err(AcoError::invalid(format!(
                "route visits node {bad}, field has {} nodes",
                self.size
            )));
        }

        let delta = amount / route_length;
        for w in route.windows(2) {
            self.reinforce(w[0], w[1], delta);
        }
        if let (Some(&first), Some(&last)) = (route.first(), route.last()) {
            if first != last {
                self.reinforce(last, first, delta);
            }
        }
        Ok(())
    }

    #[inline]
    fn reinforce(&mut self, i: usize, j: usize, delta: f64) {
        if i != j {
            let slot = self.slot(EdgeKey::new(i, j));
            self.trails[slot] += delta;
        }
    }
}
