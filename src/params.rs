//! Algorithm parameters.

use crate::error::{AcoError, AcoResult};
use serde::{Deserialize, Serialize};

/// Tunable parameters of the colony.
///
/// Every field has a default, so a JSON config only needs the keys it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcoParams {
    /// Number of ants constructing a tour each generation
    pub num_ants: usize,
    /// Pheromone importance (α)
    pub alpha: f64,
    /// Heuristic importance (β)
    pub beta: f64,
    /// Fraction of pheromone removed each generation (ρ), clamped into `[0, 1]`
    pub evaporation_rate: f64,
    /// Base pheromone amount an elite ant spreads over its tour (Q)
    pub deposit_rate: f64,
    /// How many of the best ants of a generation deposit pheromone
    pub elite_count: usize,
    /// Uniform starting value of every pheromone entry
    pub initial_pheromone: f64,
    /// Seed for the run's random source; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for AcoParams {
    fn default() -> Self {
        Self {
            num_ants: 10,
            alpha: 1.0,
            beta: 2.0,
            evaporation_rate: 0.5,
            deposit_rate: 100.0,
            elite_count: 5,
            initial_pheromone: 0.1,
            seed: None,
        }
    }
}

impl AcoParams {
    /// Create parameters with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load parameters from a JSON document; absent keys keep their defaults.
    pub fn from_json(json: &str) -> AcoResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set number of ants
    #[must_use]
    pub fn with_num_ants(mut self, num_ants: usize) -> Self {
        self.num_ants = num_ants;
        self
    }

    /// Set pheromone importance (α)
    #[must_use]
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set heuristic importance (β)
    #[must_use]
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    /// Set evaporation rate (ρ)
    #[must_use]
    pub fn with_evaporation_rate(mut self, rate: f64) -> Self {
        self.evaporation_rate = rate;
        self
    }

    /// Set deposit rate (Q)
    #[must_use]
    pub fn with_deposit_rate(mut self, rate: f64) -> Self {
        self.deposit_rate = rate;
        self
    }

    /// Set the number of elite ants
    #[must_use]
    pub fn with_elite_count(mut self, count: usize) -> Self {
        self.elite_count = count;
        self
    }

    /// Set the initial pheromone level
    #[must_use]
    pub fn with_initial_pheromone(mut self, level: f64) -> Self {
        self.initial_pheromone = level;
        self
    }

    /// Set random seed
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Evaporation rate clamped into `[0, 1]`.
    pub fn clamped_evaporation_rate(&self) -> f64 {
        clamp_rate(self.evaporation_rate)
    }

    /// Elite count clamped to the ant population.
    pub fn effective_elite_count(&self) -> usize {
        self.elite_count.min(self.num_ants)
    }

    /// Check every parameter is in its domain.
    ///
    /// The evaporation rate is the one value that is clamped instead of
    /// rejected, as long as it is a number at all.
    pub fn validate(&self) -> AcoResult<()> {
        if self.num_ants < 1 {
            return Err(AcoError::invalid("num_ants must be at least 1"));
        }
        if self.elite_count < 1 {
            return Err(AcoError::invalid("elite_count must be at least 1"));
        }
        check_finite("alpha", self.alpha)?;
        check_finite("beta", self.beta)?;
        check_finite("evaporation_rate", self.evaporation_rate)?;
        check_finite("deposit_rate", self.deposit_rate)?;
        check_finite("initial_pheromone", self.initial_pheromone)?;
        if self.alpha < 0.0 {
            return Err(AcoError::invalid(format!("alpha must be >= 0, got {}", self.alpha)));
        }
        if self.beta < 0.0 {
            return Err(AcoError::invalid(format!("beta must be >= 0, got {}", self.beta)));
        }
        if self.deposit_rate <= 0.0 {
            return Err(AcoError::invalid(format!(
                "deposit_rate must be > 0, got {}",
                self.deposit_rate
            )));
        }
        if self.initial_pheromone < 0.0 {
            return Err(AcoError::invalid(format!(
                "initial_pheromone must be >= 0, got {}",
                self.initial_pheromone
            )));
        }
        Ok(())
    }
}

/// Clamp a rate into `[0, 1]`. NaN maps to `0`.
pub fn clamp_rate(rate: f64) -> f64 {
    if rate.is_nan() {
        0.0
    } else {
        rate.clamp(0.0, 1.0)
    }
}

fn check_finite(name: &str, value: f64) -> AcoResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(AcoError::invalid(format!("{name} must be finite, got {value}")))
    }
}
