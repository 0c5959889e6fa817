//! Multi-generation optimization runs.

use crate::benchmark::BenchmarkReference;
use crate::colony::Colony;
use crate::error::AcoResult;
use crate::observer::{Flow, NoOpObserver, Progress, ProgressObserver};
use crate::problem::ProblemInstance;
use crate::sampling::RandomSource;
use serde::Serialize;
use std::time::Duration;

/// One line of convergence history. Never changed once recorded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IterationRecord {
    /// 1-based generation index
    pub generation: usize,
    /// Time spent in this generation
    pub generation_time: Duration,
    /// Time spent in all generations so far
    pub cumulative_time: Duration,
    /// Best length known to the driver after this generation
    pub best_length: f64,
}

/// Result of an optimization run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Solution {
    /// Closed best route, start node repeated at the end
    pub route: Vec<usize>,
    /// Length of `route`
    pub length: f64,
    /// Generation that first produced `route`
    pub generation_found: usize,
    /// Convergence history, one record per generation run
    pub history: Vec<IterationRecord>,
}

impl Solution {
    /// Percentage above the best known length of `name`; `None` when the
    /// reference does not know the instance.
    pub fn gap_percent(&self, reference: &BenchmarkReference, name: &str) -> Option<f64> {
        reference.gap_percent(name, self.length)
    }

    pub fn generations_run(&self) -> usize {
        self.history.len()
    }
}

/// Runs a colony generation after generation and keeps the history.
///
/// Generations are strictly sequential: each one starts from the pheromone
/// field the previous one left behind.
#[derive(Debug)]
pub struct OptimizationDriver<'p, R: RandomSource = fastrand::Rng> {
    colony: Colony<'p, R>,
    best_route: Vec<usize>,
    best_length: f64,
    best_generation: usize,
    history: Vec<IterationRecord>,
}

impl<'p> OptimizationDriver<'p, fastrand::Rng> {
    pub fn new(problem: &'p ProblemInstance) -> Self {
        Self::with_colony(Colony::new(problem))
    }
}

impl<'p, R: RandomSource> OptimizationDriver<'p, R> {
    pub fn with_colony(colony: Colony<'p, R>) -> Self {
        Self {
            colony,
            best_route: Vec::new(),
            best_length: f64::INFINITY,
            best_generation: 0,
            history: Vec::new(),
        }
    }

    pub fn colony(&self) -> &Colony<'p, R> {
        &self.colony
    }

    pub fn history(&self) -> &[IterationRecord] {
        &self.history
    }

    /// Best length seen so far, infinite before the first generation.
    pub fn best_length(&self) -> f64 {
        self.best_length
    }

    pub fn best_route(&self) -> &[usize] {
        &self.best_route
    }

    /// Run `generations` generations without progress reporting.
    pub fn run(&mut self, generations: usize) -> AcoResult<Solution> {
        self.optimize(generations, &mut NoOpObserver)
    }

    /// Run up to `generations` generations, reporting to `observer` after
    /// each one.
    ///
    /// The run ends early when the observer returns [`Flow::Stop`]. Errors
    /// from the colony are returned as is. Calling `optimize` again
    /// continues from the current pheromone field and history.
    pub fn optimize<O>(&mut self, generations: usize, observer: &mut O) -> AcoResult<Solution>
    where
        O: ProgressObserver + ?Sized,
    {
        for _ in 0..generations {
            let outcome = self.colony.run_generation()?;

            if outcome.best_length < self.best_length {
                self.best_length = outcome.best_length;
                self.best_route.clone_from(&outcome.best_route);
                self.best_generation = outcome.generation;
            }

            self.history.push(IterationRecord {
                generation: outcome.generation,
                generation_time: outcome.elapsed,
                cumulative_time: self.colony.total_time(),
                best_length: self.best_length,
            });

            let progress = Progress {
                generation: outcome.generation,
                total_generations: generations,
                best_route: &self.best_route,
                best_length: self.best_length,
                history: &self.history,
            };
            if observer.on_generation(&progress) == Flow::Stop {
                tracing::debug!(
                    observer = observer.name(),
                    generation = outcome.generation,
                    "run stopped by observer"
                );
                break;
            }
        }

        Ok(self.solution())
    }

    /// Best solution found so far.
    pub fn solution(&self) -> Solution {
        Solution {
            route: self.best_route.clone(),
            length: self.best_length,
            generation_found: self.best_generation,
            history: self.history.clone(),
        }
    }
}
