//! A single ant and its route construction policy.

use crate::error::{AcoError, AcoResult};
use crate::pheromone::PheromoneField;
use crate::problem::ProblemInstance;
use crate::sampling::{roulette, RandomSource};

/// Lifecycle of an ant within one generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AntState {
    #[default]
    Idle,
    Constructing,
    Complete,
}

/// Construction state of one ant.
///
/// Ants are pooled by the colony and reused every generation; `reset` keeps
/// the allocated buffers.
#[derive(Debug, Clone)]
pub struct Ant {
    id: usize,
    start: usize,
    state: AntState,
    route: Vec<usize>,
    visited: Vec<bool>,
    total_distance: f64,

    // Scratch buffers reused for every step.
    candidates: Vec<usize>,
    weights: Vec<f64>,
}

impl Ant {
    pub fn new(id: usize, start: usize, num_nodes: usize) -> Self {
        Self {
            id,
            start,
            state: AntState::Idle,
            route: Vec::with_capacity(num_nodes + 1),
            visited: vec![false; num_nodes],
            total_distance: 0.0,
            candidates: Vec::with_capacity(num_nodes),
            weights: Vec::with_capacity(num_nodes),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn state(&self) -> AntState {
        self.state
    }

    /// Route built so far; a closed cycle once the ant is `Complete`.
    pub fn route(&self) -> &[usize] {
        &self.route
    }

    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    /// Forget the current route and return to `Idle`.
    pub fn reset(&mut self) {
        self.route.clear();
        self.visited.iter_mut().for_each(|v| *v = false);
        self.total_distance = 0.0;
        self.state = AntState::Idle;
    }

    /// Build one Hamiltonian cycle from the start node.
    ///
    /// `pheromones` is only read, so every ant of a generation sees the same
    /// levels. The result is available from [`Ant::route`] and
    /// [`Ant::total_distance`].
    ///
    /// Fails without touching the ant when its start node or the field does
    /// not fit `problem`.
    pub fn build_route<R: RandomSource>(
        &mut self,
        problem: &ProblemInstance,
        pheromones: &PheromoneField,
        rng: &mut R,
    ) -> AcoResult<()> {
        let n = problem.num_nodes();
        if self.start >= n {
            return Err(AcoError::invalid(format!(
                "ant {} starts at node {}, instance has {n} nodes",
                self.id, self.start
            )));
        }
        if pheromones.size() != n {
            return Err(AcoError::DimensionMismatch {
                expected: n,
                actual: pheromones.size(),
            });
        }
        if self.visited.len() != n {
            self.visited = vec![false; n];
        }
        self.reset();
        self.state = AntState::Constructing;

        self.route.push(self.start);
        self.visited[self.start] = true;

        let mut current = self.start;
        while self.route.len() < n {
            let next = self.choose_next(current, problem, pheromones, rng);
            self.route.push(next);
            self.visited[next] = true;
            self.total_distance += problem.distance(current, next);
            current = next;
        }

        self.route.push(self.start);
        self.total_distance += problem.distance(current, self.start);
        self.state = AntState::Complete;
        Ok(())
    }

    fn choose_next<R: RandomSource>(
        &mut self,
        current: usize,
        problem: &ProblemInstance,
        pheromones: &PheromoneField,
        rng: &mut R,
    ) -> usize {
        let params = problem.params();
        let distances = problem.distances().row(current);

        self.candidates.clear();
        self.weights.clear();
        for (j, &d) in distances.iter().enumerate() {
            if self.visited[j] {
                continue;
            }
            let heuristic = if d > 0.0 { (1.0 / d).powf(params.beta) } else { 0.0 };
            let weight = pheromones.get(current, j).powf(params.alpha) * heuristic;
            self.candidates.push(j);
            self.weights.push(weight);
        }

        match roulette(&self.weights, rng.uniform()) {
            Some(pick) => self.candidates[pick],
            None => {
                let nearest = nearest_candidate(&self.candidates, distances);
                tracing::debug!(
                    ant = self.id,
                    from = current,
                    to = nearest,
                    "no selection mass, falling back to nearest node"
                );
                nearest
            }
        }
    }
}

/// Candidate with the smallest distance; ties go to the earliest candidate,
/// which is the lowest index because candidates are built in index order.
fn nearest_candidate(candidates: &[usize], distances: &[f64]) -> usize {
    let mut best = candidates[0];
    for &j in &candidates[1..] {
        if distances[j] < distances[best] {
            best = j;
        }
    }
    best
}
