//! The colony: a pool of ants sharing one pheromone field.

use crate::ant::Ant;
use crate::error::AcoResult;
use crate::pheromone::PheromoneField;
use crate::problem::ProblemInstance;
use crate::sampling::{pick_index, rng_from_seed, RandomSource};
use std::time::{Duration, Instant};

/// Best tour found by a colony. Only ever improves.
#[derive(Debug, Clone, PartialEq)]
pub struct SolutionState {
    /// Closed route, start node repeated at the end
    pub route: Vec<usize>,
    /// Length of `route`; infinite until the first generation has run
    pub length: f64,
    /// Generation (1-based) that found the route, `0` before any
    pub generation: usize,
    /// Colony running time when the route was found
    pub elapsed: Duration,
}

impl SolutionState {
    fn unsolved(num_nodes: usize) -> Self {
        Self {
            route: (0..num_nodes).collect(),
            length: f64::INFINITY,
            generation: 0,
            elapsed: Duration::ZERO,
        }
    }

    pub fn is_solved(&self) -> bool {
        self.generation > 0
    }
}

/// Summary of one generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOutcome {
    /// 1-based generation index
    pub generation: usize,
    /// Shortest tour built in this generation
    pub generation_best_length: f64,
    /// All-time best route after this generation
    pub best_route: Vec<usize>,
    /// All-time best length after this generation
    pub best_length: f64,
    /// Whether this generation improved the all-time best
    pub improved: bool,
    /// Wall time spent on this generation
    pub elapsed: Duration,
}

/// Ant colony bound to one problem instance.
///
/// Each call to [`Colony::run_generation`] lets every ant build a tour
/// against the same pheromone levels, then evaporates the field and lets
/// the elite ants reinforce their tours.
#[derive(Debug)]
pub struct Colony<'p, R: RandomSource = fastrand::Rng> {
    problem: &'p ProblemInstance,
    pheromones: PheromoneField,
    ants: Vec<Ant>,
    rng: R,
    best: SolutionState,
    generation: usize,
    total_time: Duration,

    // Reused per generation.
    ant_rngs: Vec<R>,
    ranking: Vec<usize>,
}

impl<'p> Colony<'p, fastrand::Rng> {
    /// A colony seeded from the instance parameters.
    pub fn new(problem: &'p ProblemInstance) -> Self {
        Self::with_rng(problem, rng_from_seed(problem.params().seed))
    }
}

impl<'p, R: RandomSource> Colony<'p, R> {
    /// A colony drawing all randomness from `rng`.
    ///
    /// Every ant gets a random start node that it keeps for the whole run.
    pub fn with_rng(problem: &'p ProblemInstance, mut rng: R) -> Self {
        let params = problem.params();
        let n = problem.num_nodes();
        let ants = (0..params.num_ants)
            .map(|id| Ant::new(id, pick_index(&mut rng, n), n))
            .collect();

        Self {
            problem,
            pheromones: PheromoneField::new(n, params.initial_pheromone),
            ants,
            rng,
            best: SolutionState::unsolved(n),
            generation: 0,
            total_time: Duration::ZERO,
            ant_rngs: Vec::with_capacity(params.num_ants),
            ranking: Vec::with_capacity(params.num_ants),
        }
    }

    pub fn problem(&self) -> &'p ProblemInstance {
        self.problem
    }

    /// Current pheromone levels.
    pub fn pheromones(&self) -> &PheromoneField {
        &self.pheromones
    }

    pub fn ants(&self) -> &[Ant] {
        &self.ants
    }

    /// Best tour found so far.
    pub fn best(&self) -> &SolutionState {
        &self.best
    }

    /// Number of generations run.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Total time spent in `run_generation`.
    pub fn total_time(&self) -> Duration {
        self.total_time
    }

    /// Run one generation and return the all-time best after it.
    pub fn run_generation(&mut self) -> AcoResult<GenerationOutcome> {
        let started = Instant::now();
        self.generation += 1;

        self.construct_routes()?;
        self.rank_ants();

        let leader = &self.ants[self.ranking[0]];
        let generation_best_length = leader.total_distance();
        let improved = generation_best_length < self.best.length;
        if improved {
            self.best.route.clear();
            self.best.route.extend_from_slice(leader.route());
            self.best.length = generation_best_length;
            self.best.generation = self.generation;
            self.best.elapsed = self.total_time + started.elapsed();
            tracing::info!(
                generation = self.generation,
                length = generation_best_length,
                "new best tour"
            );
        }

        let updated = self.update_pheromones();
        for ant in &mut self.ants {
            ant.reset();
        }
        updated?;

        let elapsed = started.elapsed();
        self.total_time += elapsed;

        tracing::debug!(
            generation = self.generation,
            generation_best = generation_best_length,
            best = self.best.length,
            elapsed_ms = elapsed.as_secs_f64() * 1e3,
            "generation complete"
        );

        Ok(GenerationOutcome {
            generation: self.generation,
            generation_best_length,
            best_route: self.best.route.clone(),
            best_length: self.best.length,
            improved,
            elapsed,
        })
    }

    /// Every ant builds a tour against the current field.
    ///
    /// One source is forked per ant in index order, so the outcome for a
    /// given seed does not depend on whether ants run in parallel.
    fn construct_routes(&mut self) -> AcoResult<()> {
        self.ant_rngs.clear();
        for _ in 0..self.ants.len() {
            let forked = self.rng.fork();
            self.ant_rngs.push(forked);
        }

        let problem = self.problem;
        let pheromones = &self.pheromones;

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            self.ants
                .par_iter_mut()
                .zip(self.ant_rngs.par_iter_mut())
                .try_for_each(|(ant, rng)| ant.build_route(problem, pheromones, rng))?;
        }

        #[cfg(not(feature = "parallel"))]
        for (ant, rng) in self.ants.iter_mut().zip(self.ant_rngs.iter_mut()) {
            ant.build_route(problem, pheromones, rng)?;
        }

        Ok(())
    }

    /// Order ant ids by tour length; the sort is stable so ties keep id order.
    fn rank_ants(&mut self) {
        let ants = &self.ants;
        self.ranking.clear();
        self.ranking.extend(0..ants.len());
        self.ranking
            .sort_by(|&a, &b| ants[a].total_distance().total_cmp(&ants[b].total_distance()));
    }

    /// Evaporate, then let the elite ants deposit.
    fn update_pheromones(&mut self) -> AcoResult<()> {
        let params = self.problem.params();
        self.pheromones.evaporate(params.clamped_evaporation_rate());

        for &idx in self.ranking.iter().take(params.effective_elite_count()) {
            let ant = &self.ants[idx];
            let length = ant.total_distance();
            if length > 0.0 {
                self.pheromones.deposit(ant.route(), length, params.deposit_rate)?;
                tracing::trace!(ant = idx, length, "elite deposit");
            } else {
                // A zero-length tour only happens when every node coincides.
                tracing::trace!(ant = idx, "skipping deposit for zero-length tour");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ant::AntState;
    use crate::params::AcoParams;

    fn square(params: AcoParams) -> ProblemInstance {
        let coords = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        ProblemInstance::new(&coords, params).unwrap()
    }

    fn random_instance(n: usize, seed: u64, params: AcoParams) -> ProblemInstance {
        let mut rng = fastrand::Rng::with_seed(seed);
        let coords: Vec<(f64, f64)> = (0..n)
            .map(|_| (rng.f64() * 100.0, rng.f64() * 100.0))
            .collect();
        ProblemInstance::new(&coords, params).unwrap()
    }

    #[test]
    fn test_new_colony_is_unsolved() {
        let problem = square(AcoParams::default().with_seed(1));
        let colony = Colony::new(&problem);
        assert_eq!(colony.ants().len(), 10);
        assert_eq!(colony.generation(), 0);
        assert!(!colony.best().is_solved());
        assert!(colony.best().length.is_infinite());
        assert!(colony.ants().iter().all(|a| a.start() < 4));
    }

    #[test]
    fn test_generation_updates_best_and_resets_ants() {
        let problem = square(AcoParams::default().with_seed(2));
        let mut colony = Colony::new(&problem);
        let outcome = colony.run_generation().unwrap();

        assert_eq!(outcome.generation, 1);
        assert!(outcome.improved);
        assert!(outcome.best_length.is_finite());
        assert_eq!(outcome.best_route.len(), 5);
        assert_eq!(colony.best().generation, 1);
        assert!(colony
            .ants()
            .iter()
            .all(|a| a.state() == AntState::Idle && a.route().is_empty()));

        let measured = problem.tour_length(&outcome.best_route).unwrap();
        assert!((measured - outcome.best_length).abs() < 1e-9);
    }

    #[test]
    fn test_best_never_regresses() {
        let problem = random_instance(15, 9, AcoParams::default().with_seed(3));
        let mut colony = Colony::new(&problem);
        let mut previous = f64::INFINITY;
        for _ in 0..30 {
            let outcome = colony.run_generation().unwrap();
            assert!(outcome.best_length <= previous);
            assert!(outcome.best_length <= outcome.generation_best_length);
            previous = outcome.best_length;
        }
        assert!(colony.total_time() >= colony.best().elapsed);
    }

    #[test]
    fn test_same_seed_same_result() {
        let problem = random_instance(12, 4, AcoParams::default().with_seed(77));
        let mut a = Colony::new(&problem);
        let mut b = Colony::new(&problem);
        for _ in 0..10 {
            let oa = a.run_generation().unwrap();
            let ob = b.run_generation().unwrap();
            assert_eq!(oa.best_route, ob.best_route);
            assert_eq!(oa.best_length, ob.best_length);
        }
        assert_eq!(a.pheromones(), b.pheromones());
    }

    #[test]
    fn test_pheromone_update_concentrates_on_elites() {
        let params = AcoParams::default()
            .with_seed(5)
            .with_num_ants(4)
            .with_elite_count(1)
            .with_evaporation_rate(1.0);
        let problem = square(params);
        let mut colony = Colony::new(&problem);
        let outcome = colony.run_generation().unwrap();

        // Full evaporation leaves only the single elite deposit.
        let field = colony.pheromones();
        let delta = 100.0 / outcome.generation_best_length;
        let best = &outcome.best_route;
        for w in best.windows(2) {
            assert!((field.get(w[0], w[1]) - delta).abs() < 1e-9);
        }
        let reinforced = field.edges().filter(|(_, level)| *level > 0.0).count();
        assert_eq!(reinforced, 4);
    }

    #[test]
    fn test_coincident_nodes_do_not_error() {
        let coords = [(2.0, 2.0), (2.0, 2.0), (2.0, 2.0)];
        let problem = ProblemInstance::new(&coords, AcoParams::default().with_seed(8)).unwrap();
        let mut colony = Colony::new(&problem);
        let outcome = colony.run_generation().unwrap();
        assert_eq!(outcome.best_length, 0.0);
    }

    /// Builds every tour one ant after another with the same forking order
    /// as the colony, so any divergence of the parallel build shows here.
    fn sequential_reference(
        problem: &ProblemInstance,
        generations: usize,
    ) -> (Vec<usize>, f64, PheromoneField) {
        let params = problem.params();
        let n = problem.num_nodes();
        let mut rng = rng_from_seed(params.seed);
        let mut ants: Vec<Ant> = (0..params.num_ants)
            .map(|id| Ant::new(id, pick_index(&mut rng, n), n))
            .collect();
        let mut field = PheromoneField::new(n, params.initial_pheromone);
        let mut best_route = Vec::new();
        let mut best_length = f64::INFINITY;

        for _ in 0..generations {
            let mut forks: Vec<fastrand::Rng> = ants.iter().map(|_| RandomSource::fork(&mut rng)).collect();
            for (ant, fork) in ants.iter_mut().zip(forks.iter_mut()) {
                ant.build_route(problem, &field, fork).unwrap();
            }

            let mut order: Vec<usize> = (0..ants.len()).collect();
            order.sort_by(|&a, &b| ants[a].total_distance().total_cmp(&ants[b].total_distance()));
            let leader = &ants[order[0]];
            if leader.total_distance() < best_length {
                best_length = leader.total_distance();
                best_route = leader.route().to_vec();
            }

            field.evaporate(params.clamped_evaporation_rate());
            for &idx in order.iter().take(params.effective_elite_count()) {
                let ant = &ants[idx];
                field
                    .deposit(ant.route(), ant.total_distance(), params.deposit_rate)
                    .unwrap();
            }
        }
        (best_route, best_length, field)
    }

    #[test]
    fn test_matches_sequential_construction() {
        let params = AcoParams::default().with_num_ants(16).with_seed(2024);
        let problem = random_instance(25, 11, params);

        let mut colony = Colony::new(&problem);
        for _ in 0..12 {
            colony.run_generation().unwrap();
        }
        let (route, length, field) = sequential_reference(&problem, 12);

        assert_eq!(colony.best().route, route);
        assert_eq!(colony.best().length, length);
        assert_eq!(colony.pheromones(), &field);
        let checksum: f64 = colony.pheromones().edges().map(|(_, level)| level).sum();
        let expected: f64 = field.edges().map(|(_, level)| level).sum();
        assert_eq!(checksum, expected);
    }

    #[test]
    fn test_far_apart_nodes_run_cleanly() {
        let coords = [(0.0, 0.0), (1e200, 0.0), (0.0, 1e200)];
        let problem = ProblemInstance::new(&coords, AcoParams::default().with_seed(6)).unwrap();
        let mut colony = Colony::new(&problem);
        for _ in 0..3 {
            let outcome = colony.run_generation().unwrap();
            assert!(outcome.best_length.is_finite());
        }
        let expected = 2e200 + 1e200 * 2f64.sqrt();
        assert!((colony.best().length / expected - 1.0).abs() < 1e-12);
        assert!(colony.ants().iter().all(|a| a.state() == AntState::Idle));
    }

    #[test]
    fn test_single_node_instance() {
        let problem = ProblemInstance::new(&[(1.0, 1.0)], AcoParams::default()).unwrap();
        let mut colony = Colony::new(&problem);
        let outcome = colony.run_generation().unwrap();
        assert_eq!(outcome.best_route, vec![0, 0]);
        assert_eq!(outcome.best_length, 0.0);
    }
}
