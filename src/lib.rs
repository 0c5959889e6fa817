//! Ant colony optimization for the symmetric travelling salesman problem.
//!
//! A [`Colony`] of ants repeatedly builds tours over a [`ProblemInstance`],
//! biased by a shared [`PheromoneField`] that the best tours of each
//! generation reinforce. An [`OptimizationDriver`] runs the generations and
//! reports progress to a [`ProgressObserver`].
//!
//! ```no_run
//! use ant_colony_tsp::{AcoParams, OptimizationDriver, ProblemInstance};
//!
//! let coords = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
//! let params = AcoParams::default().with_num_ants(10).with_seed(42);
//! let problem = ProblemInstance::new(&coords, params)?;
//!
//! let mut driver = OptimizationDriver::new(&problem);
//! let solution = driver.run(20)?;
//! println!("{:?} has length {}", solution.route, solution.length);
//! # Ok::<(), ant_colony_tsp::AcoError>(())
//! ```

pub mod ant;
pub mod benchmark;
pub mod colony;
pub mod driver;
pub mod error;
pub mod observer;
pub mod params;
pub mod pheromone;
pub mod problem;
pub mod sampling;
pub mod tsplib;

pub use ant::{Ant, AntState};
pub use benchmark::BenchmarkReference;
pub use colony::{Colony, GenerationOutcome, SolutionState};
pub use driver::{IterationRecord, OptimizationDriver, Solution};
pub use error::{AcoError, AcoResult};
pub use observer::{
    ChannelObserver, Flow, GenerationSummary, LogObserver, NoOpObserver, Progress,
    ProgressObserver,
};
pub use params::AcoParams;
pub use pheromone::{EdgeKey, PheromoneField};
pub use problem::{DistanceMatrix, Node, ProblemInstance};
pub use sampling::RandomSource;
