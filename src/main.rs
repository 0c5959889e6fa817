//! aco-tsp: solve a TSPLIB instance with an ant colony.

use ant_colony_tsp::{
    tsplib, AcoParams, AcoResult, BenchmarkReference, LogObserver, OptimizationDriver,
    ProblemInstance,
};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "aco-tsp")]
#[command(about = "Ant colony optimization for symmetric TSP instances")]
#[command(version)]
struct Cli {
    /// TSPLIB instance file with a NODE_COORD_SECTION
    instance: PathBuf,

    /// JSON file with colony parameters; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of ants
    #[arg(long)]
    ants: Option<usize>,

    /// Pheromone importance (alpha)
    #[arg(long)]
    alpha: Option<f64>,

    /// Heuristic importance (beta)
    #[arg(long)]
    beta: Option<f64>,

    /// Evaporation rate, clamped into [0, 1]
    #[arg(long)]
    evaporation: Option<f64>,

    /// Pheromone deposit rate
    #[arg(long)]
    deposit: Option<f64>,

    /// Number of elite ants that deposit pheromone
    #[arg(long)]
    elite: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Number of generations
    #[arg(short, long, default_value = "100")]
    generations: usize,

    /// JSON object of best known lengths; defaults to the bundled TSPLIB set
    #[arg(long)]
    benchmarks: Option<PathBuf>,

    /// Print a progress line every N generations
    #[arg(long, default_value = "10")]
    log_every: usize,

    /// Write the solution as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> AcoResult<()> {
    let params = load_params(cli)?;
    let reference = match &cli.benchmarks {
        Some(path) => BenchmarkReference::from_json(&std::fs::read_to_string(path)?)?,
        None => BenchmarkReference::tsplib()?,
    };

    let coords = tsplib::read_node_coords(&cli.instance)?;
    let name = coords.name.unwrap_or_else(|| "unnamed".to_string());
    let problem = ProblemInstance::from_nodes(coords.nodes, params)?
        .with_name(name)
        .with_reference(&reference);

    println!("Problem: {} ({} nodes)", problem.name(), problem.num_nodes());

    let mut driver = OptimizationDriver::new(&problem);
    let mut observer = LogObserver::new(cli.log_every);
    let solution = driver.optimize(cli.generations, &mut observer)?;

    println!();
    println!("Best length:     {:.4}", solution.length);
    println!("Found at:        generation {}", solution.generation_found);
    match solution.gap_percent(&reference, problem.name()) {
        Some(gap) => println!(
            "Best known:      {} (gap {gap:.2}%)",
            problem.best_known_length()
        ),
        None => println!("Best known:      ?"),
    }
    println!("Route:           {:?}", solution.route);

    if let Some(path) = &cli.output {
        write_solution(path, &solution)?;
        println!("Solution written to {}", path.display());
    }
    Ok(())
}

fn load_params(cli: &Cli) -> AcoResult<AcoParams> {
    let mut params = match &cli.config {
        Some(path) => AcoParams::from_json(&std::fs::read_to_string(path)?)?,
        None => AcoParams::default(),
    };
    if let Some(ants) = cli.ants {
        params = params.with_num_ants(ants);
    }
    if let Some(alpha) = cli.alpha {
        params = params.with_alpha(alpha);
    }
    if let Some(beta) = cli.beta {
        params = params.with_beta(beta);
    }
    if let Some(rate) = cli.evaporation {
        params = params.with_evaporation_rate(rate);
    }
    if let Some(rate) = cli.deposit {
        params = params.with_deposit_rate(rate);
    }
    if let Some(elite) = cli.elite {
        params = params.with_elite_count(elite);
    }
    if let Some(seed) = cli.seed {
        params = params.with_seed(seed);
    }
    Ok(params)
}

fn write_solution(path: &Path, solution: &ant_colony_tsp::Solution) -> AcoResult<()> {
    let json = serde_json::to_string_pretty(solution)?;
    std::fs::write(path, json)?;
    Ok(())
}
