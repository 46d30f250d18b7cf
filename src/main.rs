//! # u-placement
//!
//! Command-line placement optimizer.
//!
//! ## Usage
//!
//! ```bash
//! # Optimize a problem file with default GA settings
//! u-placement problem.txt
//!
//! # Reproducible run with a smaller budget
//! u-placement problem.txt --seed 42 --generations 200 --population 50
//!
//! # Read from stdin, exact search, JSON report
//! u-placement --exhaustive --json < problem.txt
//! ```
//!
//! ## Configuration (config.json)
//!
//! ```json
//! {
//!   "population_size": 100,
//!   "max_generations": 1000,
//!   "mutation_rate": 0.3,
//!   "crossover_rate": 0.8,
//!   "seed": 42,
//!   "parallel": true,
//!   "dependency_mode": "chromosome_order"
//! }
//! ```
//!
//! Command-line flags override values from the config file.

use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use u_placement::ga::{DependencyMode, Evaluator, GaConfig};
use u_placement::io::{read_problem, write_schedule};
use u_placement::models::Problem;
use u_placement::scheduler::{ExhaustiveScheduler, ScheduleKpi};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "u-placement")]
#[command(about = "Assign jobs to machines and disks with a short makespan")]
#[command(version)]
struct Args {
    /// Problem file (reads stdin when omitted)
    input: Option<PathBuf>,

    /// GA configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// RNG seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Generation budget
    #[arg(short, long)]
    generations: Option<usize>,

    /// Population size
    #[arg(short, long)]
    population: Option<usize>,

    /// Per-gene mutation rate
    #[arg(long)]
    mutation_rate: Option<f64>,

    /// Per-pair crossover rate
    #[arg(long)]
    crossover_rate: Option<f64>,

    /// Resolve dependencies in topological order instead of chromosome order
    #[arg(long)]
    topological: bool,

    /// Evaluate populations on a single thread
    #[arg(long)]
    sequential: bool,

    /// Use exhaustive branch and bound instead of the GA
    #[arg(long)]
    exhaustive: bool,

    /// Node budget for the exhaustive search
    #[arg(long, default_value_t = ExhaustiveScheduler::DEFAULT_NODE_BUDGET)]
    node_budget: usize,

    /// Print a JSON report instead of schedule lines
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Config file values with command-line overrides applied.
    fn ga_config(&self) -> Result<GaConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => GaConfig::default(),
        };

        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(generations) = self.generations {
            config = config.with_max_generations(generations);
        }
        if let Some(population) = self.population {
            config = config.with_population_size(population);
        }
        if let Some(rate) = self.mutation_rate {
            config = config.with_mutation_rate(rate);
        }
        if let Some(rate) = self.crossover_rate {
            config = config.with_crossover_rate(rate);
        }
        if self.topological {
            config = config.with_dependency_mode(DependencyMode::Topological);
        }
        if self.sequential {
            config = config.with_parallel(false);
        }
        Ok(config)
    }

    fn read_input(&self) -> Result<String> {
        match &self.input {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("reading problem {}", path.display())),
            None => {
                let mut text = String::new();
                io::stdin()
                    .read_to_string(&mut text)
                    .context("reading problem from stdin")?;
                Ok(text)
            }
        }
    }
}

// ============================================================================
// Main
// ============================================================================

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    let config = args.ga_config()?;
    let text = args.read_input()?;
    let problem = read_problem(&text).context("loading problem")?;
    let (data, env) = problem.dependency_count();
    info!(
        jobs = problem.job_count(),
        machines = problem.machine_count(),
        disks = problem.disk_count(),
        data_deps = data,
        env_deps = env,
        "problem loaded"
    );

    let mut stdout = io::stdout().lock();
    if args.exhaustive {
        run_exhaustive(&args, &config, &problem, &mut stdout)
    } else {
        run_ga(&args, &config, &problem, &mut stdout)
    }
}

fn run_ga(args: &Args, config: &GaConfig, problem: &Problem, out: &mut impl Write) -> Result<()> {
    let result = u_placement::optimize(problem, config).context("optimizing placement")?;
    let schedule = result.schedule(problem)?;
    info!(makespan = result.makespan, "placement found");

    if args.json {
        let kpi = ScheduleKpi::calculate(&schedule, problem);
        let report = json!({
            "solver": "ga",
            "makespan": result.makespan,
            "schedule": schedule,
            "kpi": kpi,
            "generations": result.generations,
            "degenerate_generations": result.degenerate_generations,
            "evaluations": result.evaluations,
            "history": result.history,
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        write_schedule(&schedule, out)?;
    }
    Ok(())
}

fn run_exhaustive(
    args: &Args,
    config: &GaConfig,
    problem: &Problem,
    out: &mut impl Write,
) -> Result<()> {
    let outcome = ExhaustiveScheduler::new()
        .with_mode(config.dependency_mode)
        .with_node_budget(args.node_budget)
        .search(problem);

    let Some((chromosome, makespan)) = &outcome.best else {
        bail!(
            "no feasible schedule found after {} search nodes{}",
            outcome.nodes,
            if outcome.complete { "" } else { " (budget exhausted)" }
        );
    };
    if !outcome.complete {
        warn!(nodes = outcome.nodes, "node budget exhausted, placement may not be optimal");
    }

    let schedule = Evaluator::new(problem)
        .with_mode(config.dependency_mode)
        .decode(chromosome)?;
    info!(makespan, optimal = outcome.complete, "placement found");

    if args.json {
        let kpi = ScheduleKpi::calculate(&schedule, problem);
        let report = json!({
            "solver": "exhaustive",
            "makespan": makespan,
            "schedule": schedule,
            "kpi": kpi,
            "nodes": outcome.nodes,
            "complete": outcome.complete,
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        write_schedule(&schedule, out)?;
    }
    Ok(())
}
