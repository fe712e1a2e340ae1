use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use twophase_solver::{LpProblem, Solution, SolveError, Solver, Validation};

#[derive(Parser)]
#[command(name = "twophase")]
#[command(about = "Two-phase simplex solver for two-variable linear programs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a problem and output the optimal solution
    Solve {
        /// JSON file containing the problem
        file: PathBuf,
        /// Output format (json, pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
        /// Show every simplex iteration
        #[arg(short, long)]
        iterations: bool,
        /// Skip the vertex enumeration cross-check
        #[arg(long)]
        no_cross_check: bool,
        /// Phase II iteration cap
        #[arg(long, default_value_t = twophase_solver::numeric::PHASE_TWO_MAX_ITERATIONS)]
        max_iterations: usize,
        /// Phase I iteration cap
        #[arg(long, default_value_t = twophase_solver::numeric::PHASE_ONE_MAX_ITERATIONS)]
        phase_one_max_iterations: usize,
        /// Tolerance for floating point comparisons
        #[arg(long, default_value_t = twophase_solver::numeric::EPS)]
        tolerance: f64,
    },
    /// Check a problem file for errors without solving it
    Check {
        /// JSON file containing the problem
        file: PathBuf,
    },
    /// Solve a problem and output its iteration records as JSON
    Iterations {
        /// JSON file containing the problem
        file: PathBuf,
    },
}

fn load_problem(file: &Path) -> LpProblem {
    let source = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            std::process::exit(1);
        }
    };

    match serde_json::from_str(&source) {
        Ok(problem) => problem,
        Err(e) => {
            eprintln!("Parse error: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            std::process::exit(1);
        }
    }
}

fn fail(error: &SolveError, format: &str) -> ! {
    if format == "json" {
        print_json(&error.report());
    } else {
        println!("Status: {}", error.kind().code());
        println!("{}", error.message());
    }
    std::process::exit(1);
}

fn print_solution(problem: &LpProblem, solution: &Solution, iterations: bool) {
    println!("Problem: {}", problem.name);
    println!("Status: OPTIMAL");
    println!("Objective value: {}", solution.objective_value);
    println!();
    println!("Variables:");
    for name in &problem.variables {
        println!("  {:10} {:>14.6}", name, solution.value(name).unwrap_or(0.0));
    }

    if iterations {
        println!();
        println!("Iterations:");
        for record in solution.iteration_records() {
            print!("  #{:<3} objective {:>12.6}", record.iteration_number, record.objective_value);
            if let (Some(entering), Some(leaving)) = (&record.entering_var, &record.leaving_var) {
                print!("  {} enters, {} leaves", entering, leaving);
            }
            if record.is_optimal {
                print!("  (final)");
            }
            println!();
            for row in &record.tableau {
                let cells: Vec<String> = row.iter().map(|v| format!("{:>10.4}", v)).collect();
                println!("      {}", cells.join(" "));
            }
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            file,
            format,
            iterations,
            no_cross_check,
            max_iterations,
            phase_one_max_iterations,
            tolerance,
        } => {
            let problem = load_problem(&file);
            log::info!("Loaded {} with {} constraints", file.display(), problem.num_constraints());

            let solver = Solver::new()
                .with_max_iterations(max_iterations)
                .with_phase_one_max_iterations(phase_one_max_iterations)
                .with_tolerance(tolerance)
                .with_cross_check(!no_cross_check);

            match solver.solve(&problem) {
                Ok(solution) if format == "json" => print_json(&solution),
                Ok(solution) => print_solution(&problem, &solution, iterations),
                Err(e) => fail(&e, &format),
            }
        }
        Commands::Check { file } => {
            let problem = load_problem(&file);
            match twophase_solver::validate(&problem) {
                Validation::Valid => {
                    println!("✓ {} is valid", file.display());
                    println!("  {} variables", problem.num_variables());
                    println!("  {} constraints", problem.num_constraints());
                    for (i, c) in problem.constraints.iter().enumerate() {
                        let lhs: Vec<String> = c
                            .coefficients
                            .iter()
                            .map(|t| format!("{} {}", t.value, t.variable))
                            .collect();
                        println!("    c{}: {} {} {}", i + 1, lhs.join(" + "), c.operator.symbol(), c.rhs);
                    }
                    if twophase_solver::can_use_standard_form(&twophase_solver::normalize_to_le(&problem)) {
                        println!("  standard form (Phase I not needed)");
                    } else {
                        println!("  Phase I required");
                    }
                }
                Validation::Infeasible(reason) => {
                    eprintln!("✗ {} has no feasible solution:", file.display());
                    eprintln!("  {}", reason);
                    std::process::exit(1);
                }
                Validation::Invalid(reason) => {
                    eprintln!("✗ {} has errors:", file.display());
                    eprintln!("  {}", reason);
                    std::process::exit(1);
                }
            }
        }
        Commands::Iterations { file } => {
            let problem = load_problem(&file);
            match Solver::new().solve(&problem) {
                Ok(solution) => print_json(&solution.iteration_records()),
                Err(e) => fail(&e, "json"),
            }
        }
    }
}
