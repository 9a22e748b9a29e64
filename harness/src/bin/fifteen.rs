//! `fifteen`: solve a 15-puzzle and emit a verifiable run report.
//!
//! Results go to stdout as `key=value` lines; logs go to stderr
//! (filter with `RUST_LOG`, e.g. `RUST_LOG=fifteen_search=debug`).

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fifteen_harness::config::RunConfig;
use fifteen_harness::report_dir::{read_and_verify, write_report};
use fifteen_harness::runner::run;
use fifteen_kernel::board::grid::Grid;
use fifteen_search::policy::GoalPolicy;
use fifteen_search::trace::Trace;

#[derive(Parser, Debug)]
#[command(
    name = "fifteen",
    version,
    about = "Branch-and-bound 15-puzzle solver with replayable traces"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Solve a puzzle
    Solve {
        /// 16 comma-separated cells, row-major, 0 for the blank
        #[arg(long, value_name = "CSV", conflicts_with = "config")]
        tiles: Option<String>,
        /// JSON run configuration file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Maximum number of states generated after the root
        #[arg(long, value_name = "N")]
        budget: Option<u64>,
        /// Keep searching after the first goal for a cheaper one
        #[arg(long)]
        exhaust: bool,
        /// Run even if the parity test says the goal is unreachable
        #[arg(long)]
        allow_unsolvable: bool,
        /// Write the run report to this directory
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
        /// Print every trace step
        #[arg(long)]
        steps: bool,
    },
    /// Verify a report directory written by `solve --out`
    Verify {
        /// Report directory
        #[arg(long, value_name = "DIR")]
        dir: PathBuf,
        /// Print every trace step
        #[arg(long)]
        steps: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Solve {
            tiles,
            config,
            budget,
            exhaust,
            allow_unsolvable,
            out,
            steps,
        } => {
            let mut run_config = match (tiles, config) {
                (Some(csv), None) => RunConfig::new(Grid::parse_csv(&csv)?),
                (None, Some(path)) => {
                    let bytes = std::fs::read(&path)
                        .with_context(|| format!("reading {}", path.display()))?;
                    RunConfig::from_json_bytes(&bytes)?
                }
                _ => anyhow::bail!("exactly one of --tiles or --config is required"),
            };
            if let Some(budget) = budget {
                run_config.state_budget = budget;
            }
            if exhaust {
                run_config.goal_policy = GoalPolicy::ExhaustFrontier;
            }
            if allow_unsolvable {
                run_config.require_solvable = false;
            }

            let report = run(&run_config)?;
            let result = &report.result;
            if steps {
                print_steps(&result.trace);
            }
            println!("status={}", if result.is_solved() { "solved" } else { "not_found" });
            println!("termination={}", result.termination.as_str());
            if let Some(cost) = result.cost() {
                println!("cost={cost}");
            }
            let moves: Vec<&str> = result.moves().iter().map(|d| d.as_str()).collect();
            println!("moves={}", moves.join(","));
            println!("states={}", result.stats.states_created);
            println!("expansions={}", result.stats.expansions);
            println!("trace_steps={}", result.trace.len());
            println!("digest={}", report.bundle.digest);
            if let Some(dir) = out {
                write_report(&dir, &report)?;
                println!("report_dir={}", dir.display());
            }
        }
        Command::Verify { dir, steps } => {
            let loaded = read_and_verify(&dir)?;
            if steps {
                print_steps(&loaded.trace);
            }
            println!("verified=true");
            println!("trace_steps={}", loaded.trace.len());
            println!("digest={}", loaded.bundle.digest);
        }
    }
    Ok(())
}

fn print_steps(trace: &Trace) {
    for view in trace.views() {
        let step = view.step;
        println!(
            "step={} phase={} current={} known={} open={} explored={} pruned={} best={} :: {}",
            step.seq,
            step.phase,
            step.current_state_id,
            step.known_states,
            step.active_states.len(),
            step.explored_states.len(),
            step.pruned_states.len(),
            step.best_state_id.map_or_else(|| "-".to_string(), |id| id.to_string()),
            step.description
        );
        if let Some(state) = view.graph().get(step.current_state_id) {
            for line in state.grid.to_string().lines() {
                println!("    {line}");
            }
        }
    }
}
