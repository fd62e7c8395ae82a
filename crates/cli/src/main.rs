//! Process-scheduling simulator CLI.
//!
//! This binary drives a full two-phase simulation run. It performs:
//! 1. **Configuration:** workload factors and run parameters from flags, or
//!    a complete configuration from a JSON file.
//! 2. **Policy selection:** one of the shipped schedulers (FCFS,
//!    round-robin, SJF).
//! 3. **Reporting:** the engine prints queue statistics and histograms; the
//!    exit code is 1 when the scheduler error threshold was crossed.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::{fs, process};

use schedsim_core::config::Config;
use schedsim_core::sched::{Fcfs, RoundRobin, Sjf};
use schedsim_core::{RunReport, Scheduler, Simulator};

#[derive(Parser, Debug)]
#[command(
    name = "schedsim",
    version,
    about = "Discrete-event simulator for process scheduling and memory allocation",
    long_about = "Simulates a machine with one CPU, three I/O devices, and a fixed word heap.\n\
                  A run warms up with 100 processes, then measures the configured number more.\n\n\
                  Examples:\n  \
                  schedsim -c 0.5 -i 0.5 -m 0.5 -p 200\n  \
                  schedsim -c 0.9 -i 0.2 -m 0.9 -p 500 -s 42 --policy sjf\n  \
                  schedsim --config run.json --policy round-robin --quantum 4"
)]
struct Cli {
    /// CPU load factor, in (0, 1).
    #[arg(short = 'c', long = "cpu")]
    cpu: Option<f64>,

    /// I/O time factor, in (0, 1); divided by the CPU factor before use.
    #[arg(short = 'i', long = "io")]
    io: Option<f64>,

    /// Memory load, in (0, 1).
    #[arg(short = 'm', long = "memory")]
    memory: Option<f64>,

    /// Number of processes to simulate (clamped to [5, 40960]).
    #[arg(short = 'p', long = "proc")]
    proc: Option<u64>,

    /// Seed for the random generator; 0 selects the default (1579).
    #[arg(short = 's', long = "seed", default_value_t = 1579)]
    seed: u64,

    /// Scheduling policy.
    #[arg(long, value_enum, default_value_t = Policy::Fcfs)]
    policy: Policy,

    /// Time-slice quantum for the round-robin policy, in time units.
    #[arg(long, default_value_t = 5.0)]
    quantum: f64,

    /// Read the whole configuration from a JSON file; the workload and run
    /// flags above are ignored.
    #[arg(long, conflicts_with_all = ["cpu", "io", "memory", "proc"])]
    config: Option<PathBuf>,
}

/// The shipped scheduling policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Policy {
    /// First-come-first-served, no preemption.
    Fcfs,
    /// Round-robin with a fixed quantum.
    RoundRobin,
    /// Shortest-job-first by memory request.
    Sjf,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    println!("Simulation of memory allocation and process scheduling");
    println!("schedsim {}", env!("CARGO_PKG_VERSION"));

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("Error: {message}");
            process::exit(2);
        }
    };
    if let Err(e) = config.validate() {
        eprintln!("Error: {e}");
        process::exit(2);
    }

    println!("CPU: {}", config.load.cpu);
    println!("io: {}", config.load.io);
    println!("mem: {}", config.load.memory);
    println!("Requested processes: {}", config.run.processes);
    println!();

    let report = match cli.policy {
        Policy::Fcfs => run_with(&config, Fcfs::new()),
        Policy::RoundRobin => run_with(&config, RoundRobin::new(cli.quantum)),
        Policy::Sjf => run_with(&config, Sjf::new()),
    };

    process::exit(i32::from(report.aborted));
}

/// Builds the configuration from the JSON file or from the four workload
/// flags (all of which are then required).
fn build_config(cli: &Cli) -> Result<Config, String> {
    if let Some(path) = &cli.config {
        let text =
            fs::read_to_string(path).map_err(|e| format!("cannot read {}: {e}", path.display()))?;
        return serde_json::from_str(&text)
            .map_err(|e| format!("cannot parse {}: {e}", path.display()));
    }

    let (Some(cpu), Some(io), Some(memory), Some(processes)) =
        (cli.cpu, cli.io, cli.memory, cli.proc)
    else {
        return Err("specify --cpu, --io, --memory and --proc (or --config <file>)".to_string());
    };

    let mut config = Config::default();
    config.load.cpu = cpu;
    config.load.io = io;
    config.load.memory = memory;
    config.run.processes = processes;
    config.run.seed = cli.seed;
    Ok(config)
}

/// Runs the simulation under the given policy and returns its report.
fn run_with<S: Scheduler>(config: &Config, scheduler: S) -> RunReport {
    match Simulator::new(config, scheduler) {
        Ok(mut sim) => sim.run(),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(2);
        }
    }
}
