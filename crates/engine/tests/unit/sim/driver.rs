//! # Driver Run Tests
//!
//! Full two-phase runs under the shipped policies: sane statistics, zero
//! detected errors, process conservation, and exact reproducibility.

use crate::common::config;
use schedsim_core::common::constants::{MEM_SIZE, WARMUP_PROCESSES};
use schedsim_core::sched::{Fcfs, RoundRobin, Sjf};
use schedsim_core::Simulator;

/// A balanced FCFS run completes the configured workload without a single
/// detected inconsistency and yields a finite turnaround distribution.
#[test]
fn fcfs_sanity_run() {
    let cfg = config(0.5, 0.5, 0.5, 200, 1579);
    let mut sim = Simulator::new(&cfg, Fcfs::new()).unwrap();
    let report = sim.run();

    assert_eq!(report.errors, 0);
    assert!(!report.aborted);
    assert_eq!(report.created, WARMUP_PROCESSES + 200);
    // Conservation: every created process either terminated or still sits
    // in exactly one queue.
    assert_eq!(
        report.terminated + sim.queues().total_len() as u64,
        report.created
    );
    // All 200 measured arrivals happened; most of them also completed.
    assert!(report.measured_terminations > 100);

    let turnaround = report.turnaround.expect("enough samples");
    assert!(turnaround.mean.is_finite());
    assert!(turnaround.mean > 0.0);
    assert!(turnaround.min >= 0.0);
    assert!(turnaround.max >= turnaround.min);

    let mem_wait = report.mem_wait.expect("enough samples");
    assert!(mem_wait.mean.is_finite());
    assert!(mem_wait.min >= 0.0);
}

/// Identical configurations and policies reproduce the identical run.
#[test]
fn identical_seeds_reproduce_the_run() {
    let cfg = config(0.5, 0.5, 0.5, 100, 1579);
    let a = Simulator::new(&cfg, Fcfs::new()).unwrap().run();
    let b = Simulator::new(&cfg, Fcfs::new()).unwrap().run();
    assert_eq!(a, b);
}

/// Different seeds diverge.
#[test]
fn different_seeds_diverge() {
    let a = Simulator::new(&config(0.5, 0.5, 0.5, 100, 1579), Fcfs::new())
        .unwrap()
        .run();
    let b = Simulator::new(&config(0.5, 0.5, 0.5, 100, 1580), Fcfs::new())
        .unwrap()
        .run();
    assert_ne!(a.t_end, b.t_end);
}

/// A high-load SJF run stays consistent and does not starve admission: the
/// new queue stays small even under memory pressure.
#[test]
fn sjf_starvation_stress() {
    let cfg = config(0.9, 0.2, 0.9, 500, 42);
    let mut sim = Simulator::new(&cfg, Sjf::new()).unwrap();
    let report = sim.run();

    assert_eq!(report.errors, 0);
    assert!(!report.aborted);
    assert_eq!(report.created, WARMUP_PROCESSES + 500);
    assert_eq!(
        report.terminated + sim.queues().total_len() as u64,
        report.created
    );
    assert!(sim.queues().new.len() < 100);
}

/// Round-robin preemption drives TIME events without upsetting the
/// bookkeeping.
#[test]
fn round_robin_run_is_consistent() {
    let cfg = config(0.5, 0.5, 0.5, 100, 7);
    let mut sim = Simulator::new(&cfg, RoundRobin::new(5.0)).unwrap();
    let report = sim.run();

    assert_eq!(report.errors, 0);
    assert!(!report.aborted);
    assert_eq!(
        report.terminated + sim.queues().total_len() as u64,
        report.created
    );
}

/// The process count is clamped to the documented minimum.
#[test]
fn process_count_clamped_to_minimum() {
    let cfg = config(0.5, 0.5, 0.5, 1, 1579);
    let mut sim = Simulator::new(&cfg, Fcfs::new()).unwrap();
    let report = sim.run();
    assert_eq!(report.created, WARMUP_PROCESSES + 5);
}

/// The heap is reinitialized when a run ends.
#[test]
fn heap_reset_after_run() {
    let cfg = config(0.5, 0.5, 0.5, 10, 1579);
    let mut sim = Simulator::new(&cfg, Fcfs::new()).unwrap();
    let _ = sim.run();
    let avail = sim.heap().available();
    assert_eq!(avail.empty, MEM_SIZE as i64);
    assert_eq!(avail.holes, 1);
}

/// An invalid configuration is rejected at construction.
#[test]
fn invalid_config_is_rejected() {
    let cfg = config(0.0, 0.5, 0.5, 100, 1579);
    assert!(Simulator::new(&cfg, Fcfs::new()).is_err());
}
