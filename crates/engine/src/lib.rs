//! Discrete-event simulator for operating-system process scheduling.
//!
//! This crate implements a single-threaded, deterministic simulation of a
//! machine with one CPU, three I/O devices, and a fixed word-addressed
//! memory, exercising two algorithmic kernels:
//! 1. **Allocator:** a boundary-tag first-fit heap with twin-directional
//!    placement and free-block coalescing.
//! 2. **Scheduling:** an event-driven callback surface: a [`Scheduler`]
//!    receives {new, time-slice, ready, io, finish} events and manages
//!    admission, CPU dispatch, and reclamation across four process queues.
//!
//! Around the kernels sit the job-entry system (a synthetic arrival stream),
//! the event loop with a post-event consistency check that repairs and
//! counts scheduler mistakes, and two-phase statistics (a warmup of 100
//! processes, then a measured phase with utilization integrals, per-process
//! samples, and histograms). Given a seed and a policy, a run is exactly
//! reproducible.

/// Common types and constants (heap geometry, thresholds, errors).
pub mod common;
/// Simulation configuration (workload factors, run parameters).
pub mod config;
/// Job-entry system: the synthetic process arrival stream.
pub mod jes;
/// Boundary-tag heap allocator over a fixed word array.
pub mod mem;
/// Process control blocks, queues, and the process table.
pub mod proc;
/// Deterministic xorshift* pseudo-random number generation.
pub mod rng;
/// The scheduling surface: events, the scheduler trait, shipped policies.
pub mod sched;
/// The event loop, consistency check, and two-phase driver.
pub mod sim;
/// Statistics integrators, sample summaries, and histograms.
pub mod stats;

/// Root configuration type; build from CLI flags or deserialize from JSON.
pub use crate::config::Config;
/// The simulated heap; one per simulator.
pub use crate::mem::WordHeap;
/// The scheduling surface.
pub use crate::sched::{Event, Scheduler, SchedulerApi};
/// The simulator and the outcome of a run.
pub use crate::sim::{RunReport, Simulator};
