//! Global simulation constants.
//!
//! This module defines the fixed parameters of the simulated machine. It includes:
//! 1. **Heap geometry:** Word count and per-block administrative overhead.
//! 2. **Device counts:** The number of simulated I/O devices.
//! 3. **Driver parameters:** Warmup length, error threshold, sample capacity.
//! 4. **Timing:** The parked slice deadline and the burst-clamp epsilon.

/// Size of the simulated heap in 64-bit words.
///
/// Every block, allocated or free, carries a boundary tag at each end; the
/// magnitudes of the tags encountered on a full traversal sum to this value.
pub const MEM_SIZE: usize = 32760;

/// Administrative overhead of a heap block in words (one boundary tag at
/// each end).
pub const ADMIN_SIZE: i64 = 2;

/// Number of simulated I/O devices.
///
/// A process cycles through the devices in order: after finishing a burst on
/// device `d` its next I/O request targets `(d + 1) % N_IO_DEVICES`.
pub const N_IO_DEVICES: usize = 3;

/// Capacity of the per-process statistics sample buffers.
///
/// Buffers are circular: sample `n` lands in slot `n % N_SAMPLES`, so a long
/// run keeps the most recent `N_SAMPLES` terminations.
pub const N_SAMPLES: usize = 40960;

/// Maximum number of detected scheduler inconsistencies before the driver
/// aborts the simulation.
pub const MAX_ERRORS: u64 = 150;

/// Smallest memory request a generated process can make, in words.
pub const MEM_MIN: i64 = 512;

/// Number of workload request templates the job-entry system draws from.
pub const N_REQUESTS: usize = 4;

/// Number of processes created before measurement starts.
///
/// The warmup fills the queues so that the measured phase observes a loaded
/// system rather than a cold start.
pub const WARMUP_PROCESSES: u64 = 100;

/// Minimum number of processes to simulate in the measured phase.
pub const MIN_PROCESSES: u64 = 5;

/// Slice deadline used to park the time-slice timer.
///
/// Far enough in the future that no simulated run reaches it; a TIME event
/// only fires after a scheduler calls `set_slice` with a nearer deadline.
pub const SLICE_PARKED: f64 = 9.9e12;

/// Smallest accepted time slice. Requests below this are raised to it so the
/// simulation always makes progress.
pub const MIN_SLICE: f64 = 1.0;

/// Threshold under which a remaining CPU burst is clamped to zero.
pub const BURST_EPS: f64 = 1.0e-12;

/// Default PRNG seed, used when none is supplied (or when 0 is supplied).
pub const DEFAULT_SEED: u64 = 1579;
