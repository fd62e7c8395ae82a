//! Simulation statistics collection and reporting.
//!
//! This module tracks the metrics of a measured phase. It provides:
//! 1. **Utilization integrals:** CPU, per-device I/O, and memory busy time.
//! 2. **Queue lengths:** Current, maximum, and time-averaged lengths of the
//!    four process queues.
//! 3. **Per-process samples:** Memory wait, first-CPU wait, execution, and
//!    turnaround times in circular buffers.
//! 4. **Reporting:** Sample summaries and 65-bin ASCII histograms.
//!
//! The driver keeps one [`Statistics`] instance per phase: the warmup
//! instance absorbs everything the first hundred processes do and is
//! discarded at the phase flip, so the measured instance sees a loaded
//! system from its first event.

use crate::common::constants::{N_IO_DEVICES, N_SAMPLES};

/// Current lengths of the four process queues, as rebuilt by the last
/// consistency check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueLens {
    /// Processes waiting for memory.
    pub new: u64,
    /// Runnable processes.
    pub ready: u64,
    /// Waiting or active I/O processes, per target device.
    pub io: [u64; N_IO_DEVICES],
    /// Finished processes awaiting cleanup.
    pub defunct: u64,
}

impl QueueLens {
    /// Total queued processes across all four queues.
    pub fn total(&self) -> u64 {
        self.new + self.ready + self.io.iter().sum::<u64>() + self.defunct
    }
}

/// Machine occupancy at the moment time advances, used to weight the
/// utilization integrals.
#[derive(Debug, Clone, Copy)]
pub struct MachineSnapshot {
    /// Whether a process holds the CPU.
    pub cpu_busy: bool,
    /// Whether each I/O device is serving a process.
    pub io_busy: [bool; N_IO_DEVICES],
    /// Words of memory currently allocated to admitted processes.
    pub mem_in_use: f64,
    /// Queue lengths as of the last consistency check.
    pub lens: QueueLens,
}

/// Summary statistics over one sample buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleSummary {
    /// Number of samples.
    pub n: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample standard deviation (n − 1 in the denominator).
    pub sigma: f64,
    /// Smallest sample.
    pub min: f32,
    /// Largest sample.
    pub max: f32,
}

/// Computes mean, sample standard deviation, minimum, and maximum of `data`.
///
/// Returns `None` for fewer than two samples.
pub fn summarize(data: &[f32]) -> Option<SampleSummary> {
    let n = data.len();
    if n < 2 {
        return None;
    }
    let mut min = data[0];
    let mut max = data[0];
    let mut mean = 0.0;
    let mut sigma = 0.0;
    for &v in data {
        mean += f64::from(v);
        sigma += f64::from(v) * f64::from(v);
        if v < min {
            min = v;
        }
        if v > max {
            max = v;
        }
    }
    mean /= n as f64;
    sigma = sigma / n as f64 - mean * mean;
    sigma = n as f64 * sigma / (n as f64 - 1.0);
    sigma = if sigma > 0.0 { sigma.sqrt() } else { 0.0 };
    Some(SampleSummary {
        n,
        mean,
        sigma,
        min,
        max,
    })
}

/// Statistics integrator for one driver phase.
#[derive(Debug, Clone)]
pub struct Statistics {
    /// Simulated time at which this integrator started.
    pub t_start: f64,

    /// Accumulated CPU busy time.
    pub cpu_util: f64,
    /// Accumulated busy time per I/O device.
    pub io_util: [f64; N_IO_DEVICES],
    /// Time integral of the words in use (divide by elapsed time for the
    /// average occupancy).
    pub mem_util: f64,

    /// Largest observed new-queue length.
    pub max_new_len: u64,
    /// Largest observed ready-queue length.
    pub max_ready_len: u64,
    /// Largest observed per-device I/O queue length.
    pub max_io_len: [u64; N_IO_DEVICES],
    /// Largest observed defunct-queue length.
    pub max_defunct_len: u64,

    /// Time integral of the new-queue length.
    pub avg_new_len: f64,
    /// Time integral of the ready-queue length.
    pub avg_ready_len: f64,
    /// Time integrals of the per-device I/O queue lengths.
    pub avg_io_len: [f64; N_IO_DEVICES],
    /// Time integral of the defunct-queue length.
    pub avg_defunct_len: f64,

    mem_wait: Vec<f32>,
    first_cpu: Vec<f32>,
    execution: Vec<f32>,
    turnaround: Vec<f32>,
    n_samples: u64,
}

impl Statistics {
    /// Creates an empty integrator starting at simulated time `t_start`.
    pub fn new(t_start: f64) -> Self {
        Self {
            t_start,
            cpu_util: 0.0,
            io_util: [0.0; N_IO_DEVICES],
            mem_util: 0.0,
            max_new_len: 0,
            max_ready_len: 0,
            max_io_len: [0; N_IO_DEVICES],
            max_defunct_len: 0,
            avg_new_len: 0.0,
            avg_ready_len: 0.0,
            avg_io_len: [0.0; N_IO_DEVICES],
            avg_defunct_len: 0.0,
            mem_wait: Vec::new(),
            first_cpu: Vec::new(),
            execution: Vec::new(),
            turnaround: Vec::new(),
            n_samples: 0,
        }
    }

    /// Advances the integrals by `t_step` under the occupancy in `snap`.
    pub fn advance(&mut self, t_step: f64, snap: &MachineSnapshot) {
        if snap.cpu_busy {
            self.cpu_util += t_step;
        }
        for d in 0..N_IO_DEVICES {
            if snap.io_busy[d] {
                self.io_util[d] += t_step;
            }
            if self.max_io_len[d] < snap.lens.io[d] {
                self.max_io_len[d] = snap.lens.io[d];
            }
            self.avg_io_len[d] += t_step * snap.lens.io[d] as f64;
        }
        self.mem_util += t_step * snap.mem_in_use;
        self.avg_new_len += t_step * snap.lens.new as f64;
        self.avg_ready_len += t_step * snap.lens.ready as f64;
        self.avg_defunct_len += t_step * snap.lens.defunct as f64;
        if self.max_new_len < snap.lens.new {
            self.max_new_len = snap.lens.new;
        }
        if self.max_ready_len < snap.lens.ready {
            self.max_ready_len = snap.lens.ready;
        }
        if self.max_defunct_len < snap.lens.defunct {
            self.max_defunct_len = snap.lens.defunct;
        }
    }

    /// Records the four per-process samples of one terminated process.
    ///
    /// Buffers are circular over [`N_SAMPLES`] entries; older samples are
    /// overwritten once the buffers are full.
    pub fn record_process(&mut self, mem_wait: f64, first_cpu: f64, execution: f64, turnaround: f64) {
        let slot = (self.n_samples % N_SAMPLES as u64) as usize;
        store(&mut self.mem_wait, slot, mem_wait as f32);
        store(&mut self.first_cpu, slot, first_cpu as f32);
        store(&mut self.execution, slot, execution as f32);
        store(&mut self.turnaround, slot, turnaround as f32);
        self.n_samples += 1;
    }

    /// Number of processes sampled since this integrator started.
    pub fn n_samples(&self) -> u64 {
        self.n_samples
    }

    /// Memory-wait samples (creation to allocation).
    pub fn mem_wait_samples(&self) -> &[f32] {
        &self.mem_wait
    }

    /// First-service samples (creation to first CPU burst).
    pub fn first_cpu_samples(&self) -> &[f32] {
        &self.first_cpu
    }

    /// Execution-time samples (allocation to termination).
    pub fn execution_samples(&self) -> &[f32] {
        &self.execution
    }

    /// Turnaround samples (creation to termination).
    pub fn turnaround_samples(&self) -> &[f32] {
        &self.turnaround
    }
}

/// Writes `value` into `slot`, growing the buffer while it is still filling.
fn store(buf: &mut Vec<f32>, slot: usize, value: f32) {
    if slot < buf.len() {
        buf[slot] = value;
    } else {
        buf.push(value);
    }
}

/// Number of histogram bins across the sample range.
const HISTO_BINS: usize = 65;

/// Height of the histogram plot in rows.
const HISTO_ROWS: usize = 18;

/// Prints a 65-bin ASCII histogram of `data` with summary lines.
///
/// Output goes to stdout. Degenerate inputs (fewer than two samples, or all
/// samples equal) print a short notice instead of a plot.
pub fn print_histogram(data: &[f32], label: &str) {
    println!("\nHistogram and statistics of {label}");
    println!("over the last {} terminated processes", data.len());

    let Some(summary) = summarize(data) else {
        println!("No data ...");
        return;
    };
    if summary.max <= summary.min {
        println!("All {} samples equal {:.1}", summary.n, summary.min);
        return;
    }

    let scaleh = (HISTO_BINS as f64 + 0.9) / f64::from(summary.max - summary.min);
    // One extra bin absorbs the maximum sample, which scales to exactly
    // HISTO_BINS; it is not displayed.
    let mut histo = [0u64; HISTO_BINS + 1];
    for &v in data {
        let j = (f64::from(v - summary.min) * scaleh) as usize;
        histo[j.min(HISTO_BINS)] += 1;
    }
    let mut hi = 0u64;
    for &count in &histo[..HISTO_BINS] {
        if count > hi {
            hi = count;
        }
    }

    // Scale the tallest bin to the plot height.
    let scale = hi as f64 / (HISTO_ROWS as f64 - 0.1);
    for i in (0..HISTO_ROWS).rev() {
        let lim = scale * i as f64;
        if i % 5 == 0 {
            print!("{lim:6.1} |");
        } else {
            print!("       |");
        }
        let mut row = String::with_capacity(HISTO_BINS);
        for &count in &histo[..HISTO_BINS] {
            row.push(if lim >= count as f64 { ' ' } else { '*' });
        }
        println!("{row}");
    }
    println!("       |----|----|----|----|----|----|----|----|----|----|----|----|----|");
    println!("       |         |         |         |         |         |         |     ");
    print!("  ");
    for i in 0..7 {
        print!("{:6.0}    ", f64::from(summary.min) + 10.0 * i as f64 / scaleh);
    }
    println!();
    println!("                                           time units");
    println!(
        "\nAverage value: {:6.1}, spread: {:6.2}",
        summary.mean, summary.sigma
    );
    println!(
        "Minimum value: {:6.1}, maximum value: {:6.1}",
        summary.min, summary.max
    );
    println!("-----------------------------------------------------------------");
}
