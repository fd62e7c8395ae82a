//! Job-entry system: the synthetic process arrival stream.
//!
//! Each arrival is drawn from one of four request templates and randomized:
//! 1. **CPU need:** one of four multipliers (4·3^k) times a uniform factor,
//!    giving job classes of roughly 4, 12, 36, and 108 time units.
//! 2. **I/O cycles:** an even count between 2 and 20; a process alternates
//!    CPU bursts with I/O bursts, walking the devices round-robin.
//! 3. **Memory:** a request between `MEM_MIN` and three quarters of the
//!    heap, scaled by the configured memory load.
//!
//! The template of the *next* arrival also selects its inter-arrival delay,
//! so arrivals come strongly clustered. The order of PRNG draws is part of
//! the workload contract: changing it changes every downstream event.

use crate::common::constants::{MEM_MIN, MEM_SIZE, N_IO_DEVICES, N_REQUESTS};
use crate::config::LoadConfig;
use crate::proc::{Pid, ProcState, SimPcb, StudentPcb};
use crate::rng::Xorshift64Star;

/// One workload request template.
#[derive(Debug, Clone, Copy)]
struct JobTemplate {
    /// Baseline CPU need (overwritten per arrival).
    cpu_need: f64,
    /// Baseline I/O demand per device.
    io_need: [f64; N_IO_DEVICES],
    /// Initial CPU burst length (overwritten per arrival).
    cpu_burst: f64,
    /// Initial I/O burst lengths.
    io_burst: [f64; N_IO_DEVICES],
    /// Baseline memory request in words (overwritten per arrival).
    mem_need: i64,
    /// Baseline I/O cycle count (overwritten per arrival).
    io_cycles: i64,
    /// Inter-arrival delay selected when this template is chosen as the next
    /// request. The average over the four templates is 40 time units.
    t_delay: f64,
}

/// The four request templates.
const TEMPLATES: [JobTemplate; N_REQUESTS] = [
    JobTemplate {
        cpu_need: 10.0,
        io_need: [5.0, 11.0, 15.0],
        cpu_burst: 3.0,
        io_burst: [3.0, 5.0, 3.0],
        mem_need: 4096,
        io_cycles: 10,
        t_delay: 4.0,
    },
    JobTemplate {
        cpu_need: 20.0,
        io_need: [35.0, 41.0, 55.0],
        cpu_burst: 3.0,
        io_burst: [3.0, 5.0, 3.0],
        mem_need: 1024,
        io_cycles: 13,
        t_delay: 27.0,
    },
    JobTemplate {
        cpu_need: 70.0,
        io_need: [15.0, 21.0, 15.0],
        cpu_burst: 3.0,
        io_burst: [3.0, 5.0, 3.0],
        mem_need: 2048,
        io_cycles: 2,
        t_delay: 112.0,
    },
    JobTemplate {
        cpu_need: 10.0,
        io_need: [5.0, 51.0, 15.0],
        cpu_burst: 3.0,
        io_burst: [3.0, 5.0, 3.0],
        mem_need: 8192,
        io_cycles: 4,
        t_delay: 17.0,
    },
];

/// The job-entry system: spawns processes and schedules the next arrival.
#[derive(Debug, Clone)]
pub struct JobSource {
    load_factor: f64,
    io_time_factor: f64,
    mem_load: f64,
    /// Template of the next arrival; the first process always uses
    /// template 0.
    next_request: usize,
    /// Absolute time of the next arrival.
    t_next_new: f64,
    /// Number of processes created so far; doubles as the next process
    /// number.
    created: u64,
}

impl JobSource {
    /// Creates a job source for the given workload factors.
    pub fn new(load: &LoadConfig) -> Self {
        Self {
            load_factor: load.cpu,
            io_time_factor: load.io_time_factor(),
            mem_load: load.memory,
            next_request: 0,
            t_next_new: 0.0,
            created: 0,
        }
    }

    /// Absolute time of the next scheduled arrival.
    pub fn t_next_new(&self) -> f64 {
        self.t_next_new
    }

    /// Number of processes created so far.
    pub fn created(&self) -> u64 {
        self.created
    }

    /// The effective per-burst I/O scale.
    pub fn io_time_factor(&self) -> f64 {
        self.io_time_factor
    }

    /// Width of the memory-request distribution in words, truncated toward
    /// zero.
    ///
    /// Process generation requires this to be positive; combinations of load
    /// factors that drive it to zero or below violate a documented
    /// precondition of [`JobSource::spawn`].
    pub fn mem_range(&self) -> i64 {
        (5.0
            * (self.mem_load * MEM_SIZE as f64
                / (1.25 * self.load_factor + 1.75 * self.io_time_factor)
                - MEM_MIN as f64)) as i64
    }

    /// Creates the next process and schedules the arrival after it.
    ///
    /// Returns the SIM/STU record pair; the caller appends them to the new
    /// queue and the process table.
    ///
    /// # Panics
    ///
    /// Panics when the configured workload factors make
    /// [`mem_range`](JobSource::mem_range) non-positive; supplying factors
    /// with a positive range is a documented precondition.
    pub fn spawn(&mut self, t_now: f64, rng: &mut Xorshift64Star) -> (SimPcb, StudentPcb) {
        let template = &TEMPLATES[self.next_request];

        // Start from the template, then randomize the fields that vary per
        // arrival.
        let mut sim = SimPcb {
            cpu_need: template.cpu_need,
            io_need: template.io_need,
            cpu_used: 0.0,
            io_used: [0.0; N_IO_DEVICES],
            cpu_burst: template.cpu_burst,
            io_burst: template.io_burst,
            t_create: t_now,
            t_mem_alloc: 0.0,
            t_cpu: 0.0,
            t_io: 0.0,
            t_end: 0.0,
            mem_need: template.mem_need,
            mem_base: -1,
            proc_num: 0,
            io_queue: 0,
            io_cycles: template.io_cycles,
            state: ProcState::Init,
            in_queue: None,
        };

        // CPU need: multiplier 4 * 3^k, k uniform over 0..=3.
        let mut cpu_factor = 4.0;
        let mut k = (rng.int31() % 32) >> 3;
        while k > 0 {
            cpu_factor *= 3.0;
            k -= 1;
        }
        sim.cpu_need = cpu_factor * (0.5 + rng.real1());

        sim.io_cycles = 2 * (1 + rng.int31() % 10);
        sim.cpu_burst = sim.cpu_need / (1.0 + sim.io_cycles as f64);
        sim.cpu_burst *= 0.8 + 0.4 * rng.real1();

        let spread = 1 + rng.int31() % self.mem_range();
        sim.mem_need = MEM_MIN + rng.int31() % spread;
        if sim.mem_need > 3 * (MEM_SIZE as i64) / 4 {
            sim.mem_need = 3 * (MEM_SIZE as i64) / 4;
        }

        sim.proc_num = self.created;
        self.created += 1;

        let stud = StudentPcb {
            pid: Pid(sim.proc_num),
            mem_need: sim.mem_need,
            mem_base: -1,
            userdata: None,
        };

        // The draw below picks both the template of the next arrival and its
        // inter-arrival delay.
        self.next_request = (rng.int31() % N_REQUESTS as i64) as usize;
        self.t_next_new = t_now + TEMPLATES[self.next_request].t_delay / self.load_factor;

        tracing::debug!(
            proc = sim.proc_num,
            cpu_need = sim.cpu_need,
            io_cycles = sim.io_cycles,
            mem_need = sim.mem_need,
            "process created"
        );

        (sim, stud)
    }
}
