//! The discrete-event simulator core.
//!
//! This module owns the whole simulated machine and drives it. It provides:
//! 1. **Event selection:** [`Simulator::step`] picks the soonest event among
//!    the next arrival, the slice deadline, the running process's burst end,
//!    and each device's I/O completion, advancing simulated time.
//! 2. **Dispatch:** per-event queue transitions, the scheduler callback, and
//!    I/O device assignment.
//! 3. **Consistency checking:** after every callback the queues and PCBs are
//!    reconciled; scheduler mistakes are repaired and counted.
//! 4. **The driver:** [`Simulator::run`] executes the warmup phase, flips
//!    the statistics, runs the measured phase, and prints the final report.

use crate::common::constants::{
    BURST_EPS, MAX_ERRORS, MEM_SIZE, MIN_PROCESSES, N_IO_DEVICES, N_SAMPLES, SLICE_PARKED,
    WARMUP_PROCESSES,
};
use crate::common::error::ConfigError;
use crate::config::Config;
use crate::jes::JobSource;
use crate::mem::WordHeap;
use crate::proc::{Pid, ProcQueues, ProcState, ProcessTable, QueueId};
use crate::rng::Xorshift64Star;
use crate::sched::{Event, Scheduler, SchedulerApi};
use crate::stats::{
    print_histogram, summarize, MachineSnapshot, QueueLens, SampleSummary, Statistics,
};

/// Cross-event bookkeeping shared with the scheduler API.
#[derive(Debug, Default, Clone, Copy)]
pub struct Accounting {
    /// Words of memory currently allocated to admitted processes.
    pub mem_in_use: f64,
    /// Processes torn down since the start of the run (never reset).
    pub num_terminated: u64,
    /// Scheduler inconsistencies detected so far.
    pub n_errors: u64,
}

/// Final outcome of a simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Processes created over the whole run, warmup included.
    pub created: u64,
    /// Processes torn down over the whole run.
    pub terminated: u64,
    /// Processes torn down during the measured phase.
    pub measured_terminations: u64,
    /// Scheduler inconsistencies detected.
    pub errors: u64,
    /// Whether the error threshold was crossed (the process exit code
    /// should be nonzero).
    pub aborted: bool,
    /// Simulated time at the end of the run.
    pub t_end: f64,
    /// Summary of the memory-wait samples, when at least two were taken.
    pub mem_wait: Option<SampleSummary>,
    /// Summary of the first-service samples.
    pub first_cpu: Option<SampleSummary>,
    /// Summary of the execution-time samples.
    pub execution: Option<SampleSummary>,
    /// Summary of the turnaround samples.
    pub turnaround: Option<SampleSummary>,
}

/// The simulated machine: one CPU, three I/O devices, a word heap, and the
/// process population, driven by a scheduling policy `S`.
#[derive(Debug)]
pub struct Simulator<S> {
    scheduler: S,
    rng: Xorshift64Star,
    heap: WordHeap,
    table: ProcessTable,
    queues: ProcQueues,
    jes: JobSource,
    stats: Statistics,
    acct: Accounting,
    lens: QueueLens,
    t_now: f64,
    t_slice: f64,
    current_cpu: Option<Pid>,
    current_io: [Option<Pid>; N_IO_DEVICES],
    cur_event: Event,
    n_to_create: u64,
}

impl<S: Scheduler> Simulator<S> {
    /// Builds a simulator from `config`, driven by `scheduler`.
    ///
    /// Validates the configuration and clamps the process count to
    /// [5, 40960].
    pub fn new(config: &Config, scheduler: S) -> Result<Self, ConfigError> {
        config.validate()?;

        let requested = config.run.processes;
        let n_to_create = requested.clamp(MIN_PROCESSES, N_SAMPLES as u64);
        if n_to_create != requested {
            tracing::info!(requested, used = n_to_create, "process count clamped");
        }

        let jes = JobSource::new(&config.load);
        if jes.mem_range() <= 0 {
            tracing::warn!(
                mem_range = jes.mem_range(),
                "workload factors imply a non-positive memory range; process generation will panic"
            );
        }

        Ok(Self {
            scheduler,
            rng: Xorshift64Star::new(config.run.seed),
            heap: WordHeap::new(),
            table: ProcessTable::new(),
            queues: ProcQueues::new(),
            jes,
            stats: Statistics::new(0.0),
            acct: Accounting::default(),
            lens: QueueLens::default(),
            t_now: 0.0,
            t_slice: SLICE_PARKED,
            current_cpu: None,
            current_io: [None; N_IO_DEVICES],
            cur_event: Event::NewProcess,
            n_to_create,
        })
    }

    /// Current simulated time.
    pub fn time(&self) -> f64 {
        self.t_now
    }

    /// Number of scheduler inconsistencies detected so far.
    pub fn errors(&self) -> u64 {
        self.acct.n_errors
    }

    /// Number of processes created so far (warmup included).
    pub fn created(&self) -> u64 {
        self.jes.created()
    }

    /// Number of processes torn down so far.
    pub fn terminated(&self) -> u64 {
        self.acct.num_terminated
    }

    /// The four process queues.
    pub fn queues(&self) -> &ProcQueues {
        &self.queues
    }

    /// The simulated heap.
    pub fn heap(&self) -> &WordHeap {
        &self.heap
    }

    /// The statistics integrator of the current phase.
    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    /// Lifecycle state of `pid`, if it is still live.
    pub fn process_state(&self, pid: Pid) -> Option<ProcState> {
        self.table.contains(pid).then(|| self.table.sim(pid).state)
    }

    /// Student-side memory base of `pid`, if it is still live.
    pub fn process_mem_base(&self, pid: Pid) -> Option<i64> {
        self.table.contains(pid).then(|| self.table.stud(pid).mem_base)
    }

    /// Memory requirement of `pid` in words, if it is still live.
    pub fn process_mem_need(&self, pid: Pid) -> Option<i64> {
        self.table.contains(pid).then(|| self.table.stud(pid).mem_need)
    }

    /// Executes the pending event and selects the next one.
    ///
    /// Returns the event that was executed.
    pub fn step(&mut self) -> Event {
        let event = self.cur_event;
        self.dispatch(event);
        self.cur_event = self.find_next_event();
        event
    }

    /// Runs the full two-phase simulation and prints the final report.
    ///
    /// Phase one creates [`WARMUP_PROCESSES`] processes with a throwaway
    /// statistics integrator; phase two runs until the configured process
    /// count has been created on top of the warmup. Either phase stops early
    /// once more than [`MAX_ERRORS`] inconsistencies have been detected.
    pub fn run(&mut self) -> RunReport {
        while self.jes.created() < WARMUP_PROCESSES {
            let _ = self.step();
            if self.acct.n_errors > MAX_ERRORS {
                println!("\n*****************************************");
                println!("Too many errors - aborting the simulation");
                break;
            }
        }

        // Warmup over: discard the first integrator and measure from here.
        self.stats = Statistics::new(self.t_now);
        self.scheduler.reset_stats();
        tracing::info!(t_start = self.t_now, "warmup complete, measurement started");

        let limit = WARMUP_PROCESSES + self.n_to_create;
        while self.jes.created() < limit {
            let _ = self.step();
            if self.acct.n_errors > MAX_ERRORS {
                println!("\n*****************************************");
                println!("Too many errors - aborting the simulation");
                break;
            }
        }

        self.print_statistics();
        self.scheduler.finale();
        self.heap.reset();
        self.report()
    }

    /// Summarizes the run without printing.
    pub fn report(&self) -> RunReport {
        RunReport {
            created: self.jes.created(),
            terminated: self.acct.num_terminated,
            measured_terminations: self.stats.n_samples(),
            errors: self.acct.n_errors,
            aborted: self.acct.n_errors > MAX_ERRORS,
            t_end: self.t_now,
            mem_wait: summarize(self.stats.mem_wait_samples()),
            first_cpu: summarize(self.stats.first_cpu_samples()),
            execution: summarize(self.stats.execution_samples()),
            turnaround: summarize(self.stats.turnaround_samples()),
        }
    }

    /// Executes one event: queue transition, scheduler callback, consistency
    /// check, and (after I/O related events) device assignment.
    fn dispatch(&mut self, event: Event) {
        match event {
            Event::NewProcess => {
                self.spawn_process();
                self.call_scheduler(event);
                self.check_all();
            }
            Event::Time => {
                // Park the timer again so a scheduler that stops calling
                // set_slice cannot wedge the simulation on TIME events.
                self.t_slice = self.t_now + SLICE_PARKED;
                self.call_scheduler(event);
                self.check_all();
            }
            Event::Ready => {
                self.ready_process();
                self.call_scheduler(event);
                self.check_all();
                self.do_io();
            }
            Event::Io => {
                self.begin_io();
                self.call_scheduler(event);
                self.check_all();
                self.do_io();
            }
            Event::Finish => {
                self.finish_process();
                self.call_scheduler(event);
                self.check_all();
            }
        }
    }

    /// Hands one event to the scheduling policy.
    fn call_scheduler(&mut self, event: Event) {
        let mut api = SchedulerApi::new(
            &mut self.queues,
            &mut self.table,
            &mut self.heap,
            &mut self.stats,
            &mut self.acct,
            self.t_now,
            &mut self.t_slice,
        );
        self.scheduler.on_event(event, &mut api);
    }

    /// Creates the next process and appends it to the new queue and the
    /// master table.
    fn spawn_process(&mut self) {
        let (sim, stud) = self.jes.spawn(self.t_now, &mut self.rng);
        let pid = Pid(sim.proc_num);
        self.queues.new.push_back(pid);
        self.table.insert(pid, sim, stud);
    }

    /// Moves the process that completed its I/O burst from the I/O queue to
    /// the tail of the ready queue and gives it a new CPU burst.
    fn ready_process(&mut self) {
        let candidate = self
            .queues
            .io
            .iter()
            .copied()
            .find(|&pid| self.table.sim(pid).state == ProcState::Ready);
        if let Some(pid) = candidate {
            let draw = self.rng.real1();
            let sim = self.table.sim_mut(pid);
            sim.cpu_burst = (sim.cpu_need - sim.cpu_used) / (1.0 + sim.io_cycles as f64);
            sim.cpu_burst *= 0.6 + 0.8 * draw;
            let _ = self.queues.remove(QueueId::Io, pid);
            self.queues.ready.push_back(pid);
        }
    }

    /// Moves the running process to the tail of the I/O queue.
    fn begin_io(&mut self) {
        let Some(pid) = self.current_cpu else { return };
        self.table.sim_mut(pid).state = ProcState::Io;
        let _ = self.queues.remove(QueueId::Ready, pid);
        self.queues.io.push_back(pid);
    }

    /// Moves the running process to the *head* of the defunct queue.
    fn finish_process(&mut self) {
        let Some(pid) = self.current_cpu else { return };
        let t_now = self.t_now;
        let sim = self.table.sim_mut(pid);
        sim.state = ProcState::Defunct;
        sim.t_end = t_now;
        let _ = self.queues.remove(QueueId::Ready, pid);
        self.queues.defunct.push_front(pid);
    }

    /// Starts I/O on every idle device that has a waiter.
    ///
    /// Each idle device takes the first process in the I/O queue whose next
    /// request targets it. Burst lengths: device 0 is constant, devices 1
    /// and 2 are uniform draws, all scaled by the I/O time factor.
    fn do_io(&mut self) {
        for d in 0..N_IO_DEVICES {
            if self.current_io[d].is_some() {
                continue;
            }
            let candidate = self
                .queues
                .io
                .iter()
                .copied()
                .find(|&pid| self.table.sim(pid).io_queue == d);
            let Some(pid) = candidate else { continue };

            self.current_io[d] = Some(pid);
            let t_now = self.t_now;
            let burst = match d {
                0 => 3.0,
                1 => 1.0 + 4.0 * self.rng.real1(),
                _ => 4.0 + 12.0 * self.rng.real1(),
            };
            let io_time_factor = self.jes.io_time_factor();
            let sim = self.table.sim_mut(pid);
            sim.t_io = t_now;
            if sim.io_cycles < 1 {
                sim.io_cycles = 1;
            }
            sim.io_burst[d] = burst * io_time_factor;
            sim.io_cycles -= 1;
        }
    }

    /// Reconciles queues and PCBs after a scheduler callback.
    ///
    /// Adopts student-side memory allocations, rebuilds the queue-length
    /// counters and queue tags, promotes admitted processes out of the INIT
    /// state, re-inserts orphaned processes into the queue matching their
    /// state (counting an error for each), and selects the running process.
    fn check_all(&mut self) {
        let pids: Vec<Pid> = self.table.pids().collect();

        // Adopt fresh allocations and clear the queue tags.
        for &pid in &pids {
            let t_now = self.t_now;
            let (sim, stud) = self.table.pair_mut(pid);
            if sim.mem_base != stud.mem_base && sim.mem_base <= 0 {
                sim.mem_base = stud.mem_base;
                sim.t_mem_alloc = t_now;
                self.acct.mem_in_use += sim.mem_need as f64;
            }
            sim.in_queue = None;
        }

        // Walk the queues: recount and tag.
        self.lens.new = self.queues.new.len() as u64;
        for &pid in &self.queues.new {
            self.table.sim_mut(pid).in_queue = Some(QueueId::New);
        }

        self.lens.ready = 0;
        for &pid in &self.queues.ready {
            self.lens.ready += 1;
            let sim = self.table.sim_mut(pid);
            sim.in_queue = Some(QueueId::Ready);
            if sim.state == ProcState::Init {
                sim.state = ProcState::Ready;
            }
        }

        self.lens.io = [0; N_IO_DEVICES];
        for &pid in &self.queues.io {
            let sim = self.table.sim_mut(pid);
            sim.in_queue = Some(QueueId::Io);
            self.lens.io[sim.io_queue] += 1;
        }

        self.lens.defunct = self.queues.defunct.len() as u64;
        for &pid in &self.queues.defunct {
            self.table.sim_mut(pid).in_queue = Some(QueueId::Defunct);
        }

        // Any untagged process was dropped by the scheduler: put it back at
        // the head of the queue its state calls for.
        for &pid in &pids {
            if self.table.sim(pid).in_queue.is_some() {
                continue;
            }
            self.acct.n_errors += 1;
            let state = self.table.sim(pid).state;
            tracing::warn!(
                proc = pid.0,
                state = ?state,
                "process is in no queue, reinserting"
            );
            let id = match state {
                ProcState::Init => QueueId::New,
                ProcState::Ready => QueueId::Ready,
                ProcState::Io => QueueId::Io,
                ProcState::Defunct => QueueId::Defunct,
            };
            self.queues.queue_mut(id).push_front(pid);
            self.table.sim_mut(pid).in_queue = Some(id);
        }

        self.current_cpu = self.queues.ready.front().copied();
    }

    /// Selects the soonest pending event and advances simulated time to it.
    ///
    /// Ties break in the order: new arrival, slice expiry, CPU burst end,
    /// device 0, device 1, device 2. While time advances, the running
    /// process consumes CPU and the statistics integrals accumulate; a READY
    /// outcome releases its device here so `do_io` can reassign it during
    /// the event's dispatch.
    fn find_next_event(&mut self) -> Event {
        let mut next_event = Event::NewProcess;
        let mut t_next = self.jes.t_next_new();
        let mut io_done: Option<Pid> = None;

        if self.t_slice < t_next {
            next_event = Event::Time;
            t_next = self.t_slice;
        }
        if let Some(pid) = self.current_cpu {
            let sim = self.table.sim(pid);
            let t_event = self.t_now + sim.cpu_burst;
            if t_event < t_next {
                t_next = t_event;
                next_event = if sim.cpu_burst + sim.cpu_used >= sim.cpu_need {
                    Event::Finish
                } else {
                    Event::Io
                };
            }
        }
        for d in 0..N_IO_DEVICES {
            if let Some(pid) = self.current_io[d] {
                let sim = self.table.sim(pid);
                let t_event = sim.io_burst[d] + sim.t_io;
                if t_event < t_next {
                    t_next = t_event;
                    next_event = Event::Ready;
                    io_done = Some(pid);
                }
            }
        }

        let t_step = t_next - self.t_now;

        // Whatever comes next, the process on the CPU ran until then.
        if let Some(pid) = self.current_cpu {
            let t_now = self.t_now;
            let sim = self.table.sim_mut(pid);
            if sim.cpu_used == 0.0 {
                sim.t_cpu = t_now;
            }
            sim.cpu_used += t_step;
            sim.cpu_burst -= t_step;
            if sim.cpu_burst < BURST_EPS {
                sim.cpu_burst = 0.0;
            }
        }

        let snapshot = MachineSnapshot {
            cpu_busy: self.current_cpu.is_some(),
            io_busy: [
                self.current_io[0].is_some(),
                self.current_io[1].is_some(),
                self.current_io[2].is_some(),
            ],
            mem_in_use: self.acct.mem_in_use,
            lens: self.lens,
        };
        self.stats.advance(t_step, &snapshot);

        // A READY outcome frees the device and readies the process now; the
        // queue move happens when the event is dispatched.
        if next_event == Event::Ready {
            if let Some(pid) = io_done {
                let sim = self.table.sim_mut(pid);
                let d = sim.io_queue;
                self.current_io[d] = None;
                sim.state = ProcState::Ready;
                sim.io_used[d] += sim.io_burst[d];
                sim.io_queue = (d + 1) % N_IO_DEVICES;
            }
        }

        self.t_now += t_step;
        next_event
    }

    /// Prints the final report: queue statistics, utilizations, the
    /// process-conservation cross-check, and the four sample histograms.
    fn print_statistics(&self) {
        let span = self.t_now - self.stats.t_start;

        println!("Statistics at time = {:6.0}", self.t_now);
        println!(
            "Statistics collection started after {} created processes",
            WARMUP_PROCESSES
        );
        println!("\tat time {}", self.stats.t_start);
        println!(
            "Processes tracked: {}, completed: {}",
            self.jes.created().saturating_sub(WARMUP_PROCESSES),
            self.stats.n_samples()
        );

        let mem_wait = self.queues.new.len();
        let cpu_wait = self.queues.ready.len();
        let io_wait = self.queues.io.len();
        let defunct_wait = self.queues.defunct.len();

        println!("Processes waiting for memory: {mem_wait}");
        println!(
            "Maximum was: {}, average was {}",
            self.stats.max_new_len,
            self.stats.avg_new_len / span
        );
        println!(
            "Average memory in use: {:6.0} words, utilization {:6.4}",
            self.stats.mem_util / span,
            self.stats.mem_util / (span * MEM_SIZE as f64)
        );
        println!("Processes in the ready queue:          {cpu_wait}");
        println!(
            "Maximum was: {}, average was {}",
            self.stats.max_ready_len,
            self.stats.avg_ready_len / span
        );
        println!(
            "\nCPU time used: {:6.0}, CPU utilization: {:6.4}",
            self.stats.cpu_util,
            self.stats.cpu_util / span
        );
        println!("Processes in the I/O queue:            {io_wait}");
        for d in 0..N_IO_DEVICES {
            println!(
                "Maximum for device {} was: {}, average {}",
                d,
                self.stats.max_io_len[d],
                self.stats.avg_io_len[d] / span
            );
            println!(
                "Time used on I/O device {}: {:6.0}, utilization: {:6.4}",
                d,
                self.stats.io_util[d],
                self.stats.io_util[d] / span
            );
        }
        println!("Processes awaiting cleanup:            {defunct_wait}");
        println!(
            "Maximum was: {}, average was {}",
            self.stats.max_defunct_len,
            self.stats.avg_defunct_len / span
        );

        let accounted =
            self.acct.num_terminated + (mem_wait + cpu_wait + io_wait + defunct_wait) as u64;
        if accounted != self.jes.created() {
            println!(
                "The total number of processes does not add up;\n\
                 has one of the queues been corrupted?"
            );
            println!(
                "Counted: {}, expected: {}",
                accounted,
                self.jes.created()
            );
        }

        print_histogram(
            self.stats.mem_wait_samples(),
            "waiting time for memory allocation",
        );
        print_histogram(
            self.stats.first_cpu_samples(),
            "waiting time for first CPU service",
        );
        print_histogram(
            self.stats.execution_samples(),
            "execution time since memory allocation",
        );
        print_histogram(self.stats.turnaround_samples(), "total turnaround time");

        println!("\nEnd of statistics ----------\n");
    }
}
