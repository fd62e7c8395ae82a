//! The scheduling surface: events, the scheduler trait, and its API.
//!
//! The simulator is policy-free. After every event it hands control to a
//! [`Scheduler`], which sees the four process queues and the student side of
//! every PCB through a [`SchedulerApi`] and decides:
//! 1. **Admission:** which waiting processes get memory (and move to ready).
//! 2. **Dispatch:** which process sits at the head of the ready queue (the
//!    head owns the CPU).
//! 3. **Reclamation:** when finished processes are cleaned up.
//! 4. **Preemption:** an optional time slice via [`SchedulerApi::set_slice`].
//!
//! Three ready-made policies ship with the crate: first-come-first-served,
//! round-robin, and shortest-job-first.

use crate::common::constants::MIN_SLICE;
use crate::mem::{MemAvailable, WordHeap};
use crate::proc::{Pid, ProcQueues, ProcessTable, QueueId, StudentPcb};
use crate::sim::Accounting;
use crate::stats::Statistics;

mod fcfs;
mod round_robin;
mod sjf;

pub use fcfs::Fcfs;
pub use round_robin::RoundRobin;
pub use sjf::Sjf;

/// The five scheduler events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A new process joined the tail of the new queue and waits for memory.
    NewProcess,
    /// The running process used up its time slice. Only generated after a
    /// [`SchedulerApi::set_slice`] call.
    Time,
    /// A process finished I/O and was appended to the ready queue.
    Ready,
    /// The running process started I/O and was appended to the I/O queue.
    Io,
    /// The running process terminated and sits at the head of the defunct
    /// queue, awaiting reclamation.
    Finish,
}

/// A scheduling policy.
///
/// `on_event` is called after the simulator has updated the queues for the
/// event; the callback runs to completion before the next event is chosen.
pub trait Scheduler {
    /// Reacts to `event` by rearranging queues, admitting processes, or
    /// reclaiming finished ones.
    fn on_event(&mut self, event: Event, api: &mut SchedulerApi<'_>);

    /// Called once after the final report has been printed.
    fn finale(&mut self) {}

    /// Called when the warmup phase ends and measurement begins; reset any
    /// policy-private statistics here.
    fn reset_stats(&mut self) {}
}

impl<S: Scheduler + ?Sized> Scheduler for Box<S> {
    fn on_event(&mut self, event: Event, api: &mut SchedulerApi<'_>) {
        (**self).on_event(event, api);
    }

    fn finale(&mut self) {
        (**self).finale();
    }

    fn reset_stats(&mut self) {
        (**self).reset_stats();
    }
}

/// The simulator surface a scheduler works against.
///
/// Borrowed for the duration of one callback. The queues are directly
/// reorderable; everything else goes through methods. SIM records stay
/// private: a policy only ever sees the [`StudentPcb`] side.
#[derive(Debug)]
pub struct SchedulerApi<'a> {
    /// The four process queues, free to reorder.
    pub queues: &'a mut ProcQueues,
    table: &'a mut ProcessTable,
    heap: &'a mut WordHeap,
    stats: &'a mut Statistics,
    acct: &'a mut Accounting,
    t_now: f64,
    t_slice: &'a mut f64,
}

impl<'a> SchedulerApi<'a> {
    pub(crate) fn new(
        queues: &'a mut ProcQueues,
        table: &'a mut ProcessTable,
        heap: &'a mut WordHeap,
        stats: &'a mut Statistics,
        acct: &'a mut Accounting,
        t_now: f64,
        t_slice: &'a mut f64,
    ) -> Self {
        Self {
            queues,
            table,
            heap,
            stats,
            acct,
            t_now,
            t_slice,
        }
    }

    /// Current simulated wall-clock time.
    pub fn sim_time(&self) -> f64 {
        self.t_now
    }

    /// Requests a TIME event after `slice` time units (at least
    /// [`MIN_SLICE`], to guarantee progress).
    ///
    /// Only one slice timer exists: every call overwrites the previous
    /// deadline. The simulator parks the timer again before delivering each
    /// TIME event.
    pub fn set_slice(&mut self, slice: f64) {
        let slice = if slice < MIN_SLICE { MIN_SLICE } else { slice };
        *self.t_slice = self.t_now + slice;
    }

    /// Allocates `size` words of simulated memory; `None` when no block
    /// fits. Store the returned base in the process's
    /// [`mem_base`](StudentPcb::mem_base) to admit it.
    pub fn mem_get(&mut self, size: i64) -> Option<i64> {
        self.heap.alloc(size)
    }

    /// Frees the block at `base`. Invalid bases are ignored.
    pub fn mem_free(&mut self, base: i64) {
        self.heap.free(base);
    }

    /// Free-space summary of the simulated heap.
    pub fn mem_available(&self) -> MemAvailable {
        self.heap.available()
    }

    /// Internal-fragmentation ratio of the simulated heap.
    pub fn mem_internal(&self) -> f64 {
        self.heap.internal_fragmentation()
    }

    /// The student record of `pid`.
    ///
    /// # Panics
    ///
    /// Panics if `pid` is not a live process.
    pub fn stud(&self, pid: Pid) -> &StudentPcb {
        self.table.stud(pid)
    }

    /// Mutable student record of `pid`.
    ///
    /// # Panics
    ///
    /// Panics if `pid` is not a live process.
    pub fn stud_mut(&mut self, pid: Pid) -> &mut StudentPcb {
        self.table.stud_mut(pid)
    }

    /// Tears down a finished process.
    ///
    /// Records its four per-process statistics samples, returns its memory
    /// accounting, removes it from the defunct queue and the process table,
    /// and drops both records (including any scheduler user-data). Free the
    /// process's heap block *before* calling this; teardown does not do it.
    pub fn rm_process(&mut self, pid: Pid) {
        let sim = self.table.sim(pid);
        let mem_wait = sim.t_mem_alloc - sim.t_create;
        let first_cpu = sim.t_cpu - sim.t_create;
        let execution = self.t_now - sim.t_mem_alloc;
        let turnaround = self.t_now - sim.t_create;
        let mem_need = sim.mem_need;

        self.stats
            .record_process(mem_wait, first_cpu, execution, turnaround);
        self.acct.num_terminated += 1;
        self.acct.mem_in_use -= mem_need as f64;

        let _ = self.queues.remove(QueueId::Defunct, pid);
        self.table.remove(pid);
    }
}

/// Admits waiting processes: scans the whole new queue and, for every
/// process whose request fits, allocates memory, fills in its base, and
/// moves it to the tail of the ready queue.
///
/// Does not stop at the first failure: a smaller request further back may
/// still fit.
pub fn give_memory(api: &mut SchedulerApi<'_>) {
    let waiting: Vec<Pid> = api.queues.new.iter().copied().collect();
    for pid in waiting {
        let need = api.stud(pid).mem_need;
        if let Some(base) = api.mem_get(need) {
            api.stud_mut(pid).mem_base = base;
            let _ = api.queues.remove(QueueId::New, pid);
            api.queues.ready.push_back(pid);
        }
    }
}

/// Reclaims every process in the defunct queue: frees its heap block, clears
/// its base, and tears it down.
pub fn reclaim_memory(api: &mut SchedulerApi<'_>) {
    while let Some(&pid) = api.queues.defunct.front() {
        let base = api.stud(pid).mem_base;
        api.mem_free(base);
        api.stud_mut(pid).mem_base = -1;
        api.rm_process(pid);
    }
}
