//! Process control blocks, queues, and the process table.
//!
//! Every simulated process is represented by two records joined by a stable
//! handle instead of a pair of cross-pointers:
//! 1. **[`SimPcb`]:** the simulator-private record: needs, progress, bursts,
//!    timestamps, and lifecycle state. Schedulers never see it.
//! 2. **[`StudentPcb`]:** the scheduler-visible record: the memory request,
//!    the base address the scheduler fills in once, and a free-form user-data
//!    slot.
//!
//! The four process queues are owned deques of handles; the master list used
//! by the consistency check is the SIM collection iterated in `proc_num`
//! order.

use std::any::Any;
use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use crate::common::constants::N_IO_DEVICES;

/// Stable process handle: the process's unique, monotonically assigned
/// number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pid(pub u64);

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a simulated process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcState {
    /// Created, waiting for memory; belongs in the new queue.
    Init,
    /// Runnable (or running, when at the head of the ready queue).
    Ready,
    /// Performing (or waiting for) I/O.
    Io,
    /// Finished, waiting for reclamation.
    Defunct,
}

/// Identifies one of the four process queues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueId {
    /// Processes waiting for memory.
    New,
    /// Runnable processes; the head owns the CPU.
    Ready,
    /// Processes doing or awaiting I/O.
    Io,
    /// Finished processes awaiting cleanup.
    Defunct,
}

/// Simulator-private process record.
///
/// Holds everything the event loop needs: service demands and progress,
/// current burst lengths, event timestamps, and the queue tag maintained by
/// the consistency check.
#[derive(Debug, Clone)]
pub struct SimPcb {
    /// Total CPU time this process needs before it finishes.
    pub cpu_need: f64,
    /// Baseline I/O demand per device, from the request template.
    pub io_need: [f64; N_IO_DEVICES],
    /// CPU time consumed so far.
    pub cpu_used: f64,
    /// I/O time consumed so far, per device.
    pub io_used: [f64; N_IO_DEVICES],
    /// Remaining length of the current CPU burst.
    pub cpu_burst: f64,
    /// Length of the current I/O burst, per device.
    pub io_burst: [f64; N_IO_DEVICES],
    /// Creation time.
    pub t_create: f64,
    /// Time memory was allocated (stamped by the consistency check).
    pub t_mem_alloc: f64,
    /// Time of first CPU service.
    pub t_cpu: f64,
    /// Start time of the I/O burst in progress.
    pub t_io: f64,
    /// Time the process entered the defunct state.
    pub t_end: f64,
    /// Words of memory this process needs.
    pub mem_need: i64,
    /// Base of the allocated memory block, −1 until the simulator observes
    /// an allocation on the student side.
    pub mem_base: i64,
    /// Unique process number; equal to the handle value.
    pub proc_num: u64,
    /// Device index of the next I/O request.
    pub io_queue: usize,
    /// Remaining I/O bursts before the workload stops requesting I/O.
    pub io_cycles: i64,
    /// Lifecycle state.
    pub state: ProcState,
    /// Queue this process was found in during the last consistency check;
    /// `None` marks an orphan.
    pub in_queue: Option<QueueId>,
}

/// Scheduler-visible process record.
pub struct StudentPcb {
    /// Handle of the process this record belongs to.
    pub pid: Pid,
    /// Words of memory the process needs. Filled by the simulator; do not
    /// change it.
    pub mem_need: i64,
    /// Base of the block the scheduler allocated, −1 until then. To admit a
    /// process, allocate `mem_need` words and store the returned index here
    /// exactly once.
    pub mem_base: i64,
    /// Free-form slot for scheduler bookkeeping. The simulator never touches
    /// it; it is dropped with the record.
    pub userdata: Option<Box<dyn Any>>,
}

impl fmt::Debug for StudentPcb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StudentPcb")
            .field("pid", &self.pid)
            .field("mem_need", &self.mem_need)
            .field("mem_base", &self.mem_base)
            .field("userdata", &self.userdata.is_some())
            .finish()
    }
}

/// Owning store of all live processes.
///
/// SIM and STU records live in two parallel maps keyed by [`Pid`]. Iterating
/// the SIM map in key order visits processes in creation order, which is the
/// master-list traversal the consistency check relies on.
#[derive(Debug, Default)]
pub struct ProcessTable {
    sims: BTreeMap<Pid, SimPcb>,
    studs: BTreeMap<Pid, StudentPcb>,
}

impl ProcessTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a freshly created process pair.
    pub fn insert(&mut self, pid: Pid, sim: SimPcb, stud: StudentPcb) {
        let prev_sim = self.sims.insert(pid, sim);
        let prev_stud = self.studs.insert(pid, stud);
        debug_assert!(prev_sim.is_none() && prev_stud.is_none());
    }

    /// Removes both records of `pid`, dropping any scheduler user-data.
    pub fn remove(&mut self, pid: Pid) {
        let _ = self.sims.remove(&pid);
        let _ = self.studs.remove(&pid);
    }

    /// Whether `pid` is still live.
    pub fn contains(&self, pid: Pid) -> bool {
        self.sims.contains_key(&pid)
    }

    /// Number of live processes.
    pub fn len(&self) -> usize {
        self.sims.len()
    }

    /// Whether the table holds no live processes.
    pub fn is_empty(&self) -> bool {
        self.sims.is_empty()
    }

    /// Shared access to the SIM record of `pid`.
    ///
    /// # Panics
    ///
    /// Panics if `pid` is not live.
    pub fn sim(&self, pid: Pid) -> &SimPcb {
        &self.sims[&pid]
    }

    /// Mutable access to the SIM record of `pid`.
    ///
    /// # Panics
    ///
    /// Panics if `pid` is not live.
    pub fn sim_mut(&mut self, pid: Pid) -> &mut SimPcb {
        match self.sims.get_mut(&pid) {
            Some(sim) => sim,
            None => panic!("no live process {pid}"),
        }
    }

    /// Shared access to the STU record of `pid`.
    ///
    /// # Panics
    ///
    /// Panics if `pid` is not live.
    pub fn stud(&self, pid: Pid) -> &StudentPcb {
        &self.studs[&pid]
    }

    /// Mutable access to the STU record of `pid`.
    ///
    /// # Panics
    ///
    /// Panics if `pid` is not live.
    pub fn stud_mut(&mut self, pid: Pid) -> &mut StudentPcb {
        match self.studs.get_mut(&pid) {
            Some(stud) => stud,
            None => panic!("no live process {pid}"),
        }
    }

    /// Mutable access to both records of `pid` at once.
    ///
    /// # Panics
    ///
    /// Panics if `pid` is not live.
    pub fn pair_mut(&mut self, pid: Pid) -> (&mut SimPcb, &mut StudentPcb) {
        match (self.sims.get_mut(&pid), self.studs.get_mut(&pid)) {
            (Some(sim), Some(stud)) => (sim, stud),
            _ => panic!("no live process {pid}"),
        }
    }

    /// Live handles in creation order (the master-list traversal).
    pub fn pids(&self) -> impl Iterator<Item = Pid> + '_ {
        self.sims.keys().copied()
    }
}

/// The four process queues, as owned deques of handles.
///
/// The simulator moves processes between queues on event transitions; the
/// scheduler may reorder them during its callback. A live process sits in
/// exactly one queue; violations are repaired (and counted) by the
/// consistency check.
#[derive(Debug, Default)]
pub struct ProcQueues {
    /// Processes waiting for memory, in arrival order.
    pub new: VecDeque<Pid>,
    /// Runnable processes; the head owns the CPU.
    pub ready: VecDeque<Pid>,
    /// Processes doing or awaiting I/O.
    pub io: VecDeque<Pid>,
    /// Finished processes awaiting cleanup.
    pub defunct: VecDeque<Pid>,
}

impl ProcQueues {
    /// Creates four empty queues.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared access to the queue identified by `id`.
    pub fn queue(&self, id: QueueId) -> &VecDeque<Pid> {
        match id {
            QueueId::New => &self.new,
            QueueId::Ready => &self.ready,
            QueueId::Io => &self.io,
            QueueId::Defunct => &self.defunct,
        }
    }

    /// Mutable access to the queue identified by `id`.
    pub fn queue_mut(&mut self, id: QueueId) -> &mut VecDeque<Pid> {
        match id {
            QueueId::New => &mut self.new,
            QueueId::Ready => &mut self.ready,
            QueueId::Io => &mut self.io,
            QueueId::Defunct => &mut self.defunct,
        }
    }

    /// Removes the first occurrence of `pid` from queue `id`. Returns whether
    /// anything was removed.
    pub fn remove(&mut self, id: QueueId, pid: Pid) -> bool {
        let queue = self.queue_mut(id);
        if let Some(pos) = queue.iter().position(|&p| p == pid) {
            let _ = queue.remove(pos);
            true
        } else {
            false
        }
    }

    /// Total number of queued handles across all four queues.
    pub fn total_len(&self) -> usize {
        self.new.len() + self.ready.len() + self.io.len() + self.defunct.len()
    }
}
