//! Round-robin scheduling.

use super::{give_memory, reclaim_memory, Event, Scheduler, SchedulerApi};

/// Round-robin policy with a fixed quantum.
///
/// A TIME event rotates the head of the ready queue to its tail. After every
/// callback the head process, whichever it now is, gets a fresh quantum, so
/// each scheduling decision restarts the slice timer.
#[derive(Debug, Clone, Copy)]
pub struct RoundRobin {
    quantum: f64,
}

impl RoundRobin {
    /// Creates the policy with the given quantum in simulated time units.
    /// Quanta below the simulator's minimum slice are raised to it when the
    /// slice is requested.
    pub fn new(quantum: f64) -> Self {
        Self { quantum }
    }
}

impl Scheduler for RoundRobin {
    fn on_event(&mut self, event: Event, api: &mut SchedulerApi<'_>) {
        match event {
            Event::NewProcess => give_memory(api),
            Event::Time => {
                if let Some(pid) = api.queues.ready.pop_front() {
                    api.queues.ready.push_back(pid);
                }
            }
            Event::Ready | Event::Io => {}
            Event::Finish => {
                reclaim_memory(api);
                give_memory(api);
            }
        }
        if !api.queues.ready.is_empty() {
            api.set_slice(self.quantum);
        }
    }
}
