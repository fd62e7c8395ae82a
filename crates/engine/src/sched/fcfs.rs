//! First-come-first-served scheduling.

use super::{give_memory, reclaim_memory, Event, Scheduler, SchedulerApi};

/// First-come-first-served policy.
///
/// Admission walks the new queue in arrival order; the ready and I/O queues
/// keep their natural order, so the process that became runnable first runs
/// first and runs until it blocks or finishes. No time slice is requested.
#[derive(Debug, Default, Clone, Copy)]
pub struct Fcfs;

impl Fcfs {
    /// Creates the policy.
    pub fn new() -> Self {
        Self
    }
}

impl Scheduler for Fcfs {
    fn on_event(&mut self, event: Event, api: &mut SchedulerApi<'_>) {
        match event {
            Event::NewProcess => give_memory(api),
            Event::Time | Event::Ready | Event::Io => {}
            Event::Finish => {
                reclaim_memory(api);
                give_memory(api);
            }
        }
    }
}
