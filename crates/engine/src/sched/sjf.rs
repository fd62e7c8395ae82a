//! Shortest-job-first scheduling.

use super::{give_memory, reclaim_memory, Event, Scheduler, SchedulerApi};
use crate::proc::Pid;

/// Shortest-job-first policy.
///
/// The student surface exposes no CPU demand, so the memory request stands
/// in as the job-size signal: after every event the ready queue is reordered
/// by ascending `mem_need` (ties broken by process number). The sort is
/// applied on arrival too, so a shorter job preempts the head.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sjf;

impl Sjf {
    /// Creates the policy.
    pub fn new() -> Self {
        Self
    }
}

impl Scheduler for Sjf {
    fn on_event(&mut self, event: Event, api: &mut SchedulerApi<'_>) {
        match event {
            Event::NewProcess => give_memory(api),
            Event::Time | Event::Ready | Event::Io => {}
            Event::Finish => {
                reclaim_memory(api);
                give_memory(api);
            }
        }
        sort_ready(api);
    }
}

/// Stable-sorts the ready queue by ascending memory request.
fn sort_ready(api: &mut SchedulerApi<'_>) {
    let mut pids: Vec<Pid> = api.queues.ready.iter().copied().collect();
    pids.sort_by_key(|&pid| (api.stud(pid).mem_need, pid));
    api.queues.ready.clear();
    api.queues.ready.extend(pids);
}
