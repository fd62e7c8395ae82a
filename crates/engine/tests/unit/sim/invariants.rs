//! # Cross-State Invariant Tests
//!
//! Steps a live simulation and checks, at every event boundary, the
//! invariants tying queues, states, counters, and the heap together.

use crate::common::config;
use schedsim_core::common::constants::MEM_SIZE;
use schedsim_core::proc::ProcState;
use schedsim_core::sched::Fcfs;
use schedsim_core::Simulator;

/// Queue membership matches process state, processes are conserved, and
/// simulated time never goes backwards.
#[test]
fn queue_state_coherence_under_fcfs() {
    let cfg = config(0.5, 0.5, 0.5, 200, 1579);
    let mut sim = Simulator::new(&cfg, Fcfs::new()).unwrap();

    let mut last_t = 0.0;
    for _ in 0..3000 {
        let _ = sim.step();

        // Time monotonicity.
        assert!(sim.time() >= last_t);
        last_t = sim.time();

        // Conservation: terminated plus queued equals created.
        assert_eq!(
            sim.terminated() + sim.queues().total_len() as u64,
            sim.created()
        );

        // Waiting processes have no memory and are still INIT.
        for &pid in &sim.queues().new {
            assert_eq!(sim.process_state(pid), Some(ProcState::Init));
            assert_eq!(sim.process_mem_base(pid), Some(-1));
        }
        // Runnable processes are READY.
        for &pid in &sim.queues().ready {
            assert_eq!(sim.process_state(pid), Some(ProcState::Ready));
        }
        // Processes in the I/O queue are doing I/O, or just finished a
        // burst and await the dispatch that moves them to ready.
        for &pid in &sim.queues().io {
            let state = sim.process_state(pid).unwrap();
            assert!(state == ProcState::Io || state == ProcState::Ready);
        }
        // Finished processes are DEFUNCT.
        for &pid in &sim.queues().defunct {
            assert_eq!(sim.process_state(pid), Some(ProcState::Defunct));
        }
    }
}

/// Heap accounting: at every event boundary the allocated words equal the
/// requests of the admitted processes plus their tag overhead, because
/// admission allocates exactly once and reclamation frees exactly once.
#[test]
fn heap_accounting_matches_admitted_processes() {
    let cfg = config(0.5, 0.5, 0.5, 200, 1579);
    let mut sim = Simulator::new(&cfg, Fcfs::new()).unwrap();

    for _ in 0..3000 {
        let _ = sim.step();

        let queues = sim.queues();
        let expected: i64 = [&queues.new, &queues.ready, &queues.io, &queues.defunct]
            .into_iter()
            .flat_map(|q| q.iter().copied())
            .filter(|&pid| sim.process_mem_base(pid) != Some(-1))
            .map(|pid| sim.process_mem_need(pid).unwrap() + 2)
            .sum();

        let allocated = MEM_SIZE as i64 - sim.heap().available().empty;
        assert_eq!(allocated, expected);
    }
}
