//! # Process Table and Queue Tests
//!
//! Verifies the handle-based process store: insertion, removal, the
//! creation-order master traversal, and queue manipulation.

use pretty_assertions::assert_eq;

use schedsim_core::common::constants::N_IO_DEVICES;
use schedsim_core::proc::{Pid, ProcQueues, ProcState, ProcessTable, QueueId, SimPcb, StudentPcb};

/// Builds a minimal process pair for table tests.
fn pair(num: u64) -> (SimPcb, StudentPcb) {
    let sim = SimPcb {
        cpu_need: 10.0,
        io_need: [0.0; N_IO_DEVICES],
        cpu_used: 0.0,
        io_used: [0.0; N_IO_DEVICES],
        cpu_burst: 3.0,
        io_burst: [0.0; N_IO_DEVICES],
        t_create: 0.0,
        t_mem_alloc: 0.0,
        t_cpu: 0.0,
        t_io: 0.0,
        t_end: 0.0,
        mem_need: 1024,
        mem_base: -1,
        proc_num: num,
        io_queue: 0,
        io_cycles: 4,
        state: ProcState::Init,
        in_queue: None,
    };
    let stud = StudentPcb {
        pid: Pid(num),
        mem_need: 1024,
        mem_base: -1,
        userdata: None,
    };
    (sim, stud)
}

/// Inserted processes are retrievable from both sides and removable.
#[test]
fn insert_access_remove() {
    let mut table = ProcessTable::new();
    let (sim, stud) = pair(7);
    table.insert(Pid(7), sim, stud);

    assert!(table.contains(Pid(7)));
    assert_eq!(table.len(), 1);
    assert_eq!(table.sim(Pid(7)).proc_num, 7);
    assert_eq!(table.stud(Pid(7)).mem_need, 1024);

    table.sim_mut(Pid(7)).state = ProcState::Ready;
    table.stud_mut(Pid(7)).mem_base = 101;
    let (sim, stud) = table.pair_mut(Pid(7));
    assert_eq!(sim.state, ProcState::Ready);
    assert_eq!(stud.mem_base, 101);

    table.remove(Pid(7));
    assert!(!table.contains(Pid(7)));
    assert!(table.is_empty());
}

/// The master traversal visits processes in creation order regardless of
/// insertion order.
#[test]
fn master_traversal_is_in_creation_order() {
    let mut table = ProcessTable::new();
    for num in [2u64, 0, 1] {
        let (sim, stud) = pair(num);
        table.insert(Pid(num), sim, stud);
    }
    let order: Vec<Pid> = table.pids().collect();
    assert_eq!(order, vec![Pid(0), Pid(1), Pid(2)]);
}

/// Queue removal drops exactly the first occurrence of a handle.
#[test]
fn queue_remove_first_occurrence() {
    let mut queues = ProcQueues::new();
    queues.ready.push_back(Pid(1));
    queues.ready.push_back(Pid(2));
    queues.ready.push_back(Pid(3));

    assert!(queues.remove(QueueId::Ready, Pid(2)));
    assert_eq!(queues.ready, [Pid(1), Pid(3)]);
    assert!(!queues.remove(QueueId::Ready, Pid(2)));
    assert_eq!(queues.total_len(), 2);
}

/// `queue` and `queue_mut` address the four queues by identifier.
#[test]
fn queue_lookup_by_id() {
    let mut queues = ProcQueues::new();
    queues.queue_mut(QueueId::New).push_back(Pid(1));
    queues.queue_mut(QueueId::Io).push_back(Pid(2));
    queues.queue_mut(QueueId::Defunct).push_front(Pid(3));

    assert_eq!(queues.queue(QueueId::New).len(), 1);
    assert_eq!(queues.queue(QueueId::Ready).len(), 0);
    assert_eq!(queues.queue(QueueId::Io).front(), Some(&Pid(2)));
    assert_eq!(queues.queue(QueueId::Defunct).front(), Some(&Pid(3)));
    assert_eq!(queues.total_len(), 3);
}

/// Dropping a student record drops its user-data with it.
#[test]
fn userdata_dropped_with_record() {
    use std::rc::Rc;

    let marker = Rc::new(());
    let mut table = ProcessTable::new();
    let (sim, mut stud) = pair(0);
    stud.userdata = Some(Box::new(Rc::clone(&marker)));
    table.insert(Pid(0), sim, stud);
    assert_eq!(Rc::strong_count(&marker), 2);

    table.remove(Pid(0));
    assert_eq!(Rc::strong_count(&marker), 1);
}
