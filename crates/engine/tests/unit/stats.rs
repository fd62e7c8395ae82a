//! # Statistics Tests
//!
//! Verifies the sample summaries, the circular sample buffers, and the
//! utilization integrals.

use schedsim_core::common::constants::{N_IO_DEVICES, N_SAMPLES};
use schedsim_core::stats::{summarize, MachineSnapshot, QueueLens, Statistics};

/// Fewer than two samples yield no summary.
#[test]
fn summary_needs_two_samples() {
    assert!(summarize(&[]).is_none());
    assert!(summarize(&[1.0]).is_none());
}

/// Mean, sample standard deviation, minimum, and maximum of a known data
/// set.
#[test]
fn summary_of_known_samples() {
    let summary = summarize(&[1.0, 2.0, 3.0, 4.0]).unwrap();
    assert_eq!(summary.n, 4);
    assert!((summary.mean - 2.5).abs() < 1e-12);
    assert!((summary.sigma - 1.2909944487358056).abs() < 1e-9);
    assert_eq!(summary.min, 1.0);
    assert_eq!(summary.max, 4.0);
}

/// Constant samples have zero spread.
#[test]
fn summary_of_constant_samples() {
    let summary = summarize(&[5.0; 10]).unwrap();
    assert!((summary.mean - 5.0).abs() < 1e-12);
    assert_eq!(summary.sigma, 0.0);
}

/// Sample buffers wrap circularly after `N_SAMPLES` recordings.
#[test]
fn sample_buffers_wrap() {
    let mut stats = Statistics::new(0.0);
    let total = N_SAMPLES as u64 + 5;
    for i in 0..total {
        let v = i as f64;
        stats.record_process(v, v, v, v);
    }
    assert_eq!(stats.n_samples(), total);
    assert_eq!(stats.turnaround_samples().len(), N_SAMPLES);
    // The first five slots were overwritten by the newest samples.
    for k in 0..5 {
        assert_eq!(
            stats.turnaround_samples()[k],
            (N_SAMPLES + k) as f32
        );
    }
    // Slot five still holds its first-round sample.
    assert_eq!(stats.turnaround_samples()[5], 5.0);
}

/// Utilization integrals accumulate busy time and length-weighted averages.
#[test]
fn integrals_accumulate() {
    let mut stats = Statistics::new(0.0);
    let snap = MachineSnapshot {
        cpu_busy: true,
        io_busy: [true, false, false],
        mem_in_use: 1000.0,
        lens: QueueLens {
            new: 2,
            ready: 3,
            io: [1, 0, 0],
            defunct: 0,
        },
    };
    stats.advance(2.0, &snap);
    let idle = MachineSnapshot {
        cpu_busy: false,
        io_busy: [false; N_IO_DEVICES],
        mem_in_use: 0.0,
        lens: QueueLens::default(),
    };
    stats.advance(3.0, &idle);

    assert!((stats.cpu_util - 2.0).abs() < 1e-12);
    assert!((stats.io_util[0] - 2.0).abs() < 1e-12);
    assert_eq!(stats.io_util[1], 0.0);
    assert!((stats.mem_util - 2000.0).abs() < 1e-12);
    assert!((stats.avg_new_len - 4.0).abs() < 1e-12);
    assert!((stats.avg_ready_len - 6.0).abs() < 1e-12);
    assert_eq!(stats.max_new_len, 2);
    assert_eq!(stats.max_ready_len, 3);
    assert_eq!(stats.max_io_len, [1, 0, 0]);
}
