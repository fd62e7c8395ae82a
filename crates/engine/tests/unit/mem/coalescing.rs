//! # Coalescing Tests
//!
//! Verifies that freed blocks merge with free neighbors on either side and
//! that releasing everything restores the single all-covering hole.

use crate::common::{assert_coalesced, walk_blocks};
use schedsim_core::common::constants::MEM_SIZE;
use schedsim_core::mem::WordHeap;

/// Freeing a block with an allocated neighbor on each side leaves an
/// isolated hole with matching negative tags.
#[test]
fn free_between_allocated_blocks() {
    let mut heap = WordHeap::new();
    let a = heap.alloc(10).unwrap(); // [0, 11]
    let _b = heap.alloc(10).unwrap(); // right end
    let _c = heap.alloc(10).unwrap(); // [12, 23]

    heap.free(a);
    let words = heap.as_words();
    assert_eq!(words[0], -12);
    assert_eq!(words[11], -12);
    // The right neighbor is still allocated.
    assert_eq!(words[12], 12);
    assert_coalesced(&heap);
}

/// Freeing a block between two holes merges all three into one.
#[test]
fn free_merges_both_sides() {
    let mut heap = WordHeap::new();
    let a = heap.alloc(10).unwrap(); // [0, 11]
    let _b = heap.alloc(10).unwrap(); // [32748, 32759]
    let c = heap.alloc(10).unwrap(); // [12, 23], middle hole [24, 32747]

    heap.free(a);
    heap.free(c);
    let words = heap.as_words();
    // One hole from word 0 up to the right-end allocation.
    assert_eq!(words[0], -(MEM_SIZE as i64 - 12));
    assert_eq!(words[MEM_SIZE - 13], -(MEM_SIZE as i64 - 12));

    let avail = heap.available();
    assert_eq!(avail.holes, 1);
    assert_eq!(avail.empty, MEM_SIZE as i64 - 12);
    assert_coalesced(&heap);
}

/// Freeing every allocation restores the single all-covering free block.
#[test]
fn freeing_everything_restores_initial_state() {
    let mut heap = WordHeap::new();
    let a = heap.alloc(10).unwrap();
    let b = heap.alloc(10).unwrap();
    let c = heap.alloc(10).unwrap();

    heap.free(a);
    heap.free(c);
    heap.free(b);

    assert_eq!(walk_blocks(&heap), vec![-(MEM_SIZE as i64)]);
    let avail = heap.available();
    assert_eq!(avail.empty, MEM_SIZE as i64);
    assert_eq!(avail.largest, MEM_SIZE as i64 - 2);
    assert_eq!(avail.holes, 1);
}

/// Free order does not matter for the final state.
#[test]
fn free_order_is_irrelevant() {
    for order in [[0, 1, 2], [2, 1, 0], [1, 0, 2], [0, 2, 1]] {
        let mut heap = WordHeap::new();
        let bases = [
            heap.alloc(500).unwrap(),
            heap.alloc(700).unwrap(),
            heap.alloc(900).unwrap(),
        ];
        for i in order {
            heap.free(bases[i]);
            assert_coalesced(&heap);
        }
        assert_eq!(walk_blocks(&heap), vec![-(MEM_SIZE as i64)]);
    }
}
