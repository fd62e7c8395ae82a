//! Shared helpers for the engine test suite.

use schedsim_core::common::constants::MEM_SIZE;
use schedsim_core::config::Config;
use schedsim_core::mem::WordHeap;

/// Builds a configuration from the five run parameters.
pub fn config(cpu: f64, io: f64, memory: f64, processes: u64, seed: u64) -> Config {
    let mut config = Config::default();
    config.load.cpu = cpu;
    config.load.io = io;
    config.load.memory = memory;
    config.run.processes = processes;
    config.run.seed = seed;
    config
}

/// Walks every block of `heap`, asserting that each header matches its
/// footer and that the block sizes cover the heap exactly. Returns the tag
/// of each block in address order.
pub fn walk_blocks(heap: &WordHeap) -> Vec<i64> {
    let words = heap.as_words();
    let mut tags = Vec::new();
    let mut index = 0usize;
    let mut total = 0usize;
    while index < words.len() {
        let tag = words[index];
        assert_ne!(tag, 0, "zero boundary tag at word {index}");
        let size = tag.unsigned_abs() as usize;
        assert_eq!(
            words[index + size - 1],
            tag,
            "footer does not match header at word {index}"
        );
        tags.push(tag);
        total += size;
        index += size;
    }
    assert_eq!(total, MEM_SIZE, "block sizes do not cover the heap");
    tags
}

/// Asserts that `heap` is consistent and contains no two adjacent free
/// blocks.
pub fn assert_coalesced(heap: &WordHeap) {
    let tags = walk_blocks(heap);
    assert!(
        tags.windows(2).all(|w| !(w[0] < 0 && w[1] < 0)),
        "adjacent free blocks: {tags:?}"
    );
}
