//! Boundary-tag heap allocator.
//!
//! This module implements a first-fit allocator over a fixed array of signed
//! 64-bit words. It provides:
//! 1. **Block layout:** Every block carries the same tag at its first and
//!    last word: positive `k` for an allocated block of `k` words (tags
//!    included), negative `-k` for a free one.
//! 2. **Placement:** A twin-directional first-fit scan. When the forward and
//!    backward candidates are distinct blocks, the allocation is placed
//!    left-aligned in the forward candidate; when both scans land on the same
//!    block it is placed right-aligned instead. Allocating from both ends of
//!    a fragmented heap keeps small remainders from collecting at one side.
//! 3. **Coalescing:** Freed blocks merge with free neighbors on either side,
//!    so no two free blocks are ever adjacent.
//!
//! The heap stays a raw word array on purpose: the placement rules are
//! sensitive to exact tag arithmetic, and hiding the array behind a block
//! abstraction would change where allocations land.

use crate::common::constants::{ADMIN_SIZE, MEM_SIZE};

/// Summary of the free space in a heap, as reported by [`WordHeap::available`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemAvailable {
    /// Total free words, boundary tags of the free blocks included.
    pub empty: i64,
    /// Usable size of the largest hole (its tags already subtracted; 0 when
    /// no hole can satisfy any request).
    pub largest: i64,
    /// Number of free blocks.
    pub holes: i64,
}

/// Fixed-size word heap with boundary-tag bookkeeping.
pub struct WordHeap {
    words: Box<[i64]>,
}

impl WordHeap {
    /// Creates a heap consisting of a single free block covering the whole
    /// array.
    pub fn new() -> Self {
        let mut heap = Self {
            words: vec![0; MEM_SIZE].into_boxed_slice(),
        };
        heap.reset();
        heap
    }

    /// Reinitializes the heap to one all-covering free block, discarding any
    /// allocation state.
    pub fn reset(&mut self) {
        self.words.fill(0);
        self.words[0] = -(MEM_SIZE as i64);
        self.words[MEM_SIZE - 1] = -(MEM_SIZE as i64);
    }

    /// Allocates `size` usable words and returns the index of the first one.
    ///
    /// The caller may use `[index, index + size - 1]`; the words just outside
    /// that range hold the block's tags. Returns `None` when `size` is out of
    /// range or no free block is large enough.
    pub fn alloc(&mut self, size: i64) -> Option<i64> {
        let len = MEM_SIZE as i64;
        let m = &mut self.words;

        if size < 1 || size > len - ADMIN_SIZE {
            return None;
        }

        // Forward scan: first free block of at least size + ADMIN_SIZE words.
        let mut index: i64 = 0;
        while index < len && size + ADMIN_SIZE + m[index as usize] > 0 {
            index += m[index as usize].abs();
        }
        if index >= len {
            return None;
        }

        // Backward scan over the footers, symmetric to the forward one.
        let mut index2: i64 = len - 1;
        while index2 > 0 && size + ADMIN_SIZE + m[index2 as usize] > 0 {
            index2 -= m[index2 as usize].abs();
        }

        // First word of the backward candidate, last word of the forward one.
        let free2 = index2 + m[index2 as usize] + 1;
        let last_free = index - m[index as usize] - 1;

        if last_free + free2 < len {
            // Distinct candidates: place left-aligned in the forward block.
            let end = index + size + 1;
            if last_free > end {
                // Remainder keeps the rest of the block as a smaller hole.
                let rest = m[index as usize] + size + ADMIN_SIZE;
                m[last_free as usize] = rest;
                m[(end + 1) as usize] = rest;
            }
            m[index as usize] = size + ADMIN_SIZE;
            m[end as usize] = size + ADMIN_SIZE;
            Some(index + 1)
        } else {
            // Same block found from both ends: place right-aligned.
            let end2 = index2 - size - 1;
            if free2 < end2 {
                let rest = m[index2 as usize] + size + ADMIN_SIZE;
                m[free2 as usize] = rest;
                m[(end2 - 1) as usize] = rest;
            }
            m[index2 as usize] = size + ADMIN_SIZE;
            m[end2 as usize] = size + ADMIN_SIZE;
            Some(end2 + 1)
        }
    }

    /// Frees the block whose first usable word is `index`.
    ///
    /// Invalid input (an out-of-range index, a tag below [`ADMIN_SIZE`],
    /// which also covers already-free blocks, or a header/footer mismatch)
    /// is ignored; corruption is reported by the consistency layer above, not
    /// here. Adjacent free neighbors are coalesced.
    pub fn free(&mut self, index: i64) {
        let len = MEM_SIZE as i64;
        let m = &mut self.words;

        if index < 1 || index > len - ADMIN_SIZE {
            return;
        }
        let mut start = index - 1;
        if m[start as usize] < ADMIN_SIZE {
            return;
        }
        let mut end = start + m[start as usize] - 1;
        if end >= len || m[start as usize] != m[end as usize] {
            return;
        }

        m[start as usize] = -m[start as usize];
        if start > 0 && m[(start - 1) as usize] < 0 {
            // Merge with the free block on the left; the footer at `end`
            // still holds the positive size of the block being freed.
            start += m[(start - 1) as usize];
            m[start as usize] -= m[end as usize];
        }
        m[end as usize] = m[start as usize];

        if end < len - 1 && m[(end + 1) as usize] < 0 {
            // Merge with the free block on the right.
            end -= m[(end + 1) as usize];
            m[end as usize] += m[start as usize];
            m[start as usize] = m[end as usize];
        }
    }

    /// Walks the heap once and reports total free space, the largest usable
    /// hole, and the hole count.
    pub fn available(&self) -> MemAvailable {
        let mut empty = 0;
        let mut largest = 0;
        let mut holes = 0;

        let mut index = 0usize;
        while index < MEM_SIZE {
            let tag = self.words[index];
            if tag < 0 {
                let size = -tag;
                empty += size;
                holes += 1;
                if largest < size {
                    largest = size;
                }
                index += size as usize;
            } else {
                index += tag as usize;
            }
        }
        largest = if largest > 1 { largest - ADMIN_SIZE } else { 0 };

        MemAvailable {
            empty,
            largest,
            holes,
        }
    }

    /// Returns the internal-fragmentation ratio: administrative words over
    /// allocated payload words, across all allocated blocks.
    ///
    /// Returns 0 when nothing (or only administration) is allocated.
    pub fn internal_fragmentation(&self) -> f64 {
        let mut n_admin: i64 = 0;
        let mut n_alloc: i64 = 0;

        let mut index = 0usize;
        while index < MEM_SIZE {
            let tag = self.words[index];
            if tag < 0 {
                index += (-tag) as usize;
            } else {
                n_alloc += tag;
                n_admin += ADMIN_SIZE;
                index += tag as usize;
            }
        }
        if n_alloc <= n_admin {
            return 0.0;
        }
        n_admin as f64 / (n_alloc - n_admin) as f64
    }

    /// Diagnostic view of the raw word array.
    pub fn as_words(&self) -> &[i64] {
        &self.words
    }
}

impl Default for WordHeap {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for WordHeap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let avail = self.available();
        f.debug_struct("WordHeap")
            .field("words", &MEM_SIZE)
            .field("free", &avail.empty)
            .field("holes", &avail.holes)
            .finish()
    }
}
