//! Size-keyed free lists of recycled blocks.
//!
//! One bucket per rounded size. Buckets are stacks: the most recently freed
//! block is reused first. Buckets are created on the first free of a size
//! and kept for the allocator's lifetime.

use crate::platform;
use core::ptr::NonNull;
use std::collections::BTreeMap;
#[cfg(debug_assertions)]
use std::collections::HashSet;

/// Freed blocks, bucketed by rounded size.
#[derive(Default)]
pub struct FreeLists {
    buckets: BTreeMap<usize, Vec<NonNull<u8>>>,
    /// Every address currently in a bucket, for O(1) double-free checks.
    #[cfg(debug_assertions)]
    parked: HashSet<NonNull<u8>>,
}

// SAFETY: the lists only hold addresses; access is serialized by the
// allocator lock.
unsafe impl Send for FreeLists {}

impl FreeLists {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pop the most recently freed block of `size`.
    #[inline]
    pub fn pop(&mut self, size: usize) -> Option<NonNull<u8>> {
        let block = self.buckets.get_mut(&size)?.pop()?;
        #[cfg(debug_assertions)]
        self.parked.remove(&block);
        Some(block)
    }

    /// Push a freed block of `size`.
    #[inline]
    pub fn push(&mut self, size: usize, block: NonNull<u8>) {
        #[cfg(debug_assertions)]
        assert!(
            self.parked.insert(block),
            "double free of {:p} ({} bytes)",
            block,
            size
        );
        self.buckets.entry(size).or_default().push(block);
    }

    /// Number of blocks waiting in the bucket for `size`.
    pub fn len(&self, size: usize) -> usize {
        self.buckets.get(&size).map_or(0, Vec::len)
    }

    /// Total number of blocks across all buckets.
    pub fn total(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// `(size, count)` for every bucket that exists, in size order.
    pub fn bucket_lengths(&self) -> BTreeMap<usize, usize> {
        self.buckets
            .iter()
            .map(|(&size, blocks)| (size, blocks.len()))
            .collect()
    }

    /// Empty every bucket ahead of teardown.
    ///
    /// Blocks keyed above `pool_capacity` never came from a pool, so they are
    /// released one by one. Pooled blocks are just forgotten: their memory
    /// goes away with the pools. Returns how many blocks were released.
    pub fn drain(&mut self, pool_capacity: usize) -> usize {
        let mut released = 0;
        for (&size, blocks) in self.buckets.iter_mut() {
            if size > pool_capacity {
                for block in blocks.drain(..) {
                    // SAFETY: oversized blocks come from platform::reserve(size).
                    unsafe { platform::release(block, size) };
                    released += 1;
                }
            }
            blocks.clear();
        }
        self.buckets.clear();
        #[cfg(debug_assertions)]
        self.parked.clear();
        released
    }
}
