//! Fixed-pool allocator with size-bucketed free lists.
//!
//! Allocation order for a rounded size `S` and pool capacity `C`:
//! 1. `S > C`: oversized, served straight from the system.
//! 2. Free list for `S` non-empty: pop the most recently freed block.
//! 3. First pool (creation order) with `S` bytes left: bump its cursor.
//! 4. Otherwise reserve a new pool, append it, carve from its start.
//!
//! Freed pooled blocks go to their size's free list and never back to the
//! pool cursor. Oversized blocks go straight back to the system.
//!
//! All state sits behind one mutex. Every call holds it for its whole body.

use crate::allocator::Allocator;
use crate::config::PoolConfig;
use crate::error::ConfigResult;
use crate::free_list::FreeLists;
use crate::platform;
use crate::pool::Pool;
use crate::size_class::{self, GRANULARITY};
use crate::stats::AllocStats;
use core::ptr::{self, NonNull};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Pools and free lists, guarded as one unit.
struct State {
    pools: Vec<Pool>,
    free_lists: FreeLists,
}

impl State {
    /// Bump-allocate from the first pool with room, growing if none has.
    fn carve(&mut self, size: usize, capacity: usize, stats: &AllocStats) -> NonNull<u8> {
        for (index, pool) in self.pools.iter_mut().enumerate() {
            if let Some(block) = pool.carve(size) {
                trace!(size, pool = index, "allocating from pool");
                return block;
            }
        }

        let index = self.pools.len();
        trace!(size, pool = index, "allocating from new pool");
        match self.grow(capacity, stats).carve(size) {
            Some(block) => block,
            // size <= capacity and the pool is empty.
            None => unreachable!("fresh pool cannot fit {size} bytes"),
        }
    }

    fn grow(&mut self, capacity: usize, stats: &AllocStats) -> &mut Pool {
        self.pools.push(Pool::new(capacity));
        stats.record_pool(capacity);
        debug!(pools = self.pools.len(), capacity, "reserved pool");
        let last = self.pools.len() - 1;
        &mut self.pools[last]
    }
}

/// Read-only view of the allocator state, for inspection and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSnapshot {
    pub pool_capacity: usize,
    /// Bump cursor of each pool, in creation order.
    pub pool_heads: Vec<usize>,
    /// Blocks waiting in each free-list bucket, keyed by rounded size.
    pub free_blocks: BTreeMap<usize, usize>,
}

impl PoolSnapshot {
    pub fn pool_count(&self) -> usize {
        self.pool_heads.len()
    }

    pub fn free_block_count(&self) -> usize {
        self.free_blocks.values().sum()
    }
}

/// Allocator serving blocks out of fixed-capacity pools.
///
/// ```
/// use rspool::{Allocator, PoolAllocator, DEFAULT_ALIGNMENT};
///
/// let alloc = PoolAllocator::new();
/// let a = alloc.allocate(10, DEFAULT_ALIGNMENT);
/// unsafe { alloc.free(a, 10) };
/// let b = alloc.allocate(16, DEFAULT_ALIGNMENT);
/// assert_eq!(a, b);
/// # unsafe { alloc.free(b, 16) };
/// ```
pub struct PoolAllocator {
    pool_capacity: usize,
    state: Mutex<State>,
    stats: AllocStats,
}

impl PoolAllocator {
    /// Allocator with [`PoolConfig::default`].
    pub fn new() -> Self {
        Self::with_config(PoolConfig::default())
    }

    /// # Panics
    ///
    /// If `config` fails [`PoolConfig::validate`].
    pub fn with_config(config: PoolConfig) -> Self {
        match Self::try_with_config(config) {
            Ok(allocator) => allocator,
            Err(err) => panic!("invalid pool configuration: {err}"),
        }
    }

    pub fn try_with_config(config: PoolConfig) -> ConfigResult<Self> {
        config.validate()?;
        let stats = AllocStats::default();
        let mut state = State {
            pools: Vec::new(),
            free_lists: FreeLists::new(),
        };
        for _ in 0..config.initial_pools {
            state.grow(config.pool_capacity, &stats);
        }
        debug!(
            pool_capacity = config.pool_capacity,
            initial_pools = config.initial_pools,
            "pool allocator created"
        );
        Ok(Self {
            pool_capacity: config.pool_capacity,
            state: Mutex::new(state),
            stats,
        })
    }

    #[inline]
    pub fn pool_capacity(&self) -> usize {
        self.pool_capacity
    }

    pub fn pool_count(&self) -> usize {
        self.state.lock().pools.len()
    }

    /// Blocks waiting for reuse in the bucket `size` rounds to.
    pub fn free_list_len(&self, size: usize) -> usize {
        self.state.lock().free_lists.len(size_class::round_up(size))
    }

    pub fn snapshot(&self) -> PoolSnapshot {
        let state = self.state.lock();
        PoolSnapshot {
            pool_capacity: self.pool_capacity,
            pool_heads: state.pools.iter().map(Pool::head).collect(),
            free_blocks: state.free_lists.bucket_lengths(),
        }
    }

    /// Whether `ptr` points into one of this allocator's pools.
    pub fn owns(&self, ptr: *const u8) -> bool {
        self.state.lock().pools.iter().any(|pool| pool.contains(ptr))
    }

    #[cfg(feature = "debug")]
    pub fn stats(&self) -> crate::stats::StatsSnapshot {
        self.stats.snapshot()
    }
}

impl Default for PoolAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl Allocator for PoolAllocator {
    fn allocate(&self, size: usize, alignment: usize) -> *mut u8 {
        let size = size_class::round_up(size);
        if size == 0 {
            return ptr::null_mut();
        }
        if alignment > GRANULARITY {
            trace!(alignment, "alignment above granularity ignored");
        }

        let mut state = self.state.lock();
        self.stats.record_request();

        if size_class::is_oversized(size, self.pool_capacity) {
            trace!(size, "allocating oversized block");
            self.stats.record_oversized(size);
            return platform::reserve(size).as_ptr();
        }

        if let Some(block) = state.free_lists.pop(size) {
            trace!(size, "reusing freed block");
            return block.as_ptr();
        }

        state.carve(size, self.pool_capacity, &self.stats).as_ptr()
    }

    unsafe fn free(&self, ptr: *mut u8, size: usize) {
        let size = size_class::round_up(size);
        let Some(block) = NonNull::new(ptr) else {
            return;
        };
        if size == 0 {
            return;
        }

        let mut state = self.state.lock();

        if size_class::is_oversized(size, self.pool_capacity) {
            trace!(size, "freeing oversized block");
            // SAFETY: caller contract: block came from allocate(size), which
            // took the oversized path for this rounded size.
            unsafe { platform::release(block, size) };
            return;
        }

        trace!(size, "freeing to free list");
        state.free_lists.push(size, block);
    }
}

impl Drop for PoolAllocator {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        let released = state.free_lists.drain(self.pool_capacity);
        let pools = state.pools.len();
        state.pools.clear();
        debug!(pools, released, "pool allocator torn down");
        self.stats.log_totals();
    }
}
