//! Debug bookkeeping counters.
//!
//! With the `debug` feature the allocator counts bytes reserved for pools,
//! allocation requests and bytes served on the oversized path, and logs the
//! totals on teardown. Without it every counter is a no-op and
//! [`AllocStats`] is zero-sized.

cfg_if::cfg_if! {
    if #[cfg(feature = "debug")] {
        use core::sync::atomic::{AtomicUsize, Ordering};

        #[derive(Default)]
        pub struct AllocStats {
            pool_bytes_reserved: AtomicUsize,
            allocations_requested: AtomicUsize,
            oversized_bytes: AtomicUsize,
        }

        impl AllocStats {
            #[inline]
            pub fn record_pool(&self, bytes: usize) {
                self.pool_bytes_reserved.fetch_add(bytes, Ordering::Relaxed);
            }

            #[inline]
            pub fn record_request(&self) {
                self.allocations_requested.fetch_add(1, Ordering::Relaxed);
            }

            #[inline]
            pub fn record_oversized(&self, bytes: usize) {
                self.oversized_bytes.fetch_add(bytes, Ordering::Relaxed);
            }

            pub fn snapshot(&self) -> StatsSnapshot {
                StatsSnapshot {
                    pool_bytes_reserved: self.pool_bytes_reserved.load(Ordering::Relaxed),
                    allocations_requested: self.allocations_requested.load(Ordering::Relaxed),
                    oversized_bytes: self.oversized_bytes.load(Ordering::Relaxed),
                }
            }

            pub fn log_totals(&self) {
                let s = self.snapshot();
                tracing::debug!(
                    pool_bytes_reserved = s.pool_bytes_reserved,
                    allocations_requested = s.allocations_requested,
                    oversized_bytes = s.oversized_bytes,
                    "allocator totals"
                );
            }
        }

        /// Point-in-time copy of the counters.
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct StatsSnapshot {
            pub pool_bytes_reserved: usize,
            pub allocations_requested: usize,
            pub oversized_bytes: usize,
        }
    } else {
        #[derive(Default)]
        pub struct AllocStats;

        impl AllocStats {
            #[inline(always)]
            pub fn record_pool(&self, _bytes: usize) {}

            #[inline(always)]
            pub fn record_request(&self) {}

            #[inline(always)]
            pub fn record_oversized(&self, _bytes: usize) {}

            #[inline(always)]
            pub fn log_totals(&self) {}
        }
    }
}
