//! Size rounding for the pool allocator.
//!
//! Every request is rounded up to a multiple of [`GRANULARITY`] before it
//! touches a pool or a free list. The rounded size doubles as the free-list
//! bucket key, so coarse rounding means fewer buckets and more reuse.

/// Rounding granularity in bytes. Also the alignment of every block.
pub const GRANULARITY: usize = 8;

/// Round `size` up to the next multiple of [`GRANULARITY`].
///
/// Returns 0 for 0. Sizes within `GRANULARITY - 1` of `usize::MAX` cannot be
/// represented after rounding; they saturate to the largest multiple, which
/// no allocator could satisfy anyway and ends in an allocation failure.
#[inline]
pub const fn round_up(size: usize) -> usize {
    match size.checked_add(GRANULARITY - 1) {
        Some(padded) => padded & !(GRANULARITY - 1),
        None => usize::MAX & !(GRANULARITY - 1),
    }
}

/// Whether a rounded size bypasses pooling for the given pool capacity.
#[inline]
pub const fn is_oversized(rounded: usize, pool_capacity: usize) -> bool {
    rounded > pool_capacity
}
