//! A single fixed-capacity arena served by bump allocation.

use crate::platform;
use core::ptr::NonNull;

/// Fixed-capacity byte arena plus a bump cursor.
///
/// Blocks are carved at `base + head`; `head` only moves forward and never
/// passes `capacity`. Space handed out is never bump-allocated again, reuse
/// goes through the free lists.
pub struct Pool {
    base: NonNull<u8>,
    capacity: usize,
    head: usize,
}

// SAFETY: the pool owns its region exclusively; access is serialized by the
// allocator lock.
unsafe impl Send for Pool {}

impl Pool {
    /// Reserve a new, empty pool of `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self {
            base: platform::reserve(capacity),
            capacity,
            head: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current bump offset.
    #[inline]
    pub fn head(&self) -> usize {
        self.head
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity - self.head
    }

    /// Carve `size` bytes at the cursor, or `None` if they don't fit.
    #[inline]
    pub fn carve(&mut self, size: usize) -> Option<NonNull<u8>> {
        if size > self.remaining() {
            return None;
        }
        let offset = self.head;
        self.head += size;
        // SAFETY: offset + size <= capacity, so the block lies inside the region.
        Some(unsafe { self.base.add(offset) })
    }

    /// Whether `ptr` lies inside this pool's region.
    pub fn contains(&self, ptr: *const u8) -> bool {
        let start = self.base.as_ptr() as usize;
        let addr = ptr as usize;
        addr >= start && addr < start + self.capacity
    }
}

impl Drop for Pool {
    fn drop(&mut self) {
        // SAFETY: base was reserved with exactly `capacity` bytes.
        unsafe { platform::release(self.base, self.capacity) };
    }
}
