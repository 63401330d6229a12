//! The allocation contract every strategy implements.
//!
//! Addresses are raw pointers. Null is the sentinel for zero-size requests
//! and freeing null is always a no-op. The size passed to `free` must equal
//! the size passed to `allocate`: nothing is stored alongside a block, so a
//! mismatch can't be detected and is undefined behavior.

use crate::size_class::GRANULARITY;
use core::mem;

/// Alignment value meaning "whatever the strategy provides by default".
pub const DEFAULT_ALIGNMENT: usize = 0;

pub trait Allocator: Send + Sync {
    /// Reserve `size` bytes. Returns null when `size` is 0.
    ///
    /// `alignment` is a request; a strategy may ignore it when its own
    /// rounding already covers common alignments. Running out of system
    /// memory aborts the process.
    fn allocate(&self, size: usize, alignment: usize) -> *mut u8;

    /// Give back a block from [`allocate`](Allocator::allocate).
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by `allocate(size, _)` on this allocator
    /// with this exact `size`, and must not have been freed since. Null or a
    /// zero `size` is a no-op.
    unsafe fn free(&self, ptr: *mut u8, size: usize);

    /// Raw storage for `count` values of `T`. Nothing is constructed.
    ///
    /// The result is only as aligned as the strategy makes it; for pool
    /// blocks that is 8 bytes, so `T` with a larger alignment must not use
    /// this (debug builds assert it).
    ///
    /// Panics with "capacity overflow" if the byte count overflows.
    fn allocate_array<T>(&self, count: usize) -> *mut T
    where
        Self: Sized,
    {
        debug_assert!(
            mem::align_of::<T>() <= GRANULARITY,
            "{} needs {}-byte alignment, blocks are {}-aligned",
            core::any::type_name::<T>(),
            mem::align_of::<T>(),
            GRANULARITY
        );
        let size = array_size::<T>(count);
        self.allocate(size, mem::align_of::<T>()).cast()
    }

    /// Free storage obtained from [`allocate_array`](Allocator::allocate_array).
    ///
    /// # Safety
    ///
    /// Same contract as [`free`](Allocator::free) with the same `count`.
    /// Values in the block are not dropped.
    unsafe fn free_array<T>(&self, ptr: *mut T, count: usize)
    where
        Self: Sized,
    {
        unsafe { self.free(ptr.cast(), array_size::<T>(count)) }
    }
}

impl<A: Allocator + ?Sized> Allocator for &A {
    #[inline]
    fn allocate(&self, size: usize, alignment: usize) -> *mut u8 {
        (**self).allocate(size, alignment)
    }

    #[inline]
    unsafe fn free(&self, ptr: *mut u8, size: usize) {
        unsafe { (**self).free(ptr, size) }
    }
}

#[inline]
pub(crate) fn array_size<T>(count: usize) -> usize {
    match mem::size_of::<T>().checked_mul(count) {
        Some(size) => size,
        None => capacity_overflow(),
    }
}

#[cold]
#[inline(never)]
fn capacity_overflow() -> ! {
    panic!("capacity overflow")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::alloc::Layout;
    use std::sync::Mutex;

    /// Forwards to the system allocator and records every call.
    #[derive(Default)]
    struct Recording {
        calls: Mutex<Vec<(&'static str, usize)>>,
    }

    impl Allocator for Recording {
        fn allocate(&self, size: usize, _alignment: usize) -> *mut u8 {
            self.calls.lock().unwrap().push(("allocate", size));
            if size == 0 {
                return core::ptr::null_mut();
            }
            unsafe { std::alloc::alloc(Layout::from_size_align(size, 8).unwrap()) }
        }

        unsafe fn free(&self, ptr: *mut u8, size: usize) {
            self.calls.lock().unwrap().push(("free", size));
            if ptr.is_null() || size == 0 {
                return;
            }
            unsafe { std::alloc::dealloc(ptr, Layout::from_size_align(size, 8).unwrap()) }
        }
    }

    #[test]
    fn test_allocate_array_size() {
        let a = Recording::default();
        let p = a.allocate_array::<u64>(10);
        assert!(!p.is_null());
        unsafe { a.free_array(p, 10) };
        assert_eq!(
            *a.calls.lock().unwrap(),
            vec![("allocate", 80), ("free", 80)]
        );
    }

    #[test]
    fn test_allocate_array_zero_count() {
        let a = Recording::default();
        assert!(a.allocate_array::<u32>(0).is_null());
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn test_allocate_array_overflow() {
        let a = Recording::default();
        a.allocate_array::<u64>(usize::MAX);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "alignment")]
    fn test_allocate_array_rejects_over_aligned_type() {
        #[repr(align(16))]
        struct Wide;
        let a = Recording::default();
        a.allocate_array::<Wide>(2);
    }

    #[test]
    fn test_reference_forwards() {
        let a = Recording::default();
        let r = &a;
        let p = Allocator::allocate(&r, 16, DEFAULT_ALIGNMENT);
        unsafe { Allocator::free(&r, p, 16) };
        assert_eq!(a.calls.lock().unwrap().len(), 2);
    }
}
