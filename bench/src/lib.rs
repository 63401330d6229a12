//! Workloads shared by the allocator benchmarks.

use std::alloc::{GlobalAlloc, Layout};

use rspool::{Allocator, GRANULARITY};

/// Adapter so `GlobalAlloc` implementations run the same workloads as
/// [`Allocator`]s.
pub struct Global<A>(pub A);

impl<A: GlobalAlloc + Send + Sync> Allocator for Global<A> {
    fn allocate(&self, size: usize, _alignment: usize) -> *mut u8 {
        if size == 0 {
            return std::ptr::null_mut();
        }
        match Layout::from_size_align(size, GRANULARITY) {
            Ok(layout) => unsafe { self.0.alloc(layout) },
            Err(_) => std::ptr::null_mut(),
        }
    }

    unsafe fn free(&self, ptr: *mut u8, size: usize) {
        if ptr.is_null() || size == 0 {
            return;
        }
        if let Ok(layout) = Layout::from_size_align(size, GRANULARITY) {
            unsafe { self.0.dealloc(ptr, layout) }
        }
    }
}

/// Allocate and immediately free `size` bytes, `rounds` times.
pub fn churn<A: Allocator>(alloc: &A, size: usize, rounds: usize) {
    for _ in 0..rounds {
        let p = alloc.allocate(size, 0);
        unsafe { alloc.free(std::hint::black_box(p), size) };
    }
}

/// Keep a window of live blocks of cycling sizes.
pub fn mixed<A: Allocator>(alloc: &A, sizes: &[usize], rounds: usize) {
    let mut live = Vec::with_capacity(64);
    for i in 0..rounds {
        let size = sizes[i % sizes.len()];
        live.push((alloc.allocate(size, 0), size));
        if live.len() == 64 {
            for (p, size) in live.drain(..32) {
                unsafe { alloc.free(p, size) };
            }
        }
    }
    for (p, size) in live {
        unsafe { alloc.free(p, size) };
    }
}
