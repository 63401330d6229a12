//! Raw memory primitives: reserve and release contiguous byte ranges.
//!
//! Backed by the Rust system allocator. Every region is aligned to
//! [`GRANULARITY`]. Exhaustion is fatal and goes through
//! [`handle_alloc_error`], so callers never see a null region.

use crate::size_class::GRANULARITY;
use std::alloc::{self, Layout, handle_alloc_error};
use std::ptr::NonNull;

#[inline]
fn region_layout(size: usize) -> Layout {
    match Layout::from_size_align(size, GRANULARITY) {
        Ok(layout) => layout,
        // Size overflows isize once padded: no system could serve it.
        Err(_) => handle_alloc_error(Layout::new::<u8>()),
    }
}

/// Reserve `size` bytes (`size > 0`) from the system.
pub fn reserve(size: usize) -> NonNull<u8> {
    debug_assert!(size > 0, "zero-size region");
    let layout = region_layout(size);
    let ptr = unsafe { alloc::alloc(layout) };
    match NonNull::new(ptr) {
        Some(ptr) => ptr,
        None => handle_alloc_error(layout),
    }
}

/// Return a region obtained from [`reserve`] to the system.
///
/// # Safety
///
/// `ptr` must come from `reserve(size)` with the same `size`, and must not
/// be released twice.
pub unsafe fn release(ptr: NonNull<u8>, size: usize) {
    unsafe { alloc::dealloc(ptr.as_ptr(), region_layout(size)) };
}
