//! C-ABI exports of the default-instance wrappers.
//!
//! Gated behind `features = ["ffi"]`. Build with `--crate-type staticlib`
//! (or `cdylib`) to link from C.

use crate::global;

/// Release the result with [`rspool_free`] and the same `size`.
#[unsafe(export_name = "rspool_alloc")]
pub extern "C" fn rspool_alloc(size: usize, align: usize) -> *mut u8 {
    global::alloc(size, align)
}

/// # Safety
///
/// See [`global::free`].
#[unsafe(export_name = "rspool_free")]
pub unsafe extern "C" fn rspool_free(ptr: *mut u8, size: usize) {
    unsafe { global::free(ptr, size) }
}

/// # Safety
///
/// See [`global::zero`].
#[unsafe(export_name = "rspool_zero")]
pub unsafe extern "C" fn rspool_zero(ptr: *mut u8, size: usize) {
    unsafe { global::zero(ptr, size) }
}
