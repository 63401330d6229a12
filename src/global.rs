//! Process-wide default allocator and convenience wrappers.
//!
//! Code that wants explicit ownership should build a [`PoolAllocator`] and
//! pass it around (`&dyn Allocator` or `A: Allocator`). The functions here
//! are a thin optional default on top: the instance is created on first use,
//! configured by [`install_default`] if that ran first, and lives until the
//! process exits. It is never dropped, so blocks still outstanding at exit
//! are simply reclaimed with the process.

use crate::allocator::{Allocator, array_size};
use crate::config::PoolConfig;
use crate::error::{ConfigError, ConfigResult};
use crate::pool_allocator::PoolAllocator;
use crate::size_class::GRANULARITY;
use core::mem;
use once_cell::sync::OnceCell;
use tracing::trace_span;

static DEFAULT: OnceCell<PoolAllocator> = OnceCell::new();

/// Configure the default instance before its first use.
///
/// Fails with the validation error for an invalid `config`, or with
/// [`ConfigError::AlreadyInstalled`] if the instance already exists.
pub fn install_default(config: PoolConfig) -> ConfigResult<()> {
    config.validate()?;
    let mut installed = false;
    DEFAULT.get_or_try_init(|| {
        installed = true;
        PoolAllocator::try_with_config(config)
    })?;
    if installed {
        Ok(())
    } else {
        Err(ConfigError::AlreadyInstalled)
    }
}

/// The default instance, built with [`PoolConfig::default`] if nothing was
/// installed.
pub fn default_allocator() -> &'static PoolAllocator {
    DEFAULT.get_or_init(PoolAllocator::new)
}

/// [`Allocator::allocate`] on the default instance.
pub fn alloc(size: usize, alignment: usize) -> *mut u8 {
    let _span = trace_span!("rspool::alloc", size).entered();
    default_allocator().allocate(size, alignment)
}

/// [`Allocator::free`] on the default instance.
///
/// # Safety
///
/// `ptr` must come from [`alloc`] (or [`alloc_array`]) with the same byte
/// size and must not have been freed since.
pub unsafe fn free(ptr: *mut u8, size: usize) {
    let _span = trace_span!("rspool::free", size).entered();
    unsafe { default_allocator().free(ptr, size) }
}

/// Fill `size` bytes at `ptr` with zeroes. Touches no allocator state.
///
/// # Safety
///
/// `ptr` must be valid for writes of `size` bytes. Null or zero `size` is a
/// no-op.
pub unsafe fn zero(ptr: *mut u8, size: usize) {
    let _span = trace_span!("rspool::zero", size).entered();
    if ptr.is_null() || size == 0 {
        return;
    }
    unsafe { ptr.write_bytes(0, size) }
}

/// Raw storage for `count` values of `T` from the default instance.
///
/// Nothing is constructed. Free with [`free`] and
/// `size_of::<T>() * count` bytes. Blocks are only 8-aligned: `T` must not
/// need more (debug builds assert it).
pub fn alloc_array<T>(count: usize) -> *mut T {
    debug_assert!(
        mem::align_of::<T>() <= GRANULARITY,
        "{} needs {}-byte alignment, blocks are {}-aligned",
        core::any::type_name::<T>(),
        mem::align_of::<T>(),
        GRANULARITY
    );
    let size = array_size::<T>(count);
    let _span = trace_span!("rspool::alloc_array", size).entered();
    default_allocator().allocate(size, mem::align_of::<T>()).cast()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::DEFAULT_ALIGNMENT;

    #[test]
    fn test_zero_fills() {
        let p = alloc(32, DEFAULT_ALIGNMENT);
        unsafe {
            p.write_bytes(0xFF, 32);
            zero(p, 32);
            assert!(std::slice::from_raw_parts(p, 32).iter().all(|&b| b == 0));
            free(p, 32);
        }
    }

    #[test]
    fn test_zero_null_is_noop() {
        unsafe { zero(core::ptr::null_mut(), 64) };
    }

    #[test]
    fn test_alloc_zero_is_null() {
        assert!(alloc(0, DEFAULT_ALIGNMENT).is_null());
        unsafe { free(core::ptr::null_mut(), 0) };
    }

    #[test]
    fn test_alloc_array_is_writable() {
        let p = alloc_array::<u64>(16);
        assert!(!p.is_null());
        assert_eq!(p as usize % mem::align_of::<u64>(), 0);
        unsafe {
            for i in 0..16 {
                p.add(i).write(i as u64);
            }
            assert_eq!(*p.add(15), 15);
            free(p.cast(), 16 * mem::size_of::<u64>());
        }
    }

    #[test]
    fn test_install_after_use_is_rejected() {
        default_allocator();
        let config = PoolConfig::builder().pool_capacity(8192).build();
        assert!(matches!(
            install_default(config),
            Err(ConfigError::AlreadyInstalled)
        ));
    }

    #[test]
    fn test_install_invalid_config_returns_error() {
        let bad_capacity = PoolConfig::builder().pool_capacity(100).build();
        let result = std::panic::catch_unwind(|| install_default(bad_capacity));
        assert!(matches!(result, Ok(Err(ConfigError::InvalidCapacity(100)))));

        let too_many = PoolConfig::builder().initial_pools(usize::MAX).build();
        assert!(matches!(
            install_default(too_many),
            Err(ConfigError::InitialPoolsTooLarge { .. })
        ));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "alignment")]
    fn test_alloc_array_rejects_over_aligned_type() {
        #[repr(align(16))]
        struct Wide;
        alloc_array::<Wide>(4);
    }
}
