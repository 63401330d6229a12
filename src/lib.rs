//! rspool: a fixed-pool, size-bucketed memory allocator.
//!
//! Requests are rounded up to 8 bytes and served from:
//! - Free lists (most recently freed block of the same rounded size)
//! - Fixed-capacity pools (first-fit bump allocation, grown on demand)
//! - The system directly, for requests larger than one pool
//!
//! Freed blocks are recycled through the free lists and never returned to
//! the system; pools live as long as the allocator.
//!
//! # Usage
//!
//! ```
//! use rspool::{Allocator, PoolAllocator, DEFAULT_ALIGNMENT};
//!
//! let pools = PoolAllocator::new();
//! let block = pools.allocate(100, DEFAULT_ALIGNMENT);
//! unsafe {
//!     rspool::zero(block, 100);
//!     pools.free(block, 100);
//! }
//! ```

pub mod size_class;
pub mod platform;
pub mod pool;
pub mod free_list;
pub mod allocator;
pub mod pool_allocator;
pub mod config;
pub mod error;
pub mod stats;
pub mod global;

#[cfg(feature = "ffi")]
pub mod ffi;

pub use allocator::{Allocator, DEFAULT_ALIGNMENT};
pub use config::{DEFAULT_POOL_CAPACITY, PoolConfig, PoolConfigBuilder};
pub use error::{ConfigError, ConfigResult};
pub use global::{alloc, alloc_array, default_allocator, free, install_default, zero};
pub use pool_allocator::{PoolAllocator, PoolSnapshot};
pub use size_class::GRANULARITY;
