//! Pool allocator configuration.
//!
//! ```
//! use rspool::PoolConfig;
//!
//! let config = PoolConfig::builder()
//!     .pool_capacity(8192)
//!     .initial_pools(1)
//!     .build();
//! assert!(config.validate().is_ok());
//! ```

use figment::Figment;
use figment::providers::{Env, Serialized};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::size_class::GRANULARITY;

/// Default capacity of one pool (4 KiB).
pub const DEFAULT_POOL_CAPACITY: usize = 4 * 1024;

/// Prefix of the environment variables read by [`PoolConfig::load`].
pub const ENV_PREFIX: &str = "RSPOOL_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Bytes per pool. Rounded requests above this take the oversized path.
    pub pool_capacity: usize,
    /// Pools reserved up front when the allocator is built.
    pub initial_pools: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            pool_capacity: DEFAULT_POOL_CAPACITY,
            initial_pools: 0,
        }
    }
}

impl PoolConfig {
    pub fn builder() -> PoolConfigBuilder {
        PoolConfigBuilder(Self::default())
    }

    /// Defaults overlaid with `RSPOOL_POOL_CAPACITY` / `RSPOOL_INITIAL_POOLS`.
    pub fn load() -> ConfigResult<Self> {
        Self::from_figment(
            Figment::from(Serialized::defaults(Self::default())).merge(Env::prefixed(ENV_PREFIX)),
        )
    }

    /// Extract and validate from an arbitrary figment.
    pub fn from_figment(figment: Figment) -> ConfigResult<Self> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.pool_capacity == 0 || self.pool_capacity % GRANULARITY != 0 {
            return Err(ConfigError::InvalidCapacity(self.pool_capacity));
        }
        match self.initial_pools.checked_mul(self.pool_capacity) {
            Some(total) if total <= isize::MAX as usize => Ok(()),
            _ => Err(ConfigError::InitialPoolsTooLarge {
                initial_pools: self.initial_pools,
                pool_capacity: self.pool_capacity,
            }),
        }
    }
}

/// Fluent builder for [`PoolConfig`].
pub struct PoolConfigBuilder(PoolConfig);

impl PoolConfigBuilder {
    pub fn pool_capacity(mut self, bytes: usize) -> Self {
        self.0.pool_capacity = bytes;
        self
    }

    pub fn initial_pools(mut self, count: usize) -> Self {
        self.0.initial_pools = count;
        self
    }

    pub fn build(self) -> PoolConfig {
        self.0
    }
}
