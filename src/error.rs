use thiserror::Error;

/// Configuration errors. Allocation itself never returns an error: running
/// out of system memory is fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("pool capacity must be a non-zero multiple of 8 bytes, got {0}")]
    InvalidCapacity(usize),

    #[error("{initial_pools} initial pools of {pool_capacity} bytes exceed the address space")]
    InitialPoolsTooLarge {
        initial_pools: usize,
        pool_capacity: usize,
    },

    #[error("default allocator is already initialized")]
    AlreadyInstalled,

    #[error("configuration parsing error: {0}")]
    Parsing(#[from] figment::Error),
}

/// A [`Result`] with [`ConfigError`] as the error type.
pub type ConfigResult<T> = Result<T, ConfigError>;
