use std::io;
use thiserror::Error;

/// Error type for worker pool operations.
#[derive(Error, Debug)]
pub enum PoolError {
    /// Pool was constructed with an unusable worker count.
    #[error("Worker count must be at least 1")]
    InvalidConfiguration,

    /// Submit was called after the pool shut down; the task was discarded.
    #[error("Pool is shut down")]
    PoolClosed,

    /// IO error from spawning a worker thread.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for worker pool operations.
pub type Result<T> = std::result::Result<T, PoolError>;
