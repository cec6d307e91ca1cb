#![deny(missing_docs)]

//! A bounded worker pool with graceful shutdown.
//!
//! This library provides a fixed-size pool of persistent worker threads
//! pulling tasks from a shared FIFO queue. Tasks may be submitted from any
//! thread; shutting the pool down stops acceptance of new work and blocks
//! until every already-accepted task has run to completion.

mod error;
mod pool;

pub use error::{PoolError, Result};
pub use pool::{Task, WorkerPool};
