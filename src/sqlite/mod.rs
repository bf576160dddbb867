//! Callback-style SQLite driver backed by worker threads.
//!
//! Each pooled connection is a `rusqlite::Connection` owned by a dedicated
//! worker thread; the pool leases worker handles and routes statements to
//! them over a command channel. The pool surface is the callback-style
//! [`crate::driver::RawPool`] contract, so this driver plugs straight into
//! [`crate::pool::PoolAdapter`].
//!
//! A `dbname` of `:memory:` opens a private in-memory database per
//! connection, so the pool is capped at one connection in that case; use a
//! file path (or a `file:...?cache=shared` URI) for multi-connection pools.

mod escape;
mod pool;
mod query;
mod worker;

pub use escape::{escape_identifier, escape_literal};
pub use pool::{SqliteConnection, SqlitePool};

use crate::config::PoolConfig;
use crate::driver::PoolDriver;
use crate::error::PoolAdapterError;

/// The default SQLite driver.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDriver;

impl SqliteDriver {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl PoolDriver for SqliteDriver {
    type Pool = SqlitePool;

    fn create_pool(self, config: &PoolConfig) -> Result<Self::Pool, PoolAdapterError> {
        SqlitePool::new(config)
    }
}
