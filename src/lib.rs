//! Lightweight async adapter over callback-style SQL connection-pool
//! drivers.
//!
//! A driver exposes the callback-style [`driver::RawPool`] surface; the
//! [`pool::PoolAdapter`] converts its asynchronous calls into futures and
//! forwards everything else untouched. A caller-supplied wrapper can
//! substitute or decorate the driver before the pool is created.
//!
//! ```no_run
//! use sql_pool_adapter::prelude::*;
//!
//! # async fn demo() -> Result<(), PoolAdapterError> {
//! let config = PoolConfig::builder().dbname("app.db").max_size(4).finish();
//! let pool = PoolAdapter::connect(SqliteDriver::new(), config).await?;
//!
//! let rows = pool
//!     .query("SELECT name FROM user WHERE id = ?1", vec![DbValue::Int(1)])
//!     .await?;
//! # let _ = rows;
//!
//! let conn = pool.get_connection().await?;
//! conn.ping().await?;
//! pool.release_connection(conn);
//!
//! pool.end().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod events;
pub mod executor;
pub mod pool;
pub mod prelude;
pub mod results;
#[cfg(feature = "sqlite")]
pub mod sqlite;
#[cfg(feature = "test-utils")]
pub mod test_utils;
pub mod types;

pub use error::PoolAdapterError;
pub use pool::{PoolAdapter, PooledConnection};
