//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and traits
//! to make it easier to get started with the library.

pub use crate::config::{PoolConfig, PoolConfigBuilder};
pub use crate::driver::{DriverCallback, PoolDriver, RawConnection, RawPool};
pub use crate::error::PoolAdapterError;
pub use crate::events::{EventListener, PoolEvent, PoolEventKind};
pub use crate::executor::AsyncQueryExecutor;
pub use crate::pool::{PoolAdapter, PooledConnection};
pub use crate::results::{ResultSet, Row};
pub use crate::types::DbValue;

#[cfg(feature = "sqlite")]
pub use crate::sqlite::{SqliteConnection, SqliteDriver, SqlitePool};
