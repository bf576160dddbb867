//! The injectable driver seam.
//!
//! A driver is anything that can build a pool ([`PoolDriver`]) whose pool
//! speaks the callback-style surface below ([`RawPool`]). The adapter in
//! [`crate::pool`] converts the asynchronous half of that surface into
//! futures; everything else is forwarded untouched.

use crate::config::PoolConfig;
use crate::error::PoolAdapterError;
use crate::events::{EventListener, PoolEventKind};
use crate::results::ResultSet;
use crate::types::DbValue;

/// Completion callback a driver invokes exactly once to finish one
/// asynchronous call.
pub type DriverCallback<T> = Box<dyn FnOnce(Result<T, PoolAdapterError>) + Send + 'static>;

/// A driver implementation: consumes itself to build a pool from a
/// configuration.
///
/// Pool creation is synchronous; anything slow (opening sockets, spawning
/// workers) belongs behind the pool's own asynchronous calls.
pub trait PoolDriver: Send + Sized + 'static {
    type Pool: RawPool;

    /// Build a pool from `config`. The adapter calls this exactly once per
    /// construction, with the caller's configuration unmodified.
    ///
    /// # Errors
    /// Returns `PoolAdapterError` if the configuration is unusable or the
    /// pool cannot be brought up.
    fn create_pool(self, config: &PoolConfig) -> Result<Self::Pool, PoolAdapterError>;
}

/// The callback-style pool surface the adapter forwards to.
///
/// `escape`, `escape_id`, and `on` are synchronous pass-throughs; `query`,
/// `end`, and `get_connection` complete through a [`DriverCallback`], which
/// may be invoked from a driver-owned thread.
pub trait RawPool: Send + Sync + 'static {
    type Connection: RawConnection;

    /// Escape `value` as a literal for this driver's SQL dialect.
    fn escape(&self, value: &DbValue) -> String;

    /// Escape `ident` as an identifier for this driver's SQL dialect.
    fn escape_id(&self, ident: &str) -> String;

    /// Register an event listener; registration is immediate and unbounded.
    fn on(&self, event: PoolEventKind, listener: EventListener);

    /// Run `sql` on some pool-managed connection, completing through `done`.
    fn query(&self, sql: &str, params: Vec<DbValue>, done: DriverCallback<ResultSet>);

    /// Shut the pool down, completing through `done` once drained.
    fn end(&self, done: DriverCallback<()>);

    /// Check a connection out of the pool, completing through `done`.
    fn get_connection(&self, done: DriverCallback<Self::Connection>);

    /// Return a previously checked-out connection to the pool.
    fn release_connection(&self, connection: Self::Connection);
}

/// The callback-style surface of a checked-out connection.
pub trait RawConnection: Send + 'static {
    /// Escape `value` as a literal for this driver's SQL dialect.
    fn escape(&self, value: &DbValue) -> String;

    /// Run `sql` on this connection, completing through `done`.
    fn query(&self, sql: &str, params: Vec<DbValue>, done: DriverCallback<ResultSet>);

    /// Verify the connection is alive, completing through `done`.
    fn ping(&self, done: DriverCallback<()>);
}
