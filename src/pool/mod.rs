//! The pool adapter: future-returning surface over a callback-style driver
//! pool.

mod bridge;
mod connection;

pub use connection::PooledConnection;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use bridge::await_callback;

use crate::config::PoolConfig;
use crate::driver::{PoolDriver, RawPool};
use crate::error::PoolAdapterError;
use crate::events::{EventListener, PoolEventKind};
use crate::results::ResultSet;
use crate::types::DbValue;

/// Future-returning adapter bound to one driver pool instance.
///
/// Construction resolves the driver (optionally through a wrapper), calls the
/// driver's `create_pool` exactly once, and binds the result for the
/// adapter's lifetime. After that the adapter holds no state beyond the pool
/// reference; clones share the same pool.
pub struct PoolAdapter<P: RawPool> {
    pool: Arc<P>,
}

impl<P: RawPool> Clone for PoolAdapter<P> {
    fn clone(&self) -> Self {
        Self {
            pool: Arc::clone(&self.pool),
        }
    }
}

// Manual Debug because driver pools rarely implement it.
impl<P: RawPool> fmt::Debug for PoolAdapter<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PoolAdapter").field(&"<pool>").finish()
    }
}

impl<P: RawPool> PoolAdapter<P> {
    /// Build an adapter directly from `driver`.
    ///
    /// # Errors
    /// Returns whatever `create_pool` fails with, unchanged.
    #[allow(clippy::unused_async)]
    pub async fn connect<D>(driver: D, config: PoolConfig) -> Result<Self, PoolAdapterError>
    where
        D: PoolDriver<Pool = P>,
    {
        Self::from_driver(driver, &config)
    }

    /// Build an adapter from the driver produced by `wrapper(driver)`.
    ///
    /// The wrapper may substitute or decorate the driver before pool
    /// creation; it is the only injection point, so it never appears in the
    /// configuration.
    ///
    /// # Errors
    /// A wrapper error rejects the whole construction with that error;
    /// `create_pool` is not called in that case.
    pub async fn connect_with<D, W, Fut, D2>(
        driver: D,
        wrapper: W,
        config: PoolConfig,
    ) -> Result<Self, PoolAdapterError>
    where
        D: PoolDriver,
        W: FnOnce(D) -> Fut,
        Fut: Future<Output = Result<D2, PoolAdapterError>>,
        D2: PoolDriver<Pool = P>,
    {
        let resolved = wrapper(driver).await?;
        Self::from_driver(resolved, &config)
    }

    fn from_driver<D>(driver: D, config: &PoolConfig) -> Result<Self, PoolAdapterError>
    where
        D: PoolDriver<Pool = P>,
    {
        tracing::debug!(dbname = config.dbname.as_deref(), "creating driver pool");
        let pool = driver.create_pool(config)?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Escape `value` as a SQL literal. Pass-through.
    #[must_use]
    pub fn escape(&self, value: &DbValue) -> String {
        self.pool.escape(value)
    }

    /// Escape `ident` as a SQL identifier. Pass-through.
    #[must_use]
    pub fn escape_id(&self, ident: &str) -> String {
        self.pool.escape_id(ident)
    }

    /// Register a pool event listener. Pass-through.
    pub fn on(&self, event: PoolEventKind, listener: EventListener) {
        self.pool.on(event, listener);
    }

    /// Run `sql` on a pool-managed connection.
    ///
    /// # Errors
    /// Rejects with the error the driver passed to its completion callback,
    /// unchanged.
    pub async fn query(
        &self,
        sql: &str,
        params: Vec<DbValue>,
    ) -> Result<ResultSet, PoolAdapterError> {
        tracing::debug!(sql, "forwarding query to driver pool");
        await_callback(
            |done| self.pool.query(sql, params, done),
            "driver dropped the query callback",
        )
        .await
    }

    /// Shut the underlying pool down.
    ///
    /// # Errors
    /// Rejects with the driver's error, unchanged.
    pub async fn end(&self) -> Result<(), PoolAdapterError> {
        tracing::debug!("forwarding end to driver pool");
        await_callback(|done| self.pool.end(done), "driver dropped the end callback").await
    }

    /// Check a connection out of the pool, wrapped in a
    /// [`PooledConnection`].
    ///
    /// # Errors
    /// Rejects with the driver's error, unchanged.
    pub async fn get_connection(
        &self,
    ) -> Result<PooledConnection<P::Connection>, PoolAdapterError> {
        let raw = await_callback(
            |done| self.pool.get_connection(done),
            "driver dropped the get_connection callback",
        )
        .await?;
        Ok(PooledConnection::new(raw))
    }

    /// Return a checked-out connection, unwrapping it to the raw value the
    /// driver expects.
    pub fn release_connection(&self, connection: PooledConnection<P::Connection>) {
        self.pool.release_connection(connection.into_inner());
    }
}
