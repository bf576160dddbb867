use std::fmt;

use super::bridge::await_callback;
use crate::driver::RawConnection;
use crate::error::PoolAdapterError;
use crate::results::ResultSet;
use crate::types::DbValue;

/// A checked-out connection, wrapping the driver's raw connection value.
///
/// Constructed exclusively by [`crate::pool::PoolAdapter::get_connection`];
/// hand it back through `release_connection`, which unwraps it to the raw
/// value the driver expects.
pub struct PooledConnection<C> {
    conn: C,
}

impl<C> PooledConnection<C> {
    pub(crate) fn new(conn: C) -> Self {
        Self { conn }
    }

    /// Borrow the raw driver connection.
    pub fn connection(&self) -> &C {
        &self.conn
    }

    /// Unwrap into the raw driver connection.
    #[must_use]
    pub fn into_inner(self) -> C {
        self.conn
    }
}

impl<C: RawConnection> PooledConnection<C> {
    /// Escape `value` for this connection's SQL dialect.
    pub fn escape(&self, value: &DbValue) -> String {
        self.conn.escape(value)
    }

    /// Run `sql` on this connection.
    ///
    /// # Errors
    /// Rejects with the error the driver passed to its completion callback,
    /// unchanged.
    pub async fn query(
        &self,
        sql: &str,
        params: Vec<DbValue>,
    ) -> Result<ResultSet, PoolAdapterError> {
        await_callback(
            |done| self.conn.query(sql, params, done),
            "driver dropped the connection query callback",
        )
        .await
    }

    /// Verify the connection is alive.
    ///
    /// # Errors
    /// Rejects with the driver's error, unchanged.
    pub async fn ping(&self) -> Result<(), PoolAdapterError> {
        await_callback(
            |done| self.conn.ping(done),
            "driver dropped the ping callback",
        )
        .await
    }
}

// Manual Debug because raw connection types rarely implement it.
impl<C> fmt::Debug for PooledConnection<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PooledConnection")
            .field(&"<connection>")
            .finish()
    }
}
