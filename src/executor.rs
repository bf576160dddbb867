use async_trait::async_trait;

use crate::driver::{RawConnection, RawPool};
use crate::error::PoolAdapterError;
use crate::pool::{PoolAdapter, PooledConnection};
use crate::results::ResultSet;
use crate::types::DbValue;

/// Anything that can run a query asynchronously: the pool adapter itself, or
/// a checked-out connection.
#[async_trait]
pub trait AsyncQueryExecutor {
    /// Run `sql` with `params` and return its result set.
    async fn query(&self, sql: &str, params: Vec<DbValue>)
    -> Result<ResultSet, PoolAdapterError>;
}

#[async_trait]
impl<P: RawPool> AsyncQueryExecutor for PoolAdapter<P> {
    async fn query(
        &self,
        sql: &str,
        params: Vec<DbValue>,
    ) -> Result<ResultSet, PoolAdapterError> {
        PoolAdapter::query(self, sql, params).await
    }
}

#[async_trait]
impl<C: RawConnection + Sync> AsyncQueryExecutor for PooledConnection<C> {
    async fn query(
        &self,
        sql: &str,
        params: Vec<DbValue>,
    ) -> Result<ResultSet, PoolAdapterError> {
        PooledConnection::query(self, sql, params).await
    }
}
