//! Recording stub driver for exercising the adapter without a database.
//!
//! Every call the adapter forwards is appended to a shared [`CallLog`];
//! canned results for the asynchronous calls are queued on [`StubBehavior`].
//! With no canned result queued, calls succeed with empty defaults.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::PoolConfig;
use crate::driver::{DriverCallback, PoolDriver, RawConnection, RawPool};
use crate::error::PoolAdapterError;
use crate::events::{EventListener, PoolEventKind};
use crate::results::ResultSet;
use crate::types::DbValue;

/// One forwarded call, as observed by the stub.
#[derive(Debug, Clone, PartialEq)]
pub enum StubCall {
    CreatePool(PoolConfig),
    Escape(DbValue),
    EscapeId(String),
    On(PoolEventKind),
    Query { sql: String, params: Vec<DbValue> },
    End,
    GetConnection,
    ReleaseConnection(u64),
    ConnQuery { id: u64, sql: String, params: Vec<DbValue> },
    Ping(u64),
}

/// Shared record of every call the stub received.
#[derive(Debug, Default)]
pub struct CallLog {
    calls: Mutex<Vec<StubCall>>,
}

impl CallLog {
    pub fn record(&self, call: StubCall) {
        lock(&self.calls).push(call);
    }

    #[must_use]
    pub fn calls(&self) -> Vec<StubCall> {
        lock(&self.calls).clone()
    }

    pub fn count_matching(&self, pred: impl Fn(&StubCall) -> bool) -> usize {
        lock(&self.calls).iter().filter(|call| pred(call)).count()
    }
}

/// Canned results for the stub's asynchronous calls.
#[derive(Debug)]
pub struct StubBehavior {
    pub query_results: Mutex<VecDeque<Result<ResultSet, PoolAdapterError>>>,
    pub end_results: Mutex<VecDeque<Result<(), PoolAdapterError>>>,
    pub connection_ids: Mutex<VecDeque<Result<u64, PoolAdapterError>>>,
    /// When set, `query` records the call but never invokes its callback.
    pub drop_query_callback: AtomicBool,
    next_connection_id: AtomicU64,
}

impl Default for StubBehavior {
    fn default() -> Self {
        Self {
            query_results: Mutex::new(VecDeque::new()),
            end_results: Mutex::new(VecDeque::new()),
            connection_ids: Mutex::new(VecDeque::new()),
            drop_query_callback: AtomicBool::new(false),
            next_connection_id: AtomicU64::new(1),
        }
    }
}

/// A driver whose pool records every forwarded call.
#[derive(Debug, Default)]
pub struct StubDriver {
    log: Arc<CallLog>,
    behavior: Arc<StubBehavior>,
}

impl StubDriver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle on the call log, kept valid after the driver is consumed.
    #[must_use]
    pub fn log(&self) -> Arc<CallLog> {
        Arc::clone(&self.log)
    }

    pub fn push_query_result(&self, result: Result<ResultSet, PoolAdapterError>) {
        lock(&self.behavior.query_results).push_back(result);
    }

    pub fn push_end_result(&self, result: Result<(), PoolAdapterError>) {
        lock(&self.behavior.end_results).push_back(result);
    }

    pub fn push_connection_id(&self, id: u64) {
        lock(&self.behavior.connection_ids).push_back(Ok(id));
    }

    pub fn push_connection_error(&self, err: PoolAdapterError) {
        lock(&self.behavior.connection_ids).push_back(Err(err));
    }

    pub fn drop_query_callbacks(&self, drop_them: bool) {
        self.behavior
            .drop_query_callback
            .store(drop_them, Ordering::SeqCst);
    }
}

impl PoolDriver for StubDriver {
    type Pool = StubPool;

    fn create_pool(self, config: &PoolConfig) -> Result<Self::Pool, PoolAdapterError> {
        self.log.record(StubCall::CreatePool(config.clone()));
        Ok(StubPool {
            log: self.log,
            behavior: self.behavior,
        })
    }
}

/// The pool produced by [`StubDriver`].
#[derive(Debug)]
pub struct StubPool {
    log: Arc<CallLog>,
    behavior: Arc<StubBehavior>,
}

impl RawPool for StubPool {
    type Connection = StubConnection;

    fn escape(&self, value: &DbValue) -> String {
        self.log.record(StubCall::Escape(value.clone()));
        format!("stub-escaped:{value:?}")
    }

    fn escape_id(&self, ident: &str) -> String {
        self.log.record(StubCall::EscapeId(ident.to_string()));
        format!("`{ident}`")
    }

    fn on(&self, event: PoolEventKind, _listener: EventListener) {
        self.log.record(StubCall::On(event));
    }

    fn query(&self, sql: &str, params: Vec<DbValue>, done: DriverCallback<ResultSet>) {
        self.log.record(StubCall::Query {
            sql: sql.to_string(),
            params,
        });
        if self.behavior.drop_query_callback.load(Ordering::SeqCst) {
            drop(done);
            return;
        }
        let result = lock(&self.behavior.query_results)
            .pop_front()
            .unwrap_or_else(|| Ok(ResultSet::default()));
        done(result);
    }

    fn end(&self, done: DriverCallback<()>) {
        self.log.record(StubCall::End);
        let result = lock(&self.behavior.end_results)
            .pop_front()
            .unwrap_or(Ok(()));
        done(result);
    }

    fn get_connection(&self, done: DriverCallback<Self::Connection>) {
        self.log.record(StubCall::GetConnection);
        let next = lock(&self.behavior.connection_ids).pop_front();
        let result = match next {
            Some(Ok(id)) => Ok(id),
            Some(Err(err)) => Err(err),
            None => Ok(self
                .behavior
                .next_connection_id
                .fetch_add(1, Ordering::SeqCst)),
        };
        done(result.map(|id| StubConnection {
            id,
            log: Arc::clone(&self.log),
        }));
    }

    fn release_connection(&self, connection: Self::Connection) {
        self.log.record(StubCall::ReleaseConnection(connection.id));
    }
}

/// The raw connection handed out by [`StubPool`].
#[derive(Debug)]
pub struct StubConnection {
    pub id: u64,
    log: Arc<CallLog>,
}

impl RawConnection for StubConnection {
    fn escape(&self, value: &DbValue) -> String {
        format!("stub-escaped:{value:?}")
    }

    fn query(&self, sql: &str, params: Vec<DbValue>, done: DriverCallback<ResultSet>) {
        self.log.record(StubCall::ConnQuery {
            id: self.id,
            sql: sql.to_string(),
            params,
        });
        done(Ok(ResultSet::default()));
    }

    fn ping(&self, done: DriverCallback<()>) {
        self.log.record(StubCall::Ping(self.id));
        done(Ok(()));
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
