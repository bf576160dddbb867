use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::PoolConfig;
use crate::driver::{DriverCallback, RawConnection, RawPool};
use crate::error::PoolAdapterError;
use crate::events::{EventListener, PoolEvent, PoolEventKind};
use crate::results::ResultSet;
use crate::types::DbValue;

use super::escape::{escape_identifier, escape_literal};
use super::worker::{Command, SqliteWorker};

const DEFAULT_MAX_SIZE: usize = 10;

/// Callback-style SQLite pool: a bounded set of worker-backed connections
/// with an idle set and a wait queue.
pub struct SqlitePool {
    shared: Arc<PoolShared>,
}

impl Clone for SqlitePool {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

struct PoolShared {
    path: String,
    max_size: usize,
    next_worker_id: AtomicU64,
    state: Mutex<PoolState>,
    listeners: Mutex<HashMap<PoolEventKind, Vec<EventListener>>>,
}

#[derive(Default)]
struct PoolState {
    idle: VecDeque<SqliteWorker>,
    waiters: VecDeque<DriverCallback<SqliteConnection>>,
    open: usize,
    closed: bool,
}

impl SqlitePool {
    /// Build a pool from `config`; connections open lazily on first lease.
    ///
    /// # Errors
    /// Returns `PoolAdapterError::ConfigError` if `max_size` is zero.
    pub(super) fn new(config: &PoolConfig) -> Result<Self, PoolAdapterError> {
        let path = config
            .dbname
            .clone()
            .unwrap_or_else(|| ":memory:".to_string());
        let mut max_size = config.max_size.unwrap_or(DEFAULT_MAX_SIZE);
        if max_size == 0 {
            return Err(PoolAdapterError::ConfigError(
                "max_size must be at least 1".to_string(),
            ));
        }
        // A plain :memory: database is private to each connection.
        if path == ":memory:" && max_size > 1 {
            tracing::warn!(
                max_size,
                "capping :memory: pool at one connection; use a file:...?cache=shared URI for more"
            );
            max_size = 1;
        }

        Ok(Self {
            shared: Arc::new(PoolShared {
                path,
                max_size,
                next_worker_id: AtomicU64::new(1),
                state: Mutex::new(PoolState::default()),
                listeners: Mutex::new(HashMap::new()),
            }),
        })
    }

    fn lock_state(&self) -> MutexGuard<'_, PoolState> {
        match self.shared.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn emit(&self, kind: PoolEventKind, connection_id: Option<u64>) {
        let registered: Vec<EventListener> = {
            let listeners = match self.shared.listeners.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            listeners.get(&kind).cloned().unwrap_or_default()
        };
        if registered.is_empty() {
            return;
        }
        let event = PoolEvent {
            kind,
            connection_id,
        };
        for listener in &registered {
            listener(&event);
        }
    }

    /// Lease a connection: idle worker first, then a fresh worker while
    /// under capacity, otherwise the request queues.
    fn lease(&self, done: DriverCallback<SqliteConnection>) {
        let mut state = self.lock_state();
        if state.closed {
            drop(state);
            done(Err(pool_closed()));
            return;
        }
        if let Some(worker) = state.idle.pop_front() {
            drop(state);
            let id = worker.id();
            self.emit(PoolEventKind::Acquire, Some(id));
            done(Ok(SqliteConnection::new(worker)));
            return;
        }
        if state.open < self.shared.max_size {
            let id = self.shared.next_worker_id.fetch_add(1, Ordering::Relaxed);
            match SqliteWorker::spawn(&self.shared.path, id) {
                Ok(worker) => {
                    state.open += 1;
                    drop(state);
                    self.emit(PoolEventKind::Connection, Some(id));
                    self.emit(PoolEventKind::Acquire, Some(id));
                    done(Ok(SqliteConnection::new(worker)));
                }
                Err(err) => {
                    drop(state);
                    done(Err(err));
                }
            }
            return;
        }
        state.waiters.push_back(done);
        drop(state);
        self.emit(PoolEventKind::Enqueue, None);
    }

    /// Return a worker: queued waiters are served first, then the idle set.
    /// After `end`, returned workers are dropped instead of re-pooled.
    fn give_back(&self, worker: SqliteWorker) {
        let id = worker.id();
        let mut state = self.lock_state();
        if state.closed {
            state.open = state.open.saturating_sub(1);
            drop(state);
            return;
        }
        if let Some(waiter) = state.waiters.pop_front() {
            drop(state);
            self.emit(PoolEventKind::Acquire, Some(id));
            waiter(Ok(SqliteConnection::new(worker)));
            return;
        }
        state.idle.push_back(worker);
        drop(state);
        self.emit(PoolEventKind::Release, Some(id));
    }

    /// Run one statement on a leased worker, giving the worker back when the
    /// statement completes.
    fn run_on_worker(
        &self,
        worker: SqliteWorker,
        sql: String,
        params: Vec<DbValue>,
        done: DriverCallback<ResultSet>,
    ) {
        // The handle travels inside the completion callback, so the command
        // goes out through a second sender to the same worker.
        let sender = worker.sender();
        let pool = self.clone();
        let respond_to: DriverCallback<ResultSet> = Box::new(move |result| {
            pool.give_back(worker);
            done(result);
        });
        let command = Command::Query {
            sql,
            params,
            respond_to,
        };
        if let Err(send_err) = sender.send(command) {
            if let Command::Query { respond_to, .. } = send_err.0 {
                respond_to(Err(worker_closed()));
            }
        }
    }
}

impl RawPool for SqlitePool {
    type Connection = SqliteConnection;

    fn escape(&self, value: &DbValue) -> String {
        escape_literal(value)
    }

    fn escape_id(&self, ident: &str) -> String {
        escape_identifier(ident)
    }

    fn on(&self, event: PoolEventKind, listener: EventListener) {
        let mut listeners = match self.shared.listeners.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        listeners.entry(event).or_default().push(listener);
    }

    fn query(&self, sql: &str, params: Vec<DbValue>, done: DriverCallback<ResultSet>) {
        let pool = self.clone();
        let sql = sql.to_string();
        self.lease(Box::new(move |leased| match leased {
            Ok(conn) => pool.run_on_worker(conn.into_worker(), sql, params, done),
            Err(err) => done(Err(err)),
        }));
    }

    fn end(&self, done: DriverCallback<()>) {
        let mut state = self.lock_state();
        if state.closed {
            drop(state);
            done(Ok(()));
            return;
        }
        state.closed = true;
        let idle: Vec<SqliteWorker> = state.idle.drain(..).collect();
        let waiters: Vec<DriverCallback<SqliteConnection>> = state.waiters.drain(..).collect();
        state.open = state.open.saturating_sub(idle.len());
        drop(state);

        tracing::debug!(
            drained = idle.len(),
            failed_waiters = waiters.len(),
            "closing SQLite pool"
        );
        for waiter in waiters {
            waiter(Err(pool_closed()));
        }
        // Dropping the handles shuts their workers down.
        drop(idle);
        done(Ok(()));
    }

    fn get_connection(&self, done: DriverCallback<Self::Connection>) {
        self.lease(done);
    }

    fn release_connection(&self, connection: Self::Connection) {
        self.give_back(connection.into_worker());
    }
}

impl fmt::Debug for SqlitePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlitePool")
            .field("path", &self.shared.path)
            .field("max_size", &self.shared.max_size)
            .finish_non_exhaustive()
    }
}

/// A leased SQLite connection: a worker handle with session affinity, so
/// temp tables and pragmas persist across queries on the same lease.
pub struct SqliteConnection {
    worker: SqliteWorker,
}

impl SqliteConnection {
    fn new(worker: SqliteWorker) -> Self {
        Self { worker }
    }

    fn into_worker(self) -> SqliteWorker {
        self.worker
    }

    /// Driver-assigned id of the underlying connection.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.worker.id()
    }

    fn dispatch(&self, command: Command) {
        if let Err(command) = self.worker.send(command) {
            match command {
                Command::Query { respond_to, .. } => respond_to(Err(worker_closed())),
                Command::Ping { respond_to } => respond_to(Err(worker_closed())),
                Command::Shutdown => {}
            }
        }
    }
}

impl RawConnection for SqliteConnection {
    fn escape(&self, value: &DbValue) -> String {
        escape_literal(value)
    }

    fn query(&self, sql: &str, params: Vec<DbValue>, done: DriverCallback<ResultSet>) {
        self.dispatch(Command::Query {
            sql: sql.to_string(),
            params,
            respond_to: done,
        });
    }

    fn ping(&self, done: DriverCallback<()>) {
        self.dispatch(Command::Ping { respond_to: done });
    }
}

impl fmt::Debug for SqliteConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteConnection")
            .field("id", &self.worker.id())
            .finish_non_exhaustive()
    }
}

fn pool_closed() -> PoolAdapterError {
    PoolAdapterError::ConnectionError("pool is closed".to_string())
}

fn worker_closed() -> PoolAdapterError {
    PoolAdapterError::ConnectionError("SQLite worker closed".to_string())
}
