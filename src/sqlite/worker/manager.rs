use std::sync::mpsc::{self, Sender};
use std::thread;

use rusqlite::OpenFlags;

use crate::error::PoolAdapterError;

use super::channel::Command;
use super::dispatcher::run_worker;

/// Handle to one worker thread owning a `rusqlite::Connection`.
///
/// The handle is the pool's unit of lease: checking a connection out hands
/// this handle to the caller, releasing hands it back. Dropping the last
/// handle shuts the worker down.
pub(in crate::sqlite) struct SqliteWorker {
    sender: Sender<Command>,
    id: u64,
}

impl SqliteWorker {
    pub(in crate::sqlite) fn spawn(path: &str, id: u64) -> Result<Self, PoolAdapterError> {
        // Open in the caller's thread so open errors surface synchronously.
        let conn = open_connection(path)?;
        let (sender, receiver) = mpsc::channel::<Command>();
        thread::Builder::new()
            .name(format!("sqlite-pool-worker-{id}"))
            .spawn(move || run_worker(&conn, &receiver))
            .map_err(|err| {
                PoolAdapterError::ConnectionError(format!(
                    "failed to spawn SQLite worker thread: {err}"
                ))
            })?;

        tracing::debug!(worker = id, path, "spawned SQLite worker");
        Ok(Self { sender, id })
    }

    pub(in crate::sqlite) fn id(&self) -> u64 {
        self.id
    }

    /// Queue a command; on failure the command is handed back so its
    /// callback can still be completed with an error.
    pub(in crate::sqlite) fn send(&self, command: Command) -> Result<(), Command> {
        self.sender.send(command).map_err(|err| err.0)
    }

    /// A second sender to the same worker, for callers that need to route a
    /// command while the handle itself travels inside the completion
    /// callback.
    pub(in crate::sqlite) fn sender(&self) -> Sender<Command> {
        self.sender.clone()
    }
}

impl Drop for SqliteWorker {
    fn drop(&mut self) {
        let _ = self.sender.send(Command::Shutdown);
    }
}

fn open_connection(path: &str) -> Result<rusqlite::Connection, PoolAdapterError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_URI
        | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    Ok(rusqlite::Connection::open_with_flags(path, flags)?)
}
