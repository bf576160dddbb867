use std::sync::mpsc::Receiver;

use rusqlite::Connection;

use crate::error::PoolAdapterError;
use crate::sqlite::query::run_statement;

use super::channel::Command;

/// Worker loop: owns the connection, executes commands until shutdown.
pub(super) fn run_worker(conn: &Connection, receiver: &Receiver<Command>) {
    while let Ok(command) = receiver.recv() {
        match command {
            Command::Shutdown => break,
            Command::Query {
                sql,
                params,
                respond_to,
            } => {
                respond_to(run_statement(conn, &sql, &params));
            }
            Command::Ping { respond_to } => {
                respond_to(ping(conn));
            }
        }
    }
}

fn ping(conn: &Connection) -> Result<(), PoolAdapterError> {
    conn.query_row("SELECT 1", [], |_row| Ok(()))
        .map_err(PoolAdapterError::SqliteError)
}
