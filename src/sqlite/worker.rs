mod channel;
mod dispatcher;
mod manager;

pub(super) use channel::Command;
pub(super) use manager::SqliteWorker;
