use crate::driver::DriverCallback;
use crate::results::ResultSet;
use crate::types::DbValue;

/// Commands routed to a worker thread. Each asynchronous command carries the
/// driver callback it completes through.
pub(in crate::sqlite) enum Command {
    Query {
        sql: String,
        params: Vec<DbValue>,
        respond_to: DriverCallback<ResultSet>,
    },
    Ping {
        respond_to: DriverCallback<()>,
    },
    Shutdown,
}
