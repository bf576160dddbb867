use tokio::sync::oneshot;

use crate::driver::DriverCallback;
use crate::error::PoolAdapterError;

/// Adapt one callback-style driver call into a future.
///
/// `issue` receives the completion callback and must hand it to the driver;
/// the returned future resolves with whatever the driver passes to that
/// callback. If the driver drops the callback without invoking it, the
/// future resolves to a `ConnectionError` carrying `drop_message`.
pub(crate) async fn await_callback<T, F>(
    issue: F,
    drop_message: &'static str,
) -> Result<T, PoolAdapterError>
where
    T: Send + 'static,
    F: FnOnce(DriverCallback<T>),
{
    let (tx, rx) = oneshot::channel();
    issue(Box::new(move |result| {
        let _ = tx.send(result);
    }));
    rx.await
        .map_err(|_| PoolAdapterError::ConnectionError(drop_message.into()))?
}
