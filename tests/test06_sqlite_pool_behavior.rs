#![cfg(feature = "sqlite")]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use sql_pool_adapter::prelude::*;

fn file_config(dir: &tempfile::TempDir, max_size: usize) -> PoolConfig {
    PoolConfig::builder()
        .dbname(dir.path().join("adapter.db").to_string_lossy())
        .max_size(max_size)
        .finish()
}

fn temp_dir() -> Result<tempfile::TempDir, PoolAdapterError> {
    tempfile::tempdir().map_err(|err| PoolAdapterError::Other(err.to_string()))
}

async fn wait_until_set(flag: &Arc<AtomicBool>) -> bool {
    for _ in 0..400 {
        if flag.load(Ordering::SeqCst) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    false
}

#[tokio::test(flavor = "current_thread")]
async fn events_fire_on_checkout_and_release() -> Result<(), PoolAdapterError> {
    let dir = temp_dir()?;
    let pool = PoolAdapter::connect(SqliteDriver::new(), file_config(&dir, 1)).await?;

    let seen: Arc<Mutex<Vec<PoolEventKind>>> = Arc::new(Mutex::new(Vec::new()));
    for kind in [
        PoolEventKind::Acquire,
        PoolEventKind::Connection,
        PoolEventKind::Enqueue,
        PoolEventKind::Release,
    ] {
        let seen = Arc::clone(&seen);
        pool.on(
            kind,
            Arc::new(move |event: &PoolEvent| {
                seen.lock().unwrap().push(event.kind);
            }),
        );
    }

    let conn = pool.get_connection().await?;
    pool.release_connection(conn);

    let kinds = seen.lock().unwrap().clone();
    assert_eq!(
        kinds,
        vec![
            PoolEventKind::Connection,
            PoolEventKind::Acquire,
            PoolEventKind::Release,
        ]
    );

    pool.end().await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn exhausted_pool_queues_and_reuses_the_connection() -> Result<(), PoolAdapterError> {
    let dir = temp_dir()?;
    let pool = PoolAdapter::connect(SqliteDriver::new(), file_config(&dir, 1)).await?;

    let enqueued = Arc::new(AtomicBool::new(false));
    {
        let enqueued = Arc::clone(&enqueued);
        pool.on(
            PoolEventKind::Enqueue,
            Arc::new(move |_event| enqueued.store(true, Ordering::SeqCst)),
        );
    }

    let held = pool.get_connection().await?;
    let first_id = held.connection().id();

    let waiter_pool = pool.clone();
    let pending = tokio::spawn(async move { waiter_pool.get_connection().await });

    assert!(
        wait_until_set(&enqueued).await,
        "second checkout must queue once the pool is exhausted"
    );

    pool.release_connection(held);

    let reused = tokio::time::timeout(Duration::from_secs(5), pending)
        .await
        .expect("queued checkout must resolve after release")
        .expect("waiter task must not panic")?;
    assert_eq!(
        reused.connection().id(),
        first_id,
        "the released connection must serve the queued waiter"
    );
    pool.release_connection(reused);

    pool.end().await?;
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn leased_connection_keeps_session_state() -> Result<(), PoolAdapterError> {
    let dir = temp_dir()?;
    let pool = PoolAdapter::connect(SqliteDriver::new(), file_config(&dir, 2)).await?;

    let conn = pool.get_connection().await?;
    conn.query("CREATE TEMP TABLE scratch (v INTEGER)", vec![])
        .await?;
    conn.query("INSERT INTO scratch (v) VALUES (?1)", vec![DbValue::Int(5)])
        .await?;
    let counted = conn
        .query("SELECT count(*) AS cnt FROM scratch", vec![])
        .await?;
    assert_eq!(
        *counted.rows[0].get("cnt").unwrap().as_int().unwrap(),
        1,
        "temp tables must stay visible across queries on the same lease"
    );
    pool.release_connection(conn);

    pool.end().await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn end_fails_queued_waiters() -> Result<(), PoolAdapterError> {
    let dir = temp_dir()?;
    let pool = PoolAdapter::connect(SqliteDriver::new(), file_config(&dir, 1)).await?;

    let enqueued = Arc::new(AtomicBool::new(false));
    {
        let enqueued = Arc::clone(&enqueued);
        pool.on(
            PoolEventKind::Enqueue,
            Arc::new(move |_event| enqueued.store(true, Ordering::SeqCst)),
        );
    }

    let held = pool.get_connection().await?;

    let waiter_pool = pool.clone();
    let pending = tokio::spawn(async move { waiter_pool.get_connection().await });
    assert!(wait_until_set(&enqueued).await);

    pool.end().await?;

    let err = tokio::time::timeout(Duration::from_secs(5), pending)
        .await
        .expect("queued checkout must resolve once the pool closes")
        .expect("waiter task must not panic")
        .expect_err("a closed pool must fail queued waiters");
    assert!(matches!(err, PoolAdapterError::ConnectionError(_)));

    // Returning the held lease after close just drops it.
    pool.release_connection(held);
    Ok(())
}
