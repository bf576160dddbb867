#![cfg(feature = "sqlite")]

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

#[tokio::test(flavor = "current_thread")]
async fn sqlite_round_trip_through_the_adapter() -> Result<(), PoolAdapterError> {
    let dir = temp_dir()?;
    let pool = PoolAdapter::connect(SqliteDriver::new(), file_config(&dir, 2)).await?;

    let created = pool
        .query(
            "CREATE TABLE player (
                id INTEGER PRIMARY KEY,
                name TEXT,
                score REAL,
                joined TEXT
            )",
            vec![],
        )
        .await?;
    assert!(created.rows.is_empty());

    let joined = DbValue::Text("2024-01-01 08:00:01".to_string())
        .as_timestamp()
        .expect("literal timestamp parses");
    let inserted = pool
        .query(
            "INSERT INTO player (id, name, score, joined) VALUES (?1, ?2, ?3, ?4)",
            vec![
                DbValue::Int(1),
                DbValue::Text("alice".to_string()),
                DbValue::Float(12.5),
                DbValue::Timestamp(joined),
            ],
        )
        .await?;
    assert_eq!(inserted.rows_affected, 1);

    let inserted = pool
        .query(
            "INSERT INTO player (id, name, score, joined) VALUES (?1, ?2, ?3, ?4)",
            vec![
                DbValue::Int(2),
                DbValue::Null,
                DbValue::Float(7.0),
                DbValue::Null,
            ],
        )
        .await?;
    assert_eq!(inserted.rows_affected, 1);

    let rows = pool
        .query(
            "SELECT id, name, score, joined FROM player ORDER BY id",
            vec![],
        )
        .await?;
    assert_eq!(rows.rows.len(), 2);
    assert_eq!(*rows.rows[0].get("id").unwrap().as_int().unwrap(), 1);
    assert_eq!(rows.rows[0].get("name").unwrap().as_text().unwrap(), "alice");
    assert_eq!(rows.rows[0].get("score").unwrap().as_float().unwrap(), 12.5);
    assert_eq!(
        rows.rows[0].get("joined").unwrap().as_timestamp().unwrap(),
        joined
    );
    assert!(rows.rows[1].get("name").unwrap().is_null());

    // Parameterized lookup.
    let one = pool
        .query(
            "SELECT count(*) AS cnt FROM player WHERE name = ?1",
            vec![DbValue::Text("alice".to_string())],
        )
        .await?;
    assert_eq!(*one.rows[0].get("cnt").unwrap().as_int().unwrap(), 1);

    pool.end().await?;
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn sqlite_escaping_matches_the_dialect() -> Result<(), PoolAdapterError> {
    let dir = temp_dir()?;
    let pool = PoolAdapter::connect(SqliteDriver::new(), file_config(&dir, 1)).await?;

    assert_eq!(
        pool.escape(&DbValue::Text("it's".to_string())),
        "'it''s'"
    );
    assert_eq!(pool.escape(&DbValue::Null), "NULL");
    assert_eq!(pool.escape(&DbValue::Int(9)), "9");
    assert_eq!(pool.escape_id("we\"ird"), "\"we\"\"ird\"");

    pool.end().await?;
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn checked_out_connection_queries_and_pings() -> Result<(), PoolAdapterError> {
    let dir = temp_dir()?;
    let pool = PoolAdapter::connect(SqliteDriver::new(), file_config(&dir, 2)).await?;

    pool.query("CREATE TABLE t (v INTEGER)", vec![]).await?;
    pool.query("INSERT INTO t (v) VALUES (?1), (?2)", vec![
        DbValue::Int(1),
        DbValue::Int(2),
    ])
    .await?;

    let conn = pool.get_connection().await?;
    conn.ping().await?;
    let counted = conn.query("SELECT count(*) AS cnt FROM t", vec![]).await?;
    assert_eq!(*counted.rows[0].get("cnt").unwrap().as_int().unwrap(), 2);
    pool.release_connection(conn);

    pool.end().await?;
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn checkout_after_end_is_rejected() -> Result<(), PoolAdapterError> {
    let dir = temp_dir()?;
    let pool = PoolAdapter::connect(SqliteDriver::new(), file_config(&dir, 1)).await?;

    pool.end().await?;

    let err = pool
        .get_connection()
        .await
        .expect_err("a closed pool must not lease connections");
    assert!(matches!(err, PoolAdapterError::ConnectionError(_)));
    Ok(())
}
