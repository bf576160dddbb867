use rusqlite::types::Value as SqliteValue;
use rusqlite::{Connection, Statement, ToSql};

use crate::error::PoolAdapterError;
use crate::results::ResultSet;
use crate::types::DbValue;

/// Convert an adapter value into a rusqlite value.
#[must_use]
pub(crate) fn to_sqlite_value(value: &DbValue) -> SqliteValue {
    match value {
        DbValue::Int(i) => SqliteValue::Integer(*i),
        DbValue::Float(f) => SqliteValue::Real(*f),
        DbValue::Text(s) => SqliteValue::Text(s.clone()),
        DbValue::Bool(b) => SqliteValue::Integer(i64::from(*b)),
        DbValue::Timestamp(dt) => {
            SqliteValue::Text(dt.format("%Y-%m-%d %H:%M:%S%.3f").to_string())
        }
        DbValue::Null => SqliteValue::Null,
        DbValue::Json(jval) => SqliteValue::Text(jval.to_string()),
        DbValue::Blob(bytes) => SqliteValue::Blob(bytes.clone()),
    }
}

/// Extract a `DbValue` from a SQLite row.
fn extract_value(row: &rusqlite::Row, idx: usize) -> Result<DbValue, PoolAdapterError> {
    let value: SqliteValue = row.get(idx).map_err(PoolAdapterError::SqliteError)?;
    match value {
        SqliteValue::Null => Ok(DbValue::Null),
        SqliteValue::Integer(i) => Ok(DbValue::Int(i)),
        SqliteValue::Real(f) => Ok(DbValue::Float(f)),
        SqliteValue::Text(s) => Ok(DbValue::Text(s)),
        SqliteValue::Blob(b) => Ok(DbValue::Blob(b)),
    }
}

/// Run one statement and build its result.
///
/// SELECT-like statements produce rows; statements with no result columns
/// run through the execute path and report the change count only.
pub(crate) fn run_statement(
    conn: &Connection,
    sql: &str,
    params: &[DbValue],
) -> Result<ResultSet, PoolAdapterError> {
    let values: Vec<SqliteValue> = params.iter().map(to_sqlite_value).collect();
    let mut stmt = conn.prepare(sql)?;
    if stmt.column_count() == 0 {
        let param_refs: Vec<&dyn ToSql> = values.iter().map(|v| v as &dyn ToSql).collect();
        let rows_affected = stmt.execute(&param_refs[..])?;
        Ok(ResultSet::rows_affected_only(rows_affected))
    } else {
        build_result_set(&mut stmt, &values)
    }
}

/// Build a result set from a prepared SELECT statement.
pub(crate) fn build_result_set(
    stmt: &mut Statement,
    params: &[SqliteValue],
) -> Result<ResultSet, PoolAdapterError> {
    let param_refs: Vec<&dyn ToSql> = params.iter().map(|v| v as &dyn ToSql).collect();
    let column_names: Vec<String> = stmt
        .column_names()
        .iter()
        .map(std::string::ToString::to_string)
        .collect();
    let col_count = column_names.len();

    let mut result_set = ResultSet::with_capacity(10);
    result_set.set_column_names(std::sync::Arc::new(column_names));

    let mut rows_iter = stmt.query(&param_refs[..])?;
    while let Some(row) = rows_iter.next()? {
        let mut row_values = Vec::with_capacity(col_count);
        for i in 0..col_count {
            row_values.push(extract_value(row, i)?);
        }
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}
