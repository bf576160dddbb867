use std::collections::HashMap;
use std::sync::Arc;

use super::row::{Row, build_column_index};
use crate::types::DbValue;

/// A result set from a database query.
///
/// Contains the rows returned by the query plus the affected-row count for
/// DML statements that return no rows.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// The rows returned by the query
    pub rows: Vec<Row>,
    /// The number of rows affected (for DML statements)
    pub rows_affected: usize,
    column_names: Option<Arc<Vec<String>>>,
    column_index: Option<Arc<HashMap<String, usize>>>,
}

impl ResultSet {
    /// Create a new result set with a known row capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> ResultSet {
        ResultSet {
            rows: Vec::with_capacity(capacity),
            rows_affected: 0,
            column_names: None,
            column_index: None,
        }
    }

    /// A result set for a statement that returned no rows, only a change
    /// count.
    #[must_use]
    pub fn rows_affected_only(rows_affected: usize) -> ResultSet {
        ResultSet {
            rows_affected,
            ..ResultSet::default()
        }
    }

    /// Set the column names for this result set (shared by all rows).
    ///
    /// The name-to-index map is built once here and reused by every row
    /// added afterwards.
    pub fn set_column_names(&mut self, column_names: Arc<Vec<String>>) {
        self.column_index = Some(Arc::new(build_column_index(&column_names)));
        self.column_names = Some(column_names);
    }

    /// Get the column names for this result set.
    #[must_use]
    pub fn get_column_names(&self) -> Option<&Arc<Vec<String>>> {
        self.column_names.as_ref()
    }

    /// Add a row of values; `set_column_names` must have been called first,
    /// otherwise the values are dropped.
    pub fn add_row_values(&mut self, values: Vec<DbValue>) {
        if let (Some(column_names), Some(column_index)) =
            (&self.column_names, &self.column_index)
        {
            self.rows.push(Row {
                column_names: column_names.clone(),
                values,
                column_index: column_index.clone(),
            });
            self.rows_affected += 1;
        }
    }

    /// Add a pre-built row, adopting its column names when none are set yet.
    pub fn add_row(&mut self, row: Row) {
        if self.column_names.is_none() {
            self.column_names = Some(row.column_names.clone());
            self.column_index = Some(row.column_index.clone());
        }

        self.rows.push(row);
        self.rows_affected += 1;
    }
}
