use std::collections::HashMap;
use std::sync::Arc;

use crate::types::DbValue;

/// A single row from a query result.
///
/// Column names are shared across all rows of a result set, together with a
/// name-to-index map built once per result set.
#[derive(Debug, Clone)]
pub struct Row {
    /// The column names for this row (shared across all rows in a result set)
    pub column_names: Arc<Vec<String>>,
    /// The values for this row
    pub values: Vec<DbValue>,
    pub(crate) column_index: Arc<HashMap<String, usize>>,
}

impl Row {
    /// Create a standalone row with its own column-index map.
    #[must_use]
    pub fn new(column_names: Arc<Vec<String>>, values: Vec<DbValue>) -> Self {
        let column_index = Arc::new(build_column_index(&column_names));
        Self {
            column_names,
            values,
            column_index,
        }
    }

    /// Get the index of a column by name, or None if not found.
    #[must_use]
    pub fn get_column_index(&self, column_name: &str) -> Option<usize> {
        if let Some(&idx) = self.column_index.get(column_name) {
            return Some(idx);
        }

        // Fall back to linear search
        self.column_names.iter().position(|col| col == column_name)
    }

    /// Get a value from the row by column name, or None if the column
    /// wasn't found.
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&DbValue> {
        self.get_column_index(column_name)
            .and_then(|idx| self.values.get(idx))
    }

    /// Get a value from the row by column index, or None if the index is out
    /// of bounds.
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&DbValue> {
        self.values.get(index)
    }
}

pub(super) fn build_column_index(column_names: &[String]) -> HashMap<String, usize> {
    column_names
        .iter()
        .enumerate()
        .map(|(i, name)| (name.clone(), i))
        .collect()
}
