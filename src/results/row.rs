use std::collections::HashMap;
use std::sync::Arc;

use crate::types::{Record, RowValues};

/// A row from a query result
///
/// Column names and the name → index lookup are shared with every other row of the same
/// result set; only the values are owned.
#[derive(Debug, Clone)]
pub struct CustomDbRow {
    /// The column names for this row (shared across all rows in a result set)
    pub column_names: Arc<Vec<String>>,
    /// The values for this row, in column order
    pub values: Vec<RowValues>,
    #[doc(hidden)]
    pub(crate) column_index_cache: Arc<HashMap<String, usize>>,
}

impl CustomDbRow {
    /// Create a standalone row, building its own column lookup.
    #[must_use]
    pub fn new(column_names: Arc<Vec<String>>, values: Vec<RowValues>) -> Self {
        let cache = Arc::new(index_columns(&column_names));
        Self {
            column_names,
            values,
            column_index_cache: cache,
        }
    }

    /// Get the index of a column by name
    #[must_use]
    pub fn get_column_index(&self, column_name: &str) -> Option<usize> {
        self.column_index_cache.get(column_name).copied()
    }

    /// Get a value from the row by column name
    ///
    /// # Returns
    ///
    /// The value at the column, or None if the column wasn't found
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        self.get_column_index(column_name)
            .and_then(|idx| self.values.get(idx))
    }

    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&RowValues> {
        self.values.get(index)
    }

    /// Convert into an ordered `Record` keyed by column name.
    #[must_use]
    pub fn to_record(&self) -> Record {
        self.column_names
            .iter()
            .cloned()
            .zip(self.values.iter().cloned())
            .collect()
    }
}

pub(super) fn index_columns(column_names: &[String]) -> HashMap<String, usize> {
    // First occurrence wins when a SELECT yields duplicate names (e.g. a join on `id`).
    let mut cache = HashMap::with_capacity(column_names.len());
    for (i, name) in column_names.iter().enumerate() {
        cache.entry(name.clone()).or_insert(i);
    }
    cache
}
