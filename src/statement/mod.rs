//! SQL text generation.
//!
//! Everything here is pure: table and column names are interpolated as given, values are
//! always left as numbered `?N` placeholders. Identifier validation is the caller's job
//! (see [`crate::schema::validate_identifier`]); the one deliberate exception to binding is
//! [`RawDdl`], which is spliced into `CREATE TABLE` verbatim.

mod classify;
mod ddl;
mod dml;

pub use classify::StatementKind;
pub use ddl::{ColumnDef, RawDdl, build_create_table, build_drop_table};
pub use dml::{build_delete, build_insert, build_select, build_update, build_where};

use crate::types::RowValues;

/// A query and its parameters bundled together
///
/// This is what the record service hands to the gateway: the statement text and the
/// values for its placeholders, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryAndParams {
    /// The SQL query string
    pub query: String,
    /// The parameters to be bound to the query
    pub params: Vec<RowValues>,
}

impl QueryAndParams {
    pub fn new(query: impl Into<String>, params: Vec<RowValues>) -> Self {
        Self {
            query: query.into(),
            params,
        }
    }
}

/// `?start, ?start+1, …` for `count` placeholders.
pub(crate) fn placeholders(start: usize, count: usize) -> impl Iterator<Item = String> {
    (start..start + count).map(|n| format!("?{n}"))
}
