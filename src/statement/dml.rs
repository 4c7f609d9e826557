use super::placeholders;

/// `a = ?first AND b = ?first+1 …`, or an empty string for no columns.
#[must_use]
pub fn build_where<S: AsRef<str>>(columns: &[S], first_placeholder: usize) -> String {
    columns
        .iter()
        .zip(placeholders(first_placeholder, columns.len()))
        .map(|(col, ph)| format!("{} = {ph}", col.as_ref()))
        .collect::<Vec<_>>()
        .join(" AND ")
}

fn with_where(mut sql: String, where_clause: &str) -> String {
    if !where_clause.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(where_clause);
    }
    sql
}

/// `INSERT INTO <table> (<cols>) VALUES (?1, …)`; values bind in column order.
#[must_use]
pub fn build_insert<S: AsRef<str>>(table: &str, columns: &[S]) -> String {
    let cols = columns
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ");
    let values = placeholders(1, columns.len()).collect::<Vec<_>>().join(", ");
    format!("INSERT INTO {table} ({cols}) VALUES ({values})")
}

/// `UPDATE <table> SET a = ?1, … [WHERE <where_clause>]`
///
/// The SET placeholders take `?1..?n`, so a where clause built for this statement must start
/// numbering at `n + 1`; bind the update values first, then the where values.
#[must_use]
pub fn build_update<S: AsRef<str>>(table: &str, columns: &[S], where_clause: &str) -> String {
    let set_clause = columns
        .iter()
        .zip(placeholders(1, columns.len()))
        .map(|(col, ph)| format!("{} = {ph}", col.as_ref()))
        .collect::<Vec<_>>()
        .join(", ");
    with_where(format!("UPDATE {table} SET {set_clause}"), where_clause)
}

/// `DELETE FROM <table> [WHERE <where_clause>]`. An empty clause deletes every row.
#[must_use]
pub fn build_delete(table: &str, where_clause: &str) -> String {
    with_where(format!("DELETE FROM {table}"), where_clause)
}

/// `SELECT <cols> FROM <table> [WHERE <where_clause>]`; no columns means `*`.
#[must_use]
pub fn build_select<S: AsRef<str>>(table: &str, columns: &[S], where_clause: &str) -> String {
    let cols = if columns.is_empty() {
        "*".to_string()
    } else {
        columns
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(", ")
    };
    with_where(format!("SELECT {cols} FROM {table}"), where_clause)
}
