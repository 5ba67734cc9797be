//! SQL for the `pets` table. Callers hand in values, projections, and sort
//! keys whose column names have already been checked against the schema, so
//! identifiers are interpolated directly while every value travels as a bound
//! parameter.

use rusqlite::{params_from_iter, Connection};

use crate::contract::{COLUMN_ID, TABLE_NAME};
use crate::db::Cursor;
use crate::error::Result;
use crate::values::{ContentValues, Selection, SortOrder, Value};

/// Prepare a `SELECT` over the table. Rows are only read once the returned
/// cursor is iterated. Without sort keys rows come back in insertion order.
pub(crate) fn query_pets<'conn>(
    conn: &'conn Connection,
    projection: &[&str],
    selection: &Selection,
    sort_order: Option<&SortOrder>,
) -> Result<Cursor<'conn>> {
    let columns = if projection.is_empty() {
        "*".to_string()
    } else {
        projection.join(", ")
    };

    let mut sql = format!("SELECT {columns} FROM {TABLE_NAME}");
    push_where(&mut sql, selection);

    let order = match sort_order.filter(|order| !order.is_empty()) {
        Some(order) => order
            .keys()
            .iter()
            .map(|(column, direction)| format!("{column} {}", direction.as_sql()))
            .collect::<Vec<_>>()
            .join(", "),
        None => format!("{COLUMN_ID} ASC"),
    };
    sql.push_str(" ORDER BY ");
    sql.push_str(&order);

    Cursor::prepare(conn, &sql, selection.args().to_vec())
}

/// Insert one row and return its rowid.
pub(crate) fn insert_pet(conn: &Connection, values: &ContentValues) -> rusqlite::Result<i64> {
    let columns = values.keys().collect::<Vec<_>>().join(", ");
    let placeholders = vec!["?"; values.len()].join(", ");
    let sql = format!("INSERT INTO {TABLE_NAME} ({columns}) VALUES ({placeholders})");

    conn.execute(&sql, params_from_iter(values.iter().map(|(_, value)| value)))?;
    Ok(conn.last_insert_rowid())
}

/// Apply `values` to every row matching `selection`; returns how many changed.
pub(crate) fn update_pets(
    conn: &Connection,
    values: &ContentValues,
    selection: &Selection,
) -> rusqlite::Result<usize> {
    let assignments = values
        .keys()
        .map(|column| format!("{column} = ?"))
        .collect::<Vec<_>>()
        .join(", ");
    let mut sql = format!("UPDATE {TABLE_NAME} SET {assignments}");
    push_where(&mut sql, selection);

    let params = values
        .iter()
        .map(|(_, value)| value)
        .chain(selection.args())
        .collect::<Vec<&Value>>();
    conn.execute(&sql, params_from_iter(params))
}

/// Remove every row matching `selection`; an empty selection empties the table.
pub(crate) fn delete_pets(conn: &Connection, selection: &Selection) -> rusqlite::Result<usize> {
    let mut sql = format!("DELETE FROM {TABLE_NAME}");
    push_where(&mut sql, selection);

    conn.execute(&sql, params_from_iter(selection.args()))
}

fn push_where(sql: &mut String, selection: &Selection) {
    if let Some(clause) = selection.clause() {
        sql.push_str(" WHERE (");
        sql.push_str(clause);
        sql.push(')');
    }
}
