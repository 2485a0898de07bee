#![forbid(unsafe_code)]

use super::super::super::{StoreError, to_sqlite_i64};
use super::counters::next_history_id_tx;
use arbor_core::model::HistoryRecord;
use rusqlite::{Connection, OptionalExtension, Row, Transaction, params};

pub(in crate::store) struct HistoryInsertTxArgs<'a> {
    pub(in crate::store) entity_id: &'a str,
    pub(in crate::store) field_name: &'a str,
    pub(in crate::store) old_value: Option<&'a str>,
    pub(in crate::store) new_value: Option<&'a str>,
    pub(in crate::store) changed_by: &'a str,
    pub(in crate::store) now_ms: i64,
}

pub(in crate::store) fn insert_history_tx(
    tx: &Transaction<'_>,
    args: HistoryInsertTxArgs<'_>,
) -> Result<HistoryRecord, StoreError> {
    let HistoryInsertTxArgs {
        entity_id,
        field_name,
        old_value,
        new_value,
        changed_by,
        now_ms,
    } = args;

    let (seq, id) = next_history_id_tx(tx)?;
    tx.execute(
        r#"
        INSERT INTO node_history(
          id, seq, entity_id, field_name, old_value, new_value, changed_by, changed_at_ms
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
        params![id, seq, entity_id, field_name, old_value, new_value, changed_by, now_ms],
    )?;

    Ok(HistoryRecord {
        id,
        entity_id: entity_id.to_string(),
        field_name: field_name.to_string(),
        old_value: old_value.map(str::to_string),
        new_value: new_value.map(str::to_string),
        changed_by: changed_by.to_string(),
        changed_at_ms: now_ms,
    })
}

fn read_history_row(row: &Row<'_>) -> rusqlite::Result<HistoryRecord> {
    Ok(HistoryRecord {
        id: row.get(0)?,
        entity_id: row.get(1)?,
        field_name: row.get(2)?,
        old_value: row.get(3)?,
        new_value: row.get(4)?,
        changed_by: row.get(5)?,
        changed_at_ms: row.get(6)?,
    })
}

pub(in crate::store) fn load_history_record(
    conn: &Connection,
    history_id: &str,
) -> Result<Option<HistoryRecord>, StoreError> {
    Ok(conn
        .query_row(
            r#"
            SELECT id, entity_id, field_name, old_value, new_value, changed_by, changed_at_ms
            FROM node_history
            WHERE id=?1
            "#,
            params![history_id],
            read_history_row,
        )
        .optional()?)
}

/// Newest first. Rows written in the same millisecond keep insertion order
/// through `seq`.
pub(in crate::store) fn list_history_for(
    conn: &Connection,
    entity_id: &str,
    limit: usize,
) -> Result<Vec<HistoryRecord>, StoreError> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, entity_id, field_name, old_value, new_value, changed_by, changed_at_ms
        FROM node_history
        WHERE entity_id=?1
        ORDER BY changed_at_ms DESC, seq DESC
        LIMIT ?2
        "#,
    )?;
    let rows = stmt.query_map(params![entity_id, to_sqlite_i64(limit)?], read_history_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
