#![forbid(unsafe_code)]

use super::super::super::StoreError;
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::HashSet;

/// Whether `node_id` is `ancestor_id` or sits anywhere below it.
///
/// Walks parent links upward from `node_id`. A repeated id or a chain longer
/// than `max_depth` means the stored hierarchy is already damaged; both are
/// reported as `true` so no move can make it worse.
pub(in crate::store) fn is_descendant_of(
    conn: &Connection,
    ancestor_id: &str,
    node_id: &str,
    max_depth: usize,
) -> Result<bool, StoreError> {
    let mut visited = HashSet::new();
    let mut current = Some(node_id.to_string());

    while let Some(id) = current {
        if id == ancestor_id {
            return Ok(true);
        }
        if visited.len() > max_depth {
            tracing::warn!(node_id, max_depth, "ancestor walk exceeded max depth");
            return Ok(true);
        }
        if !visited.insert(id.clone()) {
            tracing::warn!(node_id, at = %id, "parent chain loops");
            return Ok(true);
        }
        current = conn
            .query_row(
                "SELECT parent_id FROM tree_nodes WHERE id=?1",
                params![id],
                |row| row.get::<_, Option<String>>(0),
            )
            .optional()?
            .flatten();
    }

    Ok(false)
}
