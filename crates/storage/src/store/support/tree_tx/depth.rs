#![forbid(unsafe_code)]

use super::super::super::{StoreError, to_sqlite_i64};
use rusqlite::{Connection, params};

// Every walk below stops one level past `max_depth`, which is enough to tell
// "at the limit" from "over it" without following a damaged chain forever.

/// Levels from the top of the tree down to `node_id`; a top-level node is 1.
/// Returns 0 for an unknown id.
pub(in crate::store) fn node_depth(
    conn: &Connection,
    node_id: &str,
    max_depth: usize,
) -> Result<usize, StoreError> {
    let depth: i64 = conn.query_row(
        r#"
        WITH RECURSIVE up(id, parent_id, depth) AS (
          SELECT id, parent_id, 1 FROM tree_nodes WHERE id=?1
          UNION ALL
          SELECT n.id, n.parent_id, up.depth + 1
          FROM tree_nodes n JOIN up ON n.id = up.parent_id
          WHERE up.depth <= ?2
        )
        SELECT COALESCE(MAX(depth), 0) FROM up
        "#,
        params![node_id, to_sqlite_i64(max_depth)?],
        |row| row.get(0),
    )?;
    Ok(usize::try_from(depth).unwrap_or(0))
}

/// Levels in the subtree under `node_id`, the node itself counting as 1.
pub(in crate::store) fn subtree_height(
    conn: &Connection,
    node_id: &str,
    max_depth: usize,
) -> Result<usize, StoreError> {
    let height: i64 = conn.query_row(
        r#"
        WITH RECURSIVE down(id, depth) AS (
          SELECT id, 1 FROM tree_nodes WHERE id=?1
          UNION ALL
          SELECT child.id, down.depth + 1
          FROM tree_nodes child JOIN down ON child.parent_id = down.id
          WHERE down.depth <= ?2
        )
        SELECT COALESCE(MAX(depth), 0) FROM down
        "#,
        params![node_id, to_sqlite_i64(max_depth)?],
        |row| row.get(0),
    )?;
    Ok(usize::try_from(height).unwrap_or(0))
}

/// The subtree under `node_id` (itself included), deepest rows first.
pub(in crate::store) fn subtree_ids_deepest_first(
    conn: &Connection,
    node_id: &str,
    max_depth: usize,
) -> Result<Vec<String>, StoreError> {
    let mut stmt = conn.prepare(
        r#"
        WITH RECURSIVE down(id, depth) AS (
          SELECT id, 1 FROM tree_nodes WHERE id=?1
          UNION ALL
          SELECT child.id, down.depth + 1
          FROM tree_nodes child JOIN down ON child.parent_id = down.id
          WHERE down.depth <= ?2
        )
        SELECT id FROM down ORDER BY depth DESC, id ASC
        "#,
    )?;
    let rows = stmt.query_map(params![node_id, to_sqlite_i64(max_depth)?], |row| {
        row.get::<_, String>(0)
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
