#![forbid(unsafe_code)]

use super::super::super::StoreError;
use arbor_core::ids::TreeId;
use arbor_core::model::TreeDomain;
use arbor_core::ordering::{OrderingError, SiblingSlot, next_index, plan_make_room, plan_reindex};
use rusqlite::{Connection, Transaction, params};

/// Scratch slot for a node that is being relocated. Staged siblings use
/// `-(index)-1` with index >= 1, so they never land here.
const PARKED_INDEX: i64 = -1;

fn index_overflow(_: OrderingError) -> StoreError {
    StoreError::InvalidInput("order index overflow")
}

/// Siblings addressed by (domain, tree, parent). A `None` parent selects the
/// top-level nodes.
#[derive(Clone, Copy, Debug)]
pub(in crate::store) struct SiblingScope<'a> {
    pub(in crate::store) domain: TreeDomain,
    pub(in crate::store) tree_id: &'a TreeId,
    pub(in crate::store) parent_id: Option<&'a str>,
}

pub(in crate::store) fn next_order_index_for(
    conn: &Connection,
    scope: SiblingScope<'_>,
) -> Result<i64, StoreError> {
    let max: Option<i64> = conn.query_row(
        "SELECT MAX(order_index) FROM tree_nodes WHERE domain=?1 AND tree_id=?2 AND parent_id IS ?3",
        params![scope.domain.as_str(), scope.tree_id.as_str(), scope.parent_id],
        |row| row.get(0),
    )?;
    next_index(max).map_err(index_overflow)
}

pub(in crate::store) fn sibling_slots(
    conn: &Connection,
    scope: SiblingScope<'_>,
) -> Result<Vec<SiblingSlot>, StoreError> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, order_index
        FROM tree_nodes
        WHERE domain=?1 AND tree_id=?2 AND parent_id IS ?3
        ORDER BY order_index ASC, id ASC
        "#,
    )?;
    let rows = stmt.query_map(
        params![scope.domain.as_str(), scope.tree_id.as_str(), scope.parent_id],
        |row| Ok(SiblingSlot::new(row.get::<_, String>(0)?, row.get(1)?)),
    )?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub(in crate::store) fn park_node_tx(tx: &Transaction<'_>, node_id: &str) -> Result<(), StoreError> {
    tx.execute(
        "UPDATE tree_nodes SET order_index=?2 WHERE id=?1",
        params![node_id, PARKED_INDEX],
    )?;
    Ok(())
}

// Two passes keep the sibling unique indexes satisfied at every statement:
// first every target row moves to a distinct negative value, then to its
// final value, which no untouched sibling holds.
fn write_slots_tx(tx: &Transaction<'_>, slots: &[SiblingSlot], now_ms: i64) -> Result<(), StoreError> {
    let mut stmt = tx.prepare("UPDATE tree_nodes SET order_index=?2 WHERE id=?1")?;
    for slot in slots {
        stmt.execute(params![slot.id, -slot.order_index - 1])?;
    }
    let mut stmt =
        tx.prepare("UPDATE tree_nodes SET order_index=?2, updated_at_ms=?3 WHERE id=?1")?;
    for slot in slots {
        stmt.execute(params![slot.id, slot.order_index, now_ms])?;
    }
    Ok(())
}

/// Shifts every sibling at or after `from_index` one slot down. `exclude` is
/// the node about to take `from_index`; it must already be parked.
pub(in crate::store) fn make_room_tx(
    tx: &Transaction<'_>,
    scope: SiblingScope<'_>,
    from_index: i64,
    exclude: &str,
    now_ms: i64,
) -> Result<usize, StoreError> {
    let siblings = sibling_slots(tx, scope)?;
    let shifted = plan_make_room(&siblings, from_index, exclude).map_err(index_overflow)?;
    write_slots_tx(tx, &shifted, now_ms)?;
    Ok(shifted.len())
}

/// Renumbers the children of `scope` to `0..n` in `ordered_ids` order.
pub(in crate::store) fn reindex_tx(
    tx: &Transaction<'_>,
    scope: SiblingScope<'_>,
    ordered_ids: &[String],
    now_ms: i64,
) -> Result<usize, StoreError> {
    let children = sibling_slots(tx, scope)?;
    let changed = plan_reindex(&children, ordered_ids)?;
    write_slots_tx(tx, &changed, now_ms)?;
    Ok(changed.len())
}
