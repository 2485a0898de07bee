#![forbid(unsafe_code)]

use super::super::super::StoreError;
use arbor_core::ids::TreeId;
use arbor_core::model::{NodeKind, NodeStatus, TreeDomain, TreeNode};
use rusqlite::{Connection, OptionalExtension, Row, Transaction, params};
use serde_json::Value as JsonValue;

const NODE_COLUMNS: &str = "id, domain, tree_id, parent_id, order_index, kind, status, title, \
     description, metadata_json, created_at_ms, updated_at_ms";

struct NodeRow {
    id: String,
    domain: String,
    tree_id: String,
    parent_id: Option<String>,
    order_index: i64,
    kind: String,
    status: String,
    title: String,
    description: Option<String>,
    metadata_json: Option<String>,
    created_at_ms: i64,
    updated_at_ms: i64,
}

impl NodeRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            domain: row.get(1)?,
            tree_id: row.get(2)?,
            parent_id: row.get(3)?,
            order_index: row.get(4)?,
            kind: row.get(5)?,
            status: row.get(6)?,
            title: row.get(7)?,
            description: row.get(8)?,
            metadata_json: row.get(9)?,
            created_at_ms: row.get(10)?,
            updated_at_ms: row.get(11)?,
        })
    }

    fn into_node(self) -> Result<TreeNode, StoreError> {
        let corrupt = |column| StoreError::CorruptRow {
            id: self.id.clone(),
            column,
        };
        let domain = TreeDomain::parse(&self.domain).ok_or_else(|| corrupt("domain"))?;
        let tree_id = TreeId::try_new(self.tree_id.clone()).map_err(|_| corrupt("tree_id"))?;
        let kind = NodeKind::parse(&self.kind).ok_or_else(|| corrupt("kind"))?;
        let status = NodeStatus::parse(&self.status).ok_or_else(|| corrupt("status"))?;
        let metadata = match self.metadata_json.as_deref() {
            None => None,
            Some(raw) => Some(serde_json::from_str::<JsonValue>(raw).map_err(|_| corrupt("metadata_json"))?),
        };

        Ok(TreeNode {
            id: self.id,
            domain,
            tree_id,
            parent_id: self.parent_id,
            order_index: self.order_index,
            kind,
            status,
            title: self.title,
            description: self.description,
            metadata,
            created_at_ms: self.created_at_ms,
            updated_at_ms: self.updated_at_ms,
        })
    }
}

fn collect_nodes(
    conn: &Connection,
    filter: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<TreeNode>, StoreError> {
    let sql = format!("SELECT {NODE_COLUMNS} FROM tree_nodes WHERE {filter}");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params, NodeRow::read)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?.into_node()?);
    }
    Ok(out)
}

pub(in crate::store) fn load_node(
    conn: &Connection,
    domain: TreeDomain,
    id: &str,
) -> Result<Option<TreeNode>, StoreError> {
    let sql = format!("SELECT {NODE_COLUMNS} FROM tree_nodes WHERE id=?1 AND domain=?2");
    let row = conn
        .query_row(&sql, params![id, domain.as_str()], NodeRow::read)
        .optional()?;
    row.map(NodeRow::into_node).transpose()
}

pub(in crate::store) fn require_node(
    conn: &Connection,
    domain: TreeDomain,
    id: &str,
) -> Result<TreeNode, StoreError> {
    load_node(conn, domain, id)?.ok_or_else(|| StoreError::node_not_found(id))
}

/// Flat listing of a tree; `build_forest` turns it into a hierarchy.
pub(in crate::store) fn load_tree_nodes(
    conn: &Connection,
    domain: TreeDomain,
    tree_id: &TreeId,
) -> Result<Vec<TreeNode>, StoreError> {
    collect_nodes(
        conn,
        "domain=?1 AND tree_id=?2 ORDER BY order_index ASC, id ASC",
        params![domain.as_str(), tree_id.as_str()],
    )
}

pub(in crate::store) fn load_children(
    conn: &Connection,
    domain: TreeDomain,
    tree_id: &TreeId,
    parent_id: Option<&str>,
) -> Result<Vec<TreeNode>, StoreError> {
    collect_nodes(
        conn,
        "domain=?1 AND tree_id=?2 AND parent_id IS ?3 ORDER BY order_index ASC, id ASC",
        params![domain.as_str(), tree_id.as_str(), parent_id],
    )
}

pub(in crate::store) fn find_root(
    conn: &Connection,
    domain: TreeDomain,
    tree_id: &TreeId,
) -> Result<Option<TreeNode>, StoreError> {
    let mut roots = collect_nodes(
        conn,
        "domain=?1 AND tree_id=?2 AND kind=?3 ORDER BY created_at_ms ASC, id ASC LIMIT 1",
        params![domain.as_str(), tree_id.as_str(), NodeKind::Root.as_str()],
    )?;
    Ok(roots.pop())
}

pub(in crate::store) fn insert_node_tx(tx: &Transaction<'_>, node: &TreeNode) -> Result<(), StoreError> {
    let metadata_json = node.metadata.as_ref().map(|value| value.to_string());
    tx.execute(
        r#"
        INSERT INTO tree_nodes(
          id, domain, tree_id, parent_id, order_index, kind, status, title,
          description, metadata_json, created_at_ms, updated_at_ms
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
        "#,
        params![
            node.id,
            node.domain.as_str(),
            node.tree_id.as_str(),
            node.parent_id,
            node.order_index,
            node.kind.as_str(),
            node.status.as_str(),
            node.title,
            node.description,
            metadata_json,
            node.created_at_ms,
            node.updated_at_ms
        ],
    )?;
    Ok(())
}

/// Writes the editable columns (title, body, status, metadata).
pub(in crate::store) fn update_node_fields_tx(
    tx: &Transaction<'_>,
    node: &TreeNode,
) -> Result<(), StoreError> {
    let metadata_json = node.metadata.as_ref().map(|value| value.to_string());
    let changed = tx.execute(
        r#"
        UPDATE tree_nodes
        SET title=?2, description=?3, status=?4, metadata_json=?5, updated_at_ms=?6
        WHERE id=?1
        "#,
        params![
            node.id,
            node.title,
            node.description,
            node.status.as_str(),
            metadata_json,
            node.updated_at_ms
        ],
    )?;
    if changed == 0 {
        return Err(StoreError::node_not_found(&node.id));
    }
    Ok(())
}

pub(in crate::store) fn update_node_position_tx(
    tx: &Transaction<'_>,
    node: &TreeNode,
) -> Result<(), StoreError> {
    let changed = tx.execute(
        "UPDATE tree_nodes SET parent_id=?2, order_index=?3, updated_at_ms=?4 WHERE id=?1",
        params![node.id, node.parent_id, node.order_index, node.updated_at_ms],
    )?;
    if changed == 0 {
        return Err(StoreError::node_not_found(&node.id));
    }
    Ok(())
}
