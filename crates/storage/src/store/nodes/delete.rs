#![forbid(unsafe_code)]

use super::super::*;
use rusqlite::params;

impl SqliteStore {
    /// Removes a node and its whole subtree, leaves first. Each row's history
    /// goes with it through `ON DELETE CASCADE`; descendants are deleted
    /// explicitly so the self-referencing cascade never recurses.
    pub fn delete_node(&mut self, request: DeleteNodeRequest) -> Result<NodeDeleted, StoreError> {
        let DeleteNodeRequest { domain, node_id } = request;

        let max_depth = self.config.max_tree_depth;
        let tx = begin_write(&mut self.conn)?;
        let node = require_node(&tx, domain, &node_id)?;
        if domain.policy().is_root(node.kind) {
            tracing::warn!(node_id = %node.id, "refusing to delete root node");
            return Err(StoreError::RootImmutable(node.id));
        }

        let subtree = subtree_ids_deepest_first(&tx, &node.id, max_depth)?;
        {
            let mut stmt = tx.prepare("DELETE FROM tree_nodes WHERE id=?1")?;
            for id in &subtree {
                stmt.execute(params![id])?;
            }
        }
        tx.commit()?;

        let removed = subtree.len();
        tracing::debug!(
            domain = domain.as_str(),
            node_id = %node.id,
            removed,
            "subtree deleted"
        );
        Ok(NodeDeleted {
            node_id: node.id,
            tree_id: node.tree_id,
            parent_id: node.parent_id,
            removed,
        })
    }
}
