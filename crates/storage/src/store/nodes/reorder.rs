#![forbid(unsafe_code)]

use super::super::*;
use arbor_core::model::TreeNode;

impl SqliteStore {
    /// Renumbers the children of one parent to `0..n` in the given order and
    /// returns them in their new order.
    pub fn reorder_children(
        &mut self,
        request: ReorderChildrenRequest,
    ) -> Result<Vec<TreeNode>, StoreError> {
        let ReorderChildrenRequest {
            domain,
            tree_id,
            parent_id,
            ordered_ids,
        } = request;

        let now_ms = now_ms();
        let tx = begin_write(&mut self.conn)?;

        if let Some(parent_id) = parent_id.as_deref() {
            let parent = require_node(&tx, domain, parent_id)?;
            if parent.tree_id != tree_id {
                return Err(StoreError::CrossTreeReference {
                    node_id: parent.id,
                    expected_tree: tree_id.to_string(),
                    found_tree: parent.tree_id.to_string(),
                });
            }
        }

        let scope = SiblingScope {
            domain,
            tree_id: &tree_id,
            parent_id: parent_id.as_deref(),
        };
        let changed = reindex_tx(&tx, scope, &ordered_ids, now_ms)?;
        let children = load_children(&tx, domain, &tree_id, parent_id.as_deref())?;
        tx.commit()?;

        tracing::debug!(
            domain = domain.as_str(),
            tree_id = %tree_id,
            parent_id = ?parent_id,
            changed,
            "children reordered"
        );
        Ok(children)
    }
}
