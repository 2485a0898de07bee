#![forbid(unsafe_code)]

use super::super::*;
use arbor_core::model::TreeNode;
use arbor_core::ordering::MAX_ORDER_INDEX;

impl SqliteStore {
    /// Places a node at `new_order_index` under its new (or current) parent.
    /// Siblings at or after that index shift down by one; the slot the node
    /// leaves behind is not compacted. The moved subtree must still fit
    /// within `max_tree_depth` under its new parent.
    pub fn move_node(&mut self, request: MoveNodeRequest) -> Result<TreeNode, StoreError> {
        let MoveNodeRequest {
            domain,
            node_id,
            new_parent_id,
            new_order_index,
        } = request;

        if new_order_index < 0 {
            return Err(StoreError::InvalidInput("order index must not be negative"));
        }
        if new_order_index > MAX_ORDER_INDEX {
            return Err(StoreError::InvalidInput("order index out of range"));
        }

        let policy = domain.policy();
        let max_depth = self.config.max_tree_depth;
        let now_ms = now_ms();
        let tx = begin_write(&mut self.conn)?;

        let mut node = require_node(&tx, domain, &node_id)?;
        if policy.is_root(node.kind) {
            tracing::warn!(node_id = %node.id, "refusing to move root node");
            return Err(StoreError::RootImmutable(node.id));
        }

        if let Some(parent_id) = new_parent_id.as_deref() {
            let parent = require_node(&tx, domain, parent_id)?;
            if parent.tree_id != node.tree_id {
                return Err(StoreError::CrossTreeReference {
                    node_id: parent.id,
                    expected_tree: node.tree_id.to_string(),
                    found_tree: parent.tree_id.to_string(),
                });
            }
            if is_descendant_of(&tx, &node.id, &parent.id, max_depth)? {
                tracing::warn!(node_id = %node.id, parent_id = %parent.id, "cyclic move rejected");
                return Err(StoreError::CyclicMove {
                    node_id: node.id,
                    parent_id: parent.id,
                });
            }
            let depth = node_depth(&tx, &parent.id, max_depth)?
                + subtree_height(&tx, &node.id, max_depth)?;
            if depth > max_depth {
                tracing::warn!(
                    node_id = %node.id,
                    parent_id = %parent.id,
                    max_depth,
                    "move would exceed tree depth"
                );
                return Err(StoreError::TreeDepthExceeded { max_depth });
            }
        }

        let parent_id = new_parent_id.or_else(|| node.parent_id.clone());
        park_node_tx(&tx, &node.id)?;
        let shifted = make_room_tx(
            &tx,
            SiblingScope {
                domain,
                tree_id: &node.tree_id,
                parent_id: parent_id.as_deref(),
            },
            new_order_index,
            &node.id,
            now_ms,
        )?;

        node.parent_id = parent_id;
        node.order_index = new_order_index;
        node.updated_at_ms = now_ms;
        update_node_position_tx(&tx, &node)?;
        tx.commit()?;

        tracing::debug!(
            domain = domain.as_str(),
            node_id = %node.id,
            parent_id = ?node.parent_id,
            order_index = node.order_index,
            shifted,
            "node moved"
        );
        Ok(node)
    }
}
