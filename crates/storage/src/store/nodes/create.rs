#![forbid(unsafe_code)]

use super::super::*;
use arbor_core::model::{NodeKind, TreeNode, normalize_metadata};

impl SqliteStore {
    /// Inserts a node at the end of its sibling list.
    ///
    /// In a single-root domain a parentless request lands under the tree's
    /// root, or becomes the root itself (kind forced to `ROOT`) when the tree
    /// is still empty.
    pub fn create_node(&mut self, request: CreateNodeRequest) -> Result<TreeNode, StoreError> {
        let CreateNodeRequest {
            domain,
            tree_id,
            parent_id,
            kind,
            title,
            description,
            status,
            metadata,
        } = request;

        let policy = domain.policy();
        policy.validate_title(&title)?;
        let requested_kind = policy.resolve_kind(kind)?;
        let status = status.unwrap_or(policy.default_status);
        if !policy.allows_status(status) {
            return Err(StoreError::InvalidInput("status not allowed in this domain"));
        }
        policy.validate_metadata(metadata.as_ref())?;
        if policy.is_root(requested_kind) && parent_id.is_some() {
            return Err(StoreError::InvalidInput("root node cannot have a parent"));
        }

        let max_depth = self.config.max_tree_depth;
        let now_ms = now_ms();
        let tx = begin_write(&mut self.conn)?;

        let (parent_id, kind) = match parent_id {
            Some(parent_id) => {
                let parent = require_node(&tx, domain, &parent_id)?;
                if parent.tree_id != tree_id {
                    return Err(StoreError::CrossTreeReference {
                        node_id: parent.id,
                        expected_tree: tree_id.to_string(),
                        found_tree: parent.tree_id.to_string(),
                    });
                }
                (Some(parent.id), requested_kind)
            }
            None if policy.single_root => match find_root(&tx, domain, &tree_id)? {
                Some(_) if policy.is_root(requested_kind) => {
                    return Err(StoreError::InvalidInput("tree already has a root"));
                }
                Some(root) => (Some(root.id), requested_kind),
                None => (None, NodeKind::Root),
            },
            None => (None, requested_kind),
        };

        if let Some(parent_id) = parent_id.as_deref()
            && node_depth(&tx, parent_id, max_depth)? + 1 > max_depth
        {
            tracing::warn!(parent_id, max_depth, "tree depth limit reached");
            return Err(StoreError::TreeDepthExceeded { max_depth });
        }

        let order_index = next_order_index_for(
            &tx,
            SiblingScope {
                domain,
                tree_id: &tree_id,
                parent_id: parent_id.as_deref(),
            },
        )?;
        let id = next_node_id_tx(&tx)?;
        let node = TreeNode {
            id,
            domain,
            tree_id,
            parent_id,
            order_index,
            kind,
            status,
            title,
            description,
            metadata: normalize_metadata(metadata),
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
        };
        insert_node_tx(&tx, &node)?;
        tx.commit()?;

        tracing::debug!(
            domain = domain.as_str(),
            tree_id = %node.tree_id,
            node_id = %node.id,
            parent_id = ?node.parent_id,
            order_index = node.order_index,
            kind = node.kind.as_str(),
            "node created"
        );
        Ok(node)
    }
}
