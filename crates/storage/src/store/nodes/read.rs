#![forbid(unsafe_code)]

use super::super::*;
use arbor_core::ids::TreeId;
use arbor_core::model::{TreeDomain, TreeNode};
use arbor_core::tree::{TreeBranch, build_forest};

impl SqliteStore {
    pub fn get_node(&self, domain: TreeDomain, node_id: &str) -> Result<TreeNode, StoreError> {
        require_node(&self.conn, domain, node_id)
    }

    /// All nodes of a tree, flat, in sibling order.
    pub fn list_nodes(&self, domain: TreeDomain, tree_id: &TreeId) -> Result<Vec<TreeNode>, StoreError> {
        load_tree_nodes(&self.conn, domain, tree_id)
    }

    pub fn list_children(
        &self,
        domain: TreeDomain,
        tree_id: &TreeId,
        parent_id: Option<&str>,
    ) -> Result<Vec<TreeNode>, StoreError> {
        load_children(&self.conn, domain, tree_id, parent_id)
    }

    pub fn tree_forest(&self, domain: TreeDomain, tree_id: &TreeId) -> Result<Vec<TreeBranch>, StoreError> {
        let nodes = load_tree_nodes(&self.conn, domain, tree_id)?;
        Ok(build_forest(nodes))
    }

    /// Index a node appended under `parent_id` would receive.
    pub fn next_order_index(
        &self,
        domain: TreeDomain,
        tree_id: &TreeId,
        parent_id: Option<&str>,
    ) -> Result<i64, StoreError> {
        next_order_index_for(
            &self.conn,
            SiblingScope {
                domain,
                tree_id,
                parent_id,
            },
        )
    }

    /// True when `node_id` equals `ancestor_id` or lies in its subtree.
    pub fn is_descendant(&self, ancestor_id: &str, node_id: &str) -> Result<bool, StoreError> {
        is_descendant_of(&self.conn, ancestor_id, node_id, self.config.max_tree_depth)
    }
}
