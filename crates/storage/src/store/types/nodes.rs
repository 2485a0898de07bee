#![forbid(unsafe_code)]

use super::history::HistoryRecord;
use arbor_core::ids::{ActorId, TreeId};
use arbor_core::model::{NodeKind, NodePatch, NodeStatus, TreeDomain, TreeNode};
use serde_json::Value as JsonValue;

#[derive(Clone, Debug)]
pub struct CreateNodeRequest {
    pub domain: TreeDomain,
    pub tree_id: TreeId,
    /// Task trees attach a parentless node under the root, or make it the
    /// root when the tree is empty.
    pub parent_id: Option<String>,
    pub kind: Option<NodeKind>,
    pub title: String,
    pub description: Option<String>,
    pub status: Option<NodeStatus>,
    pub metadata: Option<JsonValue>,
}

impl CreateNodeRequest {
    pub fn new(domain: TreeDomain, tree_id: TreeId, title: impl Into<String>) -> Self {
        Self {
            domain,
            tree_id,
            parent_id: None,
            kind: None,
            title: title.into(),
            description: None,
            status: None,
            metadata: None,
        }
    }

    pub fn under(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn kind(mut self, kind: NodeKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

#[derive(Clone, Debug)]
pub struct UpdateNodeRequest {
    pub domain: TreeDomain,
    pub node_id: String,
    pub actor: ActorId,
    pub patch: NodePatch,
}

#[derive(Clone, Debug)]
pub struct MoveNodeRequest {
    pub domain: TreeDomain,
    pub node_id: String,
    /// `None` keeps the current parent and only repositions.
    pub new_parent_id: Option<String>,
    pub new_order_index: i64,
}

#[derive(Clone, Debug)]
pub struct ReorderChildrenRequest {
    pub domain: TreeDomain,
    pub tree_id: TreeId,
    /// `None` addresses the top-level nodes of the tree.
    pub parent_id: Option<String>,
    pub ordered_ids: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct DeleteNodeRequest {
    pub domain: TreeDomain,
    pub node_id: String,
}

/// An updated node together with the history rows written for it.
#[derive(Clone, Debug)]
pub struct NodeUpdate {
    pub node: TreeNode,
    pub history: Vec<HistoryRecord>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeDeleted {
    pub node_id: String,
    pub tree_id: TreeId,
    pub parent_id: Option<String>,
    /// Size of the removed subtree, the node itself included.
    pub removed: usize,
}
