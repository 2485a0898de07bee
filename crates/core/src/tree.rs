#![forbid(unsafe_code)]

use crate::model::TreeNode;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TreeBranch {
    #[serde(flatten)]
    pub node: TreeNode,
    pub children: Vec<TreeBranch>,
}

/// Nests a flat node list. Nodes without a parent, or whose parent is not
/// in the list, become top-level branches. Siblings are ordered by
/// `order_index`, ties broken by id.
pub fn build_forest(nodes: Vec<TreeNode>) -> Vec<TreeBranch> {
    let present: HashSet<String> = nodes.iter().map(|node| node.id.clone()).collect();
    let mut top = Vec::new();
    let mut by_parent: HashMap<String, Vec<TreeNode>> = HashMap::new();

    for node in nodes {
        match node.parent_id.as_deref() {
            Some(parent) if present.contains(parent) => {
                by_parent.entry(parent.to_string()).or_default().push(node);
            }
            _ => top.push(node),
        }
    }

    sort_siblings(&mut top);
    top.into_iter()
        .map(|node| attach(node, &mut by_parent))
        .collect()
}

fn attach(node: TreeNode, by_parent: &mut HashMap<String, Vec<TreeNode>>) -> TreeBranch {
    let mut children = by_parent.remove(&node.id).unwrap_or_default();
    sort_siblings(&mut children);
    let children = children
        .into_iter()
        .map(|child| attach(child, by_parent))
        .collect();
    TreeBranch { node, children }
}

fn sort_siblings(nodes: &mut [TreeNode]) {
    nodes.sort_by(|a, b| {
        a.order_index
            .cmp(&b.order_index)
            .then_with(|| a.id.cmp(&b.id))
    });
}

impl TreeBranch {
    /// Node count of this branch including itself.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TreeBranch::node_count).sum::<usize>()
    }

    pub fn find(&self, id: &str) -> Option<&TreeBranch> {
        if self.node.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}
