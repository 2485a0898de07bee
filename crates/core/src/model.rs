#![forbid(unsafe_code)]

use crate::ids::TreeId;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Which hierarchy a node belongs to. Both share the storage layout and the
/// engine; they differ only in their [`crate::policy::DomainPolicy`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeDomain {
    Task,
    Story,
}

impl TreeDomain {
    pub fn as_str(self) -> &'static str {
        match self {
            TreeDomain::Task => "task",
            TreeDomain::Story => "story",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "task" => Some(TreeDomain::Task),
            "story" => Some(TreeDomain::Story),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    Root,
    Task,
    Milestone,
    Overview,
    Act,
    Scene,
    Dialog,
    Event,
    Character,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Root => "ROOT",
            NodeKind::Task => "TASK",
            NodeKind::Milestone => "MILESTONE",
            NodeKind::Overview => "OVERVIEW",
            NodeKind::Act => "ACT",
            NodeKind::Scene => "SCENE",
            NodeKind::Dialog => "DIALOG",
            NodeKind::Event => "EVENT",
            NodeKind::Character => "CHARACTER",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Some(match value {
            "ROOT" => NodeKind::Root,
            "TASK" => NodeKind::Task,
            "MILESTONE" => NodeKind::Milestone,
            "OVERVIEW" => NodeKind::Overview,
            "ACT" => NodeKind::Act,
            "SCENE" => NodeKind::Scene,
            "DIALOG" => NodeKind::Dialog,
            "EVENT" => NodeKind::Event,
            "CHARACTER" => NodeKind::Character,
            _ => return None,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeStatus {
    Todo,
    InProgress,
    Done,
    Draft,
    Review,
    Completed,
}

impl NodeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeStatus::Todo => "TODO",
            NodeStatus::InProgress => "IN_PROGRESS",
            NodeStatus::Done => "DONE",
            NodeStatus::Draft => "DRAFT",
            NodeStatus::Review => "REVIEW",
            NodeStatus::Completed => "COMPLETED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Some(match value {
            "TODO" => NodeStatus::Todo,
            "IN_PROGRESS" => NodeStatus::InProgress,
            "DONE" => NodeStatus::Done,
            "DRAFT" => NodeStatus::Draft,
            "REVIEW" => NodeStatus::Review,
            "COMPLETED" => NodeStatus::Completed,
            _ => return None,
        })
    }
}

/// A field whose transitions can be written to history.
///
/// `Body` is the free-text field; the task domain calls it `description`,
/// the narrative domain `content`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuditField {
    Title,
    Body,
    Status,
    Metadata,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: String,
    pub domain: TreeDomain,
    pub tree_id: TreeId,
    pub parent_id: Option<String>,
    pub order_index: i64,
    pub kind: NodeKind,
    pub status: NodeStatus,
    pub title: String,
    pub description: Option<String>,
    pub metadata: Option<JsonValue>,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: String,
    pub entity_id: String,
    pub field_name: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub changed_by: String,
    pub changed_at_ms: i64,
}

/// Partial update. `None` leaves a field untouched; `Some(None)` clears a
/// nullable field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodePatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<NodeStatus>,
    pub metadata: Option<Option<JsonValue>>,
}

impl NodePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.metadata.is_none()
    }

    pub fn has(&self, field: AuditField) -> bool {
        match field {
            AuditField::Title => self.title.is_some(),
            AuditField::Body => self.description.is_some(),
            AuditField::Status => self.status.is_some(),
            AuditField::Metadata => self.metadata.is_some(),
        }
    }

    pub fn apply_to(&self, node: &mut TreeNode) {
        if let Some(title) = &self.title {
            node.title = title.clone();
        }
        if let Some(description) = &self.description {
            node.description = description.clone();
        }
        if let Some(status) = self.status {
            node.status = status;
        }
        if let Some(metadata) = &self.metadata {
            node.metadata = metadata.clone();
        }
    }
}

/// JSON `null` metadata is stored as absent.
pub fn normalize_metadata(value: Option<JsonValue>) -> Option<JsonValue> {
    match value {
        Some(JsonValue::Null) | None => None,
        Some(other) => Some(other),
    }
}
