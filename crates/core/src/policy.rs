#![forbid(unsafe_code)]

use crate::model::{AuditField, NodeKind, NodePatch, NodeStatus, TreeDomain, TreeNode};
use serde_json::Value as JsonValue;
use thiserror::Error;

pub const MAX_TITLE_CHARS: usize = 255;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct PolicyViolation(pub &'static str);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuditScope {
    /// Only the designated root keeps a history.
    RootOnly,
    AllNodes,
}

#[derive(Debug)]
pub struct DomainPolicy {
    pub domain: TreeDomain,
    pub body_field: &'static str,
    pub kinds: &'static [NodeKind],
    pub default_kind: Option<NodeKind>,
    pub statuses: &'static [NodeStatus],
    pub default_status: NodeStatus,
    pub completed_status: NodeStatus,
    pub audit_scope: AuditScope,
    pub audited_fields: &'static [AuditField],
    /// A single `ROOT` per tree, auto-designated on first insert. When false
    /// any number of top-level nodes is allowed and nothing is root-immutable.
    pub single_root: bool,
}

pub static TASK_POLICY: DomainPolicy = DomainPolicy {
    domain: TreeDomain::Task,
    body_field: "description",
    kinds: &[NodeKind::Root, NodeKind::Task, NodeKind::Milestone],
    default_kind: Some(NodeKind::Task),
    statuses: &[NodeStatus::Todo, NodeStatus::InProgress, NodeStatus::Done],
    default_status: NodeStatus::Todo,
    completed_status: NodeStatus::Done,
    audit_scope: AuditScope::RootOnly,
    audited_fields: &[AuditField::Title, AuditField::Body],
    single_root: true,
};

pub static STORY_POLICY: DomainPolicy = DomainPolicy {
    domain: TreeDomain::Story,
    body_field: "content",
    kinds: &[
        NodeKind::Overview,
        NodeKind::Act,
        NodeKind::Scene,
        NodeKind::Dialog,
        NodeKind::Event,
        NodeKind::Character,
    ],
    default_kind: None,
    statuses: &[
        NodeStatus::Draft,
        NodeStatus::InProgress,
        NodeStatus::Review,
        NodeStatus::Completed,
    ],
    default_status: NodeStatus::Draft,
    completed_status: NodeStatus::Completed,
    audit_scope: AuditScope::AllNodes,
    audited_fields: &[
        AuditField::Title,
        AuditField::Body,
        AuditField::Status,
        AuditField::Metadata,
    ],
    single_root: false,
};

impl TreeDomain {
    pub fn policy(self) -> &'static DomainPolicy {
        match self {
            TreeDomain::Task => &TASK_POLICY,
            TreeDomain::Story => &STORY_POLICY,
        }
    }
}

impl DomainPolicy {
    pub fn is_root(&self, kind: NodeKind) -> bool {
        self.single_root && kind == NodeKind::Root
    }

    pub fn allows_kind(&self, kind: NodeKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn allows_status(&self, status: NodeStatus) -> bool {
        self.statuses.contains(&status)
    }

    pub fn resolve_kind(&self, requested: Option<NodeKind>) -> Result<NodeKind, PolicyViolation> {
        let kind = requested
            .or(self.default_kind)
            .ok_or(PolicyViolation("kind is required"))?;
        if !self.allows_kind(kind) {
            return Err(PolicyViolation("kind not allowed in this domain"));
        }
        Ok(kind)
    }

    /// Whether changes of `field` on a node of `kind` are written to history.
    pub fn audits(&self, kind: NodeKind, field: AuditField) -> bool {
        if !self.audited_fields.contains(&field) {
            return false;
        }
        match self.audit_scope {
            AuditScope::AllNodes => true,
            AuditScope::RootOnly => self.is_root(kind),
        }
    }

    pub fn keeps_history(&self, node: &TreeNode) -> bool {
        match self.audit_scope {
            AuditScope::AllNodes => true,
            AuditScope::RootOnly => self.is_root(node.kind),
        }
    }

    pub fn field_name(&self, field: AuditField) -> &'static str {
        match field {
            AuditField::Title => "title",
            AuditField::Body => self.body_field,
            AuditField::Status => "status",
            AuditField::Metadata => "metadata",
        }
    }

    pub fn parse_field(&self, name: &str) -> Option<AuditField> {
        match name {
            "title" => Some(AuditField::Title),
            "status" => Some(AuditField::Status),
            "metadata" => Some(AuditField::Metadata),
            other if other == self.body_field => Some(AuditField::Body),
            _ => None,
        }
    }

    pub fn validate_title(&self, title: &str) -> Result<(), PolicyViolation> {
        if title.trim().is_empty() {
            return Err(PolicyViolation("title must not be empty"));
        }
        if title.chars().count() > MAX_TITLE_CHARS {
            return Err(PolicyViolation("title is longer than 255 characters"));
        }
        Ok(())
    }

    pub fn validate_metadata(&self, metadata: Option<&JsonValue>) -> Result<(), PolicyViolation> {
        match metadata {
            None | Some(JsonValue::Null) | Some(JsonValue::Object(_)) => Ok(()),
            Some(_) => Err(PolicyViolation("metadata must be a JSON object")),
        }
    }

    pub fn validate_patch(&self, patch: &NodePatch) -> Result<(), PolicyViolation> {
        if patch.is_empty() {
            return Err(PolicyViolation("no fields to edit"));
        }
        if let Some(title) = patch.title.as_deref() {
            self.validate_title(title)?;
        }
        if let Some(status) = patch.status
            && !self.allows_status(status)
        {
            return Err(PolicyViolation("status not allowed in this domain"));
        }
        if let Some(metadata) = &patch.metadata {
            self.validate_metadata(metadata.as_ref())?;
        }
        Ok(())
    }
}
