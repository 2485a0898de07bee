#![forbid(unsafe_code)]

use crate::model::{AuditField, HistoryRecord, NodePatch, NodeStatus, TreeNode, normalize_metadata};
use crate::policy::DomainPolicy;
use serde_json::Value as JsonValue;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldChange {
    pub field: AuditField,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("history value for `{field}` is unusable: {reason}")]
pub struct CorruptHistoryValue {
    pub field: String,
    pub reason: &'static str,
}

impl CorruptHistoryValue {
    fn new(field: &str, reason: &'static str) -> Self {
        Self {
            field: field.to_string(),
            reason,
        }
    }
}

pub fn encode_metadata(value: Option<&JsonValue>) -> Option<String> {
    match value {
        None | Some(JsonValue::Null) => None,
        Some(value) => Some(value.to_string()),
    }
}

/// The stored (stringified) form of a field's live value.
pub fn encode_field(node: &TreeNode, field: AuditField) -> Option<String> {
    match field {
        AuditField::Title => Some(node.title.clone()),
        AuditField::Body => node.description.clone(),
        AuditField::Status => Some(node.status.as_str().to_string()),
        AuditField::Metadata => encode_metadata(node.metadata.as_ref()),
    }
}

/// Field transitions `patch` would cause on `current`. Fields absent from
/// the patch are never compared.
pub fn diff(current: &TreeNode, patch: &NodePatch) -> Vec<FieldChange> {
    let mut changes = Vec::new();

    if let Some(title) = &patch.title
        && *title != current.title
    {
        changes.push(FieldChange {
            field: AuditField::Title,
            old_value: Some(current.title.clone()),
            new_value: Some(title.clone()),
        });
    }

    if let Some(description) = &patch.description
        && *description != current.description
    {
        changes.push(FieldChange {
            field: AuditField::Body,
            old_value: current.description.clone(),
            new_value: description.clone(),
        });
    }

    if let Some(status) = patch.status
        && status != current.status
    {
        changes.push(FieldChange {
            field: AuditField::Status,
            old_value: Some(current.status.as_str().to_string()),
            new_value: Some(status.as_str().to_string()),
        });
    }

    if let Some(metadata) = &patch.metadata {
        let next = normalize_metadata(metadata.clone());
        let prev = normalize_metadata(current.metadata.clone());
        if next != prev {
            changes.push(FieldChange {
                field: AuditField::Metadata,
                old_value: encode_metadata(prev.as_ref()),
                new_value: encode_metadata(next.as_ref()),
            });
        }
    }

    changes
}

/// Builds the patch that restores `record.old_value`, decoding and
/// validating the stored text first.
pub fn reverse_patch(
    policy: &DomainPolicy,
    record: &HistoryRecord,
) -> Result<(AuditField, NodePatch), CorruptHistoryValue> {
    let name = record.field_name.as_str();
    let field = policy
        .parse_field(name)
        .ok_or_else(|| CorruptHistoryValue::new(name, "field cannot be rolled back"))?;
    let old = record.old_value.as_deref();

    let patch = match field {
        AuditField::Title => {
            let title = old.ok_or_else(|| CorruptHistoryValue::new(name, "title cannot be null"))?;
            policy
                .validate_title(title)
                .map_err(|violation| CorruptHistoryValue::new(name, violation.0))?;
            NodePatch {
                title: Some(title.to_string()),
                ..NodePatch::default()
            }
        }
        AuditField::Body => NodePatch {
            description: Some(old.map(str::to_string)),
            ..NodePatch::default()
        },
        AuditField::Status => {
            let raw = old.ok_or_else(|| CorruptHistoryValue::new(name, "status cannot be null"))?;
            let status = NodeStatus::parse(raw)
                .filter(|status| policy.allows_status(*status))
                .ok_or_else(|| CorruptHistoryValue::new(name, "unknown status"))?;
            NodePatch {
                status: Some(status),
                ..NodePatch::default()
            }
        }
        AuditField::Metadata => {
            let metadata = match old {
                None => None,
                Some(raw) => {
                    let value: JsonValue = serde_json::from_str(raw)
                        .map_err(|_| CorruptHistoryValue::new(name, "metadata is not valid JSON"))?;
                    if !value.is_object() {
                        return Err(CorruptHistoryValue::new(name, "metadata is not a JSON object"));
                    }
                    Some(value)
                }
            };
            NodePatch {
                metadata: Some(metadata),
                ..NodePatch::default()
            }
        }
    };

    Ok((field, patch))
}

/// Whether the live value of `field` still equals `recorded`. Metadata is
/// compared structurally so key order in the stored text is irrelevant.
pub fn live_value_matches(node: &TreeNode, field: AuditField, recorded: Option<&str>) -> bool {
    match field {
        AuditField::Metadata => {
            let live = normalize_metadata(node.metadata.clone());
            let recorded = match recorded {
                None => None,
                Some(raw) => match serde_json::from_str::<JsonValue>(raw) {
                    Ok(value) => normalize_metadata(Some(value)),
                    Err(_) => return false,
                },
            };
            live == recorded
        }
        _ => encode_field(node, field).as_deref() == recorded,
    }
}
