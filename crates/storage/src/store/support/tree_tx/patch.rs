#![forbid(unsafe_code)]

use super::super::super::{NodeUpdate, StoreError};
use super::history::{HistoryInsertTxArgs, insert_history_tx};
use super::rows::update_node_fields_tx;
use arbor_core::audit::diff;
use arbor_core::ids::ActorId;
use arbor_core::model::{NodePatch, TreeNode, normalize_metadata};
use rusqlite::Transaction;

/// Applies `patch` to `current` and writes one history row per audited field
/// that actually changed. A patch that changes nothing writes nothing.
///
/// Shared by plain edits and rollbacks so both go through the same audit path.
pub(in crate::store) fn apply_patch_tx(
    tx: &Transaction<'_>,
    current: TreeNode,
    patch: &NodePatch,
    actor: &ActorId,
    now_ms: i64,
) -> Result<NodeUpdate, StoreError> {
    let changes = diff(&current, patch);
    if changes.is_empty() {
        return Ok(NodeUpdate {
            node: current,
            history: Vec::new(),
        });
    }

    let policy = current.domain.policy();
    let mut next = current;
    patch.apply_to(&mut next);
    next.metadata = normalize_metadata(next.metadata.take());
    next.updated_at_ms = now_ms;
    update_node_fields_tx(tx, &next)?;

    let mut history = Vec::new();
    for change in &changes {
        if !policy.audits(next.kind, change.field) {
            continue;
        }
        history.push(insert_history_tx(
            tx,
            HistoryInsertTxArgs {
                entity_id: &next.id,
                field_name: policy.field_name(change.field),
                old_value: change.old_value.as_deref(),
                new_value: change.new_value.as_deref(),
                changed_by: actor.as_str(),
                now_ms,
            },
        )?);
    }

    Ok(NodeUpdate {
        node: next,
        history,
    })
}
