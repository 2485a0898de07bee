#![forbid(unsafe_code)]

use super::super::*;
use arbor_core::audit::{live_value_matches, reverse_patch};

impl SqliteStore {
    /// Restores the field a history record changed to its `old_value`.
    ///
    /// The live value must still equal the record's `new_value`, else the
    /// call fails with `StaleHistory` and writes nothing. The restore itself
    /// is audited like any other edit.
    pub fn history_rollback(&mut self, request: RollbackRequest) -> Result<NodeUpdate, StoreError> {
        let RollbackRequest {
            domain,
            node_id,
            history_id,
            actor,
        } = request;

        let policy = domain.policy();
        let now_ms = now_ms();
        let tx = begin_write(&mut self.conn)?;

        let current = require_node(&tx, domain, &node_id)?;
        let record = load_history_record(&tx, &history_id)?.ok_or_else(|| StoreError::NotFound {
            entity: "history",
            id: history_id.clone(),
        })?;
        if record.entity_id != current.id {
            return Err(StoreError::MismatchedHistory {
                history_id,
                entity_id: current.id,
            });
        }

        let (field, patch) = reverse_patch(policy, &record)?;
        if !live_value_matches(&current, field, record.new_value.as_deref()) {
            tracing::warn!(
                history_id = %record.id,
                field = %record.field_name,
                "rollback rejected: field changed since record"
            );
            return Err(StoreError::StaleHistory {
                history_id: record.id,
                field: record.field_name,
            });
        }

        let update = apply_patch_tx(&tx, current, &patch, &actor, now_ms)?;
        tx.commit()?;

        tracing::debug!(
            domain = domain.as_str(),
            node_id = %node_id,
            history_id = %record.id,
            actor = %actor,
            "history rolled back"
        );
        Ok(update)
    }
}
