#![forbid(unsafe_code)]

use super::super::*;

impl SqliteStore {
    pub fn update_node(&mut self, request: UpdateNodeRequest) -> Result<NodeUpdate, StoreError> {
        let UpdateNodeRequest {
            domain,
            node_id,
            actor,
            patch,
        } = request;

        domain.policy().validate_patch(&patch)?;

        let now_ms = now_ms();
        let tx = begin_write(&mut self.conn)?;
        let current = require_node(&tx, domain, &node_id)?;
        let update = apply_patch_tx(&tx, current, &patch, &actor, now_ms)?;
        tx.commit()?;

        tracing::debug!(
            domain = domain.as_str(),
            node_id = %node_id,
            actor = %actor,
            history_rows = update.history.len(),
            "node updated"
        );
        Ok(update)
    }
}
