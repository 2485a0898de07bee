#![forbid(unsafe_code)]

use super::super::*;
use arbor_core::model::{HistoryRecord, TreeDomain};

impl SqliteStore {
    /// Change log of one node, newest first, capped at `history_limit`.
    pub fn history_list(
        &self,
        domain: TreeDomain,
        node_id: &str,
    ) -> Result<Vec<HistoryRecord>, StoreError> {
        let node = require_node(&self.conn, domain, node_id)?;
        if !domain.policy().keeps_history(&node) {
            return Err(StoreError::InvalidInput("history is kept for the root node only"));
        }
        list_history_for(&self.conn, &node.id, self.config.history_limit)
    }
}
