#![forbid(unsafe_code)]

pub(super) const SQL: &str = r#"

        CREATE UNIQUE INDEX IF NOT EXISTS idx_tree_nodes_top_unique ON tree_nodes(domain, tree_id, order_index) WHERE parent_id IS NULL;
        CREATE UNIQUE INDEX IF NOT EXISTS idx_tree_nodes_child_unique ON tree_nodes(domain, tree_id, parent_id, order_index) WHERE parent_id IS NOT NULL;
        CREATE INDEX IF NOT EXISTS idx_tree_nodes_parent ON tree_nodes(parent_id);
        CREATE INDEX IF NOT EXISTS idx_tree_nodes_tree ON tree_nodes(domain, tree_id, kind);
        CREATE INDEX IF NOT EXISTS idx_node_history_entity ON node_history(entity_id, changed_at_ms DESC, seq DESC);
"#;
