#![forbid(unsafe_code)]

pub(super) const SQL: &str = r#"

        CREATE TABLE IF NOT EXISTS view_states (
          actor_id TEXT NOT NULL,
          tree_id TEXT NOT NULL,
          view_type TEXT NOT NULL,
          zoom REAL NOT NULL,
          pan_x REAL NOT NULL,
          pan_y REAL NOT NULL,
          expanded_nodes_json TEXT NOT NULL,
          updated_at_ms INTEGER NOT NULL,
          PRIMARY KEY (actor_id, tree_id)
        );
"#;
