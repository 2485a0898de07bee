#![forbid(unsafe_code)]

pub(super) const SQL: &str = r#"

        CREATE TABLE IF NOT EXISTS node_history (
          id TEXT PRIMARY KEY,
          seq INTEGER NOT NULL UNIQUE,
          entity_id TEXT NOT NULL REFERENCES tree_nodes(id) ON DELETE CASCADE,
          field_name TEXT NOT NULL,
          old_value TEXT,
          new_value TEXT,
          changed_by TEXT NOT NULL,
          changed_at_ms INTEGER NOT NULL
        );
"#;
