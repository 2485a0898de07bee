#![forbid(unsafe_code)]

// order_index may hold negative scratch values inside a transaction while
// siblings are being shifted; committed rows are always >= 0.
pub(super) const SQL: &str = r#"

        CREATE TABLE IF NOT EXISTS tree_nodes (
          id TEXT PRIMARY KEY,
          domain TEXT NOT NULL,
          tree_id TEXT NOT NULL,
          parent_id TEXT REFERENCES tree_nodes(id) ON DELETE CASCADE,
          order_index INTEGER NOT NULL,
          kind TEXT NOT NULL,
          status TEXT NOT NULL,
          title TEXT NOT NULL,
          description TEXT,
          metadata_json TEXT,
          created_at_ms INTEGER NOT NULL,
          updated_at_ms INTEGER NOT NULL
        );
"#;
