#![forbid(unsafe_code)]

pub(super) const SQL: &str = r#"

        CREATE TABLE IF NOT EXISTS changelog (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          workspace TEXT NOT NULL,
          active INTEGER NOT NULL DEFAULT 1 CHECK(active IN (0, 1)),
          batch_id TEXT,
          op TEXT NOT NULL CHECK(op IN ('insert', 'update', 'delete')),
          entity_kind TEXT NOT NULL CHECK(entity_kind IN ('container', 'item')),
          entity_id INTEGER NOT NULL,
          payload_json TEXT NOT NULL,
          ts_ms INTEGER NOT NULL,
          FOREIGN KEY(workspace) REFERENCES workspaces(workspace) ON DELETE CASCADE
        );
"#;
