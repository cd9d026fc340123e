#![forbid(unsafe_code)]

// AUTOINCREMENT keeps ids monotonic: a deleted id is never handed out again, so undo can
// recreate a row under its original id without colliding with a newer row.
pub(super) const SQL: &str = r#"

        CREATE TABLE IF NOT EXISTS containers (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          workspace TEXT NOT NULL,
          name TEXT NOT NULL,
          position INTEGER NOT NULL,
          created_at_ms INTEGER NOT NULL,
          updated_at_ms INTEGER NOT NULL,
          UNIQUE(workspace, id),
          FOREIGN KEY(workspace) REFERENCES workspaces(workspace) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS items (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          workspace TEXT NOT NULL,
          container_id INTEGER NOT NULL,
          body TEXT NOT NULL,
          completed INTEGER NOT NULL DEFAULT 0 CHECK(completed IN (0, 1)),
          priority INTEGER NOT NULL DEFAULT 0,
          position INTEGER NOT NULL,
          due_at_ms INTEGER,
          created_at_ms INTEGER NOT NULL,
          updated_at_ms INTEGER NOT NULL,
          FOREIGN KEY(workspace, container_id)
            REFERENCES containers(workspace, id)
            ON DELETE RESTRICT
        );
"#;
