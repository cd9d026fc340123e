#![forbid(unsafe_code)]

pub(super) const SQL: &str = r#"

        CREATE INDEX IF NOT EXISTS idx_containers_workspace_position
          ON containers(workspace, position, id);

        CREATE INDEX IF NOT EXISTS idx_items_workspace_container
          ON items(workspace, container_id, position, id);

        CREATE INDEX IF NOT EXISTS idx_changelog_workspace_active
          ON changelog(workspace, active, id);

        CREATE INDEX IF NOT EXISTS idx_changelog_workspace_batch
          ON changelog(workspace, batch_id);
"#;
