#![forbid(unsafe_code)]

mod changelog;
mod core;
mod entities;
mod indexes;

pub(super) fn full_schema_sql() -> String {
    let mut sql = String::new();
    sql.push_str(core::SQL);
    sql.push_str(entities::SQL);
    sql.push_str(changelog::SQL);
    sql.push_str(indexes::SQL);
    sql
}

/// Tables a compatible database must contain, and nothing else.
pub(super) const REQUIRED_TABLES: &[&str] = &[
    "store_state",
    "workspaces",
    "containers",
    "items",
    "changelog",
];
