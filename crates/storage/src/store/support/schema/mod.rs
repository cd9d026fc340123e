#![forbid(unsafe_code)]

mod sql;

use super::super::StoreError;
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::BTreeSet;

const SCHEMA_VERSION: i64 = 1;

/// Refuses databases written by an incompatible schema instead of migrating them in place.
/// A fresh (empty) database always passes.
pub(in crate::store) fn preflight_gate(conn: &Connection) -> Result<(), StoreError> {
    let present = user_tables(conn)?;
    if present.is_empty() {
        return Ok(());
    }

    if let Some(table) = present
        .iter()
        .find(|table| !sql::REQUIRED_TABLES.contains(&table.as_str()))
    {
        tracing::warn!(table = %table, "foreign table in store database");
        return Err(StoreError::InvalidInput(
            "RESET_REQUIRED: unsupported tables detected",
        ));
    }
    if let Some(table) = sql::REQUIRED_TABLES
        .iter()
        .find(|table| !present.contains(**table))
    {
        tracing::warn!(table = %table, "store table missing");
        return Err(StoreError::InvalidInput(
            "RESET_REQUIRED: required table is missing",
        ));
    }

    let stored_version: Option<i64> = conn
        .query_row(
            "SELECT schema_version FROM store_state WHERE singleton=1",
            [],
            |row| row.get(0),
        )
        .optional()?;
    match stored_version {
        Some(SCHEMA_VERSION) => Ok(()),
        Some(found) => {
            tracing::warn!(found, expected = SCHEMA_VERSION, "store schema version differs");
            Err(StoreError::InvalidInput(
                "RESET_REQUIRED: schema version mismatch",
            ))
        }
        None => Err(StoreError::InvalidInput(
            "RESET_REQUIRED: schema state row is missing",
        )),
    }
}

fn user_tables(conn: &Connection) -> Result<BTreeSet<String>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
    )?;
    let names = stmt.query_map([], |row| row.get::<_, String>(0))?;
    Ok(names.collect::<Result<BTreeSet<_>, _>>()?)
}

pub(in crate::store) fn install_schema(conn: &Connection, now_ms: i64) -> Result<(), StoreError> {
    conn.execute_batch(&sql::full_schema_sql())?;

    conn.execute(
        "INSERT INTO store_state(singleton, schema_version, created_at_ms, updated_at_ms) \
         VALUES (1, ?1, ?2, ?2) \
         ON CONFLICT(singleton) DO UPDATE SET schema_version=excluded.schema_version, updated_at_ms=excluded.updated_at_ms",
        params![SCHEMA_VERSION, now_ms],
    )?;

    Ok(())
}
