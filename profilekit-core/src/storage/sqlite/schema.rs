use rusqlite::{Connection, OptionalExtension};

use crate::storage::error::{StorageError, StorageResult};

use super::helpers::map_db_err;

pub(super) const PROFILE_SCHEMA_VERSION: i64 = 1;

pub(super) fn ensure_schema(conn: &Connection) -> StorageResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS profile_meta (
            schema_version  INTEGER NOT NULL,
            created_at      INTEGER NOT NULL
        );",
    )
    .map_err(|err| map_db_err(&err))?;

    let existing: Option<i64> = conn
        .query_row(
            "SELECT schema_version FROM profile_meta LIMIT 1;",
            [],
            |row| row.get(0),
        )
        .optional()
        .map_err(|err| map_db_err(&err))?;

    match existing {
        Some(version) if version == PROFILE_SCHEMA_VERSION => ensure_tables(conn),
        Some(version) => Err(StorageError::UnsupportedSchemaVersion(version)),
        None => {
            ensure_tables(conn)?;
            insert_meta(conn)
        }
    }
}

fn ensure_tables(conn: &Connection) -> StorageResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS accounts (
            owner   TEXT    NOT NULL PRIMARY KEY,
            data    TEXT    NOT NULL
        );

        CREATE TABLE IF NOT EXISTS accounts_data (
            id      INTEGER PRIMARY KEY AUTOINCREMENT,
            owner   TEXT    NOT NULL,
            name    TEXT    NOT NULL,
            value   TEXT    NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_accounts_data_owner
        ON accounts_data (owner);

        CREATE INDEX IF NOT EXISTS idx_accounts_data_name_value
        ON accounts_data (name, value);",
    )
    .map_err(|err| map_db_err(&err))?;
    Ok(())
}

fn insert_meta(conn: &Connection) -> StorageResult<()> {
    conn.execute(
        "INSERT INTO profile_meta (schema_version, created_at)
         VALUES (?1, strftime('%s','now'))",
        [PROFILE_SCHEMA_VERSION],
    )
    .map_err(|err| map_db_err(&err))?;
    Ok(())
}
