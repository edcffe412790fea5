//! `SQLite` account database.

mod helpers;
mod schema;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use crate::account::PropertyName;

use super::error::{StorageError, StorageResult};
use super::traits::{AccountStorage, IndexRow};
use helpers::{in_placeholders, map_db_err, map_index_row};
use schema::ensure_schema;

/// Account storage backed by a single `SQLite` connection.
#[derive(Debug)]
pub struct SqliteAccountStorage {
    conn: Mutex<Connection>,
}

impl SqliteAccountStorage {
    /// Opens or creates the account database at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized, or
    /// if it was written by an unsupported schema version.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path).map_err(|err| map_db_err(&err))?;
        Self::from_connection(conn)
    }

    /// Opens a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created.
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory().map_err(|err| map_db_err(&err))?;
        Self::from_connection(conn)
    }

    /// Wraps an existing connection, creating the schema if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created or validated.
    pub fn from_connection(conn: Connection) -> StorageResult<Self> {
        ensure_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StorageError::Lock("connection mutex poisoned".to_string()))
    }
}

impl AccountStorage for SqliteAccountStorage {
    fn load_blob(&self, owner: &str) -> StorageResult<Option<String>> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT data FROM accounts WHERE owner = ?1",
            params![owner],
            |row| row.get(0),
        )
        .optional()
        .map_err(|err| map_db_err(&err))
    }

    fn replace_account(&self, owner: &str, blob: &str, rows: &[IndexRow]) -> StorageResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(|err| map_db_err(&err))?;
        tx.execute(
            "INSERT INTO accounts (owner, data) VALUES (?1, ?2)
             ON CONFLICT(owner) DO UPDATE SET data = excluded.data",
            params![owner, blob],
        )
        .map_err(|err| map_db_err(&err))?;
        tx.execute(
            "DELETE FROM accounts_data WHERE owner = ?1",
            params![owner],
        )
        .map_err(|err| map_db_err(&err))?;
        {
            let mut stmt = tx
                .prepare_cached(
                    "INSERT INTO accounts_data (owner, name, value) VALUES (?1, ?2, ?3)",
                )
                .map_err(|err| map_db_err(&err))?;
            for row in rows {
                stmt.execute(params![owner, row.name.as_str(), row.value])
                    .map_err(|err| map_db_err(&err))?;
            }
        }
        tx.commit().map_err(|err| map_db_err(&err))?;
        tracing::trace!(owner, rows = rows.len(), "account rows replaced");
        Ok(())
    }

    fn delete_account(&self, owner: &str) -> StorageResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(|err| map_db_err(&err))?;
        tx.execute("DELETE FROM accounts WHERE owner = ?1", params![owner])
            .map_err(|err| map_db_err(&err))?;
        tx.execute(
            "DELETE FROM accounts_data WHERE owner = ?1",
            params![owner],
        )
        .map_err(|err| map_db_err(&err))?;
        tx.commit().map_err(|err| map_db_err(&err))?;
        Ok(())
    }

    fn search_index(&self, name: PropertyName, values: &[String]) -> StorageResult<Vec<IndexRow>> {
        if values.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT owner, name, value FROM accounts_data
             WHERE name = ?1 AND value IN ({})
             ORDER BY id ASC",
            in_placeholders(values.len())
        );
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql).map_err(|err| map_db_err(&err))?;
        let bound = std::iter::once(name.as_str()).chain(values.iter().map(String::as_str));
        let rows = stmt
            .query_map(params_from_iter(bound), map_index_row)
            .map_err(|err| map_db_err(&err))?;
        let mut found = Vec::new();
        for row in rows {
            if let Some(row) = row.map_err(|err| map_db_err(&err))? {
                found.push(row);
            }
        }
        Ok(found)
    }
}
