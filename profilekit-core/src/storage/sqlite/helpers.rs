use rusqlite::Row;

use crate::account::PropertyName;
use crate::storage::error::StorageError;
use crate::storage::traits::IndexRow;

pub(super) fn map_db_err(err: &rusqlite::Error) -> StorageError {
    StorageError::Db(err.to_string())
}

/// Maps an `(owner, name, value)` row. Rows with unknown names yield `None`.
pub(super) fn map_index_row(row: &Row<'_>) -> rusqlite::Result<Option<IndexRow>> {
    let owner: String = row.get(0)?;
    let name: String = row.get(1)?;
    let value: String = row.get(2)?;
    Ok(name
        .parse::<PropertyName>()
        .ok()
        .map(|name| IndexRow { owner, name, value }))
}

/// Builds `?2, ?3, ...` placeholders for `count` values after the name parameter.
pub(super) fn in_placeholders(count: usize) -> String {
    (0..count)
        .map(|index| format!("?{}", index + 2))
        .collect::<Vec<_>>()
        .join(", ")
}
