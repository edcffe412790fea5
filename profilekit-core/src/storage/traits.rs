//! Storage executor interface for the two account tables.

use crate::account::PropertyName;

use super::error::StorageResult;

/// One row of the flattened, searchable table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRow {
    /// Owner of the property.
    pub owner: String,
    /// Attribute name.
    pub name: PropertyName,
    /// Property value.
    pub value: String,
}

/// Persistence for the blob table (one row per owner) and the flattened
/// table (one row per non-avatar property value).
pub trait AccountStorage: Send + Sync {
    /// Reads the stored blob for `owner`, if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    fn load_blob(&self, owner: &str) -> StorageResult<Option<String>>;

    /// Upserts the blob for `owner` and replaces all of its flattened rows.
    ///
    /// Implementations backed by a transactional store apply both writes
    /// atomically. Otherwise readers may observe the blob and the rows out of
    /// step until the next save.
    ///
    /// # Errors
    ///
    /// Returns an error if any write fails.
    fn replace_account(&self, owner: &str, blob: &str, rows: &[IndexRow]) -> StorageResult<()>;

    /// Removes the blob and all flattened rows of `owner`. Missing owners are
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    fn delete_account(&self, owner: &str) -> StorageResult<()>;

    /// Returns the flattened rows for attribute `name` whose value is one of
    /// `values`, in insertion order.
    ///
    /// Callers bound `values` to the executor's parameter limit.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn search_index(&self, name: PropertyName, values: &[String]) -> StorageResult<Vec<IndexRow>>;
}
