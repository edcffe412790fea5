//! Account persistence: the storage executor seam and its `SQLite` implementation.

pub mod error;
mod sqlite;
pub mod traits;

pub use error::{StorageError, StorageResult};
pub use sqlite::SqliteAccountStorage;
pub use traits::{AccountStorage, IndexRow};
