//! Value to owner lookup over the flattened table.

use std::collections::{BTreeMap, BTreeSet};

use crate::account::PropertyName;
use crate::storage::{AccountStorage, StorageResult};

/// Finds the owners holding any of `candidates` under attribute `name`.
///
/// Candidates are deduplicated and queried in chunks of at most
/// `chunk_size` values. When several owners share a value the last row
/// returned wins. Searching [`PropertyName::Email`] also matches additional
/// mail addresses, which take precedence over primary ones.
///
/// # Errors
///
/// Propagates storage failures.
pub fn search_by_value(
    storage: &dyn AccountStorage,
    chunk_size: usize,
    name: PropertyName,
    candidates: &[String],
) -> StorageResult<BTreeMap<String, String>> {
    let unique: Vec<String> = candidates
        .iter()
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut matches = search_chunked(storage, chunk_size, name, &unique)?;
    if name == PropertyName::Email {
        let secondary = search_chunked(storage, chunk_size, PropertyName::AdditionalMail, &unique)?;
        matches.extend(secondary);
    }
    tracing::debug!(
        attribute = %name,
        candidates = unique.len(),
        matches = matches.len(),
        "search by value"
    );
    Ok(matches)
}

fn search_chunked(
    storage: &dyn AccountStorage,
    chunk_size: usize,
    name: PropertyName,
    values: &[String],
) -> StorageResult<BTreeMap<String, String>> {
    let mut matches = BTreeMap::new();
    for chunk in values.chunks(chunk_size.max(1)) {
        for row in storage.search_index(name, chunk)? {
            matches.insert(row.value, row.owner);
        }
    }
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{IndexRow, SqliteAccountStorage};
    use crate::test_support::CountingStorage;

    fn row(owner: &str, name: PropertyName, value: &str) -> IndexRow {
        IndexRow {
            owner: owner.to_string(),
            name,
            value: value.to_string(),
        }
    }

    fn seeded() -> CountingStorage<SqliteAccountStorage> {
        let storage = SqliteAccountStorage::open_in_memory().unwrap();
        storage
            .replace_account(
                "alice",
                "{}",
                &[
                    row("alice", PropertyName::Email, "alice@example.com"),
                    row("alice", PropertyName::AdditionalMail, "shared@example.com"),
                    row("alice", PropertyName::Twitter, "@alice"),
                ],
            )
            .unwrap();
        storage
            .replace_account(
                "bob",
                "{}",
                &[
                    row("bob", PropertyName::Email, "shared@example.com"),
                    row("bob", PropertyName::Twitter, "@bob"),
                ],
            )
            .unwrap();
        CountingStorage::new(storage)
    }

    #[test]
    fn test_empty_candidates_issue_no_query() {
        let storage = seeded();
        let found = search_by_value(&storage, 500, PropertyName::Twitter, &[]).unwrap();
        assert!(found.is_empty());
        assert!(storage.search_sizes().is_empty());
    }

    #[test]
    fn test_chunking() {
        let storage = seeded();
        // Sorted candidates put one seeded handle in each chunk.
        let holders = [("carol", "@user0100"), ("dave", "@user0700"), ("erin", "@user1100")];
        for (owner, handle) in holders {
            storage
                .replace_account(owner, "{}", &[row(owner, PropertyName::Twitter, handle)])
                .unwrap();
        }
        let candidates: Vec<String> = (0..1200).map(|i| format!("@user{i:04}")).collect();

        let found = search_by_value(&storage, 500, PropertyName::Twitter, &candidates).unwrap();
        assert_eq!(storage.search_sizes(), vec![500, 500, 200]);
        assert_eq!(found.len(), 3);
        for (owner, handle) in holders {
            assert_eq!(found.get(handle).map(String::as_str), Some(owner));
        }
    }

    #[test]
    fn test_duplicates_are_collapsed() {
        let storage = seeded();
        let candidates = vec!["@alice".to_string(); 3];
        search_by_value(&storage, 500, PropertyName::Twitter, &candidates).unwrap();
        assert_eq!(storage.search_sizes(), vec![1]);
    }

    #[test]
    fn test_email_merges_additional_mail() {
        let storage = seeded();
        let candidates = vec![
            "alice@example.com".to_string(),
            "shared@example.com".to_string(),
        ];
        let found = search_by_value(&storage, 500, PropertyName::Email, &candidates).unwrap();
        assert_eq!(found.get("alice@example.com").map(String::as_str), Some("alice"));
        // Additional mail wins over bob's primary address.
        assert_eq!(found.get("shared@example.com").map(String::as_str), Some("alice"));
        assert_eq!(storage.search_sizes(), vec![2, 2]);
    }

    #[test]
    fn test_zero_chunk_size_is_clamped() {
        let storage = seeded();
        let candidates = vec!["@alice".to_string(), "@bob".to_string()];
        let found = search_by_value(&storage, 0, PropertyName::Twitter, &candidates).unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(storage.search_sizes(), vec![1, 1]);
    }
}
