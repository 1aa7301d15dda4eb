//! SQLite adapter for `ArtifactEntryStore`
//!
//! Optimistic concurrency is enforced in SQL: inserts rely on the primary
//! key, updates carry `WHERE version = ?expected`.

use crate::domain::{ArtifactEntry, ArtifactEntryStore, RepositoryPath};
use crate::{Result, StorageError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::collections::BTreeMap;
use std::path::Path;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS artifact_entries (
    storage_id    TEXT    NOT NULL,
    repository_id TEXT    NOT NULL,
    path          TEXT    NOT NULL,
    size_bytes    INTEGER NOT NULL,
    checksums     TEXT    NOT NULL,
    created       TEXT    NOT NULL,
    last_updated  TEXT    NOT NULL,
    version       INTEGER NOT NULL,
    PRIMARY KEY (storage_id, repository_id, path)
);
"#;

pub struct SqliteArtifactEntryStore {
    conn: Mutex<Connection>,
}

impl SqliteArtifactEntryStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_connection(Connection::open(path)?)
    }

    pub fn new_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawEntry> {
        Ok(RawEntry {
            storage_id: row.get(0)?,
            repository_id: row.get(1)?,
            path: row.get(2)?,
            size_bytes: row.get::<_, i64>(3)?,
            checksums: row.get(4)?,
            created: row.get(5)?,
            last_updated: row.get(6)?,
            version: row.get::<_, i64>(7)?,
        })
    }
}

/// Row as stored (text timestamps / JSON checksums)
struct RawEntry {
    storage_id: String,
    repository_id: String,
    path: String,
    size_bytes: i64,
    checksums: String,
    created: String,
    last_updated: String,
    version: i64,
}

impl RawEntry {
    fn into_entry(self) -> Result<ArtifactEntry> {
        let checksums: BTreeMap<String, String> = serde_json::from_str(&self.checksums)?;
        Ok(ArtifactEntry {
            storage_id: self.storage_id,
            repository_id: self.repository_id,
            path: self.path,
            size_bytes: self.size_bytes.max(0) as u64,
            checksums,
            created: parse_timestamp(&self.created)?,
            last_updated: parse_timestamp(&self.last_updated)?,
            version: self.version.max(0) as u64,
        })
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StorageError::serialization(format!("Invalid timestamp {}: {}", value, e)))
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

#[async_trait]
impl ArtifactEntryStore for SqliteArtifactEntryStore {
    async fn find(&self, path: &RepositoryPath) -> Result<Option<ArtifactEntry>> {
        let raw = {
            let conn = self.conn.lock();
            conn.query_row(
                "SELECT storage_id, repository_id, path, size_bytes, checksums, created, last_updated, version
                 FROM artifact_entries
                 WHERE storage_id = ?1 AND repository_id = ?2 AND path = ?3",
                params![path.storage_id(), path.repository_id(), path.relativize()],
                Self::row_to_entry,
            )
            .optional()?
        };
        raw.map(RawEntry::into_entry).transpose()
    }

    async fn save(&self, entry: &ArtifactEntry) -> Result<ArtifactEntry> {
        let mut saved = entry.clone();
        saved.version = entry.version + 1;
        saved.last_updated = Utc::now();

        let checksums = serde_json::to_string(&saved.checksums)?;
        let conn = self.conn.lock();

        if entry.is_new() {
            let inserted = conn.execute(
                "INSERT INTO artifact_entries
                 (storage_id, repository_id, path, size_bytes, checksums, created, last_updated, version)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    saved.storage_id,
                    saved.repository_id,
                    saved.path,
                    saved.size_bytes as i64,
                    checksums,
                    saved.created.to_rfc3339(),
                    saved.last_updated.to_rfc3339(),
                    saved.version as i64,
                ],
            );
            match inserted {
                Ok(_) => {}
                Err(e) if is_constraint_violation(&e) => {
                    return Err(StorageError::conflict(
                        entry.repository_path().lock_key(),
                        entry.version,
                    ))
                }
                Err(e) => return Err(e.into()),
            }
        } else {
            let updated = conn.execute(
                "UPDATE artifact_entries
                 SET size_bytes = ?4, checksums = ?5, last_updated = ?6, version = ?7
                 WHERE storage_id = ?1 AND repository_id = ?2 AND path = ?3 AND version = ?8",
                params![
                    saved.storage_id,
                    saved.repository_id,
                    saved.path,
                    saved.size_bytes as i64,
                    checksums,
                    saved.last_updated.to_rfc3339(),
                    saved.version as i64,
                    entry.version as i64,
                ],
            )?;
            if updated == 0 {
                return Err(StorageError::conflict(
                    entry.repository_path().lock_key(),
                    entry.version,
                ));
            }
        }

        Ok(saved)
    }

    async fn delete(&self, path: &RepositoryPath) -> Result<bool> {
        let conn = self.conn.lock();
        let deleted = conn.execute(
            "DELETE FROM artifact_entries WHERE storage_id = ?1 AND repository_id = ?2 AND path = ?3",
            params![path.storage_id(), path.repository_id(), path.relativize()],
        )?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use tempfile::TempDir;

    fn jar() -> RepositoryPath {
        RepositoryPath::new("storage0", "releases", "a/1.0/a-1.0.jar")
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = SqliteArtifactEntryStore::new_in_memory().unwrap();
        let mut entry = ArtifactEntry::new(&jar());
        entry.size_bytes = 42;
        entry.checksums.insert("sha1".into(), "abc".into());

        let saved = store.save(&entry).await.unwrap();
        assert_eq!(saved.version, 1);

        let found = store.find(&jar()).await.unwrap().unwrap();
        assert_eq!(found.size_bytes, 42);
        assert_eq!(found.checksums.get("sha1").map(String::as_str), Some("abc"));
        assert_eq!(found.version, 1);
    }

    #[tokio::test]
    async fn test_duplicate_insert_is_conflict() {
        let store = SqliteArtifactEntryStore::new_in_memory().unwrap();
        let entry = ArtifactEntry::new(&jar());
        store.save(&entry).await.unwrap();

        let err = store.save(&entry).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_stale_update_is_conflict() {
        let store = SqliteArtifactEntryStore::new_in_memory().unwrap();
        store.save(&ArtifactEntry::new(&jar())).await.unwrap();

        let first = store.find(&jar()).await.unwrap().unwrap();
        let second = first.clone();

        store.save(&first).await.unwrap();
        let err = store.save(&second).await.unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(store.find(&jar()).await.unwrap().unwrap().version, 2);
    }

    #[tokio::test]
    async fn test_delete_and_reopen() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("entries.db");

        {
            let store = SqliteArtifactEntryStore::open(&db).unwrap();
            store.save(&ArtifactEntry::new(&jar())).await.unwrap();
        }

        let store = SqliteArtifactEntryStore::open(&db).unwrap();
        assert!(store.find(&jar()).await.unwrap().is_some());
        assert!(store.delete(&jar()).await.unwrap());
        assert!(!store.delete(&jar()).await.unwrap());
    }
}
