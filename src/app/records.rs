use async_trait::async_trait;
use sqlx::Row;
use thiserror::Error;

use crate::domain::media::MediaRecord;
use crate::infra::db::Db;

#[derive(Debug, Error)]
pub enum RecordStoreError {
    #[error("a record with key {0} already exists")]
    DuplicateKey(String),
    #[error("record store query failed: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence for `{key, timestamp, url}` rows.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Inserts one record. An existing row with the same key is left untouched
    /// and `DuplicateKey` is returned.
    async fn insert(&self, record: &MediaRecord) -> Result<(), RecordStoreError>;

    /// Every record, newest first.
    async fn list_all(&self) -> Result<Vec<MediaRecord>, RecordStoreError>;

    async fn find_by_key(&self, key: &str) -> Result<Option<MediaRecord>, RecordStoreError>;

    /// Removes every record whose key is in `keys` and returns how many rows
    /// went away. Unknown keys are ignored.
    async fn delete_many(&self, keys: &[String]) -> Result<u64, RecordStoreError>;
}

#[derive(Clone)]
pub struct PgRecordStore {
    db: Db,
}

impl PgRecordStore {
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn insert(&self, record: &MediaRecord) -> Result<(), RecordStoreError> {
        let result = sqlx::query(
            "INSERT INTO media (key, \"timestamp\", url) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (key) DO NOTHING",
        )
        .bind(&record.key)
        .bind(record.timestamp)
        .bind(&record.url)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(RecordStoreError::DuplicateKey(record.key.clone()));
        }

        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<MediaRecord>, RecordStoreError> {
        let rows = sqlx::query(
            "SELECT key, \"timestamp\", url FROM media \
             ORDER BY \"timestamp\" DESC, key DESC",
        )
        .fetch_all(self.db.pool())
        .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            records.push(MediaRecord {
                key: row.get("key"),
                timestamp: row.get("timestamp"),
                url: row.get("url"),
            });
        }

        Ok(records)
    }

    async fn find_by_key(&self, key: &str) -> Result<Option<MediaRecord>, RecordStoreError> {
        let row = sqlx::query("SELECT key, \"timestamp\", url FROM media WHERE key = $1")
            .bind(key)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.map(|row| MediaRecord {
            key: row.get("key"),
            timestamp: row.get("timestamp"),
            url: row.get("url"),
        }))
    }

    async fn delete_many(&self, keys: &[String]) -> Result<u64, RecordStoreError> {
        let result = sqlx::query("DELETE FROM media WHERE key = ANY($1)")
            .bind(keys)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected())
    }
}
