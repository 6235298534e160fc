use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use quiz_core::model::AggregateStats;
use sqlx::Row;

use super::SqliteRepository;
use crate::mapping::{decode_statistics, encode_statistics};
use crate::repository::{StatisticsKey, StatisticsRepository, StorageError};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl StatisticsRepository for SqliteRepository {
    async fn load_statistics(&self) -> Result<Option<AggregateStats>, StorageError> {
        let rows = sqlx::query("SELECT key, value FROM statistics")
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;

        let mut values = HashMap::with_capacity(rows.len());
        for row in rows {
            let key: String = row.try_get("key").map_err(ser)?;
            let value: String = row.try_get("value").map_err(ser)?;
            // Unknown keys belong to someone else; leave them alone.
            if let Some(key) = StatisticsKey::from_str_key(&key) {
                values.insert(key, value);
            }
        }

        decode_statistics(|key| values.get(&key).cloned())
    }

    async fn save_statistics(&self, stats: &AggregateStats) -> Result<(), StorageError> {
        let entries = encode_statistics(stats)?;
        let now = Utc::now();

        let mut tx = self.pool.begin().await.map_err(conn)?;
        for (key, value) in entries {
            match value {
                Some(value) => {
                    sqlx::query(
                        r"
                            INSERT INTO statistics (key, value, updated_at)
                            VALUES (?1, ?2, ?3)
                            ON CONFLICT(key) DO UPDATE SET
                                value = excluded.value,
                                updated_at = excluded.updated_at
                        ",
                    )
                    .bind(key.as_str())
                    .bind(value)
                    .bind(now)
                    .execute(&mut *tx)
                    .await
                    .map_err(conn)?;
                }
                None => {
                    sqlx::query("DELETE FROM statistics WHERE key = ?1")
                        .bind(key.as_str())
                        .execute(&mut *tx)
                        .await
                        .map_err(conn)?;
                }
            }
        }
        tx.commit().await.map_err(conn)?;

        Ok(())
    }
}
