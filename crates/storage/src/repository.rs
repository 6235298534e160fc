use async_trait::async_trait;
use quiz_core::model::AggregateStats;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::mapping::{decode_statistics, encode_statistics};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Keys of the statistics key/value layout.
///
/// Counters are stored as decimal integers and the best game as JSON, so the
/// same layout works for any string-valued store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatisticsKey {
    TotalCorrectAnswers,
    TotalQuestions,
    GamesCount,
    BestGame,
}

impl StatisticsKey {
    pub const ALL: [StatisticsKey; 4] = [
        StatisticsKey::TotalCorrectAnswers,
        StatisticsKey::TotalQuestions,
        StatisticsKey::GamesCount,
        StatisticsKey::BestGame,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StatisticsKey::TotalCorrectAnswers => "totalCorrectAnswers",
            StatisticsKey::TotalQuestions => "totalQuestions",
            StatisticsKey::GamesCount => "gamesCount",
            StatisticsKey::BestGame => "bestGame",
        }
    }

    #[must_use]
    pub fn from_str_key(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == raw)
    }
}

impl fmt::Display for StatisticsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Repository contract for cross-session quiz statistics.
#[async_trait]
pub trait StatisticsRepository: Send + Sync {
    /// Load persisted statistics.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store is unreachable or a value is malformed.
    async fn load_statistics(&self) -> Result<Option<AggregateStats>, StorageError>;

    /// Replace the persisted statistics.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the statistics cannot be stored.
    async fn save_statistics(&self, stats: &AggregateStats) -> Result<(), StorageError>;
}

/// In-memory key/value store, for tests and for running without a database.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    values: Arc<Mutex<HashMap<StatisticsKey, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored value for `key`, as another key/value backend would hold it.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn raw_value(&self, key: StatisticsKey) -> Result<Option<String>, StorageError> {
        let guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&key).cloned())
    }

    /// Overwrite a raw value, bypassing encoding.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn set_raw_value(
        &self,
        key: StatisticsKey,
        value: impl Into<String>,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key, value.into());
        Ok(())
    }
}

#[async_trait]
impl StatisticsRepository for InMemoryRepository {
    async fn load_statistics(&self) -> Result<Option<AggregateStats>, StorageError> {
        let guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        decode_statistics(|key| guard.get(&key).cloned())
    }

    async fn save_statistics(&self, stats: &AggregateStats) -> Result<(), StorageError> {
        let entries = encode_statistics(stats)?;
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        for (key, value) in entries {
            match value {
                Some(value) => {
                    guard.insert(key, value);
                }
                None => {
                    guard.remove(&key);
                }
            }
        }
        Ok(())
    }
}

/// Repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub statistics: Arc<dyn StatisticsRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let statistics: Arc<dyn StatisticsRepository> = Arc::new(InMemoryRepository::new());
        Self { statistics }
    }
}
