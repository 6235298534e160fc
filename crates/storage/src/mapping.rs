use quiz_core::model::{AggregateStats, GameRecord};

use crate::repository::{StatisticsKey, StorageError};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn parse_counter(key: StatisticsKey, raw: &str) -> Result<u64, StorageError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| StorageError::Serialization(format!("invalid {key}: {raw}")))
}

/// Key/value pairs for `stats`. `None` means the key should be removed.
pub(crate) fn encode_statistics(
    stats: &AggregateStats,
) -> Result<Vec<(StatisticsKey, Option<String>)>, StorageError> {
    let best_game = stats
        .best_game()
        .map(serde_json::to_string)
        .transpose()
        .map_err(ser)?;

    Ok(vec![
        (
            StatisticsKey::TotalCorrectAnswers,
            Some(stats.total_correct_answers().to_string()),
        ),
        (
            StatisticsKey::TotalQuestions,
            Some(stats.total_questions().to_string()),
        ),
        (
            StatisticsKey::GamesCount,
            Some(stats.games_count().to_string()),
        ),
        (StatisticsKey::BestGame, best_game),
    ])
}

/// Rebuild statistics from a key lookup.
///
/// Returns `None` when no key is present at all. Individual missing counters
/// read as zero and a missing best game as "no record yet".
pub(crate) fn decode_statistics(
    lookup: impl Fn(StatisticsKey) -> Option<String>,
) -> Result<Option<AggregateStats>, StorageError> {
    let values: Vec<(StatisticsKey, Option<String>)> = StatisticsKey::ALL
        .into_iter()
        .map(|key| (key, lookup(key)))
        .collect();
    if values.iter().all(|(_, value)| value.is_none()) {
        return Ok(None);
    }

    let counter = |key: StatisticsKey| -> Result<u64, StorageError> {
        values
            .iter()
            .find(|(k, _)| *k == key)
            .and_then(|(_, value)| value.as_deref())
            .map_or(Ok(0), |raw| parse_counter(key, raw))
    };

    let total_correct_answers = counter(StatisticsKey::TotalCorrectAnswers)?;
    let total_questions = counter(StatisticsKey::TotalQuestions)?;
    let games_count = counter(StatisticsKey::GamesCount)?;
    let best_game = values
        .iter()
        .find(|(k, _)| *k == StatisticsKey::BestGame)
        .and_then(|(_, value)| value.as_deref())
        .map(serde_json::from_str::<GameRecord>)
        .transpose()
        .map_err(ser)?;

    Ok(Some(AggregateStats::from_persisted(
        total_correct_answers,
        total_questions,
        games_count,
        best_game,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn missing_counters_read_as_zero() {
        let mut map = HashMap::new();
        map.insert(StatisticsKey::GamesCount, "3".to_string());

        let stats = decode_statistics(|key| map.get(&key).cloned())
            .unwrap()
            .unwrap();
        assert_eq!(stats.games_count(), 3);
        assert_eq!(stats.total_questions(), 0);
        assert!(stats.best_game().is_none());
    }

    #[test]
    fn corrupt_best_game_is_rejected() {
        let mut map = HashMap::new();
        map.insert(StatisticsKey::BestGame, "{not json".to_string());

        let err = decode_statistics(|key| map.get(&key).cloned()).unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[test]
    fn stats_without_best_game_encode_a_removal() {
        let entries = encode_statistics(&AggregateStats::default()).unwrap();
        let best = entries
            .iter()
            .find(|(key, _)| *key == StatisticsKey::BestGame)
            .unwrap();
        assert!(best.1.is_none());
    }
}
