use std::sync::Arc;

use quiz_core::model::{AggregateStats, GameRecord};
use storage::repository::StatisticsRepository;
use tracing::{info, warn};

use crate::Clock;
use crate::error::{QuizError, StatisticsServiceError};

/// Result of folding one finished game into the statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedGame {
    pub game: GameRecord,
    pub stats: AggregateStats,
    /// Whether the updated statistics reached the repository.
    pub persisted: bool,
}

/// Applies the best-game policy and keeps cumulative counters.
///
/// Storage failures never interrupt a game: they are logged and the caller
/// still receives the in-memory result.
#[derive(Clone)]
pub struct StatisticsService {
    clock: Clock,
    repo: Arc<dyn StatisticsRepository>,
}

impl StatisticsService {
    #[must_use]
    pub fn new(clock: Clock, repo: Arc<dyn StatisticsRepository>) -> Self {
        Self { clock, repo }
    }

    /// Load persisted statistics, or empty statistics if none exist.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Persistence` on storage failures.
    pub async fn load(&self) -> Result<AggregateStats, QuizError> {
        Ok(self.repo.load_statistics().await?.unwrap_or_default())
    }

    /// Like [`load`](Self::load), but logs failures and falls back to empty
    /// statistics.
    pub async fn load_or_default(&self) -> AggregateStats {
        match self.load().await {
            Ok(stats) => stats,
            Err(err) => {
                warn!(error = %err, "failed to load statistics, using defaults");
                AggregateStats::default()
            }
        }
    }

    /// Record a completed game.
    ///
    /// When the stored statistics cannot be read, the game is applied to
    /// empty statistics and nothing is written back, so stored totals are
    /// never overwritten with partial data. Save failures are logged.
    ///
    /// # Errors
    ///
    /// Returns `StatisticsServiceError::Record` if `correct > total`.
    pub async fn record_game(
        &self,
        correct: u32,
        total: u32,
    ) -> Result<RecordedGame, StatisticsServiceError> {
        let game = GameRecord::new(correct, total, self.clock.now())?;

        let (mut stats, loaded) = match self.load().await {
            Ok(stats) => (stats, true),
            Err(err) => {
                warn!(error = %err, "failed to load statistics before recording a game");
                (AggregateStats::default(), false)
            }
        };
        stats.record(game);

        let persisted = if loaded {
            match self.repo.save_statistics(&stats).await {
                Ok(()) => true,
                Err(err) => {
                    warn!(error = %err, "failed to save statistics");
                    false
                }
            }
        } else {
            false
        };

        info!(
            correct,
            total,
            games = stats.games_count(),
            persisted,
            "game recorded"
        );

        Ok(RecordedGame {
            game,
            stats,
            persisted,
        })
    }
}
