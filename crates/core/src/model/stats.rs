use crate::model::GameRecord;

/// Cross-session counters plus the best game seen so far.
///
/// Counters only grow; nothing in the quiz resets them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateStats {
    total_correct_answers: u64,
    total_questions: u64,
    games_count: u64,
    best_game: Option<GameRecord>,
}

impl AggregateStats {
    /// Rehydrate statistics from persisted storage.
    #[must_use]
    pub fn from_persisted(
        total_correct_answers: u64,
        total_questions: u64,
        games_count: u64,
        best_game: Option<GameRecord>,
    ) -> Self {
        Self {
            total_correct_answers,
            total_questions,
            games_count,
            best_game,
        }
    }

    #[must_use]
    pub fn total_correct_answers(&self) -> u64 {
        self.total_correct_answers
    }

    #[must_use]
    pub fn total_questions(&self) -> u64 {
        self.total_questions
    }

    #[must_use]
    pub fn games_count(&self) -> u64 {
        self.games_count
    }

    #[must_use]
    pub fn best_game(&self) -> Option<&GameRecord> {
        self.best_game.as_ref()
    }

    /// Overall share of correct answers in percent.
    ///
    /// Defined as `0.0` before any question has been answered.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn total_accuracy(&self) -> f64 {
        if self.total_questions == 0 {
            return 0.0;
        }
        self.total_correct_answers as f64 / self.total_questions as f64 * 100.0
    }

    /// Fold a finished game into the statistics.
    ///
    /// The best game is replaced first (see [`GameRecord::is_better_than`]),
    /// then the counters are incremented unconditionally.
    pub fn record(&mut self, game: GameRecord) {
        let replace = self
            .best_game
            .as_ref()
            .is_none_or(|best| game.is_better_than(best));
        if replace {
            self.best_game = Some(game);
        }

        self.total_correct_answers = self
            .total_correct_answers
            .saturating_add(u64::from(game.correct()));
        self.total_questions = self
            .total_questions
            .saturating_add(u64::from(game.total()));
        self.games_count = self.games_count.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_clock;
    use chrono::Duration;

    #[test]
    fn empty_stats_have_zero_accuracy_and_no_best() {
        let stats = AggregateStats::default();
        assert_eq!(stats.total_accuracy(), 0.0);
        assert!(stats.best_game().is_none());
    }

    #[test]
    fn first_game_becomes_best_and_counts() {
        let mut stats = AggregateStats::default();
        let game = GameRecord::new(6, 10, fixed_clock().now()).unwrap();
        stats.record(game);

        assert_eq!(stats.best_game(), Some(&game));
        assert_eq!(stats.total_correct_answers(), 6);
        assert_eq!(stats.total_questions(), 10);
        assert_eq!(stats.games_count(), 1);
        assert!((stats.total_accuracy() - 60.0).abs() < 1e-9);
    }

    #[test]
    fn worse_game_keeps_best_but_still_accumulates() {
        let mut stats = AggregateStats::default();
        let best = GameRecord::new(9, 10, fixed_clock().now()).unwrap();
        stats.record(best);
        stats.record(GameRecord::new(3, 10, fixed_clock().now()).unwrap());

        assert_eq!(stats.best_game(), Some(&best));
        assert_eq!(stats.total_correct_answers(), 12);
        assert_eq!(stats.total_questions(), 20);
        assert_eq!(stats.games_count(), 2);
    }

    #[test]
    fn tied_game_replaces_best_with_latest() {
        let mut clock = fixed_clock();
        let mut stats = AggregateStats::default();
        stats.record(GameRecord::new(7, 10, clock.now()).unwrap());
        clock.advance(Duration::hours(1));
        let latest = GameRecord::new(7, 10, clock.now()).unwrap();
        stats.record(latest);

        assert_eq!(stats.best_game().map(GameRecord::date), Some(latest.date()));
    }

    #[test]
    fn ten_perfect_games() {
        let mut clock = fixed_clock();
        let mut stats = AggregateStats::default();
        let mut last = None;
        for _ in 0..10 {
            let game = GameRecord::new(10, 10, clock.now()).unwrap();
            stats.record(game);
            last = Some(game);
            clock.advance(Duration::minutes(3));
        }

        assert_eq!(stats.games_count(), 10);
        assert!((stats.total_accuracy() - 100.0).abs() < 1e-9);
        assert_eq!(stats.best_game().copied(), last);
    }
}
