use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameRecordError {
    #[error("correct answers ({correct}) exceed total questions ({total})")]
    CorrectExceedsTotal { correct: u32, total: u32 },
}

/// Score of one finished quiz, as kept for the best-game record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGameRecord")]
pub struct GameRecord {
    correct: u32,
    total: u32,
    date: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawGameRecord {
    correct: u32,
    total: u32,
    date: DateTime<Utc>,
}

impl TryFrom<RawGameRecord> for GameRecord {
    type Error = GameRecordError;

    fn try_from(raw: RawGameRecord) -> Result<Self, Self::Error> {
        Self::new(raw.correct, raw.total, raw.date)
    }
}

impl GameRecord {
    /// # Errors
    ///
    /// Returns `GameRecordError::CorrectExceedsTotal` if `correct > total`.
    pub fn new(correct: u32, total: u32, date: DateTime<Utc>) -> Result<Self, GameRecordError> {
        if correct > total {
            return Err(GameRecordError::CorrectExceedsTotal { correct, total });
        }
        Ok(Self {
            correct,
            total,
            date,
        })
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Share of correct answers in percent; `0.0` for an empty game.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.correct) / f64::from(self.total) * 100.0
    }

    /// Whether this record should replace `other` as the best game.
    ///
    /// More correct answers always win. On equal correct answers the record
    /// with greater or equal accuracy wins, so the most recent of two
    /// identical scores replaces the older one.
    #[must_use]
    pub fn is_better_than(&self, other: &GameRecord) -> bool {
        if self.correct != other.correct {
            return self.correct > other.correct;
        }
        // c1 / t1 >= c2 / t2, compared without floating point.
        u64::from(self.correct) * u64::from(other.total)
            >= u64::from(other.correct) * u64::from(self.total)
    }
}
