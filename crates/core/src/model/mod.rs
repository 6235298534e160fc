mod game_record;
mod movie;
mod question;
mod settings;
mod stats;

pub use game_record::{GameRecord, GameRecordError};
pub use movie::Movie;
pub use question::{Comparison, Question, QuestionDraw};
pub use settings::{QuizSettings, SettingsError, ThresholdBand};
pub use stats::AggregateStats;
