use chrono::{DateTime, Utc};
use quiz_core::model::{AggregateStats, Question};

use super::state::GameResult;

/// The presentation side of the quiz.
///
/// Implemented by the UI layer; the quiz loop calls it from its own task and
/// never holds any other reference into the UI.
pub trait QuizView: Send + Sync {
    fn render_question(&self, step: QuizStepVm);
    fn render_answer_feedback(&self, is_correct: bool);
    fn render_summary(&self, results: QuizResultsVm);
    fn render_loading(&self, is_loading: bool);
    fn render_error(&self, message: &str);
}

/// One question as the UI shows it.
#[derive(Clone, PartialEq, Eq)]
pub struct QuizStepVm {
    pub image: Vec<u8>,
    pub question: String,
    /// `"{current}/{total}"`, one-based.
    pub question_number: String,
}

impl QuizStepVm {
    #[must_use]
    pub fn from_question(question: &Question, index: u32, total: u32) -> Self {
        Self {
            image: question.image().to_vec(),
            question: question.text().to_owned(),
            question_number: format!("{}/{}", index + 1, total),
        }
    }
}

impl std::fmt::Debug for QuizStepVm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizStepVm")
            .field("image_len", &self.image.len())
            .field("question", &self.question)
            .field("question_number", &self.question_number)
            .finish()
    }
}

/// End-of-round dialog contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResultsVm {
    pub title: String,
    pub text: String,
    pub button_text: String,
}

impl QuizResultsVm {
    #[must_use]
    pub fn compose(result: GameResult, stats: &AggregateStats) -> Self {
        let record = stats.best_game().map_or_else(
            || "Record: none".to_string(),
            |best| {
                format!(
                    "Record: {}/{} ({})",
                    best.correct(),
                    best.total(),
                    format_record_date(best.date())
                )
            },
        );

        let text = [
            format!("Your result: {}/{}", result.correct, result.total),
            format!("Quizzes played: {}", stats.games_count()),
            record,
            format!("Average accuracy: {:.2}%", stats.total_accuracy()),
        ]
        .join("\n");

        Self {
            title: "This round is over!".into(),
            text,
            button_text: "Play again".into(),
        }
    }
}

#[must_use]
pub fn format_record_date(value: DateTime<Utc>) -> String {
    value.format("%d.%m.%y %H:%M").to_string()
}
