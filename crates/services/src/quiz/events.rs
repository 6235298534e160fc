//! Messages flowing into the quiz loop.

use quiz_core::model::{Movie, Question};

use crate::error::{CatalogError, QuestionError};
use super::state::Ticket;

/// Player input, sent through a `QuizHandle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizCommand {
    Answer(bool),
    Retry,
    Restart,
}

/// Completions of background work, delivered back to the loop task.
#[derive(Debug)]
pub(crate) enum QuizEvent {
    /// The catalog does not depend on a session run, so it carries no ticket.
    CatalogLoaded(Result<Vec<Movie>, CatalogError>),
    QuestionReady {
        ticket: Ticket,
        result: Result<Question, QuestionError>,
    },
    ResultElapsed {
        ticket: Ticket,
    },
}
