//! The yes/no quiz: session state machine, loop task and view contract.

mod events;
mod state;
mod view;
mod workflow;

pub use events::QuizCommand;
pub use state::{Advance, AnswerFeedback, GameResult, QuizPhase, QuizSession, Ticket};
pub use view::{QuizResultsVm, QuizStepVm, QuizView, format_record_date};
pub use workflow::{QuizHandle, QuizLoop};
