use std::fmt;
use std::sync::Arc;

use quiz_core::model::{Question, QuizSettings};

use crate::error::QuizError;

//
// ─── TICKETS ───────────────────────────────────────────────────────────────────
//

/// Identifies one outstanding request of one session run.
///
/// `generation` changes on every restart and `index` on every question, so a
/// response carrying an old ticket can be recognised and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub generation: u64,
    pub index: u32,
}

//
// ─── PHASES ────────────────────────────────────────────────────────────────────
//

/// Coarse state of a session, cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    Loading,
    AwaitingAnswer,
    ShowingResult,
    Complete,
    Failed,
}

#[derive(Clone)]
enum State {
    Loading,
    AwaitingAnswer(Question),
    ShowingResult { is_correct: bool },
    Complete,
    Failed(Arc<QuizError>),
}

impl State {
    fn phase(&self) -> QuizPhase {
        match self {
            State::Loading => QuizPhase::Loading,
            State::AwaitingAnswer(_) => QuizPhase::AwaitingAnswer,
            State::ShowingResult { .. } => QuizPhase::ShowingResult,
            State::Complete => QuizPhase::Complete,
            State::Failed(_) => QuizPhase::Failed,
        }
    }
}

//
// ─── TRANSITION RESULTS ────────────────────────────────────────────────────────
//

/// Outcome of an accepted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub is_correct: bool,
    /// Ticket to hand back through `result_elapsed` once the result has been shown.
    pub ticket: Ticket,
}

/// Final score of a completed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameResult {
    pub correct: u32,
    pub total: u32,
}

/// What follows once an answer's result has been shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Load the question for this ticket.
    NextQuestion(Ticket),
    /// The last question was answered.
    Complete,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Sequential state machine over a fixed number of questions.
///
/// ```text
/// Loading -> AwaitingAnswer -> ShowingResult -> Loading | Complete
///    \-> Failed -(retry)-> Loading          any -(restart)-> Loading
/// ```
///
/// Invariants: `question_index < total_questions` and
/// `correct_count <= question_index + 1`.
pub struct QuizSession {
    total: u32,
    index: u32,
    correct: u32,
    generation: u64,
    state: State,
    result_claimed: bool,
}

impl QuizSession {
    #[must_use]
    pub fn new(settings: &QuizSettings) -> Self {
        Self {
            total: settings.question_count(),
            index: 0,
            correct: 0,
            generation: 0,
            state: State::Loading,
            result_claimed: false,
        }
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.state.phase()
    }

    #[must_use]
    pub fn ticket(&self) -> Ticket {
        Ticket {
            generation: self.generation,
            index: self.index,
        }
    }

    #[must_use]
    pub fn question_index(&self) -> u32 {
        self.index
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.state, State::Complete)
    }

    /// Progress label such as `"3/10"`.
    #[must_use]
    pub fn progress_label(&self) -> String {
        format!("{}/{}", self.index + 1, self.total)
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        match &self.state {
            State::AwaitingAnswer(question) => Some(question),
            _ => None,
        }
    }

    /// Whether the last answer was correct, while its result is on screen.
    #[must_use]
    pub fn shown_result(&self) -> Option<bool> {
        match self.state {
            State::ShowingResult { is_correct } => Some(is_correct),
            _ => None,
        }
    }

    #[must_use]
    pub fn failure(&self) -> Option<&QuizError> {
        match &self.state {
            State::Failed(err) => Some(err.as_ref()),
            _ => None,
        }
    }

    /// Accept a loaded question. Returns `false` for stale or unexpected responses.
    pub fn question_ready(&mut self, ticket: Ticket, question: Question) -> bool {
        if !self.expects(ticket) {
            return false;
        }
        self.state = State::AwaitingAnswer(question);
        true
    }

    /// Record a failed load. Returns `false` for stale or unexpected responses.
    pub fn load_failed(&mut self, ticket: Ticket, error: QuizError) -> bool {
        if !self.expects(ticket) {
            return false;
        }
        self.state = State::Failed(Arc::new(error));
        true
    }

    /// Submit an answer for the current question.
    ///
    /// Only the first answer per question counts; anything submitted while
    /// no question is awaiting an answer returns `None`.
    pub fn answer(&mut self, answer: bool) -> Option<AnswerFeedback> {
        let State::AwaitingAnswer(question) = &self.state else {
            return None;
        };
        let is_correct = question.is_correct(answer);
        if is_correct {
            self.correct += 1;
        }
        self.state = State::ShowingResult { is_correct };
        Some(AnswerFeedback {
            is_correct,
            ticket: self.ticket(),
        })
    }

    /// Leave the result display for `ticket`.
    ///
    /// Returns `None` if the session moved on in the meantime (for example
    /// after a restart).
    pub fn result_elapsed(&mut self, ticket: Ticket) -> Option<Advance> {
        if ticket != self.ticket() || !matches!(self.state, State::ShowingResult { .. }) {
            return None;
        }
        if self.index + 1 >= self.total {
            self.state = State::Complete;
            return Some(Advance::Complete);
        }
        self.index += 1;
        self.state = State::Loading;
        Some(Advance::NextQuestion(self.ticket()))
    }

    /// Final score, handed out once per completed run.
    ///
    /// Statistics are recorded from this value, so a second call for the same
    /// run yields `None`.
    pub fn claim_result(&mut self) -> Option<GameResult> {
        if !self.is_complete() || self.result_claimed {
            return None;
        }
        self.result_claimed = true;
        Some(GameResult {
            correct: self.correct,
            total: self.total,
        })
    }

    /// Re-enter `Loading` from `Failed`, keeping index and score.
    pub fn retry(&mut self) -> Option<Ticket> {
        if !matches!(self.state, State::Failed(_)) {
            return None;
        }
        self.state = State::Loading;
        Some(self.ticket())
    }

    /// Start over from the first question. Allowed from any phase.
    pub fn restart(&mut self) -> Ticket {
        self.generation = self.generation.wrapping_add(1);
        self.index = 0;
        self.correct = 0;
        self.result_claimed = false;
        self.state = State::Loading;
        self.ticket()
    }

    fn expects(&self, ticket: Ticket) -> bool {
        matches!(self.state, State::Loading) && ticket == self.ticket()
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("phase", &self.phase())
            .field("index", &self.index)
            .field("correct", &self.correct)
            .field("total", &self.total)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> QuizSession {
        QuizSession::new(&QuizSettings::default())
    }

    fn question(correct_answer: bool) -> Question {
        Question::new(vec![1], "Is the rating of this movie greater than 8.1?", correct_answer)
    }

    fn load(session: &mut QuizSession, correct_answer: bool) {
        let ticket = session.ticket();
        assert!(session.question_ready(ticket, question(correct_answer)));
    }

    fn assert_invariants(session: &QuizSession) {
        assert!(session.question_index() < session.total_questions());
        assert!(session.correct_count() <= session.question_index() + 1);
        assert!(session.correct_count() <= session.total_questions());
    }

    #[test]
    fn starts_loading_at_first_question() {
        let s = session();
        assert_eq!(s.phase(), QuizPhase::Loading);
        assert_eq!(s.question_index(), 0);
        assert_eq!(s.correct_count(), 0);
        assert_eq!(s.progress_label(), "1/10");
        assert!(s.current_question().is_none());
    }

    #[test]
    fn wrong_answer_leaves_score_unchanged() {
        let mut s = session();
        load(&mut s, true);

        let feedback = s.answer(false).unwrap();
        assert!(!feedback.is_correct);
        assert_eq!(s.correct_count(), 0);
        assert_eq!(s.phase(), QuizPhase::ShowingResult);
        assert_eq!(s.shown_result(), Some(false));
    }

    #[test]
    fn second_answer_is_ignored() {
        let mut s = session();
        load(&mut s, true);

        assert!(s.answer(true).is_some());
        assert!(s.answer(true).is_none());
        assert_eq!(s.correct_count(), 1);
    }

    #[test]
    fn answers_are_ignored_while_loading() {
        let mut s = session();
        assert!(s.answer(true).is_none());
        assert_eq!(s.phase(), QuizPhase::Loading);
    }

    #[test]
    fn completes_after_exactly_total_answers() {
        let mut s = session();
        for i in 0..10 {
            assert_eq!(s.phase(), QuizPhase::Loading);
            load(&mut s, i % 2 == 0);
            let feedback = s.answer(true).unwrap();
            assert_invariants(&s);
            let advance = s.result_elapsed(feedback.ticket).unwrap();
            if i < 9 {
                assert!(matches!(advance, Advance::NextQuestion(_)));
                assert_invariants(&s);
            } else {
                assert_eq!(advance, Advance::Complete);
            }
        }

        assert!(s.is_complete());
        assert_eq!(s.correct_count(), 5);
        assert_eq!(
            s.claim_result(),
            Some(GameResult {
                correct: 5,
                total: 10
            })
        );
    }

    #[test]
    fn result_is_claimed_only_once() {
        let settings = QuizSettings::default().with_question_count(1).unwrap();
        let mut s = QuizSession::new(&settings);
        load(&mut s, true);
        let feedback = s.answer(true).unwrap();
        s.result_elapsed(feedback.ticket);

        assert!(s.claim_result().is_some());
        assert!(s.claim_result().is_none());
    }

    #[test]
    fn result_cannot_be_claimed_before_completion() {
        let mut s = session();
        assert!(s.claim_result().is_none());
    }

    #[test]
    fn failure_keeps_progress_and_retry_reloads_same_index() {
        let mut s = session();
        load(&mut s, true);
        let feedback = s.answer(true).unwrap();
        s.result_elapsed(feedback.ticket);

        let ticket = s.ticket();
        assert!(s.load_failed(ticket, QuizError::EmptyCatalog));
        assert_eq!(s.phase(), QuizPhase::Failed);
        assert!(matches!(s.failure(), Some(QuizError::EmptyCatalog)));
        assert!(s.answer(true).is_none());

        let retry = s.retry().unwrap();
        assert_eq!(retry, ticket);
        assert_eq!(s.phase(), QuizPhase::Loading);
        assert_eq!(s.question_index(), 1);
        assert_eq!(s.correct_count(), 1);
    }

    #[test]
    fn retry_is_only_possible_after_failure() {
        let mut s = session();
        assert!(s.retry().is_none());
    }

    #[test]
    fn restart_resets_counters_and_discards_stale_responses() {
        let mut s = session();
        load(&mut s, true);
        let feedback = s.answer(true).unwrap();
        s.result_elapsed(feedback.ticket);
        let stale = s.ticket();

        let fresh = s.restart();
        assert_eq!(s.question_index(), 0);
        assert_eq!(s.correct_count(), 0);
        assert_eq!(s.phase(), QuizPhase::Loading);
        assert_ne!(stale, fresh);

        assert!(!s.question_ready(stale, question(true)));
        assert!(!s.load_failed(stale, QuizError::EmptyCatalog));
        assert_eq!(s.phase(), QuizPhase::Loading);
        assert!(s.question_ready(fresh, question(true)));
    }

    #[test]
    fn stale_result_timer_after_restart_is_ignored() {
        let mut s = session();
        load(&mut s, true);
        let feedback = s.answer(true).unwrap();

        s.restart();
        assert!(s.result_elapsed(feedback.ticket).is_none());
        assert_eq!(s.phase(), QuizPhase::Loading);
        assert_eq!(s.question_index(), 0);
    }

    #[test]
    fn restart_from_complete_allows_a_new_claim() {
        let settings = QuizSettings::default().with_question_count(1).unwrap();
        let mut s = QuizSession::new(&settings);
        load(&mut s, false);
        let feedback = s.answer(false).unwrap();
        s.result_elapsed(feedback.ticket);
        assert!(s.claim_result().is_some());

        s.restart();
        load(&mut s, true);
        let feedback = s.answer(true).unwrap();
        s.result_elapsed(feedback.ticket);
        assert_eq!(
            s.claim_result(),
            Some(GameResult {
                correct: 1,
                total: 1
            })
        );
    }

    #[test]
    fn question_is_not_accepted_twice_for_one_ticket() {
        let mut s = session();
        let ticket = s.ticket();
        assert!(s.question_ready(ticket, question(true)));
        assert!(!s.question_ready(ticket, question(false)));
        assert!(s.current_question().unwrap().correct_answer());
    }
}
