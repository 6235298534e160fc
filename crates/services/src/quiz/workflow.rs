use std::sync::Arc;

use quiz_core::model::{Movie, QuizSettings};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::events::{QuizCommand, QuizEvent};
use super::state::{Advance, QuizPhase, QuizSession, Ticket};
use super::view::{QuizResultsVm, QuizStepVm, QuizView};
use crate::catalog::MoviesLoading;
use crate::error::{CatalogError, QuizError, QuizLoopClosed};
use crate::question_factory::QuestionFactory;
use crate::statistics_service::StatisticsService;

//
// ─── HANDLE ────────────────────────────────────────────────────────────────────
//

/// Player-side handle to a running quiz loop.
///
/// Sending never blocks, so it is safe to call from a UI thread. The loop
/// stops once every handle has been dropped.
#[derive(Clone, Debug)]
pub struct QuizHandle {
    commands: mpsc::UnboundedSender<QuizCommand>,
}

impl QuizHandle {
    /// # Errors
    ///
    /// Returns `QuizLoopClosed` if the loop has stopped.
    pub fn answer(&self, answer: bool) -> Result<(), QuizLoopClosed> {
        self.send(QuizCommand::Answer(answer))
    }

    /// # Errors
    ///
    /// Returns `QuizLoopClosed` if the loop has stopped.
    pub fn answer_yes(&self) -> Result<(), QuizLoopClosed> {
        self.answer(true)
    }

    /// # Errors
    ///
    /// Returns `QuizLoopClosed` if the loop has stopped.
    pub fn answer_no(&self) -> Result<(), QuizLoopClosed> {
        self.answer(false)
    }

    /// Retry after an error was shown.
    ///
    /// # Errors
    ///
    /// Returns `QuizLoopClosed` if the loop has stopped.
    pub fn retry(&self) -> Result<(), QuizLoopClosed> {
        self.send(QuizCommand::Retry)
    }

    /// Start a new round, typically from the summary dialog.
    ///
    /// # Errors
    ///
    /// Returns `QuizLoopClosed` if the loop has stopped.
    pub fn restart(&self) -> Result<(), QuizLoopClosed> {
        self.send(QuizCommand::Restart)
    }

    fn send(&self, command: QuizCommand) -> Result<(), QuizLoopClosed> {
        self.commands.send(command).map_err(|_| QuizLoopClosed)
    }
}

//
// ─── LOOP ──────────────────────────────────────────────────────────────────────
//

/// Owns a `QuizSession` and drives it from player commands and background
/// completions.
///
/// All session mutation and all `QuizView` calls happen on the loop task.
/// Catalog loads, poster downloads and the result delay run on spawned tasks
/// that report back through an internal channel.
pub struct QuizLoop {
    settings: QuizSettings,
    movies: Arc<dyn MoviesLoading>,
    questions: QuestionFactory,
    statistics: StatisticsService,
    view: Arc<dyn QuizView>,
    session: QuizSession,
    catalog: Option<Arc<[Movie]>>,
    catalog_in_flight: bool,
    events: mpsc::UnboundedSender<QuizEvent>,
}

impl QuizLoop {
    /// Start a loop on the current tokio runtime.
    ///
    /// The first catalog load begins immediately.
    #[must_use]
    pub fn spawn(
        settings: QuizSettings,
        movies: Arc<dyn MoviesLoading>,
        questions: QuestionFactory,
        statistics: StatisticsService,
        view: Arc<dyn QuizView>,
    ) -> (QuizHandle, JoinHandle<()>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let quiz = Self {
            settings,
            movies,
            questions: questions.with_threshold_band(settings.threshold_band()),
            statistics,
            view,
            session: QuizSession::new(&settings),
            catalog: None,
            catalog_in_flight: false,
            events: event_tx,
        };
        let task = tokio::spawn(quiz.run(command_rx, event_rx));

        (
            QuizHandle {
                commands: command_tx,
            },
            task,
        )
    }

    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<QuizCommand>,
        mut events: mpsc::UnboundedReceiver<QuizEvent>,
    ) {
        self.view.render_loading(true);
        self.load_catalog();

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                Some(event) = events.recv() => self.handle_event(event).await,
            }
        }

        debug!("quiz loop stopped");
    }

    fn handle_command(&mut self, command: QuizCommand) {
        match command {
            QuizCommand::Answer(answer) => {
                let Some(feedback) = self.session.answer(answer) else {
                    debug!(phase = ?self.session.phase(), "answer ignored");
                    return;
                };
                self.view.render_answer_feedback(feedback.is_correct);
                self.schedule_result_elapsed(feedback.ticket);
            }
            QuizCommand::Retry => {
                let Some(ticket) = self.session.retry() else {
                    debug!(phase = ?self.session.phase(), "retry ignored");
                    return;
                };
                self.begin_loading(ticket);
            }
            QuizCommand::Restart => {
                let ticket = self.session.restart();
                info!(generation = ticket.generation, "quiz restarted");
                self.begin_loading(ticket);
            }
        }
    }

    async fn handle_event(&mut self, event: QuizEvent) {
        match event {
            QuizEvent::CatalogLoaded(result) => self.on_catalog_loaded(result),
            QuizEvent::QuestionReady { ticket, result } => {
                let accepted = match result {
                    Ok(question) => {
                        let step = QuizStepVm::from_question(
                            &question,
                            ticket.index,
                            self.session.total_questions(),
                        );
                        let accepted = self.session.question_ready(ticket, question);
                        if accepted {
                            self.view.render_loading(false);
                            self.view.render_question(step);
                        }
                        accepted
                    }
                    Err(err) => self.fail(ticket, err.into()),
                };
                if !accepted {
                    debug!(?ticket, current = ?self.session.ticket(), "stale question discarded");
                }
            }
            QuizEvent::ResultElapsed { ticket } => match self.session.result_elapsed(ticket) {
                Some(Advance::NextQuestion(next)) => self.begin_loading(next),
                Some(Advance::Complete) => self.finish().await,
                None => debug!(?ticket, "stale result timer discarded"),
            },
        }
    }

    fn on_catalog_loaded(&mut self, result: Result<Vec<Movie>, CatalogError>) {
        self.catalog_in_flight = false;
        let ticket = self.session.ticket();

        match result {
            Ok(movies) if movies.is_empty() => {
                warn!("movie catalog is empty");
                self.fail(ticket, QuizError::EmptyCatalog);
            }
            Ok(movies) => {
                info!(count = movies.len(), "movie catalog ready");
                self.catalog = Some(movies.into());
                if self.session.phase() == QuizPhase::Loading {
                    self.request_question(ticket);
                }
            }
            Err(err) => {
                warn!(error = %err, "movie catalog failed to load");
                self.fail(ticket, err.into());
            }
        }
    }

    async fn finish(&mut self) {
        let Some(result) = self.session.claim_result() else {
            return;
        };

        let stats = match self
            .statistics
            .record_game(result.correct, result.total)
            .await
        {
            Ok(recorded) => recorded.stats,
            Err(err) => {
                warn!(error = %err, "game could not be recorded");
                self.statistics.load_or_default().await
            }
        };

        self.view.render_summary(QuizResultsVm::compose(result, &stats));
    }

    /// Move the UI to "loading" and fetch whatever the ticket needs.
    fn begin_loading(&mut self, ticket: Ticket) {
        self.view.render_loading(true);
        if self.catalog.is_some() {
            self.request_question(ticket);
        } else {
            self.load_catalog();
        }
    }

    fn load_catalog(&mut self) {
        if self.catalog_in_flight {
            return;
        }
        self.catalog_in_flight = true;

        let movies = Arc::clone(&self.movies);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = movies.load_movies().await;
            let _ = events.send(QuizEvent::CatalogLoaded(result));
        });
    }

    fn request_question(&mut self, ticket: Ticket) {
        let Some(catalog) = self.catalog.clone() else {
            self.load_catalog();
            return;
        };

        let drawn = self.questions.draw(&catalog, &mut rand::rng());
        let (movie, draw) = match drawn {
            Ok(drawn) => drawn,
            Err(err) => {
                self.fail(ticket, err.into());
                return;
            }
        };
        debug!(?ticket, title = movie.title(), "requesting question");

        let questions = self.questions.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = questions.build(&movie, draw).await;
            let _ = events.send(QuizEvent::QuestionReady { ticket, result });
        });
    }

    fn schedule_result_elapsed(&self, ticket: Ticket) {
        let delay = self.settings.result_delay();
        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(QuizEvent::ResultElapsed { ticket });
        });
    }

    /// Put the session into `Failed` and show the error. Returns `false` if
    /// the failure belongs to a request the session no longer waits for.
    fn fail(&mut self, ticket: Ticket, error: QuizError) -> bool {
        let message = error.to_string();
        if !self.session.load_failed(ticket, error) {
            return false;
        }
        warn!(?ticket, %message, "quiz failed while loading");
        self.view.render_loading(false);
        self.view.render_error(&message);
        true
    }
}
