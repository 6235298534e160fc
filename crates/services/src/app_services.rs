use std::env;
use std::sync::Arc;

use quiz_core::model::QuizSettings;
use storage::repository::Storage;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::Clock;
use crate::catalog::{ImdbMoviesLoader, MoviesLoading};
use crate::error::QuizServicesError;
use crate::poster::{HttpPosterFetcher, PosterFetching};
use crate::question_factory::QuestionFactory;
use crate::quiz::{QuizHandle, QuizLoop, QuizView};
use crate::statistics_service::StatisticsService;

const DEFAULT_DB_URL: &str = "sqlite://movie_quiz.sqlite3";

/// Assembles the quiz and its collaborators.
#[derive(Clone)]
pub struct QuizServices {
    settings: QuizSettings,
    movies: Arc<dyn MoviesLoading>,
    questions: QuestionFactory,
    statistics: Arc<StatisticsService>,
}

impl QuizServices {
    /// Build services backed by `SQLite` storage and the HTTP catalog.
    ///
    /// The catalog is configured from the environment; without an API key
    /// every load fails with `CatalogError::NotConfigured`, which the quiz
    /// shows as a retryable error.
    ///
    /// # Errors
    ///
    /// Returns `QuizServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        settings: QuizSettings,
    ) -> Result<Self, QuizServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let movies = Arc::new(ImdbMoviesLoader::from_env());
        if !movies.enabled() {
            warn!("QUIZ_IMDB_API_KEY is not set, the movie catalog will not load");
        }

        Ok(Self::from_parts(
            settings,
            movies,
            Arc::new(HttpPosterFetcher::default()),
            StatisticsService::new(clock, Arc::clone(&storage.statistics)),
        ))
    }

    /// Build services from explicit collaborators.
    #[must_use]
    pub fn from_parts(
        settings: QuizSettings,
        movies: Arc<dyn MoviesLoading>,
        posters: Arc<dyn PosterFetching>,
        statistics: StatisticsService,
    ) -> Self {
        Self {
            settings,
            movies,
            questions: QuestionFactory::new(posters).with_threshold_band(settings.threshold_band()),
            statistics: Arc::new(statistics),
        }
    }

    /// Database location from `QUIZ_DB_URL`, falling back to a file in the
    /// working directory.
    #[must_use]
    pub fn db_url_from_env() -> String {
        db_url_or_default(env::var("QUIZ_DB_URL").ok())
    }

    #[must_use]
    pub fn settings(&self) -> QuizSettings {
        self.settings
    }

    #[must_use]
    pub fn statistics(&self) -> Arc<StatisticsService> {
        Arc::clone(&self.statistics)
    }

    /// Start a quiz that renders into `view`.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn_quiz(&self, view: Arc<dyn QuizView>) -> (QuizHandle, JoinHandle<()>) {
        QuizLoop::spawn(
            self.settings,
            Arc::clone(&self.movies),
            self.questions.clone(),
            StatisticsService::clone(&self.statistics),
            view,
        )
    }
}

fn db_url_or_default(raw: Option<String>) -> String {
    raw.filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_DB_URL.to_string())
}
