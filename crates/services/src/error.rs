//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{GameRecordError, SettingsError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted while loading the movie catalog.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("movie catalog is not configured")]
    NotConfigured,
    #[error("catalog request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("catalog service reported an error: {0}")]
    Api(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted while downloading a poster.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PosterError {
    #[error("poster request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("poster response was empty")]
    Empty,
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by `QuestionFactory`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("the movie catalog is empty")]
    EmptyCatalog,
    #[error(transparent)]
    AssetFetch(#[from] PosterError),
}

/// Errors emitted by `StatisticsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StatisticsServiceError {
    #[error(transparent)]
    Record(#[from] GameRecordError),
}

/// Failures the quiz surfaces to the player.
///
/// Every variant is recoverable through a retry except that an empty catalog
/// is only retried by fetching the catalog again.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("Could not load the movie list: {0}")]
    CatalogFetch(#[from] CatalogError),
    #[error("Could not load the movie poster: {0}")]
    AssetFetch(#[source] PosterError),
    #[error("The movie list is empty")]
    EmptyCatalog,
    #[error("Could not access quiz statistics: {0}")]
    Persistence(#[from] StorageError),
}

impl From<QuestionError> for QuizError {
    fn from(err: QuestionError) -> Self {
        match err {
            QuestionError::EmptyCatalog => QuizError::EmptyCatalog,
            QuestionError::AssetFetch(poster) => QuizError::AssetFetch(poster),
        }
    }
}

/// Returned by `QuizHandle` once the quiz loop has stopped.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("quiz loop has stopped")]
pub struct QuizLoopClosed;

/// Errors emitted while bootstrapping quiz services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}
