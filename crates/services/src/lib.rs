#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog;
pub mod error;
pub mod poster;
pub mod question_factory;
pub mod quiz;
pub mod statistics_service;

pub use quiz_core::Clock;

pub use app_services::QuizServices;
pub use catalog::{CatalogConfig, ImdbMoviesLoader, MoviesLoading};
pub use error::{
    CatalogError, PosterError, QuestionError, QuizError, QuizLoopClosed, QuizServicesError,
    StatisticsServiceError,
};
pub use poster::{HttpPosterFetcher, PosterFetching};
pub use question_factory::QuestionFactory;
pub use quiz::{
    QuizCommand, QuizHandle, QuizLoop, QuizPhase, QuizResultsVm, QuizSession, QuizStepVm,
    QuizView,
};
pub use statistics_service::{RecordedGame, StatisticsService};
