use std::env;

use async_trait::async_trait;
use quiz_core::model::Movie;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::error::CatalogError;

const DEFAULT_CATALOG_URL: &str = "https://tv-api.com/en/API/Top250Movies";

/// Source of the movie catalog questions are drawn from.
#[async_trait]
pub trait MoviesLoading: Send + Sync {
    /// # Errors
    ///
    /// Returns `CatalogError` when the catalog cannot be fetched or decoded.
    async fn load_movies(&self) -> Result<Vec<Movie>, CatalogError>;
}

#[derive(Clone, Debug)]
pub struct CatalogConfig {
    pub base_url: String,
    pub api_key: String,
}

impl CatalogConfig {
    /// Reads `QUIZ_IMDB_API_KEY` and, optionally, `QUIZ_CATALOG_URL`.
    ///
    /// Returns `None` when no usable API key is set.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("QUIZ_IMDB_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let base_url = env::var("QUIZ_CATALOG_URL").unwrap_or_else(|_| DEFAULT_CATALOG_URL.into());
        Some(Self { base_url, api_key })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.api_key.trim()
        )
    }
}

/// Loads the top-rated movie list from an IMDb-style JSON API.
#[derive(Clone)]
pub struct ImdbMoviesLoader {
    client: Client,
    config: Option<CatalogConfig>,
}

impl ImdbMoviesLoader {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(CatalogConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<CatalogConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }
}

#[async_trait]
impl MoviesLoading for ImdbMoviesLoader {
    async fn load_movies(&self) -> Result<Vec<Movie>, CatalogError> {
        let config = self.config.as_ref().ok_or(CatalogError::NotConfigured)?;

        let response = self.client.get(config.endpoint()).send().await?;
        if !response.status().is_success() {
            return Err(CatalogError::HttpStatus(response.status()));
        }

        let body: CatalogResponse = response.json().await?;
        if !body.error_message.trim().is_empty() {
            return Err(CatalogError::Api(body.error_message));
        }

        let total = body.items.len();
        let movies: Vec<Movie> = body.items.into_iter().filter_map(CatalogItem::into_movie).collect();
        if movies.len() < total {
            warn!(
                skipped = total - movies.len(),
                "catalog items without a usable poster url were skipped"
            );
        }
        debug!(count = movies.len(), "movie catalog loaded");

        Ok(movies)
    }
}

#[derive(Debug, Deserialize)]
struct CatalogResponse {
    #[serde(rename = "errorMessage", default)]
    error_message: String,
    #[serde(default)]
    items: Vec<CatalogItem>,
}

#[derive(Debug, Deserialize)]
struct CatalogItem {
    #[serde(rename = "fullTitle")]
    full_title: String,
    #[serde(rename = "imDbRating", default)]
    rating: String,
    image: String,
}

impl CatalogItem {
    fn into_movie(self) -> Option<Movie> {
        let image_url = Url::parse(&self.image).ok()?;
        Some(Movie::new(self.full_title, self.rating, image_url))
    }
}
