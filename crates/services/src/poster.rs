use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::error::PosterError;

/// Fetches poster image bytes for a question.
#[async_trait]
pub trait PosterFetching: Send + Sync {
    /// # Errors
    ///
    /// Returns `PosterError` when the image cannot be downloaded.
    async fn fetch_poster(&self, url: &Url) -> Result<Vec<u8>, PosterError>;
}

#[derive(Clone, Default)]
pub struct HttpPosterFetcher {
    client: Client,
}

impl HttpPosterFetcher {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PosterFetching for HttpPosterFetcher {
    async fn fetch_poster(&self, url: &Url) -> Result<Vec<u8>, PosterError> {
        let response = self.client.get(url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(PosterError::HttpStatus(response.status()));
        }
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(PosterError::Empty);
        }
        Ok(bytes.to_vec())
    }
}
