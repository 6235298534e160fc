use std::sync::Arc;

use quiz_core::model::{Comparison, Movie, Question, QuestionDraw, ThresholdBand};
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::debug;

use crate::error::QuestionError;
use crate::poster::PosterFetching;

/// Turns a movie catalog into yes/no rating questions.
///
/// Generation is split in two: a synchronous random [`draw`](Self::draw) and
/// an asynchronous [`build`](Self::build) that downloads the poster. Callers
/// that own an RNG can drive the draw themselves; [`generate`](Self::generate)
/// does both with the thread-local RNG.
#[derive(Clone)]
pub struct QuestionFactory {
    posters: Arc<dyn PosterFetching>,
    band: ThresholdBand,
}

impl QuestionFactory {
    #[must_use]
    pub fn new(posters: Arc<dyn PosterFetching>) -> Self {
        Self {
            posters,
            band: ThresholdBand::default(),
        }
    }

    #[must_use]
    pub fn with_threshold_band(mut self, band: ThresholdBand) -> Self {
        self.band = band;
        self
    }

    #[must_use]
    pub fn threshold_band(&self) -> ThresholdBand {
        self.band
    }

    /// Pick a movie uniformly, a threshold in the band and a comparison.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyCatalog` if `movies` is empty.
    pub fn draw<R: Rng + ?Sized>(
        &self,
        movies: &[Movie],
        rng: &mut R,
    ) -> Result<(Movie, QuestionDraw), QuestionError> {
        let movie = movies.choose(rng).ok_or(QuestionError::EmptyCatalog)?;
        let threshold = rng.random_range(self.band.min()..=self.band.max());
        let comparison = if rng.random_bool(0.5) {
            Comparison::GreaterThan
        } else {
            Comparison::LessThan
        };
        Ok((movie.clone(), QuestionDraw::new(threshold, comparison)))
    }

    /// Download the poster for `movie` and assemble the question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::AssetFetch` if the poster cannot be fetched.
    pub async fn build(&self, movie: &Movie, draw: QuestionDraw) -> Result<Question, QuestionError> {
        let url = movie.resized_image_url();
        let image = self.posters.fetch_poster(&url).await?;
        debug!(
            title = movie.title(),
            threshold = draw.threshold(),
            comparison = %draw.comparison(),
            "question generated"
        );
        Ok(Question::from_draw(movie, draw, image))
    }

    /// Draw and build a question in one step.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyCatalog` for an empty catalog (no poster
    /// is requested) and `QuestionError::AssetFetch` if the poster fails.
    pub async fn generate(&self, movies: &[Movie]) -> Result<Question, QuestionError> {
        let (movie, draw) = self.draw(movies, &mut rand::rng())?;
        self.build(&movie, draw).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PosterError;
    use async_trait::async_trait;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::Mutex;
    use url::Url;

    #[derive(Default)]
    struct RecordingPosters {
        requested: Mutex<Vec<Url>>,
        fail: bool,
    }

    #[async_trait]
    impl PosterFetching for RecordingPosters {
        async fn fetch_poster(&self, url: &Url) -> Result<Vec<u8>, PosterError> {
            self.requested.lock().unwrap().push(url.clone());
            if self.fail {
                Err(PosterError::Empty)
            } else {
                Ok(vec![0xFF, 0xD8])
            }
        }
    }

    fn movie(title: &str, rating: &str) -> Movie {
        Movie::new(
            title,
            rating,
            Url::parse(&format!("https://img.test/{title}._V1_Ratio0.67_.jpg")).unwrap(),
        )
    }

    #[test]
    fn draws_stay_inside_band_with_one_decimal() {
        let factory = QuestionFactory::new(Arc::new(RecordingPosters::default()));
        let movies = vec![movie("a", "9.0"), movie("b", "8.0")];
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let (_, draw) = factory.draw(&movies, &mut rng).unwrap();
            let t = draw.threshold();
            assert!((8.1 - 1e-4..=8.7 + 1e-4).contains(&t), "threshold {t}");
            assert!(((t * 10.0).round() - t * 10.0).abs() < 1e-3);
        }
    }

    #[test]
    fn draws_cover_both_comparisons_and_every_movie() {
        let factory = QuestionFactory::new(Arc::new(RecordingPosters::default()));
        let movies = vec![movie("a", "9.0"), movie("b", "8.0"), movie("c", "8.5")];
        let mut rng = StdRng::seed_from_u64(42);

        let mut greater = 0;
        let mut titles = std::collections::HashSet::new();
        for _ in 0..300 {
            let (m, draw) = factory.draw(&movies, &mut rng).unwrap();
            titles.insert(m.title().to_string());
            if draw.comparison() == Comparison::GreaterThan {
                greater += 1;
            }
        }
        assert_eq!(titles.len(), 3);
        assert!(greater > 50 && greater < 250);
    }

    #[tokio::test]
    async fn empty_catalog_never_fetches_a_poster() {
        let posters = Arc::new(RecordingPosters::default());
        let factory = QuestionFactory::new(posters.clone());

        let err = factory.generate(&[]).await.unwrap_err();
        assert!(matches!(err, QuestionError::EmptyCatalog));
        assert!(posters.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn build_fetches_resized_poster_and_derives_answer() {
        let posters = Arc::new(RecordingPosters::default());
        let factory = QuestionFactory::new(posters.clone());
        let m = movie("solo", "9.0");

        let question = factory
            .build(&m, QuestionDraw::new(8.1, Comparison::GreaterThan))
            .await
            .unwrap();

        assert!(question.correct_answer());
        assert_eq!(question.image(), &[0xFF, 0xD8]);
        let requested = posters.requested.lock().unwrap();
        assert_eq!(
            requested[0].as_str(),
            "https://img.test/solo._V0_UX600_.jpg"
        );
    }

    #[tokio::test]
    async fn poster_failure_is_an_asset_error() {
        let posters = Arc::new(RecordingPosters {
            fail: true,
            ..RecordingPosters::default()
        });
        let factory = QuestionFactory::new(posters);

        let err = factory.generate(&[movie("a", "9.0")]).await.unwrap_err();
        assert!(matches!(err, QuestionError::AssetFetch(PosterError::Empty)));
    }
}
