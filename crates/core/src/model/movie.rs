use url::Url;

/// Poster size suffix appended to catalog image URLs.
const RESIZED_POSTER_SUFFIX: &str = "._V0_UX600_.jpg";

/// A movie from the ranked catalog.
///
/// The rating is kept exactly as the catalog reported it; use
/// [`Movie::rating_value`] for comparisons.
#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    title: String,
    rating: String,
    image_url: Url,
}

impl Movie {
    #[must_use]
    pub fn new(title: impl Into<String>, rating: impl Into<String>, image_url: Url) -> Self {
        Self {
            title: title.into(),
            rating: rating.into(),
            image_url,
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn rating(&self) -> &str {
        &self.rating
    }

    #[must_use]
    pub fn image_url(&self) -> &Url {
        &self.image_url
    }

    /// Numeric rating, or `0.0` when the catalog value does not parse.
    #[must_use]
    pub fn rating_value(&self) -> f32 {
        self.rating.trim().parse::<f32>().unwrap_or(0.0)
    }

    /// URL of the 600px-wide poster variant.
    ///
    /// Catalog URLs look like `.../MV5B...@._V1_Ratio0.67_AL_.jpg`; everything
    /// from the first `._` is replaced with a fixed size suffix. URLs without
    /// that marker are returned as-is.
    #[must_use]
    pub fn resized_image_url(&self) -> Url {
        let raw = self.image_url.as_str();
        let Some((base, _)) = raw.split_once("._") else {
            return self.image_url.clone();
        };
        Url::parse(&format!("{base}{RESIZED_POSTER_SUFFIX}"))
            .unwrap_or_else(|_| self.image_url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(rating: &str, image: &str) -> Movie {
        Movie::new("The Godfather", rating, Url::parse(image).unwrap())
    }

    #[test]
    fn rating_value_parses_decimal_strings() {
        assert!((movie("9.2", "https://img.test/a.jpg").rating_value() - 9.2).abs() < f32::EPSILON);
        assert!((movie(" 8.0 ", "https://img.test/a.jpg").rating_value() - 8.0).abs() < f32::EPSILON);
    }

    #[test]
    fn unparsable_rating_defaults_to_zero() {
        assert_eq!(movie("", "https://img.test/a.jpg").rating_value(), 0.0);
        assert_eq!(movie("n/a", "https://img.test/a.jpg").rating_value(), 0.0);
    }

    #[test]
    fn resized_url_replaces_size_suffix() {
        let m = movie(
            "9.2",
            "https://m.media-amazon.com/images/M/MV5BM2MyNjYx@._V1_Ratio0.7273_AL_.jpg",
        );
        assert_eq!(
            m.resized_image_url().as_str(),
            "https://m.media-amazon.com/images/M/MV5BM2MyNjYx@._V0_UX600_.jpg"
        );
    }

    #[test]
    fn resized_url_without_marker_is_unchanged() {
        let m = movie("9.2", "https://img.test/posters/godfather.jpg");
        assert_eq!(m.resized_image_url(), *m.image_url());
    }
}
