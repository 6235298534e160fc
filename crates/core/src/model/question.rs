use std::fmt;

use crate::model::Movie;

//
// ─── COMPARISON ────────────────────────────────────────────────────────────────
//

/// Direction a question asks about relative to the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    GreaterThan,
    LessThan,
}

impl Comparison {
    #[must_use]
    pub fn holds(self, rating: f32, threshold: f32) -> bool {
        match self {
            Comparison::GreaterThan => rating > threshold,
            Comparison::LessThan => rating < threshold,
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparison::GreaterThan => f.write_str("greater than"),
            Comparison::LessThan => f.write_str("less than"),
        }
    }
}

//
// ─── DRAW ──────────────────────────────────────────────────────────────────────
//

/// The random half of a question: a threshold and a comparison direction.
///
/// Combined with a movie this fully determines the question text and its
/// correct answer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuestionDraw {
    threshold: f32,
    comparison: Comparison,
}

impl QuestionDraw {
    /// Threshold is rounded to one decimal place.
    #[must_use]
    pub fn new(threshold: f32, comparison: Comparison) -> Self {
        Self {
            threshold: (threshold * 10.0).round() / 10.0,
            comparison,
        }
    }

    #[must_use]
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    #[must_use]
    pub fn comparison(&self) -> Comparison {
        self.comparison
    }

    #[must_use]
    pub fn prompt(&self) -> String {
        format!(
            "Is the rating of this movie {} {:.1}?",
            self.comparison, self.threshold
        )
    }

    #[must_use]
    pub fn answer_for(&self, rating: f32) -> bool {
        self.comparison.holds(rating, self.threshold)
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single yes/no round: the poster bytes, the prompt and the expected answer.
#[derive(Clone, PartialEq, Eq)]
pub struct Question {
    image: Vec<u8>,
    text: String,
    correct_answer: bool,
}

impl Question {
    #[must_use]
    pub fn new(image: Vec<u8>, text: impl Into<String>, correct_answer: bool) -> Self {
        Self {
            image,
            text: text.into(),
            correct_answer,
        }
    }

    /// Builds the question for `movie` from a draw and the fetched poster.
    #[must_use]
    pub fn from_draw(movie: &Movie, draw: QuestionDraw, image: Vec<u8>) -> Self {
        Self::new(image, draw.prompt(), draw.answer_for(movie.rating_value()))
    }

    #[must_use]
    pub fn image(&self) -> &[u8] {
        &self.image
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn correct_answer(&self) -> bool {
        self.correct_answer
    }

    #[must_use]
    pub fn is_correct(&self, answer: bool) -> bool {
        answer == self.correct_answer
    }
}

impl fmt::Debug for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Question")
            .field("image_len", &self.image.len())
            .field("text", &self.text)
            .field("correct_answer", &self.correct_answer)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn movie(rating: &str) -> Movie {
        Movie::new("Movie", rating, Url::parse("https://img.test/p.jpg").unwrap())
    }

    #[test]
    fn greater_than_threshold_is_true_for_higher_rating() {
        let draw = QuestionDraw::new(8.1, Comparison::GreaterThan);
        let question = Question::from_draw(&movie("9.0"), draw, vec![1, 2, 3]);

        assert!(question.correct_answer());
        assert!(!question.is_correct(false));
        assert_eq!(question.text(), "Is the rating of this movie greater than 8.1?");
        assert_eq!(question.image(), &[1, 2, 3]);
    }

    #[test]
    fn less_than_threshold_is_false_for_higher_rating() {
        let draw = QuestionDraw::new(8.7, Comparison::LessThan);
        assert!(!draw.answer_for(9.0));
        assert!(draw.answer_for(8.6));
        assert_eq!(draw.prompt(), "Is the rating of this movie less than 8.7?");
    }

    #[test]
    fn equal_rating_is_neither_greater_nor_less() {
        let greater = QuestionDraw::new(8.5, Comparison::GreaterThan);
        let less = QuestionDraw::new(8.5, Comparison::LessThan);
        assert!(!greater.answer_for(8.5));
        assert!(!less.answer_for(8.5));
    }

    #[test]
    fn threshold_is_rounded_to_one_decimal() {
        let draw = QuestionDraw::new(8.349, Comparison::GreaterThan);
        assert!((draw.threshold() - 8.3).abs() < 1e-6);
        assert_eq!(draw.prompt(), "Is the rating of this movie greater than 8.3?");
    }

    #[test]
    fn unparsable_rating_counts_as_zero() {
        let draw = QuestionDraw::new(8.1, Comparison::LessThan);
        let question = Question::from_draw(&movie("unknown"), draw, Vec::new());
        assert!(question.correct_answer());
    }
}
