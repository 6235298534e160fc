use std::time::Duration;

use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("question count must be > 0")]
    InvalidQuestionCount,

    #[error("threshold band must be finite with min <= max (got {min}..={max})")]
    InvalidThresholdBand { min: f32, max: f32 },
}

//
// ─── THRESHOLD BAND ────────────────────────────────────────────────────────────
//

/// Inclusive range that question thresholds are drawn from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdBand {
    min: f32,
    max: f32,
}

impl ThresholdBand {
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidThresholdBand` for non-finite bounds or
    /// `min > max`.
    pub fn new(min: f32, max: f32) -> Result<Self, SettingsError> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(SettingsError::InvalidThresholdBand { min, max });
        }
        Ok(Self { min, max })
    }

    #[must_use]
    pub fn min(&self) -> f32 {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> f32 {
        self.max
    }
}

impl Default for ThresholdBand {
    fn default() -> Self {
        Self { min: 8.1, max: 8.7 }
    }
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Tunables for one quiz round.
///
/// Defaults: 10 questions, a 1 second result display, thresholds in 8.1..=8.7.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuizSettings {
    question_count: u32,
    result_delay: Duration,
    threshold_band: ThresholdBand,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            question_count: 10,
            result_delay: Duration::from_secs(1),
            threshold_band: ThresholdBand::default(),
        }
    }
}

impl QuizSettings {
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidQuestionCount` if `question_count` is zero.
    pub fn new(
        question_count: u32,
        result_delay: Duration,
        threshold_band: ThresholdBand,
    ) -> Result<Self, SettingsError> {
        if question_count == 0 {
            return Err(SettingsError::InvalidQuestionCount);
        }
        Ok(Self {
            question_count,
            result_delay,
            threshold_band,
        })
    }

    /// # Errors
    ///
    /// Returns `SettingsError::InvalidQuestionCount` if `question_count` is zero.
    pub fn with_question_count(self, question_count: u32) -> Result<Self, SettingsError> {
        Self::new(question_count, self.result_delay, self.threshold_band)
    }

    #[must_use]
    pub fn with_result_delay(mut self, result_delay: Duration) -> Self {
        self.result_delay = result_delay;
        self
    }

    #[must_use]
    pub fn with_threshold_band(mut self, threshold_band: ThresholdBand) -> Self {
        self.threshold_band = threshold_band;
        self
    }

    #[must_use]
    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    #[must_use]
    pub fn result_delay(&self) -> Duration {
        self.result_delay
    }

    #[must_use]
    pub fn threshold_band(&self) -> ThresholdBand {
        self.threshold_band
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_round() {
        let settings = QuizSettings::default();
        assert_eq!(settings.question_count(), 10);
        assert_eq!(settings.result_delay(), Duration::from_secs(1));
        assert!((settings.threshold_band().min() - 8.1).abs() < f32::EPSILON);
        assert!((settings.threshold_band().max() - 8.7).abs() < f32::EPSILON);
    }

    #[test]
    fn zero_questions_is_rejected() {
        let err = QuizSettings::default().with_question_count(0).unwrap_err();
        assert_eq!(err, SettingsError::InvalidQuestionCount);
    }

    #[test]
    fn inverted_or_nan_band_is_rejected() {
        assert!(ThresholdBand::new(8.7, 8.1).is_err());
        assert!(ThresholdBand::new(f32::NAN, 8.1).is_err());
        assert!(ThresholdBand::new(8.4, 8.4).is_ok());
    }
}
