use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::question::Question;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("confidence must be between 1 and 5, got {0}")]
pub struct ConfidenceError(pub u8);

/// Self-reported confidence on a 1–5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Confidence(u8);

impl Confidence {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;
    pub const DEFAULT: Self = Self(3);

    /// # Errors
    ///
    /// Returns `ConfidenceError` if `value` is outside `1..=5`.
    pub fn new(value: u8) -> Result<Self, ConfidenceError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ConfidenceError(value))
        }
    }

    /// Clamp any slider value into range.
    #[must_use]
    pub fn clamped(value: i64) -> Self {
        let clamped = value.clamp(i64::from(Self::MIN), i64::from(Self::MAX));
        Self(u8::try_from(clamped).unwrap_or(Self::DEFAULT.0))
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for Confidence {
    type Error = ConfidenceError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Confidence> for u8 {
    fn from(value: Confidence) -> Self {
        value.0
    }
}

/// One recorded response to one question. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attempt {
    question_id: QuestionId,
    selected_answer: usize,
    time_taken: f64,
    confidence: Confidence,
    is_correct: bool,
}

impl Attempt {
    /// Record an answer against `question`; correctness is derived here.
    ///
    /// Negative or non-finite durations are stored as zero.
    #[must_use]
    pub fn record(
        question: &Question,
        selected_answer: usize,
        time_taken: f64,
        confidence: Confidence,
    ) -> Self {
        let time_taken = if time_taken.is_finite() {
            time_taken.max(0.0)
        } else {
            0.0
        };
        Self {
            question_id: question.id(),
            selected_answer,
            time_taken,
            confidence,
            is_correct: question.is_correct(selected_answer),
        }
    }

    #[must_use]
    pub fn question_id(&self) -> QuestionId {
        self.question_id
    }

    #[must_use]
    pub fn selected_answer(&self) -> usize {
        self.selected_answer
    }

    /// Seconds between the question being shown and the answer being submitted.
    #[must_use]
    pub fn time_taken(&self) -> f64 {
        self.time_taken
    }

    #[must_use]
    pub fn confidence(&self) -> Confidence {
        self.confidence
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionDraft;

    fn question() -> Question {
        QuestionDraft {
            text: "Capital of France?".into(),
            concept: "Geography".into(),
            options: vec!["Paris".into(), "Rome".into()],
            correct_answer: Some(0),
        }
        .validate(QuestionId::new(5))
        .unwrap()
    }

    #[test]
    fn confidence_defaults_and_clamps() {
        assert_eq!(Confidence::default().value(), 3);
        assert_eq!(Confidence::clamped(9).value(), 5);
        assert_eq!(Confidence::clamped(-2).value(), 1);
        assert_eq!(Confidence::new(0).unwrap_err(), ConfidenceError(0));
        assert!(serde_json::from_str::<Confidence>("6").is_err());
    }

    #[test]
    fn attempt_derives_correctness() {
        let q = question();
        let right = Attempt::record(&q, 0, 2.5, Confidence::new(5).unwrap());
        let wrong = Attempt::record(&q, 1, -1.0, Confidence::DEFAULT);
        assert!(right.is_correct());
        assert!(!wrong.is_correct());
        assert_eq!(wrong.time_taken(), 0.0);
        assert_eq!(right.question_id(), QuestionId::new(5));
    }

    #[test]
    fn attempt_serializes_wire_fields() {
        let attempt = Attempt::record(&question(), 0, 1.5, Confidence::new(4).unwrap());
        let value = serde_json::to_value(&attempt).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "question_id": 5,
                "selected_answer": 0,
                "time_taken": 1.5,
                "confidence": 4,
                "is_correct": true
            })
        );
    }
}
