use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("concept cannot be empty")]
    EmptyConcept,

    #[error("a question needs at least {min} options, got {len}")]
    TooFewOptions { min: usize, len: usize },

    #[error("option {index} cannot be empty")]
    EmptyOption { index: usize },

    #[error("select the correct answer")]
    MissingCorrectAnswer,

    #[error("correct answer {index} is out of range for {len} options")]
    CorrectAnswerOutOfRange { index: usize, len: usize },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A multiple-choice question from the backend question bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    text: String,
    options: Vec<String>,
    correct_answer: usize,
    concept: String,
}

impl Question {
    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn correct_answer(&self) -> usize {
        self.correct_answer
    }

    #[must_use]
    pub fn concept(&self) -> &str {
        &self.concept
    }

    #[must_use]
    pub fn is_correct(&self, selected: usize) -> bool {
        selected == self.correct_answer
    }
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Minimum number of options an authored question must have.
pub const MIN_OPTIONS: usize = 2;

/// Unvalidated question fields as entered in the authoring form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionDraft {
    pub text: String,
    pub concept: String,
    pub options: Vec<String>,
    pub correct_answer: Option<usize>,
}

impl QuestionDraft {
    /// Empty draft with `option_slots` blank options.
    #[must_use]
    pub fn blank(option_slots: usize) -> Self {
        Self {
            options: vec![String::new(); option_slots],
            ..Self::default()
        }
    }

    /// Draft pre-filled from an existing question (for editing).
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        Self {
            text: question.text.clone(),
            concept: question.concept.clone(),
            options: question.options.clone(),
            correct_answer: Some(question.correct_answer),
        }
    }

    /// Validate the draft and build a `Question` with the given id.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` for blank text/concept/options, too few options,
    /// or a missing/out-of-range correct answer.
    pub fn validate(self, id: QuestionId) -> Result<Question, QuestionError> {
        let text = self.text.trim().to_string();
        if text.is_empty() {
            return Err(QuestionError::EmptyText);
        }
        let concept = self.concept.trim().to_string();
        if concept.is_empty() {
            return Err(QuestionError::EmptyConcept);
        }
        if self.options.len() < MIN_OPTIONS {
            return Err(QuestionError::TooFewOptions {
                min: MIN_OPTIONS,
                len: self.options.len(),
            });
        }
        let mut options = Vec::with_capacity(self.options.len());
        for (index, option) in self.options.into_iter().enumerate() {
            let option = option.trim().to_string();
            if option.is_empty() {
                return Err(QuestionError::EmptyOption { index });
            }
            options.push(option);
        }
        let correct_answer = self.correct_answer.ok_or(QuestionError::MissingCorrectAnswer)?;
        if correct_answer >= options.len() {
            return Err(QuestionError::CorrectAnswerOutOfRange {
                index: correct_answer,
                len: options.len(),
            });
        }

        Ok(Question {
            id,
            text,
            options,
            correct_answer,
            concept,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> QuestionDraft {
        QuestionDraft {
            text: " What is 2 + 2? ".into(),
            concept: "Arithmetic".into(),
            options: vec!["3".into(), "4".into(), "5".into(), "22".into()],
            correct_answer: Some(1),
        }
    }

    #[test]
    fn validates_and_trims() {
        let question = draft().validate(QuestionId::new(7)).unwrap();
        assert_eq!(question.id(), QuestionId::new(7));
        assert_eq!(question.text(), "What is 2 + 2?");
        assert!(question.is_correct(1));
        assert!(!question.is_correct(0));
    }

    #[test]
    fn rejects_incomplete_forms() {
        let mut missing_option = draft();
        missing_option.options[2] = "  ".into();
        assert_eq!(
            missing_option.validate(QuestionId::new(1)).unwrap_err(),
            QuestionError::EmptyOption { index: 2 }
        );

        let mut no_answer = draft();
        no_answer.correct_answer = None;
        assert_eq!(
            no_answer.validate(QuestionId::new(1)).unwrap_err(),
            QuestionError::MissingCorrectAnswer
        );

        let mut out_of_range = draft();
        out_of_range.correct_answer = Some(4);
        assert!(matches!(
            out_of_range.validate(QuestionId::new(1)),
            Err(QuestionError::CorrectAnswerOutOfRange { index: 4, len: 4 })
        ));

        let blank = QuestionDraft::blank(4);
        assert_eq!(blank.validate(QuestionId::new(1)).unwrap_err(), QuestionError::EmptyText);
    }

    #[test]
    fn draft_round_trips_for_editing() {
        let question = draft().validate(QuestionId::new(3)).unwrap();
        let again = QuestionDraft::from_question(&question)
            .validate(question.id())
            .unwrap();
        assert_eq!(question, again);
    }

    #[test]
    fn deserializes_backend_shape() {
        let json = r#"{"id":1,"text":"Q","options":["a","b"],"correct_answer":0,"concept":"C"}"#;
        let question: Question = serde_json::from_str(json).unwrap();
        assert_eq!(question.options(), ["a", "b"]);
        assert_eq!(question.concept(), "C");
    }
}
