use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::model::{Analysis, Attempt, Confidence, Question, QuizId, StudentId};
use crate::time::elapsed_secs;

pub const NO_QUESTIONS_MESSAGE: &str = "No questions are available for this quiz.";
pub const LOAD_FAILED_MESSAGE: &str =
    "Failed to load quiz questions. Please check your connection and try again.";
pub const SUBMIT_FAILED_MESSAGE: &str = "Failed to submit quiz. Please try again.";
pub const NO_OPTIONS_MESSAGE: &str = "A quiz question has no answer options.";

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("cannot {action} while {phase}")]
    InvalidTransition {
        action: &'static str,
        phase: QuizPhase,
    },

    #[error("Please enter your Student ID to continue.")]
    EmptyStudentId,

    #[error("Please select an answer before submitting.")]
    NoSelection,

    #[error("option {index} is out of range for {len} options")]
    OptionOutOfRange { index: usize, len: usize },
}

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    LoggedOut,
    Loading,
    Presenting { index: usize },
    Submitting,
    Results,
    Error,
}

impl fmt::Display for QuizPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoggedOut => f.write_str("logged out"),
            Self::Loading => f.write_str("loading"),
            Self::Presenting { index } => write!(f, "presenting question {}", index + 1),
            Self::Submitting => f.write_str("submitting"),
            Self::Results => f.write_str("showing results"),
            Self::Error => f.write_str("in error"),
        }
    }
}

/// What happened after an answer was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Next { index: usize },
    Finished,
}

/// Body posted to the analysis endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizSubmission {
    pub student_id: StudentId,
    pub quiz_id: QuizId,
    pub attempts: Vec<Attempt>,
    pub timestamp: DateTime<Utc>,
}

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// One student's quiz attempt, from identification to the analysis verdict.
///
/// Purely synchronous: callers perform the network calls and feed results
/// back in through `questions_loaded`, `submission_succeeded` and the
/// failure transitions. While presenting, `attempts().len()` always equals
/// the current question index.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizController {
    phase: QuizPhase,
    student_id: Option<StudentId>,
    quiz_id: Option<QuizId>,
    started_at: Option<DateTime<Utc>>,
    questions: Vec<Question>,
    attempts: Vec<Attempt>,
    selected: Option<usize>,
    confidence: Confidence,
    presented_at: Option<DateTime<Utc>>,
    analysis: Option<Analysis>,
    error: Option<String>,
}

impl Default for QuizController {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizController {
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: QuizPhase::LoggedOut,
            student_id: None,
            quiz_id: None,
            started_at: None,
            questions: Vec::new(),
            attempts: Vec::new(),
            selected: None,
            confidence: Confidence::DEFAULT,
            presented_at: None,
            analysis: None,
            error: None,
        }
    }

    fn invalid(&self, action: &'static str) -> QuizError {
        QuizError::InvalidTransition {
            action,
            phase: self.phase,
        }
    }

    fn presenting_index(&self, action: &'static str) -> Result<usize, QuizError> {
        match self.phase {
            QuizPhase::Presenting { index } => Ok(index),
            _ => Err(self.invalid(action)),
        }
    }

    fn present(&mut self, index: usize, now: DateTime<Utc>) {
        self.phase = QuizPhase::Presenting { index };
        self.selected = None;
        self.confidence = Confidence::DEFAULT;
        self.presented_at = Some(now);
    }

    /// Move to `Error`, falling back to `default` when `message` is blank.
    fn fail(&mut self, message: impl Into<String>, default: &str) {
        let message = message.into();
        self.phase = QuizPhase::Error;
        self.presented_at = None;
        self.error = Some(if message.trim().is_empty() {
            default.to_string()
        } else {
            message
        });
    }

    // ─── transitions ───

    /// Identify the student and move to `Loading`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::EmptyStudentId` for a blank id (state unchanged), or
    /// `InvalidTransition` outside `LoggedOut`.
    pub fn begin(&mut self, raw_student_id: &str, now: DateTime<Utc>) -> Result<(), QuizError> {
        if self.phase != QuizPhase::LoggedOut {
            return Err(self.invalid("start a quiz"));
        }
        let student_id = StudentId::new(raw_student_id).map_err(|_| QuizError::EmptyStudentId)?;
        self.student_id = Some(student_id);
        self.quiz_id = Some(QuizId::from_started_at(now));
        self.started_at = Some(now);
        self.phase = QuizPhase::Loading;
        Ok(())
    }

    /// Questions arrived. An empty list, or a question without options, is
    /// an error rather than a quiz nobody can answer.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` outside `Loading`.
    pub fn questions_loaded(
        &mut self,
        questions: Vec<Question>,
        now: DateTime<Utc>,
    ) -> Result<(), QuizError> {
        if self.phase != QuizPhase::Loading {
            return Err(self.invalid("accept questions"));
        }
        if questions.is_empty() {
            self.fail(NO_QUESTIONS_MESSAGE, NO_QUESTIONS_MESSAGE);
            return Ok(());
        }
        if questions.iter().any(|question| question.option_count() == 0) {
            self.fail(NO_OPTIONS_MESSAGE, NO_OPTIONS_MESSAGE);
            return Ok(());
        }
        self.questions = questions;
        self.attempts = Vec::with_capacity(self.questions.len());
        self.present(0, now);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `InvalidTransition` outside `Loading`.
    pub fn load_failed(&mut self, message: impl Into<String>) -> Result<(), QuizError> {
        if self.phase != QuizPhase::Loading {
            return Err(self.invalid("fail loading"));
        }
        self.fail(message, LOAD_FAILED_MESSAGE);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `QuizError::OptionOutOfRange` for an index past the option list,
    /// or `InvalidTransition` outside `Presenting`.
    pub fn select_option(&mut self, option: usize) -> Result<(), QuizError> {
        let index = self.presenting_index("select an option")?;
        let len = self.questions[index].option_count();
        if option >= len {
            return Err(QuizError::OptionOutOfRange { index: option, len });
        }
        self.selected = Some(option);
        Ok(())
    }

    /// Set the slider value, clamped to `1..=5`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` outside `Presenting`.
    pub fn set_confidence(&mut self, value: i64) -> Result<Confidence, QuizError> {
        self.presenting_index("set confidence")?;
        self.confidence = Confidence::clamped(value);
        Ok(self.confidence)
    }

    /// Record the answer to the current question and advance.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoSelection` if no option is selected, or
    /// `InvalidTransition` outside `Presenting`.
    pub fn submit_answer(&mut self, now: DateTime<Utc>) -> Result<AnswerOutcome, QuizError> {
        let index = self.presenting_index("submit an answer")?;
        let selected = self.selected.ok_or(QuizError::NoSelection)?;
        let time_taken = self
            .presented_at
            .map_or(0.0, |presented_at| elapsed_secs(presented_at, now));

        let attempt = Attempt::record(
            &self.questions[index],
            selected,
            time_taken,
            self.confidence,
        );
        self.attempts.push(attempt);

        let next = index + 1;
        if next < self.questions.len() {
            self.present(next, now);
            Ok(AnswerOutcome::Next { index: next })
        } else {
            self.phase = QuizPhase::Submitting;
            self.selected = None;
            self.presented_at = None;
            Ok(AnswerOutcome::Finished)
        }
    }

    /// Body to post while `Submitting`.
    #[must_use]
    pub fn submission(&self, now: DateTime<Utc>) -> Option<QuizSubmission> {
        if self.phase != QuizPhase::Submitting {
            return None;
        }
        Some(QuizSubmission {
            student_id: self.student_id.clone()?,
            quiz_id: self.quiz_id.clone()?,
            attempts: self.attempts.clone(),
            timestamp: now,
        })
    }

    /// # Errors
    ///
    /// Returns `InvalidTransition` outside `Submitting`.
    pub fn submission_succeeded(&mut self, analysis: Analysis) -> Result<(), QuizError> {
        if self.phase != QuizPhase::Submitting {
            return Err(self.invalid("show results"));
        }
        self.analysis = Some(analysis);
        self.phase = QuizPhase::Results;
        Ok(())
    }

    /// Attempts stay in memory; only `retry` clears them.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` outside `Submitting`.
    pub fn submit_failed(&mut self, message: impl Into<String>) -> Result<(), QuizError> {
        if self.phase != QuizPhase::Submitting {
            return Err(self.invalid("fail submission"));
        }
        self.fail(message, SUBMIT_FAILED_MESSAGE);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `InvalidTransition` outside `Results`.
    pub fn retake(&mut self) -> Result<(), QuizError> {
        if self.phase != QuizPhase::Results {
            return Err(self.invalid("retake"));
        }
        *self = Self::new();
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `InvalidTransition` outside `Error`.
    pub fn retry(&mut self) -> Result<(), QuizError> {
        if self.phase != QuizPhase::Error {
            return Err(self.invalid("retry"));
        }
        *self = Self::new();
        Ok(())
    }

    // ─── queries ───

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        matches!(self.phase, QuizPhase::Presenting { .. }) && self.selected.is_some()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            QuizPhase::Presenting { index } => self.questions.get(index),
            _ => None,
        }
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Fraction of questions answered, in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.questions.is_empty() {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = self.attempts.len() as f64 / self.questions.len() as f64;
        ratio
    }

    #[must_use]
    pub fn selected_option(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub fn confidence(&self) -> Confidence {
        self.confidence
    }

    #[must_use]
    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }

    #[must_use]
    pub fn student_id(&self) -> Option<&StudentId> {
        self.student_id.as_ref()
    }

    #[must_use]
    pub fn quiz_id(&self) -> Option<&QuizId> {
        self.quiz_id.as_ref()
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn presented_at(&self) -> Option<DateTime<Utc>> {
        self.presented_at
    }

    /// Seconds on the current question, or `None` when nothing is presented.
    #[must_use]
    pub fn elapsed_on_current(&self, now: DateTime<Utc>) -> Option<f64> {
        self.presented_at.map(|at| elapsed_secs(at, now))
    }

    #[must_use]
    pub fn analysis(&self) -> Option<&Analysis> {
        self.analysis.as_ref()
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
