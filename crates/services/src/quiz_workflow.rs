use std::sync::Arc;

use gaps_core::model::{Analysis, Question};
use gaps_core::quiz::{
    AnswerOutcome, LOAD_FAILED_MESSAGE, QuizController, QuizError, QuizSubmission,
    SUBMIT_FAILED_MESSAGE,
};

use crate::Clock;
use crate::api::QuizBackend;
use crate::error::{ApiError, WorkflowError};

/// Drives a `QuizController` through its two network calls.
///
/// The async halves (`load_questions`, `send_submission`) never touch the
/// controller, so a UI can hold the controller in a signal and apply results
/// after the await completes.
#[derive(Clone)]
pub struct QuizWorkflow {
    clock: Clock,
    backend: Arc<dyn QuizBackend>,
}

impl QuizWorkflow {
    #[must_use]
    pub fn new(clock: Clock, backend: Arc<dyn QuizBackend>) -> Self {
        Self { clock, backend }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Identify the student; the caller then loads questions.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::EmptyStudentId` for a blank id.
    pub fn begin(
        &self,
        controller: &mut QuizController,
        raw_student_id: &str,
    ) -> Result<(), QuizError> {
        controller.begin(raw_student_id, self.clock.now())?;
        tracing::info!(
            student_id = %raw_student_id.trim(),
            quiz_id = controller.quiz_id().map(|id| id.as_str()),
            "quiz started"
        );
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the question bank cannot be fetched.
    pub async fn load_questions(&self) -> Result<Vec<Question>, ApiError> {
        let questions = self.backend.fetch_questions().await?;
        tracing::debug!(count = questions.len(), "questions fetched");
        Ok(questions)
    }

    /// Feed a question load result into the controller. Transport errors are
    /// logged and shown as a generic message.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidTransition` if the controller is not loading.
    pub fn apply_questions(
        &self,
        controller: &mut QuizController,
        result: Result<Vec<Question>, ApiError>,
    ) -> Result<(), QuizError> {
        match result {
            Ok(questions) => controller.questions_loaded(questions, self.clock.now()),
            Err(err) => {
                tracing::error!(error = %err, "failed to load quiz questions");
                controller.load_failed(LOAD_FAILED_MESSAGE)
            }
        }
    }

    /// Record the current answer, timed against the workflow clock.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoSelection` without a selection, or
    /// `InvalidTransition` outside `Presenting`.
    pub fn answer(&self, controller: &mut QuizController) -> Result<AnswerOutcome, QuizError> {
        let outcome = controller.submit_answer(self.clock.now())?;
        if let Some(attempt) = controller.attempts().last() {
            tracing::debug!(
                question_id = %attempt.question_id(),
                correct = attempt.is_correct(),
                time_taken = attempt.time_taken(),
                "answer recorded"
            );
        }
        Ok(outcome)
    }

    /// Body to post, stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidTransition` outside `Submitting`.
    pub fn prepare_submission(
        &self,
        controller: &QuizController,
    ) -> Result<QuizSubmission, QuizError> {
        controller
            .submission(self.clock.now())
            .ok_or(QuizError::InvalidTransition {
                action: "submit the quiz",
                phase: controller.phase(),
            })
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the analysis endpoint fails.
    pub async fn send_submission(&self, submission: &QuizSubmission) -> Result<Analysis, ApiError> {
        let analysis = self.backend.submit_quiz(submission).await?;
        tracing::info!(
            student_id = %submission.student_id,
            quiz_id = %submission.quiz_id,
            attempts = submission.attempts.len(),
            overall_risk = analysis.overall_risk.as_wire(),
            "quiz analysed"
        );
        Ok(analysis)
    }

    /// # Errors
    ///
    /// Returns `QuizError::InvalidTransition` outside `Submitting`.
    pub fn apply_submission(
        &self,
        controller: &mut QuizController,
        result: Result<Analysis, ApiError>,
    ) -> Result<(), QuizError> {
        match result {
            Ok(analysis) => controller.submission_succeeded(analysis),
            Err(err) => {
                tracing::error!(error = %err, "failed to submit quiz");
                controller.submit_failed(SUBMIT_FAILED_MESSAGE)
            }
        }
    }

    /// `begin` then load. A failed load still returns `Ok`; the controller is
    /// left in `Error`.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Quiz` for a blank id or an invalid transition.
    pub async fn start(
        &self,
        controller: &mut QuizController,
        raw_student_id: &str,
    ) -> Result<(), WorkflowError> {
        self.begin(controller, raw_student_id)?;
        let result = self.load_questions().await;
        self.apply_questions(controller, result)?;
        Ok(())
    }

    /// Post the finished attempt. A failed post still returns `Ok`; the
    /// controller is left in `Error`.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Quiz` outside `Submitting`.
    pub async fn submit(&self, controller: &mut QuizController) -> Result<(), WorkflowError> {
        let submission = self.prepare_submission(controller)?;
        let result = self.send_submission(&submission).await;
        self.apply_submission(controller, result)?;
        Ok(())
    }
}
