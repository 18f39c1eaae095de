mod controller;
mod summary;
mod timing;

pub use controller::{
    AnswerOutcome, LOAD_FAILED_MESSAGE, NO_OPTIONS_MESSAGE, NO_QUESTIONS_MESSAGE, QuizController,
    QuizError, QuizPhase, QuizSubmission, SUBMIT_FAILED_MESSAGE,
};
pub use summary::{AttemptSummary, Calibration, LearningPattern};
pub use timing::{QuizTiming, ResponsePace, timer_label};
