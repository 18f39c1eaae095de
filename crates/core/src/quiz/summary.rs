use std::fmt;

use crate::model::Attempt;
use crate::quiz::timing::QuizTiming;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearningPattern {
    QuickAndEfficient,
    ThoughtfulAndCareful,
    Balanced,
}

impl fmt::Display for LearningPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::QuickAndEfficient => "Quick & Efficient",
            Self::ThoughtfulAndCareful => "Thoughtful & Careful",
            Self::Balanced => "Balanced Approach",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Calibration {
    WellCalibrated,
    Overconfident,
    Underconfident,
}

impl fmt::Display for Calibration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::WellCalibrated => "Well Calibrated",
            Self::Overconfident => "Overconfident",
            Self::Underconfident => "Underconfident",
        })
    }
}

/// Client-side statistics shown next to the backend verdict.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttemptSummary {
    pub total: usize,
    pub correct: usize,
    pub accuracy: f64,
    pub avg_time_secs: f64,
    pub avg_confidence: f64,
    pub fast_responses: usize,
    pub slow_responses: usize,
}

impl AttemptSummary {
    /// `None` when there are no attempts to summarize.
    #[must_use]
    pub fn from_attempts(attempts: &[Attempt], timing: &QuizTiming) -> Option<Self> {
        if attempts.is_empty() {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let total_f = attempts.len() as f64;
        let correct = attempts.iter().filter(|a| a.is_correct()).count();
        let total_time: f64 = attempts.iter().map(Attempt::time_taken).sum();
        let total_conf: f64 = attempts
            .iter()
            .map(|a| f64::from(a.confidence().value()))
            .sum();
        let fast_responses = attempts
            .iter()
            .filter(|a| a.time_taken() < timing.fast_secs)
            .count();
        let slow_responses = attempts
            .iter()
            .filter(|a| a.time_taken() > timing.slow_secs)
            .count();

        #[allow(clippy::cast_precision_loss)]
        let accuracy = correct as f64 / total_f;
        Some(Self {
            total: attempts.len(),
            correct,
            accuracy,
            avg_time_secs: total_time / total_f,
            avg_confidence: total_conf / total_f,
            fast_responses,
            slow_responses,
        })
    }

    #[must_use]
    pub fn fast_rate(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let rate = self.fast_responses as f64 / self.total.max(1) as f64;
        rate
    }

    #[must_use]
    pub fn learning_pattern(&self) -> LearningPattern {
        if self.avg_time_secs < 10.0 && self.fast_rate() > 0.6 {
            LearningPattern::QuickAndEfficient
        } else if self.avg_time_secs > 30.0 {
            LearningPattern::ThoughtfulAndCareful
        } else {
            LearningPattern::Balanced
        }
    }

    #[must_use]
    pub fn calibration(&self) -> Calibration {
        let stated = self.avg_confidence / 5.0;
        if (stated - self.accuracy).abs() < 0.1 {
            Calibration::WellCalibrated
        } else if stated > self.accuracy + 0.2 {
            Calibration::Overconfident
        } else {
            Calibration::Underconfident
        }
    }

    /// `2/3 (67%)`
    #[must_use]
    pub fn score_label(&self) -> String {
        format!("{}/{} ({:.0}%)", self.correct, self.total, self.accuracy * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Confidence, Question, QuestionDraft, QuestionId};

    fn question() -> Question {
        QuestionDraft {
            text: "Q".into(),
            concept: "C".into(),
            options: vec!["a".into(), "b".into()],
            correct_answer: Some(0),
        }
        .validate(QuestionId::new(1))
        .unwrap()
    }

    fn attempt(selected: usize, secs: f64, confidence: u8) -> Attempt {
        Attempt::record(&question(), selected, secs, Confidence::new(confidence).unwrap())
    }

    #[test]
    fn empty_has_no_summary() {
        assert!(AttemptSummary::from_attempts(&[], &QuizTiming::default()).is_none());
    }

    #[test]
    fn quick_and_well_calibrated() {
        let attempts = vec![attempt(0, 2.0, 5), attempt(0, 3.0, 5), attempt(0, 4.0, 5)];
        let summary = AttemptSummary::from_attempts(&attempts, &QuizTiming::default()).unwrap();
        assert_eq!(summary.correct, 3);
        assert_eq!(summary.learning_pattern(), LearningPattern::QuickAndEfficient);
        assert_eq!(summary.calibration(), Calibration::WellCalibrated);
        assert_eq!(summary.score_label(), "3/3 (100%)");
    }

    #[test]
    fn slow_and_overconfident() {
        let attempts = vec![attempt(1, 40.0, 5), attempt(1, 50.0, 4)];
        let summary = AttemptSummary::from_attempts(&attempts, &QuizTiming::default()).unwrap();
        assert_eq!(summary.learning_pattern(), LearningPattern::ThoughtfulAndCareful);
        assert_eq!(summary.calibration(), Calibration::Overconfident);
        assert_eq!(summary.learning_pattern().to_string(), "Thoughtful & Careful");
    }

    #[test]
    fn balanced_and_underconfident() {
        let attempts = vec![attempt(0, 12.0, 1), attempt(0, 15.0, 2)];
        let summary = AttemptSummary::from_attempts(&attempts, &QuizTiming::default()).unwrap();
        assert_eq!(summary.learning_pattern(), LearningPattern::Balanced);
        assert_eq!(summary.calibration(), Calibration::Underconfident);
    }
}
