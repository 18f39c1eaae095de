use chrono::{DateTime, Utc};
use gaps_core::model::{Analysis, RiskLevel};
use gaps_core::quiz::{AttemptSummary, QuizController, QuizPhase, QuizTiming, timer_label};

/// Risk pill shared by the results and dashboard screens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RiskBadgeVm {
    pub icon: &'static str,
    pub label: String,
    pub class: String,
}

impl RiskBadgeVm {
    #[must_use]
    pub fn new(level: &RiskLevel) -> Self {
        Self {
            icon: level.icon(),
            label: level.label(),
            class: level.css_class(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub index: usize,
    pub text: String,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimerVm {
    pub label: String,
    pub class: &'static str,
}

#[derive(Clone, Debug, PartialEq)]
pub struct QuestionVm {
    pub counter_label: String,
    pub progress_percent: f64,
    pub text: String,
    pub concept: String,
    pub options: Vec<OptionVm>,
    pub confidence: u8,
    pub confidence_label: String,
    pub can_submit: bool,
    pub submit_label: &'static str,
    pub timer: TimerVm,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConceptBadgeVm {
    pub concept: String,
    pub badge: RiskBadgeVm,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultsVm {
    pub score_label: String,
    pub score_percent_label: String,
    pub avg_time_label: String,
    pub avg_confidence_label: String,
    pub learning_pattern: String,
    pub calibration: String,
    pub overall: RiskBadgeVm,
    pub gap_label: String,
    pub recommendations: Vec<String>,
    pub concepts: Vec<ConceptBadgeVm>,
}

/// Everything the quiz screen can show; one variant per controller phase.
#[derive(Clone, Debug, PartialEq)]
pub enum QuizScreen {
    Identify,
    Loading,
    Question(QuestionVm),
    Submitting,
    Results(ResultsVm),
    Error { message: String },
}

/// Pure mapping from controller state to what the quiz screen renders.
#[must_use]
pub fn map_quiz_screen(
    controller: &QuizController,
    timing: &QuizTiming,
    now: DateTime<Utc>,
) -> QuizScreen {
    match controller.phase() {
        QuizPhase::LoggedOut => QuizScreen::Identify,
        QuizPhase::Loading => QuizScreen::Loading,
        QuizPhase::Presenting { index } => map_question(controller, index, timing, now)
            .map_or(QuizScreen::Loading, QuizScreen::Question),
        QuizPhase::Submitting => QuizScreen::Submitting,
        QuizPhase::Results => match controller.analysis() {
            Some(analysis) => QuizScreen::Results(map_results(controller, analysis, timing)),
            None => QuizScreen::Submitting,
        },
        QuizPhase::Error => QuizScreen::Error {
            message: controller
                .error_message()
                .unwrap_or(gaps_core::quiz::SUBMIT_FAILED_MESSAGE)
                .to_string(),
        },
    }
}

fn map_question(
    controller: &QuizController,
    index: usize,
    timing: &QuizTiming,
    now: DateTime<Utc>,
) -> Option<QuestionVm> {
    let question = controller.current_question()?;
    let total = controller.question_count();
    let selected = controller.selected_option();
    let options = question
        .options()
        .iter()
        .enumerate()
        .map(|(i, text)| OptionVm {
            index: i,
            text: text.clone(),
            selected: selected == Some(i),
        })
        .collect();
    let confidence = controller.confidence().value();
    let elapsed = controller.elapsed_on_current(now).unwrap_or(0.0);
    Some(QuestionVm {
        counter_label: format!("Question {} of {total}", index + 1),
        progress_percent: controller.progress() * 100.0,
        text: question.text().to_string(),
        concept: question.concept().to_string(),
        options,
        confidence,
        confidence_label: format!("Confidence: {confidence}/5"),
        can_submit: controller.can_submit(),
        submit_label: if index + 1 == total {
            "Finish Quiz"
        } else {
            "Next Question"
        },
        timer: map_timer(elapsed, timing),
    })
}

#[must_use]
pub fn map_timer(elapsed_secs: f64, timing: &QuizTiming) -> TimerVm {
    let pace = timing.pace(elapsed_secs);
    let mut label = timer_label(elapsed_secs);
    if pace == gaps_core::quiz::ResponsePace::Slow {
        label.push_str(" (taking your time?)");
    }
    TimerVm {
        label,
        class: pace.css_class(),
    }
}

fn map_results(controller: &QuizController, analysis: &Analysis, timing: &QuizTiming) -> ResultsVm {
    let summary = AttemptSummary::from_attempts(controller.attempts(), timing);
    let (
        score_label,
        score_percent_label,
        avg_time_label,
        avg_confidence_label,
        pattern,
        calibration,
    ) = match summary {
        Some(s) => (
            format!("{}/{}", s.correct, s.total),
            format!("Score: {:.1}%", s.accuracy * 100.0),
            format!("{:.1}s", s.avg_time_secs),
            format!("{:.1}/5", s.avg_confidence),
            s.learning_pattern().to_string(),
            s.calibration().to_string(),
        ),
        None => (
            "0/0".to_string(),
            "Score: 0.0%".to_string(),
            "0.0s".to_string(),
            "0.0/5".to_string(),
            String::new(),
            String::new(),
        ),
    };
    ResultsVm {
        score_label,
        score_percent_label,
        avg_time_label,
        avg_confidence_label,
        learning_pattern: pattern,
        calibration,
        overall: RiskBadgeVm::new(&analysis.overall_risk),
        gap_label: analysis.gap_percent_label(),
        recommendations: analysis.recommendations.iter().take(3).cloned().collect(),
        concepts: analysis
            .concept_gaps
            .iter()
            .map(|gap| ConceptBadgeVm {
                concept: gap.concept.clone(),
                badge: RiskBadgeVm::new(&gap.risk_level),
            })
            .collect(),
    }
}
