use gaps_core::dashboard::{
    AiBucket, Intervention, InterventionKind, StudentRow, datetime_label, history_summary,
};
use gaps_core::model::{DashboardSummary, StudentDetail};

use super::quiz_vm::RiskBadgeVm;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryCardVm {
    pub label: &'static str,
    pub value: u32,
    pub class: &'static str,
}

#[must_use]
pub fn map_summary_cards(summary: &DashboardSummary) -> Vec<SummaryCardVm> {
    vec![
        SummaryCardVm {
            label: "Total Students",
            value: summary.total_students,
            class: "summary-total",
        },
        SummaryCardVm {
            label: "At Risk",
            value: summary.at_risk_students,
            class: "summary-at-risk",
        },
        SummaryCardVm {
            label: "Watch",
            value: summary.watch_students,
            class: "summary-watch",
        },
        SummaryCardVm {
            label: "Safe",
            value: summary.safe_students,
            class: "summary-safe",
        },
    ]
}

/// One line of the student table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StudentRowVm {
    pub student_id: String,
    pub badge: RiskBadgeVm,
    pub gap_label: String,
    pub ai_label: String,
    pub ai_percent: u8,
    pub ai_meter_class: &'static str,
    pub prediction_label: String,
    pub prediction_class: &'static str,
    pub last_assessment: String,
    pub concerns: String,
    pub flagged: bool,
}

#[must_use]
pub fn map_student_row(row: &StudentRow) -> StudentRowVm {
    StudentRowVm {
        student_id: row.student.student_id.to_string(),
        badge: RiskBadgeVm::new(&row.student.overall_risk),
        gap_label: row.gap_label.clone(),
        ai_label: format!("{}%", row.ai_likelihood),
        ai_percent: row.ai_likelihood,
        ai_meter_class: AiBucket::meter_class(row.ai_likelihood),
        prediction_label: format!("{} {}", row.prediction.icon(), row.prediction.label()),
        prediction_class: row.prediction.css_class(),
        last_assessment: row.last_assessment.clone(),
        concerns: row.concerns_label.clone(),
        flagged: row.should_flag(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterventionVm {
    pub title: String,
    pub body: String,
    pub actions: [&'static str; 2],
    pub urgent: bool,
}

#[must_use]
pub fn map_intervention(intervention: &Intervention) -> InterventionVm {
    match intervention {
        Intervention::Urgent { student_id, kind } => InterventionVm {
            title: format!("{student_id}: {}", kind.label()),
            body: match kind {
                InterventionKind::AiDependency => {
                    "Answers suggest reliance on outside help. Talk through the reasoning together."
                }
                InterventionKind::ConfidenceCalibration => {
                    "Confidence does not match performance. Practise self-assessment."
                }
                InterventionKind::GeneralSupport => {
                    "Several concepts need reinforcement. Plan targeted practice."
                }
            }
            .to_string(),
            actions: kind.actions(),
            urgent: true,
        },
        Intervention::General => InterventionVm {
            title: "No urgent interventions".to_string(),
            body: "Keep monitoring progress and reinforce concepts with the highest gaps."
                .to_string(),
            actions: InterventionKind::GeneralSupport.actions(),
            urgent: false,
        },
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConceptGapVm {
    pub concept: String,
    pub badge: RiskBadgeVm,
    pub gap_label: String,
    pub indicators: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StudentDetailVm {
    pub title: String,
    pub overall: RiskBadgeVm,
    pub gap_label: String,
    pub assessed_at: String,
    pub concept_gaps: Vec<ConceptGapVm>,
    pub recommendations: Vec<String>,
    pub history_summary: String,
}

#[must_use]
pub fn map_student_detail(detail: &StudentDetail) -> StudentDetailVm {
    let latest = &detail.latest_analysis;
    StudentDetailVm {
        title: format!("Student {}", detail.student_id),
        overall: RiskBadgeVm::new(&latest.overall_risk),
        gap_label: latest.gap_percent_label(),
        assessed_at: datetime_label(latest.timestamp),
        concept_gaps: latest
            .concept_gaps
            .iter()
            .map(|gap| ConceptGapVm {
                concept: gap.concept.clone(),
                badge: RiskBadgeVm::new(&gap.risk_level),
                gap_label: gaps_core::model::percent_label(gap.gap_score),
                indicators: gap.indicators.clone(),
            })
            .collect(),
        recommendations: latest.recommendations.clone(),
        history_summary: history_summary(&detail.history),
    }
}
