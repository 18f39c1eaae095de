//! Pure view-model derivations over the teacher dashboard payload.

mod analytics;
mod filters;
mod insights;

pub use analytics::{
    AI_LIKELIHOOD_MAX, AI_LIKELIHOOD_MIN, AiBucket, ConceptCard, ConceptRisk, HeatCell,
    HistoryTrend, Prediction, StudentRow, TrendCounts, ai_likelihood, concerns_label, date_label,
    datetime_label, detection_rate, history_summary,
};
pub use filters::{AiFilter, RiskFilter, StudentFilter};
pub use insights::{
    Alert, Insight, Intervention, InterventionKind, alerts, generate_insights, interventions,
};

use crate::model::Dashboard;

pub const NO_STUDENTS_MESSAGE: &str = "No students have completed an assessment yet.";

/// Everything the dashboard screen renders, derived once per payload.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub dashboard: Dashboard,
    pub rows: Vec<StudentRow>,
    pub concepts: Vec<ConceptCard>,
    pub heat_map: Vec<HeatCell>,
    pub insights: Vec<Insight>,
    pub alerts: Vec<Alert>,
    pub interventions: Vec<Intervention>,
    pub trends: TrendCounts,
    pub detection_rate: Option<u32>,
}

impl DashboardView {
    #[must_use]
    pub fn new(dashboard: Dashboard) -> Self {
        let rows = dashboard.students.iter().map(StudentRow::new).collect();
        let concepts = dashboard
            .concept_analysis
            .iter()
            .map(|(name, stats)| ConceptCard::new(name, stats))
            .collect();
        let heat_map = dashboard
            .concept_analysis
            .iter()
            .map(|(name, stats)| HeatCell::new(name, stats))
            .collect();
        Self {
            rows,
            concepts,
            heat_map,
            insights: generate_insights(&dashboard),
            alerts: alerts(&dashboard.students),
            interventions: interventions(&dashboard.students),
            trends: TrendCounts::from_students(&dashboard.students),
            detection_rate: detection_rate(&dashboard.students),
            dashboard,
        }
    }

    #[must_use]
    pub fn has_no_students(&self) -> bool {
        self.dashboard.has_no_students()
    }

    #[must_use]
    pub fn visible_rows(&self, filter: &StudentFilter) -> Vec<&StudentRow> {
        filter.apply(&self.rows)
    }
}
