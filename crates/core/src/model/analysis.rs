use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::StudentId;
use crate::model::risk::RiskLevel;
use crate::time::flexible_timestamp;

/// Per-concept gap estimate inside an analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptGap {
    pub concept: String,
    #[serde(default)]
    pub gap_score: f64,
    #[serde(default)]
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub indicators: Vec<String>,
}

/// Backend verdict for one submitted quiz.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Analysis {
    #[serde(default)]
    pub overall_risk: RiskLevel,
    #[serde(default)]
    pub overall_score: f64,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub concept_gaps: Vec<ConceptGap>,
    #[serde(default, with = "flexible_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Analysis {
    /// Gap score as a percentage with one decimal (`42.0%`).
    #[must_use]
    pub fn gap_percent_label(&self) -> String {
        percent_label(self.overall_score)
    }
}

/// Class-wide counts shown on the dashboard summary cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DashboardSummary {
    #[serde(default)]
    pub total_students: u32,
    #[serde(default)]
    pub at_risk_students: u32,
    #[serde(default)]
    pub watch_students: u32,
    #[serde(default)]
    pub safe_students: u32,
}

/// Latest result per student as listed on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentOverview {
    pub student_id: StudentId,
    #[serde(default)]
    pub overall_risk: RiskLevel,
    #[serde(default)]
    pub overall_score: f64,
    #[serde(default, with = "flexible_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub top_concerns: Vec<String>,
}

/// Aggregated gap statistics for one concept.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ConceptStats {
    #[serde(default)]
    pub total_students: u32,
    #[serde(default)]
    pub avg_gap_score: f64,
    #[serde(default)]
    pub at_risk_count: u32,
}

impl ConceptStats {
    /// Share of students at risk in `[0, 1]`; zero when the concept has no students.
    #[must_use]
    pub fn at_risk_rate(&self) -> f64 {
        if self.total_students == 0 {
            return 0.0;
        }
        f64::from(self.at_risk_count) / f64::from(self.total_students)
    }
}

/// Response of the teacher dashboard endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Dashboard {
    #[serde(default)]
    pub summary: DashboardSummary,
    #[serde(default)]
    pub students: Vec<StudentOverview>,
    #[serde(default)]
    pub concept_analysis: BTreeMap<String, ConceptStats>,
}

impl Dashboard {
    /// True when there is nothing to tabulate.
    #[must_use]
    pub fn has_no_students(&self) -> bool {
        self.summary.total_students == 0 || self.students.is_empty()
    }
}

/// Response of the student detail endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentDetail {
    pub student_id: StudentId,
    pub latest_analysis: Analysis,
    #[serde(default)]
    pub history: Vec<Analysis>,
}

/// Formats a `[0, 1]` score as a one-decimal percentage.
#[must_use]
pub fn percent_label(score: f64) -> String {
    format!("{:.1}%", score * 100.0)
}
