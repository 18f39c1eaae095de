use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::dashboard::{ai_likelihood, date_label};
use crate::model::{ConceptStats, Dashboard, DashboardSummary, percent_label};

pub const CSV_FILE_NAME: &str = "learning-gaps-report.csv";
pub const JSON_FILE_NAME: &str = "learning-gaps-report.json";

const CSV_HEADER: [&str; 6] = [
    "student_id",
    "risk_level",
    "gap_score",
    "ai_likelihood",
    "concerns",
    "last_assessment",
];

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReportError {
    #[error("No data to export. Please ensure students have completed assessments.")]
    NoStudents,

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// One exported line per student, already formatted for people.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub student_id: String,
    pub risk_level: String,
    pub gap_score: String,
    pub ai_likelihood: String,
    pub concerns: String,
    pub last_assessment: String,
}

impl ReportRow {
    fn values(&self) -> [&str; 6] {
        [
            self.student_id.as_str(),
            self.risk_level.as_str(),
            self.gap_score.as_str(),
            self.ai_likelihood.as_str(),
            self.concerns.as_str(),
            self.last_assessment.as_str(),
        ]
    }
}

/// Snapshot of the dashboard for export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub summary: DashboardSummary,
    pub students: Vec<ReportRow>,
    pub concept_analysis: BTreeMap<String, ConceptStats>,
}

impl Report {
    /// # Errors
    ///
    /// Returns `ReportError::NoStudents` when there is nothing to export.
    pub fn build(dashboard: &Dashboard, generated_at: DateTime<Utc>) -> Result<Self, ReportError> {
        if dashboard.students.is_empty() {
            return Err(ReportError::NoStudents);
        }
        let students = dashboard
            .students
            .iter()
            .map(|s| ReportRow {
                student_id: s.student_id.to_string(),
                risk_level: s.overall_risk.to_string(),
                gap_score: percent_label(s.overall_score),
                ai_likelihood: format!("{}%", ai_likelihood(&s.top_concerns)),
                concerns: s.top_concerns.join("; "),
                last_assessment: date_label(s.timestamp),
            })
            .collect();
        Ok(Self {
            generated_at,
            summary: dashboard.summary,
            students,
            concept_analysis: dashboard.concept_analysis.clone(),
        })
    }

    /// Header plus one row per student; every value is quoted.
    #[must_use]
    pub fn to_csv(&self) -> String {
        let mut lines = Vec::with_capacity(self.students.len() + 1);
        lines.push(CSV_HEADER.join(","));
        for row in &self.students {
            let quoted: Vec<String> = row.values().iter().map(|v| csv_quote(v)).collect();
            lines.push(quoted.join(","));
        }
        lines.join("\n")
    }

    /// # Errors
    ///
    /// Returns `ReportError::Json` if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn csv_quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RiskLevel, StudentId, StudentOverview};
    use crate::time::fixed_now;

    fn dashboard() -> Dashboard {
        let mut dashboard = Dashboard {
            summary: DashboardSummary {
                total_students: 1,
                at_risk_students: 1,
                ..DashboardSummary::default()
            },
            students: vec![StudentOverview {
                student_id: StudentId::new("s-1").unwrap(),
                overall_risk: RiskLevel::AtRisk,
                overall_score: 0.5,
                timestamp: Some(fixed_now()),
                top_concerns: vec!["Wrote \"guess\"".into(), "fast answers".into()],
            }],
            ..Dashboard::default()
        };
        dashboard.concept_analysis.insert(
            "Fractions".into(),
            ConceptStats {
                total_students: 1,
                avg_gap_score: 0.5,
                at_risk_count: 1,
            },
        );
        dashboard
    }

    #[test]
    fn empty_dashboard_cannot_export() {
        assert!(matches!(
            Report::build(&Dashboard::default(), fixed_now()),
            Err(ReportError::NoStudents)
        ));
    }

    #[test]
    fn csv_quotes_every_value() {
        let csv = Report::build(&dashboard(), fixed_now()).unwrap().to_csv();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("student_id,risk_level,gap_score,ai_likelihood,concerns,last_assessment")
        );
        assert_eq!(
            lines.next(),
            Some(r#""s-1","at_risk","50.0%","30%","Wrote ""guess""; fast answers","2023-11-14""#)
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn json_report_sections() {
        let json = Report::build(&dashboard(), fixed_now())
            .unwrap()
            .to_json_pretty()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["generated_at"], "2023-11-14T22:13:20Z");
        assert_eq!(value["summary"]["total_students"], 1);
        assert_eq!(value["students"][0]["risk_level"], "at_risk");
        assert_eq!(value["concept_analysis"]["Fractions"]["at_risk_count"], 1);
        assert!(json.contains('\n'));
    }
}
